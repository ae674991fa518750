use crate::models::{Album, Photo};
use crate::store::GalleryStore;
use crate::user_models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, to_bson};
use mongodb::{Client, Collection};

const ALBUMS_COLLECTION: &str = "albums";
const PHOTOS_COLLECTION: &str = "photos";
const USERS_COLLECTION: &str = "users";

/// Document-database backend. Records are keyed by their numeric `id`
/// field, not the driver's `_id`. The client is constructed once at
/// startup and injected; there is no lazy global handle.
pub struct MongoStore {
    albums: Collection<Album>,
    photos: Collection<Photo>,
    users: Collection<User>,
}

impl MongoStore {
    /// Connect and ping the deployment so a bad URI or unreachable
    /// server fails at startup, not on the first request.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to connect to MongoDB")?;
        let db = client.database(db_name);

        db.run_command(doc! { "ping": 1 })
            .await
            .with_context(|| format!("MongoDB deployment unreachable (database '{}')", db_name))?;

        Ok(Self {
            albums: db.collection(ALBUMS_COLLECTION),
            photos: db.collection(PHOTOS_COLLECTION),
            users: db.collection(USERS_COLLECTION),
        })
    }
}

#[async_trait]
impl GalleryStore for MongoStore {
    async fn list_albums(&self) -> Result<Vec<Album>> {
        let cursor = self
            .albums
            .find(doc! {})
            .await
            .context("Failed to query albums")?;
        cursor.try_collect().await.context("Failed to read albums")
    }

    async fn album_by_id(&self, id: i64) -> Result<Option<Album>> {
        self.albums
            .find_one(doc! { "id": id })
            .await
            .context("Failed to query album by id")
    }

    async fn album_by_name(&self, name: &str) -> Result<Option<Album>> {
        self.albums
            .find_one(doc! { "name": name })
            .await
            .context("Failed to query album by name")
    }

    async fn list_photos(&self) -> Result<Vec<Photo>> {
        let cursor = self
            .photos
            .find(doc! {})
            .await
            .context("Failed to query photos")?;
        cursor.try_collect().await.context("Failed to read photos")
    }

    async fn photos_by_album(&self, album_id: i64) -> Result<Vec<Photo>> {
        // Array-contains filter: matches documents whose `albums` array
        // holds the id.
        let cursor = self
            .photos
            .find(doc! { "albums": album_id })
            .await
            .context("Failed to query photos by album")?;
        cursor.try_collect().await.context("Failed to read photos")
    }

    async fn photo_by_id(&self, id: i64) -> Result<Option<Photo>> {
        self.photos
            .find_one(doc! { "id": id })
            .await
            .context("Failed to query photo by id")
    }

    async fn update_photo(&self, photo: &Photo) -> Result<bool> {
        // $set is limited to the mutable fields; id, filename, albums
        // and owner never change.
        let update = doc! {
            "$set": {
                "title": photo.title.as_str(),
                "description": photo.description.as_str(),
                "tags": to_bson(&photo.tags).context("Failed to encode tags")?,
            }
        };

        let result = self
            .photos
            .update_one(doc! { "id": photo.id }, update)
            .await
            .context("Failed to update photo")?;
        Ok(result.matched_count > 0)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users
            .find_one(doc! { "username": username })
            .await
            .context("Failed to query user")
    }
}
