use crate::config::{Backend, Config};
use crate::file_store::FileStore;
use crate::models::{Album, Photo};
use crate::mongo_store::MongoStore;
use crate::user_models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// The persistence port: everything the business layer is allowed to ask
/// of a storage backend. Implemented once per backend with identical
/// semantics; absence is the benign `None`/empty/`false` value, storage
/// failures are errors.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// All albums in storage order. No guaranteed sort.
    async fn list_albums(&self) -> Result<Vec<Album>>;

    async fn album_by_id(&self, id: i64) -> Result<Option<Album>>;

    /// Exact, case-sensitive match. Case-insensitive lookup is the
    /// caller's responsibility.
    async fn album_by_name(&self, name: &str) -> Result<Option<Album>>;

    async fn list_photos(&self) -> Result<Vec<Photo>>;

    /// Photos whose `albums` list contains `album_id`.
    async fn photos_by_album(&self, album_id: i64) -> Result<Vec<Photo>>;

    async fn photo_by_id(&self, id: i64) -> Result<Option<Photo>>;

    /// Replace the stored record matching `photo.id`. Returns `false`
    /// when no record matched; never inserts.
    async fn update_photo(&self, photo: &Photo) -> Result<bool>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Construct the backend selected by the config. Fails fast (missing
/// connection string, unreachable deployment, unreadable data files)
/// before any request is served.
pub async fn open_store(config: &Config) -> Result<Arc<dyn GalleryStore>> {
    match config.backend {
        Backend::File => {
            let store = FileStore::open(&config.data_dir)?;
            Ok(Arc::new(store))
        }
        Backend::Mongo => {
            let uri = config
                .mongo_uri
                .as_deref()
                .context("GALLERY_BACKEND=mongo requires MONGODB_URI to be set")?;
            let store = MongoStore::connect(uri, &config.mongo_db).await?;
            Ok(Arc::new(store))
        }
    }
}
