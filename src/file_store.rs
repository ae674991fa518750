use crate::models::{Album, Photo};
use crate::store::GalleryStore;
use crate::user_models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const ALBUMS_FILE: &str = "albums.json";
const PHOTOS_FILE: &str = "photos.json";
const USERS_FILE: &str = "users.json";

/// Flat-JSON backend: one file per collection under a data directory,
/// loaded once at startup. Every photo update rewrites the whole photos
/// file, so concurrent processes sharing a data directory can lose each
/// other's writes; within one process the lock serializes access.
#[derive(Debug)]
pub struct FileStore {
    albums: RwLock<Vec<Album>>,
    photos: RwLock<Vec<Photo>>,
    users: RwLock<Vec<User>>,
    photos_path: PathBuf,
}

impl FileStore {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let albums = load_collection(&data_dir.join(ALBUMS_FILE))?;
        let photos = load_collection(&data_dir.join(PHOTOS_FILE))?;
        let users = load_collection(&data_dir.join(USERS_FILE))?;

        Ok(Self {
            albums: RwLock::new(albums),
            photos: RwLock::new(photos),
            users: RwLock::new(users),
            photos_path: data_dir.join(PHOTOS_FILE),
        })
    }

    fn save_photos_to_disk(&self, photos: &[Photo]) -> Result<()> {
        let json = serde_json::to_string_pretty(photos)
            .context("Failed to serialize photos")?;
        fs::write(&self.photos_path, json)
            .with_context(|| format!("Failed to write {}", self.photos_path.display()))?;
        Ok(())
    }
}

/// A missing file is an empty collection. A file that is not valid JSON
/// fails the load, naming the file. Individual records that do not
/// deserialize are skipped with a warning so one malformed entry cannot
/// take the whole catalog down.
fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: Vec<serde_json::Value> = serde_json::from_str(&data)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let mut records = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping malformed record in {}: {}", path.display(), e),
        }
    }
    Ok(records)
}

#[async_trait]
impl GalleryStore for FileStore {
    async fn list_albums(&self) -> Result<Vec<Album>> {
        let albums = self.albums.read().await;
        Ok(albums.clone())
    }

    async fn album_by_id(&self, id: i64) -> Result<Option<Album>> {
        let albums = self.albums.read().await;
        Ok(albums.iter().find(|a| a.id == id).cloned())
    }

    async fn album_by_name(&self, name: &str) -> Result<Option<Album>> {
        let albums = self.albums.read().await;
        Ok(albums.iter().find(|a| a.name == name).cloned())
    }

    async fn list_photos(&self) -> Result<Vec<Photo>> {
        let photos = self.photos.read().await;
        Ok(photos.clone())
    }

    async fn photos_by_album(&self, album_id: i64) -> Result<Vec<Photo>> {
        let photos = self.photos.read().await;
        Ok(photos
            .iter()
            .filter(|p| p.albums.contains(&album_id))
            .cloned()
            .collect())
    }

    async fn photo_by_id(&self, id: i64) -> Result<Option<Photo>> {
        let photos = self.photos.read().await;
        Ok(photos.iter().find(|p| p.id == id).cloned())
    }

    async fn update_photo(&self, photo: &Photo) -> Result<bool> {
        let mut photos = self.photos.write().await;

        if let Some(stored) = photos.iter_mut().find(|p| p.id == photo.id) {
            *stored = photo.clone();
            self.save_photos_to_disk(&photos)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn photo(id: i64, filename: &str, albums: Vec<i64>) -> Photo {
        Photo {
            id,
            filename: filename.to_string(),
            title: format!("Photo {}", id),
            description: String::new(),
            date: None,
            resolution: None,
            albums,
            tags: Vec::new(),
            owner: None,
        }
    }

    fn write_fixture(dir: &Path) {
        let albums = vec![
            Album { id: 1, name: "Trip".to_string(), description: None },
            Album { id: 2, name: "Nature".to_string(), description: Some("Outdoors".to_string()) },
        ];
        let photos = vec![
            photo(10, "a.jpg", vec![1]),
            photo(11, "b.jpg", vec![1, 2]),
            photo(12, "c.jpg", vec![2]),
        ];
        fs::write(dir.join(ALBUMS_FILE), serde_json::to_string_pretty(&albums).unwrap()).unwrap();
        fs::write(dir.join(PHOTOS_FILE), serde_json::to_string_pretty(&photos).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn loads_collections_in_storage_order() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let store = FileStore::open(dir.path()).unwrap();
        let albums = store.list_albums().await.unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].name, "Trip");
        assert_eq!(albums[1].name, "Nature");
    }

    #[tokio::test]
    async fn missing_files_load_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.list_albums().await.unwrap().is_empty());
        assert!(store.list_photos().await.unwrap().is_empty());
        assert!(store.user_by_username("anyone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_by_id_and_name() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.album_by_id(2).await.unwrap().unwrap().name, "Nature");
        assert!(store.album_by_id(99).await.unwrap().is_none());

        assert_eq!(store.album_by_name("Trip").await.unwrap().unwrap().id, 1);
        // Exact match only; folding is the caller's job.
        assert!(store.album_by_name("trip").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn photos_by_album_checks_membership() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let store = FileStore::open(dir.path()).unwrap();

        let in_one: Vec<i64> = store
            .photos_by_album(1)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(in_one, vec![10, 11]);
        assert!(store.photos_by_album(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_record_and_rewrites_file() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let store = FileStore::open(dir.path()).unwrap();

        let mut photo = store.photo_by_id(11).await.unwrap().unwrap();
        photo.title = "Renamed".to_string();
        photo.tags.push("sunset".to_string());
        assert!(store.update_photo(&photo).await.unwrap());

        let reread = store.photo_by_id(11).await.unwrap().unwrap();
        assert_eq!(reread.title, "Renamed");
        assert_eq!(reread.tags, vec!["sunset"]);
        assert_eq!(reread.filename, "b.jpg");
        assert_eq!(reread.albums, vec![1, 2]);

        // The whole collection is rewritten; a fresh store sees the change.
        let fresh = FileStore::open(dir.path()).unwrap();
        assert_eq!(fresh.photo_by_id(11).await.unwrap().unwrap().title, "Renamed");
        assert_eq!(fresh.list_photos().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_miss_returns_false_and_never_inserts() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let store = FileStore::open(dir.path()).unwrap();

        let ghost = photo(999, "ghost.jpg", vec![]);
        assert!(!store.update_photo(&ghost).await.unwrap());
        assert_eq!(store.list_photos().await.unwrap().len(), 3);
    }

    #[test]
    fn malformed_file_fails_naming_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ALBUMS_FILE), "{ not json").unwrap();

        let err = FileStore::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains(ALBUMS_FILE));
    }

    #[tokio::test]
    async fn malformed_records_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(ALBUMS_FILE),
            r#"[
                { "id": 1, "name": "Trip" },
                { "id": "oops", "name": 7 },
                { "id": 2, "name": "Nature" }
            ]"#,
        )
        .unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        let albums = store.list_albums().await.unwrap();
        let ids: Vec<i64> = albums.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
