use photo_gallery::file_store::FileStore;
use photo_gallery::gallery::Gallery;
use photo_gallery::models::{Album, Photo};
use photo_gallery::store::GalleryStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn seed(dir: &Path, albums: &[Album], photos: &[Photo]) {
    fs::write(
        dir.join("albums.json"),
        serde_json::to_string_pretty(albums).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("photos.json"),
        serde_json::to_string_pretty(photos).unwrap(),
    )
    .unwrap();
}

fn bare_photo(id: i64, filename: &str, albums: Vec<i64>) -> Photo {
    Photo {
        id,
        filename: filename.to_string(),
        title: String::new(),
        description: String::new(),
        date: None,
        resolution: None,
        albums,
        tags: Vec::new(),
        owner: None,
    }
}

#[tokio::test]
async fn album_listing_resolves_name_and_falls_back_to_filename() {
    let dir = TempDir::new().unwrap();
    seed(
        dir.path(),
        &[Album { id: 1, name: "Trip".to_string(), description: None }],
        &[bare_photo(5, "a.jpg", vec![1])],
    );

    let gallery = Gallery::new(Arc::new(FileStore::open(dir.path()).unwrap()));
    let info = gallery.photos_in_album(1).await.unwrap();

    assert_eq!(info.album_name, "Trip");
    assert_eq!(info.count, 1);
    assert_eq!(info.photos.len(), 1);
    assert_eq!(info.photos[0].id, 5);
    assert_eq!(info.photos[0].title, "a.jpg");
}

#[tokio::test]
async fn edit_then_view_round_trip() {
    let dir = TempDir::new().unwrap();
    seed(
        dir.path(),
        &[Album { id: 1, name: "Trip".to_string(), description: None }],
        &[bare_photo(5, "a.jpg", vec![1])],
    );

    let gallery = Gallery::new(Arc::new(FileStore::open(dir.path()).unwrap()));

    gallery
        .update_photo_details(5, Some("New Title"), None, None)
        .await
        .unwrap();

    let details = gallery.photo_details(5, None).await.unwrap();
    assert_eq!(details.title, "New Title");
    assert_eq!(details.description, "");
    assert_eq!(details.id, 5);
    assert_eq!(details.filename, "a.jpg");
    assert_eq!(details.albums, vec!["Trip"]);
}

#[tokio::test]
async fn edits_survive_a_store_reload() {
    let dir = TempDir::new().unwrap();
    seed(
        dir.path(),
        &[Album { id: 1, name: "Trip".to_string(), description: None }],
        &[bare_photo(5, "a.jpg", vec![1]), bare_photo(6, "b.jpg", vec![1])],
    );

    {
        let gallery = Gallery::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        gallery
            .update_photo_details(5, Some("Kept"), Some("Survives reload"), None)
            .await
            .unwrap();
    }

    // A second process opening the same data directory sees the write,
    // and the untouched record is still there.
    let store = FileStore::open(dir.path()).unwrap();
    let photo = store.photo_by_id(5).await.unwrap().unwrap();
    assert_eq!(photo.title, "Kept");
    assert_eq!(photo.description, "Survives reload");
    assert!(store.photo_by_id(6).await.unwrap().is_some());
}
