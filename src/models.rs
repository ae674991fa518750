use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference data: albums are seeded externally and never created,
/// renamed or deleted by the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub filename: String,
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub resolution: Option<String>,
    #[serde(default)]
    pub albums: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub owner: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: i64,
    pub name: String,
}

/// One row of an album's photo listing. `title` falls back to the
/// filename when the stored title is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSummary {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumPhotos {
    pub album_name: String,
    pub photos: Vec<PhotoSummary>,
    pub count: usize,
}

/// Display-ready photo detail: album ids resolved to names, tags joined
/// into a single string, image URL built from the public asset prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoDetails {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub image_url: String,
    pub date: Option<NaiveDate>,
    pub albums: Vec<String>,
    pub tags: String,
    pub resolution: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePhotoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}
