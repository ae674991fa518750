use crate::error::{GalleryError, Result};
use crate::models::{AlbumPhotos, AlbumSummary, Photo, PhotoDetails, PhotoSummary};
use crate::store::GalleryStore;
use crate::user_models::AuthenticatedUser;
use anyhow::Context;
use std::sync::Arc;

/// Route prefix the server mounts the public photo directory under.
/// Filenames are trusted as stored; whatever seeds them owns sanitization.
pub const IMAGE_PREFIX: &str = "/photos/";

/// The business layer. Holds the injected storage backend and composes
/// port calls into the shapes the presentation layers render.
///
/// Photo-touching operations take a `viewer`: `Some(user_id)` enforces
/// the ownership check (the logged-in CLI), `None` bypasses it (the
/// login-free web app).
pub struct Gallery {
    store: Arc<dyn GalleryStore>,
}

impl Gallery {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    pub async fn list_albums(&self) -> Result<Vec<AlbumSummary>> {
        let albums = self.store.list_albums().await?;
        Ok(albums
            .into_iter()
            .map(|a| AlbumSummary { id: a.id, name: a.name })
            .collect())
    }

    pub async fn photos_in_album(&self, album_id: i64) -> Result<AlbumPhotos> {
        let album_name = match self.store.album_by_id(album_id).await? {
            Some(album) => album.name,
            None => "Unknown album".to_string(),
        };

        let photos: Vec<PhotoSummary> = self
            .store
            .photos_by_album(album_id)
            .await?
            .into_iter()
            .map(|p| PhotoSummary {
                id: p.id,
                title: if p.title.is_empty() { p.filename } else { p.title },
            })
            .collect();

        let count = photos.len();
        Ok(AlbumPhotos { album_name, photos, count })
    }

    pub async fn photo_details(&self, photo_id: i64, viewer: Option<i64>) -> Result<PhotoDetails> {
        let photo = self
            .store
            .photo_by_id(photo_id)
            .await?
            .ok_or(GalleryError::PhotoNotFound)?;
        check_owner(&photo, viewer)?;

        // Resolve album ids to names; dangling ids drop out silently.
        let albums = self.store.list_albums().await?;
        let mut names = Vec::new();
        for album_id in &photo.albums {
            if let Some(album) = albums.iter().find(|a| a.id == *album_id) {
                names.push(album.name.clone());
            }
        }

        let tags = if photo.tags.is_empty() {
            "None".to_string()
        } else {
            photo.tags.join(", ")
        };

        let image_url = format!("{}{}", IMAGE_PREFIX, photo.filename);

        Ok(PhotoDetails {
            id: photo.id,
            title: photo.title,
            description: photo.description,
            filename: photo.filename,
            image_url,
            date: photo.date,
            albums: names,
            tags,
            resolution: photo.resolution,
        })
    }

    /// Partial-field update: a field is applied only when the supplied
    /// value is non-empty after trimming, otherwise the stored value is
    /// kept. A blank field never clears anything.
    pub async fn update_photo_details(
        &self,
        photo_id: i64,
        title: Option<&str>,
        description: Option<&str>,
        viewer: Option<i64>,
    ) -> Result<()> {
        let mut photo = self
            .store
            .photo_by_id(photo_id)
            .await?
            .ok_or(GalleryError::PhotoNotFound)?;
        check_owner(&photo, viewer)?;

        if let Some(title) = title {
            if !title.trim().is_empty() {
                photo.title = title.to_string();
            }
        }
        if let Some(description) = description {
            if !description.trim().is_empty() {
                photo.description = description.to_string();
            }
        }

        if !self.store.update_photo(&photo).await? {
            return Err(GalleryError::PhotoNotFound);
        }
        Ok(())
    }

    /// `None` for unknown user and wrong password alike.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>> {
        let Some(user) = self.store.user_by_username(username).await? else {
            return Ok(None);
        };

        let valid = bcrypt::verify(password, &user.password_hash)
            .context("Failed to verify password hash")?;
        if !valid {
            return Ok(None);
        }

        Ok(Some(AuthenticatedUser {
            id: user.id,
            username: user.username,
        }))
    }

    pub async fn add_tag(&self, photo_id: i64, tag: &str, viewer: Option<i64>) -> Result<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(GalleryError::Invalid("tag must not be blank".to_string()));
        }

        let mut photo = self
            .store
            .photo_by_id(photo_id)
            .await?
            .ok_or(GalleryError::PhotoNotFound)?;
        check_owner(&photo, viewer)?;

        if photo.tags.iter().any(|t| eq_fold(t, tag)) {
            return Err(GalleryError::TagExists);
        }
        photo.tags.push(tag.to_string());

        if !self.store.update_photo(&photo).await? {
            return Err(GalleryError::PhotoNotFound);
        }
        Ok(())
    }

    /// CSV-style listing of an album's photos: a fixed header line, then
    /// one line per photo with its tags colon-joined.
    pub async fn album_report(&self, album_name: &str) -> Result<String> {
        let name = album_name.trim();
        if name.is_empty() {
            return Err(GalleryError::Invalid("album name must not be blank".to_string()));
        }

        // Exact match first, then a folded scan; the port itself only
        // does case-sensitive lookups.
        let album = match self.store.album_by_name(name).await? {
            Some(album) => album,
            None => self
                .store
                .list_albums()
                .await?
                .into_iter()
                .find(|a| eq_fold(&a.name, name))
                .ok_or(GalleryError::AlbumNotFound)?,
        };

        let photos = self.store.photos_by_album(album.id).await?;

        let mut report = String::from("filename,resolution,tags\n");
        for photo in &photos {
            let resolution = photo.resolution.as_deref().unwrap_or("");
            report.push_str(&format!(
                "{},{},{}\n",
                photo.filename,
                resolution,
                photo.tags.join(":")
            ));
        }
        Ok(report)
    }
}

/// Ids arrive loosely typed (URL path segment, prompt input). Non-numeric
/// input is `None`, never a panic past this boundary.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// The one case-insensitive comparison in the codebase; album-name
/// lookups and tag duplicate checks both go through it.
fn eq_fold(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn check_owner(photo: &Photo, viewer: Option<i64>) -> Result<()> {
    if let Some(user_id) = viewer {
        if photo.owner != Some(user_id) {
            return Err(GalleryError::AccessDenied);
        }
    }
    Ok(())
}
