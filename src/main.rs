use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use photo_gallery::config::Config;
use photo_gallery::error::GalleryError;
use photo_gallery::gallery::{parse_id, Gallery};
use photo_gallery::models::{AlbumPhotos, AlbumSummary, PhotoDetails, UpdatePhotoRequest};
use photo_gallery::store;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

struct AppState {
    gallery: Gallery,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");
    let gallery_store = store::open_store(&config)
        .await
        .expect("Failed to initialize storage");

    let app_state = Arc::new(AppState {
        gallery: Gallery::new(gallery_store),
    });

    let app = Router::new()
        .route("/albums", get(list_albums))
        .route("/album/:id", get(album_details))
        .route("/photo/:id", get(photo_details))
        .route("/photo/:id", post(edit_photo))
        .nest_service("/photos", ServeDir::new(&config.public_dir))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    println!("🚀 Photo gallery running on http://{}", addr);
    println!("📋 Endpoints:");
    println!("   GET  /albums    - List albums");
    println!("   GET  /album/:id - Photos in an album");
    println!("   GET  /photo/:id - Photo details");
    println!("   POST /photo/:id - Update photo title/description");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn list_albums(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AlbumSummary>>, (StatusCode, String)> {
    let albums = state.gallery.list_albums().await.map_err(error_response)?;
    Ok(Json(albums))
}

async fn album_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AlbumPhotos>, (StatusCode, String)> {
    let album_id = parse_id(&id)
        .ok_or((StatusCode::NOT_FOUND, "Album not found".to_string()))?;

    let info = state
        .gallery
        .photos_in_album(album_id)
        .await
        .map_err(error_response)?;
    Ok(Json(info))
}

async fn photo_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PhotoDetails>, (StatusCode, String)> {
    let photo_id = parse_id(&id)
        .ok_or((StatusCode::NOT_FOUND, "Photo not found".to_string()))?;

    let details = state
        .gallery
        .photo_details(photo_id, None)
        .await
        .map_err(error_response)?;
    Ok(Json(details))
}

async fn edit_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePhotoRequest>,
) -> Result<Json<PhotoDetails>, (StatusCode, String)> {
    let photo_id = parse_id(&id)
        .ok_or((StatusCode::NOT_FOUND, "Photo not found".to_string()))?;

    state
        .gallery
        .update_photo_details(
            photo_id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            None,
        )
        .await
        .map_err(error_response)?;

    // Answer with the fresh detail view so the client can re-render it.
    let details = state
        .gallery
        .photo_details(photo_id, None)
        .await
        .map_err(error_response)?;
    Ok(Json(details))
}

fn error_response(err: GalleryError) -> (StatusCode, String) {
    let status = match &err {
        GalleryError::PhotoNotFound | GalleryError::AlbumNotFound => StatusCode::NOT_FOUND,
        GalleryError::AccessDenied => StatusCode::FORBIDDEN,
        GalleryError::TagExists | GalleryError::Invalid(_) => StatusCode::BAD_REQUEST,
        GalleryError::Storage(detail) => {
            // Detail stays server-side; the client gets a generic answer.
            tracing::error!("storage failure: {:#}", detail);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };
    (status, err.to_string())
}
