use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    File,
    Mongo,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub public_dir: PathBuf,
    pub mongo_uri: Option<String>,
    pub mongo_db: String,
    pub port: u16,
}

impl Config {
    /// Read configuration from the environment. Validates backend
    /// selection up front so a misconfigured process dies at startup
    /// with a descriptive message, not on the first request.
    pub fn from_env() -> Result<Self> {
        let backend = match env::var("GALLERY_BACKEND").as_deref() {
            Ok("file") | Err(_) => Backend::File,
            Ok("mongo") => Backend::Mongo,
            Ok(other) => bail!("Unknown GALLERY_BACKEND '{}', expected 'file' or 'mongo'", other),
        };

        let data_dir = env::var("GALLERY_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let public_dir = env::var("GALLERY_PUBLIC_DIR").unwrap_or_else(|_| "public".to_string());

        let mongo_uri = env::var("MONGODB_URI").ok();
        let mongo_db = env::var("MONGODB_DB").unwrap_or_else(|_| "gallery".to_string());

        if backend == Backend::Mongo && mongo_uri.is_none() {
            bail!("GALLERY_BACKEND=mongo requires MONGODB_URI to be set");
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => 8000,
        };

        Ok(Self {
            backend,
            data_dir: PathBuf::from(data_dir),
            public_dir: PathBuf::from(public_dir),
            mongo_uri,
            mongo_db,
            port,
        })
    }
}
