use anyhow::{bail, Context, Result};
use clap::Parser;
use photo_gallery::models::{Album, Photo};
use photo_gallery::user_models::User;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed the fixture catalog into a storage backend", long_about = None)]
struct Cli {
    #[arg(long, default_value = "file", help = "Backend to seed: file or mongo")]
    backend: String,

    #[arg(long, default_value = "data", help = "Data directory for the file backend")]
    data_dir: PathBuf,

    #[arg(long, help = "MongoDB connection string (mongo backend)")]
    mongo_uri: Option<String>,

    #[arg(long, default_value = "gallery", help = "MongoDB database name")]
    mongo_db: String,

    #[arg(long, help = "Overwrite existing data")]
    force: bool,

    #[arg(long, default_value = "demo", help = "Username for the demo account")]
    username: String,

    #[arg(long, default_value = "demo123", help = "Password for the demo account")]
    password: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let password_hash =
        bcrypt::hash(&cli.password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;
    let users = vec![User {
        id: 1,
        username: cli.username.clone(),
        password_hash,
    }];
    let albums = fixture_albums();
    let photos = fixture_photos(1);

    match cli.backend.as_str() {
        "file" => seed_files(&cli, &albums, &photos, &users),
        "mongo" => seed_mongo(&cli, &albums, &photos, &users).await,
        other => bail!("Unknown backend '{}', expected 'file' or 'mongo'", other),
    }
}

fn fixture_albums() -> Vec<Album> {
    vec![
        Album {
            id: 1,
            name: "Trip".to_string(),
            description: Some("Summer road trip".to_string()),
        },
        Album {
            id: 2,
            name: "Nature".to_string(),
            description: None,
        },
    ]
}

fn fixture_photos(owner: i64) -> Vec<Photo> {
    vec![
        Photo {
            id: 1,
            filename: "sunset.jpg".to_string(),
            title: "Sunset over the bay".to_string(),
            description: "Taken from the pier on the last evening".to_string(),
            date: "2024-06-14".parse().ok(),
            resolution: Some("4000x3000".to_string()),
            albums: vec![1],
            tags: vec!["sea".to_string(), "dusk".to_string()],
            owner: Some(owner),
        },
        Photo {
            id: 2,
            filename: "forest-path.jpg".to_string(),
            title: String::new(),
            description: String::new(),
            date: "2024-06-15".parse().ok(),
            resolution: Some("3200x2400".to_string()),
            albums: vec![1, 2],
            tags: vec!["trees".to_string()],
            owner: Some(owner),
        },
        Photo {
            id: 3,
            filename: "heron.jpg".to_string(),
            title: "Grey heron".to_string(),
            description: "Waiting at the riverbank".to_string(),
            date: None,
            resolution: None,
            albums: vec![2],
            tags: Vec::new(),
            owner: Some(owner),
        },
    ]
}

fn seed_files(cli: &Cli, albums: &[Album], photos: &[Photo], users: &[User]) -> Result<()> {
    let dir = &cli.data_dir;
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    for name in ["albums.json", "photos.json", "users.json"] {
        let path = dir.join(name);
        if path.exists() && !cli.force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
    }

    write_collection(&dir.join("albums.json"), albums)?;
    write_collection(&dir.join("photos.json"), photos)?;
    write_collection(&dir.join("users.json"), users)?;

    println!(
        "✅ Seeded {} albums, {} photos, {} user(s) into {}",
        albums.len(),
        photos.len(),
        users.len(),
        dir.display()
    );
    Ok(())
}

fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize fixture")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

async fn seed_mongo(cli: &Cli, albums: &[Album], photos: &[Photo], users: &[User]) -> Result<()> {
    let uri = cli
        .mongo_uri
        .as_deref()
        .context("--mongo-uri is required for the mongo backend")?;

    let client = mongodb::Client::with_uri_str(uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let db = client.database(&cli.mongo_db);

    let albums_coll = db.collection::<Album>("albums");
    let photos_coll = db.collection::<Photo>("photos");
    let users_coll = db.collection::<User>("users");

    let existing = albums_coll
        .estimated_document_count()
        .await
        .context("Failed to inspect the albums collection")?;
    if existing > 0 && !cli.force {
        bail!(
            "Database '{}' already holds albums (use --force to reseed)",
            cli.mongo_db
        );
    }

    if cli.force {
        albums_coll.drop().await.context("Failed to drop albums")?;
        photos_coll.drop().await.context("Failed to drop photos")?;
        users_coll.drop().await.context("Failed to drop users")?;
    }

    albums_coll
        .insert_many(albums)
        .await
        .context("Failed to insert albums")?;
    photos_coll
        .insert_many(photos)
        .await
        .context("Failed to insert photos")?;
    users_coll
        .insert_many(users)
        .await
        .context("Failed to insert users")?;

    println!(
        "✅ Seeded {} albums, {} photos, {} user(s) into database '{}'",
        albums.len(),
        photos.len(),
        users.len(),
        cli.mongo_db
    );
    Ok(())
}
