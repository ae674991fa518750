use clap::{Parser, Subcommand};
use photo_gallery::file_store::FileStore;
use photo_gallery::gallery::Gallery;
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "A CLI tool for browsing and editing your photo catalog", long_about = None)]
struct Cli {
    #[arg(short, long, help = "Username")]
    username: String,

    #[arg(short, long, help = "Password")]
    password: String,

    #[arg(short, long, default_value = "data", help = "Directory holding the JSON collections")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List all albums")]
    Albums,

    #[command(about = "Show details for one of your photos")]
    Photo {
        #[arg(help = "Photo ID")]
        id: i64,
    },

    #[command(about = "Update a photo's title and/or description")]
    Edit {
        #[arg(help = "Photo ID")]
        id: i64,

        #[arg(short, long, help = "New title")]
        title: Option<String>,

        #[arg(short = 'e', long, help = "New description")]
        description: Option<String>,
    },

    #[command(about = "Add a tag to a photo")]
    Tag {
        #[arg(help = "Photo ID")]
        id: i64,

        #[arg(help = "Tag to add")]
        tag: String,
    },

    #[command(about = "Print a CSV report for an album")]
    Report {
        #[arg(help = "Album name (case-insensitive)")]
        album: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = Arc::new(FileStore::open(&cli.data_dir)?);
    let gallery = Gallery::new(store);

    let user = gallery
        .authenticate(&cli.username, &cli.password)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Invalid username or password"))?;
    // Every photo-touching command runs with the ownership guard on.
    let viewer = Some(user.id);

    match cli.command {
        Commands::Albums => {
            let albums = gallery.list_albums().await?;
            if albums.is_empty() {
                println!("📭 No albums found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.add_row(Row::new(vec![Cell::new("ID"), Cell::new("Name")]));
            for album in albums {
                table.add_row(Row::new(vec![
                    Cell::new(&album.id.to_string()),
                    Cell::new(&album.name),
                ]));
            }
            table.printstd();
        }

        Commands::Photo { id } => {
            let details = gallery.photo_details(id, viewer).await?;

            println!("🖼  Photo {}", details.id);
            println!("   Title: {}", details.title);
            println!("   Description: {}", details.description);
            println!("   File: {}", details.filename);
            if let Some(date) = details.date {
                println!("   Date: {}", date);
            }
            if let Some(resolution) = &details.resolution {
                println!("   Resolution: {}", resolution);
            }
            println!("   Albums: {}", details.albums.join(", "));
            println!("   Tags: {}", details.tags);
        }

        Commands::Edit { id, title, description } => {
            gallery
                .update_photo_details(id, title.as_deref(), description.as_deref(), viewer)
                .await?;
            println!("✅ Photo {} updated", id);
        }

        Commands::Tag { id, tag } => {
            gallery.add_tag(id, &tag, viewer).await?;
            println!("✅ Tag '{}' added to photo {}", tag, id);
        }

        Commands::Report { album } => {
            let report = gallery.album_report(&album).await?;
            print!("{}", report);
        }
    }

    Ok(())
}
