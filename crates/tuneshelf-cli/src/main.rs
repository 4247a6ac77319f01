//! TuneShelf CLI: browse and edit a song/video library whose metadata lives in storage keys.
//!
//! Storage commands read STORAGE_BACKEND and the backend settings from the
//! environment (or `.env`). `encode`, `decode`, `translate` and `tags` work offline.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tuneshelf_cli::{error_message, format_size, init_tracing, truncate_string};
use tuneshelf_core::codec::split_extension;
use tuneshelf_core::content_type::kind_for_extension;
use tuneshelf_core::{
    AppError, Config, ErrorMetadata, KeyCodec, LocalLexicon, LogLevel, MediaAsset, MediaKind,
};
use tuneshelf_services::{create_storage, segment_of, MediaLibrary};

#[derive(Parser)]
#[command(name = "tuneshelf", about = "TuneShelf media library CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List assets with their decoded names and tags
    List {
        /// Filter by kind: song or video (default: both)
        #[arg(long)]
        kind: Option<MediaKind>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Upload a file under an encoded key
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Display name (default: decoded or translated file name)
        #[arg(long)]
        name: Option<String>,
        /// Tag, repeatable; a leading '#' is added when missing
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Kind: song or video (default: guessed from the extension)
        #[arg(long)]
        kind: Option<MediaKind>,
    },
    /// Give an asset a new display name and tags
    Rename {
        /// Full storage key, e.g. songs/v3-enc-....mp3
        key: String,
        /// New display name
        #[arg(long)]
        name: String,
        /// Tag, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete an asset by key
    Delete {
        /// Full storage key
        key: String,
    },
    /// Suggest a translated name and inferred tags for a key
    Calibrate {
        /// Full storage key
        key: String,
        /// Rename the asset to the suggestion
        #[arg(long)]
        apply: bool,
    },
    /// Print the encoded filename for a name and tags
    Encode {
        /// Display name
        #[arg(long)]
        name: String,
        /// Tag, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Extension without the leading dot
        #[arg(long, default_value = "mp3")]
        ext: String,
    },
    /// Decode a filename or key into its display name and tags
    Decode {
        /// Filename or full storage key
        key: String,
    },
    /// Translate a pinyin/romanized name with the built-in lexicon
    Translate {
        /// Text to translate
        text: String,
    },
    /// Infer tags from a title and artist
    Tags {
        /// Song title
        #[arg(long, default_value = "")]
        title: String,
        /// Artist name
        #[arg(long, default_value = "")]
        artist: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Log an [`AppError`] at its own level and turn it into a user-facing error.
fn report(err: AppError) -> anyhow::Error {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            error = %err,
            code = err.error_code(),
            recoverable = err.is_recoverable(),
            "Command failed"
        ),
        LogLevel::Warn => tracing::warn!(
            error = %err,
            code = err.error_code(),
            recoverable = err.is_recoverable(),
            "Command failed"
        ),
        LogLevel::Error => tracing::error!(
            error = %err,
            code = err.error_code(),
            recoverable = err.is_recoverable(),
            "Command failed"
        ),
    }

    anyhow::anyhow!(error_message(&err))
}

async fn open_library() -> anyhow::Result<MediaLibrary> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let storage = create_storage(&config)
        .await
        .map_err(|e| report(e.into()))
        .context("Failed to initialize storage backend")?;

    tracing::debug!(
        backend = %storage.backend_type(),
        environment = %config.environment(),
        "Storage backend ready"
    );

    Ok(MediaLibrary::from_config(storage, &config))
}

fn print_asset_table(assets: &[MediaAsset]) {
    if assets.is_empty() {
        println!("No assets found.");
        return;
    }

    println!(
        "{:<6} {:<32} {:<24} {:>10} {:>20}  Key",
        "Kind", "Name", "Tags", "Size", "Modified"
    );
    println!("{}", "-".repeat(120));

    for asset in assets {
        let modified = asset
            .last_modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let name = if asset.encoded {
            asset.display_name().to_string()
        } else {
            format!("{} *", asset.display_name())
        };

        println!(
            "{:<6} {:<32} {:<24} {:>10} {:>20}  {}",
            asset.kind,
            truncate_string(&name, 32),
            truncate_string(&asset.tags().join(" "), 24),
            format_size(asset.size_bytes),
            modified,
            asset.key
        );
    }

    println!("\n{} assets (* = legacy key)", assets.len());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { kind, format } => {
            let library = open_library().await?;
            let assets = match kind {
                Some(kind) => library.list(kind).await,
                None => library.list_all().await,
            }
            .map_err(report)?;

            match format {
                OutputFormat::Json => print_json(&assets)?,
                OutputFormat::Table => print_asset_table(&assets),
            }
        }
        Commands::Upload {
            file,
            name,
            tags,
            kind,
        } => {
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("File name is not valid UTF-8")?;
            let (_, extension) = split_extension(filename);
            let extension = extension.context("File has no extension")?;
            let kind = match kind.or_else(|| kind_for_extension(extension)) {
                Some(kind) => kind,
                None => anyhow::bail!(
                    "Cannot guess the kind of '.{}' files, pass --kind song or --kind video",
                    extension
                ),
            };
            let name = name.unwrap_or_else(|| KeyCodec::default().decode(filename).display_name);

            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let library = open_library().await?;
            let asset = library
                .upload(kind, data, &name, &tags, extension)
                .await
                .map_err(report)?;
            print_json(&asset)?;
        }
        Commands::Rename { key, name, tags } => {
            let library = open_library().await?;
            let asset = library
                .rename(&key, &name, &tags)
                .await
                .map_err(report)?;
            print_json(&asset)?;
        }
        Commands::Delete { key } => {
            let library = open_library().await?;
            library.delete(&key).await.map_err(report)?;
            print_json(&serde_json::json!({ "success": true, "message": format!("{} deleted", key) }))?;
        }
        Commands::Calibrate { key, apply } => {
            let library = open_library().await?;
            let calibration = library.calibrate(&key, apply).await.map_err(report)?;
            print_json(&calibration)?;
        }
        Commands::Encode { name, tags, ext } => {
            let filename = KeyCodec::encode(&name, &tags, &ext);
            print_json(&serde_json::json!({ "filename": filename }))?;
        }
        Commands::Decode { key } => {
            let segment = segment_of(&key);
            let metadata = KeyCodec::default().decode(segment);
            print_json(&serde_json::json!({
                "filename": segment,
                "encoded": KeyCodec::is_encoded(segment),
                "display_name": metadata.display_name,
                "tags": metadata.tags,
            }))?;
        }
        Commands::Translate { text } => {
            let translated = LocalLexicon::builtin().translate(&text);
            print_json(&serde_json::json!({ "input": text, "translated": translated }))?;
        }
        Commands::Tags { title, artist } => {
            let tags = LocalLexicon::builtin().extract_tags(&title, &artist);
            print_json(&tags)?;
        }
    }

    Ok(())
}
