use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use freya_updater::config::{EXIT_NOT_INITIALIZED, UpdaterConfig};
use freya_updater::update::applier::UpdateApplier;
use freya_updater::update::deletion::LocalFilesystem;
use freya_updater::update::download::HttpDownloader;
use freya_updater::update::error::UpdateError;
use freya_updater::update::hooks::{DeletionManifestHook, VersionMarkerHook};
use freya_updater::update::manifest::HttpManifestSource;
use freya_updater::update::runner::Updater;
use freya_updater::update::version_store::VersionStore;

#[derive(Parser)]
#[command(name = "freya-updater")]
#[command(version, about = "Applies pending release archives in manifest order")]
struct Cli {
    /// Installation root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Manifest URL, overriding the configured one
    #[arg(long, global = true)]
    manifest_url: Option<String>,

    /// Config file (defaults to <root>/updater.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List pending updates without applying them
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let mut config = UpdaterConfig::load(&root, cli.config.as_deref())?;
    if let Some(url) = cli.manifest_url {
        config.manifest_url = url;
    }

    let _guard = freya_updater::logging::init(&config.log)?;

    let updater = build_updater(&root, &config)?;
    let command = cli.command;

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            match command {
                None => updater.run().await.map(|_| ()),
                Some(Command::Check) => updater.check().await.map(|check| {
                    if let Some(outcome) = check.idle_outcome() {
                        info!("{}", outcome.message());
                    }
                    for entry in &check.pending {
                        info!("Pending: {} ({})", entry.version, entry.download_url);
                    }
                }),
            }
        });

    Ok(match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(UpdateError::MissingVersionFile(path)) => {
            error!("{} not found. Exiting...", path.display());
            ExitCode::from(EXIT_NOT_INITIALIZED)
        }
        Err(e) => {
            error!("Update failed: {}", e);
            ExitCode::FAILURE
        }
    })
}

fn build_updater(root: &Path, config: &UpdaterConfig) -> anyhow::Result<Updater> {
    let client = config.http_client()?;

    let applier = UpdateApplier::new(
        Arc::new(HttpDownloader::new(client.clone())),
        root.to_path_buf(),
        config.archive_dir(),
    )
    .with_hook(DeletionManifestHook::new(
        &config.deletion_manifest,
        Arc::new(LocalFilesystem),
    ))
    .with_hook(VersionMarkerHook::new(&config.version_file));

    Ok(Updater::new(
        VersionStore::in_root(root, &config.version_file),
        Arc::new(HttpManifestSource::new(client, &config.manifest_url)),
        applier,
    ))
}
