mod config;
mod download;
mod logging;
mod metadata;
mod models;
mod pipeline;
mod playlist_file;
mod ports;
mod services;
#[cfg(test)]
mod test_utils;
mod title;
mod ytdlp;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::WrapErr};

use crate::{
    config::Config,
    logging::setup_logging,
    pipeline::{PlaylistDriver, RunReport},
    playlist_file::load_playlists,
    services::{delay::TokioDelay, tag_writer::AudiotagsWriter, ytdlp::YtDlpAdapter},
    ytdlp::YtDlpClient,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_RIPPER_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_RIPPER_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download, rename and tag every playlist listed in a file
    Download {
        /// Playlist file, one `Artist - Album|URL` per line
        playlist_file: PathBuf,

        /// Root directory for the per-artist folders
        #[arg(short, long, env = "PLAYLIST_RIPPER_OUTPUT_DIRECTORY")]
        output_directory: Option<PathBuf>,

        /// How many tracks to download at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Attempts per track before giving up
        #[arg(long)]
        max_retries: Option<u32>,

        /// Move on to the next playlist when one can't be listed
        #[arg(long)]
        continue_on_error: bool,

        /// Also download live, remix, acoustic, ... versions
        #[arg(long)]
        include_alternate_versions: bool,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Playlist ripper starting");
    log::debug!("Loading configuration");

    let mut config = {
        if let Some(config) = args.config {
            Config::from_file(&config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load playlist-ripper config")?;

    match args.command {
        Commands::Download {
            playlist_file,
            output_directory,
            concurrency,
            max_retries,
            continue_on_error,
            include_alternate_versions,
        } => {
            if let Some(output_directory) = output_directory {
                config.music_directory = output_directory.to_string_lossy().into_owned();
            }
            if let Some(concurrency) = concurrency {
                config.concurrency = concurrency;
            }
            if let Some(max_retries) = max_retries {
                config.max_retries = max_retries;
            }
            config.continue_on_playlist_error |= continue_on_error;
            config.include_alternate_versions |= include_alternate_versions;

            let settings = config.driver_settings()?;
            let playlists = load_playlists(&playlist_file).wrap_err("Failed to load playlist file")?;

            let ytdlp = Arc::new(YtDlpAdapter::new(YtDlpClient::new(&config.ytdlp_path)?));
            let driver = PlaylistDriver::new(
                settings,
                ytdlp.clone(),
                ytdlp,
                Arc::new(AudiotagsWriter),
                Arc::new(TokioDelay),
            );

            log::debug!("Starting download of {} playlist(s)", playlists.len());
            tokio::select! {
                report = driver.run(&playlists) => {
                    let report = report?;
                    print_summary(&report);
                    log::info!("Download command completed successfully");
                }
                _ = tokio::signal::ctrl_c() => {
                    // Dropping the run kills outstanding yt-dlp processes.
                    log::warn!("Interrupted, stopping outstanding downloads");
                    println!("Interrupted. Files finished so far were kept.");
                }
            }
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config at {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    for playlist in &report.playlists {
        println!(
            "{} - {}: {} downloaded, {} failed, {} skipped, {} tagged -> {}",
            playlist.artist,
            playlist.album,
            playlist.downloaded,
            playlist.failed,
            playlist.skipped,
            playlist.tagged,
            playlist.output_directory.display()
        );
    }
    for failed in &report.failed_playlists {
        println!("Failed playlist {}: {}", failed.url, failed.error);
    }
}
