use std::path::PathBuf;
use std::time::SystemTime;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Console logging to stderr, plus an optional log file with its own level.
pub fn setup_logging(
    console_level: LevelFilter,
    log_file: Option<PathBuf>,
    file_level: LevelFilter,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colors.color(record.level()),
                message
            ))
        })
        .level(console_level)
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        // Other crates' debug output is noise.
        .level_for("playlist_ripper", LevelFilter::Trace)
        .level(LevelFilter::Info)
        .chain(console);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = fern::log_file(&path)
            .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        humantime::format_rfc3339_seconds(SystemTime::now()),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(file_level)
                .chain(file),
        );
    }

    dispatch
        .apply()
        .wrap_err("Failed to install logger")?;
    Ok(())
}
