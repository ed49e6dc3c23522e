use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Config, LogLevel};

/// Messages at `level` and above.
fn level_filter(level: LogLevel) -> LevelFilter {
    let level = match level {
        LogLevel::Critical => Level::Critical,
        LogLevel::Error => Level::Error,
        LogLevel::Warn => Level::Warn,
        LogLevel::Info => Level::Info,
        LogLevel::Debug => Level::Debug,
        LogLevel::Trace => Level::Trace,
    };
    LevelFilter::MoreSevereEqual(level)
}

// stdout carries command output (JSON listings), logs never go there
fn add_console_sink(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    let stderr = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .build()?);
    builder.sink(stderr);
    Ok(())
}

/// Replaces the default logger.
///
/// Without a `[log]` section everything from `Info` up goes to stderr.
/// With one, the rotating file sink is added when `location` is set and
/// stderr is kept only if `log_to_console` is on.
pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let mut builder = Logger::builder();

    let filter = match config.log {
        None => {
            add_console_sink(&mut builder)?;
            LevelFilter::MoreSevereEqual(Level::Info)
        }
        Some(ref log) => {
            if let Some(ref location) = log.location {
                let daily_sink = Arc::new(RotatingFileSink::builder()
                    .base_path(location)
                    .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
                    .max_files(30)
                    .rotate_on_open(false)
                    .build()?);
                builder.sink(daily_sink);
            }
            if log.log_to_console {
                add_console_sink(&mut builder)?;
            }
            level_filter(log.level)
        }
    };

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Warn));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(filter);

    spdlog::set_default_logger(logger);

    Ok(())
}
