use std::{fs::File, path::PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "snake=debug"). The game owns the terminal, so logs only go somewhere
/// useful when `file` is set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub file: Option<PathBuf>,
}

/// Installs the global logger. Call once, early in `main`.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    match effective_filter(config, std::env::var("RUST_LOG").ok()) {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    if let Some(path) = &config.file {
        let file = File::create(path)
            .map_err(|source| Error::LogFile { path: path.clone(), source })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        builder.write_style(env_logger::WriteStyle::Never);
    }

    builder.try_init()?;
    log::debug!("logging initialized");
    Ok(())
}

/// Filter to install: the configured one, else `RUST_LOG`, else "info".
/// Without a log file there is none, since stderr would scribble over the
/// board.
fn effective_filter(config: &LoggingConfig, env_filter: Option<String>) -> Option<String> {
    config.file.as_ref()?;
    config.filter.clone()
        .or(env_filter)
        .or_else(|| Some("info".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(filter: Option<&str>, file: Option<&str>) -> LoggingConfig {
        LoggingConfig { filter: filter.map(String::from), file: file.map(PathBuf::from) }
    }

    #[test]
    fn no_file_means_no_logging_even_with_rust_log() {
        assert_eq!(effective_filter(&config(None, None), Some("debug".into())), None);
        assert_eq!(effective_filter(&config(Some("trace"), None), None), None);
    }

    #[test]
    fn file_logging_prefers_config_then_env_then_info() {
        let with_filter = config(Some("snake=trace"), Some("snake.log"));
        assert_eq!(effective_filter(&with_filter, Some("debug".into())).as_deref(), Some("snake=trace"));

        let plain = config(None, Some("snake.log"));
        assert_eq!(effective_filter(&plain, Some("debug".into())).as_deref(), Some("debug"));
        assert_eq!(effective_filter(&plain, None).as_deref(), Some("info"));
    }
}
