use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("cannot parse config {}: {source}", .path.display())]
    ConfigParse { path: PathBuf, source: toml::de::Error },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("cannot access score file {}: {source}", .path.display())]
    StoreIo { path: PathBuf, source: io::Error },

    #[error("score file {} is corrupt: {source}", .path.display())]
    StoreFormat { path: PathBuf, source: serde_json::Error },

    #[error("terminal is too small ({columns}x{rows}) for the board")]
    BoardTooSmall { columns: u16, rows: u16 },

    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile { path: PathBuf, source: io::Error },

    #[error("cannot install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;
