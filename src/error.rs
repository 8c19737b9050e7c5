use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("render {chart}: {source}")]
    Render {
        chart: &'static str,
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
