use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid proxy format: {0}")]
    InvalidProxyFormat(String),

    #[error("unsupported proxy scheme: {0}")]
    UnsupportedProxyScheme(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
