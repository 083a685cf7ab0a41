use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("model error: {0}")]
    Model(String),

    #[error("disease catalog must contain at least one entry")]
    EmptyCatalog,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("malformed upload: {0}")]
    Multipart(String),
}

impl From<axum::extract::multipart::MultipartError> for Error {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Error::Multipart(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
