use thiserror::Error;

/// Pipeline stage that failed to find a usable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vector,
    Raster,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Vector => f.write_str("vector"),
            Stage::Raster => f.write_str("raster"),
        }
    }
}

/// Errors that can occur while extracting a shape from an input document.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("malformed vector document: {0}")]
    Document(String),

    #[error("no shape found in {0} input")]
    NoShape(Stage),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the routing and geocoding collaborators.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("malformed service response: {0}")]
    Malformed(String),

    #[error("location not found")]
    NotFound,

    #[error("a snap request is already in flight")]
    Busy,
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ServiceError::Status(status.as_u16()),
            None if err.is_decode() => ServiceError::Malformed(err.to_string()),
            None => ServiceError::Unreachable(err.to_string()),
        }
    }
}
