// 3rd party crates
use thiserror::Error;

// Project imports
use crate::detection::errors::DetectionValidationError;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("Detection configuration error: {0}")]
    DetectionConfig(#[from] DetectionValidationError),
}
