// 3rd party crates
use thiserror::Error;

// Project imports
use crate::family::errors::FamilyError;

/// Errors found while validating the detection section of the settings.
#[derive(Debug, Error)]
pub enum DetectionValidationError {
    #[error("Unknown detection protocol \"{0}\". Must be one of: doh, http, trace, regex, udp, interface, static")]
    UnknownProtocol(String),

    #[error("Request timeout must be greater than 0, got {0}")]
    InvalidTimeout(u64),

    #[error("No detection families configured")]
    NoFamilies,

    #[error("Unknown detection family \"{0}\". Must be \"ipv4\" or \"ipv6\"")]
    UnknownFamily(String),

    #[error("The \"regex\" protocol requires a pattern")]
    MissingPattern,

    #[error("Invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("The \"interface\" protocol requires an interface name")]
    MissingInterface,

    #[error("The \"static\" protocol requires an address for every configured family")]
    MissingStaticAddress,

    #[error("Invalid literal address: {0}")]
    InvalidAddress(#[from] FamilyError),
}
