// 3rd party crates
use thiserror::Error;

// Project imports
use crate::family::types::IpFamily;

/// Errors raised while constructing the shared HTTP transports.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build the {family} HTTP client: {source}")]
    ClientBuild {
        family: IpFamily,
        source: reqwest::Error,
    },
}
