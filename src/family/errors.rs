// Standard library
use std::net::IpAddr;

// 3rd party crates
use thiserror::Error;

// Project imports
use crate::family::types::IpFamily;

/// Reasons a raw detection result is rejected during normalization.
///
/// Each variant carries its own user-facing message; callers log the error
/// verbatim and fail the attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FamilyError {
    #[error("\"{text}\" is not a valid {family} address")]
    NotAnAddress { family: IpFamily, text: String },

    #[error("{addr} is not a valid {family} address")]
    WrongFamily { family: IpFamily, addr: IpAddr },

    #[error("\"{0}\" carries a zone identifier and cannot be used as a target address")]
    Zoned(String),

    #[error("{0} is the unspecified address")]
    Unspecified(IpAddr),
}
