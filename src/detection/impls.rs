// Standard library
use std::fmt;

// 3rd party crates
use regex::Regex;

// Project imports
use crate::family::functions::parse_address;
use crate::family::types::IpFamily;

// Current module imports
use super::errors::DetectionValidationError;
use super::types::{DetectMethod, DetectionConfig};

impl fmt::Display for DetectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectMethod::Unspecified => write!(f, "unspecified"),
            DetectMethod::Primary => write!(f, "primary"),
            DetectMethod::Alternative => write!(f, "alternative"),
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), DetectionValidationError> {
        if self.timeout == 0 {
            return Err(DetectionValidationError::InvalidTimeout(self.timeout));
        }

        let families = self.detect_families()?;

        match self.protocol.as_str() {
            "doh" | "http" | "trace" | "udp" => {}
            "regex" => {
                let pattern = self
                    .pattern
                    .as_deref()
                    .ok_or(DetectionValidationError::MissingPattern)?;
                Regex::new(pattern).map_err(|source| {
                    DetectionValidationError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    }
                })?;
            }
            "interface" => {
                if self.interface.as_deref().unwrap_or("").trim().is_empty() {
                    return Err(DetectionValidationError::MissingInterface);
                }
            }
            "static" => {
                for family in families {
                    let literal = match family {
                        IpFamily::V4 => self.ipv4.as_deref(),
                        IpFamily::V6 => self.ipv6.as_deref(),
                    };
                    let literal =
                        literal.ok_or(DetectionValidationError::MissingStaticAddress)?;
                    parse_address(family, literal)?;
                }
            }
            other => {
                return Err(DetectionValidationError::UnknownProtocol(other.to_string()));
            }
        }

        Ok(())
    }

    /// The families detection runs for, in configuration order.
    pub fn detect_families(&self) -> Result<Vec<IpFamily>, DetectionValidationError> {
        if self.families.is_empty() {
            return Err(DetectionValidationError::NoFamilies);
        }
        self.families
            .iter()
            .map(|name| match name.to_lowercase().as_str() {
                "ipv4" | "v4" => Ok(IpFamily::V4),
                "ipv6" | "v6" => Ok(IpFamily::V6),
                other => Err(DetectionValidationError::UnknownFamily(other.to_string())),
            })
            .collect()
    }
}
