// Standard library
use std::net::IpAddr;

// Current module imports
use super::errors::FamilyError;
use super::types::IpFamily;

/// Checks that an already-parsed address is usable as a detection result
/// for the given family: specified, and of the requested family.
pub fn normalize(family: IpFamily, addr: IpAddr) -> Result<IpAddr, FamilyError> {
    if addr.is_unspecified() {
        return Err(FamilyError::Unspecified(addr));
    }
    if !family.matches(&addr) {
        return Err(FamilyError::WrongFamily { family, addr });
    }
    Ok(addr)
}

/// Parses a textual detection result and normalizes it.
///
/// A zone identifier (`fe80::1%eth0`) is rejected before parsing so the
/// operator sees what was wrong instead of a generic parse failure.
pub fn parse_address(family: IpFamily, text: &str) -> Result<IpAddr, FamilyError> {
    let text = text.trim();
    if text.contains('%') {
        return Err(FamilyError::Zoned(text.to_string()));
    }
    let addr: IpAddr = text.parse().map_err(|_| FamilyError::NotAnAddress {
        family,
        text: text.to_string(),
    })?;
    normalize(family, addr)
}
