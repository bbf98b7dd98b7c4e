//! Binary DNS message construction and parsing for DNS-over-HTTPS.
//!
//! Only the slice of the DNS wire format the detection engine needs: one
//! TXT question (class CHAOS by convention) and the strict validation of
//! the single-answer response. Responses come from the network and are
//! treated as hostile; every deviation from the expected shape maps to its
//! own [`DnsWireError`](errors::DnsWireError) variant so that a misbehaving
//! or spoofed responder is reported precisely and never coerced into a
//! generic failure.

pub mod errors;
pub mod message;
