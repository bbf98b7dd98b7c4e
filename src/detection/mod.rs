//! IP Detection Module
//!
//! This module turns a generic network query into the host's public IP
//! address. It supports several wire-level detection protocols behind one
//! capability contract, and races a primary and an alternative endpoint
//! per protocol so that selective blocking of one endpoint does not cost
//! its full timeout on every detection cycle.
//!
//! # Architecture
//!
//! - Detection protocols implementing the [`Protocol`](traits::Protocol)
//!   trait: constant/static literals, raw HTTP body, regex/field
//!   extraction, DNS-over-HTTPS, local UDP source-address probing, and
//!   local interface scanning
//! - An [`Endpoint`](switch::Endpoint) switch resolving the primary or the
//!   alternative endpoint of a protocol
//! - The [`RaceDetector`](race::types::RaceDetector) coordinator running
//!   both endpoints concurrently ("happy eyeballs") with a delayed
//!   alternative start, first-success-wins selection, and a per-family
//!   memo of the winning endpoint
//! - A binary DNS message codec for the DNS-over-HTTPS protocol
//!
//! # Failure policy
//!
//! Protocols never panic on malformed network input. Every failure path
//! produces exactly one diagnostic line describing the cause and yields
//! `None`; the coordinator only decides when "both endpoints failed"
//! becomes a terminal detection failure.

pub mod constants;
pub mod dns;
pub mod errors;
pub mod functions;
pub mod impls;
pub mod protocols;
pub mod race;
pub mod switch;
pub mod traits;
pub mod types;
