//! Family-bound HTTP transport.
//!
//! All HTTP-based detection protocols share the same outbound plumbing: a
//! pair of process-wide `reqwest` clients, one restricted to IPv4 sockets
//! and one to IPv6 sockets, plus a single retrying fetch helper. The family
//! restriction lives entirely in the client, so a detection URL whose host
//! name resolves to both families is still probed over the intended family
//! only.

pub mod constants;
pub mod errors;
pub mod functions;
pub mod impls;
pub mod types;
