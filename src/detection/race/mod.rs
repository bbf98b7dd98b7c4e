//! Happy-eyeballs race coordination between the primary and the
//! alternative endpoint of a detection protocol.
//!
//! The coordinator starts the primary attempt immediately and the
//! alternative after a fixed delay (or at once, should the primary fail
//! first), acts on the first success only, remembers the winner per IP
//! family, and cancels the losing attempt. Each attempt logs through its
//! own queued reporter so the user-visible output never interleaves and
//! never contains lines from an outraced or abandoned attempt.

pub mod impls;
pub mod types;
