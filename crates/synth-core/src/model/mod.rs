//! Modelos neutrales (FingerprintId, Ticket).

pub mod fingerprint;
pub mod ticket;

pub use fingerprint::{fingerprint_of, FingerprintId};
pub use ticket::Ticket;
