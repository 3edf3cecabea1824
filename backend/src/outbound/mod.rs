//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel.
//! - **memory**: the same ports over process memory.
//! - **token**: HS256 bearer token issuing and verification.

pub mod memory;
pub mod persistence;
pub mod token;
