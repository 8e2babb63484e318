//! Client-side interface for the PriceDB program.
//!
//! Defines the fixed byte layouts of the program's accounts and the typed
//! builders that produce its instruction payloads. Everything here is pure:
//! no I/O, no signing, no network.

pub mod error;
pub mod instructions;
pub mod state;
