//! # Domain Module
//!
//! Consumer errors and the voting proposal model.

pub mod errors;
pub mod proposal;

pub use errors::*;
pub use proposal::*;
