//! # Integration Tests
//!
//! Cross-crate flows over the shared bus.


mod e2e_choreography;
mod flows;
