//! # Application Layer
//!
//! Service wiring the domain to its ports.

pub mod service;

pub use service::GatewayService;
