//! HTTP endpoint handlers.

pub mod analyze;
pub mod describe;
pub mod form;
pub mod identify;
pub mod info;
pub mod navigate;
pub mod registry;

pub use registry::EndpointRegistry;
