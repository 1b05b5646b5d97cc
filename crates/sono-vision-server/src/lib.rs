//! SonoVision HTTP server — organ identification, diagnosis and probe navigation.

pub mod config;
pub mod handlers;
pub mod state;
pub mod transport;
pub mod types;

pub use config::{ConfigOverrides, ServerConfig};
pub use state::AppState;
pub use transport::{router, HttpTransport};
