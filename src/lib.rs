pub mod config;
pub mod error;
pub mod page;
pub mod provider;
pub mod server;

pub use config::AppConfig;
pub use error::GatewayError;
pub use provider::{ImageProvider, MockImageProvider, ProviderError};
pub use server::build_router;
