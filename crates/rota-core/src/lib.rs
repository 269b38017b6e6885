//! Rota Core - Delivery route planning from a photographed delivery list.
//!
//! Rota sends a picture of a handwritten or printed delivery list to a
//! multimodal model (Gemini, optionally grounded with Google Maps) and asks it
//! to split the deliveries into one ordered route per driver. The answer is
//! parsed, checked against the route schema, and returned as typed data.
//!
//! # Architecture
//!
//! ```text
//! Image → Request (prompt + image + key) → Gemini → Normalize → Parse/Validate → Routes
//! ```
//!
//! The API key is never held by the core; callers resolve it (see
//! [`credentials`]) and pass it in on every call.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rota_core::{Config, ImageInput, RouteOptimizer};
//!
//! #[tokio::main]
//! async fn main() -> rota_core::Result<()> {
//!     let config = Config::load()?;
//!     let optimizer = RouteOptimizer::from_config(&config, None)?;
//!
//!     let image = ImageInput::from_path("./lista.jpg".as_ref(), &config.limits)?;
//!     let result = optimizer.optimize("my-api-key", image, 2).await?;
//!     for route in result.routes() {
//!         println!("{}: {} stops", route.driver_label, route.stops.len());
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod credentials;
pub mod error;
pub mod input;
pub mod interpret;
pub mod llm;
pub mod optimizer;
pub mod output;
pub mod request;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use credentials::{resolve_api_key, CredentialSource, CredentialStore, MemoryCredentialStore};
pub use error::{ConfigError, OptimizeError, OptimizeResult, Result, RotaError};
pub use input::ImageInput;
pub use optimizer::RouteOptimizer;
pub use output::{OutputFormat, OutputWriter};
pub use request::{PromptLanguage, RequestBuilder, RouteRequest};
pub use session::{OptimizationSession, SessionState};
pub use types::{Citation, CitationSource, DeliveryStop, DriverRoute, OptimizationResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_optimizer() {
        let optimizer = RouteOptimizer::from_config(&Config::default(), None).unwrap();
        assert_eq!(optimizer.provider_name(), "gemini");
        assert_eq!(optimizer.model(), "gemini-2.5-flash");
    }
}
