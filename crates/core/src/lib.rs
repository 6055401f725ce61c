//! # SkillHub Core
//!
//! Client-side building blocks for browsing a skills catalog served by a
//! separate backend.
//!
//! ## Architecture
//!
//! - `models` - Skill summary/detail wire types (pass-through)
//! - `client` - HTTP client for `/api/v1` and the Markdown endpoints
//! - `routing` - Route table (`/`, `/skill/:name`) and navigation history
//! - `views` - Route-to-data loading with cancellation of stale loads
//! - `proxy` - Build output and dev-server forwarding rules
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skillhub_core::client::{ClientConfig, SkillsClient};
//! use skillhub_core::routing::Router;
//! use skillhub_core::views::ViewLoader;
//!
//! let client = SkillsClient::new(ClientConfig::new("http://localhost:8080"))?;
//! let route = Router::new().resolve("/skill/pdf-toolkit").unwrap();
//! let view = ViewLoader::new(std::sync::Arc::new(client)).load(&route, None).await?;
//! ```

pub mod client;
pub mod models;
pub mod proxy;
pub mod routing;
pub mod views;
