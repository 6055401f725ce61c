//! # Client Routing
//!
//! - `router` - route table: `/` (listing) and `/skill/:name` (detail)
//! - `navigator` - reversible navigation history over the route table

pub mod navigator;
pub mod router;

pub use navigator::{Location, NavigationError, Navigator};
pub use router::{Route, Router};
