//! Embed handler system
//!
//! This module provides the capability interface and registry for embed
//! handlers: pluggable strategies that recognize one family of frame URLs
//! and optionally supply config extraction, a custom overlay, and URL
//! rewriting for it.
//!
//! ## Key Components
//!
//! - [`EmbedHandler`] - Capability trait implemented per embed family
//! - [`MapsHandler`] - Built-in handler for the Google Maps embed family
//! - [`HandlerRegistry`] - Order-preserving, first-match-wins registry
//! - [`OverlaySpec`] - Declarative overlay descriptor rendered by the host
//!
//! ## Example
//!
//! ```rust,ignore
//! use framebox::handlers::HandlerRegistry;
//!
//! let registry = HandlerRegistry::with_defaults();
//! if let Some(handler) = registry.resolve(src) {
//!     let config = handler.extract_config(src);
//!     let rewritten = handler.update_url(src, &params);
//! }
//! ```

mod maps;
mod registry;
mod traits;

pub use maps::MapsHandler;
pub use registry::HandlerRegistry;
pub use traits::{EmbedHandler, HandlerConfigMap, HandlerParams, OverlaySpec};
