//! fOS Components
//!
//! Custom elements with scoped listener cleanup and content-addressed,
//! scoped stylesheets.
//!
//! # Example
//! ```rust,ignore
//! use fos_components::{Config, Runtime};
//! use fos_components::dom::{ComponentDefinition, Hooks};
//!
//! let runtime = Runtime::new(Config::default());
//! runtime.register_custom_tag("x-greeting", ComponentDefinition::new(|_| Hooks::new()));
//! let mut doc = runtime.create_document();
//! let el = doc.create_element("x-greeting");
//! doc.append_child(&el);
//! ```

mod config;
mod logging;
mod runtime;

pub use config::Config;
pub use logging::init_logging;
pub use runtime::Runtime;

// Re-export sub-crates for advanced usage
pub use fos_css as css;
pub use fos_dom as dom;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
