//! heaplog-pages - routing and page state for the heaplog web UI
//!
//! ## Modules
//!
//! - [`router`]: route templates (`/query/:id`), matching, and the route table
//! - [`page`]: the reactive [`PageStore`](page::PageStore), [`Navigator`](page::Navigator)
//!   and history backends
//! - [`config`]: route tables loaded from JSON or TOML
//! - [`logging`]: console/`tracing` logging macros
//!
//! ## Example
//!
//! ```
//! use heaplog_pages::config::RouteConfig;
//! use heaplog_pages::page::{MemoryHistory, Navigator, PageStore};
//! use heaplog_pages::router::Router;
//! use std::rc::Rc;
//!
//! let config = RouteConfig::from_toml(r#"
//!     [[routes]]
//!     template = "/"
//!     view = "Home"
//!
//!     [[routes]]
//!     template = "/query/:id"
//!     view = "Query"
//! "#).unwrap();
//!
//! let router = Router::from_config(&config).unwrap();
//! let navigator = Navigator::new(PageStore::from_config(&config), Rc::new(MemoryHistory::new()));
//!
//! navigator.navigate_path(&router, "/query/42?tab=raw").unwrap();
//! let page = navigator.store().snapshot();
//! assert_eq!(page.view, "Query");
//! assert_eq!(page.props["id"], "42");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod page;
pub mod router;

pub use heaplog_reactive as reactive;

pub use config::{ConfigError, RouteConfig, RouteEntry};
pub use page::{NavigationError, Navigator, PageStore, PageTarget, ViewId};
pub use router::{RouteError, RouteParams, RoutePattern, Router, compile_route, match_route};

/// Installs the browser scheduler for passive effects.
///
/// Queued effects then flush in a microtask after the current task instead of
/// waiting for a manual [`flush_effects`](heaplog_reactive::flush_effects).
/// Only the first call has an effect.
#[cfg(target_arch = "wasm32")]
pub fn install_scheduler() {
	if heaplog_reactive::has_scheduler() {
		crate::debug_log!("effect scheduler already installed");
		return;
	}
	heaplog_reactive::set_scheduler(|task| {
		wasm_bindgen_futures::spawn_local(async move { task() });
	});
	crate::debug_log!("effect scheduler installed");
}

#[doc(hidden)]
pub mod __private {
	#[cfg(not(target_arch = "wasm32"))]
	pub use tracing;
	pub use web_sys;
}
