//! # heaplog
//!
//! Client-side routing and reactive page state for the heaplog log-search UI.
//!
//! The UI is a single-page application: one page store says which view is on
//! screen, one navigation call changes it and keeps browser history in step,
//! and route templates map URLs to views.
//!
//! ## Feature Flags
//!
//! - `reactive` - signals, effects, `untrack`/`explicit_effect`
//! - `pages` - routing, page store, navigation, history backends
//! - `full` (default) - everything
//! - `debug-hooks` - `debug_log!` output in debug builds
//!
//! ## Quick Example
//!
//! ```rust
//! use heaplog::prelude::*;
//! use std::rc::Rc;
//!
//! let router = Router::new()
//!     .route("/", "Home").unwrap()
//!     .route("/query/:id", "Query").unwrap();
//!
//! let history = Rc::new(MemoryHistory::new());
//! let navigator = Navigator::new(PageStore::new(), history.clone());
//!
//! navigator.navigate_path(&router, "/query/9").unwrap();
//! assert_eq!(navigator.store().view(), "Query");
//! assert_eq!(history.len(), 1);
//! ```

#[cfg(feature = "pages")]
pub mod pages;
#[cfg(feature = "reactive")]
pub mod reactive;

#[cfg(feature = "pages")]
pub use heaplog_pages::{
	NavigationError, Navigator, PageStore, PageTarget, RouteConfig, RouteError, RoutePattern,
	Router, ViewId, compile_route, match_route,
};

#[cfg(feature = "reactive")]
pub use heaplog_reactive::{Effect, Signal, explicit_effect, flush_effects, track, untrack};

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "pages")]
	pub use heaplog_pages::config::RouteConfig;
	#[cfg(feature = "pages")]
	pub use heaplog_pages::page::{
		HistoryBackend, MemoryHistory, NavigationError, Navigator, PageStore, PageTarget, Props,
		ViewId,
	};
	#[cfg(feature = "pages")]
	pub use heaplog_pages::router::{FromPath, PathParams, RouteParams, RoutePattern, Router};

	#[cfg(feature = "reactive")]
	pub use heaplog_reactive::{
		Effect, EffectTiming, Signal, explicit_effect, explicit_layout_effect, flush_effects,
		track, untrack,
	};
}
