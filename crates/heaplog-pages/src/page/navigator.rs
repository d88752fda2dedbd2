//! The single entry point for changing pages.

use std::rc::Rc;

use thiserror::Error;

use super::history::{HistoryBackend, HistoryError, HistoryState};
use super::state::{PageStore, PageTarget};
use crate::router::{RouteError, Router};
use crate::{debug_log, info_log, warn_log};

/// Errors raised while navigating.
#[derive(Debug, Error)]
pub enum NavigationError {
	/// The history entry could not be recorded. The page did not change.
	#[error(transparent)]
	History(#[from] HistoryError),
	/// The URL could not be resolved to a view.
	#[error(transparent)]
	Route(#[from] RouteError),
}

/// Changes the current page and keeps history in step.
///
/// ```
/// use heaplog_pages::page::{MemoryHistory, Navigator, PageStore, PageTarget};
/// use std::rc::Rc;
///
/// let history = Rc::new(MemoryHistory::new());
/// let navigator = Navigator::new(PageStore::new(), history.clone());
///
/// navigator.navigate(PageTarget::new("Query").with_prop("id", "1"), "/query/1").unwrap();
/// assert_eq!(navigator.store().view(), "Query");
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Clone)]
pub struct Navigator {
	store: PageStore,
	history: Rc<dyn HistoryBackend>,
}

impl Navigator {
	/// Creates a navigator over a store and a history backend.
	pub fn new(store: PageStore, history: Rc<dyn HistoryBackend>) -> Self {
		Self { store, history }
	}

	/// Creates a navigator bound to `window.history`.
	#[cfg(target_arch = "wasm32")]
	pub fn browser(store: PageStore) -> Self {
		Self::new(store, Rc::new(super::history::BrowserHistory))
	}

	/// The page store this navigator writes to.
	pub fn store(&self) -> &PageStore {
		&self.store
	}

	/// The history backend.
	pub fn history(&self) -> &Rc<dyn HistoryBackend> {
		&self.history
	}

	/// Shows `target`.
	///
	/// With a non-empty `url`, a history entry is pushed first, carrying the
	/// target as its state. If that fails the page state is left untouched.
	/// An empty `url` changes the page without touching history.
	pub fn navigate(&self, target: PageTarget, url: &str) -> Result<(), NavigationError> {
		if !url.is_empty() {
			let state = HistoryState::from_target(&target)?;
			if let Err(err) = self.history.push_state(&state, url) {
				warn_log!("navigation to {} aborted: {}", url, err);
				return Err(err.into());
			}
		}

		info_log!("navigate: view={} url={:?}", target.view, url);
		self.store.set(target);
		Ok(())
	}

	/// Resolves `url` against `router` and navigates there.
	///
	/// Query string and fragment are ignored for matching but kept in the
	/// pushed URL. Unmatched paths show the router's not-found view. Parameter
	/// values become string props.
	pub fn navigate_path(&self, router: &Router, url: &str) -> Result<(), NavigationError> {
		let path = route_path(url);
		let resolved = router.resolve_or_not_found(path)?;
		debug_log!(
			"resolved {:?} to view={} params={:?}",
			path,
			resolved.view,
			resolved.params
		);
		self.navigate(resolved.into_target(), url)
	}

	/// Applies a history entry's state without pushing a new one.
	///
	/// Used for back/forward navigation.
	pub fn restore(&self, state: &HistoryState) -> Result<(), HistoryError> {
		debug_log!("restore: state={}", state.as_json());
		let target = state.to_target()?;
		info_log!("restore: view={}", target.view);
		self.store.set(target);
		Ok(())
	}

	/// Points the store at whatever the backend's current path resolves to,
	/// without pushing. Used on first load.
	pub fn sync_with_location(&self, router: &Router) -> Result<(), NavigationError> {
		let path = self.history.current_path()?;
		let resolved = router.resolve_or_not_found(route_path(&path))?;
		debug_log!("initial location {:?} resolved to view={}", path, resolved.view);
		self.store.set(resolved.into_target());
		Ok(())
	}

	/// Restores the page on every browser `popstate`.
	///
	/// The listener stays installed until the returned handle is dropped.
	#[cfg(target_arch = "wasm32")]
	pub fn listen_popstate(&self) -> Result<PopStateListener, HistoryError> {
		PopStateListener::install(self.clone())
	}
}

impl std::fmt::Debug for Navigator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("store", &self.store)
			.finish_non_exhaustive()
	}
}

/// Strips the query string and fragment from a URL.
fn route_path(url: &str) -> &str {
	url.find(['?', '#']).map_or(url, |end| &url[..end])
}

/// Handle of an installed `popstate` listener. Dropping it removes the
/// listener.
#[cfg(target_arch = "wasm32")]
pub struct PopStateListener {
	window: web_sys::Window,
	closure: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::PopStateEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl PopStateListener {
	fn install(navigator: Navigator) -> Result<Self, HistoryError> {
		use super::history::BrowserHistory;
		use crate::error_log;
		use wasm_bindgen::JsCast;
		use wasm_bindgen::closure::Closure;

		let window = web_sys::window().ok_or(HistoryError::Unavailable)?;
		let closure = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(
			move |event: web_sys::PopStateEvent| {
				let Some(state) = BrowserHistory::state_of(&event) else {
					return;
				};
				if let Err(err) = navigator.restore(&state) {
					error_log!("popstate: {}", err);
				}
			},
		);
		window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.map_err(|_| HistoryError::Unavailable)?;

		Ok(Self { window, closure })
	}
}

#[cfg(target_arch = "wasm32")]
impl Drop for PopStateListener {
	fn drop(&mut self) {
		use wasm_bindgen::JsCast;

		let _ = self
			.window
			.remove_event_listener_with_callback("popstate", self.closure.as_ref().unchecked_ref());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::MemoryHistory;
	use rstest::rstest;

	#[rstest]
	#[case("/query/1", "/query/1")]
	#[case("/query/1?tab=raw", "/query/1")]
	#[case("/query/1#top", "/query/1")]
	#[case("/?q=a#b", "/")]
	#[case("", "")]
	fn test_route_path(#[case] url: &str, #[case] expected: &str) {
		assert_eq!(route_path(url), expected);
	}

	#[rstest]
	#[serial_test::serial]
	fn test_sync_with_location() {
		let router = Router::new().route("/query/:id", "Query").unwrap();
		let navigator = Navigator::new(
			PageStore::new(),
			Rc::new(MemoryHistory::with_initial_path("/query/5")),
		);

		navigator.sync_with_location(&router).unwrap();
		let state = navigator.store().snapshot();
		assert_eq!(state.view, "Query");
		assert_eq!(state.props.get("id").and_then(|v| v.as_str()), Some("5"));
	}
}
