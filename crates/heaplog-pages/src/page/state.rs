//! The reactive "current page" store.
//!
//! A [`PageStore`] holds which view is on screen and the props it was opened
//! with. The render layer reads [`PageStore::view`] and [`PageStore::props`]
//! inside effects; writes go through a [`Navigator`](super::Navigator) so the
//! browser history stays in step with the page.

use std::fmt;

use heaplog_reactive::{Signal, batch};
use serde::{Deserialize, Serialize};

use crate::config::RouteConfig;

/// Props passed to a view: an ordered JSON object.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Name of the default view.
pub const HOME_VIEW: &str = "Home";

/// Identifies a view by name, e.g. `"Home"` or `"Query"`.
///
/// The store does not check that a view with this name is registered
/// anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
	/// Creates a view id.
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	/// Returns the view name.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for ViewId {
	fn default() -> Self {
		Self::new(HOME_VIEW)
	}
}

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ViewId {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for ViewId {
	fn from(name: String) -> Self {
		Self(name)
	}
}

impl PartialEq<str> for ViewId {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for ViewId {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

/// A view together with its props.
///
/// Used both as a navigation request and as the state object stored with a
/// history entry, serialized as `{"view": ..., "props": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTarget {
	/// View to show.
	pub view: ViewId,
	/// Props for the view.
	#[serde(default)]
	pub props: Props,
}

impl PageTarget {
	/// Creates a target with empty props.
	pub fn new(view: impl Into<ViewId>) -> Self {
		Self {
			view: view.into(),
			props: Props::new(),
		}
	}

	/// Sets one prop.
	pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.props.insert(key.into(), value.into());
		self
	}

	/// Replaces all props.
	pub fn with_props(mut self, props: Props) -> Self {
		self.props = props;
		self
	}
}

/// Snapshot of the page state.
pub type PageState = PageTarget;

/// Reactive holder of the current page.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct PageStore {
	view: Signal<ViewId>,
	props: Signal<Props>,
}

impl PageStore {
	/// Creates a store showing `Home` with empty props.
	pub fn new() -> Self {
		Self::with_state(PageState::default())
	}

	/// Creates a store showing the given page.
	pub fn with_state(state: PageState) -> Self {
		Self {
			view: Signal::new(state.view),
			props: Signal::new(state.props),
		}
	}

	/// Creates a store starting at the configured home view.
	pub fn from_config(config: &RouteConfig) -> Self {
		Self::with_state(PageTarget::new(config.home.clone()))
	}

	/// The current view. Reading it inside an effect subscribes the effect.
	pub fn view(&self) -> ViewId {
		self.view.get()
	}

	/// The current props. Reading them inside an effect subscribes the effect.
	pub fn props(&self) -> Props {
		self.props.get()
	}

	/// The view signal itself, for callers that want `with`/`get_untracked`.
	pub fn view_signal(&self) -> &Signal<ViewId> {
		&self.view
	}

	/// The props signal itself.
	pub fn props_signal(&self) -> &Signal<Props> {
		&self.props
	}

	/// Current state, read without subscribing.
	pub fn snapshot(&self) -> PageState {
		PageState {
			view: self.view.get_untracked(),
			props: self.props.get_untracked(),
		}
	}

	/// Replaces view and props.
	///
	/// Both writes land before any effect is notified, so readers never see
	/// the new view with the old props, and an effect reading both runs once.
	/// Does not touch history; see [`Navigator::navigate`](super::Navigator::navigate).
	pub fn set(&self, target: PageTarget) {
		batch(|| {
			self.view.set(target.view);
			self.props.set(target.props);
		});
	}
}

impl Default for PageStore {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for PageStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.snapshot();
		f.debug_struct("PageStore")
			.field("view", &state.view)
			.field("props", &state.props)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use heaplog_reactive::{Effect, explicit_layout_effect, flush_effects};
	use rstest::rstest;
	use serde_json::json;
	use serial_test::serial;
	use std::cell::RefCell;
	use std::rc::Rc;

	#[rstest]
	#[serial]
	fn test_default_state_is_home() {
		let store = PageStore::new();
		assert_eq!(store.view(), "Home");
		assert!(store.props().is_empty());
	}

	#[rstest]
	#[serial]
	fn test_from_config_starts_at_home_view() {
		let config = RouteConfig {
			home: ViewId::new("Dashboard"),
			..RouteConfig::default()
		};
		let store = PageStore::from_config(&config);
		assert_eq!(store.view(), "Dashboard");
	}

	#[rstest]
	#[serial]
	fn test_set_replaces_view_and_props() {
		let store = PageStore::new();
		store.set(PageTarget::new("Query").with_prop("id", "42"));

		let state = store.snapshot();
		assert_eq!(state.view, "Query");
		assert_eq!(state.props.get("id"), Some(&json!("42")));

		store.set(PageTarget::new("Home"));
		assert!(store.props().is_empty());
	}

	#[rstest]
	#[serial]
	fn test_clones_share_state() {
		let store = PageStore::new();
		let other = store.clone();
		other.set(PageTarget::new("Settings"));
		assert_eq!(store.view(), "Settings");
	}

	#[rstest]
	#[serial]
	fn test_effect_reading_view_reruns_on_set() {
		let store = PageStore::new();
		let seen = Rc::new(RefCell::new(Vec::new()));

		let _effect = Effect::new({
			let (store, seen) = (store.clone(), seen.clone());
			move || seen.borrow_mut().push(store.view().to_string())
		});

		store.set(PageTarget::new("Query"));
		flush_effects();
		assert_eq!(*seen.borrow(), vec!["Home", "Query"]);
	}

	#[rstest]
	#[serial]
	fn test_layout_effect_never_sees_view_with_stale_props() {
		let store = PageStore::with_state(PageTarget::new("Home").with_prop("greeting", "hi"));
		let renders = Rc::new(RefCell::new(Vec::new()));

		let _render = explicit_layout_effect(
			{
				let (store, renders) = (store.clone(), renders.clone());
				move || {
					let page = store.snapshot();
					let keys: Vec<String> = page.props.keys().cloned().collect();
					renders.borrow_mut().push(format!("{}:{}", page.view, keys.join(",")));
				}
			},
			{
				let store = store.clone();
				move || {
					let _ = store.view();
					let _ = store.props();
				}
			},
		);

		store.set(PageTarget::new("Query").with_prop("id", "1"));

		assert_eq!(*renders.borrow(), vec!["Home:greeting", "Query:id"]);
	}

	#[rstest]
	fn test_page_target_serde_shape() {
		let target = PageTarget::new("Query").with_prop("id", 42);
		let value = serde_json::to_value(&target).unwrap();
		assert_eq!(value, json!({"view": "Query", "props": {"id": 42}}));

		let back: PageTarget = serde_json::from_value(json!({"view": "Home"})).unwrap();
		assert_eq!(back, PageTarget::new("Home"));
	}
}
