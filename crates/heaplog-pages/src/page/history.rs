//! History API integration.
//!
//! [`HistoryBackend`] is the seam between navigation and the browser.
//! [`BrowserHistory`] talks to `window.history` on wasm32; [`MemoryHistory`]
//! keeps entries in memory for native builds and tests.

use std::cell::RefCell;

use thiserror::Error;

use super::state::PageTarget;

/// Errors raised by a history backend.
#[derive(Debug, Error)]
pub enum HistoryError {
	/// No `window` or `window.history` is available.
	#[error("History API is not available")]
	Unavailable,
	/// The backend refused the entry, e.g. a cross-origin URL.
	#[error("History entry rejected: {0}")]
	Rejected(String),
	/// The state object could not be (de)serialized.
	#[error("Invalid history state: {0}")]
	State(#[from] serde_json::Error),
}

/// State object stored with a history entry.
///
/// Holds the page target as JSON, `{"view": ..., "props": {...}}`, which is
/// the form the browser stores and hands back on `popstate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
	json: String,
}

impl HistoryState {
	/// Serializes a page target.
	pub fn from_target(target: &PageTarget) -> Result<Self, HistoryError> {
		Ok(Self {
			json: serde_json::to_string(target)?,
		})
	}

	/// Wraps JSON received from the backend.
	pub fn from_json(json: impl Into<String>) -> Self {
		Self { json: json.into() }
	}

	/// The serialized state.
	pub fn as_json(&self) -> &str {
		&self.json
	}

	/// Deserializes the page target.
	pub fn to_target(&self) -> Result<PageTarget, HistoryError> {
		Ok(serde_json::from_str(&self.json)?)
	}
}

/// A place to record navigation entries.
pub trait HistoryBackend {
	/// Adds an entry with the given state and URL. The title is always empty.
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError>;

	/// Overwrites the current entry.
	fn replace_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError>;

	/// Path of the current entry.
	fn current_path(&self) -> Result<String, HistoryError>;
}

/// A recorded history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
	/// URL the entry was pushed with.
	pub url: String,
	/// Its state object.
	pub state: HistoryState,
}

#[derive(Debug, Default)]
struct MemoryStack {
	entries: Vec<HistoryEntry>,
	// Index of the current entry; `None` before the first push
	cursor: Option<usize>,
}

/// In-memory history with browser semantics: pushing drops any forward
/// entries, `back`/`forward` move a cursor.
#[derive(Debug)]
pub struct MemoryHistory {
	initial_path: String,
	stack: RefCell<MemoryStack>,
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryHistory {
	/// Creates an empty history at `/`.
	pub fn new() -> Self {
		Self::with_initial_path("/")
	}

	/// Creates an empty history whose current path is `path`.
	pub fn with_initial_path(path: impl Into<String>) -> Self {
		Self {
			initial_path: path.into(),
			stack: RefCell::new(MemoryStack::default()),
		}
	}

	/// All entries, oldest first.
	pub fn entries(&self) -> Vec<HistoryEntry> {
		self.stack.borrow().entries.clone()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.stack.borrow().entries.len()
	}

	/// Returns whether nothing was pushed yet.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The current entry.
	pub fn current(&self) -> Option<HistoryEntry> {
		let stack = self.stack.borrow();
		stack.cursor.map(|index| stack.entries[index].clone())
	}

	/// Moves back one entry and returns it, like the browser's back button.
	///
	/// Returns `None` at the oldest entry.
	pub fn back(&self) -> Option<HistoryEntry> {
		let mut stack = self.stack.borrow_mut();
		let index = stack.cursor?.checked_sub(1)?;
		stack.cursor = Some(index);
		Some(stack.entries[index].clone())
	}

	/// Moves forward one entry and returns it.
	pub fn forward(&self) -> Option<HistoryEntry> {
		let mut stack = self.stack.borrow_mut();
		let index = stack.cursor.map_or(0, |index| index + 1);
		let entry = stack.entries.get(index)?.clone();
		stack.cursor = Some(index);
		Some(entry)
	}
}

impl HistoryBackend for MemoryHistory {
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
		let mut stack = self.stack.borrow_mut();
		let keep = stack.cursor.map_or(0, |index| index + 1);
		stack.entries.truncate(keep);
		stack.entries.push(HistoryEntry {
			url: url.to_string(),
			state: state.clone(),
		});
		stack.cursor = Some(keep);
		Ok(())
	}

	fn replace_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
		let mut stack = self.stack.borrow_mut();
		let entry = HistoryEntry {
			url: url.to_string(),
			state: state.clone(),
		};
		match stack.cursor {
			Some(index) => stack.entries[index] = entry,
			None => {
				stack.entries.push(entry);
				stack.cursor = Some(0);
			}
		}
		Ok(())
	}

	fn current_path(&self) -> Result<String, HistoryError> {
		Ok(self
			.current()
			.map(|entry| entry.url)
			.unwrap_or_else(|| self.initial_path.clone()))
	}
}

/// `window.history` of the current page.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
	use super::{BrowserHistory, HistoryBackend, HistoryError, HistoryState};
	use wasm_bindgen::JsValue;

	fn describe(error: &JsValue) -> String {
		error.as_string().unwrap_or_else(|| format!("{error:?}"))
	}

	fn window() -> Result<web_sys::Window, HistoryError> {
		web_sys::window().ok_or(HistoryError::Unavailable)
	}

	fn history() -> Result<web_sys::History, HistoryError> {
		window()?.history().map_err(|_| HistoryError::Unavailable)
	}

	fn to_js(state: &HistoryState) -> Result<JsValue, HistoryError> {
		js_sys::JSON::parse(state.as_json()).map_err(|e| HistoryError::Rejected(describe(&e)))
	}

	impl BrowserHistory {
		/// Reads the state object of a `popstate` event.
		///
		/// Returns `None` for entries this crate did not push.
		pub fn state_of(event: &web_sys::PopStateEvent) -> Option<HistoryState> {
			let state = event.state();
			if state.is_null() || state.is_undefined() {
				return None;
			}
			js_sys::JSON::stringify(&state)
				.ok()
				.map(|json| HistoryState::from_json(String::from(json)))
		}
	}

	impl HistoryBackend for BrowserHistory {
		fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
			history()?
				.push_state_with_url(&to_js(state)?, "", Some(url))
				.map_err(|e| HistoryError::Rejected(describe(&e)))
		}

		fn replace_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
			history()?
				.replace_state_with_url(&to_js(state)?, "", Some(url))
				.map_err(|e| HistoryError::Rejected(describe(&e)))
		}

		fn current_path(&self) -> Result<String, HistoryError> {
			window()?
				.location()
				.pathname()
				.map_err(|e| HistoryError::Rejected(describe(&e)))
		}
	}
}
