//! Reactive page state and navigation.
//!
//! One [`PageStore`] exists per application and is handed to the render
//! layer. Every page change goes through [`Navigator::navigate`], which
//! records a history entry (for non-empty URLs) and then updates the store.

mod history;
mod navigator;
mod state;

#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{HistoryBackend, HistoryEntry, HistoryError, HistoryState, MemoryHistory};
#[cfg(target_arch = "wasm32")]
pub use navigator::PopStateListener;
pub use navigator::{NavigationError, Navigator};
pub use state::{HOME_VIEW, PageState, PageStore, PageTarget, Props, ViewId};
