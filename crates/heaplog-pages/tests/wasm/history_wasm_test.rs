//! Browser history integration. Run with `wasm-pack test --headless --firefox`.

#[cfg(target_arch = "wasm32")]
mod browser_tests {
	use heaplog_pages::page::{BrowserHistory, HistoryBackend, Navigator, PageStore, PageTarget};
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn history_length() -> u32 {
		web_sys::window()
			.unwrap()
			.history()
			.unwrap()
			.length()
			.unwrap()
	}

	#[wasm_bindgen_test]
	fn test_navigate_pushes_browser_entry() {
		let navigator = Navigator::browser(PageStore::new());
		let before = history_length();

		navigator
			.navigate(PageTarget::new("Query").with_prop("id", "3"), "/query/3")
			.unwrap();

		assert_eq!(history_length(), before + 1);
		assert_eq!(BrowserHistory.current_path().unwrap(), "/query/3");
		assert_eq!(navigator.store().view(), "Query");
	}

	#[wasm_bindgen_test]
	fn test_navigate_empty_url_keeps_location() {
		let navigator = Navigator::browser(PageStore::new());
		let path = BrowserHistory.current_path().unwrap();
		let before = history_length();

		navigator.navigate(PageTarget::new("Settings"), "").unwrap();

		assert_eq!(history_length(), before);
		assert_eq!(BrowserHistory.current_path().unwrap(), path);
	}

	#[wasm_bindgen_test]
	fn test_cross_origin_push_is_rejected() {
		let navigator = Navigator::browser(PageStore::new());
		let result = navigator.navigate(PageTarget::new("Evil"), "https://elsewhere.invalid/");

		assert!(result.is_err());
		assert_eq!(navigator.store().view(), "Home");
	}

	#[wasm_bindgen_test]
	fn test_popstate_listener_installs() {
		let navigator = Navigator::browser(PageStore::new());
		let listener = navigator.listen_popstate().unwrap();
		drop(listener);
	}

	#[wasm_bindgen_test]
	fn test_install_scheduler_is_idempotent() {
		heaplog_pages::install_scheduler();
		heaplog_pages::install_scheduler();
		assert!(heaplog_reactive::has_scheduler());
	}
}
