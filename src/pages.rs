//! Routing and page state
//!
//! Re-exports `heaplog-pages`:
//!
//! - **Routing**: `/users/:id` templates, first-match route tables, reverse lookups
//! - **Page state**: a reactive store of the current view and its props
//! - **Navigation**: History API integration (browser) or in-memory history (native)
//! - **Configuration**: route tables from JSON or TOML

pub use heaplog_pages::*;
