//! Fine-grained reactivity
//!
//! Re-exports `heaplog-reactive`.

pub use heaplog_reactive::*;
