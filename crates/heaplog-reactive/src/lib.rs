//! heaplog-reactive - fine-grained reactivity for the heaplog web UI
//!
//! A small pull-based reactive system in the style of Leptos and Solid.js:
//!
//! - [`Signal`]: a value whose reads are tracked by the running effect,
//! - [`Effect`]: a side effect re-run when a tracked signal changes,
//! - [`untrack`] / [`track`]: explicit control over what an effect tracks,
//! - [`explicit_effect`]: an effect with a declared dependency closure and an
//!   untracked body,
//! - [`batch`]: group several writes into one notification.
//!
//! The runtime is thread-local. In the browser there is one thread, so it is
//! effectively global; native test threads each get their own.
//!
//! Passive effects are flushed by the scheduler installed with
//! [`runtime::set_scheduler`], or manually with [`flush_effects`].

#![warn(missing_docs)]

pub mod effect;
pub mod runtime;
pub mod signal;
pub mod watch;

pub use effect::Effect;
pub use runtime::{EffectTiming, NodeId, Runtime, batch, has_scheduler, set_scheduler, with_runtime};
pub use signal::Signal;
pub use watch::{explicit_effect, explicit_layout_effect, track, untrack};

/// Run every passive effect queued since the last flush.
///
/// Needed when no scheduler is installed (native builds and tests).
pub fn flush_effects() {
	with_runtime(|rt| rt.flush_updates());
}
