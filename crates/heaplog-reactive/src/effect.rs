//! Effect - Reactive Side Effects
//!
//! `Effect` runs a closure immediately and again whenever a Signal it read
//! during its last run changes. Dependencies are rebuilt on every run.
//!
//! ## Example
//!
//! ```
//! use heaplog_reactive::{Effect, Signal, flush_effects};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let count = Signal::new(0);
//! let seen = Rc::new(Cell::new(0));
//!
//! let _effect = Effect::new({
//!     let count = count.clone();
//!     let seen = seen.clone();
//!     move || seen.set(count.get())
//! });
//!
//! count.set(42);
//! flush_effects();
//! assert_eq!(seen.get(), 42);
//! ```

use core::cell::RefCell;

use std::collections::{BTreeMap, BTreeSet};

use crate::runtime::{
	EffectTiming, Frame, NodeId, Observer, Runtime, try_with_runtime, with_runtime,
};

type EffectFn = Box<dyn FnMut() + 'static>;

/// Upper bound on flush rounds, where each round runs the effects scheduled
/// by the previous one, and on back-to-back runs of one effect that keeps
/// re-triggering itself. Hitting it means effects keep invalidating each other.
const MAX_FLUSH_ROUNDS: usize = 100;

// Closures of live effects. An effect's closure is taken out while it runs,
// so an effect that re-triggers itself synchronously does not re-enter; it is
// queued in RERUN_REQUESTED instead.
thread_local! {
	static EFFECT_FUNCTIONS: RefCell<BTreeMap<NodeId, EffectFn>> = const { RefCell::new(BTreeMap::new()) };
}

// Effects re-triggered while running. They run again as soon as the current
// run returns.
thread_local! {
	static RERUN_REQUESTED: RefCell<BTreeSet<NodeId>> = const { RefCell::new(BTreeSet::new()) };
}

// Timing of live effects; presence in this map means "not disposed".
thread_local! {
	static EFFECT_TIMING: RefCell<BTreeMap<NodeId, EffectTiming>> = const { RefCell::new(BTreeMap::new()) };
}

/// Get the timing for a live effect, or `None` if it was disposed.
pub(crate) fn get_effect_timing(effect_id: NodeId) -> Option<EffectTiming> {
	EFFECT_TIMING
		.try_with(|storage| storage.borrow().get(&effect_id).copied())
		.ok()
		.flatten()
}

/// Pops the frame it pushed when dropped, so a panicking closure does not
/// leave the observer stack unbalanced.
pub(crate) struct FrameGuard;

impl FrameGuard {
	pub(crate) fn push(frame: Frame) -> Self {
		with_runtime(|rt| rt.push_frame(frame));
		Self
	}
}

impl Drop for FrameGuard {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| rt.pop_frame());
	}
}

/// A reactive effect that re-runs when its dependencies change
///
/// Dropping the handle disposes the effect.
pub struct Effect {
	id: NodeId,
}

impl Effect {
	/// Create a passive effect and run it once.
	///
	/// Re-runs are queued and happen on the next flush.
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Passive)
	}

	/// Create an effect with the given timing and run it once.
	pub fn new_with_timing<F>(f: F, timing: EffectTiming) -> Self
	where
		F: FnMut() + 'static,
	{
		let id = NodeId::new();

		EFFECT_FUNCTIONS.with(|storage| {
			storage.borrow_mut().insert(id, Box::new(f));
		});
		EFFECT_TIMING.with(|storage| {
			storage.borrow_mut().insert(id, timing);
		});

		Self::execute_effect(id);

		Self { id }
	}

	/// Execute an effect by its ID, rebuilding its dependencies.
	pub(crate) fn execute_effect(effect_id: NodeId) {
		let Some(timing) = get_effect_timing(effect_id) else {
			return;
		};
		let Some(mut effect_fn) =
			EFFECT_FUNCTIONS.with(|storage| storage.borrow_mut().remove(&effect_id))
		else {
			// Already running further up the stack: run again once it returns
			let _ = RERUN_REQUESTED.try_with(|requested| requested.borrow_mut().insert(effect_id));
			return;
		};

		let mut runs = 0;
		loop {
			runs += 1;
			with_runtime(|rt| rt.clear_dependencies(effect_id));
			{
				let _frame = FrameGuard::push(Frame::Observer(Observer {
					id: effect_id,
					timing,
				}));
				effect_fn();
			}

			let rerun = RERUN_REQUESTED
				.try_with(|requested| requested.borrow_mut().remove(&effect_id))
				.unwrap_or(false);
			if !rerun || get_effect_timing(effect_id).is_none() {
				break;
			}
			if runs == MAX_FLUSH_ROUNDS {
				tracing::warn!(
					?effect_id,
					"effect keeps re-triggering itself, giving up on this update"
				);
				break;
			}
			tracing::trace!(?effect_id, runs, "effect re-triggered while running");
		}

		// Disposed while running: let the closure drop here
		if get_effect_timing(effect_id).is_some() {
			let _ = EFFECT_FUNCTIONS.try_with(|storage| {
				storage.borrow_mut().insert(effect_id, effect_fn);
			});
		}
	}

	/// Get the NodeId of this effect
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Returns whether this effect has been disposed.
	pub fn is_disposed(&self) -> bool {
		get_effect_timing(self.id).is_none()
	}

	/// Dispose this effect. It will not run again.
	pub fn dispose(&self) {
		let _ = EFFECT_TIMING.try_with(|storage| {
			storage.borrow_mut().remove(&self.id);
		});
		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		let removed = EFFECT_FUNCTIONS
			.try_with(|storage| storage.borrow_mut().remove(&self.id))
			.ok()
			.flatten();
		// Dropped outside the borrow in case the closure owns other effects
		drop(removed);
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl core::fmt::Debug for Effect {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.id)
			.field("timing", &get_effect_timing(self.id))
			.finish()
	}
}

impl Runtime {
	/// Run every queued passive effect.
	///
	/// Effects scheduled while flushing are run in a following round of the
	/// same call.
	pub fn flush_updates(&self) {
		*self.update_scheduled.borrow_mut() = false;

		for round in 0.. {
			let pending = core::mem::take(&mut *self.pending_updates.borrow_mut());
			if pending.is_empty() {
				break;
			}
			if round == MAX_FLUSH_ROUNDS {
				tracing::warn!(
					dropped = pending.len(),
					"effects keep re-scheduling each other, giving up on this flush"
				);
				break;
			}

			tracing::trace!(count = pending.len(), round, "flushing effects");
			for node_id in pending {
				Effect::execute_effect(node_id);
			}
		}
	}
}
