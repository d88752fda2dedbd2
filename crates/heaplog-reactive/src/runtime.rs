//! Reactive Runtime
//!
//! This module owns the dependency graph between signals and the effects that
//! read them, the observer stack used for automatic dependency tracking, and
//! the queue of passive effects waiting to be flushed.
//!
//! ## Architecture
//!
//! 1. **Observer Stack**: the top frame decides whether a `Signal::get()` is
//!    recorded. An [`Frame::Observer`] frame records the read as a dependency of
//!    that effect; an [`Frame::Untracked`] frame suppresses recording.
//! 2. **Dependency Graph**: `NodeId -> DependencyNode` with edges in both
//!    directions so an effect can drop its old dependencies before re-running.
//! 3. **Update Scheduling**: passive effects are queued and flushed together,
//!    either by the installed scheduler (see [`set_scheduler`]) or manually via
//!    [`crate::flush_effects`].
//! 4. **Batching**: inside [`batch`] notifications are held and delivered once,
//!    so several related writes look like one change to every effect.

use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use std::collections::BTreeMap;

/// Unique identifier for reactive nodes (Signals and Effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// Effect execution timing.
///
/// - Layout effects re-run synchronously inside the `Signal::set` that
///   invalidated them.
/// - Passive effects are queued and re-run on the next flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTiming {
	/// Runs synchronously when a dependency changes
	Layout,
	/// Runs on the next flush of pending updates
	#[default]
	Passive,
}

/// An effect currently executing on the observer stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observer {
	/// Identifier of the executing effect
	pub id: NodeId,
	/// Timing the effect was registered with
	pub timing: EffectTiming,
}

/// One entry of the observer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
	/// Reads are recorded as dependencies of this observer.
	Observer(Observer),
	/// Reads are not recorded, even if an observer sits below this frame.
	Untracked,
}

/// Dependency graph node
#[derive(Debug, Default)]
pub(crate) struct DependencyNode {
	/// IDs of nodes that depend on this node
	pub(crate) subscribers: Vec<NodeId>,
	/// IDs of nodes this node depends on
	pub(crate) dependencies: Vec<NodeId>,
}

/// Type for async task scheduler function
type SchedulerFn = Box<dyn Fn(Box<dyn FnOnce() + Send>) + Send + Sync>;

/// Global scheduler function
static SCHEDULER: std::sync::OnceLock<SchedulerFn> = std::sync::OnceLock::new();

/// Set the global scheduler used to flush passive effects.
///
/// Call once at application startup. In the browser this is typically
/// `wasm_bindgen_futures::spawn_local`, which runs the flush on the next
/// microtask. Later calls are ignored.
///
/// Without a scheduler, pending effects stay queued until
/// [`crate::flush_effects`] is called.
pub fn set_scheduler<F>(scheduler: F)
where
	F: Fn(Box<dyn FnOnce() + Send>) + Send + Sync + 'static,
{
	let _ = SCHEDULER.set(Box::new(scheduler));
}

/// Returns whether a scheduler has been installed.
pub fn has_scheduler() -> bool {
	SCHEDULER.get().is_some()
}

/// Per-thread reactive runtime.
pub struct Runtime {
	/// Observer stack for tracking currently executing effects
	observer_stack: RefCell<Vec<Frame>>,
	/// Dependency graph: NodeId -> DependencyNode
	pub(crate) dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	/// Passive effects waiting for the next flush, in scheduling order
	pub(crate) pending_updates: RefCell<Vec<NodeId>>,
	/// Whether a flush has been handed to the scheduler
	pub(crate) update_scheduled: RefCell<bool>,
	/// Nesting depth of [`batch`] calls
	batch_depth: RefCell<usize>,
	/// Signals changed inside the outermost open batch, in change order
	batched_signals: RefCell<Vec<NodeId>>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			dependency_graph: RefCell::new(BTreeMap::new()),
			pending_updates: RefCell::new(Vec::new()),
			update_scheduled: RefCell::new(false),
			batch_depth: RefCell::new(0),
			batched_signals: RefCell::new(Vec::new()),
		}
	}

	/// Get the observer that a signal read would be recorded against.
	///
	/// Returns `None` outside of any effect and inside an untracked frame.
	pub fn current_observer(&self) -> Option<NodeId> {
		match self.observer_stack.borrow().last() {
			Some(Frame::Observer(observer)) => Some(observer.id),
			Some(Frame::Untracked) | None => None,
		}
	}

	/// Returns whether reads are currently being tracked.
	pub fn is_tracking(&self) -> bool {
		self.current_observer().is_some()
	}

	/// Push a frame onto the observer stack
	pub fn push_frame(&self, frame: Frame) {
		self.observer_stack.borrow_mut().push(frame);
	}

	/// Pop a frame from the observer stack
	pub fn pop_frame(&self) -> Option<Frame> {
		self.observer_stack.borrow_mut().pop()
	}

	/// Record that the current observer read `signal_id`.
	///
	/// Called by `Signal::get()`. Does nothing when no observer is tracking.
	pub fn track_dependency(&self, signal_id: NodeId) {
		if let Some(observer_id) = self.current_observer() {
			let mut graph = self.dependency_graph.borrow_mut();

			let signal_node = graph.entry(signal_id).or_default();
			if !signal_node.subscribers.contains(&observer_id) {
				signal_node.subscribers.push(observer_id);
			}

			let observer_node = graph.entry(observer_id).or_default();
			if !observer_node.dependencies.contains(&signal_id) {
				observer_node.dependencies.push(signal_id);
			}
		}
	}

	/// Notify that a Signal has changed
	///
	/// Layout subscribers re-run immediately; passive subscribers are queued.
	/// Inside a [`batch`] the notification is held until the batch closes.
	pub fn notify_signal_change(&self, signal_id: NodeId) {
		if *self.batch_depth.borrow() > 0 {
			let mut batched = self.batched_signals.borrow_mut();
			if !batched.contains(&signal_id) {
				batched.push(signal_id);
			}
			return;
		}
		self.notify_subscribers(&[signal_id]);
	}

	/// Notify every subscriber of `signal_ids`, each effect at most once.
	fn notify_subscribers(&self, signal_ids: &[NodeId]) {
		let mut subscribers: Vec<NodeId> = Vec::new();
		{
			let graph = self.dependency_graph.borrow();
			for signal_id in signal_ids {
				let Some(node) = graph.get(signal_id) else {
					continue;
				};
				for subscriber_id in &node.subscribers {
					if !subscribers.contains(subscriber_id) {
						subscribers.push(*subscriber_id);
					}
				}
			}
		}

		let mut layout_effects = Vec::new();
		for subscriber_id in subscribers {
			match crate::effect::get_effect_timing(subscriber_id) {
				Some(EffectTiming::Layout) => layout_effects.push(subscriber_id),
				Some(EffectTiming::Passive) => self.schedule_update(subscriber_id),
				// Disposed between tracking and notification
				None => {}
			}
		}

		for effect_id in layout_effects {
			crate::effect::Effect::execute_effect(effect_id);
		}
	}

	fn enter_batch(&self) {
		*self.batch_depth.borrow_mut() += 1;
	}

	/// Close one batch level. Returns the held signals when the outermost
	/// batch closes.
	fn exit_batch(&self) -> Option<Vec<NodeId>> {
		let mut depth = self.batch_depth.borrow_mut();
		*depth = depth.saturating_sub(1);
		if *depth > 0 {
			return None;
		}
		Some(core::mem::take(&mut *self.batched_signals.borrow_mut()))
	}

	/// Returns whether a [`batch`] is open.
	pub fn is_batching(&self) -> bool {
		*self.batch_depth.borrow() > 0
	}

	/// Queue a passive effect for the next flush.
	///
	/// An effect already queued is not queued twice, so any number of
	/// dependency changes before a flush produce a single re-run.
	pub fn schedule_update(&self, node_id: NodeId) {
		{
			let mut pending = self.pending_updates.borrow_mut();
			if pending.contains(&node_id) {
				return;
			}
			pending.push(node_id);
		}
		tracing::trace!(?node_id, "effect scheduled");

		if !*self.update_scheduled.borrow() {
			if let Some(scheduler) = SCHEDULER.get() {
				*self.update_scheduled.borrow_mut() = true;
				scheduler(Box::new(|| {
					RUNTIME.with(|rt| rt.flush_updates());
				}));
			}
		}
	}

	/// Number of effects waiting for the next flush.
	pub fn pending_count(&self) -> usize {
		self.pending_updates.borrow().len()
	}

	/// Drop every dependency edge of `node_id`.
	///
	/// Effects call this before re-running so that dependencies reflect only
	/// the latest execution.
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		let dependencies = match graph.get_mut(&node_id) {
			Some(node) => core::mem::take(&mut node.dependencies),
			None => return,
		};

		for dep_id in dependencies {
			if let Some(dep_node) = graph.get_mut(&dep_id) {
				dep_node.subscribers.retain(|&id| id != node_id);
			}
		}
	}

	/// Remove a node from the dependency graph
	///
	/// Called when the last handle to a Signal or an Effect is dropped.
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		let removed = self.dependency_graph.borrow_mut().remove(&node_id);

		// A dropped signal must not keep effects subscribed to a dead id
		if let Some(node) = removed {
			let mut graph = self.dependency_graph.borrow_mut();
			for subscriber in node.subscribers {
				if let Some(sub_node) = graph.get_mut(&subscriber) {
					sub_node.dependencies.retain(|&id| id != node_id);
				}
			}
		}
		self.pending_updates.borrow_mut().retain(|&id| id != node_id);
	}

	/// Check if a node exists in the dependency graph
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Get the number of subscribers for a node
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}

	/// Get the number of dependencies recorded for a node
	pub fn dependency_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.dependencies.len())
			.unwrap_or(0)
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

/// Closes the batch level it opened, even if the batched closure panics.
struct BatchGuard {
	committed: bool,
}

impl Drop for BatchGuard {
	fn drop(&mut self) {
		if !self.committed {
			// Unwinding: drop held notifications rather than run effects now
			let _ = try_with_runtime(|rt| rt.exit_batch());
		}
	}
}

/// Run `f` with signal notifications held until it returns.
///
/// Every signal written inside `f` notifies its subscribers once `f` is done,
/// and an effect subscribed to several of them runs once. Effects therefore
/// never observe a state where only some of the writes have landed.
/// Nested batches notify when the outermost one closes.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
	with_runtime(|rt| rt.enter_batch());
	let mut guard = BatchGuard { committed: false };
	let result = f();
	guard.committed = true;
	if let Some(signals) = with_runtime(|rt| rt.exit_batch()) {
		if !signals.is_empty() {
			tracing::trace!(count = signals.len(), "batch closed");
			with_runtime(|rt| rt.notify_subscribers(&signals));
		}
	}
	result
}

// In WASM there is only one thread, so this is effectively the global runtime.
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Run `f` with the thread's runtime.
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Like [`with_runtime`] but returns `None` once thread-local storage is torn
/// down. Used from `Drop` implementations.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}
