//! Explicit-dependency effects.
//!
//! A plain [`Effect`] tracks every signal read while it runs. When an effect
//! both reacts to some state and touches other reactive state as part of its
//! work, those incidental reads turn into triggers. The helpers here split the
//! two concerns:
//!
//! - [`track`] runs a closure whose reads register as dependencies,
//! - [`untrack`] runs a closure whose reads do not,
//! - [`explicit_effect`] composes them: re-run `effect` only when something
//!   read by `dependencies` changes.

use crate::effect::{Effect, FrameGuard};
use crate::runtime::{EffectTiming, Frame};

/// Run `f` with dependency tracking suspended.
///
/// Signal reads inside `f` are not recorded against the enclosing effect.
/// Nested [`track`] calls inside `f` stay untracked as well.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
	let _frame = FrameGuard::push(Frame::Untracked);
	f()
}

/// Run `f` in the current tracking context.
///
/// Inside an effect, every signal read by `f` becomes a trigger of that
/// effect. Outside an effect this is a plain call.
pub fn track<R>(f: impl FnOnce() -> R) -> R {
	f()
}

/// Run `effect` whenever a signal read by `dependencies` changes.
///
/// Both closures run once immediately. Reads performed by `effect` are
/// untracked, so changing state that only `effect` looks at never re-runs it.
/// Re-runs are passive: they happen on the next flush, once per flush no
/// matter how many dependencies changed.
///
/// ```
/// use heaplog_reactive::{Signal, explicit_effect, flush_effects};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let query = Signal::new(String::from("error"));
/// let limit = Signal::new(10);
/// let runs = Rc::new(Cell::new(0));
///
/// let _effect = explicit_effect(
///     {
///         let (limit, runs) = (limit.clone(), runs.clone());
///         move || {
///             let _ = limit.get();
///             runs.set(runs.get() + 1);
///         }
///     },
///     {
///         let query = query.clone();
///         move || {
///             let _ = query.get();
///         }
///     },
/// );
///
/// limit.set(20);
/// flush_effects();
/// assert_eq!(runs.get(), 1);
///
/// query.set(String::from("warn"));
/// flush_effects();
/// assert_eq!(runs.get(), 2);
/// ```
pub fn explicit_effect<E, D>(effect: E, dependencies: D) -> Effect
where
	E: FnMut() + 'static,
	D: FnMut() + 'static,
{
	explicit_effect_with_timing(effect, dependencies, EffectTiming::Passive)
}

/// Same as [`explicit_effect`], but re-runs synchronously inside the `set`
/// that changed a dependency.
pub fn explicit_layout_effect<E, D>(effect: E, dependencies: D) -> Effect
where
	E: FnMut() + 'static,
	D: FnMut() + 'static,
{
	explicit_effect_with_timing(effect, dependencies, EffectTiming::Layout)
}

fn explicit_effect_with_timing<E, D>(
	mut effect: E,
	mut dependencies: D,
	timing: EffectTiming,
) -> Effect
where
	E: FnMut() + 'static,
	D: FnMut() + 'static,
{
	Effect::new_with_timing(
		move || {
			track(&mut dependencies);
			untrack(&mut effect);
		},
		timing,
	)
}
