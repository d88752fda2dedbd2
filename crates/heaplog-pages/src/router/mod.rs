//! Client-side routing.
//!
//! - [`RoutePattern`]: compiles a `/users/:id` template and matches paths
//!   against it, returning percent-decoded [`RouteParams`].
//! - [`Router`]: an ordered table of patterns and views, first match wins,
//!   with reverse lookups by route name.
//! - [`FromPath`]: typed extraction of parameter values.
//!
//! A path that matches nothing is `Ok(None)`, not an error.

mod decode;
mod error;
mod params;
mod pattern;
mod table;

pub use error::{PathError, RouteError};
pub use params::{FromPath, PathParams};
pub use pattern::{RouteParams, RoutePattern, compile_route, match_route};
pub use table::{ResolvedRoute, Route, Router};
