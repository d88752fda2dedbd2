//! Route configuration.
//!
//! The route table can be declared in data rather than code, as JSON or TOML:
//!
//! ```toml
//! home = "Home"
//! not_found = "NotFound"
//!
//! [[routes]]
//! template = "/query/:id"
//! view = "Query"
//! name = "query-detail"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::page::ViewId;
use crate::router::RouteError;

/// Errors raised while loading a route configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The JSON document could not be parsed.
	#[error("Invalid JSON route configuration: {0}")]
	Json(#[from] serde_json::Error),
	/// The TOML document could not be parsed.
	#[error("Invalid TOML route configuration: {0}")]
	Toml(#[from] toml::de::Error),
	/// A route template failed to compile.
	#[error("Invalid route '{template}': {source}")]
	Route {
		/// Template of the offending entry.
		template: String,
		/// Underlying compile error.
		#[source]
		source: RouteError,
	},
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
	/// Route template, e.g. `/users/:id`.
	pub template: String,
	/// View shown when the template matches.
	pub view: ViewId,
	/// Optional name for reverse lookups.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

/// Declarative route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
	/// View a fresh page store starts on.
	#[serde(default = "default_home")]
	pub home: ViewId,
	/// View used when no route matches.
	#[serde(default = "default_not_found")]
	pub not_found: ViewId,
	/// Routes, tried in order.
	#[serde(default)]
	pub routes: Vec<RouteEntry>,
}

fn default_home() -> ViewId {
	ViewId::default()
}

fn default_not_found() -> ViewId {
	ViewId::new("NotFound")
}

impl Default for RouteConfig {
	fn default() -> Self {
		Self {
			home: default_home(),
			not_found: default_not_found(),
			routes: Vec::new(),
		}
	}
}

impl RouteConfig {
	/// Parses a configuration from JSON.
	pub fn from_json(input: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(input)?)
	}

	/// Parses a configuration from TOML.
	pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}
}
