//! Ordered route table mapping paths to views.

use std::collections::HashMap;

use super::error::RouteError;
use super::pattern::{RouteParams, RoutePattern};
use crate::config::{ConfigError, RouteConfig};
use crate::page::{PageTarget, Props, ViewId};

/// A single route definition.
#[derive(Debug, Clone)]
pub struct Route {
	pattern: RoutePattern,
	view: ViewId,
	name: Option<String>,
}

impl Route {
	/// Returns the compiled pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Returns the view this route shows.
	pub fn view(&self) -> &ViewId {
		&self.view
	}

	/// Returns the route name.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
	/// View of the matching route.
	pub view: ViewId,
	/// Decoded parameters.
	pub params: RouteParams,
}

impl ResolvedRoute {
	/// Converts into a navigation target, with each parameter as a string prop.
	pub fn into_target(self) -> PageTarget {
		let props: Props = self
			.params
			.into_map()
			.into_iter()
			.map(|(name, value)| (name, serde_json::Value::String(value)))
			.collect();
		PageTarget::new(self.view).with_props(props)
	}
}

/// Client-side route table.
///
/// Routes are tried in registration order and the first match wins.
///
/// ```
/// use heaplog_pages::router::Router;
///
/// let router = Router::new()
///     .route("/", "Home").unwrap()
///     .named_route("query-detail", "/query/:id", "Query").unwrap();
///
/// let resolved = router.resolve("/query/17").unwrap().unwrap();
/// assert_eq!(resolved.view, "Query");
/// assert_eq!(resolved.params.get("id"), Some("17"));
/// ```
#[derive(Debug, Clone)]
pub struct Router {
	routes: Vec<Route>,
	named_routes: HashMap<String, usize>,
	not_found: ViewId,
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

impl Router {
	/// Creates an empty router whose fallback view is `NotFound`.
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			named_routes: HashMap::new(),
			not_found: RouteConfig::default().not_found,
		}
	}

	/// Builds a router from configuration, compiling every entry in order.
	pub fn from_config(config: &RouteConfig) -> Result<Self, ConfigError> {
		let mut router = Self::new().not_found(config.not_found.clone());
		for entry in &config.routes {
			router = router
				.push(&entry.template, entry.view.clone(), entry.name.clone())
				.map_err(|source| ConfigError::Route {
					template: entry.template.clone(),
					source,
				})?;
		}
		Ok(router)
	}

	/// Adds a route.
	pub fn route(self, template: &str, view: impl Into<ViewId>) -> Result<Self, RouteError> {
		self.push(template, view.into(), None)
	}

	/// Adds a named route, usable with [`Router::reverse`].
	///
	/// Registering a name twice points it at the newer route.
	pub fn named_route(
		self,
		name: &str,
		template: &str,
		view: impl Into<ViewId>,
	) -> Result<Self, RouteError> {
		self.push(template, view.into(), Some(name.to_string()))
	}

	/// Sets the view used by [`Router::resolve_or_not_found`].
	pub fn not_found(mut self, view: impl Into<ViewId>) -> Self {
		self.not_found = view.into();
		self
	}

	fn push(mut self, template: &str, view: ViewId, name: Option<String>) -> Result<Self, RouteError> {
		let pattern = RoutePattern::compile(template)?;
		if let Some(name) = &name {
			self.named_routes.insert(name.clone(), self.routes.len());
		}
		self.routes.push(Route {
			pattern,
			view,
			name,
		});
		Ok(self)
	}

	/// Registered routes in order.
	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	/// Fallback view.
	pub fn not_found_view(&self) -> &ViewId {
		&self.not_found
	}

	/// Finds the first route matching `path`.
	///
	/// A malformed parameter in the first structurally matching route is an
	/// error; later routes are not tried.
	pub fn resolve(&self, path: &str) -> Result<Option<ResolvedRoute>, RouteError> {
		for route in &self.routes {
			if let Some(params) = route.pattern.matches(path)? {
				return Ok(Some(ResolvedRoute {
					view: route.view.clone(),
					params,
				}));
			}
		}
		Ok(None)
	}

	/// Like [`Router::resolve`], falling back to the not-found view with no
	/// params.
	pub fn resolve_or_not_found(&self, path: &str) -> Result<ResolvedRoute, RouteError> {
		Ok(self.resolve(path)?.unwrap_or_else(|| ResolvedRoute {
			view: self.not_found.clone(),
			params: RouteParams::new(),
		}))
	}

	/// Builds the path of a named route.
	pub fn reverse(&self, name: &str, params: &HashMap<String, String>) -> Result<String, RouteError> {
		let index = self
			.named_routes
			.get(name)
			.ok_or_else(|| RouteError::UnknownRouteName(name.to_string()))?;
		self.routes[*index].pattern.reverse(params)
	}

	/// Builds the path of a named route from `(name, value)` pairs.
	pub fn reverse_with<'a, I>(&self, name: &str, params: I) -> Result<String, RouteError>
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let params = params
			.into_iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect();
		self.reverse(name, &params)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::RouteEntry;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn router() -> Router {
		Router::new()
			.route("/", "Home")
			.unwrap()
			.named_route("query-new", "/query/new", "QueryEditor")
			.unwrap()
			.named_route("query-detail", "/query/:id", "Query")
			.unwrap()
			.named_route("user-query", "/users/:user/queries/:query", "UserQuery")
			.unwrap()
	}

	#[rstest]
	fn test_first_match_wins(router: Router) {
		let resolved = router.resolve("/query/new").unwrap().unwrap();
		assert_eq!(resolved.view, "QueryEditor");
		assert!(resolved.params.is_empty());

		let resolved = router.resolve("/query/new2").unwrap().unwrap();
		assert_eq!(resolved.view, "Query");
		assert_eq!(resolved.params.get("id"), Some("new2"));
	}

	#[rstest]
	fn test_no_match(router: Router) {
		assert!(router.resolve("/nothing/here").unwrap().is_none());
		let fallback = router.resolve_or_not_found("/nothing/here").unwrap();
		assert_eq!(fallback.view, "NotFound");
		assert!(fallback.params.is_empty());
	}

	#[rstest]
	fn test_custom_not_found(router: Router) {
		let router = router.not_found("Missing");
		assert_eq!(router.resolve_or_not_found("/x").unwrap().view, "Missing");
	}

	#[rstest]
	fn test_malformed_param_is_error(router: Router) {
		let err = router.resolve("/query/%ZZ").unwrap_err();
		assert!(matches!(err, RouteError::MalformedInput { .. }));
	}

	#[rstest]
	fn test_reverse(router: Router) {
		let path = router
			.reverse_with("user-query", [("user", "7"), ("query", "a b")])
			.unwrap();
		assert_eq!(path, "/users/7/queries/a%20b");

		let resolved = router.resolve(&path).unwrap().unwrap();
		assert_eq!(resolved.view, "UserQuery");
		assert_eq!(resolved.params.get("query"), Some("a b"));
	}

	#[rstest]
	fn test_reverse_errors(router: Router) {
		let err = router.reverse("missing", &HashMap::new()).unwrap_err();
		assert!(matches!(err, RouteError::UnknownRouteName(_)));

		let err = router.reverse("query-detail", &HashMap::new()).unwrap_err();
		assert!(matches!(err, RouteError::MissingParameter(ref p) if p == "id"));
	}

	#[rstest]
	fn test_resolved_into_target(router: Router) {
		let target = router
			.resolve("/users/7/queries/12")
			.unwrap()
			.unwrap()
			.into_target();
		assert_eq!(target.view, "UserQuery");
		assert_eq!(serde_json::Value::Object(target.props), json!({"user": "7", "query": "12"}));
	}

	#[rstest]
	fn test_from_config() {
		let config = RouteConfig {
			not_found: ViewId::new("Lost"),
			routes: vec![
				RouteEntry {
					template: "/".into(),
					view: ViewId::new("Home"),
					name: None,
				},
				RouteEntry {
					template: "/query/:id".into(),
					view: ViewId::new("Query"),
					name: Some("query-detail".into()),
				},
			],
			..RouteConfig::default()
		};

		let router = Router::from_config(&config).unwrap();
		assert_eq!(router.routes().len(), 2);
		assert_eq!(router.routes()[1].name(), Some("query-detail"));
		assert_eq!(router.not_found_view(), "Lost");
		assert_eq!(router.reverse_with("query-detail", [("id", "3")]).unwrap(), "/query/3");
	}

	#[rstest]
	fn test_from_config_reports_bad_template() {
		let config = RouteConfig {
			routes: vec![RouteEntry {
				template: "x".repeat(2048),
				view: ViewId::new("Huge"),
				name: None,
			}],
			..RouteConfig::default()
		};
		let err = Router::from_config(&config).unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Route {
				source: RouteError::TemplateTooLong { .. },
				..
			}
		));
	}
}
