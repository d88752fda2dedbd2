//! Route templates compiled to anchored regular expressions.
//!
//! Templates use `/` as the segment separator and `:name` for a variable
//! segment:
//!
//! - `/` - exact match
//! - `/users/:id` - one parameter
//! - `/users/:user_id/queries/:query_id` - several parameters
//!
//! A parameter name runs from the `:` up to the next `/` (or the end of the
//! template). Each parameter matches one or more characters other than `/`.
//! Everything else is literal text and only matches itself. Patterns are
//! anchored at both ends, so there is no prefix matching.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use super::decode::{decode_segment, encode_segment};
use super::error::RouteError;

/// Maximum allowed length for a route template in bytes.
const MAX_TEMPLATE_LENGTH: usize = 1024;

/// Maximum allowed size for a compiled route regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20;

/// Capture used for every `:name` token.
const SEGMENT_CAPTURE: &str = "([^/]+)";

/// A compiled route template.
///
/// Compile once with [`RoutePattern::compile`], then match any number of
/// candidate paths. Cloning shares the compiled program.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The template as written.
	template: String,
	/// Anchored regex with one capture group per parameter.
	regex: Regex,
	/// Parameter names in order of appearance.
	param_names: Vec<String>,
}

impl RoutePattern {
	/// Compiles a route template.
	///
	/// Any template is accepted; one without `:name` tokens is a static
	/// route. A `:` with no name after it is literal text.
	///
	/// # Errors
	///
	/// Returns [`RouteError::TemplateTooLong`] for templates over 1024 bytes
	/// and [`RouteError::Pattern`] if the regex engine refuses the result.
	pub fn compile(template: &str) -> Result<Self, RouteError> {
		if template.len() > MAX_TEMPLATE_LENGTH {
			return Err(RouteError::TemplateTooLong {
				length: template.len(),
				max: MAX_TEMPLATE_LENGTH,
			});
		}

		let (regex_str, param_names) = Self::translate(template);
		let regex = RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()?;

		Ok(Self {
			template: template.to_string(),
			regex,
			param_names,
		})
	}

	/// Translates a template into regex source and its parameter names.
	fn translate(template: &str) -> (String, Vec<String>) {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		let mut rest = template;

		while let Some(colon) = rest.find(':') {
			let after = &rest[colon + 1..];
			let name_len = after.find('/').unwrap_or(after.len());

			if name_len == 0 {
				// Bare ':' stays literal
				regex_str.push_str(&regex::escape(&rest[..=colon]));
			} else {
				regex_str.push_str(&regex::escape(&rest[..colon]));
				regex_str.push_str(SEGMENT_CAPTURE);
				param_names.push(after[..name_len].to_string());
			}
			rest = &after[name_len..];
		}

		regex_str.push_str(&regex::escape(rest));
		regex_str.push('$');
		(regex_str, param_names)
	}

	/// Returns the template this pattern was compiled from.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the parameter names in order of appearance.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether the template has no parameters.
	pub fn is_static(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Matches a candidate path against this pattern.
	///
	/// - `Ok(Some(params))`: the whole path matched; values are
	///   percent-decoded.
	/// - `Ok(None)`: no match. Callers move on to the next route.
	///
	/// # Errors
	///
	/// Returns [`RouteError::MalformedInput`] when a captured segment is not
	/// valid percent-encoded UTF-8.
	pub fn matches(&self, candidate: &str) -> Result<Option<RouteParams>, RouteError> {
		let Some(captures) = self.regex.captures(candidate) else {
			return Ok(None);
		};

		let mut params = RouteParams::with_capacity(self.param_names.len());
		// Group 0 is the whole match; parameter groups follow in order
		for (name, group) in self.param_names.iter().zip(captures.iter().skip(1)) {
			let raw = group.map(|m| m.as_str()).unwrap_or_default();
			let value = decode_segment(raw).ok_or_else(|| RouteError::MalformedInput {
				param: name.clone(),
				value: raw.to_string(),
			})?;
			params.push(name.clone(), value);
		}

		Ok(Some(params))
	}

	/// Checks whether the path matches, without decoding parameters.
	pub fn is_match(&self, candidate: &str) -> bool {
		self.regex.is_match(candidate)
	}

	/// Builds a path from this template, percent-encoding each value.
	///
	/// # Errors
	///
	/// Returns [`RouteError::MissingParameter`] if `params` lacks a name the
	/// template declares.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Result<String, RouteError> {
		let mut path = String::with_capacity(self.template.len());
		let mut rest = self.template.as_str();

		while let Some(colon) = rest.find(':') {
			let after = &rest[colon + 1..];
			let name_len = after.find('/').unwrap_or(after.len());

			if name_len == 0 {
				path.push_str(&rest[..=colon]);
			} else {
				let name = &after[..name_len];
				let value = params
					.get(name)
					.ok_or_else(|| RouteError::MissingParameter(name.to_string()))?;
				path.push_str(&rest[..colon]);
				path.push_str(&encode_segment(value));
			}
			rest = &after[name_len..];
		}

		path.push_str(rest);
		Ok(path)
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
	}
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.template)
	}
}

/// Compiles a route template. Shorthand for [`RoutePattern::compile`].
pub fn compile_route(template: &str) -> Result<RoutePattern, RouteError> {
	RoutePattern::compile(template)
}

/// Matches a path against a compiled route. Shorthand for
/// [`RoutePattern::matches`].
pub fn match_route(route: &RoutePattern, candidate: &str) -> Result<Option<RouteParams>, RouteError> {
	route.matches(candidate)
}

/// Parameters extracted by a successful match.
///
/// Entries keep the order parameters appear in the template. If a template
/// repeats a name, every occurrence is kept in [`RouteParams::values`] and
/// lookups by name see the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
	entries: Vec<(String, String)>,
}

impl RouteParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
		}
	}

	pub(crate) fn push(&mut self, name: String, value: String) {
		self.entries.push((name, value));
	}

	/// Looks up a decoded value by parameter name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.rev()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Returns whether a parameter with this name was captured.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Number of captured values.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether nothing was captured (static route).
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over `(name, value)` pairs in template order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}

	/// Values in template order.
	pub fn values(&self) -> Vec<String> {
		self.entries.iter().map(|(_, value)| value.clone()).collect()
	}

	/// Converts into a name-to-value map.
	pub fn into_map(self) -> HashMap<String, String> {
		self.entries.into_iter().collect()
	}
}

impl<'a> IntoIterator for &'a RouteParams {
	type Item = (&'a str, &'a str);
	type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

	fn into_iter(self) -> Self::IntoIter {
		Box::new(self.iter())
	}
}
