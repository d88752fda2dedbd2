//! Error types for client-side routing.

use thiserror::Error;

/// Error type for route compilation, matching and reversing.
///
/// A path that simply does not match a route is not an error; matchers
/// return `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum RouteError {
	/// A matched parameter segment holds an invalid percent-encoding.
	#[error("Malformed percent-encoding in parameter '{param}': {value}")]
	MalformedInput {
		/// Name of the parameter being decoded.
		param: String,
		/// Raw segment as it appeared in the path.
		value: String,
	},
	/// The template is longer than the compiler accepts.
	#[error("Route template length {length} exceeds maximum allowed length of {max} bytes")]
	TemplateTooLong {
		/// Length of the rejected template in bytes.
		length: usize,
		/// Maximum accepted length in bytes.
		max: usize,
	},
	/// The regex engine rejected the compiled pattern.
	#[error("Failed to compile route pattern: {0}")]
	Pattern(#[from] regex::Error),
	/// No route is registered under this name.
	#[error("Invalid route name: {0}")]
	UnknownRouteName(String),
	/// Reversing a route needs a value for this parameter.
	#[error("Missing parameter: {0}")]
	MissingParameter(String),
}

/// Error type for typed path parameter extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
	/// Failed to parse a parameter value.
	#[error("Failed to parse parameter[{param_index}] '{raw_value}' as {param_type}: {reason}")]
	ParseError {
		/// Index of the parameter that failed to parse.
		param_index: usize,
		/// Expected type name.
		param_type: &'static str,
		/// Raw string value that failed to parse.
		raw_value: String,
		/// Error message from parsing.
		reason: String,
	},
	/// Parameter count mismatch.
	#[error("Parameter count mismatch: expected {expected}, got {actual}")]
	CountMismatch {
		/// Expected number of parameters.
		expected: usize,
		/// Actual number of parameters.
		actual: usize,
	},
}
