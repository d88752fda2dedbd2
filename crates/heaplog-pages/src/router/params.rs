//! Typed extraction of route parameters.
//!
//! Views that take an id or a page number do not want to re-parse strings;
//! [`FromPath`] turns the values of a [`RouteParams`] into typed values,
//! positionally, in the order the parameters appear in the template.

use std::ops::Deref;

use super::error::PathError;
use super::pattern::RouteParams;

/// Trait for extracting typed values from matched route parameters.
pub trait FromPath: Sized {
	/// Extracts Self from the matched parameters.
	///
	/// # Errors
	///
	/// Returns [`PathError::CountMismatch`] if the number of parameters doesn't match.
	/// Returns [`PathError::ParseError`] if parameter parsing fails.
	fn from_path(params: &RouteParams) -> Result<Self, PathError>;
}

/// Wrapper marking a value as extracted from the path.
///
/// ```
/// use heaplog_pages::router::{FromPath, PathParams, RoutePattern};
///
/// let pattern = RoutePattern::compile("/users/:user/queries/:query").unwrap();
/// let params = pattern.matches("/users/7/queries/12").unwrap().unwrap();
///
/// let PathParams((user, query)) = PathParams::<(u32, u64)>::from_path(&params).unwrap();
/// assert_eq!((user, query), (7, 12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathParams<T>(pub T);

impl<T> PathParams<T> {
	/// Unwraps the inner value.
	pub fn into_inner(self) -> T {
		self.0
	}
}

impl<T> Deref for PathParams<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<T> AsRef<T> for PathParams<T> {
	fn as_ref(&self) -> &T {
		&self.0
	}
}

impl<T: FromPath> FromPath for PathParams<T> {
	fn from_path(params: &RouteParams) -> Result<Self, PathError> {
		T::from_path(params).map(PathParams)
	}
}

fn expect_count(values: &[String], expected: usize) -> Result<(), PathError> {
	if values.len() != expected {
		return Err(PathError::CountMismatch {
			expected,
			actual: values.len(),
		});
	}
	Ok(())
}

fn parse_at<T>(values: &[String], index: usize, type_name: &'static str) -> Result<T, PathError>
where
	T: std::str::FromStr,
	T::Err: std::fmt::Display,
{
	let raw = values.get(index).ok_or(PathError::CountMismatch {
		expected: index + 1,
		actual: values.len(),
	})?;
	raw.parse::<T>().map_err(|e| PathError::ParseError {
		param_index: index,
		param_type: type_name,
		raw_value: raw.clone(),
		reason: e.to_string(),
	})
}

macro_rules! impl_from_path_for_primitive {
	($($ty:ty => $type_name:expr),* $(,)?) => {
		$(
			impl FromPath for $ty {
				fn from_path(params: &RouteParams) -> Result<Self, PathError> {
					let values = params.values();
					expect_count(&values, 1)?;
					parse_at(&values, 0, $type_name)
				}
			}
		)*
	};
}

impl_from_path_for_primitive! {
	i32 => "i32",
	i64 => "i64",
	u32 => "u32",
	u64 => "u64",
	bool => "bool",
}

impl FromPath for String {
	fn from_path(params: &RouteParams) -> Result<Self, PathError> {
		let mut values = params.values();
		expect_count(&values, 1)?;
		Ok(values.remove(0))
	}
}

macro_rules! impl_from_path_for_tuple {
	($($idx:tt => $ty:ident),+ $(,)?) => {
		impl<$($ty),+> FromPath for ($($ty,)+)
		where
			$($ty: std::str::FromStr,)+
			$(<$ty as std::str::FromStr>::Err: std::fmt::Display,)+
		{
			fn from_path(params: &RouteParams) -> Result<Self, PathError> {
				let values = params.values();
				expect_count(&values, [$($idx),+].len())?;
				Ok((
					$(parse_at::<$ty>(&values, $idx, std::any::type_name::<$ty>())?,)+
				))
			}
		}
	};
}

impl_from_path_for_tuple!(0 => A, 1 => B);
impl_from_path_for_tuple!(0 => A, 1 => B, 2 => C);
impl_from_path_for_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
impl_from_path_for_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_from_path_for_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn params(values: &[&str]) -> RouteParams {
		let mut params = RouteParams::new();
		for (index, value) in values.iter().enumerate() {
			params.push(format!("p{index}"), value.to_string());
		}
		params
	}

	#[rstest]
	fn test_path_params_wrapper() {
		let wrapped = PathParams(42i64);
		assert_eq!(*wrapped, 42);
		let value: &i64 = wrapped.as_ref();
		assert_eq!(*value, 42);
		assert_eq!(wrapped.into_inner(), 42);
	}

	#[rstest]
	fn test_from_path_primitives() {
		assert_eq!(i32::from_path(&params(&["-42"])).unwrap(), -42);
		assert_eq!(
			i64::from_path(&params(&["9223372036854775807"])).unwrap(),
			i64::MAX
		);
		assert_eq!(u32::from_path(&params(&["42"])).unwrap(), 42);
		assert_eq!(
			u64::from_path(&params(&["18446744073709551615"])).unwrap(),
			u64::MAX
		);
		assert!(bool::from_path(&params(&["true"])).unwrap());
		assert!(!bool::from_path(&params(&["false"])).unwrap());
	}

	#[rstest]
	fn test_from_path_string_keeps_decoded_value() {
		assert_eq!(
			String::from_path(&params(&["hello world"])).unwrap(),
			"hello world"
		);
	}

	#[rstest]
	fn test_from_path_parse_error() {
		let err = i32::from_path(&params(&["not_a_number"])).unwrap_err();
		match err {
			PathError::ParseError {
				param_index,
				param_type,
				raw_value,
				..
			} => {
				assert_eq!(param_index, 0);
				assert_eq!(param_type, "i32");
				assert_eq!(raw_value, "not_a_number");
			}
			other => panic!("Expected ParseError, got {other:?}"),
		}
	}

	#[rstest]
	#[case(&[])]
	#[case(&["1", "2"])]
	fn test_from_path_single_count_mismatch(#[case] values: &[&str]) {
		let err = u32::from_path(&params(values)).unwrap_err();
		assert_eq!(
			err,
			PathError::CountMismatch {
				expected: 1,
				actual: values.len(),
			}
		);
	}

	#[rstest]
	fn test_from_path_tuples() {
		let (a, b) = <(i32, String)>::from_path(&params(&["42", "hello"])).unwrap();
		assert_eq!((a, b.as_str()), (42, "hello"));

		let (a, b, c, d) =
			<(i64, u64, String, bool)>::from_path(&params(&["123", "456", "test", "true"]))
				.unwrap();
		assert_eq!((a, b, c.as_str(), d), (123, 456, "test", true));

		let six = <(i32, i32, i32, i32, i32, i32)>::from_path(&params(&[
			"1", "2", "3", "4", "5", "6",
		]))
		.unwrap();
		assert_eq!(six, (1, 2, 3, 4, 5, 6));
	}

	#[rstest]
	fn test_from_path_tuple_errors() {
		let err = <(i32, String)>::from_path(&params(&["42"])).unwrap_err();
		assert_eq!(
			err,
			PathError::CountMismatch {
				expected: 2,
				actual: 1,
			}
		);

		let err = <(String, u32)>::from_path(&params(&["ok", "-1"])).unwrap_err();
		assert!(matches!(err, PathError::ParseError { param_index: 1, .. }));
	}
}
