//! Route compilation and matching, end to end.

use heaplog_pages::router::{RouteError, RoutePattern, Router, compile_route, match_route};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("/users/:id", "/users/42", &[("id", "42")])]
#[case("/search/:q", "/search/hello%20world", &[("q", "hello world")])]
#[case("/", "/", &[])]
#[case(
	"/users/:user_id/queries/:query_id",
	"/users/u1/queries/q%2F2",
	&[("user_id", "u1"), ("query_id", "q/2")]
)]
fn test_matches(#[case] template: &str, #[case] path: &str, #[case] expected: &[(&str, &str)]) {
	let route = compile_route(template).unwrap();
	let params = match_route(&route, path).unwrap().unwrap();
	assert_eq!(params.iter().collect::<Vec<_>>(), expected);
}

#[rstest]
#[case("/users/:id", "/users/42/extra")]
#[case("/users/:id", "/users")]
#[case("/users/:id", "/accounts/42")]
#[case("/", "")]
#[case("/", "/home")]
#[case("/a/:x/b", "/a/1/c")]
fn test_no_match(#[case] template: &str, #[case] path: &str) {
	let route = compile_route(template).unwrap();
	assert!(match_route(&route, path).unwrap().is_none());
}

#[rstest]
fn test_malformed_percent_encoding() {
	let route = compile_route("/search/:q").unwrap();
	let err = match_route(&route, "/search/%E0%A4%A").unwrap_err();
	match err {
		RouteError::MalformedInput { param, value } => {
			assert_eq!(param, "q");
			assert_eq!(value, "%E0%A4%A");
		}
		other => panic!("Expected MalformedInput, got {other:?}"),
	}
}

#[rstest]
fn test_compiled_once_matched_many_times() {
	let route = compile_route("/query/:id").unwrap();
	let shared = route.clone();
	for id in 0..100 {
		let params = match_route(&shared, &format!("/query/{id}")).unwrap().unwrap();
		assert_eq!(params.get("id"), Some(id.to_string().as_str()));
	}
	assert_eq!(route, shared);
}

#[rstest]
fn test_reverse_then_resolve_agree() {
	let router = Router::new()
		.named_route("query", "/users/:user/queries/:query", "Query")
		.unwrap();

	for value in ["plain", "with space", "slash/inside", "100%", "ünïcödé", "a+b"] {
		let path = router
			.reverse_with("query", [("user", "me"), ("query", value)])
			.unwrap();
		let resolved = router.resolve(&path).unwrap().unwrap();
		assert_eq!(resolved.params.get("query"), Some(value));
	}
}

fn param_name() -> impl Strategy<Value = String> {
	"[a-z][a-z0-9_]{0,8}"
}

fn segment_value() -> impl Strategy<Value = String> {
	"[A-Za-z0-9._~-]{1,12}"
}

fn literal_segment() -> impl Strategy<Value = String> {
	"[a-z]{1,8}"
}

proptest! {
	#[test]
	fn prop_param_names_in_order(names in prop::collection::vec(param_name(), 0..6)) {
		let template: String = names.iter().map(|name| format!("/seg/:{name}")).collect();
		let pattern = RoutePattern::compile(&template).unwrap();
		prop_assert_eq!(pattern.param_names(), names.as_slice());
	}

	#[test]
	fn prop_structural_match_yields_declared_names(
		parts in prop::collection::vec((literal_segment(), param_name(), segment_value()), 1..5)
	) {
		let template: String = parts.iter().map(|(lit, name, _)| format!("/{lit}/:{name}")).collect();
		let path: String = parts.iter().map(|(lit, _, value)| format!("/{lit}/{value}")).collect();

		let pattern = RoutePattern::compile(&template).unwrap();
		let params = pattern.matches(&path).unwrap().unwrap();

		prop_assert_eq!(params.len(), parts.len());
		for ((_, name, _), (got_name, _)) in parts.iter().zip(params.iter()) {
			prop_assert_eq!(name.as_str(), got_name);
		}
		let expected: Vec<String> = parts.iter().map(|(_, _, value)| value.clone()).collect();
		prop_assert_eq!(params.values(), expected);
	}

	#[test]
	fn prop_extra_segment_never_matches(
		names in prop::collection::vec(param_name(), 1..5),
		extra in segment_value(),
	) {
		let template: String = names.iter().map(|name| format!("/:{name}")).collect();
		let mut path: String = names.iter().map(|_| "/x".to_string()).collect();
		path.push('/');
		path.push_str(&extra);

		let pattern = RoutePattern::compile(&template).unwrap();
		prop_assert!(pattern.matches(&path).unwrap().is_none());
	}

	#[test]
	fn prop_literal_mismatch_never_matches(a in literal_segment(), b in literal_segment()) {
		prop_assume!(a != b);
		let pattern = RoutePattern::compile(&format!("/{a}/:id")).unwrap();
		let path = format!("/{b}/1");
		prop_assert!(pattern.matches(&path).unwrap().is_none());
	}

	#[test]
	fn prop_static_template_matches_only_itself(template in "(/[a-z.+*()]{1,6}){1,4}", other in "(/[a-z]{1,6}){1,4}") {
		let pattern = RoutePattern::compile(&template).unwrap();
		prop_assert!(pattern.is_match(&template));
		prop_assert_eq!(pattern.is_match(&other), other == template);
	}
}
