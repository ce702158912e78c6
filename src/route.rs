use crate::dynamic::is_dynamic;

/// Method sentinel matching any request method.
pub const ALL: &str = "ALL";

/// Token standing for the root path `/`.
pub const ROOT: &str = "/";

/// Token of a catch-all segment.
pub const CATCH_ALL: &str = "*";

/// Separator between a route path and its version, as in `/users#v2`.
pub const VERSION_SEPARATOR: char = '#';

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PathSegment<'a> {
	Static(&'a str),
	/// A `:name` token matched against a registered pattern.
	Dynamic(&'a str),
	CatchAll,
}

impl<'a> PathSegment<'a> {
	pub fn classify(token: &'a str) -> Self {
		if token == CATCH_ALL {
			PathSegment::CatchAll
		} else if is_dynamic(token) {
			PathSegment::Dynamic(token)
		} else {
			PathSegment::Static(token)
		}
	}

	pub fn is_static(&self) -> bool {
		matches!(self, PathSegment::Static(_))
	}
}

/// Splits a path on `/`, dropping empty tokens. The root path yields a single [`ROOT`] token.
pub fn split_path(path: &str) -> Vec<&str> {
	let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
	if segments.is_empty() {
		vec![ROOT]
	} else {
		segments
	}
}

/// Separates an optional `#version` suffix from a route path.
pub fn split_version(path: &str) -> (&str, &str) {
	match path.find(VERSION_SEPARATOR) {
		Some(i) => (&path[..i], &path[i + 1..]),
		None => (path, ""),
	}
}

/// Parses a comma separated method list. A missing or blank list means [`ALL`].
pub fn parse_methods(methods: Option<&str>) -> Vec<String> {
	let parsed: Vec<String> = methods
		.unwrap_or_default()
		.split(',')
		.map(str::trim)
		.filter(|m| !m.is_empty())
		.map(str::to_uppercase)
		.collect();

	if parsed.is_empty() {
		vec![ALL.to_owned()]
	} else {
		parsed
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn splits_paths() {
		assert_eq!(split_path("/a/b/c"), vec!["a", "b", "c"]);
		assert_eq!(split_path("a//b/"), vec!["a", "b"]);
		assert_eq!(split_path("/"), vec![ROOT]);
		assert_eq!(split_path(""), vec![ROOT]);
		assert_eq!(split_path("///"), vec![ROOT]);
	}

	#[test]
	fn splits_versions() {
		assert_eq!(split_version("/x#v1"), ("/x", "v1"));
		assert_eq!(split_version("/x"), ("/x", ""));
		assert_eq!(split_version("/x#"), ("/x", ""));
		assert_eq!(split_version("/x#a#b"), ("/x", "a#b"));
	}

	#[test]
	fn parses_methods() {
		assert_eq!(parse_methods(None), vec![ALL]);
		assert_eq!(parse_methods(Some("  ")), vec![ALL]);
		assert_eq!(parse_methods(Some("get, post,,")), vec!["GET", "POST"]);
		assert_eq!(parse_methods(Some("PURGE")), vec!["PURGE"]);
	}

	#[test]
	fn classifies_segments() {
		assert_eq!(PathSegment::classify("users"), PathSegment::Static("users"));
		assert_eq!(PathSegment::classify(":id"), PathSegment::Dynamic(":id"));
		assert_eq!(PathSegment::classify("*"), PathSegment::CatchAll);
		assert!(PathSegment::classify(ROOT).is_static());
	}
}
