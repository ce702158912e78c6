use thiserror::Error;

/// Errors raised while registering routes and dynamic segments.
///
/// Matching never fails: an unroutable request is reported through
/// [`MatchStatus`](crate::MatchStatus) instead.
#[derive(Debug, Error)]
pub enum Error {
	/// The pattern for a dynamic segment did not compile.
	#[error("invalid pattern for {name}: {source}")]
	InvalidPattern {
		name: String,
		#[source]
		source: regex::Error,
	},

	/// Dynamic segment names must start with `:`.
	#[error("dynamic segment name {0:?} must start with ':'")]
	InvalidSegmentName(String),

	/// A route referenced a dynamic segment that was never defined.
	#[error("{0} not found, define it with define_segment({0:?}, pattern) first")]
	UnknownDynamicSegment(String),

	/// A catch-all was used before the last segment of a route.
	#[error("catch-all \"*\" must be the final segment of {0:?}")]
	CatchAllNotLast(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
