use crate::dynamic::DynamicSegments;
use crate::error::Result;
use crate::params::Params;
use crate::route::{parse_methods, split_path, split_version, CATCH_ALL};
use crate::trie::{Node, RouteInfo};

/// Outcome of matching a request against a [`Router`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MatchStatus {
	Found,
	NotFound,
	/// The path matched a route but no entry accepts the request method.
	MethodNotAllowed,
}

/// The handler resolved for a request, with the variables captured on the way.
///
/// `handler` is set only when `status` is [`MatchStatus::Found`].
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
	pub handler: Option<&'a H>,
	pub params: Params,
	pub status: MatchStatus,
}

impl<'a, H> RouteMatch<'a, H> {
	fn found(handler: &'a H, params: Params) -> Self {
		Self {
			handler: Some(handler),
			params,
			status: MatchStatus::Found,
		}
	}

	fn miss(status: MatchStatus, params: Params) -> Self {
		Self {
			handler: None,
			params,
			status,
		}
	}

	pub fn is_found(&self) -> bool {
		self.status == MatchStatus::Found
	}
}

/// Collects dynamic segments and routes. Call [`build`](Self::build) once registration is done.
#[derive(Debug, Clone)]
pub struct RouterBuilder<H> {
	segments: DynamicSegments,
	root: Node<H>,
	verbose: bool,
}

impl<H> Default for RouterBuilder<H> {
	fn default() -> Self {
		Self {
			segments: DynamicSegments::default(),
			root: Node::default(),
			verbose: true,
		}
	}
}

impl<H: Clone> RouterBuilder<H> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Log every registered route at `info` level. On by default.
	pub fn verbose(&mut self, verbose: bool) -> &mut Self {
		self.verbose = verbose;
		self
	}

	/// Defines the pattern a `:name` segment must match, e.g. `(":id", r"\d+")`.
	pub fn define_segment(&mut self, name: &str, pattern: &str) -> Result<&mut Self> {
		self.segments.define(name, pattern)?;
		Ok(self)
	}

	/// Registers `handler` for `path`.
	///
	/// `methods` is a comma separated list such as `"GET,HEAD"`; `None` accepts any method.
	/// A `#version` suffix on the path, like `/users#v2`, restricts the route to that version.
	pub fn register(&mut self, path: &str, handler: H, methods: Option<&str>) -> Result<&mut Self> {
		self.register_versioned(path, handler, methods, None)
	}

	/// Like [`register`](Self::register), with an explicit version that takes precedence
	/// over a `#version` suffix.
	pub fn register_versioned(
		&mut self,
		path: &str,
		handler: H,
		methods: Option<&str>,
		version: Option<&str>,
	) -> Result<&mut Self> {
		let (path, suffix) = split_version(path);
		let version = version.filter(|v| !v.is_empty()).unwrap_or(suffix);
		let methods = parse_methods(methods);

		self.root
			.insert(&split_path(path), handler, &methods, version, &self.segments)?;

		if self.verbose {
			log::info!("adding path: {} [{}] {}", path, methods.join(","), version);
		}
		Ok(self)
	}

	/// Freezes the routes. The returned router is read-only and can be shared across threads.
	pub fn build(self) -> Router<H> {
		Router {
			segments: self.segments,
			root: self.root,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Router<H> {
	segments: DynamicSegments,
	root: Node<H>,
}

impl<H> Router<H> {
	/// Finds the handler for `path`, `method` and `version`.
	///
	/// Literal children are preferred, then dynamic children in registration order,
	/// then a catch-all. Once a dynamic child matches the walk commits to it: a miss
	/// further down is not retried against its later siblings.
	pub fn find(&self, path: &str, method: &str, version: &str) -> RouteMatch<'_, H> {
		let segments = split_path(path);
		let (mut node, mut remaining, mut leaf) = self.root.resolve(&segments, version);
		let mut params = Params::new();

		loop {
			if leaf {
				return match node.resolve_method(method, version) {
					Some(handler) => RouteMatch::found(handler, params),
					None => RouteMatch::miss(MatchStatus::MethodNotAllowed, params),
				};
			}

			let (first, rest) = match remaining.split_first() {
				Some(split) => split,
				None => return RouteMatch::miss(MatchStatus::NotFound, params),
			};

			if node.has_dynamic_child() {
				let matched = node.dynamic_children().find(|child| {
					self.segments
						.lookup(child.token())
						.map_or(false, |pattern| pattern.is_match(first))
				});

				if let Some(child) = matched {
					params = params.add(child.token(), *first);
					let resolved = child.resolve(rest, version);
					node = resolved.0;
					remaining = resolved.1;
					leaf = resolved.2;
					continue;
				}
			}

			return match node.catch_all_child() {
				Some(child) if child.is_leaf_for(version) => {
					let params = params.add(CATCH_ALL, *first);
					match child.resolve_method(method, version) {
						Some(handler) => RouteMatch::found(handler, params),
						None => RouteMatch::miss(MatchStatus::MethodNotAllowed, params),
					}
				}
				_ => RouteMatch::miss(MatchStatus::NotFound, params),
			};
		}
	}

	/// Every registered `(path, method, version)` entry, depth first.
	pub fn routes(&self) -> Vec<RouteInfo> {
		let mut out = Vec::new();
		self.root.collect_routes(&mut Vec::new(), &mut out);
		out
	}

	pub fn dynamic_segments(&self) -> &DynamicSegments {
		&self.segments
	}
}
