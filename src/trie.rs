use crate::dynamic::DynamicSegments;
use crate::error::{Error, Result};
use crate::route::{PathSegment, ALL, ROOT};

/// One `(method, version) -> handler` row of a node's handler table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HandlerEntry<H> {
	pub method: String,
	pub version: String,
	pub handler: H,
}

/// A registered endpoint, as reported by [`Router::routes`](crate::Router::routes).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RouteInfo {
	pub path: String,
	pub method: String,
	pub version: String,
}

/// A trie node, one per path segment.
///
/// Children keep insertion order, which is also the order dynamic children are tried in.
#[derive(Debug, Clone)]
pub struct Node<H> {
	token: String,
	children: Vec<Node<H>>,
	handlers: Vec<HandlerEntry<H>>,
	has_dynamic_child: bool,
	has_catch_all_child: bool,
}

impl<H> Default for Node<H> {
	fn default() -> Self {
		Self::new("")
	}
}

impl<H> Node<H> {
	fn new(token: &str) -> Self {
		Self {
			token: token.to_owned(),
			children: Vec::new(),
			handlers: Vec::new(),
			has_dynamic_child: false,
			has_catch_all_child: false,
		}
	}

	pub fn token(&self) -> &str {
		&self.token
	}

	pub fn children(&self) -> &[Node<H>] {
		&self.children
	}

	pub fn handlers(&self) -> &[HandlerEntry<H>] {
		&self.handlers
	}

	pub fn has_dynamic_child(&self) -> bool {
		self.has_dynamic_child
	}

	pub fn has_catch_all_child(&self) -> bool {
		self.has_catch_all_child
	}

	fn segment(&self) -> PathSegment<'_> {
		PathSegment::classify(&self.token)
	}

	/// Dynamic children in insertion order.
	pub fn dynamic_children(&self) -> impl Iterator<Item = &Node<H>> {
		self.children
			.iter()
			.filter(|child| matches!(child.segment(), PathSegment::Dynamic(_)))
	}

	pub fn catch_all_child(&self) -> Option<&Node<H>> {
		if !self.has_catch_all_child {
			return None;
		}
		self.children
			.iter()
			.find(|child| child.segment() == PathSegment::CatchAll)
	}

	fn static_child(&self, token: &str) -> Option<&Node<H>> {
		self.children
			.iter()
			.find(|child| child.token == token && child.segment().is_static())
	}

	/// Stores `handler` under every method of `methods` at the node for `segments`,
	/// creating missing nodes along the way.
	///
	/// The whole path is validated before the trie is touched, so a failed insert
	/// leaves no partial branch behind.
	pub fn insert(
		&mut self,
		segments: &[&str],
		handler: H,
		methods: &[String],
		version: &str,
		dynamic: &DynamicSegments,
	) -> Result<()>
	where
		H: Clone,
	{
		let last = segments.len().saturating_sub(1);
		for (i, token) in segments.iter().enumerate() {
			match PathSegment::classify(token) {
				PathSegment::Dynamic(name) if dynamic.lookup(name).is_none() => {
					return Err(Error::UnknownDynamicSegment(name.to_owned()));
				}
				PathSegment::CatchAll if i != last => {
					return Err(Error::CatchAllNotLast(format!("/{}", segments.join("/"))));
				}
				_ => {}
			}
		}

		let mut node = self;
		for token in segments {
			let index = match node.children.iter().position(|child| child.token == *token) {
				Some(index) => index,
				None => {
					match PathSegment::classify(token) {
						PathSegment::Dynamic(_) => node.has_dynamic_child = true,
						PathSegment::CatchAll => node.has_catch_all_child = true,
						PathSegment::Static(_) => {}
					}
					node.children.push(Node::new(token));
					node.children.len() - 1
				}
			};
			node = &mut node.children[index];
		}

		let methods: Vec<String> = if methods.is_empty() {
			vec![ALL.to_owned()]
		} else {
			methods.to_vec()
		};

		for method in methods {
			match node
				.handlers
				.iter_mut()
				.find(|entry| entry.method == method && entry.version == version)
			{
				Some(entry) => entry.handler = handler.clone(),
				None => node.handlers.push(HandlerEntry {
					method,
					version: version.to_owned(),
					handler: handler.clone(),
				}),
			}
		}

		Ok(())
	}

	/// Follows literal matches as deep as they go.
	///
	/// Returns the deepest node reached, the segments left over, and whether every
	/// segment was consumed at a node serving `version`.
	pub fn resolve<'s, 'p>(
		&self,
		segments: &'s [&'p str],
		version: &str,
	) -> (&Self, &'s [&'p str], bool) {
		let mut node = self;
		let mut remaining = segments;

		while let Some((first, rest)) = remaining.split_first() {
			match node.static_child(first) {
				Some(child) => {
					node = child;
					remaining = rest;
				}
				None => break,
			}
		}

		let leaf = remaining.is_empty() && node.is_leaf_for(version);
		(node, remaining, leaf)
	}

	/// Whether this node has entries for `version` or version-less entries.
	pub fn is_leaf_for(&self, version: &str) -> bool {
		self.handlers
			.iter()
			.any(|entry| entry.version == version || entry.version.is_empty())
	}

	/// Version-specific entries win; version-less entries are the fallback.
	fn effective_version<'a>(&self, version: &'a str) -> &'a str {
		if self.handlers.iter().any(|entry| entry.version == version) {
			version
		} else {
			""
		}
	}

	/// First entry, in insertion order, for `ALL` or `method` at the request version.
	pub fn resolve_method(&self, method: &str, version: &str) -> Option<&H> {
		let version = self.effective_version(version);
		self.handlers
			.iter()
			.filter(|entry| entry.version == version)
			.find(|entry| entry.method == ALL || entry.method == method)
			.map(|entry| &entry.handler)
	}

	pub(crate) fn collect_routes(&self, prefix: &mut Vec<String>, out: &mut Vec<RouteInfo>) {
		let path = if prefix.is_empty() || (prefix.len() == 1 && prefix[0] == ROOT) {
			ROOT.to_owned()
		} else {
			format!("/{}", prefix.join("/"))
		};

		for entry in &self.handlers {
			out.push(RouteInfo {
				path: path.clone(),
				method: entry.method.clone(),
				version: entry.version.clone(),
			});
		}

		for child in &self.children {
			prefix.push(child.token.clone());
			child.collect_routes(prefix, out);
			prefix.pop();
		}
	}
}

#[cfg(test)]
mod test {
	use super::{HandlerEntry, Node};
	use crate::{route::split_path, DynamicSegments, Error};

	fn methods(list: &[&str]) -> Vec<String> {
		list.iter().map(|m| m.to_string()).collect()
	}

	fn dynamic() -> DynamicSegments {
		let mut segments = DynamicSegments::default();
		segments.define(":id", r"\d+").unwrap();
		segments
	}

	#[test]
	fn shares_prefixes() {
		let mut root = Node::default();
		let dynamic = dynamic();
		root.insert(&split_path("/a/b"), 1, &[], "", &dynamic).unwrap();
		root.insert(&split_path("/a/c"), 2, &[], "", &dynamic).unwrap();

		assert_eq!(root.children().len(), 1);
		let a = &root.children()[0];
		assert_eq!(a.token(), "a");
		assert!(a.handlers().is_empty());
		assert_eq!(
			a.children().iter().map(|c| c.token()).collect::<Vec<_>>(),
			vec!["b", "c"]
		);
	}

	#[test]
	fn tracks_child_flags() {
		let mut root = Node::default();
		let dynamic = dynamic();
		root.insert(&split_path("/a/:id"), 1, &[], "", &dynamic).unwrap();
		root.insert(&split_path("/a/*"), 2, &[], "", &dynamic).unwrap();
		root.insert(&split_path("/b"), 3, &[], "", &dynamic).unwrap();

		let a = &root.children()[0];
		assert!(a.has_dynamic_child());
		assert!(a.has_catch_all_child());
		assert_eq!(a.catch_all_child().map(|c| c.token()), Some("*"));
		assert_eq!(a.dynamic_children().count(), 1);
		assert!(!root.has_dynamic_child());
		assert!(!root.has_catch_all_child());
	}

	#[test]
	fn overwrites_same_method_and_version() {
		let mut root = Node::default();
		let dynamic = dynamic();
		root.insert(&split_path("/x"), 1, &methods(&["GET", "POST"]), "", &dynamic)
			.unwrap();
		root.insert(&split_path("/x"), 2, &methods(&["GET"]), "", &dynamic)
			.unwrap();
		root.insert(&split_path("/x"), 3, &methods(&["GET"]), "v1", &dynamic)
			.unwrap();

		let x = &root.children()[0];
		assert_eq!(
			x.handlers(),
			&[
				HandlerEntry { method: "GET".into(), version: "".into(), handler: 2 },
				HandlerEntry { method: "POST".into(), version: "".into(), handler: 1 },
				HandlerEntry { method: "GET".into(), version: "v1".into(), handler: 3 },
			]
		);
	}

	#[test]
	fn rejects_unknown_segments_without_side_effects() {
		let mut root: Node<u8> = Node::default();
		let result = root.insert(&split_path("/a/:name/b"), 1, &[], "", &dynamic());

		assert!(matches!(result, Err(Error::UnknownDynamicSegment(name)) if name == ":name"));
		assert!(root.children().is_empty());
	}

	#[test]
	fn rejects_inner_catch_all() {
		let mut root: Node<u8> = Node::default();
		let result = root.insert(&split_path("/a/*/b"), 1, &[], "", &dynamic());

		assert!(matches!(result, Err(Error::CatchAllNotLast(_))));
		assert!(root.children().is_empty());
	}

	#[test]
	fn resolves_literals_only() {
		let mut root = Node::default();
		let dynamic = dynamic();
		root.insert(&split_path("/a/:id/b"), 1, &[], "", &dynamic).unwrap();
		root.insert(&split_path("/a/list"), 2, &[], "", &dynamic).unwrap();

		let path = split_path("/a/list");
		let (node, remaining, leaf) = root.resolve(&path, "");
		assert_eq!(node.token(), "list");
		assert!(remaining.is_empty());
		assert!(leaf);

		let path = split_path("/a/42/b");
		let (node, remaining, leaf) = root.resolve(&path, "");
		assert_eq!(node.token(), "a");
		assert_eq!(remaining, &["42", "b"]);
		assert!(!leaf);

		let path = split_path("/a/:id/b");
		let (node, remaining, _) = root.resolve(&path, "");
		assert_eq!(node.token(), "a");
		assert_eq!(remaining, &[":id", "b"]);
	}

	#[test]
	fn inner_nodes_are_not_leaves() {
		let mut root = Node::default();
		root.insert(&split_path("/a/b"), 1, &[], "", &dynamic()).unwrap();

		let path = split_path("/a");
		let (node, remaining, leaf) = root.resolve(&path, "");
		assert_eq!(node.token(), "a");
		assert!(remaining.is_empty());
		assert!(!leaf);
	}

	#[test]
	fn resolves_methods_by_version() {
		let mut root = Node::default();
		let dynamic = dynamic();
		let path = split_path("/x");
		root.insert(&path, "default", &[], "", &dynamic).unwrap();
		root.insert(&path, "v2-get", &methods(&["GET"]), "v2", &dynamic).unwrap();

		let x = &root.children()[0];
		assert_eq!(x.resolve_method("GET", "v2"), Some(&"v2-get"));
		assert_eq!(x.resolve_method("POST", "v2"), None);
		assert_eq!(x.resolve_method("POST", "v1"), Some(&"default"));
		assert_eq!(x.resolve_method("GET", ""), Some(&"default"));
	}

	#[test]
	fn versioned_only_nodes_hide_from_other_versions() {
		let mut root = Node::default();
		root.insert(&split_path("/x"), 1, &[], "v1", &dynamic()).unwrap();

		let x = &root.children()[0];
		assert!(x.is_leaf_for("v1"));
		assert!(!x.is_leaf_for("v2"));
		assert!(!x.is_leaf_for(""));
	}

	#[test]
	fn first_matching_entry_wins() {
		let mut root = Node::default();
		let dynamic = dynamic();
		let path = split_path("/x");
		root.insert(&path, 1, &methods(&["GET"]), "", &dynamic).unwrap();
		root.insert(&path, 2, &[], "", &dynamic).unwrap();

		let x = &root.children()[0];
		assert_eq!(x.resolve_method("GET", ""), Some(&1));
		assert_eq!(x.resolve_method("DELETE", ""), Some(&2));
	}
}
