/// Variables captured while matching a request path, in capture order.
///
/// Dynamic segments are stored under their `:name`, catch-alls under `"*"`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Params {
	entries: Vec<(String, String)>,
}

impl Params {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the collector extended with one more capture.
	#[must_use]
	pub fn add(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.entries.push((name.into(), value.into()));
		self
	}

	/// The most recently captured value for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.rev()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	/// Every value captured for `name`, outermost first.
	pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.entries
			.iter()
			.filter(move |(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<'a> IntoIterator for &'a Params {
	type Item = (&'a str, &'a str);
	type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

	fn into_iter(self) -> Self::IntoIter {
		Box::new(self.iter())
	}
}
