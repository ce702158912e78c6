use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

pub const DYNAMIC_MARKER: char = ':';

/// Named patterns that `:name` segments are matched against.
#[derive(Debug, Default, Clone)]
pub struct DynamicSegments {
	patterns: HashMap<String, Regex>,
}

impl DynamicSegments {
	/// Compiles `pattern` and stores it under `name`, replacing any previous entry.
	///
	/// Patterns are anchored to the whole segment unless they already start with `^`.
	pub fn define(&mut self, name: &str, pattern: &str) -> Result<()> {
		if !name.starts_with(DYNAMIC_MARKER) || name.len() == 1 {
			return Err(Error::InvalidSegmentName(name.to_owned()));
		}

		let anchored = if pattern.starts_with('^') {
			pattern.to_owned()
		} else {
			format!("^(?:{})$", pattern)
		};

		let regex = Regex::new(&anchored).map_err(|source| Error::InvalidPattern {
			name: name.to_owned(),
			source,
		})?;

		log::debug!("defined dynamic segment {} as {}", name, anchored);
		self.patterns.insert(name.to_owned(), regex);
		Ok(())
	}

	pub fn lookup(&self, name: &str) -> Option<&Regex> {
		self.patterns.get(name)
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}

pub fn is_dynamic(token: &str) -> bool {
	token.starts_with(DYNAMIC_MARKER)
}
