//! Request parameter mappings, including nested values expanded with bracket notation.

// self
use crate::_prelude::*;

/// A single parameter value: plain text or a nested mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
	/// Scalar value.
	Text(String),
	/// Nested mapping expanded as `parent[child]`.
	Nested(Parameters),
}
impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<Parameters> for ParamValue {
	fn from(value: Parameters) -> Self {
		Self::Nested(value)
	}
}
impl<V> From<Vec<V>> for ParamValue
where
	V: Into<ParamValue>,
{
	/// Lists become nested mappings keyed by their position.
	fn from(values: Vec<V>) -> Self {
		Self::Nested(values.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect())
	}
}

/// Ordered parameter mapping used for signing and form bodies.
///
/// Keys are unique; inserting an existing key replaces its value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters(BTreeMap<String, ParamValue>);
impl Parameters {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses an `application/x-www-form-urlencoded` string (a query or a form body).
	///
	/// Bracketed keys nest the way servers decode them: `a[k]=v` stores `v` under `k` inside
	/// `a`, and `a[]=v` appends `v` at the next numeric index of `a`. Later pairs for the same
	/// key replace earlier ones.
	pub fn from_query(query: &str) -> Self {
		let mut parameters = Self::new();

		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			match split_bracketed(&key) {
				Some((name, path)) => parameters.insert_path(name, &path, value.into_owned()),
				None => {
					parameters.insert(key.into_owned(), value.into_owned());
				},
			}
		}

		parameters
	}

	/// Inserts or replaces a value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
		self.0.insert(key.into(), value.into());

		self
	}

	/// Builder-style variant of [`Parameters::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.insert(key, value);

		self
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&ParamValue> {
		self.0.get(key)
	}

	/// Returns the text stored under `key`, ignoring nested values.
	pub fn get_text(&self, key: &str) -> Option<&str> {
		match self.0.get(key)? {
			ParamValue::Text(text) => Some(text),
			ParamValue::Nested(_) => None,
		}
	}

	/// Copies every entry of `other` into `self`; `other` wins on key collisions.
	pub fn merge(&mut self, other: &Parameters) {
		for (key, value) in &other.0 {
			self.0.insert(key.clone(), value.clone());
		}
	}

	/// Stores `value` under `key` followed by the nested `path` segments; an empty segment
	/// appends at the next numeric index.
	fn insert_path(&mut self, key: &str, path: &[&str], value: String) {
		let Some((segment, rest)) = path.split_first() else {
			self.0.insert(key.to_owned(), ParamValue::Text(value));

			return;
		};
		let entry =
			self.0.entry(key.to_owned()).or_insert_with(|| ParamValue::Nested(Parameters::new()));

		if let ParamValue::Text(_) = entry {
			*entry = ParamValue::Nested(Parameters::new());
		}
		if let ParamValue::Nested(nested) = entry {
			let child = if segment.is_empty() { nested.next_index() } else { (*segment).to_owned() };

			nested.insert_path(&child, rest, value);
		}
	}

	fn next_index(&self) -> String {
		self.0
			.keys()
			.filter_map(|key| key.parse::<usize>().ok())
			.max()
			.map_or(0, |max| max + 1)
			.to_string()
	}

	/// Number of top-level entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the mapping holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over top-level entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Flattens nested values into `parent[child]` keyed pairs, depth first.
	pub fn flatten(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(self.0.len());

		flatten_into(self, None, &mut pairs);

		pairs
	}

	/// Serializes the flattened pairs as an `application/x-www-form-urlencoded` body.
	pub fn to_form_body(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new()).extend_pairs(self.flatten()).finish()
	}
}
impl<K, V> FromIterator<(K, V)> for Parameters
where
	K: Into<String>,
	V: Into<ParamValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Splits `name[a][b]` into `name` and `["a", "b"]`; keys without a well-formed bracket
/// group stay literal.
fn split_bracketed(key: &str) -> Option<(&str, Vec<&str>)> {
	let open = key.find('[').filter(|&open| open > 0)?;
	let (name, mut rest) = key.split_at(open);
	let mut path = Vec::new();

	while let Some(inner) = rest.strip_prefix('[') {
		let close = inner.find(']')?;

		path.push(&inner[..close]);
		rest = &inner[close + 1..];
	}

	Some((name, path))
}

fn flatten_into(parameters: &Parameters, parent: Option<&str>, out: &mut Vec<(String, String)>) {
	for (key, value) in &parameters.0 {
		let key = match parent {
			Some(parent) => format!("{parent}[{key}]"),
			None => key.clone(),
		};

		match value {
			ParamValue::Text(text) => out.push((key, text.clone())),
			ParamValue::Nested(nested) => flatten_into(nested, Some(&key), out),
		}
	}
}
