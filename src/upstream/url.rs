//! Upstream URL composition.

/// Query key owned by the gateway; carries the logical path.
pub const PATH_PARAM: &str = "path";

/// Insertion-ordered query parameters with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. An existing key keeps its position and takes the new
    /// value, which is returned in place of the old one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Build the absolute URL for one candidate.
///
/// Returns `None` for an empty base, meaning the candidate is unusable.
/// The join character is `&` when the base already has a query string.
/// A caller-supplied `path` parameter is dropped.
pub fn compose_url(base: &str, logical_path: &str, params: &QueryParams) -> Option<String> {
    if base.is_empty() {
        return None;
    }

    let sep = if base.contains('?') { '&' } else { '?' };
    let mut url = format!("{base}{sep}{PATH_PARAM}={}", urlencoding::encode(logical_path));

    for (key, value) in params.iter().filter(|(k, _)| *k != PATH_PARAM) {
        url.push_str(&format!(
            "&{}={}",
            urlencoding::encode(key),
            urlencoding::encode(value)
        ));
    }

    Some(url)
}
