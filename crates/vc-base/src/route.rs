//! In-app location (path + query string) with back/forward history.
//!
//! The location plays the role a page URL plays in a browser: the selected tab is
//! read from its `tab` parameter on start and written back on every tab change, so a
//! view can be deep-linked with `--route "?tab=branches"` and restored between runs.
//! Writing a query never resets other view state.

use std::collections::HashMap;
use std::fmt;

use url::form_urlencoded;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Parse `path?k=v&k2=v2`. Either side may be empty.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((p, q)) => (p, q),
            None => (input, ""),
        };
        let query = form_urlencoded::parse(query.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        Self { path: path.to_string(), query }
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Copy of this location with `updates` merged into the query.
    /// Existing keys keep their position; new keys are appended.
    pub fn with_query(&self, updates: &[(&str, &str)]) -> Self {
        let mut query = self.query.clone();
        for (key, value) in updates {
            match query.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => query.push((key.to_string(), value.to_string())),
            }
        }
        Self { path: self.path.clone(), query }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new()).extend_pairs(self.query.iter()).finish();
            write!(f, "?{}", encoded)?;
        }
        Ok(())
    }
}

/// Query parameters of a location as a map (last value wins).
pub fn query_from_url(location: &Location) -> HashMap<String, String> {
    location.query.iter().cloned().collect()
}

/// Location history. The entry at `index` is the current location.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Location>,
    index: usize,
}

impl Router {
    pub fn new(initial: Location) -> Self {
        Self { history: vec![initial], index: 0 }
    }

    pub fn current(&self) -> &Location {
        &self.history[self.index]
    }

    /// Merge `updates` into the current query and push the result.
    /// Forward entries are discarded, as a browser does after navigating.
    pub fn go_to_with_query(&mut self, updates: &[(&str, &str)]) -> &Location {
        let next = self.current().with_query(updates);
        if next != *self.current() {
            self.history.truncate(self.index + 1);
            self.history.push(next);
            self.index += 1;
        }
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.history.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.index += 1;
        true
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Location::default())
    }
}
