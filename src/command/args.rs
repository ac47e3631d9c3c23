use std::collections::HashMap;

use regex::Regex;

/// Named arguments pulled out of a matched command line.
/// Extraction never fails; a non-matching line yields an empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgMap(HashMap<String, String>);

impl ArgMap {
    pub fn new() -> Self {
        ArgMap::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The argument value, or `""` when absent
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Copy every named capture group of `matcher` over `text` into an [`ArgMap`].
pub fn extract_named(matcher: &Regex, text: &str) -> ArgMap {
    let mut args = ArgMap::new();
    if let Some(caps) = matcher.captures(text) {
        for name in matcher.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                args.insert(name, m.as_str());
            }
        }
    }
    args
}
