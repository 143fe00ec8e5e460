//! Request header sets with case-insensitive replacement.

use std::collections::HashMap;

/// Ordered header list. Setting a name that is already present (any case) replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim();
        let value = value.trim();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Apply `extra` on top of the current headers; `extra` wins on matching names.
    pub fn overlay(&mut self, extra: &HashMap<String, String>) {
        for (k, v) in extra {
            self.set(k, v);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn to_curl_list(&self) -> Result<curl::easy::List, curl::Error> {
        let mut list = curl::easy::List::new();
        for (k, v) in self.iter() {
            list.append(&format!("{}: {}", k, v))?;
        }
        Ok(list)
    }
}

/// Headers for fetching a page or manifest: the URL doubles as its own referer.
pub fn page_headers(user_agent: &str, url: &str) -> HeaderSet {
    let mut h = HeaderSet::new();
    h.set("User-Agent", user_agent);
    h.set("Accept", "*/*");
    h.set("Accept-Language", "en-US,en;q=0.9");
    h.set("Referer", url);
    h
}

/// Headers for fetching a segment. Stream headers override the defaults.
pub fn segment_headers(user_agent: &str, stream_headers: &HashMap<String, String>) -> HeaderSet {
    let mut h = HeaderSet::new();
    h.set("User-Agent", user_agent);
    h.set("Accept", "*/*");
    h.set("Accept-Encoding", "gzip, deflate");
    h.overlay(stream_headers);
    h
}
