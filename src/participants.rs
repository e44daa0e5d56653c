use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// A contest participant id. Never empty, never contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Handle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(Error::InvalidHandle(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Handle {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants(Vec<Handle>);

impl Participants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one handle. Empty input is ignored, as is a handle that is already
    /// present; returns whether the set grew.
    pub fn add(&mut self, raw: &str) -> Result<bool> {
        if raw.is_empty() {
            return Ok(false);
        }
        let handle: Handle = raw.parse()?;
        if self.contains(&handle) {
            return Ok(false);
        }
        self.0.push(handle);
        Ok(true)
    }

    /// Adds every space separated handle of `line`. Rejected pieces are
    /// returned and do not stop the rest of the line from being read.
    pub fn add_line(&mut self, line: &str) -> Vec<Error> {
        let mut rejected = vec![];
        for piece in line.trim().split(' ') {
            if let Err(e) = self.add(piece) {
                warn!("{}", e);
                rejected.push(e);
            }
        }
        rejected
    }

    pub fn remove(&mut self, handle: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|h| h.as_str() != handle);
        self.0.len() != before
    }

    pub fn contains(&self, handle: &Handle) -> bool {
        self.0.contains(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space separated handles, in insertion order.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(Handle::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a Participants {
    type Item = &'a Handle;
    type IntoIter = std::slice::Iter<'a, Handle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
