// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Trie edge labels.
//!
//! A [`PathSegment`] names one edge between a node and its child. Publishers and
//! subscribers mix plain strings, integers and content digests of structured
//! fields freely, so the label is a closed union with a total order. The order
//! only matters for deterministic tie-breaking.

use std::fmt;

/// One edge label in the routing trie.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// Literal text value (field value, topic level, ...).
    Text(String),
    /// Signed integer value.
    Int(i64),
    /// Content digest of a structured or repeated field.
    Digest(u64),
}

/// Ordered sequence of segments from the root to a node.
pub type Path = Vec<PathSegment>;

impl PathSegment {
    /// Build a digest segment from a precomputed hash.
    #[must_use]
    pub fn digest(hash: u64) -> Self {
        Self::Digest(hash)
    }

    /// Returns the text value, if this is a text segment.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for PathSegment {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for PathSegment {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PathSegment {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Digest(h) => write!(f, "#{:016x}", h),
        }
    }
}

/// Collect anything segment-like into a [`Path`].
pub fn to_path<I, S>(segments: I) -> Path
where
    I: IntoIterator<Item = S>,
    S: Into<PathSegment>,
{
    segments.into_iter().map(Into::into).collect()
}

/// Render a path as `a/b/c` for log records.
pub(crate) fn display_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}
