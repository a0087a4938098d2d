//! Field masks for partial updates
//!
//! A [`FieldMask`] is the set of dotted paths a caller intends to change,
//! e.g. `["version.manifest_url"]`. Paths may be written in snake_case or
//! lowerCamelCase; [`FieldMask::normalize`] brings them to a canonical
//! snake_case form before they are checked against a [`MessageShape`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while checking a mask against a request shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldMaskError {
    #[error("field mask is empty")]
    Empty,

    #[error("invalid field mask path '{path}' for {message}")]
    InvalidPath { path: String, message: &'static str },
}

/// Static description of a request message: its fields and nested messages.
#[derive(Debug, Clone, Copy)]
pub struct MessageShape {
    pub name: &'static str,
    pub fields: &'static [FieldShape],
}

/// One field of a [`MessageShape`]. `nested` is set for sub-messages.
#[derive(Debug, Clone, Copy)]
pub struct FieldShape {
    pub name: &'static str,
    pub nested: Option<&'static MessageShape>,
}

impl FieldShape {
    pub const fn scalar(name: &'static str) -> Self {
        Self { name, nested: None }
    }

    pub const fn message(name: &'static str, shape: &'static MessageShape) -> Self {
        Self {
            name,
            nested: Some(shape),
        }
    }
}

impl MessageShape {
    fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a dotted snake_case path names a field of this message.
    ///
    /// A path may stop at a sub-message (selecting all of it), but may not
    /// descend into a scalar.
    pub fn has_path(&self, path: &str) -> bool {
        let mut shape = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let Some(field) = shape.field(segment) else {
                return false;
            };
            match (field.nested, segments.peek()) {
                (_, None) => return true,
                (Some(nested), Some(_)) => shape = nested,
                (None, Some(_)) => return false,
            }
        }
        false
    }
}

/// Ordered set of field paths restricting an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMask {
    #[serde(default)]
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Canonical form of the mask.
    ///
    /// Segments are trimmed and converted to snake_case, empty paths are
    /// dropped, and a path covered by a shorter one (`version` covers
    /// `version.name`) is removed. The result is sorted and duplicate-free.
    pub fn normalize(&self) -> Self {
        let mut paths: Vec<String> = self
            .paths
            .iter()
            .filter_map(|p| canonical_path(p))
            .collect();
        paths.sort();
        paths.dedup();

        let mut kept: Vec<String> = Vec::with_capacity(paths.len());
        for path in paths {
            // Sorted order puts a prefix before everything it covers.
            let covered = kept.last().is_some_and(|prev| {
                path.strip_prefix(prev.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
            });
            if !covered {
                kept.push(path);
            }
        }
        Self { paths: kept }
    }

    /// Check every path against `shape`. The first invalid path fails the mask.
    pub fn validate(&self, shape: &MessageShape) -> Result<(), FieldMaskError> {
        if self.paths.is_empty() {
            return Err(FieldMaskError::Empty);
        }
        match self.paths.iter().find(|p| !shape.has_path(p)) {
            Some(path) => Err(FieldMaskError::InvalidPath {
                path: path.clone(),
                message: shape.name,
            }),
            None => Ok(()),
        }
    }

    /// Fields selected under `prefix`, or `None` when the whole sub-message is selected.
    ///
    /// Expects a normalized mask. Returns `Some(vec![])` when nothing under
    /// `prefix` is selected.
    pub fn selected_under(&self, prefix: &str) -> Option<Vec<&str>> {
        let mut fields = Vec::new();
        for path in &self.paths {
            if path == prefix {
                return None;
            }
            if let Some(rest) = path
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
            {
                fields.push(rest);
            }
        }
        Some(fields)
    }
}

fn canonical_path(path: &str) -> Option<String> {
    let segments: Vec<String> = path
        .split('.')
        .map(|s| to_snake_case(s.trim()))
        .collect();
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments.join("."))
}

fn to_snake_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    for (i, ch) in segment.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
