//! # Field Paths
//!
//! A [`FieldPath`] addresses one location in the form value and, in
//! parallel, one node of the schema tree. Validators report locations as
//! JSON Pointers (RFC 6901), so paths render to pointers with `~0`/`~1`
//! escaping, and pointer strings are what error routing compares.
//!
//! Array item paths are positional. Identity across removals is carried by
//! [`ItemKey`](crate::ItemKey), never by the index in a path.

use serde::{Deserialize, Serialize};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// An object property name.
    Property(String),
    /// An array index.
    Index(usize),
}

impl PathSegment {
    fn write_pointer_token(&self, out: &mut String) {
        match self {
            Self::Property(name) => {
                for ch in name.chars() {
                    match ch {
                        '~' => out.push_str("~0"),
                        '/' => out.push_str("~1"),
                        c => out.push(c),
                    }
                }
            }
            Self::Index(i) => out.push_str(&i.to_string()),
        }
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Sequence of property names and array indices from the form root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The root path (the whole form value).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// The segments of this path, root first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The path of a named property below this one.
    pub fn property(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Property(name.into()));
        Self { segments }
    }

    /// The path of an array index below this one.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// Whether `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Copy of this path with the segment at `depth` replaced by `index`.
    ///
    /// Used to re-address a subtree after a preceding array item was
    /// removed. Paths shorter than `depth + 1` are returned unchanged.
    pub fn with_index_at(&self, depth: usize, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(seg) = segments.get_mut(depth) {
            *seg = PathSegment::Index(index);
        }
        Self { segments }
    }

    /// Render as an RFC 6901 JSON Pointer. The root is the empty string.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            out.push('/');
            seg.write_pointer_token(&mut out);
        }
        out
    }

    /// Render as a DOM-style element id, e.g. `root_aggiudicatario_0_CIG`.
    pub fn dom_id(&self, prefix: &str) -> String {
        let mut out = prefix.to_string();
        for seg in &self.segments {
            out.push('_');
            out.push_str(&seg.to_string());
        }
        out
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.to_pointer())
        }
    }
}
