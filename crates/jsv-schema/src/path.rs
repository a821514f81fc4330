//! # Paths — Instance Pointers and Schema Locations
//!
//! Validation errors are raised at the innermost failing value and carry
//! an [`InstancePath`] that grows as the error propagates back up the
//! recursion: each structural step (object member, array element)
//! prepends its segment on the way out. The rendered form is a JSON
//! Pointer (RFC 6901), with the document root rendered as `/`.
//!
//! Schema locations are plain strings built while compiling; see
//! [`child_location`].

use std::fmt;

/// One step into a JSON instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object member name.
    Member(String),
    /// An array index.
    Index(usize),
}

impl PathSegment {
    pub fn member(name: impl Into<String>) -> Self {
        Self::Member(name.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(name) => f.write_str(&escape_segment(name)),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value inside the validated instance.
///
/// Segments are stored innermost-first so that prepending while unwinding
/// is a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstancePath {
    reversed: Vec<PathSegment>,
}

impl InstancePath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this path points at the document root.
    pub fn is_root(&self) -> bool {
        self.reversed.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.reversed.len()
    }

    /// Prefix this path with an outer segment.
    pub fn prepend(&mut self, segment: PathSegment) {
        self.reversed.push(segment);
    }

    /// Segments from the root outward.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &PathSegment> {
        self.reversed.iter().rev()
    }

    /// Render as a JSON Pointer; the root renders as `/`.
    pub fn to_pointer(&self) -> String {
        if self.is_root() {
            return "/".to_string();
        }
        let mut pointer = String::new();
        for segment in self.segments() {
            pointer.push('/');
            pointer.push_str(&segment.to_string());
        }
        pointer
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for InstancePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut reversed: Vec<PathSegment> = iter.into_iter().map(Into::into).collect();
        reversed.reverse();
        Self { reversed }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Member(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Escape a pointer segment: `~` becomes `~0`, `/` becomes `~1`.
pub fn escape_segment(raw: &str) -> String {
    if !raw.contains(['~', '/']) {
        return raw.to_string();
    }
    raw.replace('~', "~0").replace('/', "~1")
}

/// Location of a nested schema, `parent` + `/` + escaped `segment`.
///
/// The root location is `/`, so its children render as `/name` rather
/// than `//name`.
pub fn child_location(parent: &str, segment: &str) -> String {
    let segment = escape_segment(segment);
    if parent.ends_with('/') {
        format!("{parent}{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}
