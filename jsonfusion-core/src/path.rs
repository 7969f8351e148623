//! JSON-path tracking for diagnostics.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use alloc::string::String;

use core::fmt;

/// One step of a [`JsonPath`]: a record field name, or an array/sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `.field`
    Field(&'static str),
    /// `[index]`
    Index(usize),
}

/// A dotted/bracketed path from the document root to the field currently
/// being read or written, e.g. `$.controller.motors[2].position`.
///
/// The dispatcher pushes a segment before recursing into a field/element and
/// pops it on the way back out, so a [`crate::error::CodecError`] raised deep
/// in a nested value carries the full path at the point it's turned into a
/// `Result::Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    #[cfg(feature = "alloc")]
    segments: Vec<PathSegment>,
}

/// Default cap on path depth; exceeding it is reported as
/// [`crate::error::ErrorCode::SkipStackOverflow`] by the dispatcher.
pub const DEFAULT_MAX_DEPTH: usize = 128;

impl JsonPath {
    /// An empty path (the document root).
    pub fn root() -> Self {
        Self::default()
    }

    /// True if this path points at the document root.
    pub fn is_root(&self) -> bool {
        #[cfg(feature = "alloc")]
        {
            self.segments.is_empty()
        }
        #[cfg(not(feature = "alloc"))]
        {
            true
        }
    }

    /// Current depth (number of segments).
    pub fn depth(&self) -> usize {
        #[cfg(feature = "alloc")]
        {
            self.segments.len()
        }
        #[cfg(not(feature = "alloc"))]
        {
            0
        }
    }

    /// Push a field-name segment.
    #[cfg(feature = "alloc")]
    pub fn push_field(&mut self, name: &'static str) {
        self.segments.push(PathSegment::Field(name));
    }

    /// Push an index segment.
    #[cfg(feature = "alloc")]
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the most recently pushed segment. No-op on an empty path.
    #[cfg(feature = "alloc")]
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// The first failing segment's field name, if the deepest segment is a field.
    #[cfg(feature = "alloc")]
    pub fn last_field(&self) -> Option<&'static str> {
        match self.segments.last() {
            Some(PathSegment::Field(name)) => Some(name),
            _ => None,
        }
    }

    /// Render as `$.a.b[2].c`.
    #[cfg(feature = "alloc")]
    pub fn to_display_string(&self) -> String {
        use core::fmt::Write;
        let mut out = String::new();
        let _ = write!(out, "{self}");
        out
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        #[cfg(feature = "alloc")]
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// RAII-style guard that pushes a segment on creation and pops it on drop,
/// so dispatch code can use `let _guard = path.enter_field("x");` instead of
/// manually balancing push/pop across early returns.
#[cfg(feature = "alloc")]
pub struct PathGuard<'a> {
    path: &'a mut JsonPath,
}

#[cfg(feature = "alloc")]
impl<'a> PathGuard<'a> {
    /// Push a field segment and return a guard that pops it on drop.
    pub fn field(path: &'a mut JsonPath, name: &'static str) -> Self {
        path.push_field(name);
        PathGuard { path }
    }

    /// Push an index segment and return a guard that pops it on drop.
    pub fn index(path: &'a mut JsonPath, index: usize) -> Self {
        path.push_index(index);
        PathGuard { path }
    }
}

#[cfg(feature = "alloc")]
impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[test]
    fn renders_dotted_and_bracketed_path() {
        let mut path = JsonPath::root();
        assert_eq!(path.to_display_string(), "$");
        path.push_field("controller");
        path.push_field("motors");
        path.push_index(2);
        path.push_field("position");
        path.push_index(1);
        assert_eq!(
            path.to_display_string(),
            "$.controller.motors[2].position[1]"
        );
    }

    #[test]
    fn guard_pops_on_drop() {
        let mut path = JsonPath::root();
        {
            let _g = PathGuard::field(&mut path, "a");
            assert_eq!(path.depth(), 1);
        }
        assert_eq!(path.depth(), 0);
    }
}
