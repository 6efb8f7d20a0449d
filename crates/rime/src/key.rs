//! Keys and paths addressing positions inside a container tree.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

/// One step of a path: a record field name or a sequence position.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Name(Arc<str>),
    Index(usize),
}

/// Ordered list of keys from a root container to a nested location.
pub type Path = SmallVec<[Key; 4]>;

impl Key {
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        Key::Name(name.into())
    }

    /// The sequence position this key denotes, if any.
    ///
    /// Names count as positions only when they are canonical decimal integers
    /// (`"3"` but not `"03"`, `"-1"` or `"1.5"`).
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(name) => parse_index(name),
        }
    }

    /// The record field name this key denotes. Positions become their
    /// decimal spelling.
    pub fn as_name(&self) -> Cow<'_, str> {
        match self {
            Key::Name(name) => Cow::Borrowed(name),
            Key::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    pub(crate) fn to_name(&self) -> Arc<str> {
        match self {
            Key::Name(name) => name.clone(),
            Key::Index(index) => Arc::from(index.to_string()),
        }
    }
}

fn parse_index(name: &str) -> Option<usize> {
    let canonical = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && (name == "0" || !name.starts_with('0'));
    if canonical { name.parse().ok() } else { None }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(Arc::from(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(Arc::from(name))
    }
}

impl From<Arc<str>> for Key {
    fn from(name: Arc<str>) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Builds a [`Path`] from names and positions.
///
/// ```
/// use rime::{path, Key};
///
/// let p = path!["todos", 3usize, "title"];
/// assert_eq!(p[1], Key::Index(3));
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::new()
    };
    ($($segment:expr),+ $(,)?) => {{
        let mut path = $crate::Path::new();
        $(path.push($crate::Key::from($segment));)+
        path
    }};
}
