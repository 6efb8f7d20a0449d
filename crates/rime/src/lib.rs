//! Persistent, deeply immutable records and sequences.
//!
//! [`wrap`] freezes plain nested data into a tree of containers. Containers
//! never change after construction: every "write" returns a new container
//! that shares all untouched branches with the original, so values can be
//! handed to other owners (or threads) without copying or locking.
//!
//! ```
//! use rime::{Container, Value, path};
//! use serde_json::json;
//!
//! let todos = Container::wrap(json!({"items": [{"done": false}]})).unwrap();
//! let done = todos.set_in(&path!["items", 0usize, "done"], true).unwrap();
//!
//! assert_eq!(todos.get_in(&path!["items", 0usize, "done"]), Some(Value::Bool(false)));
//! assert_eq!(done.thaw(), json!({"items": [{"done": true}]}));
//! ```

pub mod metrics;

mod container;
mod error;
mod hash;
mod key;
mod number;
pub mod path;
mod record;
mod sequence;
mod thaw;
mod value;
mod wrap;

pub use container::{Container, ContainerKind, Iter};
pub use error::{Error, Result};
pub use key::{Key, Path};
pub use number::Number;
pub use path::{assign_on_deep_match, get_in, merge_all_in, merge_in, set_in};
pub use record::Record;
pub use sequence::{MAX_PADDING, Sequence};
pub use value::Value;
pub use wrap::{Kind, Wrap, is_container, wrap};
