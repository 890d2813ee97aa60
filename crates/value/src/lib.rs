//! The value model (§4.1): immutable-by-reference tree values exchanged
//! between statements, and argument templates with deferred placeholder
//! substitution.

mod arena;
mod error;
mod template;
mod value;

pub use arena::Arena;
pub use error::{ValueError, ValueResult};
pub use template::{ArgumentTemplate, PathStep, ReplacementSite};
pub use value::Value;
