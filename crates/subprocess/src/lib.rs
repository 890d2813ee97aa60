//! The Sub-Process Primitive (§4.5): composes a statement out of a
//! nested child process spawned from a named template, with `_caller`/
//! `_args` special objects and a DOWN → `Continue` handshake back to
//! the parent.

mod error;
mod special_objects;
mod subprocess;
mod template;

pub use error::{SubprocessError, SubprocessResult};
pub use special_objects::{standard_specials, ArgElement, ArgsView, CallerProxy};
pub use subprocess::SubProcess;
pub use template::TemplateMap;
