//! The module registry (§4.2): the catalog of statement kinds that the
//! Statement Runtime and Process Scheduler drive.

mod backend;
mod error;
mod host;
mod module;
mod object;
mod owning;
mod registry;

pub use backend::{Backend, DeferredAction};
pub use error::{RegistryError, RegistryResult};
pub use host::{Host, StaticHost};
pub use module::{InitOutcome, Module, ModuleState};
pub use object::{resolve_tail, ObjectHandle};
pub use owning::{ChildProcess, OwningProcess};
pub use registry::Registry;
