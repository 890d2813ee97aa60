//! Facade crate: re-exports the engine's five core components as one
//! dependency for embedders that don't need the standard module library
//! or host binary (§10).
//!
//! - [`ncd_value`]: the tagged value tree and argument templates.
//! - [`ncd_registry`]: the `Module`/`Backend`/`ObjectHandle` seams.
//! - [`ncd_runtime`]: the per-statement state machine (§4.1).
//! - [`ncd_scheduler`]: the Process Instance (AP/FP discipline, §4.3) and
//!   the flat `ProcessTree` driver.
//! - [`ncd_subprocess`]: the Sub-Process Primitive (§4.5).

pub use ncd_registry as registry;
pub use ncd_runtime as runtime;
pub use ncd_scheduler as scheduler;
pub use ncd_subprocess as subprocess;
pub use ncd_value as value;

pub use ncd_scheduler::{
    ProcessDescriptor, ProcessHandle, ProcessInstance, ProcessRef, ProcessTree,
    StatementDescriptor,
};
pub use ncd_value::{Arena, ArgumentTemplate, Value};
