//! The Process Scheduler (§4.4): executes a block of statements with
//! strict in-order advance and reverse-order regress, binding the
//! Statement Runtime's per-instance state machine into a whole process.

mod descriptor;
mod error;
mod host;
mod process;
mod run;
mod tree;

pub use descriptor::{ProcessDescriptor, StatementDescriptor};
pub use error::{SchedulerError, SchedulerResult};
pub use host::{Host, StaticHost};
pub use process::{ProcessHandle, ProcessInstance, ProcessRef};
pub use run::run;
pub use tree::ProcessTree;
