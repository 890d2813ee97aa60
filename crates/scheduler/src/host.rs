//! Re-exported from `ncd-registry`: `Host` sits at the registry layer so
//! that `Backend` can hand one to a module composing a Sub-Process
//! Primitive (§4.5) without the registry crate needing to know about
//! the scheduler.

pub use ncd_registry::{Host, StaticHost};
