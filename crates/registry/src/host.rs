//! The host-provided services a running process needs but does not
//! implement itself (§6 "Host runtime"): invocation arguments, the
//! configured retry backoff, and a shutdown request sink.

use std::time::Duration;

use ncd_value::Value;

/// Implemented by the surrounding program (the `node` binary); the
/// engine core only ever calls through this trait (§1 "does not perform
/// I/O directly").
pub trait Host {
    /// `backend-interp-get-args` (§4.3): the host process's invocation
    /// arguments, conventionally a list.
    fn args(&self) -> Value;
    /// `backend-interp-get-retry-time` (§4.3): the configured retry
    /// backoff applied after a construction failure (§4.4).
    fn retry_interval(&self) -> Duration;
    /// `backend-interp-exit` (§4.3, §6): requests host shutdown with the
    /// given exit code. The only path by which a failure propagates out
    /// of the engine (§7 "Propagation policy").
    fn exit(&self, code: i32);
}

/// A fixed [`Host`] for tests and demos that never touch invocation
/// args, exit codes, or care about retry timing precision.
pub struct StaticHost {
    args: Value,
    retry_interval: Duration,
}

impl StaticHost {
    pub fn new(args: Value, retry_interval: Duration) -> Self {
        Self {
            args,
            retry_interval,
        }
    }
}

impl Host for StaticHost {
    fn args(&self) -> Value {
        self.args.clone()
    }
    fn retry_interval(&self) -> Duration {
        self.retry_interval
    }
    fn exit(&self, code: i32) {
        tracing::info!(code, "backend_interp_exit requested (StaticHost: no-op)");
    }
}
