//! Glues [`ProcessInstance`]'s synchronous core to a real timer
//! service, standing in for "the host provides... a timer service" of
//! §1. The core never calls `tokio` itself; only this module does.

use std::time::Instant;

use crate::tree::ProcessTree;

/// Drives `tree` (every live process in it, root and nested
/// sub-processes alike, as independent nodes — §9) until the root
/// reaches `TERMINATED`, or until `shutdown` resolves, in which case
/// termination is requested and driving continues until it completes.
pub async fn run(mut tree: ProcessTree, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    loop {
        if tree.is_root_terminated() {
            return;
        }
        let deadline = tree.next_deadline();
        tokio::select! {
            _ = sleep_until(deadline) => {
                tree.pump(Instant::now());
            }
            changed = shutdown.changed() => {
                if changed.is_ok() && *shutdown.borrow() {
                    tree.terminate_root();
                }
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at.into()).await,
        // No pending timers: park until an external event (shutdown)
        // wakes the `select!`. A long sleep stands in for "block until
        // the reactor has something to do" without a real I/O source.
        None => tokio::time::sleep(std::time::Duration::from_secs(3600)).await,
    }
}
