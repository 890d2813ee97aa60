//! Deterministic test-double modules named in §8's scenarios
//! (`stub_up`, `fail_once`, `toggle`). These aren't scaffolding private
//! to a test module — the scenarios name them as statements a real
//! program can declare, so they're registered the same way any other
//! module is.

use std::cell::RefCell;
use std::time::Duration;

use ncd_registry::{Backend, DeferredAction, InitOutcome, Module, ModuleState, ObjectHandle};
use ncd_value::Value;

/// Goes UP the instant it's constructed and never does anything else
/// (§8 S1 "linear advance/teardown").
pub struct StubUpModule;

impl Module for StubUpModule {
    fn base_type(&self) -> &str {
        "stub_up"
    }

    fn init(&self, _ctx: &mut dyn Backend, _args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        InitOutcome::Up(Box::new(()))
    }
}

/// Fails synchronously the first time any instance of this module is
/// constructed, succeeds every time after (§8 S2 "retry on failure").
/// The attempt counter is shared across every statement that names
/// this module, matching how the registry hands out one `Rc<dyn
/// Module>` per type rather than one per statement.
#[derive(Default)]
pub struct FailOnceModule {
    attempts: RefCell<u32>,
}

impl Module for FailOnceModule {
    fn base_type(&self) -> &str {
        "fail_once"
    }

    fn init(&self, _ctx: &mut dyn Backend, _args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        let mut attempts = self.attempts.borrow_mut();
        *attempts += 1;
        if *attempts == 1 {
            InitOutcome::Dead { error: true }
        } else {
            InitOutcome::Up(Box::new(()))
        }
    }
}

/// Goes UP synchronously, then asynchronously toggles DOWN and back UP
/// once each after the configured delays (§8 S3 "regress propagation").
/// `toggle(down_ms, up_ms)`; both arguments are optional and default to
/// 50 ms.
pub struct ToggleModule;

impl ToggleModule {
    const DEFAULT_DELAY: Duration = Duration::from_millis(50);

    fn delay_arg(args: &Value, index: usize) -> Duration {
        args.list_get(index)
            .and_then(|v| v.as_bytes())
            .and_then(|b| std::str::from_utf8(b).ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Self::DEFAULT_DELAY)
    }
}

impl Module for ToggleModule {
    fn base_type(&self) -> &str {
        "toggle"
    }

    fn init(&self, ctx: &mut dyn Backend, args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        let down_after = Self::delay_arg(&args, 0);
        let up_after = Self::delay_arg(&args, 1);
        ctx.defer(down_after, DeferredAction::Down);
        InitOutcome::Up(Box::new(up_after))
    }

    fn clean(&self, state: &mut ModuleState, ctx: &mut dyn Backend) {
        let up_after = *state.downcast_ref::<Duration>().unwrap_or(&Self::DEFAULT_DELAY);
        ctx.defer(up_after, DeferredAction::Up);
    }
}
