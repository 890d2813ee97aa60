mod cli;
mod demos;

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use ncd_config::{HostConfig, LogFormat};
use ncd_registry::Host;
use ncd_scheduler::{ProcessInstance, ProcessTree};
use ncd_value::{Arena, Value};
use tracing_subscriber::EnvFilter;

use cli::CliArgs;

/// The host-provided services a running process calls through (spec.md
/// §6 "Host runtime"). `exit` is the only path by which a module's
/// failure reaches outside the engine (§7 "Propagation policy"); here
/// it requests the reactor's shutdown and records the exit code for
/// `main` to return.
struct NodeHost {
    retry_interval: std::time::Duration,
    shutdown: tokio::sync::watch::Sender<bool>,
    exit_code: Cell<Option<i32>>,
}

impl Host for NodeHost {
    fn args(&self) -> Value {
        Value::build_list(&Arena::unbounded()).expect("fresh arena has room for an empty list")
    }

    fn retry_interval(&self) -> std::time::Duration {
        self.retry_interval
    }

    fn exit(&self, code: i32) {
        tracing::info!(code, "backend_interp_exit requested; shutting down");
        self.exit_code.set(Some(code));
        let _ = self.shutdown.send(true);
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            HostConfig::from_toml_str(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => HostConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.logging.level = level.into();
    }
    if let Some(format) = args.log_format {
        config.logging.format = format.into();
    }

    init_tracing(&config)?;

    // `ProcessInstance` is `Rc`-based (§5 "single-threaded, cooperative
    // event loop: no locks"), so the reactor itself runs on a
    // current-thread runtime rather than the default multi-threaded one.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build the current-thread tokio runtime")?;

    let exit_code = runtime.block_on(run_demo(args.demo, config))?;
    std::process::exit(exit_code);
}

async fn run_demo(demo: cli::Demo, config: HostConfig) -> Result<i32> {
    let compile_arena = Arena::unbounded();
    let (descriptor, templates) = demos::build(demo, &compile_arena);

    let mut registry = ncd_registry::Registry::new();
    ncd_modules::register_standard_modules(&mut registry, Rc::new(templates));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let host = Rc::new(NodeHost {
        retry_interval: config.scheduler.retry_interval(),
        shutdown: shutdown_tx.clone(),
        exit_code: Cell::new(None),
    });

    let run_arena = Arena::new(config.scheduler.alloc_budget_bytes);
    let process = ProcessInstance::spawn(
        Rc::new(descriptor),
        Rc::new(registry),
        host.clone() as Rc<dyn Host>,
        run_arena,
        HashMap::new(),
    );
    let tree = ProcessTree::new(process);

    let local = tokio::task::LocalSet::new();
    local.spawn_local({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received (Ctrl+C)");
                let _ = shutdown_tx.send(true);
            }
        }
    });
    local.run_until(ncd_scheduler::run(tree, shutdown_rx)).await;

    Ok(host.exit_code.get().unwrap_or(0))
}

fn init_tracing(config: &HostConfig) -> Result<()> {
    let level = config.logging.level.to_string();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match config.logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
