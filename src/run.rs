//! Application execution logic.
//!
//! This module runs one subcommand against the adapter engine and renders
//! the result as text or JSON.

use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tokio::signal;

use adapterctl::command::{CommandRunner, SystemRunner};
use adapterctl::config::{Command, ValidatedConfig};
use adapterctl::engine::{
    AdapterEngine, Applied, BatchOutcome, BatchReport, CancelFlag, CommandSet,
    ConfigChangeRequest, EngineError, MutationError,
};
use adapterctl::network::{AdapterConfig, AdapterRecord};
use adapterctl::platform;
use adapterctl::time::Clock;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Discovery or aggregation failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// No adapter matches the id, name or description given.
    #[error("No adapter matches '{key}'")]
    UnknownAdapter {
        /// The key as given
        key: String,
    },

    /// JSON rendering failed.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a command ended, for the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Everything succeeded.
    Success,
    /// A batch where some items failed.
    Partial,
    /// The mutation (or every batch item) failed.
    Failed,
}

/// Rendered output plus outcome of one command.
#[derive(Debug)]
pub struct RunReport {
    pub output: String,
    pub outcome: RunOutcome,
}

impl RunReport {
    const fn success(output: String) -> Self {
        Self {
            output,
            outcome: RunOutcome::Success,
        }
    }
}

/// Executes `command` against the real system.
///
/// # Errors
///
/// Returns an error if discovery fails, the adapter cannot be found, or
/// JSON rendering fails. Mutation failures are reported in the outcome.
///
/// Excluded from coverage - runs system commands.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<RunReport, RunError> {
    let runner = SystemRunner::new(config.fallback_encoding);
    let engine = AdapterEngine::new(runner, CommandSet::new(config.timeouts));

    if command.is_mutation() && platform::is_elevated() == Some(false) {
        tracing::warn!("Not running as administrator; configuration changes will likely be denied");
    }

    execute_with(&engine, command, config.json).await
}

/// Executes `command` against an existing engine.
///
/// # Errors
///
/// See [`execute`].
pub async fn execute_with<R: CommandRunner, C: Clock>(
    engine: &AdapterEngine<R, C>,
    command: Command,
    json: bool,
) -> Result<RunReport, RunError> {
    let adapters = engine.discover().await?;

    match command {
        Command::List => Ok(RunReport::success(render_list(&adapters, json)?)),
        Command::Show { adapter } => {
            let record = find(engine, &adapter)?;
            let config = engine.select(&record.id).await?;
            let output = if json {
                serde_json::to_string_pretty(&*config)?
            } else {
                config.report()
            };
            Ok(RunReport::success(output))
        }
        Command::Apply {
            adapter,
            ip,
            mask,
            gateway,
            dns1,
            dns2,
        } => {
            let record = find(engine, &adapter)?;
            let request = ConfigChangeRequest::new(record.id, ip, mask)
                .with_gateway(gateway)
                .with_dns(dns1, dns2);
            let applied = engine.apply_config(&request).await?;
            render_single("apply", &applied, json)
        }
        Command::Dhcp { adapter } => {
            let record = find(engine, &adapter)?;
            let applied = engine.set_dhcp(&record.id).await?;
            render_single("dhcp", &applied, json)
        }
        Command::Enable { adapter } => {
            let record = find(engine, &adapter)?;
            let applied = engine.set_enabled(&record.id, true).await?;
            render_single("enable", &applied, json)
        }
        Command::Disable { adapter } => {
            let record = find(engine, &adapter)?;
            let applied = engine.set_enabled(&record.id, false).await?;
            render_single("disable", &applied, json)
        }
        Command::AddIp { adapter, items } => {
            let record = find(engine, &adapter)?;
            let (cancel, watcher) = cancel_on_ctrl_c();
            let applied = engine.add_secondary_ips(&record.id, &items, &cancel).await;
            watcher.abort();
            render_batch("add-ip", &applied?, json)
        }
        Command::RemoveIp { adapter, items } => {
            let record = find(engine, &adapter)?;
            let (cancel, watcher) = cancel_on_ctrl_c();
            let applied = engine
                .remove_secondary_ips(&record.id, &items, &cancel)
                .await;
            watcher.abort();
            render_batch("remove-ip", &applied?, json)
        }
        // Handled before configuration is loaded
        Command::Init { .. } => Ok(RunReport::success(String::new())),
    }
}

fn find<R: CommandRunner, C: Clock>(
    engine: &AdapterEngine<R, C>,
    key: &str,
) -> Result<AdapterRecord, RunError> {
    engine.resolve(key).ok_or_else(|| RunError::UnknownAdapter {
        key: key.to_string(),
    })
}

/// Sets the returned flag on Ctrl+C until the handle is aborted.
fn cancel_on_ctrl_c() -> (CancelFlag, tokio::task::JoinHandle<()>) {
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    let watcher = tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, skipping remaining items");
            flag.cancel();
        }
    });
    (cancel, watcher)
}

fn render_list(adapters: &[AdapterRecord], json: bool) -> Result<String, RunError> {
    if json {
        return Ok(serde_json::to_string_pretty(adapters)?);
    }

    let mut out = String::new();
    for adapter in adapters {
        let _ = writeln!(
            out,
            "{:<24} {:<14} {:<18} {}",
            adapter.display_name,
            adapter.status_text(),
            adapter.mac_address,
            adapter.description,
        );
    }
    Ok(out)
}

fn render_single(
    operation: &str,
    applied: &Applied<Result<(), MutationError>>,
    json: bool,
) -> Result<RunReport, RunError> {
    let outcome = if applied.outcome.is_ok() {
        RunOutcome::Success
    } else {
        RunOutcome::Failed
    };
    let error = applied.outcome.as_ref().err().map(ToString::to_string);

    let output = if json {
        serde_json::to_string_pretty(&json!({
            "operation": operation,
            "success": error.is_none(),
            "error": error,
            "config": applied.config.as_deref().ok(),
            "refresh_error": refresh_error(&applied.config),
        }))?
    } else {
        let headline = error.map_or_else(
            || format!("{operation}: ok"),
            |e| format!("{operation} failed: {e}"),
        );
        with_report(&headline, &applied.config)
    };

    Ok(RunReport { output, outcome })
}

fn render_batch(
    operation: &str,
    applied: &Applied<BatchReport>,
    json: bool,
) -> Result<RunReport, RunError> {
    let batch = &applied.outcome;
    let classified = batch.outcome();
    let outcome = match classified {
        BatchOutcome::AllSuccess => RunOutcome::Success,
        BatchOutcome::Partial { .. } => RunOutcome::Partial,
        BatchOutcome::AllFailure => RunOutcome::Failed,
    };

    let output = if json {
        let items: Vec<_> = batch
            .items
            .iter()
            .map(|r| {
                json!({
                    "item": r.item,
                    "error": r.result.as_ref().err().map(ToString::to_string),
                })
            })
            .collect();
        serde_json::to_string_pretty(&json!({
            "operation": operation,
            "result": classified,
            "items": items,
            "config": applied.config.as_deref().ok(),
            "refresh_error": refresh_error(&applied.config),
        }))?
    } else {
        let mut headline = format!(
            "{operation}: {} of {} succeeded",
            batch.succeeded(),
            batch.items.len()
        );
        for failure in batch.failures() {
            if let Err(e) = &failure.result {
                let _ = write!(headline, "\n  {}: {e}", failure.item);
            }
        }
        with_report(&headline, &applied.config)
    };

    Ok(RunReport { output, outcome })
}

fn with_report(headline: &str, config: &Result<Arc<AdapterConfig>, EngineError>) -> String {
    match config {
        Ok(config) => format!("{headline}\n\n{}", config.report()),
        Err(e) => format!("{headline}\n\nCould not re-read the adapter: {e}"),
    }
}

fn refresh_error(config: &Result<Arc<AdapterConfig>, EngineError>) -> Option<String> {
    config.as_ref().err().map(ToString::to_string)
}
