//! restart command - Restart one or more running containers
//!
//! Composes the runtime's stop and start primitives per resolved
//! container: stop with the configured grace period, then start. Driven
//! through the same walker/batch machinery as inspect.

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::cli::Context;
use crate::core::batch::{BatchExecutor, FoundHandler, MatchPolicy};
use crate::core::types::Namespace;
use crate::core::walker::{ContainerWalker, Found};
use crate::runtime::{HttpRuntime, Runtime, RuntimeError};
use crate::ui::output;

/// Run the restart command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn restart(ctx: &Context, containers: &[String], time: u64) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(restart_async(ctx, containers, time))
}

/// Batch handler stopping then starting each resolved container's task.
struct RestartHandler<'a> {
    runtime: &'a dyn Runtime,
    namespace: Namespace,
    grace: Duration,
}

#[async_trait]
impl FoundHandler for RestartHandler<'_> {
    type Output = String;
    type Error = RuntimeError;

    async fn handle(&mut self, found: &Found) -> Result<String, RuntimeError> {
        self.runtime
            .stop_task(&self.namespace, &found.container.id, self.grace)
            .await?;
        self.runtime
            .start_task(&self.namespace, &found.container.id)
            .await?;
        Ok(found.reference.clone())
    }
}

/// Async implementation of restart.
async fn restart_async(ctx: &Context, containers: &[String], time: u64) -> Result<()> {
    let ns = Namespace::new(ctx.config.namespace.as_str())?;
    let runtime = HttpRuntime::new(ctx.config.address.as_str());

    let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns.clone()));
    let mut handler = RestartHandler {
        runtime: &runtime,
        namespace: ns,
        grace: Duration::from_secs(time),
    };

    let report = executor
        .run(containers, MatchPolicy::All, &mut handler)
        .await;

    for reference in &report.outputs {
        output::print(reference, ctx.verbosity);
    }

    if let Some(summary) = report.error_summary() {
        bail!(summary);
    }
    Ok(())
}
