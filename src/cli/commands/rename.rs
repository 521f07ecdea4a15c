//! rename command - Rename a container
//!
//! Resolves the reference (which must identify exactly one container) and
//! applies the rename across the runtime label store and the hosts
//! metadata record through the coordinator.
//!
//! # Integrity Contract
//!
//! - The hosts record is updated before the authoritative label commits
//! - A container without a hosts record never gains one
//! - Renaming to the current name warns and succeeds

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::cli::Context;
use crate::core::batch::{BatchExecutor, FoundHandler, MatchPolicy};
use crate::core::hosts::HostsStore;
use crate::core::paths::StorePaths;
use crate::core::rename::{RenameCoordinator, RenameError};
use crate::core::types::Namespace;
use crate::core::walker::{ContainerWalker, Found};
use crate::runtime::HttpRuntime;
use crate::ui::output;

/// Run the rename command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn rename(ctx: &Context, container: &str, new_name: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(rename_async(ctx, container, new_name))
}

/// Batch handler applying the coordinator to each resolved container.
struct RenameHandler<'a> {
    coordinator: RenameCoordinator<'a>,
    new_name: &'a str,
    ctx: &'a Context,
}

#[async_trait]
impl FoundHandler for RenameHandler<'_> {
    type Output = String;
    type Error = RenameError;

    async fn handle(&mut self, found: &Found) -> Result<String, RenameError> {
        let outcome = self
            .coordinator
            .rename(&found.container.id, self.new_name)
            .await?;
        if outcome.same_name {
            output::warn(
                format!("renaming container {:?} to its current name", found.reference),
                self.ctx.verbosity,
            );
        }
        Ok(found.reference.clone())
    }
}

/// Async implementation of rename.
async fn rename_async(ctx: &Context, container: &str, new_name: &str) -> Result<()> {
    let ns = Namespace::new(ctx.config.namespace.as_str())?;
    let paths = StorePaths::new(ctx.config.data_root.clone())?;
    let runtime = HttpRuntime::new(ctx.config.address.as_str());

    let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns.clone()));
    let mut handler = RenameHandler {
        coordinator: RenameCoordinator::new(&runtime, HostsStore::new(paths), ns),
        new_name,
        ctx,
    };

    let references = [container.to_string()];
    let report = executor
        .run(&references, MatchPolicy::ExactlyOne, &mut handler)
        .await;

    for reference in &report.outputs {
        output::print(reference, ctx.verbosity);
    }

    // Single reference: report the failure directly rather than a
    // one-element aggregate.
    if let Some(failure) = report.failures.first() {
        bail!("{}", failure);
    }
    Ok(())
}
