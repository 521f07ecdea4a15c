//! inspect command - Display detailed information on containers
//!
//! Resolves every reference, loads detail for each match (bounded by a
//! per-container timeout), and prints all successful entries before
//! reporting collected failures. Partial success is preserved: output
//! already emitted is not rolled back by a later failure.

use std::str::FromStr;

use anyhow::{anyhow, bail, Result};

use crate::cli::Context;
use crate::core::batch::{BatchExecutor, MatchPolicy};
use crate::core::inspect::{ContainerInspector, InspectMode};
use crate::core::types::Namespace;
use crate::core::walker::ContainerWalker;
use crate::runtime::HttpRuntime;
use crate::ui::output;

/// Run the inspect command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn inspect(ctx: &Context, containers: &[String], mode: &str, format: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(inspect_async(ctx, containers, mode, format))
}

/// Output format for inspect entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Pretty-printed JSON array (the default).
    Table,
    /// One compact JSON document per entry.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unsupported format {other:?}")),
        }
    }
}

/// Async implementation of inspect.
async fn inspect_async(
    ctx: &Context,
    containers: &[String],
    mode: &str,
    format: &str,
) -> Result<()> {
    let mode = InspectMode::from_str(mode).map_err(|e| anyhow!(e))?;
    let format = OutputFormat::from_str(format).map_err(|e| anyhow!(e))?;
    let ns = Namespace::new(ctx.config.namespace.as_str())?;

    let runtime = HttpRuntime::new(ctx.config.address.as_str());
    output::debug(
        format!("inspecting {} reference(s) via {}", containers.len(), runtime.address()),
        ctx.verbosity,
    );

    let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns.clone()));
    let mut inspector = ContainerInspector::new(&runtime, ns, mode);
    let report = executor
        .run(containers, MatchPolicy::All, &mut inspector)
        .await;

    match format {
        OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(&report.outputs)?);
        }
        OutputFormat::Json => {
            for entry in &report.outputs {
                println!("{}", serde_json::to_string(entry)?);
            }
        }
    }

    if let Some(summary) = report.error_summary() {
        bail!(summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_known_values() {
        assert_eq!(OutputFormat::from_str("table"), Ok(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str(""), Ok(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("json"), Ok(OutputFormat::Json));
        assert!(OutputFormat::from_str("raw").is_err());
    }
}
