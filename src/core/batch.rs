//! core::batch
//!
//! Batch execution over multiple references.
//!
//! # Architecture
//!
//! Multi-target commands (inspect, rename, restart) share one driving
//! pattern: resolve each reference through the walker, hand every match to
//! a per-match handler, and collect per-reference failures without
//! aborting the rest of the batch. The executor is the single place that
//! decides what is fatal to a reference; handlers and the walker only
//! return errors.
//!
//! References are processed strictly in the order supplied; matches for a
//! single reference are processed in resolver order; output ordering
//! mirrors input ordering. A reference that resolves to nothing becomes a
//! `NotFound` failure here - the walker itself stays error-free on empty
//! results.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::walker::{ContainerWalker, Found, WalkError};

/// Per-match handler invoked by the executor.
///
/// Handlers are free to mutate (rename) or only read (inspect); the
/// executor does not care. One handler instance sees every match of every
/// reference in a batch, in order.
#[async_trait]
pub trait FoundHandler {
    /// Value produced per handled match.
    type Output: Send;
    /// Handler-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Handle one resolved match.
    async fn handle(&mut self, found: &Found) -> Result<Self::Output, Self::Error>;
}

/// How many matches a single reference may fan out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Every match is handled (inspect, restart).
    All,
    /// The reference must resolve to exactly one container (rename).
    ExactlyOne,
}

/// Why one reference failed.
#[derive(Debug, Error)]
pub enum BatchError<E: std::error::Error> {
    /// The reference resolved to zero containers.
    #[error("no such object: {0}")]
    NotFound(String),

    /// The reference resolved to several containers under
    /// [`MatchPolicy::ExactlyOne`].
    #[error("reference {reference:?} matches {count} containers: a unique match is required")]
    NotUnique {
        /// The reference as typed by the user
        reference: String,
        /// How many containers it resolved to
        count: usize,
    },

    /// Resolution itself failed (ambiguous prefix, runtime error).
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// The per-match handler failed.
    #[error(transparent)]
    Handler(E),
}

/// One failed reference with its reason.
#[derive(Debug)]
pub struct Failure<E: std::error::Error> {
    /// The reference as typed by the user.
    pub reference: String,
    /// Why it failed.
    pub error: BatchError<E>,
}

impl<E: std::error::Error> std::fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            // Handler errors do not embed the reference; the others do.
            BatchError::Handler(err) => write!(f, "{}: {}", self.reference, err),
            other => write!(f, "{}", other),
        }
    }
}

/// Aggregate result of one batch run.
///
/// Outputs appear in reference order (and, within a reference, in match
/// order). Partial success is preserved: outputs produced before a later
/// failure are never rolled back.
#[derive(Debug)]
pub struct BatchReport<T, E: std::error::Error> {
    /// Successful handler outputs, in order.
    pub outputs: Vec<T>,
    /// Failed references with reasons, in order.
    pub failures: Vec<Failure<E>>,
}

impl<T, E: std::error::Error> BatchReport<T, E> {
    /// True when every reference succeeded.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Aggregate error line for the command exit path, or `None` when the
    /// batch fully succeeded.
    pub fn error_summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let list = self
            .failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("{} errors: [{}]", self.failures.len(), list))
    }
}

/// Drives the walker and a handler over an ordered reference list.
pub struct BatchExecutor<'a> {
    walker: ContainerWalker<'a>,
}

impl<'a> BatchExecutor<'a> {
    /// Create an executor over the given walker.
    pub fn new(walker: ContainerWalker<'a>) -> Self {
        Self { walker }
    }

    /// Run the handler over every reference.
    ///
    /// Every reference is attempted regardless of earlier failures. A
    /// handler error aborts the remaining matches of that one reference
    /// only.
    pub async fn run<H: FoundHandler>(
        &self,
        references: &[String],
        policy: MatchPolicy,
        handler: &mut H,
    ) -> BatchReport<H::Output, H::Error> {
        let mut outputs = Vec::new();
        let mut failures = Vec::new();

        for reference in references {
            let found = match self.walker.walk(reference).await {
                Ok(found) => found,
                Err(err) => {
                    failures.push(Failure {
                        reference: reference.clone(),
                        error: BatchError::Walk(err),
                    });
                    continue;
                }
            };

            if found.is_empty() {
                failures.push(Failure {
                    reference: reference.clone(),
                    error: BatchError::NotFound(reference.clone()),
                });
                continue;
            }

            if policy == MatchPolicy::ExactlyOne && found.len() > 1 {
                failures.push(Failure {
                    reference: reference.clone(),
                    error: BatchError::NotUnique {
                        reference: reference.clone(),
                        count: found.len(),
                    },
                });
                continue;
            }

            for item in &found {
                match handler.handle(item).await {
                    Ok(output) => outputs.push(output),
                    Err(err) => {
                        failures.push(Failure {
                            reference: reference.clone(),
                            error: BatchError::Handler(err),
                        });
                        break;
                    }
                }
            }
        }

        BatchReport { outputs, failures }
    }
}
