//! Statement execution seam.

use crate::error::SinkError;
use async_trait::async_trait;
use sql_builder::Statement;
use std::sync::Mutex;
use tracing::info;

/// Trait for applying statements to a datastore.
///
/// The sink issues exactly one statement per record and never retries.
/// Pooling, retries and reconnection belong to implementations or their
/// callers.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute a statement, returning the number of rows affected.
    async fn execute(&self, statement: &Statement) -> Result<u64, SinkError>;

    /// Ask the datastore to abort the statement currently in flight.
    ///
    /// Best effort. The default does nothing.
    async fn cancel(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// End the session. Consumes the executor.
    async fn close(self) -> Result<(), SinkError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Executor that logs statements instead of running them.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    executed: Mutex<Vec<Statement>>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements seen so far, in order.
    pub fn executed(&self) -> Vec<Statement> {
        match self.executed.lock() {
            Ok(executed) => executed.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Executor for DryRunExecutor {
    async fn execute(&self, statement: &Statement) -> Result<u64, SinkError> {
        info!(sql = %statement.sql, args = ?statement.args, "Dry run: skipping statement");
        match self.executed.lock() {
            Ok(mut executed) => executed.push(statement.clone()),
            Err(poisoned) => poisoned.into_inner().push(statement.clone()),
        }
        Ok(0)
    }
}
