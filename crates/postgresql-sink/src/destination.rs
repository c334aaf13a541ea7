//! Destination lifecycle.
//!
//! A destination is configured from a string map, opened, written to one
//! record at a time, flushed and torn down:
//!
//! ```ignore
//! let mut destination = PostgresDestination::configure(&cfg);
//! destination.open().await?;
//! for record in records {
//!     destination.write(&record).await?;
//! }
//! destination.flush().await?;
//! destination.teardown().await?;
//! ```

use crate::config::Config;
use crate::error::SinkError;
use crate::executor::Executor;
use crate::postgres::PostgresExecutor;
use crate::router::Translator;
use std::collections::HashMap;
use sync_core::ChangeRecord;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A destination backed by PostgreSQL.
pub type PostgresDestination = Destination<PostgresExecutor>;

/// Translates records and hands each statement to an [`Executor`].
pub struct Destination<E> {
    translator: Translator,
    executor: Option<E>,
}

impl<E: Executor> Destination<E> {
    pub fn new(config: Config) -> Self {
        Self {
            translator: Translator::postgres(config),
            executor: None,
        }
    }

    /// Build a destination from `url`, `table` and `keyColumnName` settings.
    pub fn configure(cfg: &HashMap<String, String>) -> Self {
        Self::new(Config::from_map(cfg))
    }

    pub fn config(&self) -> &Config {
        self.translator.config()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn is_open(&self) -> bool {
        self.executor.is_some()
    }

    /// Open the destination on an existing executor.
    pub fn open_with(&mut self, executor: E) {
        self.executor = Some(executor);
    }

    /// Translate a record and execute its statement. Returns rows affected.
    pub async fn write(&self, record: &ChangeRecord) -> Result<u64, SinkError> {
        let statement = self.translator.translate(record)?;
        self.executor()?.execute(&statement).await
    }

    /// Like [`Destination::write`], but gives up when `token` is cancelled.
    ///
    /// Cancellation asks the executor to abort the statement in flight, then
    /// waits for that statement to settle. A statement that still completed
    /// returns its row count; one that was aborted returns
    /// [`SinkError::Cancelled`]. Either way the statement has settled before
    /// this returns, so the cancel request cannot reach a later write.
    /// A token that is already cancelled prevents the statement from being
    /// sent at all.
    pub async fn write_cancellable(
        &self,
        record: &ChangeRecord,
        token: &CancellationToken,
    ) -> Result<u64, SinkError> {
        let statement = self.translator.translate(record)?;
        let executor = self.executor()?;

        if token.is_cancelled() {
            return Err(SinkError::Cancelled);
        }

        let in_flight = executor.execute(&statement);
        tokio::pin!(in_flight);

        tokio::select! {
            result = &mut in_flight => return result,
            _ = token.cancelled() => {}
        }

        warn!(sql = %statement.sql, "Cancelling in-flight statement");
        if let Err(e) = executor.cancel().await {
            warn!("Failed to cancel statement: {e}");
        }
        match in_flight.await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                debug!("Statement ended after cancellation: {e}");
                Err(SinkError::Cancelled)
            }
        }
    }

    /// Writes are applied immediately, so there is nothing to flush.
    pub async fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Close the executor. Safe to call on a destination that never opened.
    ///
    /// The destination is closed afterwards even when closing fails.
    pub async fn teardown(&mut self) -> Result<(), SinkError> {
        let Some(executor) = self.executor.take() else {
            return Ok(());
        };
        executor.close().await?;
        info!("Destination closed");
        Ok(())
    }

    /// The executor this destination was opened with.
    pub fn executor(&self) -> Result<&E, SinkError> {
        self.executor.as_ref().ok_or(SinkError::NotOpen)
    }
}

impl PostgresDestination {
    /// Connect to the configured PostgreSQL URL.
    pub async fn open(&mut self) -> Result<(), SinkError> {
        let executor = PostgresExecutor::connect(&self.config().url).await?;
        self.open_with(executor);
        Ok(())
    }
}
