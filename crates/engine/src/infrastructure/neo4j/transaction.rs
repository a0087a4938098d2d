//! Transaction coordination for repository operations.
//!
//! One [`GraphTxn`] per operation. Every round-trip is raced against the
//! request context; the transaction is committed only by [`GraphTxn::finish`]
//! on a successful write, and is rolled back on every other exit path,
//! including the guard being dropped mid-operation.

use neo4rs::{Row, Txn};

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::RepoError;

use super::cypher::Statement;
use super::helpers::map_neo4j_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Never committed.
    Read,
    /// Committed when the operation succeeds.
    Write,
}

pub struct GraphTxn<'c> {
    ctx: &'c RequestContext,
    operation: &'static str,
    mode: AccessMode,
    txn: Option<Txn>,
}

impl<'c> GraphTxn<'c> {
    pub(super) fn new(
        ctx: &'c RequestContext,
        operation: &'static str,
        mode: AccessMode,
        txn: Txn,
    ) -> Self {
        Self {
            ctx,
            operation,
            mode,
            txn: Some(txn),
        }
    }

    fn open(&mut self) -> Result<&mut Txn, RepoError> {
        let operation = self.operation;
        self.txn
            .as_mut()
            .ok_or_else(|| RepoError::database(operation, "transaction already finished"))
    }

    /// Run a statement whose result rows are not needed.
    pub async fn run(&mut self, statement: Statement) -> Result<(), RepoError> {
        let ctx = self.ctx;
        let operation = self.operation;
        let txn = self.open()?;
        ctx.guard(operation, async move {
            txn.run(statement.into_query())
                .await
                .map_err(|e| map_neo4j_error(operation, e))
        })
        .await
    }

    /// Run a statement and collect every row.
    pub async fn fetch_all(&mut self, statement: Statement) -> Result<Vec<Row>, RepoError> {
        let ctx = self.ctx;
        let operation = self.operation;
        let txn = self.open()?;
        ctx.guard(operation, async move {
            let mut stream = txn
                .execute(statement.into_query())
                .await
                .map_err(|e| map_neo4j_error(operation, e))?;
            let mut rows = Vec::new();
            while let Some(row) = stream
                .next(txn.handle())
                .await
                .map_err(|e| map_neo4j_error(operation, e))?
            {
                rows.push(row);
            }
            Ok(rows)
        })
        .await
    }

    /// Run a statement and return its first row, if any.
    pub async fn fetch_one(&mut self, statement: Statement) -> Result<Option<Row>, RepoError> {
        Ok(self.fetch_all(statement).await?.into_iter().next())
    }

    /// End the transaction: commit a successful write, discard everything else.
    ///
    /// Cancellation is checked once more right before commit.
    pub async fn finish<T>(mut self, result: Result<T, RepoError>) -> Result<T, RepoError> {
        let Some(txn) = self.txn.take() else {
            return result;
        };

        match (self.mode, result) {
            (AccessMode::Write, Ok(value)) => {
                if let Err(e) = self.ctx.check(self.operation) {
                    rollback(self.operation, txn).await;
                    return Err(e);
                }
                txn.commit()
                    .await
                    .map_err(|e| map_neo4j_error(self.operation, e))?;
                Ok(value)
            }
            (_, result) => {
                rollback(self.operation, txn).await;
                result
            }
        }
    }
}

impl Drop for GraphTxn<'_> {
    fn drop(&mut self) {
        let Some(txn) = self.txn.take() else {
            return;
        };
        let operation = self.operation;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(rollback(operation, txn));
            }
            Err(_) => {
                tracing::warn!(operation, "Transaction dropped outside a runtime; left to the server to expire");
            }
        }
    }
}

async fn rollback(operation: &'static str, txn: Txn) {
    if let Err(e) = txn.rollback().await {
        tracing::warn!(operation, error = %e, "Failed to roll back transaction");
    }
}
