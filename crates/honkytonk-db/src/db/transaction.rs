//! Transaction helper for the delete-and-replace syncs.

use honkytonk_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use std::ops::{Deref, DerefMut};

/// A labelled transaction. Dropping it without [`TransactionGuard::commit`] rolls back.
///
/// ```ignore
/// let mut tx = TransactionGuard::begin(&pool, "replace_chart").await?;
/// sqlx::query("DELETE FROM chart_entries").execute(&mut **tx).await?;
/// tx.commit().await?;
/// ```
pub struct TransactionGuard<'a> {
    transaction: Transaction<'a, Postgres>,
    label: &'static str,
}

impl<'a> TransactionGuard<'a> {
    pub async fn begin(pool: &'a PgPool, label: &'static str) -> Result<Self, AppError> {
        let transaction = pool.begin().await?;
        tracing::debug!(transaction = label, "Transaction started");
        Ok(Self { transaction, label })
    }

    pub async fn commit(self) -> Result<(), AppError> {
        let label = self.label;
        self.transaction.commit().await?;
        tracing::debug!(transaction = label, "Transaction committed");
        Ok(())
    }
}

impl<'a> Deref for TransactionGuard<'a> {
    type Target = Transaction<'a, Postgres>;

    fn deref(&self) -> &Self::Target {
        &self.transaction
    }
}

impl<'a> DerefMut for TransactionGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.transaction
    }
}
