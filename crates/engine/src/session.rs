//! Units of work.
//!
//! A [`Session`] wraps one database transaction and a lease on the engine's
//! session counter. The lease is released when the session is consumed or
//! dropped, whichever path the caller takes; an uncommitted transaction rolls
//! back on drop.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use api_types::{Transaction, TransactionNew};
use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait};

use crate::{EngineError, ResultEngine, transactions};

#[derive(Debug)]
pub(crate) struct Lease(Arc<AtomicUsize>);

impl Lease {
    pub(crate) fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!("session released");
    }
}

/// A short-lived unit of work against the store.
pub struct Session {
    tx: DatabaseTransaction,
    database: DatabaseConnection,
    lease: Lease,
}

impl Session {
    pub(crate) fn new(tx: DatabaseTransaction, database: DatabaseConnection, lease: Lease) -> Self {
        Self {
            tx,
            database,
            lease,
        }
    }

    /// Stage `record`, commit, then read the row back so the caller gets the
    /// id the store assigned.
    pub async fn insert(self, record: TransactionNew) -> ResultEngine<Transaction> {
        let Session {
            tx,
            database,
            lease,
        } = self;

        let id = transactions::Entity::insert(transactions::ActiveModel::from(&record))
            .exec(&tx)
            .await?
            .last_insert_id;
        tx.commit().await?;

        let model = transactions::Entity::find_by_id(id)
            .one(&database)
            .await?
            .ok_or(EngineError::Missing(id))?;

        drop(lease);
        tracing::debug!(id, "transaction committed");
        Ok(model.into())
    }
}
