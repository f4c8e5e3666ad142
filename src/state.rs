use std::{sync::Arc, time::Duration};

use crate::{
    db::{DbPool, OrmConn, create_orm_conn},
    locks::OwnerLocks,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub locks: Arc<OwnerLocks>,
    pub txn_timeout: Duration,
}

impl AppState {
    pub fn new(pool: DbPool, txn_timeout: Duration) -> Self {
        let orm = create_orm_conn(&pool);
        Self {
            pool,
            orm,
            locks: Arc::new(OwnerLocks::default()),
            txn_timeout,
        }
    }
}
