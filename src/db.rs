use std::{future::Future, pin::Pin, time::Duration};

use anyhow::Result;
use sea_orm::{DatabaseConnection, DatabaseTransaction, SqlxPostgresConnector, TransactionError, TransactionTrait};
use sqlx::postgres::PgPoolOptions;

use crate::error::{AppError, AppResult};

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

/// Boxed body of a scoped transaction, borrowing the open transaction for `'c`.
pub type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'c>>;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// SeaORM connection sharing the sqlx pool, so both layers draw from one set of connections.
pub fn create_orm_conn(pool: &DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone())
}

pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Runs `work` inside a single store transaction.
///
/// `Ok` commits and `Err` rolls back before the error is returned, so every exit path
/// releases the transaction. The whole unit is bounded by `deadline`; when it elapses
/// the transaction is dropped unfinished, which rolls it back, and the caller gets
/// [`AppError::DeadlineExceeded`].
pub async fn in_transaction<T, F>(conn: &OrmConn, deadline: Duration, work: F) -> AppResult<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, T> + Send,
{
    match tokio::time::timeout(deadline, conn.transaction::<F, T, AppError>(work)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(TransactionError::Transaction(err))) => Err(err),
        Ok(Err(TransactionError::Connection(err))) => Err(AppError::OrmError(err)),
        Err(_) => {
            tracing::warn!(deadline_ms = %deadline.as_millis(), "transaction deadline exceeded");
            Err(AppError::DeadlineExceeded)
        }
    }
}
