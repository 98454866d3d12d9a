//! MediaRepository trait and its SQLite implementation.
//!
//! All Diesel work runs on the blocking thread pool; each create/delete is a
//! single statement, so the store's transactional guarantee is per-operation.

use crate::schema::media_records;
use crate::{MediaRecordRow, NewMediaRecordRow, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use shutterbin_core::MediaRecord;
use shutterbin_error::{DatabaseError, DatabaseErrorKind, ShutterbinResult};

/// Transactional access to the durable media record table.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Insert a new record, returning it with its assigned id.
    async fn create(&self, new_record: NewMediaRecordRow) -> ShutterbinResult<MediaRecord>;

    /// Look up a record by id.
    async fn find(&self, id: i64) -> ShutterbinResult<Option<MediaRecord>>;

    /// All records owned by `owner_address`, oldest first.
    async fn list_for_owner(&self, owner_address: &str) -> ShutterbinResult<Vec<MediaRecord>>;

    /// All records whose retention window elapsed before `cutoff`.
    async fn expired_before(&self, cutoff: NaiveDateTime) -> ShutterbinResult<Vec<MediaRecord>>;

    /// All records still live at `cutoff`.
    async fn live_after(&self, cutoff: NaiveDateTime) -> ShutterbinResult<Vec<MediaRecord>>;

    /// Sum of byte sizes over all records owned by `owner_address`.
    async fn usage_for_owner(&self, owner_address: &str) -> ShutterbinResult<i64>;

    /// Delete a record by id. Returns false when no such record existed.
    async fn delete(&self, id: i64) -> ShutterbinResult<bool>;
}

/// SQLite-backed media repository.
#[derive(Clone)]
pub struct SqliteMediaRepository {
    pool: SqlitePool,
}

impl SqliteMediaRepository {
    /// Create a new media repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn get_conn(
        pool: &SqlitePool,
    ) -> Result<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>,
        DatabaseError,
    > {
        pool.get()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
    }

    fn join_error(e: tokio::task::JoinError) -> DatabaseError {
        DatabaseError::new(DatabaseErrorKind::Query(e.to_string()))
    }
}

#[async_trait]
impl MediaRepository for SqliteMediaRepository {
    async fn create(&self, new_record: NewMediaRecordRow) -> ShutterbinResult<MediaRecord> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::get_conn(&pool)?;
            let row: MediaRecordRow = diesel::insert_into(media_records::table)
                .values(&new_record)
                .get_result(&mut conn)
                .map_err(DatabaseError::from)?;
            Ok(MediaRecord::try_from(row)?)
        })
        .await
        .map_err(Self::join_error)?
    }

    async fn find(&self, id: i64) -> ShutterbinResult<Option<MediaRecord>> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::get_conn(&pool)?;
            let row: Option<MediaRecordRow> = media_records::table
                .find(id)
                .first(&mut conn)
                .optional()
                .map_err(DatabaseError::from)?;
            row.map(|r| MediaRecord::try_from(r).map_err(Into::into))
                .transpose()
        })
        .await
        .map_err(Self::join_error)?
    }

    async fn list_for_owner(&self, owner_address: &str) -> ShutterbinResult<Vec<MediaRecord>> {
        let owner_address = owner_address.to_string();
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::get_conn(&pool)?;
            let rows: Vec<MediaRecordRow> = media_records::table
                .filter(media_records::owner_address.eq(&owner_address))
                .order(media_records::id.asc())
                .load(&mut conn)
                .map_err(DatabaseError::from)?;
            rows.into_iter()
                .map(|r| MediaRecord::try_from(r).map_err(Into::into))
                .collect()
        })
        .await
        .map_err(Self::join_error)?
    }

    async fn expired_before(&self, cutoff: NaiveDateTime) -> ShutterbinResult<Vec<MediaRecord>> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::get_conn(&pool)?;
            let rows: Vec<MediaRecordRow> = media_records::table
                .filter(media_records::expires_at.lt(cutoff))
                .order(media_records::id.asc())
                .load(&mut conn)
                .map_err(DatabaseError::from)?;
            rows.into_iter()
                .map(|r| MediaRecord::try_from(r).map_err(Into::into))
                .collect()
        })
        .await
        .map_err(Self::join_error)?
    }

    async fn live_after(&self, cutoff: NaiveDateTime) -> ShutterbinResult<Vec<MediaRecord>> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::get_conn(&pool)?;
            let rows: Vec<MediaRecordRow> = media_records::table
                .filter(media_records::expires_at.gt(cutoff))
                .order(media_records::id.asc())
                .load(&mut conn)
                .map_err(DatabaseError::from)?;
            rows.into_iter()
                .map(|r| MediaRecord::try_from(r).map_err(Into::into))
                .collect()
        })
        .await
        .map_err(Self::join_error)?
    }

    async fn usage_for_owner(&self, owner_address: &str) -> ShutterbinResult<i64> {
        let owner_address = owner_address.to_string();
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::get_conn(&pool)?;
            let total: Option<i64> = media_records::table
                .filter(media_records::owner_address.eq(&owner_address))
                .select(diesel::dsl::sql::<
                    diesel::sql_types::Nullable<diesel::sql_types::BigInt>,
                >("SUM(byte_size)"))
                .first(&mut conn)
                .map_err(DatabaseError::from)?;
            Ok(total.unwrap_or(0))
        })
        .await
        .map_err(Self::join_error)?
    }

    async fn delete(&self, id: i64) -> ShutterbinResult<bool> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::get_conn(&pool)?;
            let deleted = diesel::delete(media_records::table.find(id))
                .execute(&mut conn)
                .map_err(DatabaseError::from)?;
            Ok(deleted > 0)
        })
        .await
        .map_err(Self::join_error)?
    }
}
