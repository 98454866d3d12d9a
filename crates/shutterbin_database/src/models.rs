//! Diesel row types and conversions to the domain record.

use crate::schema::media_records;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use shutterbin_core::{MediaKind, MediaRecord};
use shutterbin_error::{DatabaseError, DatabaseErrorKind};
use std::str::FromStr;

/// Row read back from the media record table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = media_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MediaRecordRow {
    /// Primary key
    pub id: i64,
    /// Generated opaque filename
    pub stored_name: String,
    /// Path to the backing bytes
    pub storage_path: String,
    /// Media kind as stored ("image" / "video")
    pub media_kind: String,
    /// Uploading client's network address
    pub owner_address: String,
    /// File size in bytes
    pub byte_size: i64,
    /// Creation instant (UTC)
    pub created_at: NaiveDateTime,
    /// Expiration instant (UTC)
    pub expires_at: NaiveDateTime,
}

/// Insertable row for a new media record.
///
/// The id is assigned by the database on insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = media_records)]
pub struct NewMediaRecordRow {
    /// Generated opaque filename
    pub stored_name: String,
    /// Path to the backing bytes
    pub storage_path: String,
    /// Media kind as stored ("image" / "video")
    pub media_kind: String,
    /// Uploading client's network address
    pub owner_address: String,
    /// File size in bytes
    pub byte_size: i64,
    /// Creation instant (UTC)
    pub created_at: NaiveDateTime,
    /// Expiration instant (UTC)
    pub expires_at: NaiveDateTime,
}

impl NewMediaRecordRow {
    /// Build an insertable row from upload data.
    pub fn new(
        stored_name: impl Into<String>,
        storage_path: impl Into<String>,
        media_kind: MediaKind,
        owner_address: impl Into<String>,
        byte_size: i64,
        created_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> Self {
        Self {
            stored_name: stored_name.into(),
            storage_path: storage_path.into(),
            media_kind: media_kind.as_str().to_string(),
            owner_address: owner_address.into(),
            byte_size,
            created_at,
            expires_at,
        }
    }
}

impl TryFrom<MediaRecordRow> for MediaRecord {
    type Error = DatabaseError;

    fn try_from(row: MediaRecordRow) -> Result<Self, Self::Error> {
        let media_kind = MediaKind::from_str(&row.media_kind)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e)))?;

        Ok(MediaRecord {
            id: row.id,
            stored_name: row.stored_name,
            storage_path: row.storage_path,
            media_kind,
            owner_address: row.owner_address,
            byte_size: row.byte_size,
            created_at: row.created_at,
            expires_at: row.expires_at,
        })
    }
}
