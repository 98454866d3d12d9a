//! The media record domain type.

use crate::MediaKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Durable metadata describing one stored media file.
///
/// Records are created only by a successful upload and are immutable
/// afterward; the expiration sweeper is the only path that destroys them.
/// `expires_at` is fixed at creation time as `created_at` plus the retention
/// window and never changes.
///
/// Timestamps are naive UTC, matching what the record store persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Unique, monotonically assigned identity
    pub id: i64,
    /// Generated opaque filename, collision-resistant
    pub stored_name: String,
    /// Location of the backing bytes, one-to-one with `stored_name`
    pub storage_path: String,
    /// Image or video
    pub media_kind: MediaKind,
    /// Network address of the uploading client (IPv4/IPv6 literal)
    pub owner_address: String,
    /// Exact size of the backing file at creation time
    pub byte_size: i64,
    /// Creation instant (UTC)
    pub created_at: NaiveDateTime,
    /// Instant past which the record is unserviceable (UTC)
    pub expires_at: NaiveDateTime,
}

impl MediaRecord {
    /// True when the record's retention window has elapsed at `now`.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn expiry_is_exclusive_of_the_deadline() {
        let created = Utc::now().naive_utc();
        let record = MediaRecord {
            id: 1,
            stored_name: "20250101_000000_deadbeef".to_string(),
            storage_path: "/tmp/media/images/20250101_000000_deadbeef".to_string(),
            media_kind: MediaKind::Image,
            owner_address: "10.0.0.1".to_string(),
            byte_size: 1000,
            created_at: created,
            expires_at: created + Duration::hours(24),
        };

        assert!(!record.is_expired(created));
        assert!(!record.is_expired(record.expires_at));
        assert!(record.is_expired(record.expires_at + Duration::seconds(1)));
    }
}
