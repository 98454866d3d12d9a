//! Diesel schema for the media record table.

diesel::table! {
    media_records (id) {
        id -> BigInt,
        stored_name -> Text,
        storage_path -> Text,
        media_kind -> Text,
        owner_address -> Text,
        byte_size -> BigInt,
        created_at -> Timestamp,
        expires_at -> Timestamp,
    }
}
