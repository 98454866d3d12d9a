//! Media kind classification for uploaded content.

use serde::{Deserialize, Serialize};

/// Kind of uploaded media content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Image content (PNG, JPEG, GIF, etc.)
    Image,
    /// Video content (MP4, WebM, MKV, etc.)
    Video,
}

impl MediaKind {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(format!("Unknown media kind: {}", s)),
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_strings() {
        assert_eq!(MediaKind::from_str("image").unwrap(), MediaKind::Image);
        assert_eq!(MediaKind::from_str("video").unwrap(), MediaKind::Video);
        assert_eq!(MediaKind::Image.to_string(), "image");
        assert!(MediaKind::from_str("audio").is_err());
    }
}
