//! Reddit API response shapes.

use chrono::{DateTime, Utc};
use rdash_core::PostRecord;
use serde::Deserialize;

/// OAuth token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Search listing wrapper.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListingChild {
    pub data: PostData,
}

#[derive(Debug, Deserialize)]
pub struct PostData {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub selftext: Option<String>,
    /// Epoch seconds.
    pub created_utc: f64,
}

impl PostData {
    /// Convert to a [`PostRecord`] attributed to `source`.
    ///
    /// Returns `None` if the timestamp is not representable.
    #[must_use]
    pub fn into_record(self, source: &str) -> Option<PostRecord> {
        let created_utc = epoch_to_utc(self.created_utc)?;
        let text = format!(
            "{} {}",
            self.title.unwrap_or_default(),
            self.selftext.unwrap_or_default()
        );
        Some(PostRecord {
            id: self.id,
            source: source.to_string(),
            text,
            created_utc,
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_joins_title_and_body() {
        let post = PostData {
            id: "t1".to_string(),
            title: Some("Ladies coach".to_string()),
            selftext: Some("always full".to_string()),
            created_utc: 1_700_000_000.0,
        };
        let record = post.into_record("malaysia").unwrap();
        assert_eq!(record.text, "Ladies coach always full");
        assert_eq!(record.source, "malaysia");
        assert_eq!(record.created_utc.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_body_keeps_trailing_space() {
        let post = PostData {
            id: "t2".to_string(),
            title: Some("Title only".to_string()),
            selftext: None,
            created_utc: 0.0,
        };
        assert_eq!(post.into_record("x").unwrap().text, "Title only ");
    }

    #[test]
    fn non_finite_timestamp_is_dropped() {
        let post = PostData {
            id: "t3".to_string(),
            title: None,
            selftext: None,
            created_utc: f64::NAN,
        };
        assert!(post.into_record("x").is_none());
    }

    #[test]
    fn listing_deserializes() {
        let json = r#"{"kind":"Listing","data":{"after":"t3_b","children":[
            {"kind":"t3","data":{"id":"a","title":"T","selftext":"","created_utc":1700000000.5}}
        ]}}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t3_b"));
        assert_eq!(listing.data.children[0].data.id, "a");
    }
}
