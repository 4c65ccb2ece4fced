use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use feed_core::{Item, ItemId, PageData};
use serde::{Deserialize, Deserializer};

use crate::{FailureKind, FetchError};

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    page: u32,
    page_size: u32,
    total: u64,
    items: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    id: WireId,
    source: String,
    title: String,
    url: String,
    #[serde(default, deserialize_with = "optional_timestamp")]
    published_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp")]
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl From<WireId> for ItemId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => ItemId::new(n.to_string()),
            WireId::Text(s) => ItemId::new(s),
        }
    }
}

impl From<WireItem> for Item {
    fn from(item: WireItem) -> Self {
        Item {
            id: item.id.into(),
            source: item.source,
            title: item.title,
            url: item.url,
            published_at: item.published_at,
            fetched_at: item.fetched_at,
        }
    }
}

/// Decodes an `/items` response body.
///
/// Fails with [`FailureKind::Malformed`] on invalid JSON, a missing field, an
/// unparsable timestamp or a repeated item id within the page.
pub fn decode_page(body: &[u8]) -> Result<PageData, FetchError> {
    let response: ItemsResponse = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::Malformed, err.to_string()))?;

    let mut seen = HashSet::with_capacity(response.items.len());
    let mut items = Vec::with_capacity(response.items.len());
    for wire in response.items {
        let item = Item::from(wire);
        if !seen.insert(item.id.clone()) {
            return Err(FetchError::new(
                FailureKind::Malformed,
                format!("duplicate item id {}", item.id),
            ));
        }
        items.push(item);
    }

    Ok(PageData {
        page: response.page,
        page_size: response.page_size,
        total: response.total,
        items,
    })
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("bad timestamp {raw:?}")))
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("bad timestamp {raw:?}"))),
        None => Ok(None),
    }
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_numeric_ids_and_mixed_timestamps() {
        let body = br#"{
            "page": 2, "page_size": 20, "total": 45,
            "items": [
                {"id": 7, "source": "hn", "title": "A", "url": "https://a.example",
                 "published_at": "2024-05-01T10:00:00+02:00", "fetched_at": "2024-05-01T09:00:00"},
                {"id": "x-1", "source": "lobsters", "title": "B", "url": "https://b.example",
                 "published_at": null, "fetched_at": "2024-05-01 09:30:00.250"}
            ]
        }"#;

        let page = decode_page(body).expect("decode");
        assert_eq!(page.page, 2);
        assert_eq!(page.total, 45);
        assert_eq!(page.items[0].id.as_str(), "7");
        assert_eq!(
            page.items[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            page.items[0].fetched_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(page.items[1].id.as_str(), "x-1");
        assert_eq!(page.items[1].published_at, None);
    }

    #[test]
    fn missing_published_at_is_none() {
        let body = br#"{"page":1,"page_size":20,"total":1,"items":[
            {"id":1,"source":"s","title":"t","url":"u","fetched_at":"2024-01-01T00:00:00Z"}]}"#;
        assert_eq!(decode_page(body).unwrap().items[0].published_at, None);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let body = br#"{"page":1,"page_size":20,"total":2,"items":[
            {"id":1,"source":"s","title":"t","url":"u","fetched_at":"2024-01-01T00:00:00Z"},
            {"id":"1","source":"s","title":"t2","url":"u2","fetched_at":"2024-01-01T00:00:00Z"}]}"#;
        let err = decode_page(body).unwrap_err();
        assert_eq!(err.kind, FailureKind::Malformed);
        assert!(err.message.contains("duplicate"));
    }

    #[test]
    fn rejects_bad_timestamps_and_shapes() {
        let bad_time = br#"{"page":1,"page_size":20,"total":1,"items":[
            {"id":1,"source":"s","title":"t","url":"u","fetched_at":"yesterday"}]}"#;
        assert_eq!(decode_page(bad_time).unwrap_err().kind, FailureKind::Malformed);
        assert_eq!(decode_page(b"<html>").unwrap_err().kind, FailureKind::Malformed);
        assert_eq!(
            decode_page(br#"{"items": []}"#).unwrap_err().kind,
            FailureKind::Malformed
        );
    }
}
