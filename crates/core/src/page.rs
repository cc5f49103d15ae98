//! Page wire types and the operate-result cache.
//!
//! These structs mirror the backing server's JSON shapes (camelCase fields).
//! Every mutation endpoint answers with a full [`OperateResult`] snapshot,
//! and callers replace their cached entry wholesale with it; fields are never
//! merged across concurrent mutations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Library membership state of a saved page, numeric on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum LibrarySaveStatus {
    NotSaved,
    Saved,
    Archived,
}

impl From<i32> for LibrarySaveStatus {
    fn from(value: i32) -> Self {
        match value {
            1 => LibrarySaveStatus::Saved,
            2 => LibrarySaveStatus::Archived,
            _ => LibrarySaveStatus::NotSaved,
        }
    }
}

impl From<LibrarySaveStatus> for i32 {
    fn from(value: LibrarySaveStatus) -> Self {
        match value {
            LibrarySaveStatus::NotSaved => 0,
            LibrarySaveStatus::Saved => 1,
            LibrarySaveStatus::Archived => 2,
        }
    }
}

/// The server's canonical status snapshot for a page, returned by every
/// mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperateResult {
    pub id: i64,
    pub starred: bool,
    pub read_later: bool,
    pub library_save_status: LibrarySaveStatus,
}

/// One row of a page listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageItem {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 timestamp used as the record-order pagination cursor.
    pub record_at: String,
    #[serde(default)]
    pub vote_score: i64,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub read_later: bool,
    #[serde(default = "default_save_status")]
    pub library_save_status: LibrarySaveStatus,
}

fn default_save_status() -> LibrarySaveStatus {
    LibrarySaveStatus::NotSaved
}

/// Full page content as stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub collection_id: Option<i64>,
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub read_later: bool,
    #[serde(default = "default_save_status")]
    pub library_save_status: LibrarySaveStatus,
}

/// Page detail response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetail {
    pub page: PageContent,
}

/// Sort mode of a page listing; decides which cursor pair applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageSort {
    #[default]
    RecordAt,
    VoteScore,
    CreatedAt,
}

/// Cursor-style listing query.
///
/// Forward/backward cursors are keyed by record timestamp, or by vote score
/// when sorting by votes. Unused cursor fields are omitted from the query
/// string.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageListQuery {
    pub count: u32,
    pub sort: PageSort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_record_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_record_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_vote_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_vote_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_status: Option<LibrarySaveStatus>,
}

impl PageListQuery {
    /// A query for the first page of `count` results.
    pub fn first_page(count: u32, sort: PageSort) -> Self {
        Self { count, sort, ..Default::default() }
    }

    /// Derives the query for the page after `last`, carrying the cursor
    /// matching the sort mode.
    pub fn next_after(&self, last: &PageItem) -> Self {
        let mut next = Self { count: self.count, sort: self.sort, asc: self.asc, ..Default::default() };
        next.source_id = self.source_id;
        next.collection_id = self.collection_id;
        next.save_status = self.save_status;
        match self.sort {
            PageSort::VoteScore => next.last_vote_score = Some(last.vote_score),
            _ => next.last_record_at = Some(last.record_at.clone()),
        }
        next
    }
}

/// Partial update of page detail fields; absent fields are left untouched
/// server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// UI-local cache of operate results, keyed by page id.
///
/// `apply` replaces the entry wholesale with the mutation response; last
/// writer wins, matching the rest of the system's no-merge convention.
#[derive(Debug, Default)]
pub struct OperateResultCache {
    entries: HashMap<i64, OperateResult>,
}

impl OperateResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached entry for the result's page id.
    pub fn apply(&mut self, result: OperateResult) {
        self.entries.insert(result.id, result);
    }

    pub fn get(&self, page_id: i64) -> Option<&OperateResult> {
        self.entries.get(&page_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_save_status_roundtrip() {
        let json = serde_json::to_string(&LibrarySaveStatus::Archived).unwrap();
        assert_eq!(json, "2");
        let status: LibrarySaveStatus = serde_json::from_str("1").unwrap();
        assert_eq!(status, LibrarySaveStatus::Saved);
        // Unknown numeric values degrade to NotSaved.
        let status: LibrarySaveStatus = serde_json::from_str("42").unwrap();
        assert_eq!(status, LibrarySaveStatus::NotSaved);
    }

    #[test]
    fn test_operate_result_wire_shape() {
        let json = r#"{"id":7,"starred":true,"readLater":false,"librarySaveStatus":1}"#;
        let result: OperateResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.id, 7);
        assert!(result.starred);
        assert_eq!(result.library_save_status, LibrarySaveStatus::Saved);
    }

    #[test]
    fn test_cache_replaces_wholesale() {
        let mut cache = OperateResultCache::new();
        cache.apply(OperateResult {
            id: 7,
            starred: false,
            read_later: true,
            library_save_status: LibrarySaveStatus::NotSaved,
        });
        cache.apply(OperateResult {
            id: 7,
            starred: true,
            read_later: false,
            library_save_status: LibrarySaveStatus::Saved,
        });

        let entry = cache.get(7).unwrap();
        assert!(entry.starred);
        assert!(!entry.read_later);
        assert_eq!(entry.library_save_status, LibrarySaveStatus::Saved);
        assert!(cache.get(8).is_none());
    }

    #[test]
    fn test_query_cursor_follows_sort_mode() {
        let item = PageItem {
            id: 1,
            title: "t".to_string(),
            url: "https://example.com".to_string(),
            domain: None,
            description: None,
            record_at: "2026-01-02T03:04:05Z".to_string(),
            vote_score: 12,
            starred: false,
            read_later: false,
            library_save_status: LibrarySaveStatus::NotSaved,
        };

        let by_time = PageListQuery::first_page(20, PageSort::RecordAt).next_after(&item);
        assert_eq!(by_time.last_record_at.as_deref(), Some("2026-01-02T03:04:05Z"));
        assert!(by_time.last_vote_score.is_none());

        let by_votes = PageListQuery::first_page(20, PageSort::VoteScore).next_after(&item);
        assert_eq!(by_votes.last_vote_score, Some(12));
        assert!(by_votes.last_record_at.is_none());
    }

    #[test]
    fn test_query_omits_unused_fields() {
        let query = PageListQuery::first_page(10, PageSort::RecordAt);
        let value = serde_json::to_value(&query).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("count"));
        assert!(obj.contains_key("sort"));
        assert!(!obj.contains_key("lastRecordAt"));
        assert_eq!(obj["sort"], "RECORD_AT");
    }
}
