//! Page operations against the backing server.
//!
//! Listing uses cursor-style pagination; every mutation answers with the
//! full [`OperateResult`] snapshot, which callers use to replace their local
//! cache entry wholesale.

use postea_core::{OperateResult, PageContent, PageDetail, PageItem, PageListQuery, Result, UpdatePageRequest};
use serde::Serialize;

use crate::api::ApiClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadBatch<'a> {
    ids: &'a [i64],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCollection {
    collection_id: Option<i64>,
}

impl ApiClient {
    /// Lists pages with cursor pagination.
    pub async fn list_pages(&self, query: &PageListQuery) -> Result<Vec<PageItem>> {
        self.get_json_query("api/page/list", query).await
    }

    /// Fetches page detail, including content.
    pub async fn page_detail(&self, page_id: i64) -> Result<PageDetail> {
        self.get_json(&format!("api/page/{page_id}")).await
    }

    /// Re-fetches the page from its source and returns the full content.
    pub async fn fetch_full_content(&self, page_id: i64) -> Result<PageContent> {
        self.post_empty(&format!("api/page/fullContent/{page_id}")).await
    }

    /// Switches the page back to the originally captured content.
    pub async fn switch_raw_content(&self, page_id: i64) -> Result<PageContent> {
        self.post_empty(&format!("api/page/rawContent/{page_id}")).await
    }

    pub async fn star_page(&self, page_id: i64) -> Result<OperateResult> {
        self.post_empty(&format!("api/page/star/{page_id}")).await
    }

    pub async fn unstar_page(&self, page_id: i64) -> Result<OperateResult> {
        self.post_empty(&format!("api/page/unStar/{page_id}")).await
    }

    pub async fn read_later_page(&self, page_id: i64) -> Result<OperateResult> {
        self.post_empty(&format!("api/page/readLater/{page_id}")).await
    }

    pub async fn un_read_later_page(&self, page_id: i64) -> Result<OperateResult> {
        self.post_empty(&format!("api/page/unReadLater/{page_id}")).await
    }

    pub async fn archive_page(&self, page_id: i64) -> Result<OperateResult> {
        self.post_empty(&format!("api/page/archive/{page_id}")).await
    }

    pub async fn save_page_to_library(&self, page_id: i64) -> Result<OperateResult> {
        self.post_empty(&format!("api/page/saveToLibrary/{page_id}")).await
    }

    pub async fn remove_page_from_library(&self, page_id: i64) -> Result<OperateResult> {
        self.post_empty(&format!("api/page/removeFromLibrary/{page_id}")).await
    }

    /// Permanently deletes a page.
    pub async fn delete_page(&self, page_id: i64) -> Result<()> {
        self.delete(&format!("api/page/{page_id}")).await
    }

    /// Marks a batch of pages read; returns how many the server updated.
    pub async fn mark_read_batch(&self, ids: &[i64]) -> Result<u64> {
        self.post_json("api/page/markReadBatch", &MarkReadBatch { ids }).await
    }

    /// Updates page detail fields; absent fields stay untouched server-side.
    pub async fn update_page_detail(&self, page_id: i64, update: &UpdatePageRequest) -> Result<OperateResult> {
        self.post_json(&format!("api/page/update/{page_id}"), update).await
    }

    /// Moves a page into a collection (or out of all of them with `None`).
    pub async fn update_page_collection(&self, page_id: i64, collection_id: Option<i64>) -> Result<OperateResult> {
        self.post_json(&format!("api/page/collection/{page_id}"), &UpdateCollection { collection_id }).await
    }
}
