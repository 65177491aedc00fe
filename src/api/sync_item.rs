//! API operations concerning sync items, the documents produced by a sync
//! task. A sync item is addressed by the pair of its own ID and its
//! project's ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, NoContent, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    project::Project,
    sync_task::SyncTask,
};

const ITEM_PATH: &str = "/api/syncItem/{syncItemId},{projectId}";

/// A sync item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SyncItem {
    /// The sync item ID. Only unique within a project.
    pub id: Option<String>,
    /// The ID of the owning project.
    pub project_id: Option<String>,
    /// The ID of the task that produced the item.
    pub sync_task_id: Option<String>,
    /// The document's ID in the source data stream.
    pub external_id: Option<String>,
    /// A digest of the document, used to skip unchanged documents.
    pub checksum: Option<String>,
    /// The decoded document.
    pub document: Option<Value>,
    /// When the item was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the item was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The owning project. Only present with `include=project`.
    pub project: Option<Item<Project>>,
    /// The producing task. Only present with `include=sync_task`.
    pub sync_task: Option<Item<SyncTask>>,
}

impl Resource for SyncItem {}

impl SyncItem {
    /// A handle to the sync item with the given key, for use as a request
    /// target.
    pub fn with_key(id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            project_id: Some(project_id.into()),
            ..Default::default()
        }
    }

    fn key(&self) -> [Option<&str>; 2] {
        [self.id.as_deref(), self.project_id.as_deref()]
    }
}

/// List the items produced by a sync task.
#[derive(Debug, Clone)]
pub struct GetSyncItems<'a> {
    /// The producing task.
    pub sync_task: &'a SyncTask,
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetSyncItems<'_> {
    type Response = Collection<SyncItem>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/syncTask/{syncTaskId}/syncItem",
            &[self.sync_task.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetSyncItems<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
            ..self
        }
    }
}

/// Fetch a single sync item.
#[derive(Debug, Clone)]
pub struct GetSyncItem<'a> {
    /// The item to fetch. Both its ID and project ID must be set.
    pub sync_item: &'a SyncItem,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetSyncItem<'_> {
    type Response = Item<SyncItem>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(ITEM_PATH, &self.sync_item.key())
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

/// Delete a sync item, removing its document from the index.
#[derive(Debug, Clone)]
pub struct DeleteSyncItem<'a> {
    /// The item to delete. Both its ID and project ID must be set.
    pub sync_item: &'a SyncItem,
}

impl ApiRequest for DeleteSyncItem<'_> {
    type Response = NoContent;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::NO_CONTENT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(ITEM_PATH, &self.sync_item.key())
    }
}
