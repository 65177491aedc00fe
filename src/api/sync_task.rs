//! API operations concerning sync tasks. A sync task is one run of fetching a
//! data stream and indexing the documents it yields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, NoContent, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    data_stream::DataStream,
    project::Project,
    sync_item::SyncItem,
};

/// The lifecycle state of a [SyncTask].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTaskStatus {
    /// Queued, not yet picked up by a worker.
    Pending,
    /// Running.
    Processing,
    /// Completed successfully.
    Finished,
    /// Gave up; see [SyncTask::error_message].
    Failed,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// A sync task.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SyncTask {
    /// The sync task ID.
    pub id: Option<String>,
    /// The ID of the owning project.
    pub project_id: Option<String>,
    /// The ID of the data stream being synced.
    pub data_stream_id: Option<String>,
    /// The lifecycle state.
    pub status: Option<SyncTaskStatus>,
    /// The number of items the stream yielded.
    pub total_items: Option<i32>,
    /// The number of items indexed so far.
    pub processed_items: Option<i32>,
    /// How many times the task has been tried.
    pub attempts: Option<i32>,
    /// The reason for the last failure.
    pub error_message: Option<String>,
    /// When the task started running.
    pub started_at: Option<DateTime<Utc>>,
    /// When the task finished or failed.
    pub finished_at: Option<DateTime<Utc>>,
    /// When the task was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the task was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The owning project. Only present with `include=project`.
    pub project: Option<Item<Project>>,
    /// The data stream being synced. Only present with `include=data_stream`.
    pub data_stream: Option<Item<DataStream>>,
    /// The items produced by the task. Only present with `include=sync_items`.
    pub sync_items: Option<Collection<SyncItem>>,
}

impl Resource for SyncTask {}

impl SyncTask {
    /// A handle to the sync task with the given ID, for use as a request
    /// target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Whether the task has reached a terminal state.
    pub fn is_done(&self) -> bool {
        matches!(
            self.status,
            Some(SyncTaskStatus::Finished | SyncTaskStatus::Failed)
        )
    }
}

/// List a project's sync tasks.
#[derive(Debug, Clone)]
pub struct GetSyncTasks<'a> {
    /// The owning project.
    pub project: &'a Project,
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetSyncTasks<'_> {
    type Response = Collection<SyncTask>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/syncTask",
            &[self.project.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetSyncTasks<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
            ..self
        }
    }
}

/// Schedule a sync of a project. With a data stream, only that stream is
/// synced.
#[derive(Debug, Clone)]
pub struct CreateSyncTask<'a> {
    /// The project to sync.
    pub project: &'a Project,
    /// The single data stream to sync.
    pub data_stream_id: Param<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateSyncTaskBody<'a> {
    #[serde(skip_serializing_if = "Param::is_unset")]
    data_stream_id: Param<&'a str>,
}

impl ApiRequest for CreateSyncTask<'_> {
    type Response = Item<SyncTask>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::CREATED
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/syncTask",
            &[self.project.id.as_deref()],
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(CreateSyncTaskBody {
            data_stream_id: self.data_stream_id,
        })
    }
}

/// Fetch a single sync task.
#[derive(Debug, Clone)]
pub struct GetSyncTask<'a> {
    /// The task to fetch.
    pub sync_task: &'a SyncTask,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetSyncTask<'_> {
    type Response = Item<SyncTask>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/syncTask/{syncTaskId}", &[self.sync_task.id.as_deref()])
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

/// Delete a sync task and its items.
#[derive(Debug, Clone)]
pub struct DeleteSyncTask<'a> {
    /// The task to delete.
    pub sync_task: &'a SyncTask,
}

impl ApiRequest for DeleteSyncTask<'_> {
    type Response = NoContent;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::NO_CONTENT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/syncTask/{syncTaskId}", &[self.sync_task.id.as_deref()])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::testutil::{StubTransport, client};

    #[test]
    fn create_sync_task_for_whole_project() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(201, r#"{"data": {"id": "t1", "status": "pending", "attempts": 0}}"#);

        let project = Project::with_id("p1");
        let task = client(&stub)
            .roundtrip(CreateSyncTask {
                project: &project,
                data_stream_id: Param::Unset,
            })?
            .into_inner();

        assert_eq!(task.status, Some(SyncTaskStatus::Pending));
        assert_eq!(task.attempts, Some(0));
        assert!(!task.is_done());

        let req = stub.last();
        assert_eq!(req.method, http::Method::POST);
        assert_eq!(req.path(), "/api/project/p1/syncTask");
        assert_eq!(req.body, "");

        Ok(())
    }

    #[test]
    fn create_sync_task_for_one_stream() -> anyhow::Result<()> {
        let stub = StubTransport::new().respond(201, r#"{"data": {"id": "t2"}}"#);

        let project = Project::with_id("p1");
        client(&stub).roundtrip(CreateSyncTask {
            project: &project,
            data_stream_id: Param::Value("ds1"),
        })?;

        assert_eq!(stub.last().form()["data_stream_id"], "ds1");

        Ok(())
    }

    #[test]
    fn statuses_decode() -> anyhow::Result<()> {
        let stub = StubTransport::new().respond(
            200,
            r#"{"data": [
                {"id": "a", "status": "processing", "total_items": 10, "processed_items": 4},
                {"id": "b", "status": "failed", "error_message": "timeout"},
                {"id": "c", "status": "archived"},
                {"id": "d", "status": null}
            ]}"#,
        );

        let project = Project::with_id("p1");
        let tasks = client(&stub).roundtrip(GetSyncTasks {
            project: &project,
            list: ListOptions::new().page(2),
        })?;

        let statuses: Vec<_> = tasks.data.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            [
                Some(SyncTaskStatus::Processing),
                Some(SyncTaskStatus::Failed),
                Some(SyncTaskStatus::Unknown),
                None,
            ]
        );
        assert!(tasks.data[1].is_done());
        assert_eq!(tasks.data[1].error_message.as_deref(), Some("timeout"));
        assert_eq!(stub.last().uri.query(), Some("page=2"));

        Ok(())
    }

    #[test]
    fn get_and_delete_sync_task() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(
                200,
                r#"{"data": {
                    "id": "t1",
                    "status": "finished",
                    "finished_at": "2024-05-01T09:00:00+02:00",
                    "sync_items": {"data": [{"id": "i1", "project_id": "p1"}]}
                }}"#,
            )
            .respond(204, "");
        let client = client(&stub);

        let task = SyncTask::with_id("t1");
        let fetched = client
            .roundtrip(GetSyncTask {
                sync_task: &task,
                include: Param::Value(Include(&["sync_items"])),
            })?
            .into_inner();

        assert!(fetched.is_done());
        assert_eq!(
            fetched.finished_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-05-01T07:00:00+00:00")
        );
        assert_eq!(fetched.sync_items.as_ref().map(Collection::len), Some(1));
        assert_eq!(stub.last().path(), "/api/syncTask/t1");

        client.roundtrip(DeleteSyncTask { sync_task: &fetched })?;
        assert_eq!(stub.last().method, http::Method::DELETE);
        assert_eq!(stub.last().path(), "/api/syncTask/t1");

        Ok(())
    }
}
