//! API operations concerning data streams, the sources a project indexes
//! documents from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, NoContent, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    decoder::DataStreamDecoder,
    preset::DataStreamPreset,
    project::Project,
};

/// A data stream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DataStream {
    /// The data stream ID.
    pub id: Option<String>,
    /// The ID of the owning project.
    pub project_id: Option<String>,
    /// The ID of the decoder reading the stream.
    pub data_stream_decoder_id: Option<String>,
    /// The ID of the preset the stream was created from, if any.
    pub data_stream_preset_id: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// The source URL.
    pub url: Option<Url>,
    /// How often the stream is synced.
    pub sync_interval_minutes: Option<i32>,
    /// When the stream was last synced.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// When the stream was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the stream was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The owning project. Only present with `include=project`.
    pub project: Option<Item<Project>>,
    /// The decoder. Only present with `include=decoder`.
    pub decoder: Option<Item<DataStreamDecoder>>,
    /// The preset. Only present with `include=preset`.
    pub preset: Option<Item<DataStreamPreset>>,
}

impl Resource for DataStream {}

impl DataStream {
    /// A handle to the data stream with the given ID, for use as a request
    /// target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// List a project's data streams.
#[derive(Debug, Clone)]
pub struct GetDataStreams<'a> {
    /// The owning project.
    pub project: &'a Project,
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetDataStreams<'_> {
    type Response = Collection<DataStream>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/dataStream",
            &[self.project.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetDataStreams<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
            ..self
        }
    }
}

/// Create a data stream in a project.
#[derive(Debug, Clone)]
pub struct CreateDataStream<'a> {
    /// The owning project.
    pub project: &'a Project,
    /// The display name.
    pub name: &'a str,
    /// The source URL.
    pub url: &'a Url,
    /// The ID of the decoder reading the stream.
    pub data_stream_decoder_id: &'a str,
    /// The ID of the preset the stream is created from.
    pub data_stream_preset_id: Param<&'a str>,
    /// How often the stream is synced.
    pub sync_interval_minutes: Param<i32>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateDataStreamBody<'a> {
    name: &'a str,
    url: &'a Url,
    data_stream_decoder_id: &'a str,
    #[serde(skip_serializing_if = "Param::is_unset")]
    data_stream_preset_id: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    sync_interval_minutes: Param<i32>,
}

impl ApiRequest for CreateDataStream<'_> {
    type Response = Item<DataStream>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::CREATED
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/dataStream",
            &[self.project.id.as_deref()],
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(CreateDataStreamBody {
            name: self.name,
            url: self.url,
            data_stream_decoder_id: self.data_stream_decoder_id,
            data_stream_preset_id: self.data_stream_preset_id,
            sync_interval_minutes: self.sync_interval_minutes,
        })
    }
}

/// Fetch a single data stream.
#[derive(Debug, Clone)]
pub struct GetDataStream<'a> {
    /// The data stream to fetch.
    pub data_stream: &'a DataStream,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetDataStream<'_> {
    type Response = Item<DataStream>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/dataStream/{dataStreamId}",
            &[self.data_stream.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

/// Update a data stream. Unset fields are left unchanged on the server.
#[derive(Debug, Clone)]
pub struct UpdateDataStream<'a> {
    /// The data stream to update.
    pub data_stream: &'a DataStream,
    /// The new display name.
    pub name: Param<&'a str>,
    /// The new source URL.
    pub url: Param<&'a Url>,
    /// The ID of the decoder reading the stream.
    pub data_stream_decoder_id: Param<&'a str>,
    /// The ID of the preset the stream is based on. [Param::Null] detaches it.
    pub data_stream_preset_id: Param<&'a str>,
    /// How often the stream is synced.
    pub sync_interval_minutes: Param<i32>,
}

impl<'a> UpdateDataStream<'a> {
    /// An update of `data_stream` with every field unset.
    pub fn new(data_stream: &'a DataStream) -> Self {
        Self {
            data_stream,
            name: Param::Unset,
            url: Param::Unset,
            data_stream_decoder_id: Param::Unset,
            data_stream_preset_id: Param::Unset,
            sync_interval_minutes: Param::Unset,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UpdateDataStreamBody<'a> {
    #[serde(skip_serializing_if = "Param::is_unset")]
    name: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    url: Param<&'a Url>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    data_stream_decoder_id: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    data_stream_preset_id: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    sync_interval_minutes: Param<i32>,
}

impl ApiRequest for UpdateDataStream<'_> {
    type Response = Item<DataStream>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/dataStream/{dataStreamId}",
            &[self.data_stream.id.as_deref()],
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(UpdateDataStreamBody {
            name: self.name,
            url: self.url,
            data_stream_decoder_id: self.data_stream_decoder_id,
            data_stream_preset_id: self.data_stream_preset_id,
            sync_interval_minutes: self.sync_interval_minutes,
        })
    }
}

/// Delete a data stream.
#[derive(Debug, Clone)]
pub struct DeleteDataStream<'a> {
    /// The data stream to delete.
    pub data_stream: &'a DataStream,
}

impl ApiRequest for DeleteDataStream<'_> {
    type Response = NoContent;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::NO_CONTENT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/dataStream/{dataStreamId}",
            &[self.data_stream.id.as_deref()],
        )
    }
}
