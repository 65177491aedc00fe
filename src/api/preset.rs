//! API operations concerning data stream presets. A preset pairs a well-known
//! source URL with the decoder that reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    decoder::DataStreamDecoder,
};

/// A data stream preset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DataStreamPreset {
    /// The preset ID.
    pub id: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// A free-form description.
    pub description: Option<String>,
    /// The source URL data streams created from this preset read from.
    pub url: Option<Url>,
    /// The ID of the decoder the preset uses.
    pub data_stream_decoder_id: Option<String>,
    /// The number of projects with a data stream using this preset.
    pub projects_count: Option<i32>,
    /// When the preset was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the preset was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The decoder. Only present with `include=decoder`.
    pub decoder: Option<Item<DataStreamDecoder>>,
}

impl Resource for DataStreamPreset {}

impl DataStreamPreset {
    /// A handle to the preset with the given ID, for use as a request target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// List the available presets.
#[derive(Default, Debug, Clone)]
pub struct GetPresets<'a> {
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetPresets<'_> {
    type Response = Collection<DataStreamPreset>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        Ok("/api/dataStreamPreset".to_string())
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetPresets<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
        }
    }
}

/// Fetch a single preset.
#[derive(Debug, Clone)]
pub struct GetPreset<'a> {
    /// The preset to fetch.
    pub preset: &'a DataStreamPreset,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetPreset<'_> {
    type Response = Item<DataStreamPreset>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/dataStreamPreset/{dataStreamPresetId}",
            &[self.preset.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}
