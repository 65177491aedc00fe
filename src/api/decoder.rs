//! API operations concerning data stream decoders. Decoders are defined by
//! the service and are read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
};

/// A decoder, which turns the raw payload of a data stream into documents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DataStreamDecoder {
    /// The decoder ID.
    pub id: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// The server-side implementation of the decoder.
    pub class_name: Option<String>,
    /// The content type the decoder accepts.
    pub content_type: Option<String>,
    /// The number of projects with a data stream using this decoder.
    pub projects_count: Option<i32>,
    /// When the decoder was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the decoder was last modified.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for DataStreamDecoder {}

impl DataStreamDecoder {
    /// A handle to the decoder with the given ID, for use as a request target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// List the available decoders.
#[derive(Default, Debug, Clone)]
pub struct GetDecoders<'a> {
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetDecoders<'_> {
    type Response = Collection<DataStreamDecoder>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        Ok("/api/dataStreamDecoder".to_string())
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetDecoders<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
        }
    }
}

/// Fetch a single decoder.
#[derive(Debug, Clone)]
pub struct GetDecoder<'a> {
    /// The decoder to fetch.
    pub decoder: &'a DataStreamDecoder,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetDecoder<'_> {
    type Response = Item<DataStreamDecoder>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/dataStreamDecoder/{dataStreamDecoderId}",
            &[self.decoder.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::testutil::{StubTransport, client};

    #[test]
    fn get_decoders() -> anyhow::Result<()> {
        let stub = StubTransport::new().respond(
            200,
            r#"{"data": [
                {"id": "d1", "name": "RSS", "class_name": "RssDecoder",
                 "content_type": "application/rss+xml", "projects_count": 4},
                {"id": "d2", "name": "JSON", "projects_count": null}
            ]}"#,
        );

        let decoders = client(&stub).roundtrip(GetDecoders::default())?;

        assert_eq!(decoders.len(), 2);
        assert_eq!(decoders.data[0].projects_count, Some(4));
        assert_eq!(
            decoders.data[0].content_type.as_deref(),
            Some("application/rss+xml")
        );
        assert_eq!(decoders.data[1].projects_count, None);
        assert_eq!(decoders.pagination(), None);

        assert_eq!(stub.last().path(), "/api/dataStreamDecoder");
        assert_eq!(stub.last().uri.query(), None);

        Ok(())
    }

    #[test]
    fn get_decoder() -> anyhow::Result<()> {
        let stub = StubTransport::new().respond(200, r#"{"data": {"id": "d1", "name": "RSS"}}"#);

        let decoder = DataStreamDecoder::with_id("d1");
        let fetched = client(&stub).roundtrip(GetDecoder {
            decoder: &decoder,
            include: Param::Unset,
        })?;

        assert_eq!(fetched.data.name.as_deref(), Some("RSS"));
        assert_eq!(stub.last().path(), "/api/dataStreamDecoder/d1");

        Ok(())
    }

    #[test]
    fn oversized_count_is_a_deserialization_error() {
        let stub = StubTransport::new()
            .respond(200, r#"{"data": {"id": "d1", "projects_count": 4294967296}}"#);

        let decoder = DataStreamDecoder::with_id("d1");
        let err = client(&stub)
            .roundtrip(GetDecoder {
                decoder: &decoder,
                include: Param::Unset,
            })
            .unwrap_err();

        assert!(matches!(
            err,
            crate::ApiError::Deserialization(crate::DeserializationError::Shape { ref path, .. })
                if path == "data.projects_count"
        ));
    }
}
