//! API operations concerning search use cases and their fields.
//!
//! A search use case describes one way a project's documents are searched:
//! which fields are matched and which are offered as facets. Widgets are
//! bound to a use case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, NoContent, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    project::Project,
    widget::Widget,
};

/// A search use case.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchUseCase {
    /// The search use case ID.
    pub id: Option<String>,
    /// The ID of the owning project.
    pub project_id: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// A free-form description.
    pub description: Option<String>,
    /// The indexing status reported by the server.
    pub status: Option<String>,
    /// Whether the use case can be queried without an API key.
    pub is_public: Option<bool>,
    /// When the use case was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the use case was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The owning project. Only present with `include=project`.
    pub project: Option<Item<Project>>,
    /// The use case's fields. Only present with `include=fields`.
    pub fields: Option<Collection<SearchUseCaseField>>,
    /// Widgets bound to the use case. Only present with `include=widgets`.
    pub widgets: Option<Collection<Widget>>,
}

impl Resource for SearchUseCase {}

impl SearchUseCase {
    /// A handle to the use case with the given ID, for use as a request
    /// target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// A document field taking part in a search use case.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchUseCaseField {
    /// The field ID.
    pub id: Option<String>,
    /// The ID of the owning use case.
    pub search_use_case_id: Option<String>,
    /// The document field name.
    pub name: Option<String>,
    /// The relevance weight of matches in this field.
    pub weight: Option<i32>,
    /// Whether the field is matched by free-text queries.
    pub is_searchable: Option<bool>,
    /// Whether the field is offered as a facet.
    pub is_facet: Option<bool>,
    /// When the field was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the field was last modified.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for SearchUseCaseField {}

/// List a project's search use cases.
#[derive(Debug, Clone)]
pub struct GetSearchUseCases<'a> {
    /// The owning project.
    pub project: &'a Project,
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetSearchUseCases<'_> {
    type Response = Collection<SearchUseCase>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/searchUseCase",
            &[self.project.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetSearchUseCases<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
            ..self
        }
    }
}

/// Create a search use case in a project.
#[derive(Debug, Clone)]
pub struct CreateSearchUseCase<'a> {
    /// The owning project.
    pub project: &'a Project,
    /// The display name.
    pub name: &'a str,
    /// A free-form description.
    pub description: Param<&'a str>,
    /// Whether the use case can be queried without an API key.
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize)]
struct CreateSearchUseCaseBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Param::is_unset")]
    description: Param<&'a str>,
    is_public: bool,
}

impl ApiRequest for CreateSearchUseCase<'_> {
    type Response = Item<SearchUseCase>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::CREATED
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/searchUseCase",
            &[self.project.id.as_deref()],
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(CreateSearchUseCaseBody {
            name: self.name,
            description: self.description,
            is_public: self.is_public,
        })
    }
}

/// Fetch a single search use case.
#[derive(Debug, Clone)]
pub struct GetSearchUseCase<'a> {
    /// The use case to fetch.
    pub search_use_case: &'a SearchUseCase,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetSearchUseCase<'_> {
    type Response = Item<SearchUseCase>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/searchUseCase/{searchUseCaseId}",
            &[self.search_use_case.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

/// Update a search use case. Unset fields are left unchanged on the server.
#[derive(Debug, Clone)]
pub struct UpdateSearchUseCase<'a> {
    /// The use case to update.
    pub search_use_case: &'a SearchUseCase,
    /// The new display name.
    pub name: Param<&'a str>,
    /// The new description. [Param::Null] clears it.
    pub description: Param<&'a str>,
    /// Whether the use case can be queried without an API key.
    pub is_public: Param<bool>,
}

impl<'a> UpdateSearchUseCase<'a> {
    /// An update of `search_use_case` with every field unset.
    pub fn new(search_use_case: &'a SearchUseCase) -> Self {
        Self {
            search_use_case,
            name: Param::Unset,
            description: Param::Unset,
            is_public: Param::Unset,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UpdateSearchUseCaseBody<'a> {
    #[serde(skip_serializing_if = "Param::is_unset")]
    name: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    description: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    is_public: Param<bool>,
}

impl ApiRequest for UpdateSearchUseCase<'_> {
    type Response = Item<SearchUseCase>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/searchUseCase/{searchUseCaseId}",
            &[self.search_use_case.id.as_deref()],
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(UpdateSearchUseCaseBody {
            name: self.name,
            description: self.description,
            is_public: self.is_public,
        })
    }
}

/// Delete a search use case.
#[derive(Debug, Clone)]
pub struct DeleteSearchUseCase<'a> {
    /// The use case to delete.
    pub search_use_case: &'a SearchUseCase,
}

impl ApiRequest for DeleteSearchUseCase<'_> {
    type Response = NoContent;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::NO_CONTENT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/searchUseCase/{searchUseCaseId}",
            &[self.search_use_case.id.as_deref()],
        )
    }
}

/// List the fields of a search use case.
#[derive(Debug, Clone)]
pub struct GetSearchUseCaseFields<'a> {
    /// The owning use case.
    pub search_use_case: &'a SearchUseCase,
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetSearchUseCaseFields<'_> {
    type Response = Collection<SearchUseCaseField>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/searchUseCase/{searchUseCaseId}/field",
            &[self.search_use_case.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetSearchUseCaseFields<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{
        ApiError, DeserializationError,
        api::testutil::{StubTransport, client},
    };

    #[test]
    fn create_sends_false_flag() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(201, r#"{"data": {"id": "s1", "name": "Catalog", "is_public": false}}"#);

        let project = Project::with_id("p1");
        let created = client(&stub).roundtrip(CreateSearchUseCase {
            project: &project,
            name: "Catalog",
            description: Param::Unset,
            is_public: false,
        })?;

        assert_eq!(created.data.is_public, Some(false));

        let req = stub.last();
        assert_eq!(req.path(), "/api/project/p1/searchUseCase");

        let form = req.form();
        assert_eq!(form["is_public"], "false");
        assert_eq!(form["name"], "Catalog");
        assert!(!form.contains_key("description"));

        Ok(())
    }

    #[test]
    fn get_use_cases_of_a_project() -> anyhow::Result<()> {
        let stub = StubTransport::new().respond(
            200,
            r#"{"data": [{"id": "s1", "project_id": "p1", "is_public": true}]}"#,
        );

        let project = Project::with_id("p1");
        let use_cases = client(&stub).roundtrip(GetSearchUseCases {
            project: &project,
            list: ListOptions::new().search("catalog"),
        })?;

        assert_eq!(use_cases.len(), 1);
        assert_eq!(use_cases.data[0].project_id, project.id);
        assert_eq!(stub.last().path(), "/api/project/p1/searchUseCase");
        assert_eq!(stub.last().uri.query(), Some("search=catalog"));

        Ok(())
    }

    #[test]
    fn get_use_case_with_fields() -> anyhow::Result<()> {
        let stub = StubTransport::new().respond(
            200,
            r#"{"data": {
                "id": "s1",
                "status": "indexing",
                "fields": {"data": [
                    {"id": "f1", "name": "title", "weight": 10, "is_searchable": true, "is_facet": false},
                    {"id": "f2", "name": "brand", "weight": 1, "is_searchable": false, "is_facet": true}
                ]},
                "widgets": {"data": []}
            }}"#,
        );

        let search_use_case = SearchUseCase::with_id("s1");
        let fetched = client(&stub)
            .roundtrip(GetSearchUseCase {
                search_use_case: &search_use_case,
                include: Param::Value(Include(&["fields", "widgets"])),
            })?
            .into_inner();

        assert_eq!(fetched.status.as_deref(), Some("indexing"));

        let fields = fetched.fields.expect("fields should be included");
        let facets: Vec<_> = fields
            .data
            .iter()
            .filter(|f| f.is_facet == Some(true))
            .filter_map(|f| f.name.as_deref())
            .collect();
        assert_eq!(facets, ["brand"]);

        assert_eq!(fetched.widgets.map(|w| w.len()), Some(0));
        assert_eq!(fetched.project, None);

        Ok(())
    }

    #[test]
    fn field_weight_overflow_reports_its_path() {
        let stub = StubTransport::new().respond(
            200,
            r#"{"data": [{"id": "f1", "weight": 1}, {"id": "f2", "weight": 2147483648}]}"#,
        );

        let search_use_case = SearchUseCase::with_id("s1");
        let err = client(&stub)
            .roundtrip(GetSearchUseCaseFields {
                search_use_case: &search_use_case,
                list: ListOptions::new(),
            })
            .unwrap_err();

        assert_matches!(err, ApiError::Deserialization(DeserializationError::Shape { path, .. }) => {
            assert_eq!(path, "data[1].weight");
        });
        assert_eq!(stub.last().path(), "/api/searchUseCase/s1/field");
    }

    #[test]
    fn update_and_delete_use_case() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(200, r#"{"data": {"id": "s1", "is_public": true}}"#)
            .respond(204, "");
        let client = client(&stub);

        let search_use_case = SearchUseCase::with_id("s1");
        let updated = client
            .roundtrip(UpdateSearchUseCase {
                is_public: Param::Value(true),
                ..UpdateSearchUseCase::new(&search_use_case)
            })?
            .into_inner();

        assert_eq!(updated.is_public, Some(true));
        assert_eq!(search_use_case.is_public, None);
        assert_eq!(stub.last().form()["is_public"], "true");

        client.roundtrip(DeleteSearchUseCase {
            search_use_case: &updated,
        })?;
        assert_eq!(stub.last().method, http::Method::DELETE);
        assert_eq!(stub.last().path(), "/api/searchUseCase/s1");

        Ok(())
    }
}
