//! API operations concerning widgets, the embeddable search front ends bound
//! to a search use case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, NoContent, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    project::Project,
    search_use_case::SearchUseCase,
};

/// A widget.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Widget {
    /// The widget ID.
    pub id: Option<String>,
    /// The ID of the owning project.
    pub project_id: Option<String>,
    /// The ID of the use case the widget queries.
    pub search_use_case_id: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// The kind of front end, e.g. `searchbar` or `results`.
    pub r#type: Option<String>,
    /// Front-end settings. Opaque to the API.
    pub config: Option<Value>,
    /// The key embedded in pages hosting the widget.
    pub public_key: Option<Uuid>,
    /// When the widget was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the widget was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The owning project. Only present with `include=project`.
    pub project: Option<Item<Project>>,
    /// The queried use case. Only present with `include=search_use_case`.
    pub search_use_case: Option<Item<SearchUseCase>>,
}

impl Resource for Widget {}

impl Widget {
    /// A handle to the widget with the given ID, for use as a request target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// List a project's widgets.
#[derive(Debug, Clone)]
pub struct GetWidgets<'a> {
    /// The owning project.
    pub project: &'a Project,
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetWidgets<'_> {
    type Response = Collection<Widget>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/widget",
            &[self.project.id.as_deref()],
        )
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetWidgets<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
            ..self
        }
    }
}

/// Create a widget in a project.
#[derive(Debug, Clone)]
pub struct CreateWidget<'a> {
    /// The owning project.
    pub project: &'a Project,
    /// The ID of the use case the widget queries.
    pub search_use_case_id: &'a str,
    /// The display name.
    pub name: &'a str,
    /// The kind of front end.
    pub r#type: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct CreateWidgetBody<'a> {
    search_use_case_id: &'a str,
    name: &'a str,
    r#type: &'a str,
}

impl ApiRequest for CreateWidget<'_> {
    type Response = Item<Widget>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::CREATED
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path(
            "/api/project/{projectId}/widget",
            &[self.project.id.as_deref()],
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(CreateWidgetBody {
            search_use_case_id: self.search_use_case_id,
            name: self.name,
            r#type: self.r#type,
        })
    }
}

/// Fetch a single widget.
#[derive(Debug, Clone)]
pub struct GetWidget<'a> {
    /// The widget to fetch.
    pub widget: &'a Widget,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetWidget<'_> {
    type Response = Item<Widget>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/widget/{widgetId}", &[self.widget.id.as_deref()])
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

/// Update a widget. Unset fields are left unchanged on the server.
#[derive(Debug, Clone)]
pub struct UpdateWidget<'a> {
    /// The widget to update.
    pub widget: &'a Widget,
    /// The ID of the use case the widget queries.
    pub search_use_case_id: Param<&'a str>,
    /// The new display name.
    pub name: Param<&'a str>,
    /// The kind of front end.
    pub r#type: Param<&'a str>,
}

impl<'a> UpdateWidget<'a> {
    /// An update of `widget` with every field unset.
    pub fn new(widget: &'a Widget) -> Self {
        Self {
            widget,
            search_use_case_id: Param::Unset,
            name: Param::Unset,
            r#type: Param::Unset,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UpdateWidgetBody<'a> {
    #[serde(skip_serializing_if = "Param::is_unset")]
    search_use_case_id: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    name: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    r#type: Param<&'a str>,
}

impl ApiRequest for UpdateWidget<'_> {
    type Response = Item<Widget>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/widget/{widgetId}", &[self.widget.id.as_deref()])
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(UpdateWidgetBody {
            search_use_case_id: self.search_use_case_id,
            name: self.name,
            r#type: self.r#type,
        })
    }
}

/// Delete a widget.
#[derive(Debug, Clone)]
pub struct DeleteWidget<'a> {
    /// The widget to delete.
    pub widget: &'a Widget,
}

impl ApiRequest for DeleteWidget<'_> {
    type Response = NoContent;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::NO_CONTENT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/widget/{widgetId}", &[self.widget.id.as_deref()])
    }
}
