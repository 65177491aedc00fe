//! API operations concerning projects, the unit that owns data streams,
//! search use cases and widgets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, NoContent, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    data_stream::DataStream,
    search_use_case::SearchUseCase,
    user::User,
    widget::Widget,
};

/// A project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Project {
    /// The project ID.
    pub id: Option<String>,
    /// The ID of the owning user.
    pub user_id: Option<String>,
    /// The project name.
    pub name: Option<String>,
    /// A free-form description.
    pub description: Option<String>,
    /// The public key used by widgets to query this project.
    pub search_key: Option<Uuid>,
    /// Whether the project is indexed and searchable.
    pub is_active: Option<bool>,
    /// When the project was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the project was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The owning user. Only present with `include=user`.
    pub user: Option<Item<User>>,
    /// The project's data streams. Only present with `include=data_streams`.
    pub data_streams: Option<Collection<DataStream>>,
    /// The project's search use cases. Only present with
    /// `include=search_use_cases`.
    pub search_use_cases: Option<Collection<SearchUseCase>>,
    /// The project's widgets. Only present with `include=widgets`.
    pub widgets: Option<Collection<Widget>>,
}

impl Resource for Project {}

impl Project {
    /// A handle to the project with the given ID, for use as a request target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// List all projects visible to the caller.
#[derive(Default, Debug, Clone)]
pub struct GetProjects<'a> {
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetProjects<'_> {
    type Response = Collection<Project>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        Ok("/api/project".to_string())
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetProjects<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
        }
    }
}

/// List the projects owned by a user.
#[derive(Debug, Clone)]
pub struct GetUserProjects<'a> {
    /// The owning user.
    pub user: &'a User,
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetUserProjects<'_> {
    type Response = Collection<Project>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/user/{userId}/project", &[self.user.id.as_deref()])
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetUserProjects<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
            ..self
        }
    }
}

/// Fetch a single project.
#[derive(Debug, Clone)]
pub struct GetProject<'a> {
    /// The project to fetch.
    pub project: &'a Project,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetProject<'_> {
    type Response = Item<Project>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/project/{projectId}", &[self.project.id.as_deref()])
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

/// Create a project owned by the caller.
#[derive(Debug, Clone)]
pub struct CreateProject<'a> {
    /// The project name.
    pub name: &'a str,
    /// A free-form description.
    pub description: Param<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateProjectBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Param::is_unset")]
    description: Param<&'a str>,
}

impl ApiRequest for CreateProject<'_> {
    type Response = Item<Project>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::CREATED
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        Ok("/api/project".to_string())
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(CreateProjectBody {
            name: self.name,
            description: self.description,
        })
    }
}

/// Update a project. Unset fields are left unchanged on the server.
#[derive(Debug, Clone)]
pub struct UpdateProject<'a> {
    /// The project to update.
    pub project: &'a Project,
    /// The new name.
    pub name: Param<&'a str>,
    /// The new description. [Param::Null] clears it.
    pub description: Param<&'a str>,
    /// Whether the project is indexed and searchable.
    pub is_active: Param<bool>,
}

impl<'a> UpdateProject<'a> {
    /// An update of `project` with every field unset.
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            name: Param::Unset,
            description: Param::Unset,
            is_active: Param::Unset,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UpdateProjectBody<'a> {
    #[serde(skip_serializing_if = "Param::is_unset")]
    name: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    description: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    is_active: Param<bool>,
}

impl ApiRequest for UpdateProject<'_> {
    type Response = Item<Project>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/project/{projectId}", &[self.project.id.as_deref()])
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(UpdateProjectBody {
            name: self.name,
            description: self.description,
            is_active: self.is_active,
        })
    }
}

/// Delete a project and everything it owns.
#[derive(Debug, Clone)]
pub struct DeleteProject<'a> {
    /// The project to delete.
    pub project: &'a Project,
}

impl ApiRequest for DeleteProject<'_> {
    type Response = NoContent;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::NO_CONTENT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/project/{projectId}", &[self.project.id.as_deref()])
    }
}
