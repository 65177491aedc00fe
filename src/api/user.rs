//! API operations concerning users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Collection, Include, Item, ListOptions, MissingIdentifier, NoContent, Param,
    api::{ApiListRequest, ApiRequest, IncludeQuery, Resource, resolve_path},
    project::Project,
};

/// A user account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct User {
    /// The user ID.
    pub id: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// The login email address.
    pub email: Option<String>,
    /// Whether the user can administer every project.
    pub is_admin: Option<bool>,
    /// When the email address was verified.
    pub email_verified_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the user was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// The user's projects. Only present with `include=projects`.
    pub projects: Option<Collection<Project>>,
}

impl Resource for User {}

impl User {
    /// A handle to the user with the given ID, for use as a request target.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// List users.
#[derive(Default, Debug, Clone)]
pub struct GetUsers<'a> {
    /// Filtering, paging and eager-loading options.
    pub list: ListOptions<'a>,
}

impl ApiRequest for GetUsers<'_> {
    type Response = Collection<User>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        Ok("/api/user".to_string())
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(&self.list)
    }
}

impl ApiListRequest for GetUsers<'_> {
    fn with_page(self, page: u32) -> Self {
        Self {
            list: self.list.page(page),
        }
    }
}

/// Fetch a single user.
#[derive(Debug, Clone)]
pub struct GetUser<'a> {
    /// The user to fetch.
    pub user: &'a User,
    /// Related resources to eager-load.
    pub include: Param<Include<'a>>,
}

impl ApiRequest for GetUser<'_> {
    type Response = Item<User>;

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/user/{userId}", &[self.user.id.as_deref()])
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(IncludeQuery::new(self.include))
    }
}

/// Create a user.
#[derive(Debug, Clone)]
pub struct CreateUser<'a> {
    /// The display name.
    pub name: &'a str,
    /// The login email address.
    pub email: &'a str,
    /// The initial password.
    pub password: &'a str,
    /// Whether the user can administer every project.
    pub is_admin: Param<bool>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateUserBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Param::is_unset")]
    is_admin: Param<bool>,
}

impl ApiRequest for CreateUser<'_> {
    type Response = Item<User>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::CREATED
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        Ok("/api/user".to_string())
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(CreateUserBody {
            name: self.name,
            email: self.email,
            password: self.password,
            is_admin: self.is_admin,
        })
    }
}

/// Update a user. Unset fields are left unchanged on the server.
#[derive(Debug, Clone)]
pub struct UpdateUser<'a> {
    /// The user to update.
    pub user: &'a User,
    /// The new display name.
    pub name: Param<&'a str>,
    /// The new login email address.
    pub email: Param<&'a str>,
    /// The new password.
    pub password: Param<&'a str>,
    /// Whether the user can administer every project.
    pub is_admin: Param<bool>,
}

impl<'a> UpdateUser<'a> {
    /// An update of `user` with every field unset.
    pub fn new(user: &'a User) -> Self {
        Self {
            user,
            name: Param::Unset,
            email: Param::Unset,
            password: Param::Unset,
            is_admin: Param::Unset,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UpdateUserBody<'a> {
    #[serde(skip_serializing_if = "Param::is_unset")]
    name: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    email: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    password: Param<&'a str>,
    #[serde(skip_serializing_if = "Param::is_unset")]
    is_admin: Param<bool>,
}

impl ApiRequest for UpdateUser<'_> {
    type Response = Item<User>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/user/{userId}", &[self.user.id.as_deref()])
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(UpdateUserBody {
            name: self.name,
            email: self.email,
            password: self.password,
            is_admin: self.is_admin,
        })
    }
}

/// Delete a user.
#[derive(Debug, Clone)]
pub struct DeleteUser<'a> {
    /// The user to delete.
    pub user: &'a User,
}

impl ApiRequest for DeleteUser<'_> {
    type Response = NoContent;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::NO_CONTENT
    }

    fn path(&self) -> Result<String, MissingIdentifier> {
        resolve_path("/api/user/{userId}", &[self.user.id.as_deref()])
    }
}
