//! Optional request parameters and the options shared by list operations.

use std::fmt;

use serde::{Serialize, Serializer};

/// An optional request parameter.
///
/// [Param::Unset] keeps the parameter off the wire entirely, while
/// [Param::Null] sends it with an empty value (clearing it on the server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param<T> {
    /// Omit the parameter.
    Unset,
    /// Send the parameter with an empty value.
    Null,
    /// Send the parameter with the given value.
    Value(T),
}

impl<T> Default for Param<T> {
    fn default() -> Self {
        Param::Unset
    }
}

impl<T> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Param::Value(value)
    }
}

impl<T> Param<T> {
    /// Whether the parameter will be omitted.
    pub fn is_unset(&self) -> bool {
        matches!(self, Param::Unset)
    }

    /// The value, if one is set.
    pub fn value(&self) -> Option<&T> {
        match self {
            Param::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for Param<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Param::Value(v) => v.serialize(serializer),
            Param::Null => serializer.serialize_str(""),
            Param::Unset => serializer.serialize_none(),
        }
    }
}

/// Related resources to eager-load, sent comma-joined as `include`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Include<'a>(pub &'a [&'a str]);

impl Serialize for Include<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.join(","))
    }
}

/// The direction of an [OrderBy].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// A sort order, sent as `order_by={field},{asc|desc}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy<'a> {
    /// The field to sort by.
    pub field: &'a str,
    /// The sort direction.
    pub direction: Direction,
}

impl<'a> OrderBy<'a> {
    /// Sort ascending by `field`.
    pub fn asc(field: &'a str) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    /// Sort descending by `field`.
    pub fn desc(field: &'a str) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

impl fmt::Display for OrderBy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };

        write!(f, "{},{direction}", self.field)
    }
}

impl Serialize for OrderBy<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Query parameters accepted by every list operation.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListOptions<'a> {
    /// Related resources to eager-load.
    #[serde(skip_serializing_if = "Param::is_unset")]
    pub include: Param<Include<'a>>,

    /// Free-text filter.
    #[serde(skip_serializing_if = "Param::is_unset")]
    pub search: Param<&'a str>,

    /// The page to fetch, starting at 1.
    #[serde(skip_serializing_if = "Param::is_unset")]
    pub page: Param<u32>,

    /// The page size.
    #[serde(skip_serializing_if = "Param::is_unset")]
    pub limit: Param<u32>,

    /// The sort order.
    #[serde(skip_serializing_if = "Param::is_unset")]
    pub order_by: Param<OrderBy<'a>>,
}

impl<'a> ListOptions<'a> {
    /// Options with every parameter unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Eager-load the given relations.
    pub fn include(mut self, relations: &'a [&'a str]) -> Self {
        self.include = Param::Value(Include(relations));
        self
    }

    /// Filter by free text.
    pub fn search(mut self, search: &'a str) -> Self {
        self.search = Param::Value(search);
        self
    }

    /// Fetch the given page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Param::Value(page);
        self
    }

    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Param::Value(limit);
        self
    }

    /// Sort the results.
    pub fn order_by(mut self, order_by: OrderBy<'a>) -> Self {
        self.order_by = Param::Value(order_by);
        self
    }
}

/// The query of single-resource reads, which only accept `include`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct IncludeQuery<'a> {
    #[serde(skip_serializing_if = "Param::is_unset")]
    pub(crate) include: Param<Include<'a>>,
}

impl<'a> IncludeQuery<'a> {
    pub(crate) fn new(include: Param<Include<'a>>) -> Self {
        Self { include }
    }
}
