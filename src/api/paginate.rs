use serde::{Deserialize, Serialize};

use super::{ApiRequest, Collection};

/// Metadata attached to a response envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Meta {
    /// Page bookkeeping, present on list responses.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Page bookkeeping for a list response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Pagination {
    /// The number of resources across all pages.
    pub total: u32,
    /// The number of resources in this page.
    pub count: u32,
    /// The page size.
    pub per_page: u32,
    /// This page's number, starting at 1.
    pub current_page: u32,
    /// The number of pages.
    pub total_pages: u32,
    /// Navigation links. Opaque to the client.
    #[serde(default)]
    pub links: Option<serde_json::Value>,
}

impl Pagination {
    /// The number of the following page, if there is one.
    pub fn next_page(&self) -> Option<u32> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }
}

/// Implemented by list operations, which can be re-issued for another page.
pub trait ApiListRequest: ApiRequest + Clone {
    /// Return the same request, targeting the given page.
    fn with_page(self, page: u32) -> Self;
}

struct Paginator<F, R, T> {
    base_req: R,
    fetch_page: F,
    batch: std::vec::IntoIter<T>,
    next_page: Option<u32>,
    off: usize,
    limit: Option<usize>,
}

impl<F, E, R, T> Iterator for Paginator<F, R, T>
where
    F: Fn(R) -> Result<Collection<T>, E>,
    R: ApiListRequest,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|l| self.off >= l) {
            return None;
        }

        loop {
            if let Some(v) = self.batch.next() {
                self.off += 1;
                return Some(Ok(v));
            }

            // Empty pages are skipped, not treated as the end.
            let page = self.next_page.take()?;
            let page_req = self.base_req.clone().with_page(page);

            let collection = match (self.fetch_page)(page_req) {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };

            // Page numbers must advance.
            self.next_page = collection.next_page().filter(|&next| next > page);
            self.batch = collection.data.into_iter();
        }
    }
}

/// Repeatedly make a list request, fetching the following page by calling
/// `fetch_page` until the server reports no more pages or `limit` items have
/// been yielded. Items keep server order.
pub fn paginate<F, E, R, T>(
    base_req: R,
    limit: Option<usize>,
    fetch_page: F,
) -> Result<impl Iterator<Item = Result<T, E>>, E>
where
    F: Fn(R) -> Result<Collection<T>, E>,
    R: ApiListRequest,
{
    let first = fetch_page(base_req.clone())?;

    Ok(Paginator {
        next_page: first.next_page(),
        batch: first.data.into_iter(),
        fetch_page,
        base_req,
        off: 0,
        limit,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ApiError, ListOptions,
        api::testutil::{StubTransport, client},
        user::{GetUsers, User},
    };

    fn page(ids: &[&str], current: u32, total_pages: u32) -> String {
        let data: Vec<_> = ids.iter().map(|id| serde_json::json!({"id": id})).collect();
        serde_json::json!({
            "data": data,
            "meta": {"pagination": {
                "total": 5,
                "count": ids.len(),
                "per_page": 2,
                "current_page": current,
                "total_pages": total_pages,
                "links": {}
            }}
        })
        .to_string()
    }

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().filter_map(|u| u.id.as_deref()).collect()
    }

    #[test]
    fn walks_all_pages_in_order() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(200, page(&["a", "b"], 1, 3))
            .respond(200, page(&["c", "d"], 2, 3))
            .respond(200, page(&["e"], 3, 3));
        let client = client(&stub);

        let req = GetUsers {
            list: ListOptions::new().limit(2),
        };
        let users = paginate(req, None, |r| client.roundtrip(r))?
            .collect::<Result<Vec<_>, ApiError>>()?;

        assert_eq!(ids(&users), ["a", "b", "c", "d", "e"]);

        let requests = stub.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].query().get("page"), None);
        assert_eq!(requests[1].query()["page"], "2");
        assert_eq!(requests[2].query()["page"], "3");
        assert!(requests.iter().all(|r| r.query()["limit"] == "2"));

        Ok(())
    }

    #[test]
    fn stops_at_limit() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(200, page(&["a", "b"], 1, 3))
            .respond(200, page(&["c", "d"], 2, 3));
        let client = client(&stub);

        let users = paginate(GetUsers::default(), Some(3), |r| client.roundtrip(r))?
            .collect::<Result<Vec<_>, ApiError>>()?;

        assert_eq!(ids(&users), ["a", "b", "c"]);
        assert_eq!(stub.requests().len(), 2);

        Ok(())
    }

    #[test]
    fn continues_past_an_empty_page() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(200, page(&["a"], 1, 3))
            .respond(200, page(&[], 2, 3))
            .respond(200, page(&["c"], 3, 3));
        let client = client(&stub);

        let users = paginate(GetUsers::default(), None, |r| client.roundtrip(r))?
            .collect::<Result<Vec<_>, ApiError>>()?;

        assert_eq!(ids(&users), ["a", "c"]);

        let requests = stub.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].query()["page"], "3");

        Ok(())
    }

    #[test]
    fn stops_when_the_server_repeats_a_page() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(200, page(&["a"], 1, 3))
            .respond(200, page(&[], 1, 3));
        let client = client(&stub);

        let users = paginate(GetUsers::default(), None, |r| client.roundtrip(r))?
            .collect::<Result<Vec<_>, ApiError>>()?;

        assert_eq!(ids(&users), ["a"]);
        assert_eq!(stub.requests().len(), 2);

        Ok(())
    }

    #[test]
    fn stops_without_pagination_metadata() -> anyhow::Result<()> {
        let stub = StubTransport::new().respond(200, r#"{"data":[{"id":"a"}]}"#);
        let client = client(&stub);

        let users = paginate(GetUsers::default(), None, |r| client.roundtrip(r))?
            .collect::<Result<Vec<_>, ApiError>>()?;

        assert_eq!(ids(&users), ["a"]);
        assert_eq!(stub.requests().len(), 1);

        Ok(())
    }

    #[test]
    fn surfaces_errors_from_later_pages() -> anyhow::Result<()> {
        let stub = StubTransport::new()
            .respond(200, page(&["a"], 1, 2))
            .respond(500, r#"{"message":"boom"}"#);
        let client = client(&stub);

        let mut users = paginate(GetUsers::default(), None, |r| client.roundtrip(r))?;
        assert!(users.next().is_some_and(|r| r.is_ok()));
        assert!(users.next().is_some_and(|r| r.is_err()));

        Ok(())
    }

    #[test]
    fn next_page() {
        let mut p = Pagination {
            current_page: 1,
            total_pages: 2,
            ..Default::default()
        };
        assert_eq!(p.next_page(), Some(2));

        p.current_page = 2;
        assert_eq!(p.next_page(), None);
    }
}
