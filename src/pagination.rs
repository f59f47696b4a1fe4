// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Marker-based pagination shared by listings.

use std::future::Future;

use log::trace;

use super::Result;

/// Number of items requested per page.
pub(crate) const PAGE_SIZE: usize = 100;

/// Query parameters of one page request.
pub(crate) type PageQuery = Vec<(&'static str, String)>;

/// A resource that can serve as a pagination marker.
pub(crate) trait ResourceId {
    /// Unique ID of the resource.
    fn resource_id(&self) -> &str;
}

/// One page of a listing.
#[derive(Debug)]
pub(crate) struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Whether the server reported more pages.
    pub has_next: bool,
}

fn page_query(marker: Option<String>) -> PageQuery {
    let mut query = vec![("limit", PAGE_SIZE.to_string())];
    if let Some(value) = marker {
        query.push(("marker", value));
    }
    query
}

/// Fetch pages until the server reports no more of them.
///
/// The marker of each request is the ID of the last item of the previous
/// page. An empty page stops the listing even if a next page is reported.
pub(crate) async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    T: ResourceId,
    F: FnMut(PageQuery) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut result = Vec::new();
    let mut marker: Option<String> = None;
    loop {
        let query = page_query(marker.take());
        trace!("Requesting a page with {:?}", query);
        let page = fetch_page(query).await?;
        marker = page.items.last().map(|item| item.resource_id().to_string());
        result.extend(page.items);
        if !page.has_next || marker.is_none() {
            return Ok(result);
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::super::{Error, ErrorKind};
    use super::{fetch_all, Page, PageQuery, ResourceId};

    #[derive(Debug, PartialEq)]
    struct Item(&'static str);

    impl ResourceId for Item {
        fn resource_id(&self) -> &str {
            self.0
        }
    }

    fn page(ids: &[&'static str], has_next: bool) -> Page<Item> {
        Page {
            items: ids.iter().copied().map(Item).collect(),
            has_next,
        }
    }

    fn markers(queries: &[PageQuery]) -> Vec<Option<String>> {
        queries
            .iter()
            .map(|query| {
                query
                    .iter()
                    .find(|(key, _)| *key == "marker")
                    .map(|(_, value)| value.clone())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_follows_markers() {
        let pages = Mutex::new(VecDeque::from(vec![
            page(&["1", "2"], true),
            page(&["3", "4"], true),
            page(&["5"], false),
        ]));
        let queries = Mutex::new(Vec::new());
        let items = fetch_all(|query| {
            queries.lock().unwrap().push(query);
            let next = pages.lock().unwrap().pop_front();
            async move { Ok(next.unwrap()) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 5);
        assert_eq!(items[4], Item("5"));
        let queries = queries.into_inner().unwrap();
        assert_eq!(
            markers(&queries),
            vec![None, Some("2".to_string()), Some("4".to_string())]
        );
        assert!(queries
            .iter()
            .all(|query| query.contains(&("limit", "100".to_string()))));
    }

    #[tokio::test]
    async fn test_single_page() {
        let mut calls = 0;
        let items = fetch_all(|_| {
            calls += 1;
            async { Ok(page(&["1", "2"], false)) }
        })
        .await
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_empty_last_page_stops() {
        let pages = Mutex::new(VecDeque::from(vec![page(&["1"], true), page(&[], true)]));
        let mut calls = 0;
        let items = fetch_all(|_| {
            calls += 1;
            let next = pages.lock().unwrap().pop_front();
            async move { Ok(next.unwrap()) }
        })
        .await
        .unwrap();
        assert_eq!(items, vec![Item("1")]);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_error_is_propagated() {
        let err = fetch_all::<Item, _, _>(|_| async {
            Err(Error::new(ErrorKind::ProtocolError, "boom"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolError);
    }
}
