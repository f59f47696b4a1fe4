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

//! JSON structures and protocol bits for the Image API.

#![allow(missing_docs)]

use chrono::{DateTime, FixedOffset};
use serde_derive::Deserialize;

use super::super::catalog::CatalogEntry;
use super::super::pagination::{Page, ResourceId};

/// An image.
///
/// Only the fields used by this crate are parsed.
#[derive(Clone, Debug, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ImagesRoot {
    pub images: Vec<Image>,
    #[serde(default)]
    pub next: Option<String>,
}

impl ResourceId for Image {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

impl From<ImagesRoot> for Page<Image> {
    fn from(value: ImagesRoot) -> Page<Image> {
        Page {
            has_next: value.next.is_some(),
            items: value.images,
        }
    }
}

impl From<Image> for CatalogEntry {
    fn from(value: Image) -> CatalogEntry {
        CatalogEntry {
            id: value.id,
            name: value.name.unwrap_or_default(),
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::DateTime;
    use serde_json::json;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::super::super::catalog::CatalogEntry;
    use super::super::super::pagination::{fetch_all, Page};
    use super::ImagesRoot;

    #[test]
    fn test_images_page() {
        let root: ImagesRoot = serde_json::from_value(json!({
            "images": [
                {
                    "id": "img-1",
                    "name": "ubuntu-22.04",
                    "status": "active",
                    "visibility": "public",
                    "updated_at": "2024-01-01T00:00:00Z"
                },
                {
                    "id": "img-2",
                    "name": null,
                    "status": "queued",
                    "updated_at": "2024-02-01T10:20:30Z"
                }
            ],
            "first": "/v2/images",
            "next": "/v2/images?marker=img-2",
            "schema": "/v2/schemas/images"
        }))
        .unwrap();
        assert_eq!(root.next.as_deref(), Some("/v2/images?marker=img-2"));

        let entries: Vec<CatalogEntry> = root.images.into_iter().map(From::from).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "img-1");
        assert_eq!(entries[0].name, "ubuntu-22.04");
        assert_eq!(
            entries[0].updated_at,
            Some(DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap())
        );
        assert_eq!(entries[1].name, "");
    }

    #[test]
    fn test_images_last_page() {
        let root: ImagesRoot = serde_json::from_value(json!({
            "images": [],
            "first": "/v2/images"
        }))
        .unwrap();
        assert!(root.images.is_empty());
        assert!(root.next.is_none());
    }

    #[tokio::test]
    async fn test_images_all_pages() {
        let pages: VecDeque<ImagesRoot> = vec![
            json!({
                "images": [{"id": "img-1", "name": "cirros"}, {"id": "img-2", "name": "fedora"}],
                "next": "/v2/images?marker=img-2&limit=2"
            }),
            json!({
                "images": [{"id": "img-3", "name": "ubuntu-22.04"}],
                "first": "/v2/images"
            }),
        ]
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap())
        .collect();
        let pages = Mutex::new(pages);
        let markers = Mutex::new(Vec::new());

        let images = fetch_all(|query| {
            markers.lock().unwrap().push(
                query
                    .iter()
                    .find(|(key, _)| *key == "marker")
                    .map(|(_, value)| value.clone()),
            );
            let root = pages.lock().unwrap().pop_front().unwrap();
            async move { Ok(Page::from(root)) }
        })
        .await
        .unwrap();

        let names: Vec<_> = images.iter().filter_map(|image| image.name.clone()).collect();
        assert_eq!(names, vec!["cirros", "fedora", "ubuntu-22.04"]);
        assert_eq!(
            markers.into_inner().unwrap(),
            vec![None, Some("img-2".to_string())]
        );
    }
}
