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

//! Image and flavor catalogs.
//!
//! # Examples
//!
//! ```rust,no_run
//! # async fn example() -> openstack_vm::Result<()> {
//! use openstack_vm::{catalog, Credentials, Session, TransportConfig};
//!
//! let creds = Credentials::new("https://cloud.example.com/identity",
//!                              "user1", "pa$$word", "project1");
//! let session = Session::establish(&creds, TransportConfig::default()).await?;
//! let images = catalog::list_images(&session).await?;
//! if let Some(image) = catalog::resolve_by_name(&images, "ubuntu-22.04") {
//!     println!("Found image {}", image.id);
//! }
//! # Ok(()) }
//! ```

use chrono::{DateTime, FixedOffset};
use log::debug;

use super::service::{ComputeService, ImageCatalogService};
use super::{Error, ErrorKind, Result};

/// A named resource from a catalog: an image or a flavor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Unique ID.
    pub id: String,
    /// Display name, not guaranteed to be unique (empty if not set).
    pub name: String,
    /// Last update date and time (not reported for flavors).
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl CatalogEntry {
    /// Create a new entry.
    pub fn new<S1, S2>(id: S1, name: S2, updated_at: Option<DateTime<FixedOffset>>) -> CatalogEntry
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        CatalogEntry {
            id: id.into(),
            name: name.into(),
            updated_at,
        }
    }
}

fn fetch_failed(what: &str, err: Error) -> Error {
    Error::new(
        ErrorKind::CatalogFetchFailed,
        format!("Cannot list {}: {}", what, err),
    )
}

/// List all images.
///
/// Any failure is reported as `CatalogFetchFailed`.
pub async fn list_images<S: ImageCatalogService + ?Sized>(service: &S) -> Result<Vec<CatalogEntry>> {
    let images = service
        .list_images()
        .await
        .map_err(|e| fetch_failed("images", e))?;
    debug!("Fetched {} image(s)", images.len());
    Ok(images)
}

/// List all flavors.
///
/// Any failure is reported as `CatalogFetchFailed`.
pub async fn list_flavors<S: ComputeService + ?Sized>(service: &S) -> Result<Vec<CatalogEntry>> {
    let flavors = service
        .list_flavors()
        .await
        .map_err(|e| fetch_failed("flavors", e))?;
    debug!("Fetched {} flavor(s)", flavors.len());
    Ok(flavors)
}

/// Find the first entry with exactly the given name.
///
/// Entries without a name never match.
pub fn resolve_by_name<'e>(entries: &'e [CatalogEntry], name: &str) -> Option<&'e CatalogEntry> {
    entries
        .iter()
        .find(|entry| !entry.name.is_empty() && entry.name == name)
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;
    use chrono::DateTime;

    use super::super::service::ImageCatalogService;
    use super::super::{Error, ErrorKind, Result};
    use super::{list_images, resolve_by_name, CatalogEntry};

    fn entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("1", "cirros", None),
            CatalogEntry::new("2", "fedora", None),
            CatalogEntry::new("3", "cirros", None),
        ]
    }

    struct BrokenCatalog;

    #[async_trait]
    impl ImageCatalogService for BrokenCatalog {
        async fn list_images(&self) -> Result<Vec<CatalogEntry>> {
            Err(Error::new(ErrorKind::AuthenticationFailed, "token expired"))
        }
    }

    #[test]
    fn test_resolve_unique() {
        let entries = entries();
        assert_eq!(resolve_by_name(&entries, "fedora").unwrap().id, "2");
    }

    #[test]
    fn test_resolve_first_wins() {
        let entries = entries();
        assert_eq!(resolve_by_name(&entries, "cirros").unwrap().id, "1");
    }

    #[test]
    fn test_resolve_missing() {
        let entries = entries();
        assert!(resolve_by_name(&entries, "centos").is_none());
        assert!(resolve_by_name(&entries, "Cirros").is_none());
        assert!(resolve_by_name(&[], "cirros").is_none());
    }

    #[test]
    fn test_resolve_skips_nameless() {
        let entries = vec![
            CatalogEntry::new("img-0", "", None),
            CatalogEntry::new("img-1", "cirros", None),
        ];
        assert!(resolve_by_name(&entries, "").is_none());
        assert_eq!(resolve_by_name(&entries, "cirros").unwrap().id, "img-1");
    }

    #[test]
    fn test_resolve_keeps_timestamp() {
        let updated = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let entries = vec![CatalogEntry::new("img-1", "ubuntu-22.04", Some(updated))];
        let found = resolve_by_name(&entries, "ubuntu-22.04").unwrap();
        assert_eq!(found.updated_at, Some(updated));
    }

    #[tokio::test]
    async fn test_list_failure_is_catalog_error() {
        let err = list_images(&BrokenCatalog).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CatalogFetchFailed);
        assert!(err.message().unwrap().contains("token expired"));
    }
}
