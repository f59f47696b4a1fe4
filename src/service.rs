// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Services the workflows depend on.
//!
//! Both traits are implemented for [Session](../struct.Session.html), talking
//! to the Image API v2 and the Compute API v2.1 respectively. Any other
//! implementation (e.g. an in-memory one for testing) can be plugged into the
//! workflows instead.

use async_trait::async_trait;

use super::catalog::CatalogEntry;
use super::compute::{ServerRecord, ServerRequest};
use super::Result;

/// Access to the image catalog.
#[async_trait]
pub trait ImageCatalogService: Send + Sync {
    /// List all images visible in the current project.
    async fn list_images(&self) -> Result<Vec<CatalogEntry>>;
}

/// Access to flavors and servers.
#[async_trait]
pub trait ComputeService: Send + Sync {
    /// List all flavors visible in the current project.
    async fn list_flavors(&self) -> Result<Vec<CatalogEntry>>;

    /// Request a new server.
    ///
    /// Returns as soon as the request is accepted, long before the server
    /// becomes active.
    async fn create_server(&self, request: &ServerRequest) -> Result<ServerRecord>;

    /// Fetch the current state of a server.
    ///
    /// Fails with `ResourceNotFound` if there is no such server.
    async fn get_server(&self, id: &str) -> Result<ServerRecord>;

    /// Request deletion of a server.
    async fn delete_server(&self, id: &str) -> Result<()>;
}
