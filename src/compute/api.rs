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

//! Foundation bits exposing the Compute API.

use async_trait::async_trait;
use log::{debug, trace};
use osauth::services::COMPUTE;

use super::super::catalog::CatalogEntry;
use super::super::pagination::{fetch_all, Page};
use super::super::service::ComputeService;
use super::super::session::Session;
use super::super::{Error, Result};
use super::protocol::*;
use super::servers::{ServerRecord, ServerRequest};

/// List all flavors with details, following pagination.
pub async fn list_flavors(session: &osauth::Session) -> Result<Vec<Flavor>> {
    let flavors = fetch_all(|query| async move {
        let root: FlavorsDetailRoot = session
            .get(COMPUTE, &["flavors", "detail"])
            .query(&query)
            .fetch()
            .await?;
        trace!("Received flavors: {:?}", root.flavors);
        Ok::<_, Error>(Page::from(root))
    })
    .await?;
    debug!("Listed {} flavor(s)", flavors.len());
    Ok(flavors)
}

/// Create a server.
pub async fn create_server(session: &osauth::Session, request: ServerCreateRoot) -> Result<Server> {
    debug!("Creating a server with {:?}", request);
    let root: ServerRoot = session
        .post(COMPUTE, &["servers"])
        .json(&request)
        .fetch()
        .await?;
    trace!("Requested creation of server {:?}", root.server);
    Ok(root.server)
}

/// Get a server.
pub async fn get_server<S: AsRef<str>>(session: &osauth::Session, id: S) -> Result<Server> {
    trace!("Fetching server {}", id.as_ref());
    let root: ServerRoot = session
        .get(COMPUTE, &["servers", id.as_ref()])
        .fetch()
        .await?;
    trace!("Received {:?}", root.server);
    Ok(root.server)
}

/// Delete a server.
pub async fn delete_server<S: AsRef<str>>(session: &osauth::Session, id: S) -> Result<()> {
    debug!("Deleting server {}", id.as_ref());
    let _ = session
        .delete(COMPUTE, &["servers", id.as_ref()])
        .send()
        .await?;
    debug!("Server {} was scheduled for deletion", id.as_ref());
    Ok(())
}

#[async_trait]
impl ComputeService for Session {
    async fn list_flavors(&self) -> Result<Vec<CatalogEntry>> {
        let flavors = list_flavors(self.inner()).await?;
        Ok(flavors.into_iter().map(From::from).collect())
    }

    async fn create_server(&self, request: &ServerRequest) -> Result<ServerRecord> {
        create_server(self.inner(), ServerCreateRoot::from(request))
            .await
            .map(From::from)
    }

    async fn get_server(&self, id: &str) -> Result<ServerRecord> {
        get_server(self.inner(), id).await.map(From::from)
    }

    async fn delete_server(&self, id: &str) -> Result<()> {
        delete_server(self.inner(), id).await
    }
}
