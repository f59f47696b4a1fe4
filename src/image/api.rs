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

//! Foundation bits exposing the Image API.

use async_trait::async_trait;
use log::{debug, trace};
use osauth::services::IMAGE;

use super::super::catalog::CatalogEntry;
use super::super::pagination::{fetch_all, Page};
use super::super::service::ImageCatalogService;
use super::super::session::Session;
use super::super::{Error, Result};
use super::protocol::*;

/// List all images, following pagination.
pub async fn list_images(session: &osauth::Session) -> Result<Vec<Image>> {
    let images = fetch_all(|query| async move {
        let root: ImagesRoot = session.get(IMAGE, &["images"]).query(&query).fetch().await?;
        trace!("Received images: {:?}", root.images);
        Ok::<_, Error>(Page::from(root))
    })
    .await?;
    debug!("Listed {} image(s)", images.len());
    Ok(images)
}

#[async_trait]
impl ImageCatalogService for Session {
    async fn list_images(&self) -> Result<Vec<CatalogEntry>> {
        let images = list_images(self.inner()).await?;
        Ok(images.into_iter().map(From::from).collect())
    }
}
