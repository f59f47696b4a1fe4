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

//! Virtual machine lifecycle on OpenStack.
//!
//! Authenticate against Keystone with a [Session](struct.Session.html), look
//! up images and flavors with the [catalog](catalog/index.html) helpers, then
//! [create](compute/fn.create_server.html) or
//! [delete](compute/fn.delete_server.html) servers.
//!
//! All workflows are written against the
//! [ImageCatalogService](trait.ImageCatalogService.html) and
//! [ComputeService](trait.ComputeService.html) traits, with time going
//! through a [Clock](trait.Clock.html).
//!
//! # Examples
//!
//! ```rust,no_run
//! # async fn example() -> openstack_vm::Result<()> {
//! use std::time::Duration;
//!
//! use openstack_vm::compute::{self, ServerRequest};
//! use openstack_vm::{catalog, Credentials, Session, SystemClock, TransportConfig};
//!
//! let creds = Credentials::new("https://cloud.example.com/identity",
//!                              "user1", "pa$$word", "project1");
//! let session = Session::establish(&creds, TransportConfig::default()).await?;
//!
//! let images = catalog::list_images(&session).await?;
//! let flavors = catalog::list_flavors(&session).await?;
//! let image = catalog::resolve_by_name(&images, "ubuntu-22.04").expect("no image");
//! let flavor = catalog::resolve_by_name(&flavors, "m1.small").expect("no flavor");
//!
//! let request = ServerRequest::new("vm1", image.id.clone(), flavor.id.clone());
//! let server = compute::create_server(&session, &SystemClock, request,
//!                                     Some(Duration::from_secs(600))).await?;
//! println!("Created server {}", server.id);
//! # Ok(()) }
//! ```

#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    overflowing_literals,
    path_statements,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_import_braces,
    unused_parens,
    while_true
)]

pub mod catalog;
pub mod compute;
pub mod config;
mod error;
mod image;
mod pagination;
mod service;
mod session;
pub mod waiter;

pub use crate::catalog::CatalogEntry;
pub use crate::config::{CloudConfig, Credentials, TransportConfig};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::service::{ComputeService, ImageCatalogService};
pub use crate::session::{
    establish_session, Session, DEFAULT_PROJECT_DOMAIN_ID, DEFAULT_USER_DOMAIN_NAME,
};
pub use crate::waiter::{Clock, SystemClock};
