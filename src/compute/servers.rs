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

//! Server provisioning and decommissioning.
//!
//! # Examples
//!
//! ```rust,no_run
//! # async fn example(session: openstack_vm::Session) -> openstack_vm::Result<()> {
//! use std::time::Duration;
//!
//! use openstack_vm::compute::{self, ServerRequest};
//! use openstack_vm::SystemClock;
//!
//! let request = ServerRequest::new("vm1", "image-id", "flavor-id")
//!     .with_metadata("owner", "me");
//! let server = compute::create_server(&session, &SystemClock, request,
//!                                     Some(Duration::from_secs(300))).await?;
//! println!("Server {} is {}", server.id, server.status);
//!
//! compute::delete_server(&session, &server.id).await?;
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, trace};

use super::super::service::ComputeService;
use super::super::waiter::{self, Clock, Waiter};
use super::super::{Error, ErrorKind, Result};
use super::protocol::ServerStatus;

/// Key pair used when none is requested explicitly.
pub const DEFAULT_KEY_NAME: &str = "default";

/// Security group used when none is requested explicitly.
pub const DEFAULT_SECURITY_GROUP: &str = "default";

/// Delay between two checks of a server being built.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

const UNKNOWN_FAULT: &str = "Unable to create server. Error cause not reported by OpenStack.";

/// A request to create a server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerRequest {
    /// Name of the new server.
    pub name: String,
    /// ID of the image to boot from.
    pub image_id: String,
    /// ID of the flavor to use.
    pub flavor_id: String,
    /// Metadata to attach to the server.
    pub metadata: HashMap<String, String>,
    /// Name of the key pair to inject.
    pub key_name: Option<String>,
    /// Names of the security groups to put the server into.
    pub security_groups: Vec<String>,
}

/// Explanation of why a server ended up in the ERROR state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerFault {
    /// Human-readable message.
    pub message: String,
    /// Error code (if reported).
    pub code: Option<u64>,
}

/// A snapshot of a server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerRecord {
    /// Unique ID.
    pub id: String,
    /// Server name (if reported).
    pub name: Option<String>,
    /// Server status.
    pub status: ServerStatus,
    /// Fault details, only present for failed servers.
    pub fault: Option<ServerFault>,
}

impl ServerRequest {
    /// Start a request with the default key pair and security group.
    pub fn new<S1, S2, S3>(name: S1, image_id: S2, flavor_id: S3) -> ServerRequest
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        ServerRequest {
            name: name.into(),
            image_id: image_id.into(),
            flavor_id: flavor_id.into(),
            metadata: HashMap::new(),
            key_name: Some(DEFAULT_KEY_NAME.to_string()),
            security_groups: vec![DEFAULT_SECURITY_GROUP.to_string()],
        }
    }

    /// Add a metadata item.
    pub fn with_metadata<K, V>(mut self, key: K, value: V) -> ServerRequest
    where
        K: Into<String>,
        V: Into<String>,
    {
        let _ = self.metadata.insert(key.into(), value.into());
        self
    }

    /// Use a different key pair (or none at all).
    #[inline]
    pub fn with_key_name<S: Into<String>>(mut self, key_name: Option<S>) -> ServerRequest {
        self.key_name = key_name.map(Into::into);
        self
    }

    /// Replace the list of security groups.
    #[inline]
    pub fn with_security_groups<I, S>(mut self, groups: I) -> ServerRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.security_groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

impl ServerRecord {
    /// Message explaining the failure of this server.
    ///
    /// Falls back to a generic message when no structured fault is available.
    pub fn fault_message(&self) -> &str {
        self.fault
            .as_ref()
            .map(|fault| fault.message.as_str())
            .unwrap_or(UNKNOWN_FAULT)
    }
}

/// Waiter for a server to become active.
#[derive(Debug)]
pub struct ServerCreationWaiter<'c, C: ?Sized> {
    compute: &'c C,
    id: String,
    timeout: Option<Duration>,
    delay: Duration,
    fetches: usize,
}

impl<'c, C: ComputeService + ?Sized> ServerCreationWaiter<'c, C> {
    /// Create a waiter for the given server ID.
    ///
    /// A zero `timeout` is the same as no time out.
    pub fn new<S: Into<String>>(compute: &'c C, id: S, timeout: Option<Duration>) -> Self {
        ServerCreationWaiter {
            compute,
            id: id.into(),
            timeout: timeout.filter(|value| !value.is_zero()),
            delay: POLL_INTERVAL,
            fetches: 0,
        }
    }

    /// Use a different delay between two checks.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl<'c, C: ComputeService + ?Sized> Waiter<ServerRecord> for ServerCreationWaiter<'c, C> {
    fn wait_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn delay(&self) -> Duration {
        self.delay
    }

    fn timeout_error(&self, elapsed: Duration) -> Error {
        Error::new_timeout(
            format!(
                "Timeout waiting for server to become active ({:.2} sec)",
                elapsed.as_secs_f64()
            ),
            elapsed,
        )
    }

    async fn poll(&mut self) -> Result<Option<ServerRecord>> {
        let record = self.compute.get_server(&self.id).await?;
        self.fetches += 1;
        match record.status {
            ServerStatus::Active => {
                debug!("Server {} is active after {} check(s)", self.id, self.fetches);
                Ok(Some(record))
            }
            ServerStatus::Error => {
                debug!("Server {} failed: {:?}", self.id, record.fault);
                Err(Error::new(ErrorKind::OperationFailed, record.fault_message()))
            }
            other => {
                trace!("Server {} is still {}", self.id, other);
                Ok(None)
            }
        }
    }
}

/// Create a server and wait for it to become active.
///
/// Without a `timeout` (or with a zero one) this call waits as long as it takes. On failure the
/// server is left as is, it is not cleaned up.
pub async fn create_server<C, K>(
    compute: &C,
    clock: &K,
    request: ServerRequest,
    timeout: Option<Duration>,
) -> Result<ServerRecord>
where
    C: ComputeService + ?Sized,
    K: Clock + ?Sized,
{
    debug!("Requesting a new server {:?}", request);
    let created = compute.create_server(&request).await?;
    info!("Waiting for server {} to become active", created.id);
    waiter::wait(ServerCreationWaiter::new(compute, created.id, timeout), clock).await
}

/// Request deletion of a server.
///
/// Fails with `ResourceNotFound` without requesting anything if the server
/// does not exist. Does not wait for the deletion to finish.
pub async fn delete_server<C: ComputeService + ?Sized>(compute: &C, id: &str) -> Result<()> {
    let server = compute.get_server(id).await?;
    debug!("Deleting server {} in status {}", server.id, server.status);
    compute.delete_server(&server.id).await?;
    info!("Requested deletion of server {}", server.id);
    Ok(())
}
