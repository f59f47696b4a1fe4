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

//! JSON structures and protocol bits for the Compute API.

#![allow(non_snake_case)]
#![allow(missing_docs)]

use std::collections::HashMap;

use log::warn;
use serde_derive::{Deserialize, Serialize};

use super::super::catalog::CatalogEntry;
use super::super::pagination::{Page, ResourceId};
use super::servers::{ServerFault, ServerRecord, ServerRequest};

osauth::protocol_enum! {
    #[doc = "Possible server statuses."]
    #[non_exhaustive]
    enum ServerStatus = Unknown {
        Active = "ACTIVE",
        Building = "BUILD",
        Deleted = "DELETED",
        Error = "ERROR",
        HardRebooting = "HARD_REBOOT",
        Migrating = "MIGRATING",
        Paused = "PAUSED",
        Rebooting = "REBOOT",
        Resizing = "RESIZE",
        RevertingResize = "REVERT_RESIZE",
        ShutOff = "SHUTOFF",
        Suspended = "SUSPENDED",
        Rescuing = "RESCUE",
        Shelved = "SHELVED",
        ShelvedOffloaded = "SHELVED_OFFLOADED",
        SoftDeleted = "SOFT_DELETED",
        Unknown = "UNKNOWN",
        UpdatingPassword = "PASSWORD",
        VerifyingResize = "VERIFY_RESIZE"
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Link {
    pub rel: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<ServerStatus>,
    #[serde(default)]
    pub fault: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerRoot {
    pub server: Server,
}

#[derive(Clone, Debug, Serialize)]
pub struct SecurityGroupName {
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ServerCreate {
    pub flavorRef: String,
    pub imageRef: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<SecurityGroupName>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ServerCreateRoot {
    pub server: ServerCreate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorsDetailRoot {
    pub flavors: Vec<Flavor>,
    #[serde(default)]
    pub flavors_links: Vec<Link>,
}

impl FlavorsDetailRoot {
    /// Whether the server reported that more flavors are available.
    pub fn has_next(&self) -> bool {
        self.flavors_links.iter().any(|link| link.rel == "next")
    }
}

impl ResourceId for Flavor {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

impl From<FlavorsDetailRoot> for Page<Flavor> {
    fn from(value: FlavorsDetailRoot) -> Page<Flavor> {
        Page {
            has_next: value.has_next(),
            items: value.flavors,
        }
    }
}

impl From<Flavor> for CatalogEntry {
    fn from(value: Flavor) -> CatalogEntry {
        CatalogEntry {
            id: value.id,
            name: value.name,
            updated_at: None,
        }
    }
}

impl<'r> From<&'r ServerRequest> for ServerCreateRoot {
    fn from(value: &'r ServerRequest) -> ServerCreateRoot {
        ServerCreateRoot {
            server: ServerCreate {
                flavorRef: value.flavor_id.clone(),
                imageRef: value.image_id.clone(),
                key_name: value.key_name.clone(),
                metadata: value.metadata.clone(),
                name: value.name.clone(),
                security_groups: value
                    .security_groups
                    .iter()
                    .map(|name| SecurityGroupName { name: name.clone() })
                    .collect(),
            },
        }
    }
}

/// Extract a fault from its raw representation.
///
/// Only a JSON object with a string `message` is recognized.
fn parse_fault(value: serde_json::Value) -> Option<ServerFault> {
    match value {
        serde_json::Value::Object(map) => match map.get("message") {
            Some(serde_json::Value::String(message)) => Some(ServerFault {
                message: message.clone(),
                code: map.get("code").and_then(|code| code.as_u64()),
            }),
            _ => {
                warn!("Fault without a message: {:?}", map);
                None
            }
        },
        serde_json::Value::Null => None,
        other => {
            warn!("Unexpected fault format: {}", other);
            None
        }
    }
}

impl From<Server> for ServerRecord {
    fn from(value: Server) -> ServerRecord {
        // Creation responses carry no status.
        let status = value.status.unwrap_or(ServerStatus::Building);
        // Nova keeps the last fault around, e.g. after a failed resize.
        let fault = if status == ServerStatus::Error {
            value.fault.and_then(parse_fault)
        } else {
            None
        };
        ServerRecord {
            id: value.id,
            name: value.name,
            status,
            fault,
        }
    }
}
