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

//! Compute API support.
//!
//! Currently supported functionality:
//!
//! * listing flavors (via [catalog](../catalog/index.html))
//! * [creating](fn.create_server.html) a server and waiting for it
//! * [deleting](fn.delete_server.html) a server

mod api;
mod protocol;
mod servers;

pub use self::protocol::ServerStatus;
pub use self::servers::{
    create_server, delete_server, ServerCreationWaiter, ServerFault, ServerRecord, ServerRequest,
    DEFAULT_KEY_NAME, DEFAULT_SECURITY_GROUP, POLL_INTERVAL,
};
