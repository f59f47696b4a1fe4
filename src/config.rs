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

//! Credentials, transport options and support for the `clouds.yaml` file.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use serde_derive::Deserialize;

use super::{Error, ErrorKind, Result};

/// Credentials used to establish a session.
///
/// All fields are required to be non-empty.
#[derive(Clone)]
pub struct Credentials {
    /// URL of the identity service.
    pub auth_url: String,
    /// User name.
    pub username: String,
    /// User password.
    pub password: String,
    /// Name of the project to scope the session to.
    pub project_name: String,
}

/// Transport options for the HTTP client.
///
/// Certificate verification is disabled by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportConfig {
    /// Whether to validate TLS certificates of the cloud.
    pub verify_certificates: bool,
    /// Time out for each individual HTTP request.
    pub request_timeout: Option<Duration>,
}

/// Cloud settings loaded from a configuration file.
#[derive(Clone, Debug)]
pub struct CloudConfig {
    /// Credentials of the cloud.
    pub credentials: Credentials,
    /// Transport options of the cloud.
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct Auth {
    auth_url: String,
    password: String,
    project_name: String,
    username: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Cloud {
    auth: Auth,
    #[serde(default)]
    verify: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct Root {
    clouds: HashMap<String, Cloud>,
}

impl Credentials {
    /// Create credentials.
    pub fn new<U, S1, S2, S3>(auth_url: U, username: S1, password: S2, project_name: S3) -> Credentials
    where
        U: Into<String>,
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Credentials {
            auth_url: auth_url.into(),
            username: username.into(),
            password: password.into(),
            project_name: project_name.into(),
        }
    }

    /// Make sure that none of the fields is empty.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("auth URL", &self.auth_url),
            ("username", &self.username),
            ("password", &self.password),
            ("project name", &self.project_name),
        ];
        for (field, value) in fields.iter() {
            if value.trim().is_empty() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("The {} must not be empty", field),
                ));
            }
        }
        Ok(())
    }
}

impl ::std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("project_name", &self.project_name)
            .finish()
    }
}

impl TransportConfig {
    /// Enable or disable certificate verification.
    #[inline]
    pub fn with_certificate_verification(mut self, verify: bool) -> TransportConfig {
        self.verify_certificates = verify;
        self
    }

    /// Set a time out for each HTTP request.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> TransportConfig {
        self.request_timeout = Some(timeout);
        self
    }
}

fn find_config() -> Option<PathBuf> {
    let current = Path::new("./clouds.yaml");
    if current.is_file() {
        match current.canonicalize() {
            Ok(val) => return Some(val),
            Err(e) => warn!("Cannot canonicalize {:?}: {}", current, e),
        }
    }

    if let Some(mut home) = dirs::home_dir() {
        home.push(".config/openstack/clouds.yaml");
        if home.is_file() {
            return Some(home);
        }
    } else {
        warn!("Cannot find home directory");
    }

    let abs = PathBuf::from("/etc/openstack/clouds.yaml");
    if abs.is_file() {
        Some(abs)
    } else {
        None
    }
}

/// Read settings of the named cloud from a `clouds.yaml` stream.
pub fn from_reader<R: io::Read, S: AsRef<str>>(reader: R, cloud_name: S) -> Result<CloudConfig> {
    let mut root: Root = serde_yaml::from_reader(reader).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot parse clouds.yaml: {}", e),
        )
    })?;

    let name = cloud_name.as_ref();
    let cloud = root.clouds.remove(name).ok_or_else(|| {
        Error::new(ErrorKind::InvalidConfig, format!("No such cloud: {}", name))
    })?;

    let auth = cloud.auth;
    Ok(CloudConfig {
        credentials: Credentials::new(
            auth.auth_url,
            auth.username,
            auth.password,
            auth.project_name,
        ),
        transport: TransportConfig::default()
            .with_certificate_verification(cloud.verify.unwrap_or(false)),
    })
}

/// Read settings of the named cloud from the first `clouds.yaml` found.
///
/// The file is looked up in the current directory, then in
/// `~/.config/openstack` and finally in `/etc/openstack`.
pub fn from_config<S: AsRef<str>>(cloud_name: S) -> Result<CloudConfig> {
    let path = find_config().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidConfig,
            "clouds.yaml was not found in any location",
        )
    })?;
    debug!("Using cloud configuration from {:?}", path);
    let file = File::open(&path).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot read {:?}: {}", path, e),
        )
    })?;
    from_reader(file, cloud_name)
}

#[cfg(test)]
mod test {
    use super::super::ErrorKind;
    use super::{from_reader, Credentials};

    const CLOUDS: &str = r#"
clouds:
  devstack:
    auth:
      auth_url: https://cloud.example.com/identity
      username: demo
      password: secret
      project_name: demo-project
    verify: true
  lab:
    auth:
      auth_url: https://lab.example.com:5000
      username: admin
      password: pa$$w0rd
      project_name: admin
"#;

    #[test]
    fn test_from_reader() {
        let cfg = from_reader(CLOUDS.as_bytes(), "devstack").unwrap();
        assert_eq!(cfg.credentials.auth_url, "https://cloud.example.com/identity");
        assert_eq!(cfg.credentials.username, "demo");
        assert_eq!(cfg.credentials.password, "secret");
        assert_eq!(cfg.credentials.project_name, "demo-project");
        assert!(cfg.transport.verify_certificates);
    }

    #[test]
    fn test_from_reader_verify_defaults_to_off() {
        let cfg = from_reader(CLOUDS.as_bytes(), "lab").unwrap();
        assert!(!cfg.transport.verify_certificates);
    }

    #[test]
    fn test_from_reader_unknown_cloud() {
        let err = from_reader(CLOUDS.as_bytes(), "missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_from_reader_garbage() {
        let err = from_reader("clouds: [1, 2".as_bytes(), "lab").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_validate() {
        Credentials::new("http://127.0.0.1:5000", "admin", "pa$$w0rd", "admin")
            .validate()
            .unwrap();
        let err = Credentials::new("http://127.0.0.1:5000", "admin", "", "admin")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("http://127.0.0.1:5000", "admin", "pa$$w0rd", "admin");
        assert!(!format!("{:?}", creds).contains("pa$$w0rd"));
    }
}
