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

//! Session structure definition.
//!
//! The Session object serves as a wrapper around an HTTP(s) client, handling
//! authentication and accessing the service catalog.

use log::{debug, error};
use osauth::common::IdOrName;
use osauth::identity::Password;
use reqwest::Client;
use static_assertions::assert_impl_all;

use super::config::{Credentials, TransportConfig};
use super::{Error, ErrorKind, Result};

/// Name of the domain users are looked up in.
pub const DEFAULT_USER_DOMAIN_NAME: &str = "Default";

/// ID of the domain projects are looked up in.
pub const DEFAULT_PROJECT_DOMAIN_ID: &str = "default";

/// An authenticated, project-scoped OpenStack session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: osauth::Session,
    project_name: String,
}

assert_impl_all!(Session: Send, Sync);

impl Session {
    /// Authenticate and create a new session.
    ///
    /// The token is requested right away, so wrong credentials or an
    /// unreachable identity service are reported here.
    pub async fn establish(credentials: &Credentials, transport: TransportConfig) -> Result<Session> {
        credentials.validate()?;

        let auth = Password::new(
            &credentials.auth_url,
            credentials.username.clone(),
            credentials.password.clone(),
            DEFAULT_USER_DOMAIN_NAME,
        )
        .map_err(|e| Error::from_session(ErrorKind::InvalidInput, "Invalid auth URL", e))?
        .with_project_scope(
            IdOrName::from_name(credentials.project_name.clone()),
            IdOrName::from_id(DEFAULT_PROJECT_DOMAIN_ID),
        );

        let client = http_client(transport)?;
        debug!(
            "Authenticating as {} in project {} at {}",
            credentials.username, credentials.project_name, credentials.auth_url
        );
        let inner = osauth::Session::new_with_client(client, auth)
            .await
            .map_err(|e| {
                error!("Authentication at {} failed: {}", credentials.auth_url, e);
                Error::from_session(
                    ErrorKind::AuthenticationFailed,
                    format!("Cannot authenticate at {}", credentials.auth_url),
                    e,
                )
            })?;

        Ok(Session {
            inner,
            project_name: credentials.project_name.clone(),
        })
    }

    /// Name of the project this session is scoped to.
    #[inline]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Reference to the underlying session.
    #[inline]
    pub(crate) fn inner(&self) -> &osauth::Session {
        &self.inner
    }
}

/// Authenticate and create a new session.
///
/// A shortcut for [Session::establish](struct.Session.html#method.establish).
#[inline]
pub async fn establish_session(credentials: &Credentials, transport: TransportConfig) -> Result<Session> {
    Session::establish(credentials, transport).await
}

fn http_client(transport: TransportConfig) -> Result<Client> {
    let mut builder = Client::builder();
    if !transport.verify_certificates {
        debug!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }
    if let Some(timeout) = transport.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Cannot build an HTTP client: {}", e),
        )
    })
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::super::config::{Credentials, TransportConfig};
    use super::super::ErrorKind;
    use super::Session;

    const UNAUTHORIZED: &str = r#"{"error": {"code": 401, "title": "Unauthorized", "message": "The request you have made requires authentication."}}"#;

    async fn read_request(stream: &mut TcpStream) {
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let size = stream.read(&mut chunk).await.unwrap_or(0);
            if size == 0 {
                return;
            }
            request.extend_from_slice(&chunk[..size]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    /// Identity service that rejects every request.
    async fn rejecting_identity(listener: TcpListener, requests: Arc<AtomicUsize>) {
        while let Ok((mut stream, _)) = listener.accept().await {
            read_request(&mut stream).await;
            let _ = requests.fetch_add(1, Ordering::SeqCst);
            let response = format!(
                "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                UNAUTHORIZED.len(),
                UNAUTHORIZED
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_empty_credentials() {
        let creds = Credentials::new("http://127.0.0.1:5000", "", "pa$$w0rd", "admin");
        let err = Session::establish(&creds, TransportConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let creds = Credentials::new("http://127.0.0.1 5000/", "admin", "pa$$w0rd", "admin");
        let err = Session::establish(&creds, TransportConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_unreachable_identity() {
        let creds = Credentials::new("http://127.0.0.1:9/identity", "admin", "pa$$w0rd", "admin");
        let transport = TransportConfig::default().with_request_timeout(Duration::from_secs(5));
        let err = Session::establish(&creds, transport).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(AtomicUsize::new(0));
        let _server = tokio::spawn(rejecting_identity(listener, Arc::clone(&requests)));

        let creds = Credentials::new(
            format!("http://127.0.0.1:{}/identity", port),
            "admin",
            "wrong",
            "admin",
        );
        let transport = TransportConfig::default().with_request_timeout(Duration::from_secs(5));
        let err = Session::establish(&creds, transport).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert!(requests.load(Ordering::SeqCst) > 0);
    }
}
