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

//! Error and Result implementations.

use std::fmt;
use std::time::Duration;

/// Kind of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Authentication failure.
    ///
    /// The identity service rejected the credentials or could not be reached.
    AuthenticationFailed,

    /// Listing of images or flavors failed.
    CatalogFetchFailed,

    /// Requested resource was not found.
    ///
    /// Roughly maps to HTTP 404 and 410.
    ResourceNotFound,

    /// Invalid value passed to one of parameters.
    InvalidInput,

    /// Configuration file is missing or malformed.
    InvalidConfig,

    /// Operation has reached the specified time out.
    OperationTimedOut,

    /// Operation failed to complete.
    ///
    /// Used when a server ends up in the ERROR state.
    OperationFailed,

    /// Any other failure reported while talking to the cloud.
    ProtocolError,
}

/// Error from an OpenStack call.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    elapsed: Option<Duration>,
    source: Option<osauth::Error>,
}

/// Result of an OpenStack call.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Create a new error of the provided kind.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            message: Some(message.into()),
            elapsed: None,
            source: None,
        }
    }

    /// Create a time out error remembering how long the operation took.
    pub(crate) fn new_timeout<S: Into<String>>(message: S, elapsed: Duration) -> Error {
        Error {
            kind: ErrorKind::OperationTimedOut,
            message: Some(message.into()),
            elapsed: Some(elapsed),
            source: None,
        }
    }

    /// Re-classify an error coming from the underlying session.
    pub(crate) fn from_session<S: Into<String>>(
        kind: ErrorKind,
        context: S,
        source: osauth::Error,
    ) -> Error {
        Error {
            kind,
            message: Some(format!("{}: {}", context.into(), source)),
            elapsed: None,
            source: Some(source),
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Error message (if any).
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Time spent before the operation timed out.
    ///
    /// Only set for errors of kind `OperationTimedOut`.
    #[inline]
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::AuthenticationFailed => "Failed to authenticate",
            ErrorKind::CatalogFetchFailed => "Failed to fetch the catalog",
            ErrorKind::ResourceNotFound => "Requested resource was not found",
            ErrorKind::InvalidInput => "Input value(s) are invalid or missing",
            ErrorKind::InvalidConfig => "Configuration is invalid or missing",
            ErrorKind::OperationTimedOut => "Time out reached while waiting for the operation",
            ErrorKind::OperationFailed => "Requested operation has failed",
            ErrorKind::ProtocolError => "Error when accessing the server",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(ref msg) = self.message {
            write!(f, ": {}", msg)
        } else {
            Ok(())
        }
    }
}

impl ::std::error::Error for Error {
    fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
        match self.source {
            Some(ref err) => Some(err),
            None => None,
        }
    }
}

impl From<osauth::Error> for Error {
    fn from(value: osauth::Error) -> Error {
        let kind = match value.kind() {
            osauth::ErrorKind::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            osauth::ErrorKind::ResourceNotFound => ErrorKind::ResourceNotFound,
            osauth::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
            osauth::ErrorKind::InvalidConfig => ErrorKind::InvalidConfig,
            osauth::ErrorKind::OperationTimedOut => ErrorKind::OperationTimedOut,
            _ => ErrorKind::ProtocolError,
        };

        Error {
            kind,
            message: Some(value.to_string()),
            elapsed: None,
            source: Some(value),
        }
    }
}
