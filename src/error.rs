// Copyright (c) 2025 ADBC Drivers Contributors
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

//! Error types for the Neo4j HTTP ADBC driver.
//!
//! Internal code works with [`Error`], built through [`Neo4jErrorHelper`]:
//!
//! ```ignore
//! return Err(Neo4jErrorHelper::io().message("connection refused"));
//! ```
//!
//! At the ADBC trait boundary errors are converted with [`Error::to_adbc`].

use adbc_core::error::{Error as AdbcError, Status};
use adbc_core::options::OptionValue;
use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of a driver error, mapped 1:1 onto an ADBC [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
    InvalidData,
    NotFound,
    NotImplemented,
    Io,
    Unauthenticated,
    Unauthorized,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::InvalidData => "invalid data",
            ErrorKind::NotFound => "not found",
            ErrorKind::NotImplemented => "not implemented",
            ErrorKind::Io => "io",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Unauthorized => "unauthorized",
        }
    }

    fn status(self) -> Status {
        match self {
            ErrorKind::InvalidArgument => Status::InvalidArguments,
            ErrorKind::InvalidState => Status::InvalidState,
            ErrorKind::InvalidData => Status::InvalidData,
            ErrorKind::NotFound => Status::NotFound,
            ErrorKind::NotImplemented => Status::NotImplemented,
            ErrorKind::Io => Status::IO,
            ErrorKind::Unauthenticated => Status::Unauthenticated,
            ErrorKind::Unauthorized => Status::Unauthorized,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by the driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[Neo4j] {kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
        }
    }

    /// Attach a message, replacing any previous one.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    /// Convert into the error type expected by `adbc_core` traits.
    pub fn to_adbc(&self) -> AdbcError {
        AdbcError::with_message_and_status(self.to_string(), self.kind.status())
    }
}

impl From<Error> for AdbcError {
    fn from(error: Error) -> Self {
        error.to_adbc()
    }
}

/// Constructors for [`Error`], one per [`ErrorKind`], plus the option helpers
/// shared by every `Optionable` implementation.
pub struct Neo4jErrorHelper;

impl Neo4jErrorHelper {
    pub fn invalid_argument() -> Error {
        Error::new(ErrorKind::InvalidArgument)
    }

    pub fn invalid_state() -> Error {
        Error::new(ErrorKind::InvalidState)
    }

    pub fn invalid_data() -> Error {
        Error::new(ErrorKind::InvalidData)
    }

    pub fn not_found() -> Error {
        Error::new(ErrorKind::NotFound)
    }

    pub fn not_implemented() -> Error {
        Error::new(ErrorKind::NotImplemented)
    }

    pub fn io() -> Error {
        Error::new(ErrorKind::Io)
    }

    pub fn unauthenticated() -> Error {
        Error::new(ErrorKind::Unauthenticated)
    }

    pub fn unauthorized() -> Error {
        Error::new(ErrorKind::Unauthorized)
    }

    pub fn set_invalid_option(key: &impl AsRef<str>, value: &OptionValue) -> Error {
        Self::invalid_argument().message(format!(
            "invalid value for option '{}': {:?}",
            key.as_ref(),
            value
        ))
    }

    pub fn set_unknown_option(key: &impl AsRef<str>) -> Error {
        Self::not_found().message(format!("unknown option '{}'", key.as_ref()))
    }

    pub fn get_unknown_option(key: &impl AsRef<str>) -> Error {
        Self::not_found().message(format!("option '{}' is not set or unknown", key.as_ref()))
    }
}
