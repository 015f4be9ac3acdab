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

//! Authentication providers for the Neo4j HTTP API.

use crate::error::{Neo4jErrorHelper, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;

/// Produces the value of the `Authorization` header sent with every request.
pub trait AuthProvider: Send + Sync + fmt::Debug {
    fn get_auth_header(&self) -> Result<String>;
}

/// HTTP Basic authentication with a Neo4j user and password.
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of debug output.
impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AuthProvider for BasicAuth {
    fn get_auth_header(&self) -> Result<String> {
        if self.username.is_empty() {
            return Err(Neo4jErrorHelper::invalid_argument().message("username is empty"));
        }
        let credentials = format!("{}:{}", self.username, self.password);
        Ok(format!("Basic {}", STANDARD.encode(credentials)))
    }
}

/// Bearer token authentication (SSO / OIDC-issued tokens).
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl AuthProvider for BearerToken {
    fn get_auth_header(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        let auth = BasicAuth::new("neo4j", "secret");
        // base64("neo4j:secret")
        assert_eq!(auth.get_auth_header().unwrap(), "Basic bmVvNGo6c2VjcmV0");
    }

    #[test]
    fn test_basic_auth_rejects_empty_username() {
        let auth = BasicAuth::new("", "secret");
        assert!(auth.get_auth_header().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let basic = format!("{:?}", BasicAuth::new("neo4j", "secret"));
        assert!(!basic.contains("secret"));
        let bearer = format!("{:?}", BearerToken::new("tok-123"));
        assert!(!bearer.contains("tok-123"));
    }

    #[test]
    fn test_bearer_header() {
        let auth = BearerToken::new("tok-123");
        assert_eq!(auth.get_auth_header().unwrap(), "Bearer tok-123");
    }
}
