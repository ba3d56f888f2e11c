// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};

use nifsign_core::{utils::Redact, SigningCredential};

/// Credential for NIFCLOUD APIs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

/// Partial credential values found in a single source.
///
/// Sources are merged field by field with [`resolve_credential`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSource {
    /// Access key id, if this source has one.
    pub access_key_id: Option<String>,
    /// Secret access key, if this source has one.
    pub secret_access_key: Option<String>,
}

impl CredentialSource {
    /// Create a source from optional values.
    pub fn new(access_key_id: Option<String>, secret_access_key: Option<String>) -> Self {
        Self {
            access_key_id,
            secret_access_key,
        }
    }

    /// Returns a credential only when both fields are present.
    pub fn into_credential(self) -> Option<Credential> {
        match (self.access_key_id, self.secret_access_key) {
            (Some(ak), Some(sk)) => Some(Credential::new(ak, sk)),
            _ => None,
        }
    }
}

impl Debug for CredentialSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSource")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

/// Merge credential sources, lowest to highest precedence: config file,
/// environment, explicit arguments.
///
/// Each field is taken from the highest source that has it, so an access key
/// from the environment may pair with a secret from the config file.
pub fn resolve_credential(
    file: CredentialSource,
    env: CredentialSource,
    args: CredentialSource,
) -> Option<Credential> {
    CredentialSource {
        access_key_id: args
            .access_key_id
            .or(env.access_key_id)
            .or(file.access_key_id),
        secret_access_key: args
            .secret_access_key
            .or(env.secret_access_key)
            .or(file.secret_access_key),
    }
    .into_credential()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(ak: Option<&str>, sk: Option<&str>) -> CredentialSource {
        CredentialSource::new(ak.map(String::from), sk.map(String::from))
    }

    #[test]
    fn test_args_win_over_env_and_file() {
        let cred = resolve_credential(
            source(Some("file_ak"), Some("file_sk")),
            source(Some("env_ak"), Some("env_sk")),
            source(Some("arg_ak"), Some("arg_sk")),
        );
        assert_eq!(cred, Some(Credential::new("arg_ak", "arg_sk")));
    }

    #[test]
    fn test_env_wins_over_file() {
        let cred = resolve_credential(
            source(Some("file_ak"), Some("file_sk")),
            source(Some("env_ak"), Some("env_sk")),
            CredentialSource::default(),
        );
        assert_eq!(cred, Some(Credential::new("env_ak", "env_sk")));
    }

    #[test]
    fn test_fields_merge_independently() {
        let cred = resolve_credential(
            source(None, Some("file_sk")),
            source(Some("env_ak"), None),
            CredentialSource::default(),
        );
        assert_eq!(cred, Some(Credential::new("env_ak", "file_sk")));
    }

    #[test]
    fn test_missing_field_yields_none() {
        let cred = resolve_credential(
            source(Some("file_ak"), None),
            source(Some("env_ak"), None),
            source(Some("arg_ak"), None),
        );
        assert_eq!(cred, None);
    }

    #[test]
    fn test_empty_credential_is_invalid() {
        assert!(!Credential::new("", "secret").is_valid());
        assert!(Credential::new("ak", "sk").is_valid());
    }
}
