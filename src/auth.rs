// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Credential handling for the Reddit API.
//!
//! Course material distributes a shared Reddit app credential so that every
//! student gets the elevated API rate limit without anyone publishing a
//! personal app secret in plaintext. The username and password are stored
//! as encrypted blobs in a JSON config file next to the key that decrypts
//! them.
//!
//! To be clear about what that buys: shipping the key next to the
//! ciphertext provides obfuscation, not secrecy. Anyone holding the config
//! file can recover the credentials. The encryption exists to keep the
//! secret out of casual view (search indexes, screen shares, accidental
//! pastes), nothing more.
//!
//! Two decryption schemes are supported, selected when the [`Decryptor`]
//! is built:
//!
//! - [`Decryptor::Fernet`], an authenticated symmetric cipher. A corrupted
//!   blob or a wrong key fails outright; it can never hand back plaintext
//!   that merely looks right.
//! - [`Decryptor::PlainEncoding`], a base64 fallback used when the
//!   configured key is not a valid Fernet key. This variant provides **no
//!   confidentiality at all** and is reported as such; it exists so a
//!   classroom with a misconfigured key can still follow along.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use fernet::Fernet;
use log::warn;
use serde::Deserialize;
use std::path::Path;
use std::{env, fmt, fs};
use thiserror::Error;

/// Default name of the credential config file.
pub const DEFAULT_CONFIG_FILE: &str = "scraper_config.json";

/// Environment variable overriding the encrypted username.
pub const USERNAME_ENV: &str = "REDDIT_USERNAME";

/// Environment variable overriding the encrypted password.
pub const PASSWORD_ENV: &str = "REDDIT_PASSWORD";

/// A credential error.
///
/// Deliberately distinct from [`HTTPError`](crate::http::HTTPError): a
/// caller can always tell "the blob would not decrypt" apart from "the
/// network call failed".
#[derive(Debug, Error)]
pub enum Error {
    /// The config file could not be read from disk.
    #[error("could not read credential config {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON, or is missing fields.
    #[error("credential config is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A Fernet token failed authentication. The token is corrupted or the
    /// key is wrong; either way, no plaintext is produced.
    #[error("credential blob failed authentication (corrupted blob or wrong key)")]
    InvalidToken,

    /// A plain-encoded blob is not valid base64.
    #[error("credential blob is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decrypted bytes are not valid UTF-8.
    #[error("decrypted credential is not valid UTF-8")]
    NotText(#[from] std::string::FromUtf8Error),
}

/// The contents of the credential config file.
///
/// Mirrors the file distributed with the course material: the Reddit app
/// identity in plaintext, plus the shared account credentials as encrypted
/// blobs alongside their key.
#[derive(Debug, Deserialize)]
pub struct CredentialConfig {
    /// Reddit app client ID.
    pub client_id: String,

    /// Reddit app client secret.
    pub client_secret: String,

    /// User agent string identifying the course scraper.
    pub user_agent: String,

    /// Encrypted blob containing the shared account's username.
    pub encrypted_username: String,

    /// Encrypted blob containing the shared account's password.
    pub encrypted_password: String,

    /// Key for decrypting the blobs above.
    pub encryption_key: String,
}

impl CredentialConfig {
    /// Loads a credential config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| Error::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&data)
    }

    /// Parses a credential config from a JSON string.
    pub fn parse(data: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(data)?)
    }

    /// Builds the decryptor selected by this config's key.
    pub fn decryptor(&self) -> Decryptor {
        Decryptor::new(&self.encryption_key)
    }

    /// Produces the plaintext account credentials.
    ///
    /// `$REDDIT_USERNAME` and `$REDDIT_PASSWORD` take precedence over the
    /// encrypted blobs when both are set, so a student can always use a
    /// personal account instead of the shared one.
    pub fn credentials(&self) -> Result<Credentials, Error> {
        if let (Ok(username), Ok(password)) = (env::var(USERNAME_ENV), env::var(PASSWORD_ENV)) {
            return Ok(Credentials { username, password });
        }

        let decryptor = self.decryptor();
        let username = decryptor.decrypt(&self.encrypted_username)?;
        let password = decryptor.decrypt(&self.encrypted_password)?;
        Ok(Credentials { username, password })
    }
}

/// Plaintext account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username.
    pub username: String,

    /// Account password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    // Keeps the password out of debug logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials {{ username = {}, password = *** }}", self.username)
    }
}

/// Decrypts credential blobs.
///
/// The variant is chosen once, when the decryptor is built: a key that
/// parses as a Fernet key selects the cipher, anything else falls back to
/// plain base64 decoding. The fallback is never substituted silently; it
/// is logged and reported via [`Decryptor::is_confidential()`].
pub enum Decryptor {
    /// Authenticated symmetric decryption.
    Fernet(Fernet),

    /// Base64 decoding. Provides no confidentiality.
    PlainEncoding,
}

impl Decryptor {
    /// Selects the decryption scheme for the given key.
    pub fn new(key: &str) -> Self {
        match Fernet::new(key) {
            Some(fernet) => Decryptor::Fernet(fernet),
            None => {
                warn!("encryption key is not a valid Fernet key; falling back to plain base64 decoding, which is NOT confidential");
                Decryptor::PlainEncoding
            }
        }
    }

    /// True if the selected scheme actually conceals the blobs it decrypts.
    pub fn is_confidential(&self) -> bool {
        matches!(self, Decryptor::Fernet(_))
    }

    /// A short human-readable name for the selected scheme.
    pub fn scheme(&self) -> &'static str {
        match self {
            Decryptor::Fernet(_) => "fernet",
            Decryptor::PlainEncoding => "base64 (not confidential)",
        }
    }

    /// Decrypts a single blob into plaintext.
    ///
    /// Decryption is deterministic: the same blob and key always produce
    /// the same plaintext. Failure produces an [`enum@Error`] and never a
    /// partial or garbled string.
    pub fn decrypt(&self, blob: &str) -> Result<String, Error> {
        let bytes = match self {
            Decryptor::Fernet(fernet) => fernet.decrypt(blob).map_err(|_| Error::InvalidToken)?,
            Decryptor::PlainEncoding => BASE64.decode(blob)?,
        };
        Ok(String::from_utf8(bytes)?)
    }
}

impl fmt::Debug for Decryptor {
    // fernet::Fernet does not implement Debug.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decryptor({})", self.scheme())
    }
}

/// The level of access negotiated with the Reddit API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Logged in as the shared course account.
    Authenticated,

    /// Anonymous access.
    #[default]
    ReadOnly,
}

impl AuthMode {
    /// The number of API requests per minute Reddit advertises for this
    /// level of access. Enforcement is entirely Reddit's business; this is
    /// only reported to the student.
    pub fn rate_limit(&self) -> u32 {
        match self {
            AuthMode::Authenticated => 600,
            AuthMode::ReadOnly => 60,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Authenticated => write!(f, "authenticated"),
            AuthMode::ReadOnly => write!(f, "read-only"),
        }
    }
}

#[cfg(test)]
mod tests {
    mod decryptor {
        use crate::auth::{Decryptor, Error};
        use fernet::Fernet;

        fn fernet_decryptor() -> (Decryptor, Fernet, String) {
            let key = Fernet::generate_key();
            let fernet = Fernet::new(&key).unwrap();
            (Decryptor::new(&key), fernet, key)
        }

        #[test]
        fn it_selects_the_cipher_for_a_valid_key() {
            let (decryptor, _, _) = fernet_decryptor();
            assert!(decryptor.is_confidential());
            assert_eq!(decryptor.scheme(), "fernet");
        }

        #[test]
        fn it_falls_back_to_plain_encoding_for_an_invalid_key() {
            let decryptor = Decryptor::new("definitely not a key");
            assert!(!decryptor.is_confidential());
            assert_eq!(decryptor.scheme(), "base64 (not confidential)");
        }

        #[test]
        fn it_decrypts_deterministically() {
            let (decryptor, fernet, _) = fernet_decryptor();
            let blob = fernet.encrypt(b"course_account");
            let first = decryptor.decrypt(&blob).unwrap();
            let second = decryptor.decrypt(&blob).unwrap();
            assert_eq!(first, "course_account");
            assert_eq!(first, second);
        }

        #[test]
        fn it_rejects_a_corrupted_blob() {
            let (decryptor, fernet, _) = fernet_decryptor();
            let mut blob = fernet.encrypt(b"course_account");
            blob.replace_range(0..2, "zz");
            let err = decryptor.decrypt(&blob).unwrap_err();
            assert!(matches!(err, Error::InvalidToken));
        }

        #[test]
        fn it_rejects_a_blob_encrypted_with_a_different_key() {
            let (decryptor, _, _) = fernet_decryptor();
            let other = Fernet::new(&Fernet::generate_key()).unwrap();
            let blob = other.encrypt(b"course_account");
            let err = decryptor.decrypt(&blob).unwrap_err();
            assert!(matches!(err, Error::InvalidToken));
        }

        #[test]
        fn it_decodes_plain_blobs() {
            let decryptor = Decryptor::new("not a fernet key");
            // "course_account" in base64
            let plaintext = decryptor.decrypt("Y291cnNlX2FjY291bnQ=").unwrap();
            assert_eq!(plaintext, "course_account");
        }

        #[test]
        fn it_rejects_plain_blobs_that_are_not_base64() {
            let decryptor = Decryptor::new("not a fernet key");
            let err = decryptor.decrypt("!!! not base64 !!!").unwrap_err();
            assert!(matches!(err, Error::InvalidEncoding(_)));
        }
    }

    mod config {
        use crate::auth::{CredentialConfig, Error};
        use fernet::Fernet;
        use indoc::formatdoc;

        fn config_json(key: &str, username_blob: &str, password_blob: &str) -> String {
            formatdoc! {r#"
                {{
                    "client_id": "abc123",
                    "client_secret": "shhh",
                    "user_agent": "snooscrape test",
                    "encrypted_username": "{username_blob}",
                    "encrypted_password": "{password_blob}",
                    "encryption_key": "{key}"
                }}"#}
        }

        #[test]
        fn it_parses_a_config_file() {
            let data = config_json("some-key", "blob1", "blob2");
            let config = CredentialConfig::parse(&data).unwrap();
            assert_eq!(config.client_id, "abc123");
            assert_eq!(config.encryption_key, "some-key");
        }

        #[test]
        fn it_rejects_a_malformed_config_file() {
            let err = CredentialConfig::parse("{ not json").unwrap_err();
            assert!(matches!(err, Error::Malformed(_)));
        }

        #[test]
        fn it_decrypts_credentials_from_encrypted_blobs() {
            let key = Fernet::generate_key();
            let fernet = Fernet::new(&key).unwrap();
            let data = config_json(
                &key,
                &fernet.encrypt(b"course_account"),
                &fernet.encrypt(b"hunter2"),
            );
            let config = CredentialConfig::parse(&data).unwrap();
            let credentials = config.credentials().unwrap();
            assert_eq!(credentials.username, "course_account");
            assert_eq!(credentials.password, "hunter2");
        }

        #[test]
        fn it_decrypts_credentials_from_plain_blobs() {
            // base64 of "course_account" and "hunter2"
            let data = config_json("bad key", "Y291cnNlX2FjY291bnQ=", "aHVudGVyMg==");
            let config = CredentialConfig::parse(&data).unwrap();
            let credentials = config.credentials().unwrap();
            assert_eq!(credentials.username, "course_account");
            assert_eq!(credentials.password, "hunter2");
        }

        #[test]
        fn it_does_not_leak_the_password_in_debug_output() {
            let data = config_json("bad key", "Y291cnNlX2FjY291bnQ=", "aHVudGVyMg==");
            let config = CredentialConfig::parse(&data).unwrap();
            let credentials = config.credentials().unwrap();
            let debugged = format!("{credentials:?}");
            assert!(!debugged.contains("hunter2"));
        }
    }

    mod auth_mode {
        use crate::auth::AuthMode;

        #[test]
        fn it_reports_the_elevated_rate_limit_when_authenticated() {
            assert_eq!(AuthMode::Authenticated.rate_limit(), 600);
        }

        #[test]
        fn it_reports_the_anonymous_rate_limit_when_read_only() {
            assert_eq!(AuthMode::ReadOnly.rate_limit(), 60);
        }

        #[test]
        fn it_displays_itself() {
            assert_eq!(AuthMode::Authenticated.to_string(), "authenticated");
            assert_eq!(AuthMode::ReadOnly.to_string(), "read-only");
        }
    }
}
