/*
 * Copyright 2025 Luc Lenôtre
 *
 * This file is part of Maestro.
 *
 * Maestro is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * Maestro is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * Maestro. If not, see <https://www.gnu.org/licenses/>.
 */

//! Authentication of reboot requests against a shared secret.
//!
//! The secret is never kept in clear: it is hashed with Argon2 when the daemon starts, and each
//! presented token is verified against that hash.

use crate::error::CredentialError;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand_core::OsRng;

/// Memory cost of the hash computed from a clear secret, in KiB.
const HASH_MEMORY_COST: u32 = 4096;
/// Number of passes of the hash computed from a clear secret.
const HASH_TIME_COST: u32 = 1;

/// Checks presented tokens against the configured credential.
#[derive(Clone, Debug)]
pub struct Authenticator {
    /// The PHC string of the credential. If `None`, authentication is disabled.
    hash: Option<String>,
}

impl Authenticator {
    /// Returns an authenticator accepting every token.
    pub fn disabled() -> Self {
        Self {
            hash: None,
        }
    }

    /// Creates an authenticator from the clear secret `secret`.
    ///
    /// If `secret` is empty, authentication is disabled.
    pub fn new(secret: &str) -> Result<Self, CredentialError> {
        if secret.is_empty() {
            return Ok(Self::disabled());
        }
        let params = Params::new(HASH_MEMORY_COST, HASH_TIME_COST, 1, None)
            .map_err(CredentialError::Params)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(CredentialError::Hash)?;
        Ok(Self {
            hash: Some(hash.to_string()),
        })
    }

    /// Creates an authenticator from the Argon2 PHC string `hash` of the secret.
    ///
    /// If `hash` is empty, authentication is disabled. A hash from another algorithm, or with
    /// invalid Argon2 parameters, is an error.
    pub fn from_hash(hash: &str) -> Result<Self, CredentialError> {
        if hash.is_empty() {
            return Ok(Self::disabled());
        }
        let parsed = PasswordHash::new(hash).map_err(CredentialError::InvalidHash)?;
        Algorithm::try_from(parsed.algorithm).map_err(CredentialError::InvalidHash)?;
        Params::try_from(&parsed).map_err(CredentialError::InvalidHash)?;
        Ok(Self {
            hash: Some(hash.to_owned()),
        })
    }

    /// Tells whether a credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.hash.is_some()
    }

    /// Tells whether `presented` matches the configured credential.
    ///
    /// The comparison is exact. If no credential is configured, any token is accepted.
    pub fn authenticate(&self, presented: &str) -> bool {
        let Some(hash) = &self.hash else {
            return true;
        };
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(presented.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn disabled_accepts_anything() {
        let auth = Authenticator::new("").unwrap();
        assert!(!auth.is_enabled());
        assert!(auth.authenticate(""));
        assert!(auth.authenticate("secret"));
        assert!(auth.authenticate("\0 anything"));
    }

    #[test]
    fn exact_match() {
        let auth = Authenticator::new("secret").unwrap();
        assert!(auth.is_enabled());
        assert!(auth.authenticate("secret"));
        assert!(!auth.authenticate(""));
        assert!(!auth.authenticate("wrong"));
        assert!(!auth.authenticate("secre"));
        assert!(!auth.authenticate("ecret"));
        assert!(!auth.authenticate("secrets"));
        assert!(!auth.authenticate("xsecret"));
        assert!(!auth.authenticate("Secret"));
        assert!(!auth.authenticate(" secret"));
    }

    #[test]
    fn salted() {
        let a = Authenticator::new("secret").unwrap();
        let b = Authenticator::new("secret").unwrap();
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn prehashed() {
        let hash = Authenticator::new("secret").unwrap().hash.unwrap();
        let auth = Authenticator::from_hash(&hash).unwrap();
        assert!(auth.authenticate("secret"));
        assert!(!auth.authenticate("wrong"));
        assert!(!Authenticator::from_hash("").unwrap().is_enabled());
    }

    #[test]
    fn invalid_hash() {
        assert!(matches!(
            Authenticator::from_hash("not a hash"),
            Err(CredentialError::InvalidHash(_))
        ));
    }

    #[test]
    fn foreign_algorithm_hash() {
        let hash = Authenticator::new("secret").unwrap().hash.unwrap();
        let scrypt = hash.replacen("$argon2id$", "$scrypt$", 1);
        assert!(scrypt.starts_with("$scrypt$"));
        assert!(matches!(
            Authenticator::from_hash(&scrypt),
            Err(CredentialError::InvalidHash(_))
        ));
        let pbkdf2 = "$pbkdf2-sha256$i=1000$c2FsdHNhbHQ$ZGVyaXZlZGtleWRlcml2ZWRrZXlkZXJpdmVka2V5";
        assert!(matches!(
            Authenticator::from_hash(pbkdf2),
            Err(CredentialError::InvalidHash(_))
        ));
    }
}
