use std::fmt::Write as _;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::RngCore;

use crate::error::{Error, Result};

const ARGON2_MEMORY: u32 = 64 * 1024; // 64KB
const ARGON2_ITERATIONS: u32 = 1;
const ARGON2_PARALLELISM: u32 = 4;
const ARGON2_OUTPUT_LEN: usize = 32;

const TOKEN_PREFIX: &str = "touchline";
const LOOKUP_LENGTH: usize = 8;
const SECRET_LENGTH: usize = 24;

/// Mints and checks admin tokens of the form `touchline_<lookup>_<secret>`.
/// The lookup half is stored in clear for indexed retrieval; the full token
/// only ever persists as an argon2id hash.
pub struct TokenGenerator {
    argon2: Argon2<'static>,
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator {
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(
            ARGON2_MEMORY,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            Some(ARGON2_OUTPUT_LEN),
        )
        .expect("invalid argon2 params");

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Mints a fresh token. Returns (raw_token, lookup, hash); the raw token
    /// is only available here.
    pub fn generate(&self) -> Result<(String, String, String)> {
        let lookup = uuid::Uuid::new_v4().simple().to_string()[..LOOKUP_LENGTH].to_string();

        let mut secret_bytes = [0u8; SECRET_LENGTH / 2];
        rand::thread_rng().fill_bytes(&mut secret_bytes);
        let secret = secret_bytes
            .iter()
            .fold(String::with_capacity(SECRET_LENGTH), |mut s, b| {
                let _ = write!(s, "{b:02x}");
                s
            });

        let raw_token = format!("{TOKEN_PREFIX}_{lookup}_{secret}");
        let hash = self.hash(&raw_token)?;
        Ok((raw_token, lookup, hash))
    }

    pub fn hash(&self, token: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(token.as_bytes(), &salt)
            .map_err(|e| Error::Config(format!("failed to hash token: {e}")))?;
        Ok(hash.to_string())
    }

    pub fn verify(&self, token: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| Error::Config(format!("invalid hash format: {e}")))?;

        match self.argon2.verify_password(token.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Config(format!("failed to verify token: {e}"))),
        }
    }
}

/// Splits a raw token into (lookup, secret), rejecting anything that does
/// not match the minted shape.
pub fn parse_token(token: &str) -> Result<(String, String)> {
    let rest = token
        .strip_prefix(TOKEN_PREFIX)
        .and_then(|r| r.strip_prefix('_'))
        .ok_or(Error::InvalidTokenFormat)?;

    let (lookup, secret) = rest.split_once('_').ok_or(Error::InvalidTokenFormat)?;
    if lookup.len() != LOOKUP_LENGTH || secret.len() != SECRET_LENGTH || secret.contains('_') {
        return Err(Error::InvalidTokenFormat);
    }

    Ok((lookup.to_string(), secret.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_token_round_trips() {
        let generator = TokenGenerator::new();
        let (raw, lookup, hash) = generator.generate().unwrap();

        let (parsed_lookup, secret) = parse_token(&raw).unwrap();
        assert_eq!(parsed_lookup, lookup);
        assert_eq!(secret.len(), 24);
        assert!(hash.starts_with("$argon2id$"));
        assert!(generator.verify(&raw, &hash).unwrap());
    }

    #[test]
    fn test_tampered_token_fails_verification() {
        let generator = TokenGenerator::new();
        let (raw, _, hash) = generator.generate().unwrap();

        // The secret is hex, so swapping the last char for 'z' always
        // changes the token.
        let mut tampered = raw.clone();
        tampered.pop();
        tampered.push('z');
        assert!(!generator.verify(&tampered, &hash).unwrap());
    }

    #[test]
    fn test_minted_tokens_are_distinct() {
        let generator = TokenGenerator::new();
        let (first, ..) = generator.generate().unwrap();
        let (second, ..) = generator.generate().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_parse_accepts_well_formed_token() {
        let (lookup, secret) = parse_token("touchline_0a1b2c3d_0123456789abcdef01234567").unwrap();
        assert_eq!(lookup, "0a1b2c3d");
        assert_eq!(secret, "0123456789abcdef01234567");
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for bad in [
            "",
            "touchline",
            "touchline_0a1b2c3d",
            "other_0a1b2c3d_0123456789abcdef01234567",
            "touchline_short_0123456789abcdef01234567",
            "touchline_0a1b2c3d_tooshort",
            "touchline_0a1b2c3d_0123456789abcdef01234567_extra",
        ] {
            assert!(parse_token(bad).is_err(), "accepted {bad:?}");
        }
    }
}
