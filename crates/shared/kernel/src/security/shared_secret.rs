use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Why a caller-supplied key was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No key supplied, or no secret configured on the server.
    #[error("Forbidden: Admin key required")]
    Missing,
    #[error("Forbidden: Invalid admin key")]
    Invalid,
}

/// A static shared secret compared in constant time.
///
/// Candidates are compared through HMAC-SHA256 tags keyed by the secret, so
/// neither the content nor the length of the secret leaks through timing.
#[derive(Clone)]
pub struct SharedSecret {
    key: Zeroizing<Vec<u8>>,
    tag: Zeroizing<Vec<u8>>,
}

impl SharedSecret {
    /// Returns `None` for an empty or whitespace-only secret.
    #[must_use]
    pub fn new(secret: impl AsRef<str>) -> Option<Self> {
        let secret = secret.as_ref();
        if secret.trim().is_empty() {
            return None;
        }

        let key = Zeroizing::new(secret.as_bytes().to_vec());
        let tag = Zeroizing::new(sign(&key, secret.as_bytes())?);
        Some(Self { key, tag })
    }

    /// Checks a candidate key.
    ///
    /// # Errors
    /// [`AccessError::Missing`] for an absent or empty candidate, [`AccessError::Invalid`]
    /// when it does not match.
    pub fn verify(&self, candidate: Option<&str>) -> Result<(), AccessError> {
        let candidate = candidate.filter(|c| !c.is_empty()).ok_or(AccessError::Missing)?;

        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| AccessError::Invalid)?;
        mac.update(candidate.as_bytes());
        mac.verify_slice(&self.tag).map_err(|_| AccessError::Invalid)
    }

    /// Like [`SharedSecret::verify`], treating an unconfigured secret as [`AccessError::Missing`].
    ///
    /// # Errors
    /// See [`SharedSecret::verify`].
    pub fn authorize(secret: Option<&Self>, candidate: Option<&str>) -> Result<(), AccessError> {
        secret.ok_or(AccessError::Missing)?.verify(candidate)
    }
}

fn sign(key: &[u8], message: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(message);
    Some(mac.finalize().into_bytes().to_vec())
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}
