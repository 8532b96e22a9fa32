//! SHA-512 digest newtype and streaming hash helper.
//!
//! Gradle records `sha512` checksums as 128-character lowercase hex strings.
//! [`Sha512Digest`] validates that shape, and [`sha512_reader`] produces one
//! from any byte stream without buffering the whole payload.

use crate::error::{MetadataError, Result};
use sha2::{Digest, Sha512};
use std::fmt;
use std::io::Read;

/// Expected length of a hex-encoded SHA-512 digest.
const DIGEST_HEX_LEN: usize = 128;

/// Read buffer size used while hashing streams.
const READ_BUFFER_LEN: usize = 8192;

/// A validated hex-encoded SHA-512 digest string.
///
/// # Examples
///
/// ```
/// use verification_metadata::digest::Sha512Digest;
///
/// let hex = "a".repeat(128);
/// let digest = Sha512Digest::try_from(hex.as_str()).unwrap();
/// assert_eq!(digest.as_str().len(), 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha512Digest(String);

impl Sha512Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Sha512Digest {
    type Error = MetadataError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha512(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha512Digest {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self> {
        validate_sha512(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for Sha512Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha512Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash everything `reader` yields with SHA-512.
///
/// # Errors
///
/// Returns any I/O error raised while reading.
///
/// # Examples
///
/// ```
/// use verification_metadata::digest::sha512_reader;
///
/// let digest = sha512_reader(&mut &b"abc"[..])?;
/// assert!(digest.as_str().starts_with("ddaf35a1"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn sha512_reader<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<Sha512Digest> {
    let mut hasher = Sha512::new();
    let mut buffer = [0u8; READ_BUFFER_LEN];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    // sha2 always produces 128 lowercase hex characters here.
    Ok(Sha512Digest(format!("{:x}", hasher.finalize())))
}

/// Validate that `value` is a well-formed hex-encoded SHA-512 digest.
fn validate_sha512(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(MetadataError::InvalidSha512Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(MetadataError::InvalidSha512Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(MetadataError::InvalidSha512Digest {
            reason: "digest must be lowercase".to_owned(),
        });
    }
    Ok(())
}
