//! Content fingerprint of a discovered plugin set.

use crate::capability::domain::{CapabilityName, Locator};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest over the sorted `(name, locator, version)` triples of a
/// registry.
///
/// Two discovery passes that yield the same fingerprint registered the same
/// plugins, so the second pass can leave every cache untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiscoveryFingerprint([u8; 32]);

impl DiscoveryFingerprint {
    /// Computes the fingerprint of the given triples in any order.
    #[must_use]
    pub fn compute<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a CapabilityName, &'a Locator, &'a str)>,
    {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort_unstable();

        let mut hasher = Sha256::new();
        for (name, locator, version) in sorted {
            for field in [name.as_str(), locator.as_str(), version] {
                hasher.update(field.as_bytes());
                hasher.update([0_u8]);
            }
            hasher.update([b'\n']);
        }
        Self(hasher.finalize().into())
    }

    /// Returns the raw digest.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for DiscoveryFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
