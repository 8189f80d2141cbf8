//! Key pair generation, export, and import
//!
//! Keys are RSA, generated fresh per encryption and never persisted by this
//! crate. The private key travels to and from the user as a PEM-like text
//! block (PKCS#8 DER, base64, BEGIN/END delimiter lines); the public key is
//! used once to encrypt and then discarded.

use crate::armor;
use crate::error::{ErrorCategory, ErrorKind, Result, SealnoteError};
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use rsa::rand_core::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

/// Default modulus size in bits.
pub const DEFAULT_KEY_BITS: usize = 4096;

/// Smallest modulus size accepted for new keys.
pub const MIN_KEY_BITS: usize = 2048;

/// Public half of a key pair, valid for encryption only.
#[derive(Debug, Clone)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    pub(crate) fn inner(&self) -> &RsaPublicKey {
        &self.0
    }

    /// Modulus length in bytes.
    pub fn modulus_len(&self) -> usize {
        use rsa::traits::PublicKeyParts;
        self.0.size()
    }
}

/// Private half of a key pair, valid for decryption only.
///
/// The underlying key material is zeroized on drop by the rsa crate.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    pub(crate) fn inner(&self) -> &RsaPrivateKey {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// A freshly generated key pair.
#[derive(Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// Generate a key pair with the default modulus size (4096 bits).
pub fn generate_keypair() -> Result<KeyPair> {
    generate_keypair_with_bits(DEFAULT_KEY_BITS)
}

/// Generate a key pair with a caller-chosen modulus size.
///
/// Sizes below 2048 bits are rejected. Public exponent is 65537.
pub fn generate_keypair_with_bits(bits: usize) -> Result<KeyPair> {
    if bits < MIN_KEY_BITS {
        return Err(SealnoteError::new(
            ErrorCategory::User,
            format!("key size {} is below the minimum of {} bits", bits, MIN_KEY_BITS),
        ));
    }

    let mut rng = OsRng;
    let private = RsaPrivateKey::new(&mut rng, bits).map_err(|e| {
        SealnoteError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::ProviderUnavailable,
            format!("key generation failed: {}", e),
            e,
        )
    })?;
    let public = RsaPublicKey::from(&private);

    Ok(KeyPair {
        public: PublicKey(public),
        private: PrivateKey(private),
    })
}

/// Serialize a private key to its PEM-like text form.
///
/// Deterministic per key: exporting the same key twice yields the same text.
pub fn export_private_key(private: &PrivateKey) -> Result<Zeroizing<String>> {
    let der = private.0.to_pkcs8_der().map_err(|e| {
        SealnoteError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::ProviderUnavailable,
            format!("PKCS#8 encoding of private key failed: {}", e),
            e,
        )
    })?;
    Ok(Zeroizing::new(armor::wrap_private_key(der.as_bytes())))
}

/// Reconstruct a private key from its PEM-like text form.
///
/// The returned key is used for decryption only. Every malformation of the
/// input (bad delimiters, bad base64, bad PKCS#8 structure) maps to an
/// import-family error; none panic.
pub fn import_private_key(text: &str) -> Result<PrivateKey> {
    let der = armor::unwrap_private_key(text)?;
    let private = RsaPrivateKey::from_pkcs8_der(&der).map_err(|e| {
        SealnoteError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::KeyStructureInvalid,
            format!("private key bytes are not a valid PKCS#8 key: {}", e),
            e,
        )
    })?;
    Ok(PrivateKey(private))
}
