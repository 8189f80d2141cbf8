//! Message encryption and decryption using RSA-OAEP
//!
//! The padding scheme is OAEP with SHA-256, matching the key parameters in
//! [`crate::keycodec`]. Message capacity is bounded by the modulus: a
//! k-byte modulus carries at most k - 66 bytes of message (2*32 for the
//! SHA-256 digests plus 2).

use crate::error::{ErrorCategory, ErrorKind, Result, SealnoteError};
use crate::keycodec::{PrivateKey, PublicKey};
use rsa::Oaep;
use rsa::rand_core::OsRng;
use sha2::Sha256;

/// OAEP overhead in bytes for a SHA-256 digest: 2*hLen + 2.
const OAEP_OVERHEAD: usize = 2 * 32 + 2;

/// Largest message, in bytes, that can be encrypted under `public`.
pub fn max_message_len(public: &PublicKey) -> usize {
    public.modulus_len().saturating_sub(OAEP_OVERHEAD)
}

/// Encrypt a message under a public key.
///
/// The ciphertext length equals the modulus length. Messages longer than
/// [`max_message_len`] are rejected before the provider is invoked.
pub fn encrypt(public: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let capacity = max_message_len(public);
    if plaintext.len() > capacity {
        return Err(SealnoteError::with_kind(
            ErrorCategory::User,
            ErrorKind::MessageTooLong,
            format!(
                "message is {} bytes but this key can encrypt at most {} bytes",
                plaintext.len(),
                capacity
            ),
        ));
    }

    let mut rng = OsRng;
    public
        .inner()
        .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| {
            SealnoteError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::EncryptionFailed,
                format!("encryption failed: {}", e),
                e,
            )
        })
}

/// Decrypt a ciphertext under a private key.
///
/// Fails when the key does not match the ciphertext or the ciphertext was
/// altered or truncated; OAEP cannot distinguish those cases.
pub fn decrypt(private: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    private
        .inner()
        .decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|e| {
            SealnoteError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::DecryptionFailed,
                "decryption failed: wrong key, or altered or truncated ciphertext",
                e,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycodec::{KeyPair, MIN_KEY_BITS, generate_keypair_with_bits};

    fn test_keypair() -> &'static KeyPair {
        static PAIR: std::sync::OnceLock<KeyPair> = std::sync::OnceLock::new();
        PAIR.get_or_init(|| generate_keypair_with_bits(MIN_KEY_BITS).unwrap())
    }

    #[test]
    fn test_roundtrip() {
        let pair = test_keypair();
        let plaintext = b"a short note";
        let ciphertext = encrypt(&pair.public, plaintext).unwrap();
        assert_eq!(ciphertext.len(), pair.public.modulus_len());
        let decrypted = decrypt(&pair.private, &ciphertext).unwrap();
        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_empty_message() {
        let pair = test_keypair();
        let ciphertext = encrypt(&pair.public, b"").unwrap();
        let decrypted = decrypt(&pair.private, &ciphertext).unwrap();
        assert_eq!(decrypted, b"");
    }

    #[test]
    fn test_encryption_is_randomized() {
        let pair = test_keypair();
        let ct1 = encrypt(&pair.public, b"same message").unwrap();
        let ct2 = encrypt(&pair.public, b"same message").unwrap();
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn test_capacity_boundary() {
        let pair = test_keypair();
        let capacity = max_message_len(&pair.public);
        assert_eq!(capacity, pair.public.modulus_len() - 66);

        let at_capacity = vec![0x42u8; capacity];
        let ciphertext = encrypt(&pair.public, &at_capacity).unwrap();
        let decrypted = decrypt(&pair.private, &ciphertext).unwrap();
        assert_eq!(at_capacity, decrypted);

        let over_capacity = vec![0x42u8; capacity + 1];
        let err = encrypt(&pair.public, &over_capacity).expect_err("expected capacity error");
        assert_eq!(err.kind, Some(ErrorKind::MessageTooLong));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let pair = test_keypair();
        let mut ciphertext = encrypt(&pair.public, b"tamper me").unwrap();
        let mid = ciphertext.len() / 2;
        ciphertext[mid] ^= 0xFF;
        let err = decrypt(&pair.private, &ciphertext).expect_err("expected decryption failure");
        assert_eq!(err.kind, Some(ErrorKind::DecryptionFailed));
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let pair = test_keypair();
        let ciphertext = encrypt(&pair.public, b"truncate me").unwrap();
        let err = decrypt(&pair.private, &ciphertext[..ciphertext.len() - 1])
            .expect_err("expected decryption failure");
        assert_eq!(err.kind, Some(ErrorKind::DecryptionFailed));
    }

    #[test]
    fn test_wrong_key_fails() {
        let pair = test_keypair();
        let other = generate_keypair_with_bits(MIN_KEY_BITS).unwrap();
        let ciphertext = encrypt(&pair.public, b"secret").unwrap();
        let err = decrypt(&other.private, &ciphertext).expect_err("expected decryption failure");
        assert_eq!(err.kind, Some(ErrorKind::DecryptionFailed));
    }
}
