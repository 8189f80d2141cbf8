//! Explicit state machine for the encrypt/decrypt workflow
//!
//! A [`Session`] owns all transient state of one user-facing workflow: the
//! current phase, the produced text blocks, and nothing else. State changes
//! only through the defined actions ([`Session::submit_encrypt`],
//! [`Session::submit_decrypt`], [`Session::reset`]); there are no globals.
//!
//! Operations are synchronous and single-flight: a submit is accepted only
//! from [`Phase::Idle`], so a pending or completed operation must be reset
//! before the next attempt. A failure lands in [`Phase::Failed`], never in
//! a wedged "processing" state.

use crate::cipher;
use crate::error::{ErrorCategory, ErrorKind, Result, SealnoteError};
use crate::keycodec::{self, DEFAULT_KEY_BITS};
use zeroize::Zeroizing;

/// The two text blocks handed to the user after encryption.
pub struct EncryptedNote {
    /// Private key in PEM-like form. Zeroized on drop.
    pub private_key_pem: Zeroizing<String>,
    /// Ciphertext as a single base64 line.
    pub ciphertext: String,
}

impl std::fmt::Debug for EncryptedNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedNote")
            .field("private_key_pem", &"[REDACTED]")
            .field("ciphertext", &self.ciphertext)
            .finish()
    }
}

/// Workflow phase.
#[derive(Debug)]
pub enum Phase {
    Idle,
    Generating,
    Encrypted(EncryptedNote),
    Decrypting,
    Decrypted(String),
    Failed {
        kind: Option<ErrorKind>,
        message: String,
    },
}

/// One encrypt-or-decrypt workflow.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    key_bits: usize,
}

impl Session {
    /// New idle session using the default key size.
    pub fn new() -> Self {
        Self::with_key_bits(DEFAULT_KEY_BITS)
    }

    /// New idle session with a caller-chosen key size. The size is
    /// validated when encryption is submitted.
    pub fn with_key_bits(key_bits: usize) -> Self {
        Self {
            phase: Phase::Idle,
            key_bits,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// True while an operation is outstanding.
    pub fn in_progress(&self) -> bool {
        matches!(self.phase, Phase::Generating | Phase::Decrypting)
    }

    /// Encrypt a message under a freshly generated key pair.
    ///
    /// Generates the pair, encrypts under the public key, exports the
    /// private key to text, and discards the public key. On success the
    /// session is in [`Phase::Encrypted`] and the produced note is
    /// returned; on failure it is in [`Phase::Failed`] and the error is
    /// propagated.
    pub fn submit_encrypt(&mut self, message: &str) -> Result<&EncryptedNote> {
        self.require_idle()?;
        if message.is_empty() {
            return Err(SealnoteError::new(
                ErrorCategory::User,
                "message to encrypt is empty",
            ));
        }

        self.phase = Phase::Generating;
        match encrypt_once(self.key_bits, message) {
            Ok(note) => {
                self.phase = Phase::Encrypted(note);
                match &self.phase {
                    Phase::Encrypted(note) => Ok(note),
                    _ => unreachable!(),
                }
            }
            Err(e) => {
                self.phase = Phase::Failed {
                    kind: e.kind,
                    message: e.message().to_string(),
                };
                Err(e)
            }
        }
    }

    /// Decrypt a ciphertext with a pasted private key.
    ///
    /// On success the session is in [`Phase::Decrypted`] and the recovered
    /// message is returned; on failure it is in [`Phase::Failed`].
    pub fn submit_decrypt(&mut self, key_text: &str, ciphertext_text: &str) -> Result<&str> {
        self.require_idle()?;
        if key_text.trim().is_empty() {
            return Err(SealnoteError::new(
                ErrorCategory::User,
                "private key text is empty",
            ));
        }
        if ciphertext_text.trim().is_empty() {
            return Err(SealnoteError::new(
                ErrorCategory::User,
                "ciphertext text is empty",
            ));
        }

        self.phase = Phase::Decrypting;
        match decrypt_once(key_text, ciphertext_text) {
            Ok(message) => {
                self.phase = Phase::Decrypted(message);
                match &self.phase {
                    Phase::Decrypted(message) => Ok(message),
                    _ => unreachable!(),
                }
            }
            Err(e) => {
                self.phase = Phase::Failed {
                    kind: e.kind,
                    message: e.message().to_string(),
                };
                Err(e)
            }
        }
    }

    /// Return to [`Phase::Idle`] from any phase, discarding all key and
    /// message state. Key text is zeroized on drop.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    fn require_idle(&self) -> Result<()> {
        match self.phase {
            Phase::Idle => Ok(()),
            _ => Err(SealnoteError::with_kind(
                ErrorCategory::User,
                ErrorKind::Busy,
                "an operation result is pending; reset before submitting again",
            )),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn encrypt_once(key_bits: usize, message: &str) -> Result<EncryptedNote> {
    let pair = keycodec::generate_keypair_with_bits(key_bits)?;
    let ciphertext = cipher::encrypt(&pair.public, message.as_bytes())?;
    let private_key_pem = keycodec::export_private_key(&pair.private)?;
    // pair (and with it the public key) drops here; nothing retains it.
    Ok(EncryptedNote {
        private_key_pem,
        ciphertext: crate::armor::wrap_ciphertext(&ciphertext),
    })
}

fn decrypt_once(key_text: &str, ciphertext_text: &str) -> Result<String> {
    let private = keycodec::import_private_key(key_text)?;
    let ciphertext = crate::armor::unwrap_ciphertext(ciphertext_text)?;
    let plaintext = cipher::decrypt(&private, &ciphertext)?;
    String::from_utf8(plaintext).map_err(|e| {
        SealnoteError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::DecryptionFailed,
            "decrypted bytes are not valid UTF-8",
            e,
        )
    })
}
