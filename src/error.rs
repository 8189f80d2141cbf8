use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// In particular this means that use of Internal is never a guarantee
    /// the error is not, for example, due to a user error - merely that it
    /// cannot be confidently determined by the code.
    Internal,

    /// The user provided invalid input or performed an action that is
    /// unsupported or impossible to complete.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The private-key text is missing its BEGIN/END delimiter lines or is
    /// otherwise not shaped like a key block.
    KeyArmorInvalid,
    /// Base64 decoding of the private-key body failed.
    KeyArmorDecode,
    /// The decoded key bytes are not a valid PKCS#8 private key.
    KeyStructureInvalid,
    /// Base64 decoding of the ciphertext text failed, or it was empty.
    CiphertextDecode,
    /// The message exceeds the OAEP capacity of the key.
    MessageTooLong,
    /// The crypto provider rejected the encryption operation.
    EncryptionFailed,
    /// Decryption failed: wrong key, or altered/truncated/mismatched
    /// ciphertext.
    DecryptionFailed,
    /// Key generation failed (RNG or provider failure).
    ProviderUnavailable,
    /// A submit was attempted while a previous result or operation was
    /// still held by the session.
    Busy,
    /// Interaction with the filesystem, stdin/stdout, the clipboard, or
    /// other I/O failed.
    Io,
}

impl ErrorKind {
    /// Short stable label used when reporting errors to the user, so that
    /// import, decrypt, and provider failures are distinguishable.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::KeyArmorInvalid => "key-armor-invalid",
            ErrorKind::KeyArmorDecode => "key-armor-decode",
            ErrorKind::KeyStructureInvalid => "key-structure-invalid",
            ErrorKind::CiphertextDecode => "ciphertext-decode",
            ErrorKind::MessageTooLong => "message-too-long",
            ErrorKind::EncryptionFailed => "encryption-failed",
            ErrorKind::DecryptionFailed => "decryption-failed",
            ErrorKind::ProviderUnavailable => "provider-unavailable",
            ErrorKind::Busy => "busy",
            ErrorKind::Io => "io",
        }
    }
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct SealnoteError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl SealnoteError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that retains the originating source error.
    pub fn with_source(
        category: ErrorCategory,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: None,
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SealnoteError>;
