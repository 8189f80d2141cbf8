//! One-shot public-key encryption of short notes.
//!
//! Encrypting a note generates a fresh RSA key pair, encrypts the note
//! under the public key with OAEP/SHA-256, discards the public key, and
//! hands back two text blocks: the base64 ciphertext and the PEM-like
//! private key. Decryption takes both blocks pasted back. Nothing is
//! persisted; whoever holds the key text holds the note.

pub mod armor;
pub mod cipher;
pub mod clipboard;
pub mod commands;
pub mod error;
pub mod keycodec;
pub mod keytext;
pub mod session;
