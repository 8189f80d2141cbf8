//! Reading pasted private-key text from various sources

use crate::armor::{PEM_FOOTER, PEM_HEADER};
use crate::error::{ErrorCategory, ErrorKind, Result, SealnoteError};
use std::io::BufRead;
use zeroize::Zeroizing;

/// Trait for obtaining private-key text from various sources
pub trait KeyTextReader {
    /// Read a private-key text block.
    ///
    /// Returns the text wrapped in `Zeroizing` to ensure it is securely
    /// wiped from memory when dropped.
    fn read_key_text(&mut self) -> Result<Zeroizing<String>>;
}

/// Returns fixed key text (for testing and pre-read input)
pub struct ConstantKeyTextReader {
    text: Zeroizing<String>,
}

impl ConstantKeyTextReader {
    pub fn new(text: String) -> Self {
        Self {
            text: Zeroizing::new(text),
        }
    }
}

impl KeyTextReader for ConstantKeyTextReader {
    fn read_key_text(&mut self) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new((*self.text).clone()))
    }
}

/// Reads key text from a file on disk
pub struct FileKeyTextReader {
    path: std::path::PathBuf,
}

impl FileKeyTextReader {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KeyTextReader for FileKeyTextReader {
    fn read_key_text(&mut self) -> Result<Zeroizing<String>> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            let category = if e.kind() == std::io::ErrorKind::NotFound {
                ErrorCategory::User
            } else {
                ErrorCategory::Internal
            };
            SealnoteError::with_kind_and_source(
                category,
                ErrorKind::Io,
                format!("failed to read key from {}", self.path.display()),
                e,
            )
        })?;
        Ok(Zeroizing::new(text))
    }
}

/// Read a key block line by line until the END delimiter line (or EOF).
///
/// A key block pasted into a terminal spans many lines, so a single
/// `read_line` cannot capture it; lines are accumulated until the footer
/// appears. Lines before the header are skipped, so a paste with leading
/// prompt noise still imports.
pub fn read_key_text_lines(reader: &mut dyn BufRead) -> Result<Zeroizing<String>> {
    let mut text = Zeroizing::new(String::new());
    let mut line = Zeroizing::new(String::new());
    let mut seen_header = false;

    loop {
        line.clear();
        let n = reader.read_line(&mut line).map_err(|e| {
            SealnoteError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading key text: {}", e),
                e,
            )
        })?;
        if n == 0 {
            break;
        }

        let stripped = line.trim();
        if !seen_header {
            if !stripped.starts_with(PEM_HEADER) {
                continue;
            }
            seen_header = true;
        }
        text.push_str(&line);
        if stripped.ends_with(PEM_FOOTER) {
            break;
        }
    }

    if text.is_empty() {
        return Err(SealnoteError::with_kind(
            ErrorCategory::User,
            ErrorKind::KeyArmorInvalid,
            format!("no '{}' line found in input", PEM_HEADER),
        ));
    }
    Ok(text)
}

/// Split a combined paste into (key text, ciphertext text).
///
/// The split point is the END delimiter line: everything up to and
/// including it is the key block, everything after it is the ciphertext.
pub fn split_pasted_input(text: &str) -> Result<(Zeroizing<String>, String)> {
    let Some(footer_start) = text.find(PEM_FOOTER) else {
        return Err(SealnoteError::with_kind(
            ErrorCategory::User,
            ErrorKind::KeyArmorInvalid,
            format!("combined input has no '{}' line", PEM_FOOTER),
        ));
    };
    let split = footer_start + PEM_FOOTER.len();
    let key_text = Zeroizing::new(text[..split].to_string());
    let ciphertext = text[split..].trim().to_string();
    if ciphertext.is_empty() {
        return Err(SealnoteError::with_kind(
            ErrorCategory::User,
            ErrorKind::CiphertextDecode,
            "no ciphertext found after the key block",
        ));
    }
    Ok((key_text, ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::armor;

    fn sample_key_text() -> String {
        armor::wrap_private_key(b"pretend key material")
    }

    #[test]
    fn test_constant_reader() {
        let mut reader = ConstantKeyTextReader::new("key text".to_string());
        assert_eq!(&*reader.read_key_text().unwrap(), "key text");
        assert_eq!(&*reader.read_key_text().unwrap(), "key text");
    }

    #[test]
    fn test_file_reader() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("note.key");
        std::fs::write(&path, sample_key_text()).unwrap();

        let mut reader = FileKeyTextReader::new(&path);
        assert_eq!(&*reader.read_key_text().unwrap(), &sample_key_text());
    }

    #[test]
    fn test_file_reader_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut reader = FileKeyTextReader::new(dir.path().join("absent.key"));
        let err = reader.read_key_text().expect_err("expected read failure");
        assert_eq!(err.category, ErrorCategory::User);
        assert_eq!(err.kind, Some(ErrorKind::Io));
    }

    #[test]
    fn test_read_key_text_lines() {
        let key = sample_key_text();
        let input = format!("{}trailing junk\n", key);
        let mut cursor = std::io::Cursor::new(input);
        let text = read_key_text_lines(&mut cursor).unwrap();
        assert_eq!(&*text, &key);
    }

    #[test]
    fn test_read_key_text_lines_skips_leading_noise() {
        let key = sample_key_text();
        let input = format!("paste your key:\n\n{}", key);
        let mut cursor = std::io::Cursor::new(input);
        let text = read_key_text_lines(&mut cursor).unwrap();
        assert_eq!(&*text, &key);
    }

    #[test]
    fn test_read_key_text_lines_no_header() {
        let mut cursor = std::io::Cursor::new("no key block here\n");
        let err = read_key_text_lines(&mut cursor).expect_err("expected no-header error");
        assert_eq!(err.kind, Some(ErrorKind::KeyArmorInvalid));
    }

    #[test]
    fn test_read_key_text_lines_missing_footer_hits_eof() {
        let key = sample_key_text();
        let truncated = key.replace(armor::PEM_FOOTER, "");
        let mut cursor = std::io::Cursor::new(truncated.clone());
        // Reading stops at EOF; the armor layer rejects the result.
        let text = read_key_text_lines(&mut cursor).unwrap();
        assert!(armor::unwrap_private_key(&text).is_err());
    }

    #[test]
    fn test_split_pasted_input() {
        let key = sample_key_text();
        let combined = format!("{}\nY2lwaGVydGV4dA==\n", key);
        let (key_text, ciphertext) = split_pasted_input(&combined).unwrap();
        assert!(key_text.contains(armor::PEM_HEADER));
        assert!(key_text.trim_end().ends_with(armor::PEM_FOOTER));
        assert_eq!(ciphertext, "Y2lwaGVydGV4dA==");
    }

    #[test]
    fn test_split_pasted_input_no_footer() {
        let err = split_pasted_input("just ciphertext").expect_err("expected no-footer error");
        assert_eq!(err.kind, Some(ErrorKind::KeyArmorInvalid));
    }

    #[test]
    fn test_split_pasted_input_no_ciphertext() {
        let key = sample_key_text();
        let err = split_pasted_input(&key).expect_err("expected missing ciphertext error");
        assert_eq!(err.kind, Some(ErrorKind::CiphertextDecode));
    }
}
