//! Helpers for the base64 PNG returned as `qr_base64`.

use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::QrError;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Inline image source for the payload, as rendered on the display screen.
pub fn data_uri(qr_base64: &str) -> String {
    format!("data:image/png;base64,{qr_base64}")
}

pub fn decode_png(qr_base64: &str) -> Result<Vec<u8>, QrError> {
    let compact: String = qr_base64.split_whitespace().collect();
    let bytes = STANDARD.decode(compact)?;
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(QrError::NotPng);
    }
    Ok(bytes)
}

/// Decodes the payload and writes it to `path`, returning the number of bytes written.
pub fn write_png(qr_base64: &str, path: &Path) -> Result<usize, QrError> {
    let bytes = decode_png(qr_base64)?;
    fs::write(path, &bytes).map_err(|source| QrError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.len())
}

#[cfg(test)]
#[path = "tests/qr_tests.rs"]
mod tests;
