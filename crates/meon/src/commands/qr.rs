//! Writing a QR payload to disk.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::CliError;

/// Decoded `data:` URI.
#[derive(Debug, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 `data:` URI such as `data:image/png;base64,iVBOR...`.
pub fn decode_data_uri(payload: &str) -> Result<DataUri, CliError> {
    let invalid = |reason: &str| CliError::QrPayload {
        reason: reason.into(),
    };

    let rest = payload
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| invalid("payload is not a data URI"))?;
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| invalid("data URI has no ',' separator"))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("data URI is not base64-encoded"))?;

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| invalid(&format!("invalid base64: {e}")))?;

    Ok(DataUri {
        mime: mime.to_owned(),
        bytes,
    })
}

/// Decode `payload` and write the image bytes to `path`.
pub fn save(payload: &str, path: &Path) -> Result<DataUri, CliError> {
    let uri = decode_data_uri(payload)?;
    std::fs::write(path, &uri.bytes)?;
    Ok(uri)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_data_uri() {
        let uri = decode_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(uri.mime, "image/png");
        assert_eq!(uri.bytes, [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn rejects_non_data_uri() {
        assert!(decode_data_uri("https://example.com/qr.png").is_err());
        assert!(decode_data_uri("data:image/png,raw").is_err());
        assert!(decode_data_uri("data:image/png;base64,%%%").is_err());
    }

    #[test]
    fn save_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.png");
        save("data:image/png;base64,aGVsbG8=", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
