use std::io::Read;

use anyhow::Context;
use flate2::read::{GzDecoder, ZlibDecoder};

/// Normalize a raw response body into text according to its
/// `Content-Encoding`. The transport pins `Accept-Encoding` itself, so
/// nothing upstream has decompressed the stream for us.
///
/// A decoder failure is recoverable for the run: the caller aborts only the
/// probe that hit it.
pub fn decode_body(content_encoding: Option<&str>, raw: &[u8]) -> anyhow::Result<String> {
    let encoding = content_encoding.map(|e| e.trim().to_ascii_lowercase());
    let bytes = match encoding.as_deref() {
        Some("gzip") => {
            let mut buf = Vec::new();
            GzDecoder::new(raw)
                .read_to_end(&mut buf)
                .context("decompressing gzip body")?;
            buf
        }
        Some("deflate") => {
            let mut buf = Vec::new();
            ZlibDecoder::new(raw)
                .read_to_end(&mut buf)
                .context("decompressing deflate body")?;
            buf
        }
        Some("br") => {
            let mut buf = Vec::new();
            brotli::Decompressor::new(raw, 4096)
                .read_to_end(&mut buf)
                .context("decompressing brotli body")?;
            buf
        }
        // identity or an encoding we never advertised: pass through
        _ => raw.to_vec(),
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn identity_passes_through() {
        let text = decode_body(None, b"plain body").unwrap();
        assert_eq!(text, "plain body");
    }

    #[test]
    fn unknown_encoding_passes_through() {
        let text = decode_body(Some("zstd"), b"opaque").unwrap();
        assert_eq!(text, "opaque");
    }

    #[test]
    fn gzip_body_is_decompressed() {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(b"user not found").unwrap();
        let compressed = enc.finish().unwrap();
        assert_eq!(decode_body(Some("gzip"), &compressed).unwrap(), "user not found");
    }

    #[test]
    fn deflate_body_is_decompressed() {
        let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(b"Welcome ghost123!").unwrap();
        let compressed = enc.finish().unwrap();
        assert_eq!(decode_body(Some("deflate"), &compressed).unwrap(), "Welcome ghost123!");
    }

    #[test]
    fn brotli_body_is_decompressed() {
        let mut compressed = Vec::new();
        {
            let mut enc = brotli::CompressorWriter::new(&mut compressed, 4096, 5, 22);
            enc.write_all(b"profile-avatar").unwrap();
        }
        assert_eq!(decode_body(Some("br"), &compressed).unwrap(), "profile-avatar");
    }

    #[test]
    fn corrupt_stream_is_an_error() {
        assert!(decode_body(Some("gzip"), b"definitely not gzip").is_err());
    }
}
