use crate::error::AwrSheetError;
use encoding_rs::Encoding;
use encoding_rs::EUC_KR;
use encoding_rs::UTF_8;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),
}

/// Text loaded from disk together with the encoding it was decoded with.
#[derive(Debug)]
pub struct DecodedText {
    /// Decoded file content
    pub text: String,
    /// Encoding that produced `text`
    pub encoding: &'static Encoding,
    /// True when malformed sequences were replaced during decoding
    pub lossy: bool,
}

/// Reads a whole file and decodes it.
///
/// Decoding order: the forced `label` if given, then a byte-order mark,
/// then strict UTF-8, falling back to EUC-KR (SQL*Plus spools on Korean
/// systems are written in the client code page).
pub fn read_text(path: &Path, label: Option<&str>) -> Result<DecodedText, AwrSheetError> {
    let bytes = fs::read(path)?;
    let decoded = decode(&bytes, label)?;
    debug!(
        path = %path.display(),
        encoding = decoded.encoding.name(),
        lossy = decoded.lossy,
        "decoded text file"
    );
    Ok(decoded)
}

/// Decodes raw bytes using the rules of [`read_text`].
pub fn decode(bytes: &[u8], label: Option<&str>) -> Result<DecodedText, AwrSheetError> {
    if let Some(label) = label {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ReaderError::UnknownEncoding(label.to_owned()))?;
        let (text, lossy) = encoding.decode_with_bom_removal(bytes);
        return Ok(DecodedText { text: text.into_owned(), encoding, lossy });
    }

    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, lossy) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return Ok(DecodedText { text: text.into_owned(), encoding, lossy });
    }

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return Ok(DecodedText { text: text.into_owned(), encoding: UTF_8, lossy: false });
    }

    let (text, lossy) = EUC_KR.decode_without_bom_handling(bytes);
    Ok(DecodedText { text: text.into_owned(), encoding: EUC_KR, lossy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn decode_plain_utf8() {
        let decoded = decode("SQL&gt; rem [load]".as_bytes(), None).unwrap();
        assert_eq!(decoded.encoding, UTF_8);
        assert_eq!(decoded.text, "SQL&gt; rem [load]");
        assert!(!decoded.lossy);
    }

    #[test]
    fn decode_utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("abc".as_bytes());
        let decoded = decode(&bytes, None).unwrap();
        assert_eq!(decoded.text, "abc");
    }

    #[test]
    fn decode_falls_back_to_euc_kr() {
        let (bytes, _, _) = EUC_KR.encode("부하 분석");
        let decoded = decode(&bytes, None).unwrap();
        assert_eq!(decoded.encoding, EUC_KR);
        assert_eq!(decoded.text, "부하 분석");
    }

    #[test]
    fn decode_with_forced_label() {
        let decoded = decode(b"caf\xe9", Some("latin1")).unwrap();
        assert_eq!(decoded.text, "café");
    }

    #[test]
    fn decode_with_unknown_label() {
        let result = decode(b"abc", Some("no-such-charset"));
        assert!(matches!(
            result,
            Err(AwrSheetError::ReaderError(ReaderError::UnknownEncoding(_)))
        ));
    }

    #[test]
    fn read_text_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("<table></table>".as_bytes()).unwrap();
        let decoded = read_text(file.path(), None).unwrap();
        assert_eq!(decoded.text, "<table></table>");
    }

    #[test]
    fn read_text_missing_file() {
        let result = read_text(Path::new("no_such_report.html"), None);
        assert!(matches!(result, Err(AwrSheetError::IoError(_))));
    }
}
