use crate::error::AppError;
use encoding_rs::{Encoding, UTF_8};

/// Decodes shell output chunks. Each chunk is decoded on its own, so a
/// multi-byte sequence split across two reads decodes lossily.
#[derive(Debug, Clone, Copy)]
pub struct OutputDecoder {
    encoding: &'static Encoding,
}

impl OutputDecoder {
    pub fn for_label(label: &str) -> Result<Self, AppError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| AppError::UnsupportedEncoding(label.to_string()))
    }

    pub fn utf8() -> Self {
        Self { encoding: UTF_8 }
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _had_errors) = self.encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }
}

impl Default for OutputDecoder {
    fn default() -> Self {
        Self::utf8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_dos_cyrillic_code_page() {
        let decoder = OutputDecoder::for_label("cp866").unwrap();
        assert_eq!(decoder.name(), "IBM866");
        let bytes = [0x8F, 0xE0, 0xA8, 0xA2, 0xA5, 0xE2];
        assert_eq!(decoder.decode(&bytes), "Привет");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let text = OutputDecoder::utf8().decode(b"ok \xff\xfe done");
        assert!(text.starts_with("ok "));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with(" done"));
    }

    #[test]
    fn unknown_label_is_an_error() {
        assert!(matches!(
            OutputDecoder::for_label("not-a-charset"),
            Err(AppError::UnsupportedEncoding(_))
        ));
    }
}
