pub(crate) mod bytes;
pub(crate) mod float;
pub(crate) mod int;

pub(crate) mod utf16 {
    use std::{borrow::Cow, io};

    const UTF32BE_BOM: &[u8] = &[0xFF, 0xFE, 00, 00];
    const UTF32LE_BOM: &[u8] = &[00, 00, 0xFE, 0xFF];
    const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];
    const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
    const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

    /// Converts OBJ/MTL bytes to text.
    ///
    /// UTF-16 with BOM is transcoded, a UTF-8 BOM is stripped, and anything
    /// else is read as UTF-8 with invalid sequences replaced, since exporters
    /// routinely put Latin-1 names into otherwise ASCII files.
    pub(crate) fn decode_text(bytes: &[u8]) -> io::Result<Cow<'_, str>> {
        if bytes.starts_with(UTF8_BOM) {
            Ok(String::from_utf8_lossy(&bytes[UTF8_BOM.len()..]))
        } else if bytes.starts_with(UTF32BE_BOM) || bytes.starts_with(UTF32LE_BOM) {
            bail!("utf-32 is not supported")
        } else if bytes.starts_with(UTF16BE_BOM) {
            from_utf16(&bytes[UTF16BE_BOM.len()..], u16::from_be_bytes).map(Cow::Owned)
        } else if bytes.starts_with(UTF16LE_BOM) {
            from_utf16(&bytes[UTF16LE_BOM.len()..], u16::from_le_bytes).map(Cow::Owned)
        } else {
            Ok(String::from_utf8_lossy(bytes))
        }
    }

    #[cold]
    #[inline(never)]
    fn from_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> io::Result<String> {
        if bytes.len() % 2 != 0 {
            bail!("invalid utf-16: truncated code unit");
        }
        char::decode_utf16(bytes.chunks_exact(2).map(|b| unit([b[0], b[1]])))
            .collect::<Result<String, _>>()
            .map_err(crate::error::invalid_data)
    }

}
