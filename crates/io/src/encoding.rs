// Text encodings for review input and CSV output

use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};

use storelens_analysis::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputEncoding {
    /// UTF-8 when the bytes are valid UTF-8, Shift_JIS otherwise.
    #[default]
    Auto,
    Utf8,
    ShiftJis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    Utf8,
    /// Legacy Japanese encoding spreadsheet tools open without an import dialog.
    ShiftJis,
}

impl OutputEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::ShiftJis => SHIFT_JIS,
        }
    }
}

impl std::fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.encoding().name())
    }
}

/// Read a whole input file as text.
///
/// Malformed byte sequences become U+FFFD rather than failing the read, so a
/// single bad review does not abort the run.
pub fn read_input(path: &Path, encoding: InputEncoding) -> Result<String, AnalysisError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| AnalysisError::Io(format!("cannot open {}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| AnalysisError::Io(format!("cannot read {}: {e}", path.display())))?;
    Ok(decode(bytes, encoding))
}

pub fn decode(bytes: Vec<u8>, encoding: InputEncoding) -> String {
    match encoding {
        InputEncoding::Auto => match String::from_utf8(bytes) {
            Ok(s) => strip_bom(s),
            Err(e) => {
                // Not UTF-8; Shift_JIS only when it decodes cleanly (common for Excel exports)
                let bytes = e.into_bytes();
                let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
                if !had_errors {
                    return decoded.into_owned();
                }
                // Corrupt UTF-8: keep the good rows, only the bad bytes become U+FFFD
                log::warn!("input contains invalid UTF-8; undecodable bytes replaced");
                let (decoded, _, _) = UTF_8.decode(&bytes);
                decoded.into_owned()
            }
        },
        InputEncoding::Utf8 => {
            // decode() also strips a UTF-8 BOM
            let (decoded, _, had_errors) = UTF_8.decode(&bytes);
            if had_errors {
                log::warn!("input contains invalid UTF-8; undecodable bytes replaced");
            }
            decoded.into_owned()
        }
        InputEncoding::ShiftJis => {
            let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
            if had_errors {
                log::warn!("input contains invalid Shift_JIS; undecodable bytes replaced");
            }
            decoded.into_owned()
        }
    }
}

fn strip_bom(s: String) -> String {
    match s.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

/// Encode text for output, failing on the first character the target cannot represent.
pub fn encode(text: &str, encoding: OutputEncoding) -> Result<Vec<u8>, AnalysisError> {
    let target = encoding.encoding();
    let (bytes, _, had_errors) = target.encode(text);
    if !had_errors {
        return Ok(bytes.into_owned());
    }

    let mut buf = [0u8; 4];
    let bad = text
        .chars()
        .find(|c| target.encode(c.encode_utf8(&mut buf)).2)
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Err(AnalysisError::Output(format!(
        "character '{bad}' (U+{:04X}) cannot be encoded as {encoding}",
        bad as u32
    )))
}
