use std::path::Path;

use anyhow::{anyhow, bail, Result};
use tracing::debug;

use crate::error::ScanError;
use crate::models::Dependency;

/// Read `requirements.txt` and extract its pinned dependencies, in file order.
pub fn read(path: &Path) -> Result<Vec<Dependency>, ScanError> {
    let bytes = std::fs::read(path).map_err(|e| ScanError::from_io(path, e))?;
    let text = decode(&bytes)?;
    Ok(extract_pins(&text)?)
}

/// Decode the whole file as UTF-8, falling back to UTF-16 for the whole file.
fn decode(bytes: &[u8]) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string()),
        Err(utf8_err) => {
            debug!(error = %utf8_err, "requirements file is not UTF-8, retrying as UTF-16");
            decode_utf16(bytes)
        }
    }
}

/// UTF-16 with byte-order mark detection; little-endian when there is none.
fn decode_utf16(bytes: &[u8]) -> Result<String> {
    let (body, big_endian) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        _ => (bytes, false),
    };

    if body.len() % 2 != 0 {
        bail!("cannot decode file as UTF-16: truncated data ({} bytes)", bytes.len());
    }

    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| anyhow!("cannot decode file as UTF-16: {}", e))
}

/// Extract `name==version` pins.
///
/// A line counts only if it contains `==` and no `#` anywhere. A counted line
/// must split into exactly one name and one version. A second `==` or an empty
/// side (`==1.0`, `flask==`) is a malformed pin and fails the whole read.
pub fn extract_pins(text: &str) -> Result<Vec<Dependency>> {
    let mut deps = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if !line.contains("==") || line.contains('#') {
            if !line.trim().is_empty() {
                debug!(line = idx + 1, "skipping unpinned or commented line");
            }
            continue;
        }

        let parts: Vec<&str> = line.trim().split("==").map(str::trim).collect();
        match parts.as_slice() {
            [name, version] if !name.is_empty() && !version.is_empty() => {
                deps.push(Dependency::new(*name, *version));
            }
            _ => bail!(
                "malformed pin on line {}: `{}` (expected `name==version`)",
                idx + 1,
                line.trim()
            ),
        }
    }

    Ok(deps)
}
