//! Intel HEX (type-00 records only) loader (spec.md §6).
//!
//! Parsing is deliberately naive, matching the reference loader: fixed
//! column offsets, no checksum verification, and silent skipping of any
//! line that isn't a well-formed type-00 data record. A file that parses to
//! zero bytes is not an error here — the caller decides what to do with an
//! empty image.

use std::io::Read;
use std::path::Path;

use itertools::Itertools;
use log::{debug, warn};

use crate::error::HexError;
use crate::image::Image;

/// Load an Intel HEX file's type-00 records into `image`, starting each
/// record's bytes at its own load-address field (not accumulated).
pub fn load_into(path: &Path, image: &mut Image) -> Result<(), HexError> {
    let mut file = std::fs::File::open(path).map_err(|source| HexError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| HexError::Open {
            path: path.display().to_string(),
            source,
        })?;

    let mut records = 0;
    for line in contents.lines() {
        if load_record(line, image) {
            records += 1;
        }
    }
    debug!("loaded {} Intel HEX data records from {}", records, path.display());
    Ok(())
}

/// Parse and apply one line if it's a well-formed type-00 record. Returns
/// `false` (and logs, rather than erroring) for anything else: blank lines,
/// EOF records, extended-address records, and malformed lines are all
/// silently skipped, matching the reference loader's behavior.
fn load_record(line: &str, image: &mut Image) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    if !line.starts_with(':') {
        return false;
    }
    let body = &line[1..];
    // byte_count(2) + address(4) + type(2) + checksum(2) == 10 hex chars of
    // overhead; a data record needs strictly more than that (at least one
    // data byte), in an even length.
    if body.len() <= 10 || body.len() % 2 != 0 {
        warn!("skipping malformed HEX record: {:?}", line);
        return false;
    }

    let byte_count = match u8::from_str_radix(&body[0..2], 16) {
        Ok(v) => v as usize,
        Err(_) => return false,
    };
    let address = match u16::from_str_radix(&body[2..6], 16) {
        Ok(v) => v,
        Err(_) => return false,
    };
    let record_type = match u8::from_str_radix(&body[6..8], 16) {
        Ok(v) => v,
        Err(_) => return false,
    };
    if record_type != 0x00 {
        return false;
    }

    let data_chars = &body[8..];
    if data_chars.len() < byte_count * 2 {
        warn!("skipping truncated HEX record: {:?}", line);
        return false;
    }

    let mut offset = address as usize;
    for mut pair in &data_chars[..byte_count * 2].chars().chunks(2) {
        let hi = pair.next().unwrap();
        let lo = pair.next().unwrap();
        let Ok(byte) = u8::from_str_radix(&format!("{hi}{lo}"), 16) else {
            return false;
        };
        image.store_byte(offset, byte);
        offset += 1;
    }
    true
}
