//! Listing emitter (spec.md §6) and the raw-hex-dump fallback used whenever
//! decoding fails (spec.md §7b): never emit a partial listing.

use std::io::Write;

use crate::image::Image;
use crate::line_table::LineTable;

/// Write a reassemblable AVR-assembler listing for a fully decoded image.
///
/// Walks every word address in order, emitting `.ORG` directives whenever
/// the previous address wasn't immediately adjacent (accounting for
/// two-word instructions, whose second word is `visited` but not itself a
/// line), a decoded instruction's mnemonic (labeled `L_<addr>:` only if some
/// other instruction named it as a target), and a `.dw` stray-data fill-in
/// — always labeled — for addresses that were never reached by the
/// traversal at all.
pub fn write_listing<W: Write>(out: &mut W, image: &Image, lines: &LineTable) -> std::io::Result<()> {
    writeln!(out, ".include \"m8def.inc\"")?;

    // Only the words the loader actually wrote are worth listing at all;
    // everything past `dump_size` is untouched 0xFF padding.
    let word_count = (image.dump_size() as u16).div_ceil(2).min(lines.len() as u16);

    let mut prev_emitted: Option<u16> = None;
    for addr in 0..word_count {
        // The 2-back case only suppresses `.ORG` when the predecessor was
        // itself a decoded instruction head (a two-word instruction whose
        // second word isn't a line of its own) — a stray-data word never
        // sets `visited`, so it can't extend a run this way.
        let adjacent = match prev_emitted {
            None => false,
            Some(prev) => {
                addr == prev.wrapping_add(1)
                    || (addr == prev.wrapping_add(2) && lines.visited(prev))
            }
        };

        if lines.decoded(addr) {
            if !adjacent {
                writeln!(out, ".ORG\t${:x}", addr)?;
            }
            let text = lines.text(addr).unwrap_or("");
            if lines.pointed(addr) {
                writeln!(out, "L_{:X}:\t{}", addr, text)?;
            } else {
                writeln!(out, "\t{}", text)?;
            }
            prev_emitted = Some(addr);
        } else if lines.visited(addr) {
            // Second word of a two-word instruction immediately preceding
            // it: already accounted for, no line of its own.
            continue;
        } else {
            // Never reached by the traversal: stray data, shown as a raw
            // word fill-in so the listing still reassembles byte-for-byte.
            // Always labeled, regardless of whether anything points at it.
            if !adjacent {
                writeln!(out, ".ORG\t${:x}", addr)?;
            }
            let word = image.word_at(addr);
            writeln!(out, "L_{:X}:\t.dw\t${:04x}", addr, word)?;
            prev_emitted = Some(addr);
        }
    }

    Ok(())
}

/// Fallback when the traversal could not decode the whole image: a plain
/// uppercase hex dump of every byte written by the loader, 16 bytes per
/// line, the same shape as the reference implementation's `print_dump`.
pub fn dump_raw_hex<W: Write>(out: &mut W, image: &Image) -> std::io::Result<()> {
    for chunk in image.bytes().chunks(16) {
        let line = chunk
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipConfig;
    use crate::decode::decode_at;

    #[test]
    fn stray_data_inside_a_decoded_region_is_skipped() {
        let chip = ChipConfig::atmega8();
        let mut image = Image::new(chip.flash_size);
        image.store_byte(0, 0x0C); // jmp 0
        image.store_byte(1, 0x94);
        image.store_byte(2, 0x00);
        image.store_byte(3, 0x00);
        let mut lines = LineTable::new(chip.flash_size);
        let decoded = decode_at(&image, 0, &chip).unwrap();
        lines.set_decoded(0, decoded.text);
        lines.mark_visited(1);
        for t in &decoded.pointed {
            lines.mark_pointed(*t);
        }

        let mut out = Vec::new();
        write_listing(&mut out, &image, &lines).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("L_0:\tjmp\tL_0"));
        assert!(!text.contains("\t.dw"));
    }

    #[test]
    fn unreached_words_inside_the_loaded_image_are_stray_data() {
        let chip = ChipConfig::atmega8();
        let mut image = Image::new(chip.flash_size);
        image.store_byte(0, 0x00); // nop
        image.store_byte(1, 0x00);
        image.store_byte(2, 0xAD); // never decoded (no chain reaches it)
        image.store_byte(3, 0xDE);
        let mut lines = LineTable::new(chip.flash_size);
        lines.set_decoded(0, "nop".to_string());

        let mut out = Vec::new();
        write_listing(&mut out, &image, &lines).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("L_1:\t.dw\t$dead"));
    }

    #[test]
    fn dump_raw_hex_is_16_bytes_per_line_uppercase() {
        let mut image = Image::new(16);
        for i in 0..20u8 {
            image.store_byte(i as usize, i);
        }
        let mut out = Vec::new();
        dump_raw_hex(&mut out, &image).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F"
        );
        assert_eq!(lines.next().unwrap(), "10 11 12 13");
    }
}
