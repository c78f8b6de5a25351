//! Flat program-image store (spec.md §3, §4.2).
//!
//! Backed by a byte buffer sized `2 * flash_size`, pre-filled `0xFF`
//! (unprogrammed), so the HEX loader can write individual bytes while the
//! decoder reads little-endian 16-bit words. `dump_size` tracks the highest
//! byte offset touched by an accepted HEX record, used for the raw-hex-dump
//! fallback on decode failure.

/// Program memory image, viewed both as bytes and as 16-bit words.
#[derive(Debug, Clone)]
pub struct Image {
    bytes: Vec<u8>,
    flash_size: usize,
    dump_size: usize,
}

impl Image {
    /// Allocate an empty (all-`0xFF`) image for a chip with `flash_size`
    /// words of flash.
    pub fn new(flash_size: usize) -> Self {
        Image {
            bytes: vec![0xFF; 2 * flash_size],
            flash_size,
            dump_size: 0,
        }
    }

    pub fn flash_size(&self) -> usize {
        self.flash_size
    }

    pub fn dump_size(&self) -> usize {
        self.dump_size
    }

    /// Write a byte at a byte offset, tracking `dump_size`. Offsets beyond
    /// the allocated image are silently ignored, mirroring how the original
    /// loader bounds its HEX records to the 64 KiB flash image.
    pub fn store_byte(&mut self, offset: usize, value: u8) {
        if let Some(slot) = self.bytes.get_mut(offset) {
            *slot = value;
            if self.dump_size < offset + 1 {
                self.dump_size = offset + 1;
            }
        }
    }

    pub fn load_byte(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0xFF)
    }

    /// Read the little-endian word at word-address `a`. Addresses at or
    /// beyond `flash_size` read as `0xFFFF`, the same value an unprogrammed
    /// word reads as — this keeps the decoder from panicking on an
    /// off-the-end chain and instead lets the `not-programmed` matcher
    /// terminate it.
    pub fn word_at(&self, a: u16) -> u16 {
        let lo = self.load_byte(2 * a as usize);
        let hi = self.load_byte(2 * a as usize + 1);
        u16::from_le_bytes([lo, hi])
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.dump_size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_image_reads_unprogrammed() {
        let image = Image::new(16);
        assert_eq!(image.word_at(0), 0xFFFF);
        assert_eq!(image.word_at(15), 0xFFFF);
        assert_eq!(image.dump_size(), 0);
    }

    #[test]
    fn store_byte_is_little_endian_on_read() {
        let mut image = Image::new(16);
        image.store_byte(0, 0x00);
        image.store_byte(1, 0xC0);
        assert_eq!(image.word_at(0), 0xC000);
        assert_eq!(image.dump_size(), 2);
    }

    #[test]
    fn out_of_range_word_reads_unprogrammed() {
        let image = Image::new(4);
        assert_eq!(image.word_at(4), 0xFFFF);
        assert_eq!(image.word_at(u16::MAX), 0xFFFF);
    }
}
