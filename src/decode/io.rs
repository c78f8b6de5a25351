//! Status-bit, bit-test, and memory-mapped I/O instructions. None of these
//! affect control flow; they only render text.

use super::bits::{bit, field};
use super::{Matcher, Rendered};

const STATUS_BITS: [char; 8] = ['c', 'z', 'n', 'v', 's', 'h', 't', 'i'];

pub static SEX_CLX: Matcher = Matcher {
    name: "sex/clx",
    test: |w| (w & 0xFF0F) == 0x9408,
    size: |_| 1,
    render: |args| {
        let which_bit = field(args.word, 4, 3) as usize;
        let prefix = if bit(args.word, 7) { "cl" } else { "se" };
        Rendered::plain(format!("{}{}", prefix, STATUS_BITS[which_bit]))
    },
};

pub static CBI_SBI: Matcher = Matcher {
    name: "cbi/sbi",
    test: |w| (w & 0xFD00) == 0x9800,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 3, 5) as u8;
        let which_bit = field(args.word, 0, 3);
        let mnemonic = if bit(args.word, 9) { "sbi" } else { "cbi" };
        Rendered::plain(format!("{}\t{},{}", mnemonic, args.chip.io(reg), which_bit))
    },
};

pub static IN_OUT: Matcher = Matcher {
    name: "in/out",
    test: |w| (w & 0xF000) == 0xB000,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let io_reg = (16 * field(args.word, 9, 2) + field(args.word, 0, 4)) as u8;
        let text = if bit(args.word, 11) {
            format!("out\t{},{}", args.chip.io(io_reg), args.chip.reg(reg))
        } else {
            format!("in\t{},{}", args.chip.reg(reg), args.chip.io(io_reg))
        };
        Rendered::plain(text)
    },
};

pub static BLD_BST: Matcher = Matcher {
    name: "bld/bst",
    test: |w| (w & 0xFC08) == 0xF800,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let which_bit = field(args.word, 0, 3);
        let mnemonic = if bit(args.word, 9) { "bst" } else { "bld" };
        Rendered::plain(format!("{}\t{},{}", mnemonic, args.chip.reg(reg), which_bit))
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipConfig;
    use crate::image::Image;
    use crate::decode::RenderArgs;

    fn render(m: &Matcher, word: u16) -> Rendered {
        let chip = ChipConfig::atmega8();
        let image = Image::new(chip.flash_size);
        (m.render)(RenderArgs {
            word,
            word2: 0,
            pc: 0,
            chip: &chip,
            image: &image,
        })
    }

    #[test]
    fn in_out_uses_io_table() {
        // in r1, $07 (ADMUX)
        let rendered = render(&IN_OUT, 0xB017);
        assert_eq!(rendered.text, "in\tr1,ADMUX");
    }

    #[test]
    fn sex_clx_picks_status_bit_letter() {
        // sei: clear=0 (set), bit index 3 -> 'i'
        let rendered = render(&SEX_CLX, 0x9478);
        assert_eq!(rendered.text, "sei");
    }
}
