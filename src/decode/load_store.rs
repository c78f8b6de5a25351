//! Load/store instructions addressing data space through the X/Y/Z pointer
//! registers, plus program-space reads (`lpm`/`elpm`) and the stack
//! (`push`/`pop`). None redirect control flow; they only render text.

use super::bits::{bit, field};
use super::{Matcher, Rendered};

pub static LDD_STD: Matcher = Matcher {
    name: "ldd/std",
    test: |w| (w & 0xD000) == 0x8000,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let offset = (field(args.word, 13, 1) << 5)
            + (field(args.word, 10, 2) << 3)
            + field(args.word, 0, 3);
        let pointer = if bit(args.word, 3) { "Y" } else { "Z" };
        let text = if bit(args.word, 9) {
            format!(
                "std\t{}+${:02x},{}\t// {}",
                pointer,
                offset,
                args.chip.reg(reg),
                offset
            )
        } else {
            format!(
                "ldd\t{},{}+${:02x}\t// {}",
                args.chip.reg(reg),
                pointer,
                offset,
                offset
            )
        };
        Rendered::plain(text)
    },
};

pub static LDS_STS: Matcher = Matcher {
    name: "lds/sts",
    test: |w| (w & 0xFC0F) == 0x9000,
    size: |_| 2,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let addr = args.word2;
        let text = if bit(args.word, 9) {
            format!("sts\t${:04x},{}\t// {}", addr, args.chip.reg(reg), addr)
        } else {
            format!("lds\t{},${:04x}\t// {}", args.chip.reg(reg), addr, addr)
        };
        Rendered::plain(text)
    },
};

pub static LD_ST_PLUS: Matcher = Matcher {
    name: "ld/st post-increment",
    test: |w| (w & 0xFC07) == 0x9001,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let pointer = if bit(args.word, 3) { "Y" } else { "Z" };
        let text = if bit(args.word, 9) {
            format!("st\t{}+,{}", pointer, args.chip.reg(reg))
        } else {
            format!("ld\t{},{}+", args.chip.reg(reg), pointer)
        };
        Rendered::plain(text)
    },
};

pub static LD_ST_MINUS: Matcher = Matcher {
    name: "ld/st pre-decrement",
    test: |w| (w & 0xFC07) == 0x9002,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let pointer = if bit(args.word, 3) { "Y" } else { "Z" };
        let text = if bit(args.word, 9) {
            format!("st\t-{},{}", pointer, args.chip.reg(reg))
        } else {
            format!("ld\t{},-{}", args.chip.reg(reg), pointer)
        };
        Rendered::plain(text)
    },
};

pub static E_LPM: Matcher = Matcher {
    name: "lpm/elpm (Z)",
    test: |w| (w & 0xFE0D) == 0x9004,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let mnemonic = if bit(args.word, 1) { "elpm" } else { "lpm" };
        Rendered::plain(format!("{}\t{},Z", mnemonic, args.chip.reg(reg)))
    },
};

pub static E_LPM_PLUS: Matcher = Matcher {
    name: "lpm/elpm (Z+)",
    test: |w| (w & 0xFE0D) == 0x9005,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let mnemonic = if bit(args.word, 1) { "elpm" } else { "lpm" };
        Rendered::plain(format!("{}\t{},Z+", mnemonic, args.chip.reg(reg)))
    },
};

pub static LD_ST_X: Matcher = Matcher {
    name: "ld/st (X)",
    test: |w| (w & 0xFC0C) == 0x900C && field(w, 0, 2) != 3,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let ty = field(args.word, 0, 2);
        let pointer = match ty {
            0 => "X".to_string(),
            1 => "X+".to_string(),
            _ => "-X".to_string(),
        };
        let text = if bit(args.word, 9) {
            format!("st\t{},{}", pointer, args.chip.reg(reg))
        } else {
            format!("ld\t{},{}", args.chip.reg(reg), pointer)
        };
        Rendered::plain(text)
    },
};

pub static PUSH_POP: Matcher = Matcher {
    name: "push/pop",
    test: |w| (w & 0xFC0F) == 0x900F,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let mnemonic = if bit(args.word, 9) { "push" } else { "pop" };
        Rendered::plain(format!("{}\t{}", mnemonic, args.chip.reg(reg)))
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipConfig;
    use crate::decode::RenderArgs;
    use crate::image::Image;

    fn render(m: &Matcher, word: u16, word2: u16) -> Rendered {
        let chip = ChipConfig::atmega8();
        let image = Image::new(chip.flash_size);
        (m.render)(RenderArgs {
            word,
            word2,
            pc: 0,
            chip: &chip,
            image: &image,
        })
    }

    #[test]
    fn ldd_reads_y_plus_offset() {
        // ldd r0, Y+1
        let rendered = render(&LDD_STD, 0x8009, 0);
        assert_eq!(rendered.text, "ldd\tr0,Y+$01\t// 1");
    }

    #[test]
    fn lds_renders_hex_absolute_address_with_decimal_comment() {
        let rendered = render(&LDS_STS, 0x9000, 256);
        assert_eq!(rendered.text, "lds\tr0,$0100\t// 256");
    }

    #[test]
    fn push_pop_select_on_bit9() {
        let rendered = render(&PUSH_POP, 0x920F, 0);
        assert_eq!(rendered.text, "push\tr0");
        let rendered = render(&PUSH_POP, 0x900F, 0);
        assert_eq!(rendered.text, "pop\tr0");
    }

    #[test]
    fn ld_st_x_excludes_push_pop_encoding() {
        assert!(!(LD_ST_X.test)(0x900F));
        assert!((LD_ST_X.test)(0x900C));
    }
}
