//! Catch-all matchers: the no-operand system instructions (`sleep`, `break`,
//! `wdr`, `lpm`/`elpm`/`spm` without operands), `ijmp`/`icall`, the `ldi`
//! immediate load, and the not-programmed sentinel that terminates a chain
//! run off the end of written flash.

use super::bits::{bit, field};
use super::{Matcher, Rendered};

pub static MISC: Matcher = Matcher {
    name: "misc",
    test: |w| {
        (w & 0xFF0F) == 0x9508
            && matches!(field(w, 4, 4), 0x8 | 0x9 | 0xA | 0xC | 0xD | 0xE | 0xF)
    },
    size: |_| 1,
    render: |args| {
        let ty = field(args.word, 4, 4);
        // Type nibble 0xB is reserved and excluded by `test`, so the table
        // has no slot for it.
        let mnemonic = match ty {
            0x8 => "sleep",
            0x9 => "break",
            0xA => "wdr",
            0xC => "lpm",
            0xD => "elpm",
            0xE => "spm",
            0xF => "spm Z+",
            _ => unreachable!("excluded by test"),
        };
        Rendered::plain(mnemonic.to_string())
    },
};

pub static IJMP_ICALL: Matcher = Matcher {
    name: "ijmp/icall",
    test: |w| (w & 0xFEEF) == 0x9409,
    size: |_| 1,
    render: |args| {
        let text = if bit(args.word, 8) { "icall" } else { "ijmp" };
        // Unlike rjmp/rcall, the reference implementation does not know the
        // indirect target, so it neither redirects the chain nor enqueues
        // an origin: execution is assumed to fall through, same as any
        // other non-branching instruction.
        Rendered::plain(text.to_string())
    },
};

pub static LDI: Matcher = Matcher {
    name: "ldi",
    test: |w| (w & 0xF000) == 0xE000,
    size: |_| 1,
    render: |args| {
        let reg = (16 + field(args.word, 4, 4)) as u8;
        let val = (field(args.word, 8, 4) << 4) + field(args.word, 0, 4);
        Rendered::plain(format!("ldi\t{},{}\t// ${:02x}", args.chip.reg(reg), val, val))
    },
};

pub static NOT_PROGRAMMED: Matcher = Matcher {
    name: "not-programmed",
    test: |w| w == 0xFFFF,
    size: |_| 1,
    render: |args| {
        Rendered {
            // The reference implementation never writes a mnemonic for this
            // case; the listing still emits the line (decoded is still set)
            // but with nothing after the tab.
            text: String::new(),
            resume_at: Some(args.pc),
            pointed: Vec::new(),
            origins: Vec::new(),
        }
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipConfig;
    use crate::decode::RenderArgs;
    use crate::image::Image;

    fn render(m: &Matcher, word: u16, pc: u16) -> Rendered {
        let chip = ChipConfig::atmega8();
        let image = Image::new(chip.flash_size);
        (m.render)(RenderArgs {
            word,
            word2: 0,
            pc,
            chip: &chip,
            image: &image,
        })
    }

    #[test]
    fn misc_excludes_ret_reti_type_nibbles() {
        assert!(!(MISC.test)(0x9508)); // ret: type nibble 0x0
        assert!(!(MISC.test)(0x9518)); // reti: type nibble 0x1
        assert!((MISC.test)(0x9588)); // sleep: type nibble 0x8
    }

    #[test]
    fn misc_mnemonics_match_type_nibble() {
        assert_eq!(render(&MISC, 0x9588, 0).text, "sleep");
        assert_eq!(render(&MISC, 0x95E8, 0).text, "spm");
        assert_eq!(render(&MISC, 0x95F8, 0).text, "spm Z+");
    }

    #[test]
    fn not_programmed_terminates_with_empty_text() {
        let rendered = render(&NOT_PROGRAMMED, 0xFFFF, 7);
        assert_eq!(rendered.text, "");
        assert_eq!(rendered.resume_at, Some(7));
    }

    #[test]
    fn ijmp_icall_do_not_redirect_or_enqueue() {
        let rendered = render(&IJMP_ICALL, 0x9409, 3);
        assert_eq!(rendered.text, "icall");
        assert_eq!(rendered.resume_at, None);
        assert!(rendered.origins.is_empty());
    }
}
