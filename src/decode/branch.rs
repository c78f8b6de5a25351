//! Control-flow instructions: skips, relative/absolute jumps and calls,
//! conditional branches, and the `ret`/`reti` terminators.
//!
//! This is where a matcher's render step does more than produce text — it
//! is also where chains fork (new origins), rejoin (branch/jump targets
//! marked `pointed`), redirect (`rjmp`/`rcall`/`jmp`/`call` override
//! `resume_at`), or end (`ret`/`reti`, spec.md §4.1 "Terminators").

use super::bits::{bit, field};
use super::{size_at, Matcher, Rendered};

fn dst_src(word: u16) -> (u8, u8) {
    let dst = field(word, 4, 5) as u8;
    let src = (16 * field(word, 9, 1) + field(word, 0, 4)) as u8;
    (dst, src)
}

pub static CPSE: Matcher = Matcher {
    name: "cpse",
    test: |w| (w & 0xFC00) == 0x1000,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        let next = args.pc.wrapping_add(1);
        let skip_to = next.wrapping_add(size_at(args.image, next) as u16);
        Rendered {
            text: format!("cpse\t{},{}", args.chip.reg(dst), args.chip.reg(src)),
            resume_at: None,
            pointed: Vec::new(),
            origins: vec![skip_to],
        }
    },
};

pub static RET_RETI: Matcher = Matcher {
    name: "ret/reti",
    test: |w| (w & 0xFFEF) == 0x9508,
    size: |_| 1,
    render: |args| {
        let text = if bit(args.word, 4) { "reti" } else { "ret" }.to_string();
        Rendered {
            text,
            // Terminator: resume at this instruction's own (now decoded)
            // address, which halts the chain loop immediately.
            resume_at: Some(args.pc),
            pointed: Vec::new(),
            origins: Vec::new(),
        }
    },
};

pub static JMP_CALL: Matcher = Matcher {
    name: "jmp/call",
    test: |w| (w & 0xFE0C) == 0x940C,
    size: |_| 2,
    render: |args| {
        let addr = args.word2;
        let text = if bit(args.word, 1) {
            format!("call\tL_{:X}", addr)
        } else {
            format!("jmp\tL_{:X}", addr)
        };
        Rendered {
            text,
            resume_at: Some(addr),
            pointed: vec![addr],
            origins: Vec::new(),
        }
    },
};

pub static SBIS_SBIC: Matcher = Matcher {
    name: "sbis/sbic",
    test: |w| (w & 0xFD00) == 0x9900,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 3, 5) as u8;
        let which_bit = field(args.word, 0, 3);
        let mnemonic = if bit(args.word, 9) { "sbis" } else { "sbic" };
        let next = args.pc.wrapping_add(1);
        let skip_to = next.wrapping_add(size_at(args.image, next) as u16);
        Rendered {
            text: format!("{}\t{},{}", mnemonic, args.chip.io(reg), which_bit),
            resume_at: None,
            pointed: Vec::new(),
            origins: vec![skip_to],
        }
    },
};

pub static RJMP_RCALL: Matcher = Matcher {
    name: "rjmp/rcall",
    test: |w| (w & 0xE000) == 0xC000,
    size: |_| 1,
    render: |args| {
        let mask = args.chip.flash_mask();
        let disp = field(args.word, 0, 12);
        let addr = if bit(args.word, 11) {
            (args.pc.wrapping_add(1).wrapping_sub(0x1000 - disp)) & mask
        } else {
            (args.pc.wrapping_add(1).wrapping_add(disp)) & mask
        };
        let (text, origins) = if bit(args.word, 12) {
            (
                format!("rcall\tL_{:X}", addr),
                vec![args.pc.wrapping_add(1)],
            )
        } else {
            (format!("rjmp\tL_{:X}", addr), Vec::new())
        };
        Rendered {
            text,
            resume_at: Some(addr),
            pointed: vec![addr],
            origins,
        }
    },
};

const BRBS: [&str; 8] = ["brlo", "breq", "brmi", "brvs", "brlt", "brhs", "brts", "brie"];
const BRBC: [&str; 8] = ["brsh", "brne", "brpl", "brvc", "brge", "brhc", "brtc", "brid"];

pub static COND_BRANCH: Matcher = Matcher {
    name: "brbs/brbc",
    test: |w| (w & 0xF800) == 0xF000,
    size: |_| 1,
    render: |args| {
        let mask = args.chip.flash_mask();
        let which_bit = field(args.word, 0, 3) as usize;
        let offs = field(args.word, 3, 7);
        let addr = if bit(offs, 6) {
            (args.pc.wrapping_add(1).wrapping_sub(0x80 - offs)) & mask
        } else {
            (args.pc.wrapping_add(1).wrapping_add(offs)) & mask
        };
        let text = if bit(args.word, 10) {
            let suffix = if which_bit == 0 { "\t// brcc" } else { "" };
            format!("{}\tL_{:X}{}", BRBC[which_bit], addr, suffix)
        } else {
            let suffix = if which_bit == 0 { "\t// brcs" } else { "" };
            format!("{}\tL_{:X}{}", BRBS[which_bit], addr, suffix)
        };
        Rendered {
            text,
            resume_at: None,
            pointed: vec![addr],
            origins: vec![addr],
        }
    },
};

pub static SBRS_SBRC: Matcher = Matcher {
    name: "sbrs/sbrc",
    test: |w| (w & 0xFC08) == 0xFC00,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        let which_bit = field(args.word, 0, 3);
        let mnemonic = if bit(args.word, 9) { "sbrs" } else { "sbrc" };
        let next = args.pc.wrapping_add(1);
        let skip_to = next.wrapping_add(size_at(args.image, next) as u16);
        Rendered {
            text: format!("{}\t{},{}", mnemonic, args.chip.reg(reg), which_bit),
            resume_at: None,
            pointed: Vec::new(),
            origins: vec![skip_to],
        }
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipConfig;
    use crate::image::Image;
    use crate::decode::RenderArgs;

    fn render(m: &Matcher, word: u16, pc: u16, image: &Image) -> Rendered {
        let chip = ChipConfig::atmega8();
        (m.render)(RenderArgs {
            word,
            word2: 0,
            pc,
            chip: &chip,
            image,
        })
    }

    #[test]
    fn rjmp_targets_forward_and_marks_pointed() {
        let chip = ChipConfig::atmega8();
        let image = Image::new(chip.flash_size);
        // rjmp .+1 (encoded displacement 1) from pc=0
        let rendered = render(&RJMP_RCALL, 0xC001, 0, &image);
        assert_eq!(rendered.text, "rjmp\tL_2");
        assert_eq!(rendered.pointed, vec![2]);
        assert_eq!(rendered.resume_at, Some(2));
        assert!(rendered.origins.is_empty());
    }

    #[test]
    fn rcall_enqueues_fallthrough_but_jmp_call_does_not() {
        let chip = ChipConfig::atmega8();
        let image = Image::new(chip.flash_size);
        let rendered = render(&RJMP_RCALL, 0xD001, 0, &image);
        assert_eq!(rendered.origins, vec![1]);

        let rendered = (JMP_CALL.render)(RenderArgs {
            word: 0x940E,
            word2: 0x0100,
            pc: 0,
            chip: &chip,
            image: &image,
        });
        assert_eq!(rendered.text, "call\tL_100");
        assert!(rendered.origins.is_empty());
    }

    #[test]
    fn cond_branch_brbs_zero_gets_brcs_synonym() {
        let chip = ChipConfig::atmega8();
        let image = Image::new(chip.flash_size);
        // brbs 0, .+1 (offset 1, bit index 0) -> brlo with brcs synonym comment
        let rendered = render(&COND_BRANCH, 0xF008, 0, &image);
        assert_eq!(rendered.text, "brlo\tL_2\t// brcs");
        assert_eq!(rendered.pointed, vec![2]);
        assert_eq!(rendered.origins, vec![2]);
    }

    #[test]
    fn ret_reti_terminate_at_self() {
        let chip = ChipConfig::atmega8();
        let image = Image::new(chip.flash_size);
        let rendered = render(&RET_RETI, 0x9518, 5, &image);
        assert_eq!(rendered.text, "reti");
        assert_eq!(rendered.resume_at, Some(5));
    }
}
