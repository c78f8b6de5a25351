//! Register-register and register-immediate ALU instructions, plus the
//! handful of one-operand and pair instructions that share their encoding
//! space. Mask/value pairs and rendering match `original_source/main.cpp`'s
//! `cmd_*` functions exactly.

use super::bits::{bit, field};
use super::{Matcher, Rendered};

pub static NOP: Matcher = Matcher {
    name: "nop",
    test: |w| w == 0x0000,
    size: |_| 1,
    render: |_args| Rendered::plain("nop".to_string()),
};

pub static MOVW: Matcher = Matcher {
    name: "movw",
    test: |w| (w & 0xFF00) == 0x0100,
    size: |_| 1,
    render: |args| {
        let dst = 2 * field(args.word, 4, 4);
        let src = 2 * field(args.word, 0, 4);
        Rendered::plain(format!(
            "movw\t{}:{}, {}:{}",
            args.chip.reg((dst + 1) as u8),
            args.chip.reg(dst as u8),
            args.chip.reg((src + 1) as u8),
            args.chip.reg(src as u8),
        ))
    },
};

fn dst_src(word: u16) -> (u8, u8) {
    let dst = field(word, 4, 5) as u8;
    let src = (16 * field(word, 9, 1) + field(word, 0, 4)) as u8;
    (dst, src)
}

pub static CPC_CP: Matcher = Matcher {
    name: "cpc/cp",
    test: |w| (w & 0xEC00) == 0x0400,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        let mnemonic = if bit(args.word, 12) { "cp" } else { "cpc" };
        Rendered::plain(format!(
            "{}\t{},{}",
            mnemonic,
            args.chip.reg(dst),
            args.chip.reg(src)
        ))
    },
};

pub static SUB_SBC: Matcher = Matcher {
    name: "sub/sbc",
    test: |w| (w & 0xEC00) == 0x0800,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        let mnemonic = if bit(args.word, 12) { "sub" } else { "sbc" };
        Rendered::plain(format!(
            "{}\t{},{}",
            mnemonic,
            args.chip.reg(dst),
            args.chip.reg(src)
        ))
    },
};

pub static ADD_ADC_LSL_ROL: Matcher = Matcher {
    name: "add/adc/lsl/rol",
    test: |w| (w & 0xEC00) == 0x0C00,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        let text = if bit(args.word, 12) {
            if dst != src {
                format!("adc\t{},{}", args.chip.reg(dst), args.chip.reg(src))
            } else {
                format!("rol\t{}", args.chip.reg(dst))
            }
        } else if dst != src {
            format!("add\t{},{}", args.chip.reg(dst), args.chip.reg(src))
        } else {
            format!("lsl\t{}", args.chip.reg(dst))
        };
        Rendered::plain(text)
    },
};

pub static AND: Matcher = Matcher {
    name: "and",
    test: |w| (w & 0xFC00) == 0x2000,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        Rendered::plain(format!("and\t{},{}", args.chip.reg(dst), args.chip.reg(src)))
    },
};

pub static EOR: Matcher = Matcher {
    name: "eor",
    test: |w| (w & 0xFC00) == 0x2400,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        Rendered::plain(format!("eor\t{},{}", args.chip.reg(dst), args.chip.reg(src)))
    },
};

pub static OR: Matcher = Matcher {
    name: "or",
    test: |w| (w & 0xFC00) == 0x2800,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        Rendered::plain(format!("or\t{},{}", args.chip.reg(dst), args.chip.reg(src)))
    },
};

pub static MOV: Matcher = Matcher {
    name: "mov",
    test: |w| (w & 0xFC00) == 0x2C00,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        Rendered::plain(format!("mov\t{},{}", args.chip.reg(dst), args.chip.reg(src)))
    },
};

/// Register + 8-bit immediate encoding shared by `cpi`/`subi`/`sbci`/`ori`/
/// `andi`/`ldi`: destination is always the upper half of the register file.
fn reg_imm8(word: u16) -> (u8, u8) {
    let reg = (16 + field(word, 4, 4)) as u8;
    let val = ((field(word, 8, 4) << 4) + field(word, 0, 4)) as u8;
    (reg, val)
}

pub static CPI: Matcher = Matcher {
    name: "cpi",
    test: |w| (w & 0xF000) == 0x3000,
    size: |_| 1,
    render: |args| {
        let (reg, val) = reg_imm8(args.word);
        Rendered::plain(format!(
            "cpi\t{},{}\t// ${:02x}",
            args.chip.reg(reg),
            val,
            val
        ))
    },
};

pub static SUBI_SBCI: Matcher = Matcher {
    name: "subi/sbci",
    test: |w| (w & 0xE000) == 0x4000,
    size: |_| 1,
    render: |args| {
        let (reg, val) = reg_imm8(args.word);
        let mnemonic = if bit(args.word, 12) { "subi" } else { "sbci" };
        Rendered::plain(format!(
            "{}\t{},{}\t// ${:02x}",
            mnemonic,
            args.chip.reg(reg),
            val,
            val
        ))
    },
};

pub static ORI: Matcher = Matcher {
    name: "ori",
    test: |w| (w & 0xF000) == 0x6000,
    size: |_| 1,
    render: |args| {
        let (reg, val) = reg_imm8(args.word);
        Rendered::plain(format!(
            "ori\t{},{}\t// ${:02x}",
            args.chip.reg(reg),
            val,
            val
        ))
    },
};

pub static ANDI: Matcher = Matcher {
    name: "andi",
    test: |w| (w & 0xF000) == 0x7000,
    size: |_| 1,
    render: |args| {
        let (reg, val) = reg_imm8(args.word);
        Rendered::plain(format!(
            "andi\t{},{}\t// ${:02x}",
            args.chip.reg(reg),
            val,
            val
        ))
    },
};

const ONE_OPERAND_MNEMONICS: [&str; 8] = ["com", "neg", "swap", "inc", "", "asr", "lsr", "ror"];

pub static ONE_OPERAND: Matcher = Matcher {
    name: "one-operand",
    test: |w| (w & 0xFE08) == 0x9400 && field(w, 0, 3) != 4,
    size: |_| 1,
    render: |args| {
        let ty = field(args.word, 0, 3) as usize;
        let reg = field(args.word, 4, 5) as u8;
        Rendered::plain(format!(
            "{}\t{}",
            ONE_OPERAND_MNEMONICS[ty],
            args.chip.reg(reg)
        ))
    },
};

pub static DEC: Matcher = Matcher {
    name: "dec",
    test: |w| (w & 0xFE0F) == 0x940A,
    size: |_| 1,
    render: |args| {
        let reg = field(args.word, 4, 5) as u8;
        Rendered::plain(format!("dec\t{}", args.chip.reg(reg)))
    },
};

const ADIW_SBIW_PAIRS: [&str; 4] = ["W", "XH:XL", "YH:YL", "ZH:ZL"];

pub static ADIW_SBIW: Matcher = Matcher {
    name: "adiw/sbiw",
    test: |w| (w & 0xFE00) == 0x9600,
    size: |_| 1,
    render: |args| {
        let pair = field(args.word, 4, 2) as usize;
        let val = (field(args.word, 6, 2) << 4) + field(args.word, 0, 4);
        let mnemonic = if bit(args.word, 8) { "sbiw" } else { "adiw" };
        Rendered::plain(format!(
            "{}\t{},{}\t// {:02X}",
            mnemonic, ADIW_SBIW_PAIRS[pair], val, val
        ))
    },
};

pub static MUL: Matcher = Matcher {
    name: "mul",
    test: |w| (w & 0xFC00) == 0x9C00,
    size: |_| 1,
    render: |args| {
        let (dst, src) = dst_src(args.word);
        Rendered::plain(format!("mul\t{},{}", args.chip.reg(dst), args.chip.reg(src)))
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
    fn ldi_style_immediate_renders_hex_comment() {
        // ldi r16, 0x5F
        let rendered = render(&crate::decode::misc::LDI, 0xE50F);
        assert_eq!(rendered.text, "ldi\tr16,95\t// $5f");
    }

    #[test]
    fn mul_renders_both_registers() {
        let rendered = render(&MUL, 0x9C11);
        assert_eq!(rendered.text, "mul\tr1,r1");
    }

    #[test]
    fn movw_splits_register_pairs() {
        assert!((MOVW.test)(0x0100));
        let rendered = render(&MOVW, 0x0100);
        assert_eq!(rendered.text, "movw\tr1:r0, r1:r0");
    }

    #[test]
    fn add_collapses_to_lsl_when_operands_match() {
        // add r5, r5 -> lsl r5
        let word = 0x0C55;
        assert!((ADD_ADC_LSL_ROL.test)(word));
        let rendered = render(&ADD_ADC_LSL_ROL, word);
        assert_eq!(rendered.text, "lsl\tr5");
    }
}
