//! Instruction decoder registry (spec.md §4.1).
//!
//! An ordered list of matchers, one per instruction family, tried in
//! priority order against the current code word; the first to accept wins.
//! Each matcher can be queried in two modes:
//! - size-only (`size_at`): used by skip instructions (`cpse`, `sbis`,
//!   `sbic`, `sbrs`, `sbrc`) to learn how wide the *next* instruction is
//!   without committing to decoding it.
//! - render (`decode_at`): produces the mnemonic text and any control-flow
//!   side effects (targets to mark `pointed`, origins to enqueue, the
//!   address the chain resumes at).
//!
//! This mirrors the source's `COMMAND_t` array of dual-mode
//! (`process: bool`) functions, but as two small free functions (`test`,
//! `size`) plus a render function per matcher rather than one function that
//! mutates shared globals — see DESIGN.md's note on "pc mutation as
//! control-flow signalling".

pub mod bits;
mod arithmetic;
mod branch;
mod io;
mod load_store;
mod misc;

use crate::chip::ChipConfig;
use crate::image::Image;

/// Arguments available to a matcher's render step.
pub struct RenderArgs<'a> {
    pub word: u16,
    pub word2: u16,
    pub pc: u16,
    pub chip: &'a ChipConfig,
    /// Skip instructions (`cpse`, `sbis`, `sbic`, `sbrs`, `sbrc`) need to
    /// learn the size of the *next* instruction to compute their skip
    /// target; they do this with a size-only query against the image,
    /// never by rendering it.
    pub image: &'a Image,
}

/// Output of rendering one instruction.
pub struct Rendered {
    pub text: String,
    /// Override for where the chain resumes; `None` means "fall through to
    /// `pc + size`", the default for every non-branching instruction.
    pub resume_at: Option<u16>,
    /// Addresses named as a branch/jump/call target by this instruction.
    pub pointed: Vec<u16>,
    /// Addresses to enqueue as new chain origins.
    pub origins: Vec<u16>,
}

impl Rendered {
    fn plain(text: String) -> Self {
        Rendered {
            text,
            resume_at: None,
            pointed: Vec::new(),
            origins: Vec::new(),
        }
    }
}

/// One entry in the decoder registry.
pub struct Matcher {
    pub name: &'static str,
    pub test: fn(u16) -> bool,
    pub size: fn(u16) -> u8,
    pub render: fn(RenderArgs) -> Rendered,
}

/// A fully decoded instruction at some address, with the chain's next `pc`
/// already resolved.
pub struct DecodedInstr {
    pub matcher: &'static str,
    pub size: u8,
    pub text: String,
    pub resume_at: u16,
    pub pointed: Vec<u16>,
    pub origins: Vec<u16>,
}

/// Registration order is priority order (highest first): more specific bit
/// patterns must precede the more general patterns they overlap with. This
/// is the same order as spec.md §4.1 and the reference implementation's
/// `command[]` table.
pub static REGISTRY: &[Matcher] = &[
    arithmetic::NOP,
    arithmetic::MOVW,
    arithmetic::CPC_CP,
    arithmetic::SUB_SBC,
    arithmetic::ADD_ADC_LSL_ROL,
    branch::CPSE,
    arithmetic::AND,
    arithmetic::EOR,
    arithmetic::OR,
    arithmetic::MOV,
    arithmetic::CPI,
    arithmetic::SUBI_SBCI,
    arithmetic::ORI,
    arithmetic::ANDI,
    load_store::LDD_STD,
    load_store::LDS_STS,
    load_store::LD_ST_PLUS,
    load_store::LD_ST_MINUS,
    load_store::E_LPM,
    load_store::E_LPM_PLUS,
    load_store::LD_ST_X,
    load_store::PUSH_POP,
    arithmetic::ONE_OPERAND,
    io::SEX_CLX,
    branch::RET_RETI,
    misc::MISC,
    misc::IJMP_ICALL,
    arithmetic::DEC,
    branch::JMP_CALL,
    arithmetic::ADIW_SBIW,
    io::CBI_SBI,
    branch::SBIS_SBIC,
    arithmetic::MUL,
    io::IN_OUT,
    branch::RJMP_RCALL,
    misc::LDI,
    branch::COND_BRANCH,
    io::BLD_BST,
    branch::SBRS_SBRC,
    misc::NOT_PROGRAMMED,
];

/// Query the size (in words) of the instruction at `pc`, without rendering
/// it or producing any side effects. Used by skip instructions to find the
/// address just past the instruction they may skip.
pub fn size_at(image: &Image, pc: u16) -> u8 {
    let word = image.word_at(pc);
    for matcher in REGISTRY {
        if (matcher.test)(word) {
            return (matcher.size)(word);
        }
    }
    0
}

/// Decode and render the instruction at `pc`. Returns `None` if no matcher
/// in the registry accepts the word (spec.md §7b's decode-failure trigger).
pub fn decode_at(image: &Image, pc: u16, chip: &ChipConfig) -> Option<DecodedInstr> {
    let word = image.word_at(pc);
    for matcher in REGISTRY {
        if (matcher.test)(word) {
            let size = (matcher.size)(word);
            let word2 = if size == 2 {
                image.word_at(pc.wrapping_add(1))
            } else {
                0
            };
            let rendered = (matcher.render)(RenderArgs {
                word,
                word2,
                pc,
                chip,
                image,
            });
            let resume_at = rendered
                .resume_at
                .unwrap_or_else(|| pc.wrapping_add(size as u16));
            return Some(DecodedInstr {
                matcher: matcher.name,
                size,
                text: rendered.text,
                resume_at,
                pointed: rendered.pointed,
                origins: rendered.origins,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_programmed_is_the_last_resort() {
        let chip = ChipConfig::atmega8();
        let mut image = Image::new(chip.flash_size);
        // word_at on a fresh image is 0xFFFF everywhere already.
        let decoded = decode_at(&image, 0, &chip).expect("sentinel always matches");
        assert_eq!(decoded.matcher, "not-programmed");

        image.store_byte(0, 0x00);
        image.store_byte(1, 0xC0); // rjmp .+1 -> no longer all-ones
        let decoded = decode_at(&image, 0, &chip).expect("rjmp should match");
        assert_eq!(decoded.matcher, "rjmp/rcall");
    }
}
