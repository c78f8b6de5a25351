//! Recursive-descent control-flow traversal (spec.md §4.3).
//!
//! Starting from the reset/IRQ vector table, follows each chain of
//! instructions until it hits a terminator (`ret`, `reti`, the
//! not-programmed sentinel) or redirects itself via `rjmp`/`rcall`/`jmp`/
//! `call`, draining an origin queue of chain-start addresses the way
//! `riscvemu`'s fetch loop drains its memory queue (`hart/memory.rs`) —
//! except here the "memory" being drained is addresses to decode, not bytes
//! to read.

use log::{debug, trace};

use crate::chip::ChipConfig;
use crate::decode::decode_at;
use crate::error::DecodeError;
use crate::image::Image;
use crate::line_table::LineTable;
use crate::origin::OriginQueue;

/// Owns the three pieces of mutable state a traversal run threads through:
/// the program image (read-only during a run), the per-word decode table,
/// and the FIFO of pending chain starts.
pub struct Decoder<'a> {
    image: &'a Image,
    chip: &'a ChipConfig,
    lines: LineTable,
    origins: OriginQueue,
}

impl<'a> Decoder<'a> {
    pub fn new(image: &'a Image, chip: &'a ChipConfig) -> Self {
        Decoder {
            image,
            chip,
            lines: LineTable::new(chip.flash_size),
            origins: OriginQueue::seeded_with_irq_table(chip.irq_table_size),
        }
    }

    /// Drain the origin queue, following each chain until it terminates.
    /// Returns the completed line table, or the first decode failure
    /// encountered (spec.md §7b).
    pub fn run(mut self) -> Result<LineTable, DecodeError> {
        let mut chains = 0;
        while let Some(origin) = self.origins.pop() {
            trace!("chain start at 0x{:04x} ({} remaining)", origin, chains);
            self.chain(origin)?;
            chains += 1;
        }
        debug!("traversal complete: {} chains followed", chains);
        Ok(self.lines)
    }

    /// Follow one chain starting at `pc` until it halts. An origin landing
    /// on an address that is already decoded is a no-op (spec.md §9): this
    /// is how the terminator instructions end a chain without special
    /// signalling, and how overlapping chains converge instead of
    /// re-decoding shared code.
    fn chain(&mut self, mut pc: u16) -> Result<(), DecodeError> {
        loop {
            if self.lines.decoded(pc) {
                return Ok(());
            }
            if self.lines.visited(pc) {
                // Visited but not decoded: this address is the second word
                // of some two-word instruction. Re-entering it as a chain
                // head would corrupt that instruction's line record.
                return Err(DecodeError::ReenteredVisited { addr: pc });
            }

            let word = self.image.word_at(pc);
            let decoded = decode_at(self.image, pc, self.chip)
                .ok_or(DecodeError::NoMatch { addr: pc, word })?;

            self.lines.set_decoded(pc, decoded.text);
            if decoded.size == 2 {
                self.lines.mark_visited(pc.wrapping_add(1));
            }
            for target in &decoded.pointed {
                self.lines.mark_pointed(*target);
            }
            for origin in decoded.origins {
                self.origins.push(origin);
            }

            pc = decoded.resume_at;
        }
    }
}
