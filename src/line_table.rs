//! Per-word decode records (spec.md §3).
//!
//! Invariants maintained by callers in `traversal` and `decode`, not by this
//! type itself (it is a plain record store, the way `LineTable` is never
//! more than its fields):
//! - `decoded[a] ⇒ visited[a]`
//! - a two-word instruction at `a` sets `visited[a]=decoded[a]=true`,
//!   `visited[a+1]=true`, `decoded[a+1]=false`
//! - `pointed[a]` set iff some decoded instruction names `a` as a target

/// Decode state for one word address.
#[derive(Debug, Clone, Default)]
pub struct LineRecord {
    pub visited: bool,
    pub decoded: bool,
    pub pointed: bool,
    pub text: Option<String>,
}

/// Decode records for every word address in flash, indexed by word address.
#[derive(Debug, Clone)]
pub struct LineTable {
    lines: Vec<LineRecord>,
}

impl LineTable {
    pub fn new(flash_size: usize) -> Self {
        LineTable {
            lines: vec![LineRecord::default(); flash_size],
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Addresses past the end of the table read as already visited, so a
    /// chain that runs off the end of flash halts instead of panicking.
    pub fn visited(&self, a: u16) -> bool {
        self.lines.get(a as usize).is_some_and(|l| l.visited)
    }

    pub fn decoded(&self, a: u16) -> bool {
        self.lines.get(a as usize).is_some_and(|l| l.decoded)
    }

    pub fn pointed(&self, a: u16) -> bool {
        self.lines.get(a as usize).is_some_and(|l| l.pointed)
    }

    pub fn text(&self, a: u16) -> Option<&str> {
        self.lines.get(a as usize).and_then(|l| l.text.as_deref())
    }

    pub fn mark_pointed(&mut self, a: u16) {
        if let Some(line) = self.lines.get_mut(a as usize) {
            line.pointed = true;
        }
    }

    pub fn mark_visited(&mut self, a: u16) {
        if let Some(line) = self.lines.get_mut(a as usize) {
            line.visited = true;
        }
    }

    /// Record a decoded instruction head: marks `decoded` and `visited`, and
    /// stores the rendered text.
    pub fn set_decoded(&mut self, a: u16, text: String) {
        if let Some(line) = self.lines.get_mut(a as usize) {
            line.visited = true;
            line.decoded = true;
            line.text = Some(text);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &LineRecord)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, l)| (i as u16, l))
    }
}
