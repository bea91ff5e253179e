//! One-character token map.
//!
//! ASCII punctuation is covered by four dense groups indexed by offset
//! from the group's first byte. Everything else, such as a one-char token
//! for a non-ASCII character, goes to the overflow list.

use super::TokenDefId;

/// `(first, last)` byte of each dense group.
const GROUPS: [(u8, u8); 4] = [(b'!', b'/'), (b':', b'@'), (b'[', b'`'), (b'{', b'~')];

pub(super) struct OneCharMap {
    groups: [Vec<Option<TokenDefId>>; 4],
    etc: Vec<(u32, TokenDefId)>,
}

impl Default for OneCharMap {
    fn default() -> Self {
        Self {
            groups: GROUPS.map(|(first, last)| vec![None; usize::from(last - first) + 1]),
            etc: Vec::new(),
        }
    }
}

/// Group index and slot of an ASCII code point.
fn group_slot(code: u32) -> Option<(usize, usize)> {
    let b = u8::try_from(code).ok()?;
    GROUPS
        .iter()
        .position(|&(first, last)| (first..=last).contains(&b))
        .map(|g| (g, usize::from(b - GROUPS[g].0)))
}

impl OneCharMap {
    pub(super) fn insert(&mut self, code: u32, id: TokenDefId) {
        if let Some((g, slot)) = group_slot(code) {
            self.groups[g][slot] = Some(id);
            return;
        }
        match self.etc.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = id,
            None => self.etc.push((code, id)),
        }
    }

    pub(super) fn get(&self, code: u32) -> Option<TokenDefId> {
        match group_slot(code) {
            Some((g, slot)) => self.groups[g][slot],
            None => self.etc.iter().find(|(c, _)| *c == code).map(|(_, id)| *id),
        }
    }

    /// Number of overflow entries.
    #[cfg(test)]
    pub(super) fn etc_len(&self) -> usize {
        self.etc.len()
    }
}
