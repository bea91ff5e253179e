//! Keyword hash table.
//!
//! Open hashing with chained buckets: each bucket holds the head of a
//! singly linked chain threaded through [`TokenDef::link`]. New spellings
//! are inserted at the head, so a later registration of an existing
//! spelling shadows the earlier one.
//!
//! The hash mixes each byte in at a position-dependent shift so that
//! anagrams of equal length land in different buckets:
//!
//! ```text
//! h = 0
//! for (i, b) in text: h = (h << 1) ^ (b << (i % (n_shifts + 1)))
//! bucket = h % n_slots
//! ```
//!
//! `n_shifts` grows with the table (`bit_width(n_slots) - 8`, floored at
//! 0) so bigger tables spread short keywords over more of their slots.

use super::{TokenDef, TokenDefId};

/// Default number of buckets.
pub(crate) const DEFAULT_SLOTS: usize = 127;

pub(super) struct KeywordTable {
    buckets: Vec<Option<TokenDefId>>,
    case_insensitive: bool,
    len: usize,
}

fn shifts_for(n_slots: usize) -> u32 {
    let bit_width = usize::BITS - n_slots.leading_zeros();
    bit_width.saturating_sub(8)
}

/// Bucket index of `text` in a table of `n_slots` buckets.
pub(super) fn keyword_hash(text: &[u8], n_slots: usize, case_insensitive: bool) -> usize {
    let n_shifts = shifts_for(n_slots);
    let mut h: u32 = 0;
    for (i, &b) in text.iter().enumerate() {
        let b = if case_insensitive { b.to_ascii_uppercase() } else { b };
        let shift = u32::try_from(i).unwrap_or(0) % (n_shifts + 1);
        h = (h << 1) ^ (u32::from(b) << shift);
    }
    usize::try_from(h).unwrap_or(0) % n_slots.max(1)
}

impl KeywordTable {
    pub(super) fn new(n_slots: usize, case_insensitive: bool) -> Self {
        let n_slots = n_slots.max(1);
        Self {
            buckets: vec![None; n_slots],
            case_insensitive,
            len: 0,
        }
    }

    pub(super) fn n_slots(&self) -> usize {
        self.buckets.len()
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.len
    }

    fn same(&self, a: &[u8], b: &[u8]) -> bool {
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }

    /// Insert `id` at the head of its bucket. Grows the table once chains
    /// average more than two entries.
    pub(super) fn insert(&mut self, defs: &mut [TokenDef], id: TokenDefId) {
        self.link_in(defs, id);
        self.len += 1;
        if self.len > 2 * self.n_slots() {
            self.grow(defs);
        }
    }

    fn link_in(&mut self, defs: &mut [TokenDef], id: TokenDefId) {
        let slot = keyword_hash(&defs[id.index()].keyword, self.n_slots(), self.case_insensitive);
        defs[id.index()].link = self.buckets[slot];
        self.buckets[slot] = Some(id);
    }

    /// Rehash into `2 * n_slots + 1` buckets, re-inserting in registration
    /// order so shadowing is preserved.
    fn grow(&mut self, defs: &mut [TokenDef]) {
        let mut members = Vec::with_capacity(self.len);
        for head in &self.buckets {
            let mut cur = *head;
            while let Some(id) = cur {
                members.push(id);
                cur = defs[id.index()].link;
            }
        }
        members.sort_unstable();

        let n_slots = 2 * self.n_slots() + 1;
        tracing::trace!(n_slots, entries = members.len(), "growing keyword table");
        self.buckets = vec![None; n_slots];
        for id in members {
            self.link_in(defs, id);
        }
    }

    /// First chain entry whose spelling equals `text`.
    pub(super) fn find(&self, defs: &[TokenDef], text: &[u8]) -> Option<TokenDefId> {
        let slot = keyword_hash(text, self.n_slots(), self.case_insensitive);
        let mut cur = self.buckets[slot];
        while let Some(id) = cur {
            let def = &defs[id.index()];
            if self.same(&def.keyword, text) {
                return Some(id);
            }
            cur = def.link;
        }
        None
    }

    #[cfg(test)]
    pub(super) fn longest_chain(&self, defs: &[TokenDef]) -> usize {
        self.buckets
            .iter()
            .map(|head| {
                let mut n = 0;
                let mut cur = *head;
                while let Some(id) = cur {
                    n += 1;
                    cur = defs[id.index()].link;
                }
                n
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests;
