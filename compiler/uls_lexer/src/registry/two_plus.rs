//! Two-plus-character operator trees.
//!
//! One tree per distinct spelling length, each a sorted array searched
//! with binary search. Trees are kept ordered from the longest length to
//! the shortest, so the first hit is the longest match (`<==` before
//! `<=` before `<`).

use smallvec::SmallVec;

use super::TokenDefId;

struct TwoPlusTree {
    len: usize,
    entries: Vec<(SmallVec<[u8; 8]>, TokenDefId)>,
}

#[derive(Default)]
pub(super) struct TwoPlusTrees {
    /// Ordered by `len`, longest first.
    trees: Vec<TwoPlusTree>,
}

impl TwoPlusTrees {
    /// Add `spelling`; a spelling registered again replaces the old entry.
    pub(super) fn insert(&mut self, spelling: &[u8], id: TokenDefId) {
        let len = spelling.len();
        let at = match self.trees.binary_search_by(|t| len.cmp(&t.len)) {
            Ok(at) => at,
            Err(at) => {
                self.trees.insert(
                    at,
                    TwoPlusTree {
                        len,
                        entries: Vec::new(),
                    },
                );
                at
            }
        };
        let entries = &mut self.trees[at].entries;
        match entries.binary_search_by(|(k, _)| k.as_slice().cmp(spelling)) {
            Ok(i) => entries[i].1 = id,
            Err(i) => entries.insert(i, (SmallVec::from_slice(spelling), id)),
        }
    }

    /// Longest registered spelling that prefixes `rest`, with its length.
    pub(super) fn longest_match(&self, rest: &[u8]) -> Option<(TokenDefId, usize)> {
        self.trees
            .iter()
            .filter(|t| t.len <= rest.len())
            .find_map(|t| {
                let probe = &rest[..t.len];
                t.entries
                    .binary_search_by(|(k, _)| k.as_slice().cmp(probe))
                    .ok()
                    .map(|i| (t.entries[i].1, t.len))
            })
    }

    /// Spelling lengths, longest first.
    #[cfg(test)]
    pub(super) fn lengths(&self) -> Vec<usize> {
        self.trees.iter().map(|t| t.len).collect()
    }
}
