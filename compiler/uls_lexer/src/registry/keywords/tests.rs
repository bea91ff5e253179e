use super::*;
use crate::registry::KeywordKind;
use crate::registry::TokenViewId;
use smallvec::SmallVec;

fn def(text: &str) -> TokenDef {
    TokenDef {
        keyword: SmallVec::from_slice(text.as_bytes()),
        kind: KeywordKind::IdentifierStyle,
        view: TokenViewId(0),
        link: None,
        group_next: None,
    }
}

#[test]
fn hash_is_bounded_by_slot_count() {
    for n_slots in [1, 7, 127, 4099] {
        assert!(keyword_hash(b"while", n_slots, false) < n_slots);
    }
}

#[test]
fn hash_matches_reference_formula() {
    // 127 slots: bit width 7, no extra shifts.
    let expected = (((u32::from(b'i') << 1) ^ u32::from(b'f')) % 127) as usize;
    assert_eq!(keyword_hash(b"if", 127, false), expected);
}

#[test]
fn wide_tables_shift_by_position() {
    // 1024 slots: bit width 11, shifts cycle over 0..=3.
    let text = b"ab";
    let h = (u32::from(b'a') << 1) ^ (u32::from(b'b') << 1);
    assert_eq!(keyword_hash(text, 1024, false), h as usize % 1024);
}

#[test]
fn case_folding_hashes_alike() {
    assert_eq!(keyword_hash(b"While", 127, true), keyword_hash(b"WHILE", 127, true));
}

#[test]
fn later_insert_shadows_earlier() {
    let mut defs = vec![def("go"), def("go")];
    let mut table = KeywordTable::new(5, false);
    table.insert(&mut defs, TokenDefId(0));
    table.insert(&mut defs, TokenDefId(1));
    assert_eq!(table.find(&defs, b"go"), Some(TokenDefId(1)));
}

#[test]
fn table_grows_and_keeps_entries() {
    let words: Vec<String> = (0..40).map(|i| format!("kw{i}")).collect();
    let mut defs: Vec<TokenDef> = words.iter().map(|w| def(w)).collect();
    let mut table = KeywordTable::new(3, false);
    for i in 0..defs.len() {
        table.insert(&mut defs, TokenDefId(u32::try_from(i).unwrap()));
    }
    assert!(table.n_slots() > 3);
    assert_eq!(table.len(), 40);
    assert!(table.longest_chain(&defs) <= 40);
    for (i, w) in words.iter().enumerate() {
        assert_eq!(table.find(&defs, w.as_bytes()), Some(TokenDefId(u32::try_from(i).unwrap())));
    }
}
