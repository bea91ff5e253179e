use super::*;

#[test]
fn reserved_ids_are_fixed() {
    assert_eq!(TokenId::EOI.raw(), 0);
    assert_eq!(TokenId::EOF.raw(), 1);
    assert_eq!(TokenId::ERR.raw(), 8);
    assert!(TokenId::TMPL.is_reserved());
    assert!(!TokenId::new(b'+'.into()).is_reserved());
}

#[test]
fn user_range_starts_at_128() {
    assert!(!TokenId::new(127).is_user());
    assert!(TokenId::new(128).is_user());
}

#[test]
fn display_is_the_raw_number() {
    assert_eq!(TokenId::new(-3).to_string(), "-3");
    assert_eq!(format!("{:5}", TokenId::NUM), "    3");
}
