use super::*;
use pretty_assertions::assert_eq;

// === Detection ===

#[test]
fn plain_ascii_is_utf8_without_bom() {
    let buf = SourceBuffer::new(b"let x = 1");
    assert_eq!(buf.encoding(), Encoding::Utf8);
    assert_eq!(buf.as_bytes(), b"let x = 1");
    assert!(buf.encoding_issues().is_empty());
}

#[test]
fn utf8_bom_is_stripped() {
    let buf = SourceBuffer::new(b"\xEF\xBB\xBFabc");
    assert_eq!(buf.encoding(), Encoding::Utf8Bom);
    assert_eq!(buf.as_bytes(), b"abc");
}

#[test]
fn utf32_le_wins_over_utf16_le() {
    assert_eq!(Encoding::detect(&[0xFF, 0xFE, 0, 0, b'a', 0, 0, 0]), Encoding::Utf32Le);
    assert_eq!(Encoding::detect(&[0xFF, 0xFE, b'a', 0]), Encoding::Utf16Le);
}

#[test]
fn bom_lengths() {
    assert_eq!(Encoding::Utf8.bom_len(), 0);
    assert_eq!(Encoding::Utf8Bom.bom_len(), 3);
    assert_eq!(Encoding::Utf16Be.bom_len(), 2);
    assert_eq!(Encoding::Utf32Le.bom_len(), 4);
}

// === Transcoding ===

#[test]
fn utf16_le_is_transcoded() {
    let buf = SourceBuffer::new(&[0xFF, 0xFE, b'h', 0, b'i', 0]);
    assert_eq!(buf.encoding(), Encoding::Utf16Le);
    assert_eq!(buf.as_bytes(), b"hi");
}

#[test]
fn utf16_be_surrogate_pair() {
    // U+1F600 = D83D DE00
    let buf = SourceBuffer::new(&[0xFE, 0xFF, 0xD8, 0x3D, 0xDE, 0x00]);
    assert_eq!(buf.as_bytes(), "\u{1F600}".as_bytes());
}

#[test]
fn utf16_unpaired_surrogate_is_replaced() {
    let buf = SourceBuffer::new(&[0xFF, 0xFE, 0x00, 0xD8, b'a', 0]);
    assert_eq!(buf.as_bytes(), "\u{FFFD}a".as_bytes());
    assert_eq!(
        buf.encoding_issues(),
        &[EncodingIssue {
            kind: EncodingIssueKind::UnpairedSurrogate,
            pos: 2,
        }]
    );
}

#[test]
fn utf16_odd_length_reports_truncation() {
    let buf = SourceBuffer::new(&[0xFE, 0xFF, 0, b'a', 0x00]);
    assert_eq!(buf.as_bytes(), b"a");
    assert_eq!(buf.encoding_issues()[0].kind, EncodingIssueKind::TruncatedUnit);
}

#[test]
fn utf32_be_is_transcoded() {
    let buf = SourceBuffer::new(&[0, 0, 0xFE, 0xFF, 0, 0, 0, b'o', 0, 0, 0, b'k']);
    assert_eq!(buf.encoding(), Encoding::Utf32Be);
    assert_eq!(buf.as_bytes(), b"ok");
}

#[test]
fn utf32_invalid_code_point_is_replaced() {
    let buf = SourceBuffer::new(&[0xFF, 0xFE, 0, 0, 0, 0, 0x11, 0]);
    assert_eq!(buf.as_bytes(), "\u{FFFD}".as_bytes());
    assert_eq!(buf.encoding_issues()[0].kind, EncodingIssueKind::InvalidCodePoint);
}

// === Interior NUL ===

#[test]
fn interior_null_is_recorded() {
    let buf = SourceBuffer::new(b"a\0b");
    assert_eq!(
        buf.encoding_issues(),
        &[EncodingIssue {
            kind: EncodingIssueKind::InteriorNull,
            pos: 1,
        }]
    );
}

#[test]
fn cursor_starts_after_bom() {
    let buf = SourceBuffer::new(b"\xEF\xBB\xBFx");
    assert_eq!(buf.cursor().current(), b'x');
    assert_eq!(buf.len(), 1);
}
