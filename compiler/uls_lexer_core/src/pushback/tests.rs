use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Drain `buf`, rendering tokens as `<id:lexeme>`.
fn drain(buf: &mut PushbackBuffer) -> String {
    let mut out = String::new();
    loop {
        if let Some(tok) = buf.take_token() {
            out.push_str(&format!("<{}:{}>", tok.tok_id, String::from_utf8_lossy(&tok.lexeme)));
            continue;
        }
        let rest = buf.rest();
        if rest.is_empty() {
            break;
        }
        out.push_str(&String::from_utf8_lossy(rest));
        let n = rest.len();
        buf.advance(n);
    }
    out
}

#[test]
fn reads_plain_input() {
    let mut buf = PushbackBuffer::new(b"ab\ncd".to_vec());
    assert_eq!(buf.rest(), b"ab\ncd");
    buf.advance(3);
    assert_eq!(buf.line(), 2);
    assert!(buf.at_line_start());
    assert_eq!(buf.rest(), b"cd");
}

#[test]
fn unget_in_place_after_reading() {
    let mut buf = PushbackBuffer::new(b"hello world".to_vec());
    buf.advance(6);
    buf.unget_str("big ");
    assert_eq!(buf.rest(), b"big world");
}

#[test]
fn unget_at_start_reallocates() {
    let mut buf = PushbackBuffer::new(b"tail".to_vec());
    buf.unget_char('é');
    buf.unget_str("head ");
    assert_eq!(drain(&mut buf), "head étail");
}

#[test]
fn ungot_newlines_are_subtracted_then_recounted() {
    let mut buf = PushbackBuffer::new(b"x".to_vec());
    buf.unget_str("a\nb\n");
    assert_eq!(buf.line(), -1);
    drain(&mut buf);
    assert_eq!(buf.line(), 1);
}

#[test]
fn token_is_returned_before_remaining_bytes() {
    let mut buf = PushbackBuffer::new(b"abc".to_vec());
    buf.advance(1);
    buf.unget_token(130, b"tok", 0);
    assert_eq!(buf.rest(), b"");
    assert_eq!(
        buf.take_token(),
        Some(UngotToken {
            tok_id: 130,
            lexeme: b"tok".to_vec(),
            n_lfs: 0,
        })
    );
    assert_eq!(buf.rest(), b"bc");
}

#[test]
fn later_ungets_come_first() {
    let mut buf = PushbackBuffer::new(b"rest".to_vec());
    buf.unget_token(1, b"first", 0);
    buf.unget_str("x");
    buf.unget_token(2, b"second", 0);
    assert_eq!(drain(&mut buf), "<2:second>x<1:first>rest");
}

#[test]
fn token_markers_survive_reallocation() {
    let mut buf = PushbackBuffer::new(b"z".to_vec());
    buf.unget_token(7, b"t", 0);
    let long = "q".repeat(200);
    buf.unget_str(&long);
    assert_eq!(drain(&mut buf), format!("{long}<7:t>z"));
}

#[test]
fn multiline_token_restores_line_count() {
    let mut buf = PushbackBuffer::new(b"a\n\nb".to_vec());
    buf.advance(3);
    assert_eq!(buf.line(), 3);
    buf.unget_token(9, b"\n\n", 2);
    assert_eq!(buf.line(), 1);
    assert!(buf.take_token().is_some());
    assert_eq!(buf.line(), 3);
}

#[test]
fn take_token_is_none_without_segment() {
    let mut buf = PushbackBuffer::new(b"a".to_vec());
    assert_eq!(buf.take_token(), None);
}

#[derive(Clone, Debug)]
enum Unget {
    Char(char),
    Str(String),
    Token(String),
}

fn unget_strategy() -> impl Strategy<Value = Unget> {
    prop_oneof![
        any::<char>().prop_map(Unget::Char),
        "[a-z\n]{0,12}".prop_map(Unget::Str),
        "[a-z\n]{1,6}".prop_map(Unget::Token),
    ]
}

proptest! {
    #[test]
    fn proptest_ungets_are_read_first_and_lines_balance(
        input in "[a-z \n]{0,40}",
        consumed in 0usize..40,
        ungets in proptest::collection::vec(unget_strategy(), 0..8),
    ) {
        let mut plain = PushbackBuffer::new(input.as_bytes().to_vec());
        let expected_plain = drain(&mut plain);
        let final_line = plain.line();

        let mut buf = PushbackBuffer::new(input.as_bytes().to_vec());
        let consumed = consumed.min(input.len());
        buf.advance(consumed);

        // Rendered form of the ungets, in read-back order.
        let mut expected_front = String::new();
        for unget in &ungets {
            let piece = match unget {
                Unget::Char(c) => {
                    buf.unget_char(*c);
                    c.to_string()
                }
                Unget::Str(s) => {
                    buf.unget_str(s);
                    s.clone()
                }
                Unget::Token(s) => {
                    buf.unget_token(200, s.as_bytes(), count_newlines(s.as_bytes()));
                    format!("<200:{s}>")
                }
            };
            expected_front.insert_str(0, &piece);
        }

        let read = drain(&mut buf);
        prop_assert_eq!(read, format!("{expected_front}{}", &expected_plain[consumed..]));

        // Every ungotten newline was subtracted on unget and re-added on read.
        prop_assert_eq!(buf.line(), final_line);
    }
}
