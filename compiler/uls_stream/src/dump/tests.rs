use std::io::Write;
use std::sync::Arc;

use super::*;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use uls_lexer::{Lexer, LexerConfig, TokenSpec};

const IF: TokenId = TokenId::new(130);
const LE: TokenId = TokenId::new(131);

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn lexer(input: &str) -> SharedLexer {
    let config = LexerConfig::default()
        .with_token(TokenSpec::new(IF, "IF").spelling("if"))
        .with_token(TokenSpec::new(LE, "LE").spelling("<="))
        .with_one_chars("+-*/");
    let mut lx = Lexer::new(config).unwrap();
    lx.push_str(input, "t");
    lx.into_shared()
}

fn dump(input: &str) -> (Result<usize, StreamError>, String) {
    let sink = OutputSink::new();
    let out = Captured::default();
    sink.open(Box::new(out.clone())).unwrap();
    let result = dump_tokens(&sink, &lexer(input));
    sink.close().unwrap();
    let text = String::from_utf8(out.0.lock().clone()).unwrap();
    (result, text)
}

#[test]
fn dumps_scenario_tokens() {
    let (result, text) = dump("if a<=-1");
    assert_eq!(result.unwrap(), 5);
    assert_eq!(
        text,
        concat!(
            "\t[     IF] if\n",
            "\t[     ID] a\n",
            "\t[     LE] <=\n",
            "\t[      -] -\n",
            "\t[    NUM] 1\n",
        )
    );
}

#[test]
fn anonymous_tokens_show_their_byte_value() {
    let (_, text) = dump("a = b");
    assert_eq!(text.lines().nth(1), Some("\t[     61] ="));
}

#[test]
fn labels_of_special_ids() {
    let lx = lexer("");
    let lx = lx.lock();
    let registry = lx.registry();
    assert_eq!(token_label(registry, TokenId::EOI), ("EOI".to_owned(), false));
    assert_eq!(token_label(registry, TokenId::new(500)), ("  500".to_owned(), false));
    assert_eq!(format_token(registry, TokenId::EOI, b""), "\t[    EOI]\n");
}

#[test]
fn error_token_is_dumped_then_reported() {
    let (result, text) = dump("a \u{1}");
    assert!(matches!(result, Err(StreamError::Recognition { line: 1, .. })));
    assert_eq!(text, "\t[     ID] a\n\t[    ERR] unknown character\n");
}

#[test]
fn closed_sink_fails_the_dump() {
    let sink = OutputSink::new();
    assert!(matches!(
        dump_tokens(&sink, &lexer("a")),
        Err(StreamError::SinkClosed)
    ));
}
