use std::sync::Arc;

use super::*;
use crate::{ByteOrder, Codec, Record, TemplateList};
use pretty_assertions::assert_eq;
use uls_lexer::{Lexer, LexerConfig, TokenSpec};

const IF: TokenId = TokenId::new(130);

fn lexer() -> Lexer {
    let config = LexerConfig::default()
        .with_spec_name("sample")
        .with_token(TokenSpec::new(IF, "IF").spelling("if"));
    Lexer::new(config).unwrap()
}

fn reader(records: &[Record]) -> PacketReader {
    let codec = Codec::Binary(ByteOrder::Little);
    let mut out = Vec::new();
    for record in records {
        codec.encode(record, &mut out);
    }
    PacketReader::new(out.into(), 0, codec, "stream.uls")
}

fn drain(lexer: &mut Lexer) -> Vec<(TokenId, String, i32, String)> {
    let mut out = Vec::new();
    for _ in 0..50 {
        let tok = lexer.get_token();
        let (tag, line) = lexer.tag();
        out.push((tok, lexer.lexeme().into_owned(), line, tag.to_owned()));
        if tok == TokenId::EOI || tok == TokenId::ERR {
            break;
        }
    }
    out
}

#[test]
fn feed_replays_tokens_with_coordinates() {
    let records = [
        Record::line_number(2, None),
        Record::new(IF, "if"),
        Record::line_number(5, Some("inner.u")),
        Record::new(TokenId::ID, "x"),
        Record::new(TokenId::EOF, "5 7 inner.u"),
        Record::new(TokenId::EOI, ""),
    ];
    let mut lx = lexer();
    lx.push_feed(Box::new(PacketFeed::new(reader(&records))), "stream.uls");
    let tokens = drain(&mut lx);
    assert_eq!(
        tokens,
        vec![
            (IF, "if".to_owned(), 2, "stream.uls".to_owned()),
            (TokenId::ID, "x".to_owned(), 5, "inner.u".to_owned()),
            (TokenId::EOI, String::new(), 5, String::new()),
        ]
    );
}

#[test]
fn tag_is_sent_only_when_it_changes() {
    let records = [
        Record::line_number(1, Some("a")),
        Record::new(TokenId::ID, "x"),
        Record::new(TokenId::ID, "y"),
        Record::new(TokenId::EOI, ""),
    ];
    let mut feed = PacketFeed::new(reader(&records));
    let first = feed.next_token().unwrap();
    let second = feed.next_token().unwrap();
    assert_eq!(first.tag.as_deref(), Some("a"));
    assert_eq!(second.tag, None);
    assert_eq!(feed.next_token(), None);
    assert_eq!(feed.next_token(), None);
}

#[test]
fn templates_are_substituted_in_the_feed() {
    let records = [
        Record::new(TokenId::ID, "T"),
        Record::new(TokenId::ID, "U"),
        Record::new(TokenId::EOI, ""),
    ];
    let mut templates = TemplateList::new();
    templates.add("T", "double").unwrap();
    let mut reader = reader(&records);
    reader.set_templates(Arc::new(templates));

    let mut lx = lexer();
    lx.push_feed(Box::new(PacketFeed::new(reader)), "s");
    assert_eq!(lx.get_token(), TokenId::TMPL);
    assert_eq!(lx.lexeme(), "double");
    assert_eq!(lx.get_token(), TokenId::ID);
    assert_eq!(lx.lexeme(), "U");
}

#[test]
fn decode_error_becomes_sticky_err() {
    let records = [Record::new(TokenId::ID, "x")];
    let mut lx = lexer();
    lx.push_feed(Box::new(PacketFeed::new(reader(&records))), "s");
    assert_eq!(lx.get_token(), TokenId::ID);
    assert_eq!(lx.get_token(), TokenId::ERR);
    assert!(lx.lexeme().contains("without EOI"));
    assert_eq!(lx.get_token(), TokenId::ERR);
    lx.pop_source().unwrap();
    assert_eq!(lx.get_token(), TokenId::EOI);
}

#[test]
fn lexer_reports_its_own_eof_for_the_feed() {
    let records = [
        Record::line_number(4, None),
        Record::new(TokenId::ID, "x"),
        Record::new(TokenId::EOF, "4 1 s"),
        Record::new(TokenId::EOI, ""),
    ];
    let mut lx = lexer();
    lx.set_want_eof(true);
    lx.push_feed(Box::new(PacketFeed::new(reader(&records))), "s");
    assert_eq!(lx.get_token(), TokenId::ID);
    assert_eq!(lx.get_token(), TokenId::EOF);
    assert_eq!(lx.get_token(), TokenId::EOI);
}
