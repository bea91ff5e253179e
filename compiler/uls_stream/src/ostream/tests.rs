use super::*;
use crate::{ByteOrder, HEADER_SIZE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uls_lexer::{LexerConfig, TokenSpec};

const IF: TokenId = TokenId::new(130);
const LE: TokenId = TokenId::new(131);

fn config() -> LexerConfig {
    LexerConfig::default()
        .with_spec_name("sample")
        .with_token(TokenSpec::new(IF, "IF").spelling("if"))
        .with_token(TokenSpec::new(LE, "LE").spelling("<="))
        .with_one_chars("+-*/")
}

fn shared(input: &str) -> SharedLexer {
    let mut lx = Lexer::new(config()).unwrap();
    lx.push_str(input, "in.u");
    lx.into_shared()
}

fn write(format: StreamFormat, input: &str, numbering: bool) -> Vec<u8> {
    let mut os = OutputStream::create(Vec::new(), shared(input), format, "in.u").unwrap();
    os.start_stream(numbering).unwrap();
    os.finish().unwrap()
}

fn records(codec: Codec, bytes: &[u8]) -> Vec<Record> {
    let mut pos = HEADER_SIZE;
    let mut out = Vec::new();
    while let Some((record, used)) = codec.decode(&bytes[pos..], pos).unwrap() {
        out.push(record);
        pos += used;
    }
    out
}

#[test]
fn text_stream_layout() {
    let bytes = write(StreamFormat::Text, "if a<=-1\nx", true);
    let header = StreamHeader::parse(&bytes).unwrap();
    assert_eq!(header.spec_name, "sample");
    assert_eq!(header.tag, "in.u");
    assert_eq!(
        String::from_utf8(bytes[HEADER_SIZE..].to_vec()).unwrap(),
        concat!(
            "    4     1 1\n",
            "  130     2 if\n",
            "    2     1 a\n",
            "  131     2 <=\n",
            "   45     1 -\n",
            "    3     1 1\n",
            "    4     1 2\n",
            "    2     1 x\n",
            "    1     8 2 4 in.u\n",
            "    0     0 \n",
        )
    );
}

#[test]
fn without_numbering_no_linenum_packets() {
    let codec = Codec::Binary(ByteOrder::Big);
    let bytes = write(StreamFormat::Binary(ByteOrder::Big), "a\nb\nc", false);
    let ids: Vec<TokenId> = records(codec, &bytes).iter().map(|r| r.tok_id).collect();
    assert_eq!(
        ids,
        vec![TokenId::ID, TokenId::ID, TokenId::ID, TokenId::EOF, TokenId::EOI]
    );
}

#[test]
fn tag_change_is_written_once() {
    let mut lx = Lexer::new(config()).unwrap();
    lx.push_str("b", "outer.u");
    lx.push_str("a", "inner.u");
    let lexer = lx.into_shared();
    let mut os = OutputStream::create(Vec::new(), lexer, StreamFormat::Text, "outer.u").unwrap();
    os.start_stream(true).unwrap();
    let bytes = os.finish().unwrap();

    let linenums: Vec<String> = records(Codec::Text, &bytes)
        .into_iter()
        .filter(|r| r.tok_id == TokenId::LINENUM)
        .map(|r| String::from_utf8(r.text).unwrap())
        .collect();
    assert_eq!(linenums, vec!["1 inner.u", "1 outer.u"]);
}

#[test]
fn raw_format_cannot_be_written() {
    assert!(matches!(
        OutputStream::create(Vec::new(), shared(""), StreamFormat::Raw, "x"),
        Err(StreamError::UnsupportedFormat(_))
    ));
}

#[test]
fn recognition_error_stops_the_stream() {
    let mut os = OutputStream::create(Vec::new(), shared("a \u{1}"), StreamFormat::Text, "in.u")
        .unwrap();
    assert!(matches!(
        os.start_stream(true),
        Err(StreamError::Recognition { line: 1, .. })
    ));
}

#[test]
fn want_eof_is_restored() {
    let lexer = shared("a");
    let mut os =
        OutputStream::create(Vec::new(), Arc::clone(&lexer), StreamFormat::Text, "in.u").unwrap();
    os.start_stream(false).unwrap();
    assert!(!lexer.lock().want_eof());
}

#[test]
fn manual_packets_get_closing_packets() {
    let lexer = Lexer::new(config()).unwrap().into_shared();
    let mut os = OutputStream::create(Vec::new(), lexer, StreamFormat::Text, "").unwrap();
    os.print_tok_linenum(10, "").unwrap();
    os.print_tok(IF, b"if").unwrap();
    let bytes = os.finish().unwrap();
    let ids: Vec<TokenId> = records(Codec::Text, &bytes).iter().map(|r| r.tok_id).collect();
    assert_eq!(
        ids,
        vec![TokenId::LINENUM, IF, TokenId::EOF, TokenId::EOI]
    );
}

#[test]
fn long_streams_flush_in_order() {
    let input = "a ".repeat(2000);
    let codec = Codec::Binary(ByteOrder::Little);
    let bytes = write(StreamFormat::Binary(ByteOrder::Little), &input, true);
    let records = records(codec, &bytes);
    assert_eq!(records.len(), 1 + 2000 + 2);
    assert!(records[1..=2000].iter().all(|r| r.tok_id == TokenId::ID));
}

proptest! {
    #[test]
    fn one_linenum_per_line(n in 1usize..60) {
        let input = "x ".repeat(n);
        let bytes = write(StreamFormat::host_binary(), &input, true);
        let records = records(Codec::Binary(ByteOrder::host()), &bytes);
        let linenums = records.iter().filter(|r| r.tok_id == TokenId::LINENUM).count();
        prop_assert_eq!(linenums, 1);
        prop_assert_eq!(records[0].tok_id, TokenId::LINENUM);
        prop_assert!(records[1..=n].iter().all(|r| r.tok_id == TokenId::ID));
    }
}
