use super::*;
use crate::{ByteOrder, OutputStream, HEADER_SIZE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uls_lexer::{Lexer, LexerConfig, QuoteType, TokenSpec};

const IF: TokenId = TokenId::new(130);
const LE: TokenId = TokenId::new(131);
const STR: TokenId = TokenId::new(132);

fn config() -> LexerConfig {
    LexerConfig::default()
        .with_spec_name("sample")
        .with_token(TokenSpec::new(IF, "IF").spelling("if"))
        .with_token(TokenSpec::new(LE, "LE").spelling("<="))
        .with_one_chars("+-*/;")
        .with_quote("STR", QuoteType::new(STR.raw(), "\""))
}

fn new_lexer() -> SharedLexer {
    Lexer::new(config()).unwrap().into_shared()
}

fn write(format: StreamFormat, input: &str) -> Vec<u8> {
    let lexer = new_lexer();
    lexer.lock().push_str(input, "in.u");
    let mut os = OutputStream::create(Vec::new(), lexer, format, "in.u").unwrap();
    os.start_stream(true).unwrap();
    os.finish().unwrap()
}

/// `(id, lexeme, line)` of every token up to `EOI`, `EOF` excluded.
fn read_all(stream: &mut InputStream) -> Vec<(TokenId, String, i32)> {
    let mut out = Vec::new();
    for _ in 0..10_000 {
        let tok = stream.read_tok().unwrap();
        if tok.tok_id == TokenId::EOI {
            break;
        }
        if tok.tok_id != TokenId::EOF {
            out.push((tok.tok_id, String::from_utf8(tok.lexeme).unwrap(), tok.line));
        }
    }
    out
}

fn lex_directly(input: &str) -> Vec<(TokenId, String, i32)> {
    let mut lx = Lexer::new(config()).unwrap();
    lx.push_str(input, "in.u");
    let mut out = Vec::new();
    loop {
        let tok = lx.get_token();
        if tok == TokenId::EOI {
            return out;
        }
        out.push((tok, lx.lexeme().into_owned(), lx.line_number()));
    }
}

fn open_bound(bytes: Vec<u8>) -> InputStream {
    let mut stream = InputStream::open(bytes, "in.u").unwrap();
    stream.bind(new_lexer()).unwrap();
    stream
}

const PROGRAM: &str = "if a<=-1\n  b = \"two words\";\n\nc + 0x1F;";

#[test]
fn token_remap_blocks_before_packets_are_skipped() {
    let written = write(StreamFormat::Binary(ByteOrder::Little), PROGRAM);
    // Overwrite the first filler line with the attribute.
    let mut bytes = written[..HEADER_SIZE].to_vec();
    let attr = b"TOKEN_REMAP: 1 1\n#";
    let at = bytes.windows(3).position(|w| w == b"\n#_").unwrap() + 1;
    bytes[at..at + attr.len()].copy_from_slice(attr);
    bytes.extend_from_slice(&[b'%'; HEADER_SIZE]);
    bytes.extend_from_slice(&written[HEADER_SIZE..]);

    let mut stream = open_bound(bytes);
    assert_eq!(stream.header().remap_blocks, 1);
    assert_eq!(read_all(&mut stream), lex_directly(PROGRAM));
}

#[test]
fn binary_streams_read_back_in_every_order() {
    let expected = lex_directly(PROGRAM);
    for format in [
        StreamFormat::Binary(ByteOrder::Little),
        StreamFormat::Binary(ByteOrder::Big),
        StreamFormat::host_binary(),
    ] {
        let mut stream = open_bound(write(format, PROGRAM));
        assert_eq!(stream.format(), format);
        assert_eq!(read_all(&mut stream), expected);
    }
}

#[test]
fn text_stream_reads_back() {
    let input = "a \"x\u{1}y\" b";
    let mut stream = open_bound(write(StreamFormat::Text, input));
    assert_eq!(read_all(&mut stream), lex_directly(input));
}

#[test]
fn raw_text_is_tokenized_by_the_bound_lexer() {
    let mut stream = open_bound(PROGRAM.as_bytes().to_vec());
    assert_eq!(stream.format(), StreamFormat::Raw);
    assert_eq!(stream.header().tag, "in.u");
    assert_eq!(read_all(&mut stream), lex_directly(PROGRAM));
}

#[test]
fn raw_text_with_bom_is_decoded() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "if x".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let mut stream = open_bound(bytes);
    assert_eq!(
        read_all(&mut stream),
        vec![(IF, "if".to_owned(), 1), (TokenId::ID, "x".to_owned(), 1)]
    );
}

#[test]
fn reading_needs_a_bound_lexer() {
    let mut stream = InputStream::open(write(StreamFormat::Text, "a"), "").unwrap();
    assert!(matches!(stream.read_tok(), Err(StreamError::Unbound)));
    assert!(matches!(stream.push_to_lexer(), Err(StreamError::Unbound)));
}

#[test]
fn spec_name_must_match() {
    let mut stream = InputStream::open(write(StreamFormat::Text, "a"), "").unwrap();
    let other = Lexer::new(config().with_spec_name("other")).unwrap().into_shared();
    assert!(matches!(
        stream.bind(other),
        Err(StreamError::SpecMismatch { .. })
    ));
}

#[test]
fn newer_stream_version_is_rejected() {
    let mut stream = InputStream::open(write(StreamFormat::Text, "a"), "").unwrap();
    let old = Lexer::new(config().with_stream_version([2, 1, 9]))
        .unwrap()
        .into_shared();
    assert!(matches!(
        stream.bind(old),
        Err(StreamError::UnsupportedVersion { .. })
    ));
    let newer = Lexer::new(config().with_stream_version([3, 0, 0]))
        .unwrap()
        .into_shared();
    assert!(stream.bind(newer).is_ok());
}

#[test]
fn raw_streams_bind_to_any_lexer() {
    let mut stream = InputStream::open(b"a b".to_vec(), "raw").unwrap();
    let other = Lexer::new(config().with_spec_name("other")).unwrap().into_shared();
    assert!(stream.bind(other).is_ok());
}

#[test]
fn rewind_replays_the_stream() {
    let mut stream = open_bound(write(StreamFormat::Binary(ByteOrder::Big), PROGRAM));
    let first = read_all(&mut stream);
    stream.rewind();
    assert_eq!(read_all(&mut stream), first);
}

#[test]
fn templates_replace_matching_identifiers() {
    let mut stream = open_bound(write(StreamFormat::Text, "T x = T;"));
    let mut templates = TemplateList::new();
    templates.add("T", "unsigned").unwrap();
    stream.set_templates(templates);
    let tokens = read_all(&mut stream);
    assert_eq!(tokens[0], (TokenId::TMPL, "unsigned".to_owned(), 1));
    assert_eq!(tokens[1], (TokenId::ID, "x".to_owned(), 1));
    assert_eq!(tokens[3], (TokenId::TMPL, "unsigned".to_owned(), 1));
}

#[test]
fn pushed_stream_is_replayed_by_the_lexer() {
    let bytes = write(StreamFormat::Binary(ByteOrder::Little), PROGRAM);
    let mut stream = InputStream::open(bytes, "").unwrap();
    let lexer = new_lexer();
    stream.bind(Arc::clone(&lexer)).unwrap();
    stream.push_to_lexer().unwrap();

    let mut lx = lexer.lock();
    let mut tokens = Vec::new();
    loop {
        let tok = lx.get_token();
        if tok == TokenId::EOI {
            break;
        }
        tokens.push((tok, lx.lexeme().into_owned(), lx.line_number()));
    }
    assert_eq!(tokens, lex_directly(PROGRAM));
}

#[test]
fn corrupt_stream_reports_malformed_record() {
    let mut bytes = write(StreamFormat::Binary(ByteOrder::Little), "a b c");
    bytes.truncate(bytes.len() - 12);
    let mut stream = open_bound(bytes);
    let err = loop {
        match stream.read_tok() {
            Ok(tok) => assert_ne!(tok.tok_id, TokenId::EOI),
            Err(err) => break err,
        }
    };
    assert!(matches!(err, StreamError::MalformedRecord { .. }));
}

#[test]
fn stream_files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.uls");

    let lexer = new_lexer();
    lexer.lock().push_str(PROGRAM, "prog.u");
    let mut os = OutputStream::create_file(
        &path,
        lexer,
        StreamFormat::Binary(ByteOrder::Big),
        "prog.u",
    )
    .unwrap();
    os.start_stream(true).unwrap();
    os.finish().unwrap();

    let mut stream = InputStream::open_file(&path).unwrap();
    assert_eq!(stream.header().tag, "prog.u");
    stream.bind(new_lexer()).unwrap();
    assert_eq!(read_all(&mut stream), lex_directly(PROGRAM));
}

#[test]
fn raw_files_are_tagged_with_their_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.u");
    std::fs::write(&path, "if x").unwrap();
    let stream = InputStream::open_file(&path).unwrap();
    assert_eq!(stream.header().tag, path.display().to_string());
    assert!(matches!(
        InputStream::open_file(&dir.path().join("missing")),
        Err(StreamError::Io(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn written_tokens_read_back(words in proptest::collection::vec("[a-z]{1,6}|[0-9]{1,4}|[-+*/;]|<=", 0..30)) {
        let input = words.join(" ");
        let expected = lex_directly(&input);
        for format in [
            StreamFormat::Binary(ByteOrder::Little),
            StreamFormat::Binary(ByteOrder::Big),
            StreamFormat::Text,
        ] {
            let mut stream = open_bound(write(format, &input));
            prop_assert_eq!(read_all(&mut stream), expected.clone());
        }
    }
}
