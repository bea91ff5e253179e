use super::*;
use pretty_assertions::assert_eq;

fn sample() -> StreamHeader {
    StreamHeader {
        version: StreamVersion::CURRENT,
        spec_name: "sample".to_owned(),
        format: StreamFormat::Binary(ByteOrder::Big),
        creation_time: "2026-10-16 09:30".to_owned(),
        tag: "input.txt".to_owned(),
        remap_blocks: 0,
    }
}

#[test]
fn header_is_exactly_512_bytes() {
    let bytes = sample().to_bytes().unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(&bytes[509..], b"%%\n");
    assert!(StreamHeader::is_stream(&bytes));
}

#[test]
fn header_text_layout() {
    let bytes = sample().to_bytes().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().take(7).collect();
    assert_eq!(
        lines[..6].to_vec(),
        vec![
            MAGIC,
            "FILE_VERSION: 2.2",
            "SPEC: sample",
            "TYPE: BIN/BIG",
            "CREATION_TIME: 2026-10-16 09:30",
            "TAG: input.txt",
        ]
    );
    assert!(lines[6].starts_with("#___"));
    assert!(lines[6].contains("RECOMMENDED NOT TO EDIT!"));
}

#[test]
fn parse_reads_what_to_bytes_wrote() {
    for format in [
        StreamFormat::Binary(ByteOrder::Little),
        StreamFormat::Binary(ByteOrder::Big),
        StreamFormat::Text,
    ] {
        let header = StreamHeader {
            format,
            ..sample()
        };
        let parsed = StreamHeader::parse(&header.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, header);
    }
}

#[test]
fn parse_ignores_bytes_after_header() {
    let mut bytes = sample().to_bytes().unwrap();
    bytes.extend_from_slice(b"\x01\x02packets");
    assert_eq!(StreamHeader::parse(&bytes).unwrap(), sample());
}

#[test]
fn empty_tag_round_trips() {
    let header = StreamHeader {
        tag: String::new(),
        ..sample()
    };
    assert_eq!(StreamHeader::parse(&header.to_bytes().unwrap()).unwrap(), header);
}

#[test]
fn raw_header_cannot_be_written() {
    assert!(matches!(
        StreamHeader::raw().to_bytes(),
        Err(StreamError::UnsupportedFormat(_))
    ));
}

#[test]
fn oversized_attributes_are_rejected() {
    let header = StreamHeader {
        tag: "t".repeat(500),
        ..sample()
    };
    assert!(matches!(header.to_bytes(), Err(StreamError::InvalidHeader(_))));
}

#[test]
fn newline_in_attribute_is_rejected() {
    let header = StreamHeader {
        spec_name: "a\nb".to_owned(),
        ..sample()
    };
    assert!(matches!(header.to_bytes(), Err(StreamError::InvalidHeader(_))));
}

#[test]
fn corrupt_headers_are_rejected() {
    let good = sample().to_bytes().unwrap();

    assert!(StreamHeader::parse(b"plain text").is_err());
    assert!(StreamHeader::parse(&good[..300]).is_err());

    let mut no_terminator = good.clone();
    no_terminator[510] = b'x';
    assert!(StreamHeader::parse(&no_terminator).is_err());

    let text = String::from_utf8(good).unwrap();
    let unknown = text.replacen("TAG: input.txt", "ZAG: input.txt", 1);
    assert!(matches!(
        StreamHeader::parse(unknown.as_bytes()),
        Err(StreamError::InvalidHeader(_))
    ));
    let bad_type = text.replacen("TYPE: BIN/BIG", "TYPE: BIN/MID", 1);
    assert!(matches!(
        StreamHeader::parse(bad_type.as_bytes()),
        Err(StreamError::UnsupportedFormat(_))
    ));
}

#[test]
fn compatibility_rules() {
    let header = sample();
    let supported = StreamVersion::CURRENT;
    assert!(header.check_compatibility("sample", supported).is_ok());
    assert!(matches!(
        header.check_compatibility("other", supported),
        Err(StreamError::SpecMismatch { .. })
    ));
    assert!(matches!(
        header.check_compatibility("sample", StreamVersion::new(2, 1, 0)),
        Err(StreamError::UnsupportedVersion { .. })
    ));
    assert!(StreamHeader::raw()
        .check_compatibility("anything", StreamVersion::new(0, 0, 0))
        .is_ok());
}

#[test]
fn format_names() {
    assert_eq!("bin-le".parse::<StreamFormat>().ok(), Some(StreamFormat::Binary(ByteOrder::Little)));
    assert_eq!("bin".parse::<StreamFormat>().ok(), Some(StreamFormat::host_binary()));
    assert_eq!("txt".parse::<StreamFormat>().ok(), Some(StreamFormat::Text));
    assert!("xml".parse::<StreamFormat>().is_err());
    assert_eq!(StreamFormat::Binary(ByteOrder::Big).to_string(), "bin-be");
}

/// Turn the first filler line of `header` into a `TOKEN_REMAP` attribute.
fn declare_remap(header: &mut [u8], value: &str) {
    let attr = format!("TOKEN_REMAP: {value}\n#");
    let at = header.windows(3).position(|w| w == b"\n#_").unwrap() + 1;
    header[at..at + attr.len()].copy_from_slice(attr.as_bytes());
}

#[test]
fn token_remap_blocks_are_skipped() {
    let mut bytes = sample().to_bytes().unwrap();
    declare_remap(&mut bytes, "4 2");
    bytes.resize(HEADER_SIZE * 3, b'x');
    let header = StreamHeader::parse(&bytes).unwrap();
    assert_eq!(header.remap_blocks, 2);
    assert_eq!(header.data_offset(), 1536);
    assert_eq!(header.tag, "input.txt");
}

#[test]
fn token_remap_must_fit_the_file() {
    let mut bytes = sample().to_bytes().unwrap();
    declare_remap(&mut bytes, "4 2");
    bytes.resize(HEADER_SIZE * 2, b'x');
    assert!(matches!(StreamHeader::parse(&bytes), Err(StreamError::InvalidHeader(_))));
}

#[test]
fn malformed_token_remap_is_rejected() {
    for value in ["4", "x 1", "1 -2", "1 99999999"] {
        let mut bytes = sample().to_bytes().unwrap();
        declare_remap(&mut bytes, value);
        assert!(
            matches!(StreamHeader::parse(&bytes), Err(StreamError::InvalidHeader(_))),
            "{value}"
        );
    }
}
