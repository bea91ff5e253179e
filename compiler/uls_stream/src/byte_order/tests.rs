use super::*;
use pretty_assertions::assert_eq;

#[test]
fn host_matches_target() {
    let expected = if cfg!(target_endian = "big") {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };
    assert_eq!(ByteOrder::host(), expected);
}

#[test]
fn put_i32_layout() {
    let mut le = Vec::new();
    ByteOrder::Little.put_i32(0x0102_0304, &mut le);
    assert_eq!(le, [4, 3, 2, 1]);

    let mut be = Vec::new();
    ByteOrder::Big.put_i32(0x0102_0304, &mut be);
    assert_eq!(be, [1, 2, 3, 4]);
}

#[test]
fn get_i32_reverses_put() {
    for order in [ByteOrder::Little, ByteOrder::Big] {
        for value in [0, 1, -1, 130, i32::MIN, i32::MAX] {
            let mut out = Vec::new();
            order.put_i32(value, &mut out);
            let bytes: [u8; 4] = out.try_into().unwrap();
            assert_eq!(order.get_i32(bytes), value);
        }
    }
}

#[test]
fn read_i32_reports_short_input() {
    let err = read_i32(ByteOrder::Little, &[1, 2, 3], 0, 100, "short").unwrap_err();
    assert!(matches!(
        err,
        StreamError::MalformedRecord {
            offset: 100,
            reason: "short"
        }
    ));
}
