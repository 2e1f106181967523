//! RESP Codec Tests
//!
//! Tests for command encoding and reply decoding.

use std::io::Cursor;

use rebloom::transport::{encode_command, read_reply};
use rebloom::{Arg, RebloomError, Reply};

fn decode(bytes: &[u8]) -> rebloom::Result<Reply> {
    let mut cursor = Cursor::new(bytes);
    read_reply(&mut cursor)
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_string_arguments() {
    let encoded = encode_command(&[
        Arg::from("BF.ADD"),
        Arg::from("key"),
        Arg::from("item"),
    ]);
    assert_eq!(
        encoded,
        b"*3\r\n$6\r\nBF.ADD\r\n$3\r\nkey\r\n$4\r\nitem\r\n"
    );
}

#[test]
fn test_encode_stringifies_numeric_arguments() {
    let encoded = encode_command(&[
        Arg::from("CMS.INITBYDIM"),
        Arg::from("k"),
        Arg::from(3000u64),
        Arg::from(40u64),
    ]);
    assert_eq!(
        encoded,
        b"*4\r\n$13\r\nCMS.INITBYDIM\r\n$1\r\nk\r\n$4\r\n3000\r\n$2\r\n40\r\n"
    );
}

#[test]
fn test_encode_stringifies_float_arguments() {
    let encoded = encode_command(&[Arg::from("BF.RESERVE"), Arg::from("k"), Arg::from(0.0001)]);
    assert_eq!(
        encoded,
        b"*3\r\n$10\r\nBF.RESERVE\r\n$1\r\nk\r\n$6\r\n0.0001\r\n"
    );
}

#[test]
fn test_encode_binary_argument_verbatim() {
    let chunk: Vec<u8> = vec![0x00, 0x0D, 0x0A, 0xFF];
    let encoded = encode_command(&[Arg::from("BF.LOADCHUNK"), Arg::from(chunk.clone())]);

    let mut expected = b"*2\r\n$12\r\nBF.LOADCHUNK\r\n$4\r\n".to_vec();
    expected.extend_from_slice(&chunk);
    expected.extend_from_slice(b"\r\n");
    assert_eq!(encoded, expected);
}

#[test]
fn test_encode_empty_command_vector() {
    assert_eq!(encode_command(&[]), b"*0\r\n");
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_simple_string() {
    assert_eq!(decode(b"+OK\r\n").unwrap(), Reply::Simple("OK".to_string()));
}

#[test]
fn test_decode_error() {
    assert_eq!(
        decode(b"-ERR not found\r\n").unwrap(),
        Reply::Error("ERR not found".to_string())
    );
}

#[test]
fn test_decode_integers() {
    assert_eq!(decode(b":42\r\n").unwrap(), Reply::Int(42));
    assert_eq!(decode(b":-3\r\n").unwrap(), Reply::Int(-3));
    assert_eq!(decode(b":0\r\n").unwrap(), Reply::Int(0));
}

#[test]
fn test_decode_bulk_string() {
    assert_eq!(decode(b"$5\r\nhello\r\n").unwrap(), Reply::Bulk(b"hello".to_vec()));
    assert_eq!(decode(b"$0\r\n\r\n").unwrap(), Reply::Bulk(Vec::new()));
    assert_eq!(decode(b"$-1\r\n").unwrap(), Reply::Nil);
}

#[test]
fn test_decode_bulk_string_with_embedded_crlf() {
    assert_eq!(
        decode(b"$7\r\nab\r\ncde\r\n").unwrap(),
        Reply::Bulk(b"ab\r\ncde".to_vec())
    );
}

#[test]
fn test_decode_array() {
    assert_eq!(
        decode(b"*3\r\n:1\r\n:0\r\n:1\r\n").unwrap(),
        Reply::Array(vec![Reply::Int(1), Reply::Int(0), Reply::Int(1)])
    );
    assert_eq!(decode(b"*0\r\n").unwrap(), Reply::Array(Vec::new()));
    assert_eq!(decode(b"*-1\r\n").unwrap(), Reply::Nil);
}

#[test]
fn test_decode_nested_heterogeneous_array() {
    let reply = decode(b"*3\r\n:17\r\n$5\r\nchunk\r\n*2\r\n+a\r\n#t\r\n").unwrap();
    assert_eq!(
        reply,
        Reply::Array(vec![
            Reply::Int(17),
            Reply::Bulk(b"chunk".to_vec()),
            Reply::Array(vec![Reply::Simple("a".to_string()), Reply::Bool(true)]),
        ])
    );
}

#[test]
fn test_decode_resp3_booleans_and_nil() {
    assert_eq!(decode(b"#t\r\n").unwrap(), Reply::Bool(true));
    assert_eq!(decode(b"#f\r\n").unwrap(), Reply::Bool(false));
    assert_eq!(decode(b"_\r\n").unwrap(), Reply::Nil);
}

#[test]
fn test_decode_sequential_replies_from_one_stream() {
    let mut cursor = Cursor::new(b"+OK\r\n:7\r\n$2\r\nhi\r\n".as_slice());
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Simple("OK".to_string()));
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Int(7));
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Bulk(b"hi".to_vec()));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_decode_unknown_prefix() {
    let err = decode(b"!oops\r\n").unwrap_err();
    assert!(matches!(err, RebloomError::Protocol(_)));
}

#[test]
fn test_decode_invalid_integer() {
    let err = decode(b":forty-two\r\n").unwrap_err();
    assert!(matches!(err, RebloomError::Protocol(_)));
}

#[test]
fn test_decode_invalid_boolean() {
    let err = decode(b"#x\r\n").unwrap_err();
    assert!(matches!(err, RebloomError::Protocol(_)));
}

#[test]
fn test_decode_line_without_crlf() {
    let err = decode(b"+OK").unwrap_err();
    assert!(matches!(err, RebloomError::Protocol(_)));
}

#[test]
fn test_decode_truncated_bulk_string() {
    assert!(decode(b"$10\r\nabc").is_err());
}

#[test]
fn test_decode_bulk_length_out_of_range() {
    let err = decode(b"$-7\r\n").unwrap_err();
    assert!(matches!(err, RebloomError::Protocol(_)));

    let err = decode(b"$999999999999\r\n").unwrap_err();
    assert!(matches!(err, RebloomError::Protocol(_)));
}

#[test]
fn test_decode_array_length_out_of_range() {
    let err = decode(b"*2000000\r\n").unwrap_err();
    assert!(matches!(err, RebloomError::Protocol(_)));
}

#[test]
fn test_decode_empty_stream() {
    assert!(decode(b"").is_err());
}
