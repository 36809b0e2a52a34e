//! Script expression codec
//!
//! Contract code, storage, and transaction parameters are trees of a small
//! expression language: integer and string and byte literals, sequences,
//! and applications of a one-byte primitive to ordered sub-expressions
//! with optional annotations. Each node is tagged and length-prefixed;
//! nesting depth is bounded only by input size.
//!
//! The encoder always emits the canonical (most compact) tag for a
//! primitive's arity and annotation shape, so decoding then re-encoding a
//! canonically-encoded expression reproduces the input bytes exactly.

use crate::cursor::Cursor;
use crate::zarith::BigInt;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const TAG_INT: u8 = 0x00;
const TAG_STRING: u8 = 0x01;
const TAG_SEQ: u8 = 0x02;
const TAG_PRIM_0: u8 = 0x03;
const TAG_PRIM_0_ANNOTS: u8 = 0x04;
const TAG_PRIM_1: u8 = 0x05;
const TAG_PRIM_1_ANNOTS: u8 = 0x06;
const TAG_PRIM_2: u8 = 0x07;
const TAG_PRIM_2_ANNOTS: u8 = 0x08;
const TAG_PRIM_GENERAL: u8 = 0x09;
const TAG_BYTES: u8 = 0x0a;

/// Script expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Micheline {
    /// Integer literal (sign-aware variable-length encoding)
    Int(BigInt),
    /// String literal
    String(String),
    /// Byte-string literal
    Bytes(Vec<u8>),
    /// Ordered sequence of sub-expressions
    Seq(Vec<Micheline>),
    /// Application of a primitive to ordered sub-expressions
    Prim {
        /// Primitive opcode byte
        prim: u8,
        /// Ordered arguments
        args: Vec<Micheline>,
        /// Annotations, without separators
        annots: Vec<String>,
    },
}

fn write_dynamic(out: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| Error::MalformedEncoding("dynamic region exceeds u32 length".to_string()))?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_annots(out: &mut Vec<u8>, annots: &[String]) -> Result<()> {
    write_dynamic(out, annots.join(" ").as_bytes())
}

/// Encode one expression node to its wire bytes.
pub fn encode_node(node: &Micheline) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(node, &mut out)?;
    Ok(out)
}

fn encode_into(node: &Micheline, out: &mut Vec<u8>) -> Result<()> {
    match node {
        Micheline::Int(value) => {
            out.push(TAG_INT);
            out.extend_from_slice(&value.to_bytes_int());
        }
        Micheline::String(value) => {
            out.push(TAG_STRING);
            write_dynamic(out, value.as_bytes())?;
        }
        Micheline::Bytes(value) => {
            out.push(TAG_BYTES);
            write_dynamic(out, value)?;
        }
        Micheline::Seq(items) => {
            out.push(TAG_SEQ);
            let mut body = Vec::new();
            for item in items {
                encode_into(item, &mut body)?;
            }
            write_dynamic(out, &body)?;
        }
        Micheline::Prim { prim, args, annots } => {
            match (args.len(), annots.is_empty()) {
                (0, true) => {
                    out.push(TAG_PRIM_0);
                    out.push(*prim);
                }
                (0, false) => {
                    out.push(TAG_PRIM_0_ANNOTS);
                    out.push(*prim);
                    write_annots(out, annots)?;
                }
                (1, true) => {
                    out.push(TAG_PRIM_1);
                    out.push(*prim);
                    encode_into(&args[0], out)?;
                }
                (1, false) => {
                    out.push(TAG_PRIM_1_ANNOTS);
                    out.push(*prim);
                    encode_into(&args[0], out)?;
                    write_annots(out, annots)?;
                }
                (2, true) => {
                    out.push(TAG_PRIM_2);
                    out.push(*prim);
                    encode_into(&args[0], out)?;
                    encode_into(&args[1], out)?;
                }
                (2, false) => {
                    out.push(TAG_PRIM_2_ANNOTS);
                    out.push(*prim);
                    encode_into(&args[0], out)?;
                    encode_into(&args[1], out)?;
                    write_annots(out, annots)?;
                }
                _ => {
                    out.push(TAG_PRIM_GENERAL);
                    out.push(*prim);
                    let mut body = Vec::new();
                    for arg in args {
                        encode_into(arg, &mut body)?;
                    }
                    write_dynamic(out, &body)?;
                    write_annots(out, annots)?;
                }
            }
        }
    }
    Ok(())
}

/// Decode one expression node, returning it together with the number of
/// bytes consumed so the caller can continue parsing the stream.
pub fn decode_node(bytes: &[u8]) -> Result<(Micheline, usize)> {
    let mut cursor = Cursor::new(bytes);
    let node = decode_from(&mut cursor)?;
    Ok((node, bytes.len() - cursor.remaining().len()))
}

fn take_dynamic<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let len = cursor.take_u32_be()? as usize;
    cursor.take(len)
}

fn take_string(cursor: &mut Cursor<'_>) -> Result<String> {
    let bytes = take_dynamic(cursor)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::MalformedEncoding(format!("invalid UTF-8 string: {e}")))
}

fn take_annots(cursor: &mut Cursor<'_>) -> Result<Vec<String>> {
    let joined = take_string(cursor)?;
    if joined.is_empty() {
        return Ok(Vec::new());
    }
    Ok(joined.split(' ').map(str::to_string).collect())
}

fn decode_seq_body(bytes: &[u8]) -> Result<Vec<Micheline>> {
    let mut cursor = Cursor::new(bytes);
    let mut items = Vec::new();
    while !cursor.is_empty() {
        items.push(decode_from(&mut cursor)?);
    }
    Ok(items)
}

fn decode_from(cursor: &mut Cursor<'_>) -> Result<Micheline> {
    let tag = cursor.take_u8()?;
    match tag {
        TAG_INT => {
            let (value, consumed) = BigInt::from_bytes_int(cursor.remaining())?;
            cursor.advance(consumed);
            Ok(Micheline::Int(value))
        }
        TAG_STRING => Ok(Micheline::String(take_string(cursor)?)),
        TAG_BYTES => Ok(Micheline::Bytes(take_dynamic(cursor)?.to_vec())),
        TAG_SEQ => Ok(Micheline::Seq(decode_seq_body(take_dynamic(cursor)?)?)),
        TAG_PRIM_0 => Ok(Micheline::Prim {
            prim: cursor.take_u8()?,
            args: Vec::new(),
            annots: Vec::new(),
        }),
        TAG_PRIM_0_ANNOTS => {
            let prim = cursor.take_u8()?;
            let annots = take_annots(cursor)?;
            Ok(Micheline::Prim {
                prim,
                args: Vec::new(),
                annots,
            })
        }
        TAG_PRIM_1 => {
            let prim = cursor.take_u8()?;
            let arg = decode_from(cursor)?;
            Ok(Micheline::Prim {
                prim,
                args: vec![arg],
                annots: Vec::new(),
            })
        }
        TAG_PRIM_1_ANNOTS => {
            let prim = cursor.take_u8()?;
            let arg = decode_from(cursor)?;
            let annots = take_annots(cursor)?;
            Ok(Micheline::Prim {
                prim,
                args: vec![arg],
                annots,
            })
        }
        TAG_PRIM_2 => {
            let prim = cursor.take_u8()?;
            let first = decode_from(cursor)?;
            let second = decode_from(cursor)?;
            Ok(Micheline::Prim {
                prim,
                args: vec![first, second],
                annots: Vec::new(),
            })
        }
        TAG_PRIM_2_ANNOTS => {
            let prim = cursor.take_u8()?;
            let first = decode_from(cursor)?;
            let second = decode_from(cursor)?;
            let annots = take_annots(cursor)?;
            Ok(Micheline::Prim {
                prim,
                args: vec![first, second],
                annots,
            })
        }
        TAG_PRIM_GENERAL => {
            let prim = cursor.take_u8()?;
            let args = decode_seq_body(take_dynamic(cursor)?)?;
            let annots = take_annots(cursor)?;
            Ok(Micheline::Prim { prim, args, annots })
        }
        tag => Err(Error::MalformedEncoding(format!(
            "unknown expression tag {tag:#04x}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(node: &Micheline) -> Vec<u8> {
        let encoded = encode_node(node).unwrap();
        let (decoded, consumed) = decode_node(&encoded).unwrap();
        assert_eq!(&decoded, node);
        assert_eq!(consumed, encoded.len());
        encoded
    }

    #[test]
    fn test_literals() {
        assert_eq!(roundtrip(&Micheline::Int(BigInt::from(0u64))), [0x00, 0x00]);
        assert_eq!(
            roundtrip(&Micheline::Int(BigInt::from(-33i64))),
            [0x00, 0x61]
        );
        assert_eq!(
            roundtrip(&Micheline::String("do".to_string())),
            [0x01, 0, 0, 0, 2, b'd', b'o']
        );
        assert_eq!(
            roundtrip(&Micheline::Bytes(vec![0xde, 0xad])),
            [0x0a, 0, 0, 0, 2, 0xde, 0xad]
        );
    }

    #[test]
    fn test_prim_tag_selection() {
        // Arity and annotation shape pick the compact tag.
        let atom = Micheline::Prim {
            prim: 0x6c,
            args: Vec::new(),
            annots: Vec::new(),
        };
        assert_eq!(roundtrip(&atom)[0], TAG_PRIM_0);

        let annotated = Micheline::Prim {
            prim: 0x6c,
            args: Vec::new(),
            annots: vec!["%default".to_string()],
        };
        let encoded = roundtrip(&annotated);
        assert_eq!(encoded[0], TAG_PRIM_0_ANNOTS);
        assert_eq!(hex::encode(&encoded), "046c000000082564656661756c74");

        let two_args = Micheline::Prim {
            prim: 0x43,
            args: vec![
                Micheline::Prim {
                    prim: 0x6a,
                    args: Vec::new(),
                    annots: Vec::new(),
                },
                Micheline::Int(BigInt::from(0u64)),
            ],
            annots: Vec::new(),
        };
        assert_eq!(hex::encode(roundtrip(&two_args)), "0743036a0000");

        let three_args = Micheline::Prim {
            prim: 0x26,
            args: vec![atom.clone(), atom.clone(), atom],
            annots: Vec::new(),
        };
        assert_eq!(roundtrip(&three_args)[0], TAG_PRIM_GENERAL);
    }

    #[test]
    fn test_nested_sequences() {
        let node = Micheline::Seq(vec![
            Micheline::Seq(vec![Micheline::Int(BigInt::from(7u64))]),
            Micheline::Prim {
                prim: 0x20,
                args: vec![Micheline::Seq(Vec::new())],
                annots: vec!["@deep".to_string(), "%x".to_string()],
            },
        ]);
        roundtrip(&node);
    }

    #[test]
    fn test_manager_script_code_roundtrips() {
        // The fixed manager-contract code used for script-less
        // originations must survive decode/encode byte-for-byte.
        let bytes = hex::decode(crate::forge::DEFAULT_MANAGER_CODE_HEX).unwrap();
        let (node, consumed) = decode_node(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(encode_node(&node).unwrap(), bytes);
    }

    #[test]
    fn test_truncated_input_fails() {
        let encoded = encode_node(&Micheline::String("hello".to_string())).unwrap();
        assert!(matches!(
            decode_node(&encoded[..encoded.len() - 1]),
            Err(Error::UnexpectedEndOfInput)
        ));
        assert!(matches!(decode_node(&[]), Err(Error::UnexpectedEndOfInput)));
    }

    #[test]
    fn test_unknown_tag_fails() {
        assert!(matches!(
            decode_node(&[0x0b, 0x00]),
            Err(Error::MalformedEncoding(_))
        ));
    }
}
