//! OSC message codec
//!
//! Encodes and decodes the OSC 1.0 subset used by the VRChat chatbox:
//! a null-terminated address, a `,`-prefixed type-tag string, and the
//! argument payloads. Every field is zero-padded so its length is a
//! multiple of 4. Integers and floats are 4-byte big-endian; booleans are
//! carried entirely by their `T`/`F` tag character and contribute no
//! payload bytes.

use crate::error::{Error, Result};

/// A single OSC argument.
///
/// The four types cover everything VRChat's OSC endpoints accept.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl OscArg {
    /// Type-tag character for this argument
    fn tag(&self) -> char {
        match self {
            OscArg::Bool(true) => 'T',
            OscArg::Bool(false) => 'F',
            OscArg::Int(_) => 'i',
            OscArg::Float(_) => 'f',
            OscArg::Str(_) => 's',
        }
    }
}

/// Number of zero bytes needed to pad `len` up to a multiple of 4
fn pad4(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Appends a null-terminated, 4-byte padded string field
fn push_padded_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    out.resize(out.len() + pad4(s.len() + 1), 0);
}

/// Encodes a single OSC message.
///
/// The output is always a whole number of 4-byte words: address field,
/// type-tag field, then the argument payloads in argument order. Booleans
/// are skipped in the payload section.
pub fn encode(address: &str, args: &[OscArg]) -> Vec<u8> {
    let mut out = Vec::with_capacity(32);
    push_padded_str(&mut out, address);

    let mut tags = String::with_capacity(args.len() + 1);
    tags.push(',');
    for arg in args {
        tags.push(arg.tag());
    }
    push_padded_str(&mut out, &tags);

    for arg in args {
        match arg {
            OscArg::Bool(_) => {}
            OscArg::Int(i) => out.extend_from_slice(&i.to_be_bytes()),
            OscArg::Float(f) => out.extend_from_slice(&f.to_be_bytes()),
            OscArg::Str(s) => push_padded_str(&mut out, s),
        }
    }

    out
}

/// Reads the null-terminated string starting at `pos` and returns it with
/// the 4-aligned offset of the next field.
fn read_padded_str(buf: &[u8], pos: usize) -> Result<(&str, usize)> {
    let field = buf
        .get(pos..)
        .ok_or(Error::Malformed("field starts past end of buffer"))?;
    let nul = field
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::Malformed("unterminated string field"))?;
    let s = std::str::from_utf8(&field[..nul])
        .map_err(|_| Error::Malformed("string field is not valid UTF-8"))?;
    let consumed = nul + 1;
    Ok((s, pos + consumed + pad4(consumed)))
}

/// Decodes a single OSC message.
///
/// Tolerates truncated and malformed input: a missing address terminator,
/// a missing `,` tag prefix, or any field running past the end of the
/// buffer yields [`Error::Malformed`] instead of panicking. An unknown tag
/// character stops argument parsing; everything decoded up to that point
/// is returned.
pub fn decode(buf: &[u8]) -> Result<(String, Vec<OscArg>)> {
    let (address, tag_pos) = read_padded_str(buf, 0)?;
    if address.is_empty() {
        return Err(Error::Malformed("empty address"));
    }
    let address = address.to_string();

    if tag_pos >= buf.len() || buf[tag_pos] != b',' {
        // Messages without a type-tag string exist in old OSC
        // implementations, but VRChat never sends them.
        return Err(Error::Malformed("missing type-tag string"));
    }
    let (tags, mut pos) = read_padded_str(buf, tag_pos)?;
    let tags = tags.to_string();

    let mut args = Vec::with_capacity(tags.len().saturating_sub(1));
    for tag in tags.chars().skip(1) {
        match tag {
            'T' => args.push(OscArg::Bool(true)),
            'F' => args.push(OscArg::Bool(false)),
            'i' => {
                let raw = buf
                    .get(pos..pos + 4)
                    .ok_or(Error::Malformed("truncated int argument"))?;
                args.push(OscArg::Int(i32::from_be_bytes(raw.try_into().unwrap())));
                pos += 4;
            }
            'f' => {
                let raw = buf
                    .get(pos..pos + 4)
                    .ok_or(Error::Malformed("truncated float argument"))?;
                args.push(OscArg::Float(f32::from_be_bytes(raw.try_into().unwrap())));
                pos += 4;
            }
            's' => {
                let (s, next) = read_padded_str(buf, pos)?;
                args.push(OscArg::Str(s.to_string()));
                pos = next;
            }
            // Unknown tag: we cannot know its payload size, so stop here
            _ => break,
        }
    }

    Ok((address, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_chatbox_input() {
        let msg = encode(
            "/a",
            &[OscArg::Str("hi".to_string()), OscArg::Bool(true)],
        );
        // "/a\0\0" + ",sT\0" + "hi\0\0"
        assert_eq!(&msg[..4], b"/a\0\0");
        assert_eq!(&msg[4..8], b",sT\0");
        assert_eq!(&msg[8..], b"hi\0\0");
    }

    #[test]
    fn test_encode_typing_carries_no_payload() {
        let msg = encode("/chatbox/typing", &[OscArg::Bool(true)]);
        // 16-byte address field + ",T\0\0" and nothing else
        assert_eq!(msg.len(), 20);
        assert_eq!(&msg[16..], b",T\0\0");
    }

    #[test]
    fn test_encode_always_word_aligned() {
        let cases: Vec<(&str, Vec<OscArg>)> = vec![
            ("/a", vec![]),
            ("/ab", vec![OscArg::Int(-7)]),
            ("/abc", vec![OscArg::Float(1.5), OscArg::Bool(false)]),
            ("/abcd", vec![OscArg::Str("x".to_string())],),
            ("/chatbox/input", vec![OscArg::Str("été 🎵".to_string())]),
        ];
        for (addr, args) in cases {
            assert_eq!(encode(addr, &args).len() % 4, 0, "address {addr}");
        }
    }

    #[test]
    fn test_round_trip_all_types() {
        let args = vec![
            OscArg::Str("now playing".to_string()),
            OscArg::Bool(true),
            OscArg::Int(i32::MIN),
            OscArg::Float(-0.25),
            OscArg::Bool(false),
            OscArg::Str(String::new()),
        ];
        let msg = encode("/chatbox/input", &args);
        let (address, decoded) = decode(&msg).unwrap();
        assert_eq!(address, "/chatbox/input");
        assert_eq!(decoded, args);
    }

    #[test]
    fn test_decode_rejects_unterminated_address() {
        assert!(decode(b"/chatbox").is_err());
    }

    #[test]
    fn test_decode_rejects_missing_tag_string() {
        // Well-formed address, then garbage where ',' should be
        let mut msg = encode("/a", &[]);
        msg[4] = b'x';
        assert!(decode(&msg).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let msg = encode("/a", &[OscArg::Int(42)]);
        assert!(decode(&msg[..msg.len() - 2]).is_err());
    }

    #[test]
    fn test_decode_stops_at_unknown_tag() {
        // ",iq": 'q' is not a tag we know; the int before it survives
        let mut msg = Vec::new();
        msg.extend_from_slice(b"/x\0\0");
        msg.extend_from_slice(b",iq\0");
        msg.extend_from_slice(&7i32.to_be_bytes());
        let (_, args) = decode(&msg).unwrap();
        assert_eq!(args, vec![OscArg::Int(7)]);
    }

    #[test]
    fn test_decode_empty_buffer() {
        assert!(decode(&[]).is_err());
    }
}
