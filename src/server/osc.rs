//! Minimal OSC decoder for the TUIO fiducial edge.
//!
//! The camera stack sends `/tuio/2Dobj` messages over UDP, usually wrapped
//! in `#bundle` frames. Only `set` messages matter here; their arguments map
//! positionally to `(session_id, x, y, a)` and become marker mutations.

use bytes::Buf;
use indexmap::IndexMap;
use thiserror::Error;

use super::models::SceneMessage;
use crate::engine::AttrValue;

const OBJ_ADDRESS: &str = "/tuio/2Dobj";

#[derive(Debug, Error, PartialEq)]
pub enum OscError {
    #[error("truncated OSC packet")]
    Truncated,
    #[error("malformed OSC string")]
    BadString,
    #[error("unsupported OSC type tag '{0}'")]
    UnsupportedTag(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Str(String),
}

impl OscArg {
    fn as_num(&self) -> Option<f64> {
        match self {
            OscArg::Int(i) => Some(*i as f64),
            OscArg::Float(f) => Some(*f as f64),
            OscArg::Str(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<OscArg>,
}

/// Decode a UDP datagram into the marker mutations it carries.
pub fn decode_fiducials(data: &[u8]) -> Result<Vec<SceneMessage>, OscError> {
    let mut messages = Vec::new();
    collect_messages(data, &mut messages)?;
    Ok(messages
        .into_iter()
        .filter_map(fiducial_update)
        .collect())
}

/// Parse one packet (message or bundle) into flat messages.
pub fn parse_packet(data: &[u8]) -> Result<Vec<OscMessage>, OscError> {
    let mut messages = Vec::new();
    collect_messages(data, &mut messages)?;
    Ok(messages)
}

fn collect_messages(data: &[u8], out: &mut Vec<OscMessage>) -> Result<(), OscError> {
    if data.starts_with(b"#bundle\0") {
        let mut buf = &data[8..];
        if buf.remaining() < 8 {
            return Err(OscError::Truncated);
        }
        buf.advance(8); // time tag
        while buf.has_remaining() {
            if buf.remaining() < 4 {
                return Err(OscError::Truncated);
            }
            let size = buf.get_i32() as usize;
            if buf.remaining() < size {
                return Err(OscError::Truncated);
            }
            collect_messages(&buf[..size], out)?;
            buf.advance(size);
        }
        return Ok(());
    }
    out.push(parse_message(data)?);
    Ok(())
}

fn parse_message(data: &[u8]) -> Result<OscMessage, OscError> {
    let mut buf = data;
    let address = read_padded_string(&mut buf)?;
    let type_tags = read_padded_string(&mut buf)?;
    let tags = type_tags.strip_prefix(',').ok_or(OscError::BadString)?;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        match tag {
            'i' => {
                if buf.remaining() < 4 {
                    return Err(OscError::Truncated);
                }
                args.push(OscArg::Int(buf.get_i32()));
            }
            'f' => {
                if buf.remaining() < 4 {
                    return Err(OscError::Truncated);
                }
                args.push(OscArg::Float(buf.get_f32()));
            }
            's' => args.push(OscArg::Str(read_padded_string(&mut buf)?)),
            other => return Err(OscError::UnsupportedTag(other)),
        }
    }

    Ok(OscMessage { address, args })
}

/// Read a NUL-terminated string padded to a 4-byte boundary.
fn read_padded_string(buf: &mut &[u8]) -> Result<String, OscError> {
    let end = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(OscError::BadString)?;
    let text = std::str::from_utf8(&buf[..end])
        .map_err(|_| OscError::BadString)?
        .to_string();
    let consumed = (end + 4) & !3;
    if consumed > buf.len() {
        return Err(OscError::Truncated);
    }
    buf.advance(consumed);
    Ok(text)
}

/// Turn a `/tuio/2Dobj set` message into a marker mutation; anything else
/// (alive, fseq, other profiles) is ignored.
fn fiducial_update(message: OscMessage) -> Option<SceneMessage> {
    if message.address != OBJ_ADDRESS {
        return None;
    }
    match message.args.first() {
        Some(OscArg::Str(verb)) if verb == "set" => {}
        _ => return None,
    }
    let mut positional = message.args.iter().skip(1);
    let session = match positional.next()? {
        OscArg::Int(session) => *session,
        _ => return None,
    };
    let x = positional.next()?.as_num()?;
    let y = positional.next()?.as_num()?;
    let a = positional.next()?.as_num()?;

    let mut attrs = IndexMap::new();
    attrs.insert("x".to_string(), AttrValue::Num(x));
    attrs.insert("y".to_string(), AttrValue::Num(y));
    attrs.insert("a".to_string(), AttrValue::Num(a));
    Some(SceneMessage {
        id: format!("marker-{}", session),
        tags: vec!["marker".to_string()],
        attrs,
    })
}
