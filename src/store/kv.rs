//! Key-Value Service Wire Client
//!
//! RESP-style protocol client for the embedding key-value service. Commands
//! are arrays of bulk strings; MGET resolves an arbitrary number of keys in
//! one round trip, which is what keeps multi-word ranking queries at a
//! single network hop.

use bytes::{Buf, Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use std::io::Cursor;
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, Encoder, Framed};

use crate::error::{Error, Result};

/// Client-side command set.
#[derive(Debug, Clone)]
pub enum KvCommand {
    Ping,
    Get { key: String },
    MGet { keys: Vec<String> },
    Set { key: String, value: Bytes },
}

impl KvCommand {
    fn into_args(self) -> Vec<Bytes> {
        match self {
            KvCommand::Ping => vec![Bytes::from_static(b"PING")],
            KvCommand::Get { key } => {
                vec![Bytes::from_static(b"GET"), Bytes::from(key)]
            }
            KvCommand::MGet { keys } => {
                let mut args = Vec::with_capacity(keys.len() + 1);
                args.push(Bytes::from_static(b"MGET"));
                args.extend(keys.into_iter().map(Bytes::from));
                args
            }
            KvCommand::Set { key, value } => {
                vec![Bytes::from_static(b"SET"), Bytes::from(key), value]
            }
        }
    }
}

/// Server reply variants.
#[derive(Debug, Clone, PartialEq)]
pub enum KvReply {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Nil,
    Array(Vec<KvReply>),
}

/// Tokio codec: encodes [`KvCommand`], decodes [`KvReply`].
#[derive(Debug, Default)]
pub struct RespCodec;

impl RespCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<KvCommand> for RespCodec {
    type Error = Error;

    fn encode(&mut self, item: KvCommand, dst: &mut BytesMut) -> Result<()> {
        let args = item.into_args();
        dst.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
        for arg in args {
            dst.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
            dst.extend_from_slice(&arg);
            dst.extend_from_slice(b"\r\n");
        }
        Ok(())
    }
}

impl Decoder for RespCodec {
    type Item = KvReply;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<KvReply>> {
        let mut cursor = Cursor::new(&src[..]);
        match parse_reply(&mut cursor)? {
            Some(reply) => {
                let consumed = cursor.position() as usize;
                src.advance(consumed);
                Ok(Some(reply))
            }
            None => Ok(None),
        }
    }
}

/// Parse one reply; `Ok(None)` means the buffer is incomplete.
fn parse_reply(buf: &mut Cursor<&[u8]>) -> Result<Option<KvReply>> {
    let tag = match get_u8(buf) {
        Some(tag) => tag,
        None => return Ok(None),
    };

    match tag {
        b'+' => Ok(get_line(buf)?.map(|line| KvReply::Simple(to_string_lossy(line)))),
        b'-' => Ok(get_line(buf)?.map(|line| KvReply::Error(to_string_lossy(line)))),
        b':' => match get_line(buf)? {
            Some(line) => Ok(Some(KvReply::Integer(parse_decimal(&line)?))),
            None => Ok(None),
        },
        b'$' => {
            let len = match get_line(buf)? {
                Some(line) => parse_decimal(&line)?,
                None => return Ok(None),
            };
            if len < 0 {
                return Ok(Some(KvReply::Nil));
            }
            let len = len as usize;
            if buf.remaining() < len + 2 {
                return Ok(None);
            }
            let data = Bytes::copy_from_slice(&buf.chunk()[..len]);
            buf.advance(len + 2);
            Ok(Some(KvReply::Bulk(data)))
        }
        b'*' => {
            let len = match get_line(buf)? {
                Some(line) => parse_decimal(&line)?,
                None => return Ok(None),
            };
            if len < 0 {
                return Ok(Some(KvReply::Nil));
            }
            let mut items = Vec::with_capacity(len as usize);
            for _ in 0..len {
                match parse_reply(buf)? {
                    Some(item) => items.push(item),
                    None => return Ok(None),
                }
            }
            Ok(Some(KvReply::Array(items)))
        }
        other => Err(Error::Protocol(format!(
            "invalid reply tag byte 0x{:02x}",
            other
        ))),
    }
}

fn get_u8(buf: &mut Cursor<&[u8]>) -> Option<u8> {
    if buf.has_remaining() {
        Some(buf.get_u8())
    } else {
        None
    }
}

/// Read up to the next CRLF; `Ok(None)` if the terminator is not buffered yet.
fn get_line(buf: &mut Cursor<&[u8]>) -> Result<Option<Vec<u8>>> {
    let start = buf.position() as usize;
    let data = buf.get_ref();

    for i in start..data.len().saturating_sub(1) {
        if data[i] == b'\r' && data[i + 1] == b'\n' {
            let line = data[start..i].to_vec();
            buf.set_position((i + 2) as u64);
            return Ok(Some(line));
        }
    }
    Ok(None)
}

fn parse_decimal(line: &[u8]) -> Result<i64> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Protocol(format!("invalid integer line {:?}", line)))
}

fn to_string_lossy(line: Vec<u8>) -> String {
    String::from_utf8_lossy(&line).into_owned()
}

/// Connection to the key-value service.
pub struct KvClient {
    framed: Framed<TcpStream, RespCodec>,
}

impl KvClient {
    /// Connect to the service. Failure is a [`Error::Connection`].
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| Error::Connection(format!("failed to connect to {}: {}", addr, e)))?;
        Ok(Self {
            framed: Framed::new(stream, RespCodec::new()),
        })
    }

    pub async fn ping(&mut self) -> Result<()> {
        match self.roundtrip(KvCommand::Ping).await? {
            KvReply::Simple(s) if s == "PONG" => Ok(()),
            other => Err(Error::Protocol(format!("expected PONG, got {:?}", other))),
        }
    }

    pub async fn get(&mut self, key: &str) -> Result<Option<Bytes>> {
        match self
            .roundtrip(KvCommand::Get {
                key: key.to_string(),
            })
            .await?
        {
            KvReply::Bulk(data) => Ok(Some(data)),
            KvReply::Nil => Ok(None),
            other => Err(Error::Protocol(format!(
                "expected bulk reply, got {:?}",
                other
            ))),
        }
    }

    /// Resolve every key in one round trip. The reply preserves key order;
    /// missing keys come back as `None`.
    pub async fn mget(&mut self, keys: &[String]) -> Result<Vec<Option<Bytes>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let reply = self
            .roundtrip(KvCommand::MGet {
                keys: keys.to_vec(),
            })
            .await?;

        let items = match reply {
            KvReply::Array(items) => items,
            other => {
                return Err(Error::Protocol(format!(
                    "expected array reply, got {:?}",
                    other
                )))
            }
        };
        if items.len() != keys.len() {
            return Err(Error::Protocol(format!(
                "MGET asked for {} keys, got {} replies",
                keys.len(),
                items.len()
            )));
        }

        items
            .into_iter()
            .map(|item| match item {
                KvReply::Bulk(data) => Ok(Some(data)),
                KvReply::Nil => Ok(None),
                other => Err(Error::Protocol(format!(
                    "expected bulk array element, got {:?}",
                    other
                ))),
            })
            .collect()
    }

    pub async fn set(&mut self, key: &str, value: Bytes) -> Result<()> {
        match self
            .roundtrip(KvCommand::Set {
                key: key.to_string(),
                value,
            })
            .await?
        {
            KvReply::Simple(s) if s == "OK" => Ok(()),
            other => Err(Error::Protocol(format!("expected OK, got {:?}", other))),
        }
    }

    async fn roundtrip(&mut self, cmd: KvCommand) -> Result<KvReply> {
        self.framed.send(cmd).await?;
        match self.framed.next().await {
            Some(Ok(KvReply::Error(msg))) => Err(Error::Protocol(format!(
                "key-value service error: {}",
                msg
            ))),
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(e),
            None => Err(Error::Connection(
                "connection closed by key-value service".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut RespCodec, data: &[u8]) -> Option<KvReply> {
        let mut buf = BytesMut::from(data);
        codec.decode(&mut buf).unwrap()
    }

    #[test]
    fn test_encode_ping() {
        let mut codec = RespCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(KvCommand::Ping, &mut buf).unwrap();
        assert_eq!(&buf[..], b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn test_encode_mget_is_one_command() {
        let mut codec = RespCodec::new();
        let mut buf = BytesMut::new();
        let keys: Vec<String> = (0..50).map(|i| format!("word{}", i)).collect();
        codec.encode(KvCommand::MGet { keys }, &mut buf).unwrap();

        // One array frame for all 50 keys: a single round trip regardless of N
        assert!(buf.starts_with(b"*51\r\n$4\r\nMGET\r\n"));
        assert_eq!(buf.iter().filter(|&&b| b == b'*').count(), 1);
    }

    #[test]
    fn test_decode_simple_and_error() {
        let mut codec = RespCodec::new();
        assert_eq!(
            decode_all(&mut codec, b"+PONG\r\n"),
            Some(KvReply::Simple("PONG".to_string()))
        );
        assert_eq!(
            decode_all(&mut codec, b"-ERR boom\r\n"),
            Some(KvReply::Error("ERR boom".to_string()))
        );
    }

    #[test]
    fn test_decode_bulk_nil_array() {
        let mut codec = RespCodec::new();
        assert_eq!(
            decode_all(&mut codec, b"$3\r\nabc\r\n"),
            Some(KvReply::Bulk(Bytes::from_static(b"abc")))
        );
        assert_eq!(decode_all(&mut codec, b"$-1\r\n"), Some(KvReply::Nil));
        assert_eq!(
            decode_all(&mut codec, b"*2\r\n$1\r\na\r\n$-1\r\n"),
            Some(KvReply::Array(vec![
                KvReply::Bulk(Bytes::from_static(b"a")),
                KvReply::Nil
            ]))
        );
    }

    #[test]
    fn test_decode_partial_then_complete() {
        let mut codec = RespCodec::new();
        let full = b"*2\r\n$1\r\na\r\n$1\r\nb\r\n";

        let mut partial = BytesMut::from(&full[..7]);
        assert!(codec.decode(&mut partial).unwrap().is_none());
        // Nothing consumed on incomplete input
        assert_eq!(partial.len(), 7);

        let mut buf = BytesMut::from(&full[..]);
        let reply = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(
            reply,
            KvReply::Array(vec![
                KvReply::Bulk(Bytes::from_static(b"a")),
                KvReply::Bulk(Bytes::from_static(b"b"))
            ])
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_invalid_tag() {
        let mut codec = RespCodec::new();
        let mut buf = BytesMut::from(&b"!nope\r\n"[..]);
        assert!(matches!(codec.decode(&mut buf), Err(Error::Protocol(_))));
    }
}
