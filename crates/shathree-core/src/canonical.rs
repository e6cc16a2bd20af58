//! # Canonical Value Encoding: Tagged Result Records
//!
//! This module defines `CanonicalRecord`, the sole encoding path for query
//! results that are fed into a SHA3 sponge.
//!
//! ## Grammar
//!
//! ```text
//! S<n>:<sql>     statement marker, <n> = byte length of the SQL text
//! R              row marker
//! N              NULL
//! I<8 bytes>     integer, big-endian two's complement
//! F<8 bytes>     float, big-endian IEEE-754 bit pattern
//! T<n>:<bytes>   UTF-8 text
//! B<n>:<bytes>   blob
//! ```
//!
//! Lengths are ASCII decimal with no sign and no leading zeros. Records are
//! concatenated with no delimiter and no terminator, so boundaries are only
//! recoverable by replaying the tag/length grammar.
//!
//! ## Byte Order
//!
//! Integer and float payloads are big-endian regardless of host byte order.
//! This is independent of the sponge's internal lane layout.

use crate::value::ValueRef;

/// Longest possible header: tag, 20 decimal digits of a `u64`, and `:`.
const MAX_HEADER_LEN: usize = 22;

/// One record of the canonical result stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanonicalRecord<'a> {
    /// Start of a statement's results, carrying its exact compiled SQL text.
    Statement(&'a str),
    /// Start of a row.
    Row,
    /// A NULL column value.
    Null,
    /// An integer column value.
    Integer(i64),
    /// A float column value.
    Float(f64),
    /// A text column value.
    Text(&'a [u8]),
    /// A blob column value.
    Blob(&'a [u8]),
}

impl<'a> CanonicalRecord<'a> {
    /// The record for one column value.
    pub fn from_value(value: ValueRef<'a>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(v) => Self::Integer(v),
            ValueRef::Float(v) => Self::Float(v),
            ValueRef::Text(v) => Self::Text(v.as_bytes()),
            ValueRef::Blob(v) => Self::Blob(v),
        }
    }

    /// The single ASCII tag byte.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Statement(_) => b'S',
            Self::Row => b'R',
            Self::Null => b'N',
            Self::Integer(_) => b'I',
            Self::Float(_) => b'F',
            Self::Text(_) => b'T',
            Self::Blob(_) => b'B',
        }
    }

    /// The fixed-size leading part of the record: the tag, followed by the
    /// length prefix for `S`/`T`/`B` or the 8 value bytes for `I`/`F`.
    pub fn header(&self) -> RecordHeader {
        let mut header = RecordHeader::tag(self.tag());
        match *self {
            Self::Row | Self::Null => {}
            Self::Integer(v) => header.push(&v.to_be_bytes()),
            Self::Float(v) => header.push(&v.to_bits().to_be_bytes()),
            Self::Statement(sql) => header.push_length(sql.len()),
            Self::Text(bytes) | Self::Blob(bytes) => header.push_length(bytes.len()),
        }
        header
    }

    /// The variable-length trailing part of the record. Empty for all but
    /// `S`, `T` and `B`.
    pub fn payload(&self) -> &'a [u8] {
        match *self {
            Self::Statement(sql) => sql.as_bytes(),
            Self::Text(bytes) | Self::Blob(bytes) => bytes,
            _ => &[],
        }
    }

    /// Total encoded length in bytes.
    pub fn encoded_len(&self) -> usize {
        self.header().len() + self.payload().len()
    }

    /// Feed the record into a sink without allocating.
    pub fn write_to<S: RecordSink + ?Sized>(&self, sink: &mut S) {
        sink.absorb(self.header().as_bytes());
        let payload = self.payload();
        if !payload.is_empty() {
            sink.absorb(payload);
        }
    }

    /// Encode the record into a fresh buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }
}

/// Fixed-capacity buffer holding a record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    buf: [u8; MAX_HEADER_LEN],
    len: usize,
}

impl RecordHeader {
    fn tag(tag: u8) -> Self {
        let mut buf = [0u8; MAX_HEADER_LEN];
        buf[0] = tag;
        Self { buf, len: 1 }
    }

    fn push(&mut self, bytes: &[u8]) {
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    /// Append `<decimal>:`.
    fn push_length(&mut self, n: usize) {
        let mut digits = [0u8; 20];
        let mut i = digits.len();
        let mut rest = n as u64;
        loop {
            i -= 1;
            digits[i] = b'0' + (rest % 10) as u8;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        self.push(&digits[i..]);
        self.push(b":");
    }

    /// The header bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Header length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: every header carries at least its tag.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Anything that can take a stream of canonical bytes.
pub trait RecordSink {
    /// Append bytes to the stream.
    fn absorb(&mut self, bytes: &[u8]);
}

impl RecordSink for Vec<u8> {
    fn absorb(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Replay the grammar over a stream, returning the tags seen.
    fn parse_tags(mut stream: &[u8]) -> Option<Vec<u8>> {
        let mut tags = Vec::new();
        while let Some((&tag, rest)) = stream.split_first() {
            tags.push(tag);
            stream = match tag {
                b'R' | b'N' => rest,
                b'I' | b'F' => rest.get(8..)?,
                b'S' | b'T' | b'B' => {
                    let colon = rest.iter().position(|&b| b == b':')?;
                    let n: usize = std::str::from_utf8(&rest[..colon]).ok()?.parse().ok()?;
                    rest.get(colon + 1 + n..)?
                }
                _ => return None,
            };
        }
        Some(tags)
    }

    fn record_strategy() -> impl Strategy<Value = (u8, Vec<u8>)> {
        prop_oneof![
            Just((b'R', Vec::new())),
            Just((b'N', Vec::new())),
            any::<i64>().prop_map(|v| (b'I', CanonicalRecord::Integer(v).encode())),
            any::<f64>().prop_map(|v| (b'F', CanonicalRecord::Float(v).encode())),
            prop::collection::vec(any::<u8>(), 0..64)
                .prop_map(|b| (b'B', CanonicalRecord::Blob(&b).encode())),
            "[ -~]{0,40}".prop_map(|s| (b'T', CanonicalRecord::Text(s.as_bytes()).encode())),
        ]
    }

    proptest! {
        /// Any concatenation of records can be split back by the grammar alone.
        #[test]
        fn stream_boundaries_recoverable(records in prop::collection::vec(record_strategy(), 0..32)) {
            let mut stream = Vec::new();
            let mut expected_tags = Vec::new();
            for (tag, bytes) in &records {
                expected_tags.push(*tag);
                if bytes.is_empty() {
                    stream.push(*tag);
                } else {
                    stream.extend_from_slice(bytes);
                }
            }
            prop_assert_eq!(parse_tags(&stream), Some(expected_tags));
        }
    }
}
