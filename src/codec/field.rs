//! Length-prefixed field primitives of the binary format.
//!
//! Every variable-sized field starts with its size:
//!
//! - integer: one width byte (0..=8), then that many big-endian
//!   two's-complement bytes; writers use the shortest width
//! - float: width byte `8`, then the IEEE-754 double big-endian
//! - string and blob: an integer byte count, then the bytes
//! - marker: a single byte, 0 or 1

use super::error::{CodecError, FormatError};
use std::io::{ErrorKind, Read, Write};

/// Bounds applied to sizes read from an untrusted stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Longest string or blob, in bytes
    pub max_field_len: usize,
    pub max_nodes: usize,
    /// Most edges on a single node
    pub max_edges: usize,
    pub max_domains: usize,
    /// Most tokens in one closed domain
    pub max_domain_tokens: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_field_len: 16 * 1024 * 1024,
            max_nodes: 1 << 20,
            max_edges: 1 << 16,
            max_domains: 256,
            max_domain_tokens: 1 << 16,
        }
    }
}

/// Writes binary fields to an underlying writer.
pub struct FieldWriter<W: Write> {
    inner: W,
}

impl<W: Write> FieldWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub(crate) fn write_raw(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    pub fn write_int(&mut self, value: i64) -> Result<(), CodecError> {
        let width = int_width(value);
        let bytes = value.to_be_bytes();
        self.write_raw(&[width as u8])?;
        self.write_raw(&bytes[8 - width..])
    }

    pub fn write_len(&mut self, len: usize) -> Result<(), CodecError> {
        let value = i64::try_from(len).map_err(|_| FormatError::LimitExceeded {
            field: "length",
            found: len as u64,
            limit: i64::MAX as u64,
        })?;
        self.write_int(value)
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), CodecError> {
        self.write_raw(&[8])?;
        self.write_raw(&value.to_be_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.write_len(bytes.len())?;
        self.write_raw(bytes)
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), CodecError> {
        self.write_bytes(value.as_bytes())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.write_raw(&[u8::from(value)])
    }

    pub(crate) fn flush(&mut self) -> Result<(), CodecError> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Fewest bytes whose sign extension gives back `value`.
fn int_width(value: i64) -> usize {
    if value == 0 {
        return 0;
    }
    (1..8)
        .find(|&width| {
            let shift = 64 - 8 * width as u32;
            (value << shift) >> shift == value
        })
        .unwrap_or(8)
}

/// Reads binary fields, tracking the byte offset for error reports.
pub struct FieldReader<R: Read> {
    inner: R,
    offset: u64,
    limits: DecodeLimits,
}

impl<R: Read> FieldReader<R> {
    pub fn new(inner: R, limits: DecodeLimits) -> Self {
        Self {
            inner,
            offset: 0,
            limits,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    pub(crate) fn read_raw(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                Err(FormatError::Truncated {
                    offset: self.offset,
                }
                .into())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn read_byte(&mut self) -> Result<u8, CodecError> {
        let mut byte = [0u8; 1];
        self.read_raw(&mut byte)?;
        Ok(byte[0])
    }

    pub fn read_int(&mut self) -> Result<i64, CodecError> {
        let offset = self.offset;
        let width = self.read_byte()?;
        if width > 8 {
            return Err(FormatError::IntegerWidth { offset, width }.into());
        }
        let width = usize::from(width);
        let mut bytes = [0u8; 8];
        self.read_raw(&mut bytes[8 - width..])?;
        if width > 0 && width < 8 && bytes[8 - width] & 0x80 != 0 {
            bytes[..8 - width].fill(0xff);
        }
        Ok(i64::from_be_bytes(bytes))
    }

    /// Read a non-negative integer no larger than `limit`.
    pub fn read_len(&mut self, field: &'static str, limit: usize) -> Result<usize, CodecError> {
        let offset = self.offset;
        let value = self.read_int()?;
        if value < 0 {
            return Err(FormatError::NegativeLength { offset, value }.into());
        }
        let found = value as u64;
        if found > limit as u64 {
            return Err(FormatError::LimitExceeded {
                field,
                found,
                limit: limit as u64,
            }
            .into());
        }
        Ok(found as usize)
    }

    pub fn read_f64(&mut self) -> Result<f64, CodecError> {
        let offset = self.offset;
        let width = self.read_byte()?;
        if width != 8 {
            return Err(FormatError::FloatWidth { offset, width }.into());
        }
        let mut bytes = [0u8; 8];
        self.read_raw(&mut bytes)?;
        Ok(f64::from_be_bytes(bytes))
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.read_len("field length", self.limits.max_field_len)?;
        let mut bytes = vec![0u8; len];
        self.read_raw(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_str(&mut self) -> Result<String, CodecError> {
        let offset = self.offset;
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8 { offset }.into())
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        let offset = self.offset;
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(FormatError::BadMarker { offset, value }.into()),
        }
    }

    /// Fail unless the stream is exhausted.
    pub(crate) fn expect_end(&mut self) -> Result<(), CodecError> {
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(0) => return Ok(()),
                Ok(_) => {
                    return Err(FormatError::TrailingData {
                        offset: self.offset,
                    }
                    .into())
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// A node payload that knows how to write itself as binary fields.
///
/// The codec never interprets payloads; it only frames them between the node
/// boundaries. Implementations must read back exactly the fields they wrote.
///
/// # Example
///
/// ```rust
/// use automata_engine::codec::{CodecError, FieldReader, FieldWriter, Payload};
/// use std::io::{Read, Write};
///
/// #[derive(Debug, PartialEq)]
/// struct City {
///     name: String,
///     population: i64,
/// }
///
/// impl Payload for City {
///     fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<(), CodecError> {
///         out.write_str(&self.name)?;
///         out.write_int(self.population)
///     }
///
///     fn read_fields<R: Read>(input: &mut FieldReader<R>) -> Result<Self, CodecError> {
///         Ok(City {
///             name: input.read_str()?,
///             population: input.read_int()?,
///         })
///     }
/// }
/// ```
pub trait Payload: Sized {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<(), CodecError>;

    fn read_fields<R: Read>(input: &mut FieldReader<R>) -> Result<Self, CodecError>;
}

impl Payload for () {
    fn write_fields<W: Write>(&self, _out: &mut FieldWriter<W>) -> Result<(), CodecError> {
        Ok(())
    }

    fn read_fields<R: Read>(_input: &mut FieldReader<R>) -> Result<Self, CodecError> {
        Ok(())
    }
}

impl Payload for String {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<(), CodecError> {
        out.write_str(self)
    }

    fn read_fields<R: Read>(input: &mut FieldReader<R>) -> Result<Self, CodecError> {
        input.read_str()
    }
}

impl Payload for i64 {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<(), CodecError> {
        out.write_int(*self)
    }

    fn read_fields<R: Read>(input: &mut FieldReader<R>) -> Result<Self, CodecError> {
        input.read_int()
    }
}

impl Payload for f64 {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<(), CodecError> {
        out.write_f64(*self)
    }

    fn read_fields<R: Read>(input: &mut FieldReader<R>) -> Result<Self, CodecError> {
        input.read_f64()
    }
}

impl Payload for bool {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<(), CodecError> {
        out.write_bool(*self)
    }

    fn read_fields<R: Read>(input: &mut FieldReader<R>) -> Result<Self, CodecError> {
        input.read_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written<F>(f: F) -> Vec<u8>
    where
        F: FnOnce(&mut FieldWriter<&mut Vec<u8>>) -> Result<(), CodecError>,
    {
        let mut buf = Vec::new();
        f(&mut FieldWriter::new(&mut buf)).unwrap();
        buf
    }

    fn reader(bytes: &[u8]) -> FieldReader<&[u8]> {
        FieldReader::new(bytes, DecodeLimits::default())
    }

    #[test]
    fn integers_use_minimal_width() {
        assert_eq!(written(|w| w.write_int(0)), [0]);
        assert_eq!(written(|w| w.write_int(1)), [1, 0x01]);
        assert_eq!(written(|w| w.write_int(-1)), [1, 0xff]);
        assert_eq!(written(|w| w.write_int(127)), [1, 0x7f]);
        assert_eq!(written(|w| w.write_int(128)), [2, 0x00, 0x80]);
        assert_eq!(written(|w| w.write_int(-129)), [2, 0xff, 0x7f]);
        assert_eq!(written(|w| w.write_int(i64::MIN)).len(), 9);
    }

    #[test]
    fn integers_sign_extend_on_read() {
        for value in [0, 1, -1, 128, -129, 70_000, i64::MAX, i64::MIN] {
            let bytes = written(|w| w.write_int(value));
            assert_eq!(reader(&bytes).read_int().unwrap(), value);
        }
    }

    #[test]
    fn oversized_integer_width_is_rejected() {
        let err = reader(&[9, 0, 0]).read_int().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::IntegerWidth { offset: 0, width: 9 })
        ));
    }

    #[test]
    fn floats_are_eight_big_endian_bytes() {
        let bytes = written(|w| w.write_f64(1.5));
        assert_eq!(bytes, [8, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]);
        assert_eq!(reader(&bytes).read_f64().unwrap(), 1.5);

        let err = reader(&[4, 0, 0, 0, 0]).read_f64().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::FloatWidth { width: 4, .. })
        ));
    }

    #[test]
    fn strings_are_length_prefixed() {
        let bytes = written(|w| w.write_str("hé"));
        assert_eq!(bytes, [1, 3, b'h', 0xc3, 0xa9]);
        assert_eq!(reader(&bytes).read_str().unwrap(), "hé");
    }

    #[test]
    fn truncated_field_reports_offset() {
        let err = reader(&[1, 5, b'a', b'b']).read_str().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::Truncated { offset: 2 })
        ));
    }

    #[test]
    fn negative_and_oversized_lengths_are_rejected() {
        let err = reader(&[1, 0xff]).read_bytes().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::NegativeLength { value: -1, .. })
        ));

        let limits = DecodeLimits {
            max_field_len: 4,
            ..DecodeLimits::default()
        };
        let err = FieldReader::new(&[1u8, 5][..], limits).read_bytes().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::LimitExceeded { found: 5, limit: 4, .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_a_format_error() {
        let err = reader(&[1, 1, 0xff]).read_str().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::InvalidUtf8 { offset: 0 })
        ));
    }

    #[test]
    fn markers_must_be_zero_or_one() {
        assert!(reader(&[1]).read_bool().unwrap());
        let err = reader(&[2]).read_bool().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::BadMarker { value: 2, .. })
        ));
    }

    #[test]
    fn expect_end_detects_trailing_bytes() {
        let mut input = reader(&[0, 7]);
        assert_eq!(input.read_int().unwrap(), 0);
        assert!(matches!(
            input.expect_end(),
            Err(CodecError::Format(FormatError::TrailingData { offset: 1 }))
        ));

        let mut input = reader(&[0]);
        input.read_int().unwrap();
        assert!(input.expect_end().is_ok());
    }
}
