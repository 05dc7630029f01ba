//! # Packet Cursor
//!
//! Sequential typed reads and writes over a packet body.
//!
//! ## Encoding
//!
//! - Integers and floats are big-endian (network byte order)
//! - `bool` is one byte, non-zero is true
//! - `Vec2` is two `f32`
//! - Strings are a `u32` byte length followed by UTF-8 bytes

use revenant_shared::{PacketType, Vec2};

use crate::error::{NetError, NetResult};

/// Packet writer - appends fields to a growable buffer.
///
/// Reuse one writer across packets with [`PacketWriter::reset`] to keep the
/// allocation.
#[derive(Clone, Debug, Default)]
pub struct PacketWriter {
    buffer: Vec<u8>,
}

impl PacketWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates an empty writer with `capacity` bytes reserved.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Creates a writer whose first field is the packet type tag.
    #[must_use]
    pub fn packet(packet_type: PacketType) -> Self {
        let mut writer = Self::new();
        writer.write_packet_type(packet_type);
        writer
    }

    /// Clears the buffer for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a slice of the written data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer, returning the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes a bool as one byte.
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes a u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes an i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes an f32.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a 2D vector.
    #[inline]
    pub fn write_vec2(&mut self, value: Vec2) {
        self.write_f32(value.x);
        self.write_f32(value.y);
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) {
        debug_assert!(u32::try_from(value.len()).is_ok());
        self.write_u32(value.len() as u32);
        self.buffer.extend_from_slice(value.as_bytes());
    }

    /// Writes raw bytes with no prefix.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a packet type tag.
    #[inline]
    pub fn write_packet_type(&mut self, packet_type: PacketType) {
        self.write_i32(packet_type as i32);
    }
}

/// Packet reader - consumes fields from a borrowed buffer.
///
/// A failed read leaves the position unchanged.
#[derive(Clone, Debug)]
pub struct PacketReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> PacketReader<'a> {
    /// Creates a new reader from a buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// True once every byte has been consumed.
    #[inline]
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed so far.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Consumes `len` raw bytes.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> NetResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(NetError::Truncated {
                needed: len,
                remaining,
            });
        }
        let bytes = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> NetResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if the packet is exhausted.
    #[inline]
    pub fn read_u8(&mut self) -> NetResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a one-byte bool.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if the packet is exhausted.
    #[inline]
    pub fn read_bool(&mut self) -> NetResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a u32.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if fewer than 4 bytes remain.
    #[inline]
    pub fn read_u32(&mut self) -> NetResult<u32> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    /// Reads an i32.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if fewer than 4 bytes remain.
    #[inline]
    pub fn read_i32(&mut self) -> NetResult<i32> {
        self.read_array::<4>().map(i32::from_be_bytes)
    }

    /// Reads an f32.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if fewer than 4 bytes remain.
    #[inline]
    pub fn read_f32(&mut self) -> NetResult<f32> {
        self.read_array::<4>().map(f32::from_be_bytes)
    }

    /// Reads a 2D vector.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if fewer than 8 bytes remain.
    pub fn read_vec2(&mut self) -> NetResult<Vec2> {
        let [x0, x1, x2, x3, y0, y1, y2, y3] = self.read_array::<8>()?;
        Ok(Vec2::new(
            f32::from_be_bytes([x0, x1, x2, x3]),
            f32::from_be_bytes([y0, y1, y2, y3]),
        ))
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] if the length or the bytes are cut short,
    /// [`NetError::InvalidString`] if the bytes are not UTF-8.
    pub fn read_string(&mut self) -> NetResult<String> {
        let start = self.position;
        let len = self.read_u32()? as usize;
        let bytes = match self.read_bytes(len) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.position = start;
                return Err(err);
            }
        };
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_owned()),
            Err(_) => {
                self.position = start;
                Err(NetError::InvalidString)
            }
        }
    }

    /// Reads a packet type tag.
    ///
    /// # Errors
    ///
    /// [`NetError::Truncated`] or [`NetError::UnknownPacketType`].
    pub fn read_packet_type(&mut self) -> NetResult<PacketType> {
        let tag = self.read_i32()?;
        PacketType::from_i32(tag).ok_or(NetError::UnknownPacketType(tag))
    }
}
