//! Staging buffer for encoded keys.
//!
//! Codecs append into a `KeyBuffer` at its current position and callers hand
//! `as_bytes()` to the storage engine. Decoding reads a `(offset, len)` span
//! back out of the same kind of buffer. The buffer is reusable scratch: clear
//! it between keys instead of allocating a new one.

/// Default capacity for a fresh buffer.
pub const DEFAULT_CAPACITY: usize = 64;

/// Buffers above this capacity are released on [`KeyBuffer::clear`] so one
/// oversized key does not pin memory for the lifetime of the buffer.
pub const SHRINK_THRESHOLD: usize = 65_535;

/// A growable byte buffer with an explicit write position.
///
/// Everything before `position()` is encoded key data.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeyBuffer {
    data: Vec<u8>,
}

impl KeyBuffer {
    /// Create an empty buffer with [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Wrap bytes handed back by the storage engine for decoding.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.data.len()
    }

    /// Current allocation size.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Make room for at least `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    /// Reset the position to zero for reuse.
    pub fn clear(&mut self) {
        self.data.clear();
        if self.data.capacity() > SHRINK_THRESHOLD {
            self.data.shrink_to(DEFAULT_CAPACITY);
        }
    }

    /// The written bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Borrow a span of written bytes, or `None` if it runs past the position.
    #[must_use]
    pub fn span(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.data.get(offset..offset.checked_add(len)?)
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append a single byte.
    pub fn put_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    /// Append a big-endian `u16`.
    pub fn put_u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian `u32`.
    pub fn put_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_be_bytes());
    }

    /// Extend the buffer by `len` zero bytes and return them for in-place
    /// writing.
    ///
    /// Used by layouts that fill a span from both ends at once.
    pub fn put_span(&mut self, len: usize) -> &mut [u8] {
        let start = self.data.len();
        self.data.resize(start + len, 0);
        &mut self.data[start..]
    }

    /// Direct access for codecs that append through `Vec` APIs.
    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn vec_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}

impl std::fmt::Debug for KeyBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = &self.data[..self.data.len().min(16)];
        f.debug_struct("KeyBuffer")
            .field("position", &self.data.len())
            .field("first_16_bytes", &preview)
            .finish_non_exhaustive()
    }
}

/// Read a big-endian `u16` at `offset`.
#[must_use]
pub fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let pair = bytes.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([pair[0], pair[1]]))
}

/// Read a big-endian `u32` at `offset`.
#[must_use]
pub fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let quad = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]))
}

/// Render bytes as lowercase hex.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Parse hex digits (either case, even length) into bytes.
#[must_use]
pub fn from_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_read() {
        let mut buf = KeyBuffer::new();
        buf.put_u8(0xFF);
        buf.put_u16(0x1234);
        buf.put_u32(0xDEAD_BEEF);
        buf.put_bytes(b"hello");

        assert_eq!(buf.position(), 12);
        let bytes = buf.as_bytes();
        assert_eq!(bytes[0], 0xFF);
        assert_eq!(read_u16(bytes, 1), Some(0x1234));
        assert_eq!(read_u32(bytes, 3), Some(0xDEAD_BEEF));
        assert_eq!(buf.span(7, 5), Some(&b"hello"[..]));
        assert_eq!(buf.span(8, 5), None);
        assert_eq!(buf.span(usize::MAX, 2), None);
    }

    #[test]
    fn test_put_span_appends_zeroed_region() {
        let mut buf = KeyBuffer::new();
        buf.put_u8(1);
        let span = buf.put_span(3);
        span[2] = 9;
        assert_eq!(buf.as_bytes(), &[1, 0, 0, 9]);
    }

    #[test]
    fn test_clear_resets_position_and_shrinks_large_buffers() {
        let mut buf = KeyBuffer::new();
        buf.put_span(SHRINK_THRESHOLD + 10);
        assert!(buf.capacity() > SHRINK_THRESHOLD);
        buf.clear();
        assert_eq!(buf.position(), 0);
        assert!(buf.capacity() <= SHRINK_THRESHOLD);
    }

    #[test]
    fn test_read_out_of_bounds() {
        assert_eq!(read_u16(&[0x01], 0), None);
        assert_eq!(read_u32(&[0x01, 0x02, 0x03, 0x04], 1), None);
    }

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(&[0x00, 0xAB, 0x7F]), "00ab7f");
        assert_eq!(from_hex("00AB7f"), Some(vec![0x00, 0xAB, 0x7F]));
        assert_eq!(from_hex(""), Some(Vec::new()));
        assert_eq!(from_hex("abc"), None);
        assert_eq!(from_hex("zz"), None);
    }
}
