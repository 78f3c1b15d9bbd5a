//! Length-prefixed frame encoding.
//!
//! ## Frame Format
//!
//! ```text
//! | length (W bytes, big-endian, unsigned) | payload (length bytes, UTF-8) |
//! ```
//!
//! `W` is the configured prefix width, 4 by default. A file is nothing but a
//! sequence of frames, so payload boundaries are recovered by reading the
//! prefixes in order from offset 0.
//!
//! Payloads are decoded leniently: invalid UTF-8 is replaced with U+FFFD
//! instead of failing the read.

use crate::config::{check_prefix_width, DEFAULT_PREFIX_WIDTH, MAX_PREFIX_WIDTH};
use crate::error::{LogError, LogResult};
use std::io::{self, Read};

/// Message carried by the error for a file that ends inside a length prefix.
pub const INCOMPLETE_PREFIX: &str = "incomplete length prefix";

/// Message carried by the error for a file that ends inside a payload.
pub const INCOMPLETE_PAYLOAD: &str = "incomplete payload";

/// Encodes and decodes frames with a fixed-width length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    width: u8,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self {
            width: DEFAULT_PREFIX_WIDTH,
        }
    }
}

impl FrameCodec {
    /// Creates a codec with the given prefix width.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`] if `width` is not between 1 and 8.
    pub fn new(width: u8) -> LogResult<Self> {
        check_prefix_width(width)?;
        Ok(Self { width })
    }

    /// Returns the prefix width in bytes.
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Returns the largest payload length the prefix can represent.
    #[must_use]
    pub const fn max_payload_len(&self) -> u64 {
        if self.width >= MAX_PREFIX_WIDTH {
            u64::MAX
        } else {
            (1u64 << (8 * self.width as u32)) - 1
        }
    }

    /// Returns the encoded size of a frame carrying `payload_len` bytes.
    #[must_use]
    pub const fn frame_len(&self, payload_len: usize) -> usize {
        self.width as usize + payload_len
    }

    /// Encodes a payload into a single frame buffer.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::PayloadTooLarge`] if the payload length does not
    /// fit in the prefix.
    pub fn encode(&self, payload: &str) -> LogResult<Vec<u8>> {
        let bytes = payload.as_bytes();
        let max = self.max_payload_len();
        if bytes.len() as u64 > max {
            return Err(LogError::PayloadTooLarge {
                len: bytes.len(),
                max,
            });
        }

        let prefix = (bytes.len() as u64).to_be_bytes();
        let mut frame = Vec::with_capacity(self.frame_len(bytes.len()));
        frame.extend_from_slice(&prefix[prefix.len() - self.width as usize..]);
        frame.extend_from_slice(bytes);
        Ok(frame)
    }

    /// Reads the next frame's payload bytes.
    ///
    /// Returns `Ok(None)` on a clean end of input (no bytes left before a
    /// prefix).
    ///
    /// # Errors
    ///
    /// Returns an [`io::ErrorKind::UnexpectedEof`] error if the input ends
    /// inside a prefix or payload, or any error from the underlying reader.
    pub fn read_frame<R: Read>(&self, reader: &mut R) -> io::Result<Option<Vec<u8>>> {
        let width = self.width as usize;
        let mut prefix = [0u8; 8];
        let got = read_full(reader, &mut prefix[8 - width..])?;

        if got == 0 {
            return Ok(None);
        }
        if got < width {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, INCOMPLETE_PREFIX));
        }

        let len = u64::from_be_bytes(prefix);
        // A corrupt prefix may declare an enormous length; grow the buffer
        // as bytes arrive rather than allocating `len` up front.
        let mut payload = Vec::new();
        reader.by_ref().take(len).read_to_end(&mut payload)?;

        if (payload.len() as u64) != len {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, INCOMPLETE_PAYLOAD));
        }
        Ok(Some(payload))
    }
}

/// Decodes payload bytes, replacing invalid UTF-8 sequences.
#[must_use]
pub fn decode_payload(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Fills `buf` as far as the reader allows, returning the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
