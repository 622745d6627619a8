/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * CBOR Encoder
 *
 * A fairly comprehensive, memory efficient, serializer for CBOR (RFC8949). This implementation is
 * designed for use in constrained systems and requires neither the Rust standard library nor an
 * allocator: the caller supplies the output buffer and we never grow it.
 *
 * Arrays, maps and tags are encoded by reserving the maximum possible header width (9 bytes: MT/AI
 * byte plus an 8 byte length), letting the closure that builds the body run, and then shrinking the
 * reserved header down to whatever the true item count needs once it is known. This is what lets
 * [`crate::types::array`] and [`crate::types::map`] always produce the shortest legal encoding
 * without the caller precomputing sizes by hand.
 **************************************************************************************************/
use crate::constants::*;
use crate::decode::SequenceBuffer;
use crate::error::{CBORError, Result};
use crate::utils::within;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Worst-case width of a CBOR head: one MT/AI byte plus an 8 byte big-endian length.
const RESERVED_HEADER: usize = 9;
/// Maximum nesting depth of arrays/maps/tags supported by a single [`EncodeBuffer`]. This is a
/// fixed-size stack so that encoding never allocates.
const MAX_DEPTH: usize = 16;

#[derive(Copy, Clone)]
struct Frame {
    header_pos: usize,
    count: usize,
}

/// Opaque bookkeeping token for one open array/map/tag. Created by [`EncodeBuffer::array_start`],
/// [`EncodeBuffer::map_start`] or [`EncodeBuffer::tag_start`] and consumed by the matching
/// `_finalize` call. Callers only ever hold one of these at a time, on the stack, inside the
/// closure that builds the container - see [`crate::types::array`].
pub struct EncodeContext {
    header_pos: usize,
}

impl EncodeContext {
    /// Construct an empty context. The real position is filled in by `*_start`.
    #[inline]
    pub fn new() -> Self {
        EncodeContext { header_pos: 0 }
    }
}

impl Default for EncodeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A single CBOR item which knows how to write itself into an [`EncodeBuffer`].
///
/// Implemented for the Rust primitives (`bool`, the integer types, `&str` and `&[u8]`) and for the
/// [`crate::types::array`], [`crate::types::map`] and [`crate::types::tag`] combinators.
pub trait EncodeItem {
    /// Write `self` into `buf` at the current position, advancing it past the encoded item.
    fn encode<'f, 'buf>(
        &self,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<&'f mut EncodeBuffer<'buf>>;
}

/// A buffer being incrementally filled with a CBOR encoding. Wraps a caller-supplied `&mut [u8]`
/// and tracks both the write position and a small fixed-depth stack of open array/map/tag frames
/// so that [`EncodeBuffer::insert`] can bump the right container's item count.
pub struct EncodeBuffer<'buf> {
    buf: &'buf mut [u8],
    pos: usize,
    frames: [Frame; MAX_DEPTH],
    depth: usize,
}

impl<'buf> EncodeBuffer<'buf> {
    /// Wrap `buf` for encoding, starting at offset zero.
    pub fn new(buf: &'buf mut [u8]) -> Self {
        EncodeBuffer {
            buf,
            pos: 0,
            frames: [Frame { header_pos: 0, count: 0 }; MAX_DEPTH],
            depth: 0,
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.pos
    }

    /// The bytes written so far, tied to the lifetime of this borrow.
    #[inline]
    pub fn encoded(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    fn bump_count(&mut self) {
        if self.depth > 0 {
            self.frames[self.depth - 1].count += 1;
        }
    }

    fn reserve_header(&mut self) -> Result<usize> {
        let header_pos = self.pos;
        if !within(self.buf, self.pos, RESERVED_HEADER) {
            return Err(CBORError::EndOfBuffer);
        }
        self.pos += RESERVED_HEADER;
        Ok(header_pos)
    }

    fn push_frame(&mut self, header_pos: usize) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(CBORError::NotImplemented);
        }
        self.frames[self.depth] = Frame { header_pos, count: 0 };
        self.depth += 1;
        Ok(())
    }

    fn pop_frame(&mut self, ctx: &EncodeContext) -> Result<Frame> {
        if self.depth == 0 || self.frames[self.depth - 1].header_pos != ctx.header_pos {
            return Err(CBORError::MalformedEncoding);
        }
        self.depth -= 1;
        Ok(self.frames[self.depth])
    }

    /// Overwrite the reserved header at `header_pos` with the true (major type, count) header,
    /// shifting the already-written body left to close the gap left by over-reservation.
    fn backpatch_header(&mut self, header_pos: usize, major: u8, value: u64) -> Result<()> {
        let mut hdr = [0u8; RESERVED_HEADER];
        let hdr_len = write_head(&mut hdr, 0, major, value)?;
        let body_start = header_pos + RESERVED_HEADER;
        let body_len = self.pos - body_start;
        let new_body_start = header_pos + hdr_len;
        self.buf.copy_within(body_start..body_start + body_len, new_body_start);
        self.buf[header_pos..header_pos + hdr_len].copy_from_slice(&hdr[..hdr_len]);
        self.pos = new_body_start + body_len;
        Ok(())
    }

    /// Insert a single CBOR item, built from any value implementing [`EncodeItem`].
    pub fn insert<T: EncodeItem>(&mut self, item: &T) -> Result<&mut Self> {
        item.encode(self)
    }

    /// Convenience for inserting a map `key, value` pair in one call.
    pub fn insert_key_value<K: EncodeItem, V: EncodeItem>(
        &mut self,
        key: &K,
        value: &V,
    ) -> Result<&mut Self> {
        self.insert(key)?;
        self.insert(value)
    }

    /// Insert a slice of already-encoded CBOR verbatim, as a single item in the enclosing
    /// container. Used to re-emit a protected header map that was captured as raw bytes, without
    /// re-serializing its parsed form (see the `Enc_structure` contract).
    pub fn insert_cbor(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        if !within(self.buf, self.pos, bytes.len()) {
            return Err(CBORError::EndOfBuffer);
        }
        let start = self.pos;
        self.buf[start..start + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        self.bump_count();
        Ok(self)
    }

    /// Begin encoding an array: reserve space for its header and open a new counting frame.
    pub fn array_start(&mut self, ctx: &mut EncodeContext) -> Result<()> {
        let header_pos = self.reserve_header()?;
        self.push_frame(header_pos)?;
        ctx.header_pos = header_pos;
        Ok(())
    }

    /// Close the array opened by the matching `array_start`, writing its true length header.
    pub fn array_finalize(&mut self, ctx: &EncodeContext) -> Result<()> {
        let frame = self.pop_frame(ctx)?;
        self.backpatch_header(frame.header_pos, MT_ARRAY, frame.count as u64)?;
        self.bump_count();
        Ok(())
    }

    /// Begin encoding a map: reserve space for its header and open a new counting frame.
    pub fn map_start(&mut self, ctx: &mut EncodeContext) -> Result<()> {
        self.array_start(ctx)
    }

    /// Close the map opened by the matching `map_start`. Fails if an odd number of items was
    /// inserted, since a map body must be key/value pairs.
    pub fn map_finalize(&mut self, ctx: &EncodeContext) -> Result<()> {
        let frame = self.pop_frame(ctx)?;
        if frame.count % 2 != 0 {
            return Err(CBORError::MalformedEncoding);
        }
        self.backpatch_header(frame.header_pos, MT_MAP, (frame.count / 2) as u64)?;
        self.bump_count();
        Ok(())
    }

    /// Begin encoding a tagged item: open a frame that must hold exactly one item.
    pub fn tag_start(&mut self, ctx: &mut EncodeContext) -> Result<()> {
        let header_pos = self.pos;
        self.push_frame(header_pos)?;
        ctx.header_pos = header_pos;
        Ok(())
    }

    /// Write the tag number itself. Unlike array/map headers the tag value is known up front, so
    /// no reservation or backpatching is needed.
    pub fn tag_next_item(&mut self, tag: u64) -> Result<&mut Self> {
        self.pos = write_head(self.buf, self.pos, MT_TAG, tag)?;
        Ok(self)
    }

    /// Close the tag opened by the matching `tag_start`. Fails unless exactly one item was
    /// written inside it.
    pub fn tag_finalize(&mut self, ctx: &EncodeContext) -> Result<&mut Self> {
        let frame = self.pop_frame(ctx)?;
        if frame.count != 1 {
            return Err(CBORError::MalformedEncoding);
        }
        self.bump_count();
        Ok(self)
    }
}

/// Write a CBOR head (major type `major`, value `value`) at `buf[pos..]` using the shortest legal
/// encoding, returning the index of the first byte after the head.
fn write_head(buf: &mut [u8], pos: usize, major: u8, value: u64) -> Result<usize> {
    if value <= PAYLOAD_AI_BITS as u64 {
        if !within(buf, pos, 1) {
            return Err(CBORError::EndOfBuffer);
        }
        buf[pos] = major | value as u8;
        Ok(pos + 1)
    } else if value <= u8::MAX as u64 {
        if !within(buf, pos, 2) {
            return Err(CBORError::EndOfBuffer);
        }
        buf[pos] = major | PAYLOAD_ONE_BYTE;
        buf[pos + 1] = value as u8;
        Ok(pos + 2)
    } else if value <= u16::MAX as u64 {
        if !within(buf, pos, 3) {
            return Err(CBORError::EndOfBuffer);
        }
        buf[pos] = major | PAYLOAD_TWO_BYTES;
        buf[pos + 1..pos + 3].copy_from_slice(&(value as u16).to_be_bytes());
        Ok(pos + 3)
    } else if value <= u32::MAX as u64 {
        if !within(buf, pos, 5) {
            return Err(CBORError::EndOfBuffer);
        }
        buf[pos] = major | PAYLOAD_FOUR_BYTES;
        buf[pos + 1..pos + 5].copy_from_slice(&(value as u32).to_be_bytes());
        Ok(pos + 5)
    } else {
        if !within(buf, pos, 9) {
            return Err(CBORError::EndOfBuffer);
        }
        buf[pos] = major | PAYLOAD_EIGHT_BYTES;
        buf[pos + 1..pos + 9].copy_from_slice(&value.to_be_bytes());
        Ok(pos + 9)
    }
}

macro_rules! impl_uint_encode {
    ($($t:ty),*) => {
        $(
            impl EncodeItem for $t {
                fn encode<'f, 'buf>(
                    &self,
                    buf: &'f mut EncodeBuffer<'buf>,
                ) -> Result<&'f mut EncodeBuffer<'buf>> {
                    buf.pos = write_head(buf.buf, buf.pos, MT_UINT, *self as u64)?;
                    buf.bump_count();
                    Ok(buf)
                }
            }
        )*
    };
}
impl_uint_encode!(u8, u16, u32, u64, usize);

macro_rules! impl_int_encode {
    ($($t:ty),*) => {
        $(
            impl EncodeItem for $t {
                fn encode<'f, 'buf>(
                    &self,
                    buf: &'f mut EncodeBuffer<'buf>,
                ) -> Result<&'f mut EncodeBuffer<'buf>> {
                    let v = *self as i64;
                    buf.pos = if v < 0 {
                        write_head(buf.buf, buf.pos, MT_NINT, (-1 - v) as u64)?
                    } else {
                        write_head(buf.buf, buf.pos, MT_UINT, v as u64)?
                    };
                    buf.bump_count();
                    Ok(buf)
                }
            }
        )*
    };
}
impl_int_encode!(i8, i16, i32, i64);

impl EncodeItem for bool {
    fn encode<'f, 'buf>(
        &self,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<&'f mut EncodeBuffer<'buf>> {
        if !within(buf.buf, buf.pos, 1) {
            return Err(CBORError::EndOfBuffer);
        }
        buf.buf[buf.pos] = MT_SIMPLE_FLOAT | if *self { AI_TRUE } else { AI_FALSE };
        buf.pos += 1;
        buf.bump_count();
        Ok(buf)
    }
}

impl<'a> EncodeItem for &'a str {
    fn encode<'f, 'buf>(
        &self,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<&'f mut EncodeBuffer<'buf>> {
        let bytes = self.as_bytes();
        buf.pos = write_head(buf.buf, buf.pos, MT_TSTR, bytes.len() as u64)?;
        if !within(buf.buf, buf.pos, bytes.len()) {
            return Err(CBORError::EndOfBuffer);
        }
        buf.buf[buf.pos..buf.pos + bytes.len()].copy_from_slice(bytes);
        buf.pos += bytes.len();
        buf.bump_count();
        Ok(buf)
    }
}

impl EncodeItem for () {
    /// Encodes the CBOR simple value `null`, used where a field is structurally present but has
    /// no value (as opposed to the field being absent from its enclosing array or map entirely).
    fn encode<'f, 'buf>(
        &self,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<&'f mut EncodeBuffer<'buf>> {
        if !within(buf.buf, buf.pos, 1) {
            return Err(CBORError::EndOfBuffer);
        }
        buf.buf[buf.pos] = MT_SIMPLE_FLOAT | AI_NULL;
        buf.pos += 1;
        buf.bump_count();
        Ok(buf)
    }
}

impl<'a> EncodeItem for &'a [u8] {
    fn encode<'f, 'buf>(
        &self,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<&'f mut EncodeBuffer<'buf>> {
        buf.pos = write_head(buf.buf, buf.pos, MT_BSTR, self.len() as u64)?;
        if !within(buf.buf, buf.pos, self.len()) {
            return Err(CBORError::EndOfBuffer);
        }
        buf.buf[buf.pos..buf.pos + self.len()].copy_from_slice(self);
        buf.pos += self.len();
        buf.bump_count();
        Ok(buf)
    }
}

/// Top-level entry point for building a CBOR encoding into a caller-supplied buffer.
///
/// Thin wrapper over [`EncodeBuffer`] that additionally exposes [`CBORBuilder::build`], turning
/// the written prefix into a [`SequenceBuffer`] for further use (e.g. as a `COSE_Encrypt0` byte
/// string, or fed back into another builder via `insert_cbor`).
pub struct CBORBuilder<'buf> {
    inner: EncodeBuffer<'buf>,
}

impl<'buf> CBORBuilder<'buf> {
    /// Wrap `buf` for encoding.
    pub fn new(buf: &'buf mut [u8]) -> Self {
        CBORBuilder { inner: EncodeBuffer::new(buf) }
    }

    /// Insert a single CBOR item.
    pub fn insert<T: EncodeItem>(&mut self, item: &T) -> Result<&mut Self> {
        self.inner.insert(item)?;
        Ok(self)
    }

    /// Insert a map `key, value` pair.
    pub fn insert_key_value<K: EncodeItem, V: EncodeItem>(
        &mut self,
        key: &K,
        value: &V,
    ) -> Result<&mut Self> {
        self.inner.insert_key_value(key, value)?;
        Ok(self)
    }

    /// Insert already-encoded CBOR bytes verbatim.
    pub fn insert_cbor(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.inner.insert_cbor(bytes)?;
        Ok(self)
    }

    /// Finish encoding, returning the written prefix as a [`SequenceBuffer`].
    pub fn build(&mut self) -> Result<SequenceBuffer<'_>> {
        Ok(SequenceBuffer::new(self.inner.encoded()))
    }

    /// The bytes written so far.
    pub fn encoded(&self) -> Result<&[u8]> {
        Ok(self.inner.encoded())
    }
}
