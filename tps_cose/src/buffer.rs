/***************************************************************************************************
 * Copyright (c) 2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * Useful-Buffer substrate
 *
 * `ByteView` and `BoundedBuf` keep "field absent" and "field present but zero length" distinct,
 * and keep every byte-copying operation bounds-checked against a caller-owned buffer. Neither type
 * allocates.
 **************************************************************************************************/
use crate::error::{CoseError, Result};

/// An immutable view over a byte slice that may be entirely absent.
///
/// `ByteView::absent()` ("field not present") is distinct from `ByteView::present(&[])` ("field
/// present but zero bytes") - the two read differently from the wire (a missing map entry versus
/// a zero-length byte string) and callers must be able to tell them apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ByteView<'a>(Option<&'a [u8]>);

impl<'a> ByteView<'a> {
    /// A view over a present, possibly empty, byte slice.
    #[inline]
    pub fn present(bytes: &'a [u8]) -> Self {
        ByteView(Some(bytes))
    }

    /// A view over an absent field.
    #[inline]
    pub fn absent() -> Self {
        ByteView(None)
    }

    /// `true` if this view is absent.
    #[inline]
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// `true` if this view is present and zero-length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Some(b) if b.is_empty())
    }

    /// The underlying bytes, or `None` if absent.
    #[inline]
    pub fn bytes(&self) -> Option<&'a [u8]> {
        self.0
    }
}

impl<'a> From<&'a [u8]> for ByteView<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteView::present(bytes)
    }
}

/// A caller-owned output region with a write cursor.
///
/// `BoundedBuf` never grows; every write is checked against the remaining capacity and returns
/// [`CoseError::OutputBufferTooSmall`] rather than panicking or truncating silently.
pub struct BoundedBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BoundedBuf<'a> {
    /// Wrap `buf` for writing, starting at offset zero.
    pub fn new(buf: &'a mut [u8]) -> Self {
        BoundedBuf { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.pos
    }

    /// `true` if nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Remaining writable capacity.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Append `bytes`, failing if there is not enough remaining capacity.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(CoseError::OutputBufferTooSmall);
        }
        let start = self.pos;
        self.buf[start..start + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    /// The bytes written so far, narrowed to the written prefix.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}
