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
 * rs_minicbor wire-format constants
 *
 * Major type / additional information layout shared by the encoder and decoder. Kept as plain
 * constants rather than an enum because the decoder matches on raw MT/AI bytes before it knows
 * which item type it is looking at.
 **************************************************************************************************/

/// Mask for the Additional Information field of the initial MT/AI byte (low 5 bits).
pub(crate) const AI_MASK: u8 = 0x1f;
/// Mask for the Major Type field of the initial MT/AI byte (top 3 bits).
pub(crate) const MT_MASK: u8 = 0xe0;

/// Major type values, shifted into the top 3 bits of the initial byte.
pub(crate) const MT_UINT: u8 = 0x00;
pub(crate) const MT_NINT: u8 = 0x20;
pub(crate) const MT_BSTR: u8 = 0x40;
pub(crate) const MT_TSTR: u8 = 0x60;
pub(crate) const MT_ARRAY: u8 = 0x80;
pub(crate) const MT_MAP: u8 = 0xa0;
pub(crate) const MT_TAG: u8 = 0xc0;
pub(crate) const MT_SIMPLE_FLOAT: u8 = 0xe0;

/// Additional Information values of 0..=23 encode their value directly.
pub(crate) const PAYLOAD_AI_BITS: u8 = 23;
/// Additional Information value indicating that a 1-byte payload follows.
pub(crate) const PAYLOAD_ONE_BYTE: u8 = 24;
/// Additional Information value indicating that a 2-byte payload follows.
pub(crate) const PAYLOAD_TWO_BYTES: u8 = 25;
/// Additional Information value indicating that a 4-byte payload follows.
pub(crate) const PAYLOAD_FOUR_BYTES: u8 = 26;
/// Additional Information value indicating that an 8-byte payload follows.
pub(crate) const PAYLOAD_EIGHT_BYTES: u8 = 27;

/// Simple value encodings sharing the MT_SIMPLE_FLOAT major type.
pub(crate) const AI_FALSE: u8 = 20;
pub(crate) const AI_TRUE: u8 = 21;
pub(crate) const AI_NULL: u8 = 22;
pub(crate) const AI_UNDEFINED: u8 = 23;

/// Bit flags used by the [`crate::utils::Allowable`] / [`crate::utils::Filter`] machinery to
/// restrict which CBOR major types are acceptable at a given decode site.
#[cfg(feature = "combinators")]
pub mod allow {
    pub const NONE: u32 = 0x0001;
    pub const UINT: u32 = 0x0002;
    pub const NINT: u32 = 0x0004;
    pub const BSTR: u32 = 0x0008;
    pub const TSTR: u32 = 0x0010;
    pub const ARRAY: u32 = 0x0020;
    pub const MAP: u32 = 0x0040;
    pub const TAG: u32 = 0x0080;
    pub const SIMPLE: u32 = 0x0100;
    pub const FLOAT: u32 = 0x0200;

    pub const ANY: u32 = NONE
        | UINT
        | NINT
        | BSTR
        | TSTR
        | ARRAY
        | MAP
        | TAG
        | SIMPLE
        | FLOAT;
    pub const INT: u32 = UINT | NINT;
}
