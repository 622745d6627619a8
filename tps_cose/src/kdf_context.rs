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
 * COSE KDF Context (RFC 9053 §5.2) - the HKDF `info` parameter for ECDH-ES recipients.
 *
 *   COSE_KDF_Context = [
 *       AlgorithmID : int,
 *       PartyUInfo   : [ identity : bstr / nil, nonce : bstr / nil, other : bstr / nil ],
 *       PartyVInfo   : [ identity : bstr / nil, nonce : bstr / nil, other : bstr / nil ],
 *       SuppPubInfo  : [ keyDataLength : uint, protected : bstr, other : bstr ],
 *   ]
 *
 * `other` entries are omitted rather than sent as `nil` when absent, matching common practice and
 * keeping the context minimal; a present-but-empty identity/nonce is still distinguished from an
 * absent one by the caller choosing `ByteView::present(&[])` versus `ByteView::absent()`.
 **************************************************************************************************/
use tps_minicbor::encoder::CBORBuilder;
use tps_minicbor::types::array;

use crate::buffer::ByteView;
use crate::error::{CoseError, Result};

/// Default scratch buffer size for a KDF context - large enough for typical PartyU/PartyV
/// identifiers plus a small protected header.
pub const DEFAULT_KDF_CONTEXT_LEN: usize = 96;

/// One side (PartyU or PartyV) of the KDF context, per RFC 9053 §5.2.
#[derive(Copy, Clone, Default)]
pub struct PartyInfo<'a> {
    pub identity: ByteView<'a>,
    pub nonce: ByteView<'a>,
    pub other: ByteView<'a>,
}

impl<'a> PartyInfo<'a> {
    /// All three fields absent.
    pub fn none() -> Self {
        PartyInfo {
            identity: ByteView::absent(),
            nonce: ByteView::absent(),
            other: ByteView::absent(),
        }
    }

    fn encode<'f, 'buf>(
        &self,
        buf: &'f mut tps_minicbor::encoder::EncodeBuffer<'buf>,
    ) -> tps_minicbor::error::Result<&'f mut tps_minicbor::encoder::EncodeBuffer<'buf>> {
        buf.insert(&array(|b| {
            let b = encode_byte_view(b, &self.identity)?;
            let b = encode_byte_view(b, &self.nonce)?;
            encode_byte_view(b, &self.other)
        }))
    }
}

fn encode_byte_view<'f, 'buf>(
    buf: &'f mut tps_minicbor::encoder::EncodeBuffer<'buf>,
    view: &ByteView,
) -> tps_minicbor::error::Result<&'f mut tps_minicbor::encoder::EncodeBuffer<'buf>> {
    match view.bytes() {
        Some(bytes) => buf.insert(&bytes),
        None => buf.insert(&()),
    }
}

/// Build a `COSE_KDF_Context` into `scratch`, returning the encoded bytes to feed as HKDF `info`.
///
/// `alg` is the recipient's key-wrap algorithm identifier (the `AlgorithmID` field - RFC 9053
/// binds the wrapping algorithm here, not the ECDH curve). `key_data_len` is the length in bits of
/// the key being derived (the AES-KW KEK length). `protected` is the recipient's own protected
/// header bytes, exactly as they appear (or will appear) on the wire.
pub fn build<'a>(
    alg: i64,
    party_u: &PartyInfo,
    party_v: &PartyInfo,
    key_data_len_bits: u64,
    protected: &[u8],
    scratch: &'a mut [u8],
) -> Result<&'a [u8]> {
    let mut builder = CBORBuilder::new(scratch);
    builder
        .insert(&array(|b| {
            let b = b.insert(&alg)?;
            let b = party_u.encode(b)?;
            let b = party_v.encode(b)?;
            b.insert(&array(|supp| {
                let supp = supp.insert(&key_data_len_bits)?;
                let supp = supp.insert(&protected)?;
                Ok(supp)
            }))
        }))
        .map_err(|_| CoseError::KdfContextBufferTooSmall)?;
    builder.encoded().map_err(|_| CoseError::KdfContextBufferTooSmall)
}
