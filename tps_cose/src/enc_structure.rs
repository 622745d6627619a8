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
 * Enc_structure (RFC 9052 §5.3) - the AAD bound into AEAD body encryption.
 *
 * Must be produced byte-for-byte identically on encode and decode: the parser feeds in the
 * protected header bytes exactly as they appeared on the wire rather than re-serializing the
 * parsed parameter set.
 **************************************************************************************************/
use tps_minicbor::encoder::CBORBuilder;
use tps_minicbor::types::array;

use crate::error::{CoseError, Result};

/// Default scratch buffer size for an Enc_structure, as suggested by the wire contract - enough
/// for a handful of small header parameters plus typical external AAD.
pub const DEFAULT_ENC_STRUCT_LEN: usize = 64;

/// The context string used as the first element of `COSE_Encrypt0`'s Enc_structure.
pub const CONTEXT_ENCRYPT0: &str = "Encrypt0";
/// The context string used as the first element of `COSE_Encrypt`'s Enc_structure.
pub const CONTEXT_ENCRYPT: &str = "Encrypt";

/// Build `["Encrypt0" | "Encrypt", protected_bytes, external_aad]` into `scratch`, returning the
/// encoded bytes.
///
/// `protected_bytes` must be the exact bytes that were (or will be) written as the protected
/// header byte string - including the zero-length case - never a re-encoding of the parsed
/// parameter set.
pub fn build<'a>(
    context: &str,
    protected_bytes: &[u8],
    external_aad: &[u8],
    scratch: &'a mut [u8],
) -> Result<&'a [u8]> {
    let mut builder = CBORBuilder::new(scratch);
    builder
        .insert(&array(|b| b.insert(&context)?.insert(&protected_bytes)?.insert(&external_aad)))
        .map_err(|_| CoseError::AadBufferTooSmall)?;
    builder.encoded().map_err(|_| CoseError::AadBufferTooSmall)
}
