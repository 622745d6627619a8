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
 * Recipient encoder/decoder interface
 *
 * `COSE_Recipient` entries are polymorphic: direct, AES Key Wrap and ECDH-ES+AES Key Wrap
 * recipients all share the same on-wire shape (protected/unprotected headers plus a wrapped-key
 * byte string) but disagree about what goes in it. Rather than modelling this with a trait object
 * hierarchy keyed on a recipient "kind" enum, each concrete recipient strategy implements
 * [`RecipientEncoder`] (for the side that knows the CEK and wants to protect it for one recipient)
 * and [`RecipientDecoder`] (for the side holding key material that may or may not unlock a given
 * `COSE_Recipient` entry). The parser drives every registered decoder against every recipient
 * entry in turn and keeps the first one that succeeds; decoders that don't recognise an entry
 * return [`RecipientOutcome::Decline`] rather than an error, so a wrong-algorithm or wrong-kid
 * recipient never aborts the scan for the others.
 **************************************************************************************************/
use tps_minicbor::decoder::MapBuf;
use tps_minicbor::encoder::EncodeBuffer;

use crate::alg::Alg;
use crate::error::CoseError;
use crate::header::{Location, ParamPool};

pub mod direct;
pub mod esdh;
pub mod keywrap;

/// Upper bound on content encryption key size this crate will carry, in bytes (AES-256 plus
/// headroom is already generous for every algorithm in [`crate::alg`]).
pub const MAX_CEK_LEN: usize = 32;

/// Upper bound on the number of `COSE_Recipient` entries a `COSE_Encrypt` message the parser
/// accepts may carry.
pub const MAX_RECIPIENTS: usize = 4;

/// A content encryption key, held in a fixed-size buffer so that no module in this crate needs an
/// allocator to carry one around.
#[derive(Clone)]
pub struct Cek {
    bytes: [u8; MAX_CEK_LEN],
    len: usize,
}

impl Cek {
    /// Wrap `key` as a CEK, failing if it is longer than [`MAX_CEK_LEN`].
    pub fn new(key: &[u8]) -> Result<Self, CoseError> {
        if key.len() > MAX_CEK_LEN {
            return Err(CoseError::KeyImportFailed);
        }
        let mut bytes = [0u8; MAX_CEK_LEN];
        bytes[..key.len()].copy_from_slice(key);
        Ok(Cek { bytes, len: key.len() })
    }

    /// The key bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// The result of attempting to decode one `COSE_Recipient` entry against one key.
pub enum RecipientOutcome {
    /// This decoder understood the entry and recovered the CEK.
    Success(Cek),
    /// This entry is not one this decoder's key/algorithm combination applies to; try the next
    /// decoder or the next recipient entry.
    Decline,
    /// This entry was recognised but failed for a reason the caller should know about (a bad
    /// wrap, an unsupported curve once committed to ECDH-ES, and so on).
    Fatal(CoseError),
}

/// One strategy for protecting a CEK for a single recipient (direct, AES Key Wrap, ECDH-ES+KW).
///
/// `emit_for_encode` writes the recipient's own header parameters (protected and unprotected) and
/// its ciphertext/wrapped-key byte string into the `COSE_Recipient` array that `buf` is already
/// positioned inside of; the assembler is responsible for opening and closing that array.
///
/// `cek_plain` is `None` until some recipient (or the caller) fixes the CEK; a direct recipient is
/// the one strategy that can *produce* a CEK rather than merely wrap an existing one, so every
/// implementation returns the CEK it ends up using, whether that means generating fresh key
/// material (direct) or echoing back the CEK it was handed (key wrap, ECDH-ES).
pub trait RecipientEncoder {
    /// The recipient's key-management algorithm identifier (COSE label 1 value).
    fn alg(&self) -> Alg;

    /// Write this recipient's protected header, unprotected header and wrapped-key body into the
    /// open `COSE_Recipient` array, producing or confirming the CEK along the way.
    fn emit_for_encode<'f, 'buf>(
        &self,
        cek_plain: Option<&[u8]>,
        body_alg: Alg,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<(&'f mut EncodeBuffer<'buf>, Cek), CoseError>;
}

/// One strategy for recovering a CEK from a single `COSE_Recipient` entry.
pub trait RecipientDecoder {
    /// Attempt to recover the CEK from one already-parsed `COSE_Recipient` entry.
    ///
    /// `params` holds the recipient's own decoded header parameters (at `loc`); `protected_bytes`
    /// is the verbatim bstr-wrapped protected header, needed by key-management algorithms (ECDH-ES)
    /// that fold it into a KDF context; `ciphertext` is the wrapped-key/encrypted-key byte string,
    /// which may be absent for direct key agreement.
    fn try_decode(
        &self,
        params: &ParamPool,
        loc: Location,
        protected_bytes: &[u8],
        ciphertext: Option<&[u8]>,
    ) -> RecipientOutcome;
}

/// Decode one `COSE_Recipient`'s header parameters out of its already-split protected bytes and
/// unprotected map, the same way the top-level message's headers are decoded.
pub(crate) fn decode_recipient_headers(
    protected_bytes: &[u8],
    unprotected: MapBuf,
    loc: Location,
    pool: &mut ParamPool,
) -> Result<(), CoseError> {
    crate::header::decode_headers(protected_bytes, unprotected, loc, pool)
}
