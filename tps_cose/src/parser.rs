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
 * Body parser
 *
 * Mirrors `assembler` step for step in reverse: resolve the message type (from the options, the
 * CBOR tag, or both, consistently), decode body headers while capturing the protected header's
 * verbatim bytes, read off the ciphertext (or require a detached one), recover the CEK - either
 * from the caller directly (`COSE_Encrypt0`) or by scanning recipients against the registered
 * decoders (`COSE_Encrypt`) - then rebuild the Enc_structure from the captured bytes and decrypt.
 *
 * The captured protected bytes are never re-encoded. Re-serializing the decoded parameter set
 * would only coincidentally match the original wire bytes (map key order, integer encoding width,
 * and so on are all CBOR-equivalent but not byte-identical), and the Enc_structure AAD must be
 * byte-exact or AEAD verification fails.
 **************************************************************************************************/
use core::convert::TryFrom;

use tps_minicbor::decoder::{ArrayBuf, MapBuf, SequenceBuffer};
use tps_minicbor::types::CBOR;

use crate::alg::{self};
use crate::assembler::{TAG_ENCRYPT, TAG_ENCRYPT0};
use crate::enc_structure::{self, CONTEXT_ENCRYPT, CONTEXT_ENCRYPT0, DEFAULT_ENC_STRUCT_LEN};
use crate::error::{CoseError, Result};
use crate::header::{self, Location, ParamPool};
use crate::primitive::PrimitiveCrypto;
use crate::recipient::{Cek, RecipientDecoder, RecipientOutcome, MAX_RECIPIENTS};

/// Which top-level message shape a [`Parser`] should expect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    /// `COSE_Encrypt0`, tag 16: no recipients, the caller supplies the CEK directly.
    Encrypt0,
    /// `COSE_Encrypt`, tag 96: one or more `COSE_Recipient` entries carry the CEK.
    Encrypt,
    /// Take the message type from the CBOR tag; fail if the message carries none.
    Unspecified,
}

/// Parser-wide options, mirroring the assembler side's algorithm/mode choices.
#[derive(Copy, Clone, Debug)]
pub struct ParserOptions {
    /// Pins the expected message type, or leaves it to the wire tag.
    pub message_type: MessageType,
    /// Accept non-AEAD (AES-CTR/CBC) body algorithms. The caller remains responsible for
    /// authenticating the plaintext at a higher layer when this is set.
    pub enable_non_aead: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { message_type: MessageType::Unspecified, enable_non_aead: false }
    }
}

fn resolve_message_type(
    pinned: MessageType,
    tag: Option<u64>,
) -> Result<MessageType> {
    let from_tag = match tag {
        Some(TAG_ENCRYPT0) => Some(MessageType::Encrypt0),
        Some(TAG_ENCRYPT) => Some(MessageType::Encrypt),
        Some(_) => None,
        None => None,
    };
    match (pinned, from_tag) {
        (MessageType::Unspecified, Some(t)) => Ok(t),
        (MessageType::Unspecified, None) => Err(CoseError::CannotDetermineMessageType),
        (pinned, Some(t)) if pinned == t => Ok(pinned),
        (_, Some(_)) => Err(CoseError::CannotDetermineMessageType),
        (pinned, None) => Ok(pinned),
    }
}

fn read_ciphertext_field<'b>(arr: &ArrayBuf<'b>) -> Result<Option<&'b [u8]>> {
    match arr.index(2) {
        Some(CBOR::Bstr(bytes)) => Ok(Some(bytes)),
        Some(CBOR::Null) => Ok(None),
        _ => Err(CoseError::CborShape),
    }
}

/// Decode one `COSE_Recipient` entry's [protected, unprotected, ciphertext] shape, returning the
/// verbatim protected bytes, the decoded unprotected map and the ciphertext byte string (present,
/// possibly empty, for direct recipients).
fn split_recipient<'b>(item: CBOR<'b>) -> Result<(&'b [u8], MapBuf<'b>, Option<&'b [u8]>)> {
    let arr = ArrayBuf::try_from(item).map_err(|_| CoseError::RecipientFormat)?;
    let protected = arr.item::<&[u8]>(0).map_err(|_| CoseError::RecipientFormat)?;
    let unprotected = arr.item::<MapBuf>(1).map_err(|_| CoseError::RecipientFormat)?;
    let ciphertext = match arr.index(2) {
        Some(CBOR::Bstr(bytes)) => Some(bytes),
        Some(CBOR::Null) | None => None,
        _ => return Err(CoseError::RecipientFormat),
    };
    Ok((protected, unprotected, ciphertext))
}

/// Scan every `COSE_Recipient` entry in `recipients` against every registered decoder, in that
/// order, stopping at the first [`RecipientOutcome::Success`].
fn scan_recipients(recipients: ArrayBuf, decoders: &[&dyn RecipientDecoder]) -> Result<Cek> {
    if recipients.len() > MAX_RECIPIENTS {
        return Err(CoseError::TooManyParameters);
    }
    for (index, item) in recipients.into_iter().enumerate() {
        let (protected_bytes, unprotected, ciphertext) = split_recipient(item)?;
        let loc = Location::recipient(index as u8);
        let mut pool = ParamPool::new();
        header::decode_recipient_headers(protected_bytes, unprotected, loc, &mut pool)?;

        for decoder in decoders {
            match decoder.try_decode(&pool, loc, protected_bytes, ciphertext) {
                RecipientOutcome::Success(cek) => return Ok(cek),
                RecipientOutcome::Decline => continue,
                RecipientOutcome::Fatal(e) => return Err(e),
            }
        }
    }
    Err(CoseError::NoMatchingRecipient)
}

/// Decrypts `COSE_Encrypt0`/`COSE_Encrypt` messages.
pub struct Parser<'a, P: PrimitiveCrypto> {
    primitive: &'a P,
}

impl<'a, P: PrimitiveCrypto> Parser<'a, P> {
    pub fn new(primitive: &'a P) -> Self {
        Parser { primitive }
    }

    /// Parse and decrypt `message`, writing plaintext into `plaintext_out` and body header
    /// parameters into `params`.
    ///
    /// `cek` fixes the content encryption key directly; required for `COSE_Encrypt0`, and also
    /// accepted for `COSE_Encrypt` as a recipient-bypass for testing. `decoders` is scanned, in
    /// order, against every `COSE_Recipient` entry when one is required and `cek` is `None`.
    /// `detached_ciphertext` is consulted only if the message itself carries a CBOR `null` in the
    /// ciphertext position.
    #[allow(clippy::too_many_arguments)]
    pub fn decrypt<'o>(
        &self,
        options: &ParserOptions,
        message: &[u8],
        cek: Option<&[u8]>,
        decoders: &[&dyn RecipientDecoder],
        external_aad: &[u8],
        detached_ciphertext: Option<&[u8]>,
        params: &mut ParamPool,
        plaintext_out: &'o mut [u8],
    ) -> Result<(&'o [u8], MessageType)> {
        let top = SequenceBuffer::new(message).into_iter().next().ok_or(CoseError::CborShape)?;
        let (tag, body_arr) = match top {
            CBOR::Tag(t) => {
                let tag = t.get_tag();
                let arr = t.item::<ArrayBuf>().map_err(|_| CoseError::CborShape)?;
                (Some(tag), arr)
            }
            CBOR::Array(arr) => (None, arr),
            _ => return Err(CoseError::CborShape),
        };
        let message_type = resolve_message_type(options.message_type, tag)?;

        let expected_len = match message_type {
            MessageType::Encrypt0 => 3,
            MessageType::Encrypt => 4,
            MessageType::Unspecified => unreachable!("resolved above"),
        };
        if body_arr.len() != expected_len {
            return Err(CoseError::CborShape);
        }

        let protected_bytes =
            body_arr.item::<&[u8]>(0).map_err(|_| CoseError::CborShape)?;
        let unprotected = body_arr.item::<MapBuf>(1).map_err(|_| CoseError::CborShape)?;
        header::decode_headers(protected_bytes, unprotected, Location::BODY, params)?;

        let ciphertext = match read_ciphertext_field(&body_arr)? {
            Some(bytes) => bytes,
            None => detached_ciphertext.ok_or(CoseError::CborShape)?,
        };

        let cek = match message_type {
            MessageType::Encrypt0 => {
                let bytes = cek.ok_or(CoseError::NoCek)?;
                Cek::new(bytes)?
            }
            MessageType::Encrypt => match cek {
                Some(bytes) => Cek::new(bytes)?,
                None => {
                    let recipients =
                        body_arr.item::<ArrayBuf>(3).map_err(|_| CoseError::CborShape)?;
                    scan_recipients(recipients, decoders)?
                }
            },
            MessageType::Unspecified => unreachable!("resolved above"),
        };

        let body_alg = params
            .find_int(Location::BODY, header::LABEL_ALG)
            .ok_or(CoseError::NoAlgId)? as crate::alg::Alg;
        let iv = params
            .find_bytes(Location::BODY, header::LABEL_IV)
            .ok_or(CoseError::BadIv)?;
        let nonce_len = alg::nonce_len(body_alg)?;
        if iv.len() != nonce_len {
            return Err(CoseError::BadIv);
        }

        let is_aead = alg::is_aead(body_alg);
        if !is_aead {
            if alg::is_non_aead(body_alg) {
                if !options.enable_non_aead {
                    return Err(CoseError::NonAeadDisabled);
                }
            } else {
                return Err(CoseError::UnsupportedEncryptionAlg);
            }
        }

        let key = self.primitive.sym_key_import(body_alg, cek.as_slice())?;
        let context = match message_type {
            MessageType::Encrypt0 => CONTEXT_ENCRYPT0,
            MessageType::Encrypt => CONTEXT_ENCRYPT,
            MessageType::Unspecified => unreachable!("resolved above"),
        };

        let plaintext = if is_aead {
            let mut aad_scratch = [0u8; DEFAULT_ENC_STRUCT_LEN];
            let aad = enc_structure::build(context, protected_bytes, external_aad, &mut aad_scratch)?;
            self.primitive.aead_decrypt(body_alg, &key, iv, aad, ciphertext, plaintext_out)?
        } else {
            self.primitive.non_aead_decrypt(body_alg, &key, iv, ciphertext, plaintext_out)?
        };

        Ok((plaintext, message_type))
    }
}
