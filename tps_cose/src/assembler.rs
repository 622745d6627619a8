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
 * Body assembler
 *
 * `Encrypt0Assembler` and `EncryptAssembler` both walk the same sequence - pick an algorithm,
 * decide where it goes (protected header for AEAD, unprotected for non-AEAD, since the algorithm
 * itself is then outside the AEAD's own authentication scope), emit a fresh IV, fix the CEK,
 * build the Enc_structure AAD and encrypt - but disagree about where the CEK comes from and
 * whether a `recipients` array follows. Modelling that as two types rather than one runtime flag
 * means a caller cannot construct a `COSE_Encrypt0` with a non-empty recipient array, or a
 * `COSE_Encrypt` with none, by construction rather than by a check this module would otherwise
 * have to perform and fail at run time.
 *
 * `EncryptAssembler` has to encode every `COSE_Recipient` entry before it knows the final
 * `COSE_Encrypt` byte layout, because the CEK that entry wraps is the same one that encrypts the
 * body, and the body is written before the recipients array on the wire. Each recipient's own
 * `COSE_Recipient` array is therefore encoded once into a caller-supplied scratch region, and the
 * resulting bytes are copied verbatim into the final message once the body has been encrypted.
 **************************************************************************************************/
use tps_minicbor::encoder::{CBORBuilder, EncodeBuffer, EncodeContext};
use tps_minicbor::error::CBORError;
use tps_minicbor::types::{array, tag};

use crate::alg::{self, Alg};
use crate::enc_structure::{self, CONTEXT_ENCRYPT, CONTEXT_ENCRYPT0, DEFAULT_ENC_STRUCT_LEN};
use crate::error::{CoseError, Result};
use crate::header::{self, Location, Param};
use crate::primitive::PrimitiveCrypto;
use crate::recipient::{Cek, RecipientEncoder, MAX_CEK_LEN, MAX_RECIPIENTS};

/// Wire tag for `COSE_Encrypt0` (RFC 9052 §2).
pub const TAG_ENCRYPT0: u64 = 16;
/// Wire tag for `COSE_Encrypt` (RFC 9052 §4).
pub const TAG_ENCRYPT: u64 = 96;

const MAX_BODY_PARAMS: usize = header::MAX_PARAMS;

/// Upper bound on an AEAD tag's length, used to size scratch ciphertext buffers.
const MAX_AEAD_TAG_LEN: usize = 16;

fn build_body_params<'a>(
    body_alg: Alg,
    is_aead: bool,
    iv: &'a [u8],
    storage: &mut [Param<'a>; MAX_BODY_PARAMS],
) -> usize {
    storage[0] = header::make_int(header::LABEL_ALG, is_aead, Location::BODY, body_alg as i64);
    storage[1] = header::make_bstr(header::LABEL_IV, false, Location::BODY, iv);
    2
}

struct BodyEncryptOutput<'o> {
    protected: &'o [u8],
    iv_len: usize,
    ciphertext_len: usize,
    is_aead: bool,
}

/// Validate `body_alg` against `enable_non_aead`, draw an IV, emit the body's protected header
/// bytes and run AEAD or non-AEAD encryption. Writes the IV into `iv_out` and the ciphertext
/// (with AEAD tag, where applicable) into `ciphertext_out`, returning the lengths actually used.
#[allow(clippy::too_many_arguments)]
fn encrypt_body<'o, P: PrimitiveCrypto>(
    primitive: &P,
    body_alg: Alg,
    enable_non_aead: bool,
    cek: &Cek,
    external_aad: &[u8],
    plaintext: &[u8],
    context: &str,
    protected_out: &'o mut [u8],
    iv_out: &'o mut [u8],
    ciphertext_out: &'o mut [u8],
) -> Result<BodyEncryptOutput<'o>> {
    let is_aead = alg::is_aead(body_alg);
    if !is_aead {
        if alg::is_non_aead(body_alg) {
            if !enable_non_aead {
                return Err(CoseError::NonAeadDisabled);
            }
        } else {
            return Err(CoseError::UnsupportedEncryptionAlg);
        }
    }

    let nonce_len = alg::nonce_len(body_alg)?;
    if iv_out.len() < nonce_len {
        return Err(CoseError::OutputBufferTooSmall);
    }
    primitive.rng(&mut iv_out[..nonce_len])?;

    let mut storage = [header::make_int(0, false, Location::BODY, 0); MAX_BODY_PARAMS];
    let n = build_body_params(body_alg, is_aead, &iv_out[..nonce_len], &mut storage);
    let params = &storage[..n];

    let protected_len = header::encode_protected(params, Location::BODY, protected_out)?;
    let protected = &protected_out[..protected_len];

    let key = primitive.sym_key_import(body_alg, cek.as_slice())?;

    let ciphertext_len = if is_aead {
        let mut aad_scratch = [0u8; DEFAULT_ENC_STRUCT_LEN];
        let aad = enc_structure::build(context, protected, external_aad, &mut aad_scratch)?;
        primitive
            .aead_encrypt(body_alg, &key, &iv_out[..nonce_len], aad, plaintext, ciphertext_out)?
            .len()
    } else {
        primitive
            .non_aead_encrypt(body_alg, &key, &iv_out[..nonce_len], plaintext, ciphertext_out)?
            .len()
    };

    Ok(BodyEncryptOutput { protected, iv_len: nonce_len, ciphertext_len, is_aead })
}

/// Write the three- (or four-, for `COSE_Encrypt`) element message array: protected bstr,
/// unprotected map, ciphertext bstr (or CBOR `null` if the ciphertext travels detached), and
/// optionally the recipients array.
fn write_message<'f, 'buf>(
    buf: &'f mut EncodeBuffer<'buf>,
    protected: &[u8],
    unprotected_params: &[Param],
    ciphertext: Option<&[u8]>,
    recipients_bytes: Option<&[(usize, usize)]>,
    recipient_scratch: &[u8],
) -> tps_minicbor::error::Result<&'f mut EncodeBuffer<'buf>> {
    buf.insert(&array(|b| {
        let b = b.insert(&protected)?;
        header::encode_unprotected(unprotected_params, Location::BODY, b)
            .map_err(|_| CBORError::EndOfBuffer)?;
        let b = match ciphertext {
            Some(bytes) => b.insert(&bytes)?,
            None => b.insert(&())?,
        };
        match recipients_bytes {
            Some(spans) => b.insert(&array(|rb| {
                let mut rb = rb;
                for (start, end) in spans {
                    rb = rb.insert_cbor(&recipient_scratch[*start..*end])?;
                }
                Ok(rb)
            })),
            None => Ok(b),
        }
    }))
}

/// Assembles `COSE_Encrypt0` messages: no recipient list, the caller always supplies the CEK.
pub struct Encrypt0Assembler<'a, P: PrimitiveCrypto> {
    primitive: &'a P,
}

impl<'a, P: PrimitiveCrypto> Encrypt0Assembler<'a, P> {
    pub fn new(primitive: &'a P) -> Self {
        Encrypt0Assembler { primitive }
    }

    /// Encrypt `plaintext` under the caller-supplied `cek`, writing a tagged `COSE_Encrypt0`
    /// message into `out`. `extra_unprotected` carries caller parameters such as `content-type`
    /// (RFC 9052 §3 places `content-type` in the unprotected map here, per this crate's design
    /// note resolving that open question).
    pub fn encrypt<'o>(
        &self,
        body_alg: Alg,
        enable_non_aead: bool,
        cek: &[u8],
        external_aad: &[u8],
        plaintext: &[u8],
        extra_unprotected: &[Param],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        let cek = Cek::new(cek)?;
        let mut protected_buf = [0u8; 32];
        let mut iv_buf = [0u8; 16];
        let mut ciphertext_buf = [0u8; 288];
        if plaintext.len() + MAX_AEAD_TAG_LEN > ciphertext_buf.len() {
            return Err(CoseError::OutputBufferTooSmall);
        }

        let body = encrypt_body(
            self.primitive,
            body_alg,
            enable_non_aead,
            &cek,
            external_aad,
            plaintext,
            CONTEXT_ENCRYPT0,
            &mut protected_buf,
            &mut iv_buf,
            &mut ciphertext_buf,
        )?;
        let protected_len = body.protected.len();
        let iv_len = body.iv_len;
        let ciphertext_len = body.ciphertext_len;
        let is_aead = body.is_aead;

        let alg_unprotected_count = if is_aead { 0 } else { 1 };
        if extra_unprotected.len() + 1 + alg_unprotected_count > MAX_BODY_PARAMS {
            return Err(CoseError::TooManyParameters);
        }
        let mut unprotected_storage =
            [header::make_bstr(header::LABEL_IV, false, Location::BODY, &iv_buf[..iv_len]);
                MAX_BODY_PARAMS];
        let mut n = 1;
        if !is_aead {
            unprotected_storage[n] =
                header::make_int(header::LABEL_ALG, false, Location::BODY, body_alg as i64);
            n += 1;
        }
        for p in extra_unprotected {
            unprotected_storage[n] = *p;
            n += 1;
        }

        let protected = &protected_buf[..protected_len];
        let ciphertext = &ciphertext_buf[..ciphertext_len];
        let mut builder = CBORBuilder::new(out);
        builder
            .insert(&tag(TAG_ENCRYPT0, |b| {
                write_message(b, protected, &unprotected_storage[..n], Some(ciphertext), None, &[])
            }))
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        builder.encoded().map_err(|_| CoseError::OutputBufferTooSmall)
    }

    /// As [`Self::encrypt`], but the ciphertext is written to `ciphertext_out` instead of the
    /// message, which carries a CBOR `null` in its place (RFC 9052 §4.3 step 8). The returned
    /// message and the returned ciphertext must both reach the recipient for decode to succeed.
    #[allow(clippy::too_many_arguments)]
    pub fn encrypt_detached<'o, 'c>(
        &self,
        body_alg: Alg,
        enable_non_aead: bool,
        cek: &[u8],
        external_aad: &[u8],
        plaintext: &[u8],
        extra_unprotected: &[Param],
        out: &'o mut [u8],
        ciphertext_out: &'c mut [u8],
    ) -> Result<(&'o [u8], &'c [u8])> {
        let cek = Cek::new(cek)?;
        let mut protected_buf = [0u8; 32];
        let mut iv_buf = [0u8; 16];
        let mut ciphertext_buf = [0u8; 288];
        if plaintext.len() + MAX_AEAD_TAG_LEN > ciphertext_buf.len() {
            return Err(CoseError::OutputBufferTooSmall);
        }

        let body = encrypt_body(
            self.primitive,
            body_alg,
            enable_non_aead,
            &cek,
            external_aad,
            plaintext,
            CONTEXT_ENCRYPT0,
            &mut protected_buf,
            &mut iv_buf,
            &mut ciphertext_buf,
        )?;
        let protected_len = body.protected.len();
        let iv_len = body.iv_len;
        let ciphertext_len = body.ciphertext_len;
        let is_aead = body.is_aead;

        if ciphertext_out.len() < ciphertext_len {
            return Err(CoseError::OutputBufferTooSmall);
        }
        ciphertext_out[..ciphertext_len].copy_from_slice(&ciphertext_buf[..ciphertext_len]);

        let alg_unprotected_count = if is_aead { 0 } else { 1 };
        if extra_unprotected.len() + 1 + alg_unprotected_count > MAX_BODY_PARAMS {
            return Err(CoseError::TooManyParameters);
        }
        let mut unprotected_storage =
            [header::make_bstr(header::LABEL_IV, false, Location::BODY, &iv_buf[..iv_len]);
                MAX_BODY_PARAMS];
        let mut n = 1;
        if !is_aead {
            unprotected_storage[n] =
                header::make_int(header::LABEL_ALG, false, Location::BODY, body_alg as i64);
            n += 1;
        }
        for p in extra_unprotected {
            unprotected_storage[n] = *p;
            n += 1;
        }

        let protected = &protected_buf[..protected_len];
        let mut builder = CBORBuilder::new(out);
        builder
            .insert(&tag(TAG_ENCRYPT0, |b| {
                write_message(b, protected, &unprotected_storage[..n], None, None, &[])
            }))
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        let message = builder.encoded().map_err(|_| CoseError::OutputBufferTooSmall)?;
        Ok((message, &ciphertext_out[..ciphertext_len]))
    }
}

/// Assembles `COSE_Encrypt` messages: at least one recipient, each of which either supplies the
/// CEK (a direct recipient) or wraps one generated here.
pub struct EncryptAssembler<'a, P: PrimitiveCrypto> {
    primitive: &'a P,
}

impl<'a, P: PrimitiveCrypto> EncryptAssembler<'a, P> {
    pub fn new(primitive: &'a P) -> Self {
        EncryptAssembler { primitive }
    }

    /// Encrypt `plaintext` for every recipient in `recipients` (at least one is required),
    /// writing a tagged `COSE_Encrypt` message into `out`. If no recipient fixes the CEK (every
    /// recipient is a key-wrap or ECDH-ES strategy, not `direct`), one is generated from the
    /// primitive's RNG before the first recipient is encoded. `recipient_scratch` holds every
    /// recipient's encoded `COSE_Recipient` array until the final message is assembled.
    #[allow(clippy::too_many_arguments)]
    pub fn encrypt<'o>(
        &self,
        body_alg: Alg,
        enable_non_aead: bool,
        recipients: &[&dyn RecipientEncoder],
        external_aad: &[u8],
        plaintext: &[u8],
        extra_unprotected: &[Param],
        out: &'o mut [u8],
        recipient_scratch: &mut [u8],
    ) -> Result<&'o [u8]> {
        if recipients.is_empty() {
            return Err(CoseError::NoCek);
        }
        if recipients.len() > MAX_RECIPIENTS {
            return Err(CoseError::TooManyParameters);
        }

        let mut cek_buf = [0u8; MAX_CEK_LEN];
        let mut cek_len = 0usize;
        let mut scratch_pos = 0usize;
        let mut spans: [(usize, usize); MAX_RECIPIENTS] = [(0, 0); MAX_RECIPIENTS];

        for (i, r) in recipients.iter().enumerate() {
            let cek_plain_buf = cek_buf;
            let cek_plain = if cek_len > 0 { Some(&cek_plain_buf[..cek_len]) } else { None };

            let mut ctx = EncodeContext::new();
            let cek = {
                let mut enc = EncodeBuffer::new(&mut recipient_scratch[scratch_pos..]);
                enc.array_start(&mut ctx).map_err(|_| CoseError::OutputBufferTooSmall)?;
                let (_, cek) = r.emit_for_encode(cek_plain, body_alg, &mut enc)?;
                enc.array_finalize(&ctx).map_err(|_| CoseError::OutputBufferTooSmall)?;
                let written = enc.len();
                spans[i] = (scratch_pos, scratch_pos + written);
                scratch_pos += written;
                cek
            };

            if cek_len == 0 {
                cek_len = cek.as_slice().len();
                cek_buf[..cek_len].copy_from_slice(cek.as_slice());
            }
        }

        let cek = Cek::new(&cek_buf[..cek_len])?;
        let mut protected_buf = [0u8; 32];
        let mut iv_buf = [0u8; 16];
        let mut ciphertext_buf = [0u8; 288];
        if plaintext.len() + MAX_AEAD_TAG_LEN > ciphertext_buf.len() {
            return Err(CoseError::OutputBufferTooSmall);
        }

        let body = encrypt_body(
            self.primitive,
            body_alg,
            enable_non_aead,
            &cek,
            external_aad,
            plaintext,
            CONTEXT_ENCRYPT,
            &mut protected_buf,
            &mut iv_buf,
            &mut ciphertext_buf,
        )?;
        let protected_len = body.protected.len();
        let iv_len = body.iv_len;
        let ciphertext_len = body.ciphertext_len;
        let is_aead = body.is_aead;

        let alg_unprotected_count = if is_aead { 0 } else { 1 };
        if extra_unprotected.len() + 1 + alg_unprotected_count > MAX_BODY_PARAMS {
            return Err(CoseError::TooManyParameters);
        }
        let mut unprotected_storage =
            [header::make_bstr(header::LABEL_IV, false, Location::BODY, &iv_buf[..iv_len]);
                MAX_BODY_PARAMS];
        let mut n = 1;
        if !is_aead {
            unprotected_storage[n] =
                header::make_int(header::LABEL_ALG, false, Location::BODY, body_alg as i64);
            n += 1;
        }
        for p in extra_unprotected {
            unprotected_storage[n] = *p;
            n += 1;
        }

        let protected = &protected_buf[..protected_len];
        let ciphertext = &ciphertext_buf[..ciphertext_len];
        let used_spans = &spans[..recipients.len()];

        let mut builder = CBORBuilder::new(out);
        builder
            .insert(&tag(TAG_ENCRYPT, |b| {
                write_message(
                    b,
                    protected,
                    &unprotected_storage[..n],
                    Some(ciphertext),
                    Some(used_spans),
                    recipient_scratch,
                )
            }))
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        builder.encoded().map_err(|_| CoseError::OutputBufferTooSmall)
    }

    /// As [`Self::encrypt`], but the ciphertext is written to `ciphertext_out` instead of the
    /// message, which carries a CBOR `null` in its place (RFC 9052 §4.3 step 8). The returned
    /// message and the returned ciphertext must both reach the recipient for decode to succeed.
    #[allow(clippy::too_many_arguments)]
    pub fn encrypt_detached<'o, 'c>(
        &self,
        body_alg: Alg,
        enable_non_aead: bool,
        recipients: &[&dyn RecipientEncoder],
        external_aad: &[u8],
        plaintext: &[u8],
        extra_unprotected: &[Param],
        out: &'o mut [u8],
        ciphertext_out: &'c mut [u8],
        recipient_scratch: &mut [u8],
    ) -> Result<(&'o [u8], &'c [u8])> {
        if recipients.is_empty() {
            return Err(CoseError::NoCek);
        }
        if recipients.len() > MAX_RECIPIENTS {
            return Err(CoseError::TooManyParameters);
        }

        let mut cek_buf = [0u8; MAX_CEK_LEN];
        let mut cek_len = 0usize;
        let mut scratch_pos = 0usize;
        let mut spans: [(usize, usize); MAX_RECIPIENTS] = [(0, 0); MAX_RECIPIENTS];

        for (i, r) in recipients.iter().enumerate() {
            let cek_plain_buf = cek_buf;
            let cek_plain = if cek_len > 0 { Some(&cek_plain_buf[..cek_len]) } else { None };

            let mut ctx = EncodeContext::new();
            let cek = {
                let mut enc = EncodeBuffer::new(&mut recipient_scratch[scratch_pos..]);
                enc.array_start(&mut ctx).map_err(|_| CoseError::OutputBufferTooSmall)?;
                let (_, cek) = r.emit_for_encode(cek_plain, body_alg, &mut enc)?;
                enc.array_finalize(&ctx).map_err(|_| CoseError::OutputBufferTooSmall)?;
                let written = enc.len();
                spans[i] = (scratch_pos, scratch_pos + written);
                scratch_pos += written;
                cek
            };

            if cek_len == 0 {
                cek_len = cek.as_slice().len();
                cek_buf[..cek_len].copy_from_slice(cek.as_slice());
            }
        }

        let cek = Cek::new(&cek_buf[..cek_len])?;
        let mut protected_buf = [0u8; 32];
        let mut iv_buf = [0u8; 16];
        let mut ciphertext_buf = [0u8; 288];
        if plaintext.len() + MAX_AEAD_TAG_LEN > ciphertext_buf.len() {
            return Err(CoseError::OutputBufferTooSmall);
        }

        let body = encrypt_body(
            self.primitive,
            body_alg,
            enable_non_aead,
            &cek,
            external_aad,
            plaintext,
            CONTEXT_ENCRYPT,
            &mut protected_buf,
            &mut iv_buf,
            &mut ciphertext_buf,
        )?;
        let protected_len = body.protected.len();
        let iv_len = body.iv_len;
        let ciphertext_len = body.ciphertext_len;
        let is_aead = body.is_aead;

        if ciphertext_out.len() < ciphertext_len {
            return Err(CoseError::OutputBufferTooSmall);
        }
        ciphertext_out[..ciphertext_len].copy_from_slice(&ciphertext_buf[..ciphertext_len]);

        let alg_unprotected_count = if is_aead { 0 } else { 1 };
        if extra_unprotected.len() + 1 + alg_unprotected_count > MAX_BODY_PARAMS {
            return Err(CoseError::TooManyParameters);
        }
        let mut unprotected_storage =
            [header::make_bstr(header::LABEL_IV, false, Location::BODY, &iv_buf[..iv_len]);
                MAX_BODY_PARAMS];
        let mut n = 1;
        if !is_aead {
            unprotected_storage[n] =
                header::make_int(header::LABEL_ALG, false, Location::BODY, body_alg as i64);
            n += 1;
        }
        for p in extra_unprotected {
            unprotected_storage[n] = *p;
            n += 1;
        }

        let protected = &protected_buf[..protected_len];
        let used_spans = &spans[..recipients.len()];

        let mut builder = CBORBuilder::new(out);
        builder
            .insert(&tag(TAG_ENCRYPT, |b| {
                write_message(
                    b,
                    protected,
                    &unprotected_storage[..n],
                    None,
                    Some(used_spans),
                    recipient_scratch,
                )
            }))
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        let message = builder.encoded().map_err(|_| CoseError::OutputBufferTooSmall)?;
        Ok((message, &ciphertext_out[..ciphertext_len]))
    }
}
