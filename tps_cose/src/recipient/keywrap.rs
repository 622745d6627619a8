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
 * AES Key Wrap recipient (RFC 3394, alg labels -3/-4/-5)
 *
 * Wraps the CEK under a pre-shared KEK. If no CEK has been fixed yet when this recipient is asked
 * to encode, it generates one itself via the primitive shim's RNG, sized for the body algorithm -
 * any recipient can be first in a multi-recipient message.
 **************************************************************************************************/
use tps_minicbor::encoder::EncodeBuffer;

use crate::alg::{self, Alg};
use crate::error::{CoseError, Result};
use crate::header::{self, Location, ParamPool};
use crate::primitive::PrimitiveCrypto;
use crate::recipient::{Cek, RecipientDecoder, RecipientEncoder, RecipientOutcome};

/// An AES Key Wrap recipient identified by `kid`, wrapping under `kek`.
pub struct KeyWrapRecipient<'a, P: PrimitiveCrypto> {
    kid: &'a [u8],
    kek: P::SymKey,
    alg: Alg,
    primitive: &'a P,
}

impl<'a, P: PrimitiveCrypto> KeyWrapRecipient<'a, P> {
    /// Construct a key-wrap recipient. `alg` must be one of [`alg::A128KW`], [`alg::A192KW`] or
    /// [`alg::A256KW`] and must match the length of `kek`.
    pub fn new(kid: &'a [u8], kek: P::SymKey, alg: Alg, primitive: &'a P) -> Result<Self> {
        if !alg::is_aes_kw(alg) {
            return Err(CoseError::UnsupportedKeyDistributionAlg);
        }
        Ok(KeyWrapRecipient { kid, kek, alg, primitive })
    }
}

impl<'a, P: PrimitiveCrypto> RecipientEncoder for KeyWrapRecipient<'a, P> {
    fn alg(&self) -> Alg {
        self.alg
    }

    fn emit_for_encode<'f, 'buf>(
        &self,
        cek_plain: Option<&[u8]>,
        body_alg: Alg,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<(&'f mut EncodeBuffer<'buf>, Cek), CoseError> {
        let mut generated = [0u8; crate::recipient::MAX_CEK_LEN];
        let cek_bytes: &[u8] = match cek_plain {
            Some(bytes) => bytes,
            None => {
                let len = alg::cek_len(body_alg)?;
                self.primitive.rng(&mut generated[..len])?;
                &generated[..len]
            }
        };

        let alg_param = header::make_int(header::LABEL_ALG, true, Location::BODY, self.alg as i64);
        let params = [alg_param];
        let mut protected_bytes = [0u8; 16];
        let n = header::encode_protected(&params, Location::BODY, &mut protected_bytes)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        let kid_param = header::make_bstr(header::LABEL_KID, false, Location::BODY, self.kid);
        let unprotected = [kid_param];

        let mut wrapped = [0u8; crate::recipient::MAX_CEK_LEN + 8];
        let wrapped_bytes = self.primitive.kw_wrap(&self.kek, cek_bytes, &mut wrapped)?;

        let buf = buf
            .insert(&protected_bytes[..n])
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        header::encode_unprotected(&unprotected, Location::BODY, buf)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        let buf = buf
            .insert(&wrapped_bytes)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;

        let cek = Cek::new(cek_bytes)?;
        Ok((buf, cek))
    }
}

impl<'a, P: PrimitiveCrypto> RecipientDecoder for KeyWrapRecipient<'a, P> {
    fn try_decode(
        &self,
        params: &ParamPool,
        loc: Location,
        _protected_bytes: &[u8],
        ciphertext: Option<&[u8]>,
    ) -> RecipientOutcome {
        let alg_val = match params.find_int(loc, header::LABEL_ALG) {
            Some(v) => v,
            None => return RecipientOutcome::Fatal(CoseError::NoAlgId),
        };
        if alg_val != self.alg as i64 {
            return RecipientOutcome::Decline;
        }
        if let Some(kid) = params.find_bytes(loc, header::LABEL_KID) {
            if kid != self.kid {
                return RecipientOutcome::Decline;
            }
        }
        let wrapped = match ciphertext {
            Some(bytes) => bytes,
            None => return RecipientOutcome::Fatal(CoseError::RecipientFormat),
        };
        let mut out = [0u8; crate::recipient::MAX_CEK_LEN];
        match self.primitive.kw_unwrap(&self.kek, wrapped, &mut out) {
            Ok(plain) => match Cek::new(plain) {
                Ok(cek) => RecipientOutcome::Success(cek),
                Err(e) => RecipientOutcome::Fatal(e),
            },
            Err(e) => RecipientOutcome::Fatal(e),
        }
    }
}
