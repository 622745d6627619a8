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
 * Direct recipient (alg `direct`, label -6)
 *
 * The pre-shared key itself is used as the CEK; there is no wrapped-key material, so the
 * `COSE_Recipient`'s body byte string is empty. A direct recipient is the one strategy that
 * *produces* the CEK rather than wrapping one handed to it - it fails if some earlier recipient
 * already fixed a different CEK, since there is only ever one key in play.
 **************************************************************************************************/
use tps_minicbor::encoder::EncodeBuffer;

use crate::alg::{self, Alg};
use crate::error::CoseError;
use crate::header::{self, Location, ParamPool};
use crate::recipient::{Cek, RecipientDecoder, RecipientEncoder, RecipientOutcome};

/// A direct recipient identified by `kid`, holding the pre-shared key it names.
pub struct DirectRecipient<'a> {
    kid: &'a [u8],
    key: &'a [u8],
}

impl<'a> DirectRecipient<'a> {
    /// Construct a direct recipient naming `key` via `kid`.
    pub fn new(kid: &'a [u8], key: &'a [u8]) -> Self {
        DirectRecipient { kid, key }
    }
}

impl<'a> RecipientEncoder for DirectRecipient<'a> {
    fn alg(&self) -> Alg {
        alg::DIRECT
    }

    fn emit_for_encode<'f, 'buf>(
        &self,
        cek_plain: Option<&[u8]>,
        _body_alg: Alg,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> Result<(&'f mut EncodeBuffer<'buf>, Cek), CoseError> {
        if cek_plain.is_some() {
            return Err(CoseError::NoCek);
        }
        let alg_param =
            header::make_int(header::LABEL_ALG, true, Location::BODY, self.alg() as i64);
        let params = [alg_param];
        let mut protected_bytes = [0u8; 16];
        let n = header::encode_protected(&params, Location::BODY, &mut protected_bytes)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        let kid_param = header::make_bstr(header::LABEL_KID, false, Location::BODY, self.kid);
        let unprotected = [kid_param];

        let buf = buf
            .insert(&protected_bytes[..n])
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        header::encode_unprotected(&unprotected, Location::BODY, buf)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        let empty: &[u8] = &[];
        let buf = buf.insert(&empty).map_err(|_| CoseError::OutputBufferTooSmall)?;

        let cek = Cek::new(self.key)?;
        Ok((buf, cek))
    }
}

impl<'a> RecipientDecoder for DirectRecipient<'a> {
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
        if alg_val != alg::DIRECT as i64 {
            return RecipientOutcome::Decline;
        }
        if let Some(kid) = params.find_bytes(loc, header::LABEL_KID) {
            if kid != self.kid {
                return RecipientOutcome::Decline;
            }
        }
        if ciphertext.map(|c| !c.is_empty()).unwrap_or(false) {
            return RecipientOutcome::Fatal(CoseError::RecipientFormat);
        }
        match Cek::new(self.key) {
            Ok(cek) => RecipientOutcome::Success(cek),
            Err(e) => RecipientOutcome::Fatal(e),
        }
    }
}
