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
 * ECDH-ES + AES Key Wrap recipient (alg labels -29/-30/-31)
 *
 * The hardest single component: generate an ephemeral EC key pair, run ECDH against the
 * recipient's static public key, derive a key-encryption key from the shared secret with
 * HKDF-SHA-256 over a COSE KDF Context, then AES Key Wrap the CEK under that KEK. The ephemeral
 * public key travels in the `COSE_Recipient`'s unprotected header as a `COSE_Key`; everything else
 * needed to reconstruct the same KDF context on the decode side (the recipient's own protected
 * header bytes, PartyU/PartyV, salt) is either already on the wire or fixed out of band.
 *
 * One type serves both roles rather than splitting into sender/receiver types: the sender holds
 * the peer's static public key, the receiver holds its own static private key, and each trait
 * impl declines (decode) or fails (encode) if the role it needs was not supplied.
 **************************************************************************************************/
use core::convert::TryFrom;

use tps_minicbor::decoder::MapBuf;
use tps_minicbor::encoder::EncodeBuffer;
use tps_minicbor::types::{map, CBOR};

use crate::alg::{self, Alg};
use crate::buffer::ByteView;
use crate::error::{CoseError, Result};
use crate::header::{self, Location, Param, ParamPool};
use crate::kdf_context::{self, PartyInfo};
use crate::primitive::{Curve, EcPoint, PrimitiveCrypto};
use crate::recipient::{Cek, RecipientDecoder, RecipientEncoder, RecipientOutcome};

/// Coordinate width of a P-256 field element.
const P256_COORD_LEN: usize = 32;

/// COSE_Key `kty` value for EC2 keys.
const COSE_KTY_EC2: i64 = 2;
/// COSE_Key label for `kty`.
const COSE_KEY_KTY: i64 = 1;
/// COSE_Key label for `crv`.
const COSE_KEY_CRV: i64 = -1;
/// COSE_Key label for `x`.
const COSE_KEY_X: i64 = -2;
/// COSE_Key label for `y`.
const COSE_KEY_Y: i64 = -3;
/// COSE EC2 curve identifier for P-256.
const COSE_CURVE_P256: i64 = 1;

/// An ECDH-ES + AES Key Wrap recipient. Construct with [`EsdhRecipient::for_encode`] to protect a
/// CEK for a known recipient public key, or [`EsdhRecipient::for_decode`] to recover a CEK using
/// this side's own static private key.
pub struct EsdhRecipient<'a, P: PrimitiveCrypto> {
    kid: &'a [u8],
    alg: Alg,
    party_u: PartyInfo<'a>,
    party_v: PartyInfo<'a>,
    salt: Option<&'a [u8]>,
    peer_public: Option<P::EcPublicKey>,
    own_private: Option<P::EcPrivateKey>,
    primitive: &'a P,
}

impl<'a, P: PrimitiveCrypto> EsdhRecipient<'a, P> {
    /// A recipient ready to protect a CEK for `peer_public`.
    #[allow(clippy::too_many_arguments)]
    pub fn for_encode(
        kid: &'a [u8],
        alg: Alg,
        party_u: PartyInfo<'a>,
        party_v: PartyInfo<'a>,
        salt: Option<&'a [u8]>,
        peer_public: P::EcPublicKey,
        primitive: &'a P,
    ) -> Result<Self> {
        if !alg::is_ecdh_es_kw(alg) {
            return Err(CoseError::UnsupportedKeyDistributionAlg);
        }
        Ok(EsdhRecipient {
            kid,
            alg,
            party_u,
            party_v,
            salt,
            peer_public: Some(peer_public),
            own_private: None,
            primitive,
        })
    }

    /// A recipient ready to recover a CEK using `own_private`.
    #[allow(clippy::too_many_arguments)]
    pub fn for_decode(
        kid: &'a [u8],
        alg: Alg,
        party_u: PartyInfo<'a>,
        party_v: PartyInfo<'a>,
        salt: Option<&'a [u8]>,
        own_private: P::EcPrivateKey,
        primitive: &'a P,
    ) -> Result<Self> {
        if !alg::is_ecdh_es_kw(alg) {
            return Err(CoseError::UnsupportedKeyDistributionAlg);
        }
        Ok(EsdhRecipient {
            kid,
            alg,
            party_u,
            party_v,
            salt,
            peer_public: None,
            own_private: Some(own_private),
            primitive,
        })
    }

    /// Derive the AES-KW key-encryption-key from an ECDH shared secret `z`, over the KDF context
    /// built from this recipient's own protected header bytes and the given PartyU/PartyV/salt
    /// (the caller-supplied values on the encode side, the wire-decoded-or-overridden values on
    /// the decode side).
    fn derive_kek_with(
        &self,
        z: &[u8],
        protected_bytes: &[u8],
        party_u: &PartyInfo,
        party_v: &PartyInfo,
        salt: Option<&[u8]>,
    ) -> Result<P::SymKey> {
        let kw_alg = alg::aes_kw_equivalent(self.alg)?;
        let kek_len = alg::kw_key_len(self.alg)?;

        let mut ctx_scratch = [0u8; kdf_context::DEFAULT_KDF_CONTEXT_LEN];
        let ctx = kdf_context::build(
            self.alg as i64,
            party_u,
            party_v,
            (kek_len * 8) as u64,
            protected_bytes,
            &mut ctx_scratch,
        )?;

        let mut kek_bytes = [0u8; 32];
        let kek_slice = self.primitive.hkdf(salt, z, ctx, &mut kek_bytes[..kek_len])?;
        self.primitive
            .sym_key_import(kw_alg, kek_slice)
            .map_err(|_| CoseError::KeyImportFailed)
    }


    fn encode_protected(&self) -> Result<([u8; 16], usize)> {
        let alg_param = header::make_int(header::LABEL_ALG, true, Location::BODY, self.alg as i64);
        let params = [alg_param];
        let mut protected_bytes = [0u8; 16];
        let n = header::encode_protected(&params, Location::BODY, &mut protected_bytes)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        Ok((protected_bytes, n))
    }
}

fn encode_ephemeral_key<'f, 'buf>(
    buf: &'f mut EncodeBuffer<'buf>,
    x: &[u8],
    y: &[u8],
) -> tps_minicbor::error::Result<()> {
    buf.insert(&map(|m| {
        let m = m.insert(&COSE_KEY_KTY)?.insert(&COSE_KTY_EC2)?;
        let m = m.insert(&COSE_KEY_CRV)?.insert(&COSE_CURVE_P256)?;
        let m = m.insert(&COSE_KEY_X)?.insert(&x)?;
        m.insert(&COSE_KEY_Y)?.insert(&y)
    }))?;
    Ok(())
}

impl<'a, P: PrimitiveCrypto> RecipientEncoder for EsdhRecipient<'a, P> {
    fn alg(&self) -> Alg {
        self.alg
    }

    fn emit_for_encode<'f, 'buf>(
        &self,
        cek_plain: Option<&[u8]>,
        body_alg: Alg,
        buf: &'f mut EncodeBuffer<'buf>,
    ) -> core::result::Result<(&'f mut EncodeBuffer<'buf>, Cek), CoseError> {
        let peer_public = self.peer_public.as_ref().ok_or(CoseError::Fail)?;

        let mut generated = [0u8; crate::recipient::MAX_CEK_LEN];
        let cek_bytes: &[u8] = match cek_plain {
            Some(bytes) => bytes,
            None => {
                let len = alg::cek_len(body_alg)?;
                self.primitive.rng(&mut generated[..len])?;
                &generated[..len]
            }
        };

        let (eph_priv, eph_pub) = self.primitive.ec_key_generate(Curve::P256)?;
        let mut x_buf = [0u8; P256_COORD_LEN];
        let mut y_buf = [0u8; P256_COORD_LEN];
        let (x, y) = self
            .primitive
            .ec_key_export_public(&eph_pub, &mut x_buf, &mut y_buf)?;

        let mut z_buf = [0u8; P256_COORD_LEN];
        let z = self.primitive.ecdh(&eph_priv, peer_public, &mut z_buf)?;

        let (protected_bytes, n) = self.encode_protected()?;
        let kek =
            self.derive_kek_with(z, &protected_bytes[..n], &self.party_u, &self.party_v, self.salt)?;

        let kid_param = header::make_bstr(header::LABEL_KID, false, Location::BODY, self.kid);
        let eph_closure = |b: &mut EncodeBuffer| encode_ephemeral_key(b, x, y);
        let eph_param =
            header::make_callback(header::LABEL_EPHEMERAL_KEY, false, Location::BODY, &eph_closure);

        // Ephemeral key is mandatory; kid, salt and PartyU/PartyV fields are each emitted only
        // when present, so a recipient built with `PartyInfo::none()` produces the same minimal
        // header a plain ECDH-ES-only peer would expect.
        let mut unprotected_params: [Param; 9] = [eph_param; 9];
        let mut n_unprotected = 0usize;
        if !self.kid.is_empty() {
            unprotected_params[n_unprotected] = kid_param;
            n_unprotected += 1;
        }
        unprotected_params[n_unprotected] = eph_param;
        n_unprotected += 1;
        if let Some(salt) = self.salt {
            unprotected_params[n_unprotected] =
                header::make_bstr(header::LABEL_SALT, false, Location::BODY, salt);
            n_unprotected += 1;
        }
        if let Some(identity) = self.party_u.identity.bytes() {
            unprotected_params[n_unprotected] =
                header::make_bstr(header::LABEL_PARTY_U_ID, false, Location::BODY, identity);
            n_unprotected += 1;
        }
        if let Some(nonce) = self.party_u.nonce.bytes() {
            unprotected_params[n_unprotected] =
                header::make_bstr(header::LABEL_PARTY_U_NONCE, false, Location::BODY, nonce);
            n_unprotected += 1;
        }
        if let Some(other) = self.party_u.other.bytes() {
            unprotected_params[n_unprotected] =
                header::make_bstr(header::LABEL_PARTY_U_OTHER, false, Location::BODY, other);
            n_unprotected += 1;
        }
        if let Some(identity) = self.party_v.identity.bytes() {
            unprotected_params[n_unprotected] =
                header::make_bstr(header::LABEL_PARTY_V_ID, false, Location::BODY, identity);
            n_unprotected += 1;
        }
        if let Some(nonce) = self.party_v.nonce.bytes() {
            unprotected_params[n_unprotected] =
                header::make_bstr(header::LABEL_PARTY_V_NONCE, false, Location::BODY, nonce);
            n_unprotected += 1;
        }
        if let Some(other) = self.party_v.other.bytes() {
            unprotected_params[n_unprotected] =
                header::make_bstr(header::LABEL_PARTY_V_OTHER, false, Location::BODY, other);
            n_unprotected += 1;
        }

        let mut wrapped = [0u8; crate::recipient::MAX_CEK_LEN + 8];
        let wrapped_bytes = self.primitive.kw_wrap(&kek, cek_bytes, &mut wrapped)?;

        let buf = buf
            .insert(&protected_bytes[..n])
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        header::encode_unprotected(&unprotected_params[..n_unprotected], Location::BODY, buf)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;
        let buf = buf
            .insert(&wrapped_bytes)
            .map_err(|_| CoseError::OutputBufferTooSmall)?;

        let cek = Cek::new(cek_bytes)?;
        Ok((buf, cek))
    }
}

impl<'a, P: PrimitiveCrypto> RecipientDecoder for EsdhRecipient<'a, P> {
    fn try_decode(
        &self,
        params: &ParamPool,
        loc: Location,
        protected_bytes: &[u8],
        ciphertext: Option<&[u8]>,
    ) -> RecipientOutcome {
        let own_private = match self.own_private.as_ref() {
            Some(k) => k,
            None => return RecipientOutcome::Decline,
        };
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

        let eph_key_cbor = match params.find_raw(loc, header::LABEL_EPHEMERAL_KEY) {
            Some(v) => v,
            None => return RecipientOutcome::Fatal(CoseError::RecipientFormat),
        };
        let eph_map = match MapBuf::try_from(eph_key_cbor) {
            Ok(m) => m,
            Err(_) => return RecipientOutcome::Fatal(CoseError::RecipientFormat),
        };
        let (x, y) = match (eph_map.get_int(COSE_KEY_X), eph_map.get_int(COSE_KEY_Y)) {
            (Some(CBOR::Bstr(x)), Some(CBOR::Bstr(y))) => (x, y),
            _ => return RecipientOutcome::Fatal(CoseError::RecipientFormat),
        };
        let eph_pub = match self
            .primitive
            .ec_key_import_public(&EcPoint { curve: Curve::P256, x, y })
        {
            Ok(k) => k,
            Err(e) => return RecipientOutcome::Fatal(e),
        };

        let mut z_buf = [0u8; P256_COORD_LEN];
        let z = match self.primitive.ecdh(own_private, &eph_pub, &mut z_buf) {
            Ok(z) => z,
            Err(e) => return RecipientOutcome::Fatal(e),
        };

        // A field this recipient was constructed with is a pinned override and always wins;
        // otherwise fall back to whatever the wire itself carries, so a recipient built with
        // `PartyInfo::none()`/no salt still interoperates with any encoder that sends its own
        // PartyU/PartyV/salt on the wire (RFC 9053 §3.1).
        let party_u = PartyInfo {
            identity: if !self.party_u.identity.is_absent() {
                self.party_u.identity
            } else {
                match params.find_bytes(loc, header::LABEL_PARTY_U_ID) {
                    Some(b) => ByteView::present(b),
                    None => ByteView::absent(),
                }
            },
            nonce: if !self.party_u.nonce.is_absent() {
                self.party_u.nonce
            } else {
                match params.find_bytes(loc, header::LABEL_PARTY_U_NONCE) {
                    Some(b) => ByteView::present(b),
                    None => ByteView::absent(),
                }
            },
            other: if !self.party_u.other.is_absent() {
                self.party_u.other
            } else {
                match params.find_bytes(loc, header::LABEL_PARTY_U_OTHER) {
                    Some(b) => ByteView::present(b),
                    None => ByteView::absent(),
                }
            },
        };
        let party_v = PartyInfo {
            identity: if !self.party_v.identity.is_absent() {
                self.party_v.identity
            } else {
                match params.find_bytes(loc, header::LABEL_PARTY_V_ID) {
                    Some(b) => ByteView::present(b),
                    None => ByteView::absent(),
                }
            },
            nonce: if !self.party_v.nonce.is_absent() {
                self.party_v.nonce
            } else {
                match params.find_bytes(loc, header::LABEL_PARTY_V_NONCE) {
                    Some(b) => ByteView::present(b),
                    None => ByteView::absent(),
                }
            },
            other: if !self.party_v.other.is_absent() {
                self.party_v.other
            } else {
                match params.find_bytes(loc, header::LABEL_PARTY_V_OTHER) {
                    Some(b) => ByteView::present(b),
                    None => ByteView::absent(),
                }
            },
        };
        let salt = match self.salt {
            Some(s) => Some(s),
            None => params.find_bytes(loc, header::LABEL_SALT),
        };

        let kek = match self.derive_kek_with(z, protected_bytes, &party_u, &party_v, salt) {
            Ok(kek) => kek,
            Err(e) => return RecipientOutcome::Fatal(e),
        };

        let mut out = [0u8; crate::recipient::MAX_CEK_LEN];
        match self.primitive.kw_unwrap(&kek, wrapped, &mut out) {
            Ok(plain) => match Cek::new(plain) {
                Ok(cek) => RecipientOutcome::Success(cek),
                Err(e) => RecipientOutcome::Fatal(e),
            },
            Err(e) => RecipientOutcome::Fatal(e),
        }
    }
}
