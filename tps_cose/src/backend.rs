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
 * RustCrypto-backed reference primitive shim
 *
 * The one concrete `PrimitiveCrypto` implementation this crate ships, gated behind the
 * `backend`/`std` feature so the `no_std` core never needs the concrete cipher crates. Every key
 * handle is a plain byte buffer tagged with the algorithm it was imported for; the concrete cipher
 * object is reconstructed from those bytes on every operation rather than held across calls, since
 * none of the RustCrypto cipher types here are `Clone + 'static`-free enough to store behind the
 * `PrimitiveCrypto::SymKey` associated type otherwise.
 **************************************************************************************************/
use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit as AeadKeyInit};
use aes_gcm::AesGcm;
use aes_kw::{KekAes128, KekAes192, KekAes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use ctr::cipher::{KeyIvInit as CtrKeyIvInit, StreamCipher};
use hkdf::Hkdf;
use p256::ecdh::diffie_hellman;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{EncodedPoint, PublicKey, SecretKey};
use rand_core::{OsRng, RngCore};
use sha2::Sha256;

use crate::alg::{self, Alg};
use crate::error::{CoseError, Result};
use crate::primitive::{Curve, EcPoint, PrimitiveCrypto};

type Aes128Gcm = AesGcm<Aes128, typenum::U12>;
type Aes192Gcm = AesGcm<Aes192, typenum::U12>;
type Aes256Gcm = AesGcm<Aes256, typenum::U12>;

type Aes128CtrT = ctr::Ctr128BE<Aes128>;
type Aes192CtrT = ctr::Ctr128BE<Aes192>;
type Aes256CtrT = ctr::Ctr128BE<Aes256>;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

use aes_gcm::aead::consts as typenum;

/// A key handle: the raw bytes the caller imported, tagged with the algorithm they were imported
/// for, so later operations know which concrete cipher to reconstruct.
#[derive(Clone)]
pub struct BackendSymKey {
    alg: Alg,
    bytes: [u8; 32],
    len: usize,
}

/// A RustCrypto-backed [`PrimitiveCrypto`] implementation, suitable for tests and any deployment
/// that does not need an HSM-backed primitive shim.
#[derive(Default)]
pub struct RustCryptoPrimitives;

impl RustCryptoPrimitives {
    /// Construct a new backend. Holds no state of its own.
    pub fn new() -> Self {
        RustCryptoPrimitives
    }
}

fn gcm_encrypt<C: AeadInPlace + AeadKeyInit>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    if out.len() < plaintext.len() + 16 {
        return Err(CoseError::OutputBufferTooSmall);
    }
    let cipher = C::new_from_slice(key).map_err(|_| CoseError::KeyImportFailed)?;
    out[..plaintext.len()].copy_from_slice(plaintext);
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), aad, &mut out[..plaintext.len()])
        .map_err(|_| CoseError::EncryptFailed)?;
    out[plaintext.len()..plaintext.len() + 16].copy_from_slice(&tag);
    Ok(plaintext.len() + 16)
}

fn gcm_decrypt<C: AeadInPlace + AeadKeyInit>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext_with_tag: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    if ciphertext_with_tag.len() < 16 {
        return Err(CoseError::DataAuthFailed);
    }
    let ct_len = ciphertext_with_tag.len() - 16;
    if out.len() < ct_len {
        return Err(CoseError::OutputBufferTooSmall);
    }
    let cipher = C::new_from_slice(key).map_err(|_| CoseError::KeyImportFailed)?;
    out[..ct_len].copy_from_slice(&ciphertext_with_tag[..ct_len]);
    let tag = GenericArray::from_slice(&ciphertext_with_tag[ct_len..]);
    cipher
        .decrypt_in_place_detached(GenericArray::from_slice(nonce), aad, &mut out[..ct_len], tag)
        .map_err(|_| CoseError::DataAuthFailed)?;
    Ok(ct_len)
}

impl PrimitiveCrypto for RustCryptoPrimitives {
    type SymKey = BackendSymKey;
    type EcPrivateKey = SecretKey;
    type EcPublicKey = PublicKey;

    fn alg_is_supported(&self, candidate: Alg) -> bool {
        alg::is_aead(candidate)
            || alg::is_non_aead(candidate)
            || alg::is_aes_kw(candidate)
            || alg::is_ecdh_es_kw(candidate)
            || candidate == alg::DIRECT
    }

    fn sym_key_import(&self, alg: Alg, bytes: &[u8]) -> Result<Self::SymKey> {
        if bytes.len() > 32 {
            return Err(CoseError::KeyImportFailed);
        }
        let mut storage = [0u8; 32];
        storage[..bytes.len()].copy_from_slice(bytes);
        Ok(BackendSymKey { alg, bytes: storage, len: bytes.len() })
    }

    fn aead_encrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        let key_bytes = &key.bytes[..key.len];
        let n = match alg {
            alg::A128GCM => gcm_encrypt::<Aes128Gcm>(key_bytes, nonce, aad, plaintext, out)?,
            alg::A192GCM => gcm_encrypt::<Aes192Gcm>(key_bytes, nonce, aad, plaintext, out)?,
            alg::A256GCM => gcm_encrypt::<Aes256Gcm>(key_bytes, nonce, aad, plaintext, out)?,
            _ => return Err(CoseError::UnsupportedEncryptionAlg),
        };
        Ok(&out[..n])
    }

    fn aead_decrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        aad: &[u8],
        ciphertext_with_tag: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        let key_bytes = &key.bytes[..key.len];
        let n = match alg {
            alg::A128GCM => gcm_decrypt::<Aes128Gcm>(key_bytes, nonce, aad, ciphertext_with_tag, out)?,
            alg::A192GCM => gcm_decrypt::<Aes192Gcm>(key_bytes, nonce, aad, ciphertext_with_tag, out)?,
            alg::A256GCM => gcm_decrypt::<Aes256Gcm>(key_bytes, nonce, aad, ciphertext_with_tag, out)?,
            _ => return Err(CoseError::UnsupportedEncryptionAlg),
        };
        Ok(&out[..n])
    }

    fn non_aead_encrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        plaintext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        let key_bytes = &key.bytes[..key.len];
        match alg {
            alg::A128CTR | alg::A192CTR | alg::A256CTR => {
                if out.len() < plaintext.len() {
                    return Err(CoseError::OutputBufferTooSmall);
                }
                out[..plaintext.len()].copy_from_slice(plaintext);
                match alg {
                    alg::A128CTR => Aes128CtrT::new(key_bytes.into(), nonce.into())
                        .apply_keystream(&mut out[..plaintext.len()]),
                    alg::A192CTR => Aes192CtrT::new(key_bytes.into(), nonce.into())
                        .apply_keystream(&mut out[..plaintext.len()]),
                    _ => Aes256CtrT::new(key_bytes.into(), nonce.into())
                        .apply_keystream(&mut out[..plaintext.len()]),
                }
                Ok(&out[..plaintext.len()])
            }
            alg::A128CBC | alg::A192CBC | alg::A256CBC => {
                let n = match alg {
                    alg::A128CBC => Aes128CbcEnc::new(key_bytes.into(), nonce.into())
                        .encrypt_padded_b2b_mut::<Pkcs7>(plaintext, out)
                        .map_err(|_| CoseError::OutputBufferTooSmall)?
                        .len(),
                    alg::A192CBC => Aes192CbcEnc::new(key_bytes.into(), nonce.into())
                        .encrypt_padded_b2b_mut::<Pkcs7>(plaintext, out)
                        .map_err(|_| CoseError::OutputBufferTooSmall)?
                        .len(),
                    _ => Aes256CbcEnc::new(key_bytes.into(), nonce.into())
                        .encrypt_padded_b2b_mut::<Pkcs7>(plaintext, out)
                        .map_err(|_| CoseError::OutputBufferTooSmall)?
                        .len(),
                };
                Ok(&out[..n])
            }
            _ => Err(CoseError::UnsupportedEncryptionAlg),
        }
    }

    fn non_aead_decrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        ciphertext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        let key_bytes = &key.bytes[..key.len];
        match alg {
            alg::A128CTR | alg::A192CTR | alg::A256CTR => {
                if out.len() < ciphertext.len() {
                    return Err(CoseError::OutputBufferTooSmall);
                }
                out[..ciphertext.len()].copy_from_slice(ciphertext);
                match alg {
                    alg::A128CTR => Aes128CtrT::new(key_bytes.into(), nonce.into())
                        .apply_keystream(&mut out[..ciphertext.len()]),
                    alg::A192CTR => Aes192CtrT::new(key_bytes.into(), nonce.into())
                        .apply_keystream(&mut out[..ciphertext.len()]),
                    _ => Aes256CtrT::new(key_bytes.into(), nonce.into())
                        .apply_keystream(&mut out[..ciphertext.len()]),
                }
                Ok(&out[..ciphertext.len()])
            }
            alg::A128CBC | alg::A192CBC | alg::A256CBC => {
                let n = match alg {
                    alg::A128CBC => Aes128CbcDec::new(key_bytes.into(), nonce.into())
                        .decrypt_padded_b2b_mut::<Pkcs7>(ciphertext, out)
                        .map_err(|_| CoseError::DecryptFailed)?
                        .len(),
                    alg::A192CBC => Aes192CbcDec::new(key_bytes.into(), nonce.into())
                        .decrypt_padded_b2b_mut::<Pkcs7>(ciphertext, out)
                        .map_err(|_| CoseError::DecryptFailed)?
                        .len(),
                    _ => Aes256CbcDec::new(key_bytes.into(), nonce.into())
                        .decrypt_padded_b2b_mut::<Pkcs7>(ciphertext, out)
                        .map_err(|_| CoseError::DecryptFailed)?
                        .len(),
                };
                Ok(&out[..n])
            }
            _ => Err(CoseError::UnsupportedEncryptionAlg),
        }
    }

    fn kw_wrap<'o>(
        &self,
        kek: &Self::SymKey,
        plaintext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        if out.len() < plaintext.len() + 8 {
            return Err(CoseError::OutputBufferTooSmall);
        }
        let kek_bytes = &kek.bytes[..kek.len];
        match kek.len {
            16 => KekAes128::try_from(kek_bytes)
                .and_then(|k| k.wrap(plaintext, out))
                .map_err(|_| CoseError::EncryptFailed)?,
            24 => KekAes192::try_from(kek_bytes)
                .and_then(|k| k.wrap(plaintext, out))
                .map_err(|_| CoseError::EncryptFailed)?,
            32 => KekAes256::try_from(kek_bytes)
                .and_then(|k| k.wrap(plaintext, out))
                .map_err(|_| CoseError::EncryptFailed)?,
            _ => return Err(CoseError::UnsupportedCipherAlg),
        };
        Ok(&out[..plaintext.len() + 8])
    }

    fn kw_unwrap<'o>(
        &self,
        kek: &Self::SymKey,
        wrapped: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        if wrapped.len() < 8 || out.len() < wrapped.len() - 8 {
            return Err(CoseError::OutputBufferTooSmall);
        }
        let kek_bytes = &kek.bytes[..kek.len];
        match kek.len {
            16 => KekAes128::try_from(kek_bytes)
                .and_then(|k| k.unwrap(wrapped, out))
                .map_err(|_| CoseError::DataAuthFailed)?,
            24 => KekAes192::try_from(kek_bytes)
                .and_then(|k| k.unwrap(wrapped, out))
                .map_err(|_| CoseError::DataAuthFailed)?,
            32 => KekAes256::try_from(kek_bytes)
                .and_then(|k| k.unwrap(wrapped, out))
                .map_err(|_| CoseError::DataAuthFailed)?,
            _ => return Err(CoseError::UnsupportedCipherAlg),
        };
        Ok(&out[..wrapped.len() - 8])
    }

    fn hkdf<'o>(
        &self,
        salt: Option<&[u8]>,
        ikm: &[u8],
        info: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        let hk = Hkdf::<Sha256>::new(salt, ikm);
        hk.expand(info, out).map_err(|_| CoseError::KdfContextBufferTooSmall)?;
        Ok(out)
    }

    fn ec_key_generate(&self, curve: Curve) -> Result<(Self::EcPrivateKey, Self::EcPublicKey)> {
        match curve {
            Curve::P256 => {
                let secret = SecretKey::random(&mut OsRng);
                let public = secret.public_key();
                Ok((secret, public))
            }
        }
    }

    fn ec_key_import_public(&self, point: &EcPoint) -> Result<Self::EcPublicKey> {
        match point.curve {
            Curve::P256 => {
                let encoded = EncodedPoint::from_affine_coordinates(
                    GenericArray::from_slice(point.x),
                    GenericArray::from_slice(point.y),
                    false,
                );
                Option::<PublicKey>::from(PublicKey::from_encoded_point(&encoded))
                    .ok_or(CoseError::UnsupportedEllipticCurveAlg)
            }
        }
    }

    fn ec_key_export_public<'o>(
        &self,
        key: &Self::EcPublicKey,
        x_out: &'o mut [u8],
        y_out: &'o mut [u8],
    ) -> Result<(&'o [u8], &'o [u8])> {
        let encoded = key.to_encoded_point(false);
        let x = encoded.x().ok_or(CoseError::UnsupportedEllipticCurveAlg)?;
        let y = encoded.y().ok_or(CoseError::UnsupportedEllipticCurveAlg)?;
        if x_out.len() < x.len() || y_out.len() < y.len() {
            return Err(CoseError::OutputBufferTooSmall);
        }
        x_out[..x.len()].copy_from_slice(x);
        y_out[..y.len()].copy_from_slice(y);
        Ok((&x_out[..x.len()], &y_out[..y.len()]))
    }

    fn ecdh<'o>(
        &self,
        local: &Self::EcPrivateKey,
        peer: &Self::EcPublicKey,
        out: &'o mut [u8],
    ) -> Result<&'o [u8]> {
        let shared = diffie_hellman(local.to_nonzero_scalar(), peer.as_affine());
        let bytes = shared.raw_secret_bytes();
        if out.len() < bytes.len() {
            return Err(CoseError::OutputBufferTooSmall);
        }
        out[..bytes.len()].copy_from_slice(bytes.as_slice());
        Ok(&out[..bytes.len()])
    }

    fn rng(&self, out: &mut [u8]) -> Result<()> {
        OsRng.fill_bytes(out);
        Ok(())
    }
}
