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
 * Primitive crypto shim
 *
 * The assembler, parser and recipient modules never touch a concrete cipher or curve directly;
 * they drive this trait. This keeps the `no_std` core buildable (and auditable) without the
 * concrete RustCrypto dependency tree, and lets a deployment swap in an HSM-backed implementation
 * without touching anything above this boundary. `tps_cose::backend` is the one concrete
 * implementation this crate ships, gated behind the `backend`/`std` features.
 *
 * Key handles are opaque to everything above this trait: a symmetric key is a `SymKey`, an EC key
 * pair's two halves are `EcPrivateKey`/`EcPublicKey`. Ownership stays with the caller - the shim
 * never frees a handle it did not create via `sym_key_import`.
 **************************************************************************************************/
use crate::alg::Alg;
use crate::error::{CoseError, Result};

/// An elliptic curve identifier (COSE EC2 curve registry subset this crate understands).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Curve {
    P256,
}

/// The uncompressed affine coordinates of an EC2 public key, plus which curve they belong to.
pub struct EcPoint<'a> {
    pub curve: Curve,
    pub x: &'a [u8],
    pub y: &'a [u8],
}

/// Trait boundary for every cryptographic primitive the core consumes. Every method writes its
/// result into a caller-supplied `out` buffer and returns the written prefix, never allocating.
pub trait PrimitiveCrypto {
    /// An imported symmetric key handle (AES-KW KEK, AES-GCM/CTR/CBC body key).
    type SymKey: Clone;
    /// An imported or generated EC private key handle.
    type EcPrivateKey;
    /// An imported or generated EC public key handle.
    type EcPublicKey;

    /// `true` if this implementation supports `alg`.
    fn alg_is_supported(&self, alg: Alg) -> bool;

    /// Import raw key bytes as a symmetric key for use with `alg`.
    fn sym_key_import(&self, alg: Alg, bytes: &[u8]) -> Result<Self::SymKey>;

    /// AEAD body encryption: returns ciphertext with the authentication tag appended.
    fn aead_encrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// AEAD body decryption; fails with [`CoseError::DataAuthFailed`] if the tag does not verify.
    fn aead_decrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        aad: &[u8],
        ciphertext_with_tag: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// Non-AEAD body encryption (AES-CTR/CBC). No tag is produced; the caller is responsible for
    /// authenticating the message at a higher layer.
    fn non_aead_encrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        plaintext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// Non-AEAD body decryption (AES-CTR/CBC).
    fn non_aead_decrypt<'o>(
        &self,
        alg: Alg,
        key: &Self::SymKey,
        nonce: &[u8],
        ciphertext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// RFC 3394 AES Key Wrap. `out` must be `input.len() + 8` bytes.
    fn kw_wrap<'o>(
        &self,
        kek: &Self::SymKey,
        plaintext: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// RFC 3394 AES Key Unwrap. `out` must be at least `wrapped.len() - 8` bytes. Fails with
    /// [`CoseError::DataAuthFailed`] if the integrity check value does not match.
    fn kw_unwrap<'o>(
        &self,
        kek: &Self::SymKey,
        wrapped: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// HKDF-SHA-256 extract-then-expand (RFC 5869), fused into a single call.
    fn hkdf<'o>(
        &self,
        salt: Option<&[u8]>,
        ikm: &[u8],
        info: &[u8],
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// Generate an ephemeral EC key pair on `curve`.
    fn ec_key_generate(&self, curve: Curve) -> Result<(Self::EcPrivateKey, Self::EcPublicKey)>;

    /// Import an EC public key from its uncompressed affine coordinates.
    fn ec_key_import_public(&self, point: &EcPoint) -> Result<Self::EcPublicKey>;

    /// Export an EC public key's uncompressed affine coordinates into `x_out`/`y_out`.
    fn ec_key_export_public<'o>(
        &self,
        key: &Self::EcPublicKey,
        x_out: &'o mut [u8],
        y_out: &'o mut [u8],
    ) -> Result<(&'o [u8], &'o [u8])>;

    /// ECDH-ES shared secret `Z` between a local private key and a peer public key.
    fn ecdh<'o>(
        &self,
        local: &Self::EcPrivateKey,
        peer: &Self::EcPublicKey,
        out: &'o mut [u8],
    ) -> Result<&'o [u8]>;

    /// Fill `out` with cryptographically random bytes.
    fn rng(&self, out: &mut [u8]) -> Result<()>;
}

/// Convenience: require an algorithm to be supported, with the standard error.
pub fn require_supported<P: PrimitiveCrypto>(primitive: &P, alg: Alg) -> Result<()> {
    if primitive.alg_is_supported(alg) {
        Ok(())
    } else {
        Err(CoseError::UnsupportedEncryptionAlg)
    }
}
