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
 * COSE Algorithm identifiers (IANA COSE Algorithms registry, signed 32-bit integers)
 **************************************************************************************************/
use crate::error::{CoseError, Result};

/// A COSE algorithm identifier, matching the IANA COSE Algorithms registry.
pub type Alg = i32;

/// AES-GCM with a 128-bit key.
pub const A128GCM: Alg = 1;
/// AES-GCM with a 192-bit key.
pub const A192GCM: Alg = 2;
/// AES-GCM with a 256-bit key.
pub const A256GCM: Alg = 3;
/// AES-CCM, 16-byte tag, 13-byte nonce, 128-bit key.
pub const AES_CCM_16_128: Alg = 10;
/// AES-CCM, 16-byte tag, 13-byte nonce, 256-bit key.
pub const AES_CCM_16_256: Alg = 11;
/// Direct use of a pre-shared CEK; no recipient-side key wrapping.
pub const DIRECT: Alg = -6;
/// HKDF-SHA-256 keyed by ECDH-ES shared secret, wrapping the CEK with AES-128 Key Wrap.
pub const ECDH_ES_A128KW: Alg = -29;
/// HKDF-SHA-256 keyed by ECDH-ES shared secret, wrapping the CEK with AES-192 Key Wrap.
pub const ECDH_ES_A192KW: Alg = -30;
/// HKDF-SHA-256 keyed by ECDH-ES shared secret, wrapping the CEK with AES-256 Key Wrap.
pub const ECDH_ES_A256KW: Alg = -31;
/// AES Key Wrap with a 128-bit KEK.
pub const A128KW: Alg = -3;
/// AES Key Wrap with a 192-bit KEK.
pub const A192KW: Alg = -4;
/// AES Key Wrap with a 256-bit KEK.
pub const A256KW: Alg = -5;
/// AES-CTR with a 128-bit key (non-AEAD).
pub const A128CTR: Alg = -65534;
/// AES-CTR with a 192-bit key (non-AEAD).
pub const A192CTR: Alg = -65533;
/// AES-CTR with a 256-bit key (non-AEAD).
pub const A256CTR: Alg = -65532;
/// AES-CBC with a 128-bit key, PKCS7 padding (non-AEAD).
pub const A128CBC: Alg = -65531;
/// AES-CBC with a 192-bit key, PKCS7 padding (non-AEAD).
pub const A192CBC: Alg = -65530;
/// AES-CBC with a 256-bit key, PKCS7 padding (non-AEAD).
pub const A256CBC: Alg = -65529;

/// `true` if `alg` is an AEAD body encryption algorithm (AES-GCM or AES-CCM).
pub fn is_aead(alg: Alg) -> bool {
    matches!(alg, A128GCM | A192GCM | A256GCM | AES_CCM_16_128 | AES_CCM_16_256)
}

/// `true` if `alg` is a non-AEAD body encryption algorithm (AES-CTR or AES-CBC), which requires
/// the caller to opt in via `ENABLE_NON_AEAD` and to authenticate the message at a higher layer.
pub fn is_non_aead(alg: Alg) -> bool {
    matches!(
        alg,
        A128CTR | A192CTR | A256CTR | A128CBC | A192CBC | A256CBC
    )
}

/// Content encryption key length, in bytes, for a body algorithm.
pub fn cek_len(alg: Alg) -> Result<usize> {
    match alg {
        A128GCM | AES_CCM_16_128 | A128CTR | A128CBC => Ok(16),
        A192GCM | A192CTR | A192CBC => Ok(24),
        A256GCM | AES_CCM_16_256 | A256CTR | A256CBC => Ok(32),
        _ => Err(CoseError::UnsupportedEncryptionAlg),
    }
}

/// AEAD nonce length, in bytes, for a body algorithm. AES-GCM uses the standard 96-bit nonce;
/// AES-CCM-16 uses the 13-byte nonce from RFC 9053's `16` parameterization.
pub fn nonce_len(alg: Alg) -> Result<usize> {
    match alg {
        A128GCM | A192GCM | A256GCM => Ok(12),
        AES_CCM_16_128 | AES_CCM_16_256 => Ok(13),
        A128CTR | A192CTR | A256CTR => Ok(16),
        A128CBC | A192CBC | A256CBC => Ok(16),
        _ => Err(CoseError::UnsupportedEncryptionAlg),
    }
}

/// `true` if `alg` names one of the AES Key Wrap recipient algorithms.
pub fn is_aes_kw(alg: Alg) -> bool {
    matches!(alg, A128KW | A192KW | A256KW)
}

/// `true` if `alg` names one of the ECDH-ES + AES Key Wrap recipient algorithms.
pub fn is_ecdh_es_kw(alg: Alg) -> bool {
    matches!(alg, ECDH_ES_A128KW | ECDH_ES_A192KW | ECDH_ES_A256KW)
}

/// Key-wrap key length, in bytes, for an AES-KW-based algorithm (direct or ECDH-ES mediated).
pub fn kw_key_len(alg: Alg) -> Result<usize> {
    match alg {
        A128KW | ECDH_ES_A128KW => Ok(16),
        A192KW | ECDH_ES_A192KW => Ok(24),
        A256KW | ECDH_ES_A256KW => Ok(32),
        _ => Err(CoseError::UnsupportedKeyDistributionAlg),
    }
}

/// The plain AES-KW algorithm identifier carrying the same key-encryption-key length as an
/// ECDH-ES+AES-KW algorithm, used to import the HKDF-derived KEK through the same
/// `sym_key_import` path a direct AES-KW recipient uses.
pub fn aes_kw_equivalent(alg: Alg) -> Result<Alg> {
    match alg {
        ECDH_ES_A128KW => Ok(A128KW),
        ECDH_ES_A192KW => Ok(A192KW),
        ECDH_ES_A256KW => Ok(A256KW),
        _ => Err(CoseError::UnsupportedKeyDistributionAlg),
    }
}
