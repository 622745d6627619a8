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
 * tps_cose error API
 **************************************************************************************************/
use core::result;

#[cfg(any(feature = "std", test))]
use thiserror::Error;

/// An alias for `Result<T, CoseError>` used throughout this crate.
pub type Result<T> = result::Result<T, CoseError>;

/// Errors produced while assembling or parsing a `COSE_Encrypt0`/`COSE_Encrypt` message, or while
/// driving a recipient through key establishment.
#[cfg_attr(any(feature = "std", test), derive(Clone, Error, Debug))]
#[cfg_attr(all(not(feature = "std"), not(test)), derive(Clone, Debug))]
pub enum CoseError {
    /// The CBOR substrate rejected the shape of the message (wrong array length, wrong major
    /// type at a fixed position, and so on).
    #[cfg_attr(any(feature = "std", test), error("Message does not have the expected CBOR shape"))]
    CborShape,
    /// A header parameter's value did not decode to the type its label requires.
    #[cfg_attr(any(feature = "std", test), error("Header parameter value has the wrong CBOR type"))]
    ParameterCbor,
    /// The same header label appeared in both the protected and unprotected maps, or twice
    /// within one map.
    #[cfg_attr(any(feature = "std", test), error("Duplicate header label"))]
    DuplicateLabel,
    /// No algorithm header parameter was found where one is required.
    #[cfg_attr(any(feature = "std", test), error("No algorithm header parameter present"))]
    NoAlgId,
    /// The IV header parameter is missing or has the wrong length for the body algorithm.
    #[cfg_attr(any(feature = "std", test), error("Missing or badly sized IV"))]
    BadIv,
    /// The `crit` header lists a label the decoder does not understand, or does not appear in
    /// the protected map.
    #[cfg_attr(any(feature = "std", test), error("Unknown or misplaced critical header label"))]
    UnknownCritical,
    /// The body encryption algorithm is not one this build supports.
    #[cfg_attr(any(feature = "std", test), error("Unsupported body encryption algorithm"))]
    UnsupportedEncryptionAlg,
    /// The recipient key-wrap cipher algorithm is not one this build supports.
    #[cfg_attr(any(feature = "std", test), error("Unsupported key-wrap cipher algorithm"))]
    UnsupportedCipherAlg,
    /// The elliptic curve named by a COSE_Key or algorithm is not one this build supports.
    #[cfg_attr(any(feature = "std", test), error("Unsupported elliptic curve"))]
    UnsupportedEllipticCurveAlg,
    /// The recipient's key-distribution algorithm is not one this build supports.
    #[cfg_attr(any(feature = "std", test), error("Unsupported key distribution algorithm"))]
    UnsupportedKeyDistributionAlg,
    /// A `COSE_Recipient` entry did not have the expected array shape.
    #[cfg_attr(any(feature = "std", test), error("Recipient does not have the expected shape"))]
    RecipientFormat,
    /// The primitive shim rejected imported key material.
    #[cfg_attr(any(feature = "std", test), error("Key import failed"))]
    KeyImportFailed,
    /// The primitive shim rejected imported private key material.
    #[cfg_attr(any(feature = "std", test), error("Private key import failed"))]
    PrivateKeyImportFailed,
    /// Body or recipient encryption failed in the primitive shim.
    #[cfg_attr(any(feature = "std", test), error("Encryption failed"))]
    EncryptFailed,
    /// Body or recipient decryption failed in the primitive shim for a reason other than an
    /// authentication tag mismatch.
    #[cfg_attr(any(feature = "std", test), error("Decryption failed"))]
    DecryptFailed,
    /// An AEAD tag or AES-KW integrity check did not verify.
    #[cfg_attr(any(feature = "std", test), error("Data authentication failed"))]
    DataAuthFailed,
    /// The Enc_structure scratch buffer was too small; retry with a larger one via
    /// `set_enc_struct_buffer`.
    #[cfg_attr(any(feature = "std", test), error("Enc_structure buffer too small"))]
    AadBufferTooSmall,
    /// The KDF context scratch buffer was too small.
    #[cfg_attr(any(feature = "std", test), error("KDF context buffer too small"))]
    KdfContextBufferTooSmall,
    /// A caller-supplied output buffer was too small for the result.
    #[cfg_attr(any(feature = "std", test), error("Output buffer too small"))]
    OutputBufferTooSmall,
    /// The parameter pool ran out of slots while decoding headers.
    #[cfg_attr(any(feature = "std", test), error("Too many header parameters for the pool"))]
    TooManyParameters,
    /// A non-AEAD body algorithm was used without `ENABLE_NON_AEAD` set on this side.
    #[cfg_attr(any(feature = "std", test), error("Non-AEAD body algorithm used without opt-in"))]
    NonAeadDisabled,
    /// Neither the CBOR tag nor a pinned `MessageType` option identify the message type.
    #[cfg_attr(any(feature = "std", test), error("Cannot determine message type"))]
    CannotDetermineMessageType,
    /// Encryption was attempted with neither an explicit CEK nor any recipient to generate one
    /// for.
    #[cfg_attr(any(feature = "std", test), error("No content encryption key available"))]
    NoCek,
    /// Internal signal used only between a `RecipientDecoder` and the parser's recipient scan;
    /// never returned to a caller.
    #[cfg_attr(any(feature = "std", test), error("Recipient declined (internal)"))]
    Decline,
    /// Every registered recipient decoder declined every `COSE_Recipient` entry in the message.
    #[cfg_attr(any(feature = "std", test), error("No recipient decoder matched"))]
    NoMatchingRecipient,
    /// Catch-all for conditions not covered by a more specific variant.
    #[cfg_attr(any(feature = "std", test), error("Operation failed"))]
    Fail,
}
