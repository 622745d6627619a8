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
 * tps_cose module definition
 *
 * A memory-efficient COSE_Encrypt0/COSE_Encrypt (RFC 9052) assembler and parser over
 * `tps_minicbor`, with CEK distribution via direct, AES Key Wrap and ECDH-ES+AES Key Wrap
 * recipients (RFC 9053). Designed for constrained targets: `no_std` by default, no allocator, and
 * every buffer is supplied by the caller.
 **************************************************************************************************/

// Default configuration
#![no_std]
#![warn(missing_docs)]

//! # TPS_COSE
//!
//! `tps_cose` assembles and parses `COSE_Encrypt0`/`COSE_Encrypt` messages (RFC 9052 §2/§4) over
//! [`tps_minicbor`]. It does not implement any cryptographic primitive itself: every algorithm
//! operation is driven through the [`primitive::PrimitiveCrypto`] trait, so the `no_std` core
//! never pulls in a concrete cipher crate. The `std` feature enables [`backend`], a
//! RustCrypto-backed implementation of that trait suitable for host-side testing.
//!
//! ## Layout
//!
//! - [`buffer`] - the `ByteView`/`BoundedBuf` substrate every other module builds on.
//! - [`header`] - COSE header parameters, protected/unprotected maps, the fixed-size parameter
//!   pool.
//! - [`alg`] - COSE algorithm identifiers and their AEAD-ness, key length and nonce length.
//! - [`enc_structure`] - the `Enc_structure` AAD (RFC 9052 §5.3).
//! - [`kdf_context`] - the `COSE_KDF_Context` fed to HKDF by ECDH-ES recipients (RFC 9053 §5.2).
//! - [`primitive`] - the cryptographic primitive trait boundary.
//! - [`recipient`] - the recipient encoder/decoder interface, plus [`recipient::direct`],
//!   [`recipient::keywrap`] and [`recipient::esdh`], the three recipient strategies this crate
//!   implements.
//! - [`assembler`] - [`assembler::Encrypt0Assembler`] and [`assembler::EncryptAssembler`].
//! - [`parser`] - [`parser::Parser`], decrypting either message shape.
//! - [`backend`] (feature `std`) - a concrete [`primitive::PrimitiveCrypto`] implementation.

pub mod alg;
pub mod assembler;
pub mod buffer;
pub mod enc_structure;
pub mod error;
pub mod header;
pub mod kdf_context;
pub mod parser;
pub mod primitive;
pub mod recipient;

#[cfg(feature = "backend")]
pub mod backend;

pub use error::{CoseError, Result};
