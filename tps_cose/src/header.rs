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
 * COSE header parameter module
 *
 * Parameters live in a caller-supplied, fixed-size pool - there is no linked list and nothing is
 * allocated. `location` distinguishes a body parameter (nesting 0) from a parameter belonging to
 * the `index`-th recipient (nesting 1), so one pool can back an entire message.
 **************************************************************************************************/
use core::convert::TryFrom;

use tps_minicbor::decoder::{MapBuf, SequenceBuffer};
use tps_minicbor::encoder::EncodeBuffer;
use tps_minicbor::error::CBORError;
use tps_minicbor::types::{array, map, CBOR};

use crate::error::{CoseError, Result};

/// Algorithm, RFC 9052 §3.1.
pub const LABEL_ALG: i64 = 1;
/// Critical labels, RFC 9052 §3.1.
pub const LABEL_CRIT: i64 = 2;
/// Content type, RFC 9052 §3.1.
pub const LABEL_CONTENT_TYPE: i64 = 3;
/// Key identifier, RFC 9052 §3.1.
pub const LABEL_KID: i64 = 4;
/// Initialization vector, RFC 9052 §3.1.
pub const LABEL_IV: i64 = 5;
/// Ephemeral public key, RFC 9053 §3.1 (ECDH-ES common parameter).
pub const LABEL_EPHEMERAL_KEY: i64 = -1;
/// HKDF salt, RFC 9053 §3.1.
pub const LABEL_SALT: i64 = -20;
/// PartyU identity, RFC 9053 §3.1.
pub const LABEL_PARTY_U_ID: i64 = -21;
/// PartyU nonce, RFC 9053 §3.1.
pub const LABEL_PARTY_U_NONCE: i64 = -22;
/// PartyU other info, RFC 9053 §3.1.
pub const LABEL_PARTY_U_OTHER: i64 = -23;
/// PartyV identity, RFC 9053 §3.1.
pub const LABEL_PARTY_V_ID: i64 = -24;
/// PartyV nonce, RFC 9053 §3.1.
pub const LABEL_PARTY_V_NONCE: i64 = -25;
/// PartyV other info, RFC 9053 §3.1.
pub const LABEL_PARTY_V_OTHER: i64 = -26;

/// Maximum number of header parameters held in one [`ParamPool`].
pub const MAX_PARAMS: usize = 16;

/// Where a header parameter belongs: the message body, or the `index`-th recipient.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// 0 for the body, 1 for a recipient.
    pub nesting: u8,
    /// Recipient index, meaningful only when `nesting == 1`.
    pub index: u8,
}

impl Location {
    /// The message body.
    pub const BODY: Location = Location { nesting: 0, index: 0 };

    /// The `index`-th recipient.
    pub fn recipient(index: u8) -> Location {
        Location { nesting: 1, index }
    }
}

/// The value carried by a header parameter.
///
/// `Callback` lets a producer emit arbitrary CBOR for a parameter this module does not model
/// directly (e.g. a COSE_Key structure for an ephemeral public key); the decoder never produces
/// this variant.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// A signed integer value (covers label values such as `alg`).
    Int(i64),
    /// A text string value.
    Text(&'a str),
    /// A byte string value (covers `kid`, `iv`, wrapped keys, salts, and so on).
    Bytes(&'a [u8]),
    /// A boolean value.
    Bool(bool),
    /// A producer-supplied callback that writes arbitrary CBOR for this parameter's value.
    Callback(&'a dyn Fn(&mut EncodeBuffer) -> tps_minicbor::error::Result<()>),
    /// A decoded value that isn't one of the above - an array, map, tag or float. Used for
    /// structured parameters this module does not interpret itself, such as an ECDH-ES ephemeral
    /// `COSE_Key`; the decoder never rejects a structurally valid parameter just because it isn't
    /// a scalar.
    Raw(CBOR<'a>),
}

/// One header parameter: a label, its protected/critical bits, where it belongs, and its value.
#[derive(Clone, Copy)]
pub struct Param<'a> {
    /// The integer header label (RFC 9052 §3.1 and the ECDH common parameters of RFC 9053 §3.1).
    pub label: i64,
    /// `true` if this parameter belongs in the protected header map.
    pub protected: bool,
    /// `true` if this parameter's label must appear in the `crit` array.
    pub critical: bool,
    /// Which header map (body or which recipient) this parameter belongs to.
    pub location: Location,
    /// The parameter's value.
    pub value: Value<'a>,
}

impl<'a> Param<'a> {
    fn at(&self, loc: Location) -> bool {
        self.location == loc
    }
}

/// Construct an integer-valued header parameter.
pub fn make_int(label: i64, protected: bool, location: Location, value: i64) -> Param<'static> {
    Param { label, protected, critical: false, location, value: Value::Int(value) }
}

/// Construct a text-string-valued header parameter.
pub fn make_tstr(label: i64, protected: bool, location: Location, value: &str) -> Param<'_> {
    Param { label, protected, critical: false, location, value: Value::Text(value) }
}

/// Construct a byte-string-valued header parameter.
pub fn make_bstr(label: i64, protected: bool, location: Location, value: &[u8]) -> Param<'_> {
    Param { label, protected, critical: false, location, value: Value::Bytes(value) }
}

/// Construct a boolean-valued header parameter.
pub fn make_bool(label: i64, protected: bool, location: Location, value: bool) -> Param<'static> {
    Param { label, protected, critical: false, location, value: Value::Bool(value) }
}

/// Construct a header parameter whose value is emitted by a caller-supplied encode callback.
pub fn make_callback<'a>(
    label: i64,
    protected: bool,
    location: Location,
    f: &'a dyn Fn(&mut EncodeBuffer) -> tps_minicbor::error::Result<()>,
) -> Param<'a> {
    Param { label, protected, critical: false, location, value: Value::Callback(f) }
}

/// Mark `param` as critical (its label must be listed in the protected `crit` array).
pub fn critical(mut param: Param) -> Param {
    param.critical = true;
    param
}

fn write_value(buf: &mut EncodeBuffer, value: &Value) -> tps_minicbor::error::Result<()> {
    match value {
        Value::Int(v) => {
            buf.insert(v)?;
        }
        Value::Text(v) => {
            buf.insert(v)?;
        }
        Value::Bytes(v) => {
            buf.insert(v)?;
        }
        Value::Bool(v) => {
            buf.insert(v)?;
        }
        Value::Callback(f) => {
            f(buf)?;
        }
        Value::Raw(_) => {
            // Only produced while decoding; a producer that wants to emit a structured value uses
            // `Value::Callback` instead.
            return Err(CBORError::NotImplemented);
        }
    }
    Ok(())
}

fn write_map_body<'f, 'buf>(
    buf: &'f mut EncodeBuffer<'buf>,
    params: &[Param],
    protected: bool,
    loc: Location,
) -> tps_minicbor::error::Result<&'f mut EncodeBuffer<'buf>> {
    let mut crit_labels = [0i64; MAX_PARAMS];
    let mut n_crit = 0usize;

    for p in params.iter().filter(|p| p.protected == protected && p.at(loc)) {
        buf.insert(&p.label)?;
        write_value(buf, &p.value)?;
        if p.critical {
            crit_labels[n_crit] = p.label;
            n_crit += 1;
        }
    }
    if protected && n_crit > 0 {
        let crit = &crit_labels[..n_crit];
        buf.insert(&LABEL_CRIT)?;
        buf.insert(&array(|b| {
            let mut b = b;
            for label in crit {
                b = b.insert(label)?;
            }
            Ok(b)
        }))?;
    }
    Ok(buf)
}

/// Encode the protected header map for `loc` into `out`, returning the number of bytes written.
///
/// If no protected parameter matches `loc`, nothing is written and `0` is returned - an empty
/// protected header map is represented on the wire as a zero-length byte string, never as an
/// encoded empty map (RFC 9052 §3).
pub fn encode_protected(params: &[Param], loc: Location, out: &mut [u8]) -> Result<usize> {
    if !params.iter().any(|p| p.protected && p.at(loc)) {
        return Ok(0);
    }
    let mut enc = EncodeBuffer::new(out);
    enc.insert(&map(|b| write_map_body(b, params, true, loc)))
        .map_err(|_| CoseError::ParameterCbor)?;
    Ok(enc.len())
}

/// Encode the unprotected header map for `loc` as the next item in `enc`.
pub fn encode_unprotected(params: &[Param], loc: Location, enc: &mut EncodeBuffer) -> Result<()> {
    enc.insert(&map(|b| write_map_body(b, params, false, loc)))
        .map_err(|_| CoseError::ParameterCbor)?;
    Ok(())
}

/// A fixed-capacity store for decoded header parameters, shared across the body and all
/// recipients of one message.
pub struct ParamPool<'a> {
    slots: [Option<Param<'a>>; MAX_PARAMS],
    used: usize,
}

impl<'a> ParamPool<'a> {
    /// An empty pool.
    pub fn new() -> Self {
        ParamPool { slots: [None; MAX_PARAMS], used: 0 }
    }

    /// The parameters decoded so far.
    pub fn as_slice(&self) -> &[Option<Param<'a>>] {
        &self.slots[..self.used]
    }

    fn push(&mut self, param: Param<'a>) -> Result<()> {
        if self.used >= MAX_PARAMS {
            return Err(CoseError::TooManyParameters);
        }
        self.slots[self.used] = Some(param);
        self.used += 1;
        Ok(())
    }

    /// Find the value of `label` at `loc`, if any parameter was decoded for it.
    pub fn find(&self, loc: Location, label: i64) -> Option<&Value<'a>> {
        self.as_slice()
            .iter()
            .filter_map(|p| p.as_ref())
            .find(|p| p.at(loc) && p.label == label)
            .map(|p| &p.value)
    }

    /// Convenience accessor for an integer-valued parameter.
    pub fn find_int(&self, loc: Location, label: i64) -> Option<i64> {
        match self.find(loc, label) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Convenience accessor for a byte-string-valued parameter.
    pub fn find_bytes(&self, loc: Location, label: i64) -> Option<&'a [u8]> {
        match self.find(loc, label) {
            Some(Value::Bytes(v)) => Some(*v),
            _ => None,
        }
    }

    /// Convenience accessor for a parameter that decoded to an array, map, tag or float - values
    /// this module does not interpret directly, such as an ECDH-ES ephemeral `COSE_Key`.
    pub fn find_raw(&self, loc: Location, label: i64) -> Option<CBOR<'a>> {
        match self.find(loc, label) {
            Some(Value::Raw(v)) => Some(*v),
            _ => None,
        }
    }
}

impl<'a> Default for ParamPool<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Labels this crate actually interprets. A `crit` entry naming anything else means the message
/// demands understanding of a parameter we would silently ignore, so it must fail decode rather
/// than merely being present.
fn is_known_label(label: i64) -> bool {
    matches!(
        label,
        LABEL_ALG
            | LABEL_CONTENT_TYPE
            | LABEL_KID
            | LABEL_IV
            | LABEL_EPHEMERAL_KEY
            | LABEL_SALT
            | LABEL_PARTY_U_ID
            | LABEL_PARTY_U_NONCE
            | LABEL_PARTY_U_OTHER
            | LABEL_PARTY_V_ID
            | LABEL_PARTY_V_NONCE
            | LABEL_PARTY_V_OTHER
    )
}

fn decode_map_into(
    map_buf: MapBuf,
    protected: bool,
    loc: Location,
    pool: &mut ParamPool,
) -> Result<()> {
    let mut crit_seen: [i64; MAX_PARAMS] = [0; MAX_PARAMS];
    let mut n_crit_seen = 0usize;
    let mut crit_required: [i64; MAX_PARAMS] = [0; MAX_PARAMS];
    let mut n_crit_required = 0usize;

    let mut it = map_buf.into_iter();
    loop {
        let key = match it.next() {
            Some(k) => k,
            None => break,
        };
        let value = it.next().ok_or(CoseError::CborShape)?;
        let label = i64::try_from(key).map_err(|_| CoseError::ParameterCbor)?;

        if label == LABEL_CRIT {
            if !protected {
                return Err(CoseError::UnknownCritical);
            }
            let crit_array =
                tps_minicbor::decoder::ArrayBuf::try_from(value).map_err(|_| CoseError::ParameterCbor)?;
            for i in 0..crit_array.len() {
                let crit_item = crit_array.index(i).ok_or(CoseError::ParameterCbor)?;
                let crit_label = i64::try_from(crit_item).map_err(|_| CoseError::ParameterCbor)?;
                if n_crit_required >= MAX_PARAMS {
                    return Err(CoseError::TooManyParameters);
                }
                crit_required[n_crit_required] = crit_label;
                n_crit_required += 1;
            }
            continue;
        }

        if pool.find(loc, label).is_some() {
            return Err(CoseError::DuplicateLabel);
        }

        let param_value = match value {
            CBOR::UInt(_) | CBOR::NInt(_) => {
                Value::Int(i64::try_from(value).map_err(|_| CoseError::ParameterCbor)?)
            }
            CBOR::Tstr(s) => Value::Text(s),
            CBOR::Bstr(b) => Value::Bytes(b),
            CBOR::True => Value::Bool(true),
            CBOR::False => Value::Bool(false),
            other => Value::Raw(other),
        };
        pool.push(Param { label, protected, critical: false, location: loc, value: param_value })?;
        if n_crit_seen < MAX_PARAMS {
            crit_seen[n_crit_seen] = label;
            n_crit_seen += 1;
        }
    }

    for label in &crit_required[..n_crit_required] {
        if !protected {
            return Err(CoseError::UnknownCritical);
        }
        if !crit_seen[..n_crit_seen].contains(label) || !is_known_label(*label) {
            return Err(CoseError::UnknownCritical);
        }
    }
    // Mark the now-validated critical labels on their parameter nodes.
    for slot in pool.slots[..pool.used].iter_mut().flatten() {
        if slot.at(loc) && crit_required[..n_crit_required].contains(&slot.label) {
            slot.critical = true;
        }
    }
    Ok(())
}

/// Decode the protected (raw, possibly zero-length, CBOR-map-encoded) and unprotected header
/// maps for `loc` into `pool`.
pub fn decode_headers(
    protected_bytes: &[u8],
    unprotected: MapBuf,
    loc: Location,
    pool: &mut ParamPool,
) -> Result<()> {
    if !protected_bytes.is_empty() {
        let item = SequenceBuffer::new(protected_bytes)
            .into_iter()
            .next()
            .ok_or(CoseError::CborShape)?;
        let protected_map = MapBuf::try_from(item).map_err(|_| CoseError::CborShape)?;
        decode_map_into(protected_map, true, loc, pool)?;
    }
    decode_map_into(unprotected, false, loc, pool)
}
