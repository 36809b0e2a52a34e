//! Variable-length integer codec
//!
//! The chain serializes arbitrary-precision integers in two base-128
//! little-endian-group forms. The unsigned form (`nat`) carries the money
//! and counter fields of operation contents; the sign-aware form (`int`)
//! carries integer literals inside script expressions. Each byte holds a
//! value chunk in its low bits and a continuation flag in the high bit; the
//! first byte of the signed form additionally reserves bit 6 for the sign.

use crate::{Error, Result};
use num_bigint::{BigInt as NumBigInt, BigUint, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Upper bound on one encoded integer. Decoding is bounded by input size
/// anyway; this rejects absurd values long before allocation matters.
const MAX_ENCODED_LEN: usize = 512;

/// Arbitrary-precision integer value
///
/// Wraps [`num_bigint::BigInt`] and serializes to JSON as a decimal string,
/// the chain's RPC convention for money and counter fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigInt(NumBigInt);

impl BigInt {
    /// Wrap an existing value
    pub fn new(inner: NumBigInt) -> Self {
        Self(inner)
    }

    /// Zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// Borrow the underlying value
    pub fn as_inner(&self) -> &NumBigInt {
        &self.0
    }

    /// Unwrap the underlying value
    pub fn into_inner(self) -> NumBigInt {
        self.0
    }

    /// Encode in the unsigned (`nat`) wire form.
    ///
    /// Negative values have no `nat` representation and fail with
    /// [`Error::MalformedInteger`]; accepting them would silently produce
    /// a different on-chain operation.
    pub fn to_bytes_nat(&self) -> Result<Vec<u8>> {
        let (sign, magnitude) = self.0.clone().into_parts();
        if sign == Sign::Minus {
            return Err(Error::MalformedInteger(
                "negative value in unsigned field".to_string(),
            ));
        }

        // Base-128 digits, little-endian; all but the last get the
        // continuation bit. Zero encodes as a single 0x00 byte.
        let mut out = magnitude.to_radix_le(128);
        let last = out.len() - 1;
        for byte in &mut out[..last] {
            *byte |= 0x80;
        }
        Ok(out)
    }

    /// Decode the unsigned (`nat`) wire form, returning the value and the
    /// number of bytes consumed.
    pub fn from_bytes_nat(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut digits = Vec::new();
        for (i, &byte) in bytes.iter().enumerate() {
            if i >= MAX_ENCODED_LEN {
                return Err(Error::MalformedInteger(format!(
                    "encoding exceeds {MAX_ENCODED_LEN} bytes"
                )));
            }
            digits.push(byte & 0x7f);
            if byte & 0x80 == 0 {
                let magnitude = BigUint::from_radix_le(&digits, 128)
                    .ok_or_else(|| Error::MalformedInteger("invalid digits".to_string()))?;
                return Ok((Self(magnitude.into()), i + 1));
            }
        }
        Err(Error::MalformedInteger(
            "input ended inside an integer".to_string(),
        ))
    }

    /// Encode in the sign-aware (`int`) wire form.
    pub fn to_bytes_int(&self) -> Vec<u8> {
        let (sign, magnitude) = self.0.clone().into_parts();
        let negative = sign == Sign::Minus;

        let low6 = (&magnitude & BigUint::from(0x3fu8)).to_bytes_le()[0];
        let mut rest = magnitude >> 6u32;

        let mut first = low6;
        if negative {
            first |= 0x40;
        }
        if rest.bits() > 0 {
            first |= 0x80;
        }

        let mut out = vec![first];
        while rest.bits() > 0 {
            let mut byte = (&rest & BigUint::from(0x7fu8)).to_bytes_le()[0];
            rest >>= 7u32;
            if rest.bits() > 0 {
                byte |= 0x80;
            }
            out.push(byte);
        }
        out
    }

    /// Decode the sign-aware (`int`) wire form, returning the value and the
    /// number of bytes consumed.
    pub fn from_bytes_int(bytes: &[u8]) -> Result<(Self, usize)> {
        let first = *bytes.first().ok_or_else(|| {
            Error::MalformedInteger("input ended inside an integer".to_string())
        })?;
        let negative = first & 0x40 != 0;
        let mut magnitude = BigUint::from(first & 0x3f);
        let mut consumed = 1;

        if first & 0x80 != 0 {
            let mut shift = 6usize;
            let mut terminated = false;
            for &byte in &bytes[1..] {
                if consumed >= MAX_ENCODED_LEN {
                    return Err(Error::MalformedInteger(format!(
                        "encoding exceeds {MAX_ENCODED_LEN} bytes"
                    )));
                }
                magnitude |= BigUint::from(byte & 0x7f) << shift;
                shift += 7;
                consumed += 1;
                if byte & 0x80 == 0 {
                    terminated = true;
                    break;
                }
            }
            if !terminated {
                return Err(Error::MalformedInteger(
                    "input ended inside an integer".to_string(),
                ));
            }
        }

        let value = NumBigInt::from_biguint(
            if negative { Sign::Minus } else { Sign::Plus },
            magnitude,
        );
        Ok((Self(value), consumed))
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for BigInt {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NumBigInt::from_str(s)
            .map(Self)
            .map_err(|e| Error::MalformedInteger(e.to_string()))
    }
}

impl From<NumBigInt> for BigInt {
    fn from(inner: NumBigInt) -> Self {
        Self(inner)
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl From<i64> for BigInt {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl Serialize for BigInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
