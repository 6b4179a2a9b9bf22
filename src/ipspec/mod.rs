// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation of comma-separated IP specifications: single addresses,
//! network masks (`10.0.0.0/24`) and per-component ranges (`10.0.0.1-254`).

mod parsing;
mod strings;
mod structs;
mod validator;

use std::{error, fmt};
use strings::*;

pub use parsing::{is_valid_ipv4, is_valid_ipv6};
pub use structs::{AddressCount, IpFam, IpSpec, IpSpecIter, Segment};
pub use validator::{validate, IpSpecValidator, PrefixBounds, ValidatorConfig};

pub(crate) const IPV4_BITS: u8 = 32;
pub(crate) const IPV6_BITS: u8 = 128;
pub(crate) const IPV4_SEGMENTS: usize = 4;
pub(crate) const IPV6_SEGMENTS: usize = 8;

/// Address count cap used by network discovery rules. Never applied implicitly.
pub const DISCOVERY_RANGE_LIMIT: u64 = 65536;

/// Kind of a [ValidationError], without the offending input attached.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    EmptyInput,
    ValueTooLong,
    InvalidAddress,
    MalformedMask,
    MaskTooSmall,
    MaskOutOfRange,
    MalformedRange,
    RangesNotAllowed,
    AddressCountExceeded,
}

#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    /// empty input where a value is required
    EmptyInput,
    /// input longer than the configured maximum (in characters)
    ValueTooLong { len: usize, max: usize },
    InvalidAddress(String),
    /// wrong number of slashes or non-numeric mask bits
    MalformedMask(String),
    /// mask bits exceed the address width
    MaskTooSmall { mask: String, bits: u16 },
    /// mask bits outside the configured `min..=max` window
    MaskOutOfRange { mask: String, bits: u16, min: u8, max: u8 },
    MalformedRange(String),
    RangesNotAllowed(String),
    AddressCountExceeded { token: String, count: AddressCount, limit: u64 },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::EmptyInput => ErrorKind::EmptyInput,
            ValidationError::ValueTooLong { .. } => ErrorKind::ValueTooLong,
            ValidationError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            ValidationError::MalformedMask(_) => ErrorKind::MalformedMask,
            ValidationError::MaskTooSmall { .. } => ErrorKind::MaskTooSmall,
            ValidationError::MaskOutOfRange { .. } => ErrorKind::MaskOutOfRange,
            ValidationError::MalformedRange(_) => ErrorKind::MalformedRange,
            ValidationError::RangesNotAllowed(_) => ErrorKind::RangesNotAllowed,
            ValidationError::AddressCountExceeded { .. } => ErrorKind::AddressCountExceeded,
        }
    }

    /// The offending token, if the error concerns a single comma-separated entry.
    pub fn token(&self) -> Option<&str> {
        match self {
            ValidationError::EmptyInput | ValidationError::ValueTooLong { .. } => None,
            ValidationError::InvalidAddress(t)
            | ValidationError::MalformedMask(t)
            | ValidationError::MalformedRange(t)
            | ValidationError::RangesNotAllowed(t) => Some(t),
            ValidationError::MaskTooSmall { mask, .. }
            | ValidationError::MaskOutOfRange { mask, .. } => Some(mask),
            ValidationError::AddressCountExceeded { token, .. } => Some(token),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyInput => {
                write!(f, "{ERR_EMPTY}")
            }
            ValidationError::ValueTooLong { len, max } => {
                write!(f, "{ERR_TOO_LONG}: {len} characters (max {max})")
            }
            ValidationError::InvalidAddress(ip) => {
                write!(f, "{ERR_INVALID_IP}: '{ip}'")
            }
            ValidationError::MalformedMask(mask) => {
                write!(f, "{ERR_MASK_FMT}: '{mask}'")
            }
            ValidationError::MaskTooSmall { mask, bits } => {
                write!(f, "{ERR_MASK_TOO_SMALL}: '{mask}' (/{bits})")
            }
            ValidationError::MaskOutOfRange { mask, bits, min, max } => {
                if *bits < *min as u16 {
                    write!(f, "{ERR_MASK_TOO_MANY}: '{mask}' (min /{min})")
                } else {
                    write!(f, "{ERR_MASK_RESTRICTIVE}: '{mask}' (max /{max})")
                }
            }
            ValidationError::MalformedRange(rng) => {
                write!(f, "{ERR_RNG_FMT}: '{rng}'")
            }
            ValidationError::RangesNotAllowed(rng) => {
                write!(f, "{ERR_RNG_NOT_ALLOWED}: '{rng}'")
            }
            ValidationError::AddressCountExceeded { token, count, limit } => {
                write!(f, "{ERR_RNG_TOOLARGE}: {count} in '{token}' (max {limit})")
            }
        }
    }
}

impl error::Error for ValidationError {}

/* -------------------------------------------------------------------------- */
