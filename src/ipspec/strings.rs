// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static COMMA: char = ',';
pub(crate) static DASH: char = '-';
pub(crate) static SLASH: char = '/';
pub(crate) static DOT: char = '.';
pub(crate) static COLON: char = ':';
pub(crate) static DOUBLE_COLON: &str = "::";

// mod.rs
pub(crate) static ERR_EMPTY: &str = "cannot be empty";
pub(crate) static ERR_TOO_LONG: &str = "value is too long";
pub(crate) static ERR_INVALID_IP: &str = "invalid IP address";
pub(crate) static ERR_MASK_FMT: &str = "invalid network mask format";
pub(crate) static ERR_MASK_TOO_SMALL: &str = "mask is wider than the address";
pub(crate) static ERR_MASK_TOO_MANY: &str = "mask implies too many IP addresses";
pub(crate) static ERR_MASK_RESTRICTIVE: &str = "mask too small, no usable host range";
pub(crate) static ERR_RNG_FMT: &str = "invalid IP range";
pub(crate) static ERR_RNG_NOT_ALLOWED: &str = "IP ranges and masks are not allowed";
pub(crate) static ERR_RNG_TOOLARGE: &str = "IP range too large - addresses";

