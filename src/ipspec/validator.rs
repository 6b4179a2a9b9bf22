// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    parsing::{is_dns_name, is_user_macro, parse_mask, parse_range},
    strings::*,
    structs::{IpFam, IpSpec},
    ErrorKind, ValidationError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Accepted window of mask bits, inclusive on both ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PrefixBounds {
    pub min: u8,
    pub max: u8,
}

impl PrefixBounds {
    /// `/16` (65536 addresses) up to `/30` (4 addresses).
    pub const V4: PrefixBounds = PrefixBounds { min: 16, max: 30 };
    /// `/112` (65536 addresses) up to `/128` (single host).
    pub const V6: PrefixBounds = PrefixBounds { min: 112, max: 128 };

    pub fn contains(&self, bits: u16) -> bool {
        bits >= self.min as u16 && bits <= self.max as u16
    }
}

/**
Validator settings. Every field has a default, so a partial document
(f.ex. `{"max_address_count": 65536}`) deserializes fine.
*/
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// accept IPv6 addresses, masks and ranges
    pub v6: bool,
    /// accept `lo-hi` components and `address/bits` masks
    pub ranges: bool,
    /// accept DNS names in place of addresses
    pub dns: bool,
    /// accept `{$MACRO}` entries
    pub usermacros: bool,
    /// accept an empty list
    pub allow_empty: bool,
    /// per-entry cap on implied addresses; 0 = unlimited
    pub max_address_count: u64,
    /// cap on the whole input, in characters
    pub max_length: Option<usize>,
    pub v4_prefix: PrefixBounds,
    pub v6_prefix: PrefixBounds,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            v6: true,
            ranges: true,
            dns: false,
            usermacros: false,
            allow_empty: false,
            max_address_count: 0,
            max_length: None,
            v4_prefix: PrefixBounds::V4,
            v6_prefix: PrefixBounds::V6,
        }
    }
}

impl ValidatorConfig {
    pub fn prefix_bounds(&self, fam: IpFam) -> PrefixBounds {
        match fam {
            IpFam::V4 => self.v4_prefix,
            IpFam::V6 => self.v6_prefix,
        }
    }
}

/* -------------------------------------------------------------------------- */

/**
Validator for comma-separated IP specification lists, f.ex.
`127.0.0.1,192.168.1.1-254,192.168.3.0/24,2001:db8::1-ff`.

Tokens are split on `,` and never trimmed, so `"1.1.1.1, 2.2.2.2"` is
invalid. The address cap applies to each token on its own, not to the
sum over the list.
*/
#[derive(Clone, Debug, Default)]
pub struct IpSpecValidator {
    config: ValidatorConfig,
}

impl IpSpecValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a whole list. Stops at the first bad token.
    pub fn validate(&self, spec: &str) -> Result<(), ValidationError> {
        self.parse(spec).map(|_| ())
    }

    /// Parse a whole list into its entries. Stops at the first bad token.
    pub fn parse(&self, spec: &str) -> Result<Vec<IpSpec>, ValidationError> {
        if self.check_input(spec)? {
            return Ok(Vec::new());
        }
        spec.split(COMMA).map(|token: &str| self.parse_token(token)).collect()
    }

    /**
    Validate every token of a list and collect all failures, each paired
    with the index of its token. An empty result means the list is valid.
    */
    pub fn validate_all(&self, spec: &str) -> Vec<(usize, ValidationError)> {
        match self.check_input(spec) {
            Ok(true) => return Vec::new(),
            Ok(false) => {}
            Err(e) => return vec![(0, e)],
        }
        spec.split(COMMA)
            .enumerate()
            .filter_map(|(i, token)| self.parse_token(token).err().map(|e| (i, e)))
            .collect()
    }

    /// Parse and check one token, including the address cap.
    pub fn parse_token(&self, token: &str) -> Result<IpSpec, ValidationError> {
        let spec: IpSpec = self.classify(token).map_err(|e: ValidationError| {
            debug!("rejected IP spec '{token}': {e}");
            e
        })?;

        let count = spec.address_count();
        if count.exceeds(self.config.max_address_count) {
            debug!(
                "IP spec '{token}' implies {count} addresses (max {})",
                self.config.max_address_count
            );
            return Err(ValidationError::AddressCountExceeded {
                token: token.into(),
                count,
                limit: self.config.max_address_count,
            });
        }

        trace!("accepted IP spec '{token}': {count} address(es)");
        Ok(spec)
    }

    /// Empty and length checks. Ok(true) means an accepted empty list.
    fn check_input(&self, spec: &str) -> Result<bool, ValidationError> {
        if spec.is_empty() {
            return match self.config.allow_empty {
                true => Ok(true),
                false => Err(ValidationError::EmptyInput),
            };
        }
        if let Some(max) = self.config.max_length {
            let len: usize = spec.chars().count();
            if len > max {
                return Err(ValidationError::ValueTooLong { len, max });
            }
        }
        Ok(false)
    }

    fn classify(&self, token: &str) -> Result<IpSpec, ValidationError> {
        let cfg: &ValidatorConfig = &self.config;

        if cfg.usermacros && is_user_macro(token) {
            return Ok(IpSpec::UserMacro(token.into()));
        }

        if token.contains(SLASH) {
            if !cfg.ranges {
                return Err(ValidationError::RangesNotAllowed(token.into()));
            }
            return parse_mask(token, cfg);
        }

        match parse_range(token, cfg) {
            Err(e) if cfg.dns && e.kind() == ErrorKind::InvalidAddress && is_dns_name(token) => {
                Ok(IpSpec::Dns(token.into()))
            }
            other => other,
        }
    }
}

/**
Validate a comma-separated IP specification list with default settings
(IPv4 + IPv6, ranges and masks allowed, mask windows `/16..=/30` and
`/112..=/128`).

`max_address_count` caps the addresses implied by each entry on its own;
0 means unlimited.
*/
pub fn validate(spec: &str, max_address_count: u64, allow_empty: bool) -> Result<(), ValidationError> {
    IpSpecValidator::new(ValidatorConfig {
        max_address_count,
        allow_empty,
        ..Default::default()
    })
    .validate(spec)
}

/* -------------------------------------------------------------------------- */
