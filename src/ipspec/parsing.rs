// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    strings::*,
    structs::{IpFam, IpSpec, Segment},
    validator::ValidatorConfig,
    ValidationError,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

lazy_static! {
    static ref IPV4_RE: Regex =
        Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$").unwrap();
    static ref V4_RANGE_RE: Regex = Regex::new(r"^[0-9]{1,3}-[0-9]{1,3}$").unwrap();
    static ref V6_RANGE_RE: Regex = Regex::new(r"^[a-fA-F0-9]{1,4}-[a-fA-F0-9]{1,4}$").unwrap();
    static ref V4_BITS_RE: Regex = Regex::new(r"^[0-9]{1,2}$").unwrap();
    static ref V6_BITS_RE: Regex = Regex::new(r"^[0-9]{1,3}$").unwrap();
    static ref DNS_RE: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*(\.[A-Za-z0-9_-]+)*$").unwrap();
    static ref USER_MACRO_RE: Regex = Regex::new(r"^\{\$[A-Z0-9_.]+(:.*)?\}$").unwrap();
}

/// Strict dotted-quad check: 4 components of 1-3 digits, each `0..=255`.
pub fn is_valid_ipv4(s: &str) -> bool {
    parse_ipv4(s).is_some()
}

/// Hex groups and colons only, in one of the full or `::` compressed forms.
pub fn is_valid_ipv6(s: &str) -> bool {
    parse_ipv6(s).is_some()
}

/// Unlike [Ipv4Addr]'s own parser, leading zeros (`010`) are accepted.
pub(crate) fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    let caps = IPV4_RE.captures(s)?;
    let mut octets: [u8; 4] = [0; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = caps[i + 1].parse::<u8>().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

/// Dotted-quad tails and zone ids are refused before handing off to [Ipv6Addr].
pub(crate) fn parse_ipv6(s: &str) -> Option<Ipv6Addr> {
    if !s.chars().all(|c: char| c.is_ascii_hexdigit() || c == COLON) {
        return None;
    }
    s.parse::<Ipv6Addr>().ok()
}

pub(crate) fn is_dns_name(s: &str) -> bool {
    DNS_RE.is_match(s)
}

pub(crate) fn is_user_macro(s: &str) -> bool {
    USER_MACRO_RE.is_match(s)
}

/* -------------------------------------------------------------------------- */

/**
Parse a network mask in the format `address/bits`.

`bits` is checked against the address width first ([ValidationError::MaskTooSmall])
and then against the configured prefix window ([ValidationError::MaskOutOfRange]).
*/
pub(crate) fn parse_mask(token: &str, cfg: &ValidatorConfig) -> Result<IpSpec, ValidationError> {
    let parts: Vec<&str> = token.split(SLASH).collect();
    if parts.len() != 2 {
        return Err(ValidationError::MalformedMask(token.into()));
    }

    let addr: IpAddr = if let Some(v4) = parse_ipv4(parts[0]) {
        IpAddr::V4(v4)
    } else if let Some(v6) = parse_ipv6(parts[0]).filter(|_| cfg.v6) {
        IpAddr::V6(v6)
    } else {
        return Err(ValidationError::InvalidAddress(token.into()));
    };
    let fam: IpFam = IpFam::of(&addr);

    let bits_re: &Regex = match fam {
        IpFam::V4 => &*V4_BITS_RE,
        IpFam::V6 => &*V6_BITS_RE,
    };
    if !bits_re.is_match(parts[1]) {
        return Err(ValidationError::MalformedMask(token.into()));
    }
    let bits: u16 = parts[1]
        .parse()
        .map_err(|_| ValidationError::MalformedMask(token.into()))?;

    if bits > fam.bits() as u16 {
        return Err(ValidationError::MaskTooSmall {
            mask: token.into(),
            bits,
        });
    }

    let bounds = cfg.prefix_bounds(fam);
    if !bounds.contains(bits) {
        return Err(ValidationError::MaskOutOfRange {
            mask: token.into(),
            bits,
            min: bounds.min,
            max: bounds.max,
        });
    }

    Ok(IpSpec::Mask {
        addr,
        bits: bits as u8,
    })
}

/**
Parse a single address or a range in the format:
- 192.168.1.1-254 (any octet may be ranged: 10.0-1.0.1-10)
- 2001:db8::1-ff (any hextet may be ranged, hex bounds)

The family is picked from the separators: a `.` means IPv4, else a `:`
means IPv6. Each ranged component is replaced by its low bound and the
resulting address is re-parsed strictly.

### Returns
- [IpSpec::Single] when no component is ranged, else [IpSpec::Range].
*/
pub(crate) fn parse_range(token: &str, cfg: &ValidatorConfig) -> Result<IpSpec, ValidationError> {
    let fam: IpFam = if token.contains(DOT) {
        IpFam::V4
    } else if cfg.v6 && token.contains(COLON) {
        IpFam::V6
    } else {
        return Err(ValidationError::InvalidAddress(token.into()));
    };

    let (delim, range_re, radix): (char, &Regex, u32) = match fam {
        IpFam::V4 => (DOT, &*V4_RANGE_RE, 10),
        IpFam::V6 => (COLON, &*V6_RANGE_RE, 16),
    };

    let parts: Vec<&str> = token.split(delim).collect();
    let mut ranged: Vec<(usize, Segment)> = Vec::new();
    let mut repr: Vec<String> = Vec::with_capacity(parts.len());

    for (i, part) in parts.iter().enumerate() {
        if !part.contains(DASH) {
            repr.push(part.to_string());
            continue;
        }
        if !cfg.ranges {
            return Err(ValidationError::RangesNotAllowed(token.into()));
        }
        let seg: Segment = parse_segment(part, range_re, radix, fam)
            .ok_or_else(|| ValidationError::MalformedRange(token.into()))?;
        repr.push(match fam {
            IpFam::V4 => seg.lo.to_string(),
            IpFam::V6 => format!("{:x}", seg.lo),
        });
        ranged.push((i, seg));
    }

    let repr: String = repr.join(&delim.to_string());
    let (addr, mut segments): (IpAddr, Vec<Segment>) = match fam {
        IpFam::V4 => parse_ipv4(&repr).map(|a: Ipv4Addr| {
            let segs: Vec<Segment> = a.octets().iter().map(|&o| Segment::single(o as u16)).collect();
            (IpAddr::V4(a), segs)
        }),
        IpFam::V6 => parse_ipv6(&repr).map(|a: Ipv6Addr| {
            let segs: Vec<Segment> = a.segments().iter().map(|&h| Segment::single(h)).collect();
            (IpAddr::V6(a), segs)
        }),
    }
    .ok_or_else(|| match ranged.is_empty() {
        true => ValidationError::InvalidAddress(token.into()),
        false => ValidationError::MalformedRange(token.into()),
    })?;

    if ranged.is_empty() {
        return Ok(IpSpec::Single(addr));
    }

    for (i, seg) in ranged {
        segments[segment_position(token, fam, parts.len(), i)] = seg;
    }
    Ok(IpSpec::Range { fam, segments })
}

/// Parse one `lo-hi` component. None if malformed, out of bounds or reversed.
fn parse_segment(part: &str, range_re: &Regex, radix: u32, fam: IpFam) -> Option<Segment> {
    if !range_re.is_match(part) {
        return None;
    }
    let (lo, hi) = part.split_once(DASH)?;
    let lo: u32 = u32::from_str_radix(lo, radix).ok()?;
    let hi: u32 = u32::from_str_radix(hi, radix).ok()?;
    if hi > fam.segment_max() as u32 || lo > hi {
        return None;
    }
    Some(Segment {
        lo: lo as u16,
        hi: hi as u16,
    })
}

/**
Map the index of a component in `token.split(delim)` to the octet/hextet
it stands for. Only valid for tokens whose representative address parsed,
and only for non-empty components.
*/
fn segment_position(token: &str, fam: IpFam, n_parts: usize, idx: usize) -> usize {
    if fam == IpFam::V4 {
        return idx;
    }
    match token.split_once(DOUBLE_COLON) {
        Some((left, _)) => {
            let n_left: usize = match left.is_empty() {
                true => 0,
                false => left.split(COLON).count(),
            };
            if idx < n_left {
                idx
            } else {
                fam.segments() - (n_parts - idx)
            }
        }
        None => idx,
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ValidatorConfig {
        ValidatorConfig::default()
    }

    fn range_segments(spec: IpSpec) -> Vec<Segment> {
        match spec {
            IpSpec::Range { segments, .. } => segments,
            other => panic!("expected a range, got {other:?}"),
        }
    }

    #[rustfmt::skip]
    #[test]
    fn test_ipv4_acceptance() {
        let good: Vec<&str> = vec![
            "0.0.0.0", "255.255.255.255", "192.168.1.1", "010.001.000.1",
        ];
        let bad: Vec<&str> = vec![
            "", "256.1.1.1", "1.1.1", "1.1.1.1.1", "1.1.1.1 ", " 1.1.1.1",
            "1.1.1.-1", "1.1.1.+1", "1.1.1.0001", "a.b.c.d", "1..1.1",
        ];
        for ip in good {
            assert!(is_valid_ipv4(ip), "should accept: '{ip}'");
        }
        for ip in bad {
            assert!(!is_valid_ipv4(ip), "should reject: '{ip}'");
        }
    }

    #[rustfmt::skip]
    #[test]
    fn test_ipv6_acceptance() {
        let good: Vec<&str> = vec![
            "2001:db8:0:0:0:0:0:1", "2001:DB8::1", "::", "::1", "fe80::",
            "1::2:3:4:5:6:7", "1:2:3:4:5:6::7", "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
        ];
        let bad: Vec<&str> = vec![
            "", ":", ":::", "1:2:3:4:5:6:7", "1:2:3:4:5:6:7:8:9", "1::2::3",
            "12345::", "g::1", "::ffff:1.2.3.4", "fe80::1%eth0", " ::1",
        ];
        for ip in good {
            assert!(is_valid_ipv6(ip), "should accept: '{ip}'");
        }
        for ip in bad {
            assert!(!is_valid_ipv6(ip), "should reject: '{ip}'");
        }
    }

    #[test]
    fn test_mask_v4() {
        let spec = parse_mask("10.0.0.0/24", &cfg()).unwrap();
        assert_eq!(
            spec,
            IpSpec::Mask {
                addr: "10.0.0.0".parse().unwrap(),
                bits: 24
            }
        );
    }

    #[test]
    fn test_mask_malformed() {
        for mask in ["10.0.0.0/24/1", "10.0.0.0/", "10.0.0.0/x", "10.0.0.0/024", "10.0.0.0/-1"] {
            let err = parse_mask(mask, &cfg()).unwrap_err();
            assert_eq!(err, ValidationError::MalformedMask(mask.into()), "{mask}");
        }
    }

    #[test]
    fn test_mask_too_small() {
        let err = parse_mask("10.0.0.0/33", &cfg()).unwrap_err();
        assert!(matches!(err, ValidationError::MaskTooSmall { bits: 33, .. }));
        let err = parse_mask("::/129", &cfg()).unwrap_err();
        assert!(matches!(err, ValidationError::MaskTooSmall { bits: 129, .. }));
    }

    #[test]
    fn test_mask_bad_address() {
        let err = parse_mask("10.0.0/24", &cfg()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAddress("10.0.0/24".into()));
    }

    #[test]
    fn test_mask_v6_disabled() {
        let no_v6 = ValidatorConfig {
            v6: false,
            ..Default::default()
        };
        let err = parse_mask("2001:db8::/120", &no_v6).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAddress("2001:db8::/120".into()));
    }

    #[test]
    fn test_range_single() {
        let spec = parse_range("192.168.1.1", &cfg()).unwrap();
        assert_eq!(spec, IpSpec::Single("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_range_v4_any_octet() {
        let segs = range_segments(parse_range("10.0-1.0.1-10", &cfg()).unwrap());
        assert_eq!(segs[1], Segment { lo: 0, hi: 1 });
        assert_eq!(segs[3], Segment { lo: 1, hi: 10 });
        assert_eq!(segs[0], Segment::single(10));
    }

    #[test]
    fn test_range_v4_malformed() {
        for rng in ["192.168.1.10-5", "192.168.1.1-256", "192.168.1.1-2-3", "192.168.1.-1", "192.168.1.1--2"] {
            let err = parse_range(rng, &cfg()).unwrap_err();
            assert_eq!(err, ValidationError::MalformedRange(rng.into()), "{rng}");
        }
    }

    #[test]
    fn test_range_v4_wrong_structure() {
        // ranged component, but 5 octets
        let err = parse_range("10.10.10.1-10.10", &cfg()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MalformedRange);
        // no range at all
        let err = parse_range("10.10.10", &cfg()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidAddress);
    }

    #[test]
    fn test_range_v6_positions() {
        let segs = range_segments(parse_range("2001:db8::1-a", &cfg()).unwrap());
        assert_eq!(segs[7], Segment { lo: 1, hi: 0xa });
        assert_eq!(segs[0], Segment::single(0x2001));

        let segs = range_segments(parse_range("1-2::", &cfg()).unwrap());
        assert_eq!(segs[0], Segment { lo: 1, hi: 2 });

        let segs = range_segments(parse_range("::5-6:1", &cfg()).unwrap());
        assert_eq!(segs[6], Segment { lo: 5, hi: 6 });
        assert_eq!(segs[7], Segment::single(1));

        let segs = range_segments(parse_range("1:0-F:3:4:5:6:7:8", &cfg()).unwrap());
        assert_eq!(segs[1], Segment { lo: 0, hi: 0xf });
    }

    #[test]
    fn test_range_v6_malformed() {
        for rng in ["::a-1", "::1-fffff", "::1-g", "::1-2-3"] {
            let err = parse_range(rng, &cfg()).unwrap_err();
            assert_eq!(err, ValidationError::MalformedRange(rng.into()), "{rng}");
        }
    }

    #[test]
    fn test_range_unknown_family() {
        let err = parse_range("localhost", &cfg()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAddress("localhost".into()));
    }

    #[test]
    fn test_range_not_allowed() {
        let no_ranges = ValidatorConfig {
            ranges: false,
            ..Default::default()
        };
        let err = parse_range("10.0.0.1-5", &no_ranges).unwrap_err();
        assert_eq!(err, ValidationError::RangesNotAllowed("10.0.0.1-5".into()));
        assert!(parse_range("10.0.0.1", &no_ranges).is_ok());
    }

    #[test]
    fn test_names_and_macros() {
        assert!(is_dns_name("zabbix.example.com"));
        assert!(is_dns_name("my-host"));
        assert!(!is_dns_name("-bad.example.com"));
        assert!(!is_dns_name("bad..example.com"));
        assert!(is_user_macro("{$DISCOVERY.NET}"));
        assert!(is_user_macro("{$NET:\"lan\"}"));
        assert!(!is_user_macro("{$lower}"));
        assert!(!is_user_macro("{#LLD}"));
    }
}
