// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{strings::*, IPV4_BITS, IPV4_SEGMENTS, IPV6_BITS, IPV6_SEGMENTS};
use ipnet::{IpAddrRange, IpNet, Ipv4AddrRange, Ipv6AddrRange};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    iter::Sum,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

/// IP address family
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFam {
    V4,
    V6,
}

impl IpFam {
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => IpFam::V4,
            IpAddr::V6(_) => IpFam::V6,
        }
    }

    /// Address width in bits.
    pub fn bits(self) -> u8 {
        match self {
            IpFam::V4 => IPV4_BITS,
            IpFam::V6 => IPV6_BITS,
        }
    }

    /// Number of octets (v4) or hextets (v6) in an address.
    pub fn segments(self) -> usize {
        match self {
            IpFam::V4 => IPV4_SEGMENTS,
            IpFam::V6 => IPV6_SEGMENTS,
        }
    }

    /// Largest value of a single octet/hextet.
    pub fn segment_max(self) -> u16 {
        match self {
            IpFam::V4 => u8::MAX as u16,
            IpFam::V6 => u16::MAX,
        }
    }
}

/* -------------------------------------------------------------------------- */

/**
Number of addresses implied by an [IpSpec].

Saturates at [u128::MAX] instead of wrapping, so comparisons against any
`u64` limit stay correct even when the true count is 2^128.
*/
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AddressCount(u128);

impl AddressCount {
    pub const ONE: AddressCount = AddressCount(1);

    pub fn new(count: u128) -> Self {
        Self(count)
    }

    /// Addresses in a block with `host_bits` free bits.
    pub fn of_host_bits(host_bits: u8) -> Self {
        // 2^128 does not fit in u128
        if host_bits >= IPV6_BITS {
            return Self(u128::MAX);
        }
        Self(1u128 << host_bits)
    }

    pub fn get(&self) -> u128 {
        self.0
    }

    /// True when the real count is at least [u128::MAX].
    pub fn is_saturated(&self) -> bool {
        self.0 == u128::MAX
    }

    /// Whether this count is over `limit`. A zero limit means "unlimited".
    pub fn exceeds(&self, limit: u64) -> bool {
        limit != 0 && self.0 > limit as u128
    }

    pub fn saturating_mul(self, other: Self) -> Self {
        Self(self.0.saturating_mul(other.0))
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.is_saturated() {
            true => write!(f, "{}+", self.0),
            false => write!(f, "{}", self.0),
        }
    }
}

impl Sum for AddressCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(AddressCount::default(), AddressCount::saturating_add)
    }
}

/* -------------------------------------------------------------------------- */

/// Inclusive bounds of one octet/hextet of a range spec.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Segment {
    pub lo: u16,
    /// inclusive
    pub hi: u16,
}

impl Segment {
    pub fn single(val: u16) -> Self {
        Self { lo: val, hi: val }
    }

    pub fn len(&self) -> u128 {
        self.hi.saturating_sub(self.lo) as u128 + 1
    }
}

/// One comma-separated entry of an IP specification list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IpSpec {
    /// literal address
    Single(IpAddr),
    /// `address/bits`
    Mask { addr: IpAddr, bits: u8 },
    /// address with one or more `lo-hi` components, one [Segment] per octet/hextet
    Range { fam: IpFam, segments: Vec<Segment> },
    /// DNS name, only when enabled in the validator config
    Dns(String),
    /// `{$MACRO}`, only when enabled in the validator config
    UserMacro(String),
}

impl IpSpec {
    pub fn address_count(&self) -> AddressCount {
        match self {
            IpSpec::Single(_) | IpSpec::Dns(_) | IpSpec::UserMacro(_) => AddressCount::ONE,
            IpSpec::Mask { addr, bits } => {
                let width: u8 = IpFam::of(addr).bits();
                AddressCount::of_host_bits(width.saturating_sub(*bits))
            }
            IpSpec::Range { segments, .. } => segments
                .iter()
                .map(|s: &Segment| AddressCount::new(s.len()))
                .fold(AddressCount::ONE, AddressCount::saturating_mul),
        }
    }

    /// Address family, or None for names and macros.
    pub fn family(&self) -> Option<IpFam> {
        match self {
            IpSpec::Single(addr) | IpSpec::Mask { addr, .. } => Some(IpFam::of(addr)),
            IpSpec::Range { fam, .. } => Some(*fam),
            IpSpec::Dns(_) | IpSpec::UserMacro(_) => None,
        }
    }

    /**
    Returns an iterator over all [IpAddr]s this entry implies, in ascending
    order. Masks yield the whole block, network and broadcast included.
    Names and macros cannot be resolved here and yield nothing.

    NOTE: check [IpSpec::address_count] first. An IPv6 range can be huge.
    */
    pub fn iter(&self) -> IpSpecIter {
        IpSpecIter::new(self)
    }
}

impl fmt::Display for IpSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpSpec::Single(addr) => write!(f, "{addr}"),
            IpSpec::Mask { addr, bits } => write!(f, "{addr}{SLASH}{bits}"),
            IpSpec::Dns(name) | IpSpec::UserMacro(name) => write!(f, "{name}"),
            IpSpec::Range { fam, segments } => {
                let delim: char = match fam {
                    IpFam::V4 => DOT,
                    IpFam::V6 => COLON,
                };
                for (i, s) in segments.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{delim}")?;
                    }
                    match (fam, s.lo == s.hi) {
                        (IpFam::V4, true) => write!(f, "{}", s.lo)?,
                        (IpFam::V4, false) => write!(f, "{}{DASH}{}", s.lo, s.hi)?,
                        (IpFam::V6, true) => write!(f, "{:x}", s.lo)?,
                        (IpFam::V6, false) => write!(f, "{:x}{DASH}{:x}", s.lo, s.hi)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl<'a> IntoIterator for &'a IpSpec {
    type Item = IpAddr;
    type IntoIter = IpSpecIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/* ---------------------------------- */

enum IterState {
    Done,
    Block(IpAddrRange),
    Product {
        fam: IpFam,
        segments: Vec<Segment>,
        current: Vec<u16>,
    },
}

/// Iterator over the addresses of an [IpSpec].
pub struct IpSpecIter {
    state: IterState,
}

impl IpSpecIter {
    fn new(spec: &IpSpec) -> Self {
        let state: IterState = match spec {
            IpSpec::Single(addr) => IterState::Block(single_block(*addr)),
            IpSpec::Mask { addr, bits } => match IpNet::new(*addr, *bits) {
                Ok(IpNet::V4(net)) => {
                    IterState::Block(IpAddrRange::V4(Ipv4AddrRange::new(
                        net.network(),
                        net.broadcast(),
                    )))
                }
                Ok(IpNet::V6(net)) => {
                    IterState::Block(IpAddrRange::V6(Ipv6AddrRange::new(
                        net.network(),
                        net.broadcast(),
                    )))
                }
                Err(_) => IterState::Done,
            },
            IpSpec::Range { fam, segments } => IterState::Product {
                fam: *fam,
                current: segments.iter().map(|s: &Segment| s.lo).collect(),
                segments: segments.clone(),
            },
            IpSpec::Dns(_) | IpSpec::UserMacro(_) => IterState::Done,
        };
        IpSpecIter { state }
    }
}

fn single_block(addr: IpAddr) -> IpAddrRange {
    match addr {
        IpAddr::V4(a) => IpAddrRange::V4(Ipv4AddrRange::new(a, a)),
        IpAddr::V6(a) => IpAddrRange::V6(Ipv6AddrRange::new(a, a)),
    }
}

fn segments_to_ip(fam: IpFam, vals: &[u16]) -> IpAddr {
    match fam {
        IpFam::V4 => {
            let mut octets: [u8; 4] = [0; 4];
            for (o, v) in octets.iter_mut().zip(vals) {
                *o = *v as u8;
            }
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        IpFam::V6 => {
            let mut hextets: [u16; 8] = [0; 8];
            for (h, v) in hextets.iter_mut().zip(vals) {
                *h = *v;
            }
            IpAddr::V6(Ipv6Addr::from(hextets))
        }
    }
}

impl Iterator for IpSpecIter {
    type Item = IpAddr;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            IterState::Done => None,
            IterState::Block(block) => block.next(),
            IterState::Product { fam, segments, current } => {
                let ip: IpAddr = segments_to_ip(*fam, current.as_slice());

                // odometer, last segment turns fastest
                let mut exhausted: bool = true;
                for (val, seg) in current.iter_mut().zip(segments.iter()).rev() {
                    if *val < seg.hi {
                        *val += 1;
                        exhausted = false;
                        break;
                    }
                    *val = seg.lo;
                }
                if exhausted {
                    self.state = IterState::Done;
                }

                Some(ip)
            }
        }
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_V4: &str = "10.0.0.1";
    const TEST_V6: &str = "2001:db8::1";

    fn v4_range(spans: [(u16, u16); 4]) -> IpSpec {
        IpSpec::Range {
            fam: IpFam::V4,
            segments: spans.iter().map(|&(lo, hi)| Segment { lo, hi }).collect(),
        }
    }

    #[test]
    fn test_count_of_host_bits() {
        assert_eq!(AddressCount::of_host_bits(0).get(), 1);
        assert_eq!(AddressCount::of_host_bits(16).get(), 65536);
        assert!(AddressCount::of_host_bits(128).is_saturated());
    }

    #[test]
    fn test_count_exceeds() {
        let count = AddressCount::new(50);
        assert!(!count.exceeds(0));
        assert!(!count.exceeds(50));
        assert!(count.exceeds(49));
        assert!(AddressCount::new(u128::MAX).exceeds(u64::MAX));
    }

    #[test]
    fn test_count_sum_saturates() {
        let total: AddressCount = [AddressCount::new(u128::MAX), AddressCount::new(5)]
            .into_iter()
            .sum();
        assert!(total.is_saturated());
        assert_eq!(total.to_string(), format!("{}+", u128::MAX));
    }

    #[test]
    fn test_range_count() {
        let spec = v4_range([(192, 192), (168, 168), (0, 1), (1, 10)]);
        assert_eq!(spec.address_count().get(), 20);
        assert_eq!(spec.to_string(), "192.168.0-1.1-10");
    }

    #[test]
    fn test_range_count_v6_saturates() {
        let spec = IpSpec::Range {
            fam: IpFam::V6,
            segments: vec![Segment { lo: 0, hi: 0xffff }; 8],
        };
        assert!(spec.address_count().is_saturated());
    }

    #[test]
    fn test_mask_count() {
        let spec = IpSpec::Mask {
            addr: TEST_V4.parse().unwrap(),
            bits: 24,
        };
        assert_eq!(spec.address_count().get(), 256);
        assert_eq!(spec.to_string(), "10.0.0.1/24");
    }

    #[test]
    fn test_iter_single() {
        let spec = IpSpec::Single(TEST_V6.parse().unwrap());
        let ips: Vec<IpAddr> = spec.iter().collect();
        assert_eq!(ips, vec![TEST_V6.parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn test_iter_mask_whole_block() {
        let spec = IpSpec::Mask {
            addr: "192.168.1.2".parse().unwrap(),
            bits: 30,
        };
        let ips: Vec<IpAddr> = spec.iter().collect();
        let expected: Vec<IpAddr> = vec![
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 0)),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2)),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 3)),
        ];
        assert_eq!(ips, expected);
    }

    #[test]
    fn test_iter_range_product() {
        let spec = v4_range([(10, 10), (0, 0), (1, 2), (5, 6)]);
        let ips: Vec<IpAddr> = spec.iter().collect();
        let expected: Vec<IpAddr> = vec![
            IpAddr::V4(Ipv4Addr::new(10, 0, 1, 5)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 1, 6)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 2, 5)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 2, 6)),
        ];
        assert_eq!(ips, expected);
        assert_eq!(ips.len() as u128, spec.address_count().get());
    }

    #[test]
    fn test_iter_range_top_of_segment() {
        let spec = v4_range([(10, 10), (0, 0), (0, 0), (254, 255)]);
        let ips: Vec<IpAddr> = spec.iter().collect();
        assert_eq!(ips.len(), 2);
        assert_eq!(ips[1], IpAddr::V4(Ipv4Addr::new(10, 0, 0, 255)));
    }

    #[test]
    fn test_iter_names_empty() {
        assert_eq!(IpSpec::Dns("example.com".into()).iter().count(), 0);
        assert_eq!(IpSpec::UserMacro("{$NET}".into()).iter().count(), 0);
    }
}
