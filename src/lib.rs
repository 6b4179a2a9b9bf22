// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Validation of comma-separated IP specification lists, as used to describe
the targets of a network discovery or scan job:

```text
127.0.0.1,192.168.1.1-254,10.0-3.0.1,192.168.3.0/24,2001:db8::1-ff
```

Each entry is a single address, an `address/bits` network mask, or an
address where one or more octets (hextets for IPv6) are `lo-hi` ranges.
Besides syntax, the validator bounds mask widths and caps the number of
addresses any single entry may imply, so that a typo cannot turn a scan
of 254 hosts into one of 2^80.

```
use ipspec::{validate, ErrorKind, DISCOVERY_RANGE_LIMIT};

assert!(validate("192.168.1.1-254,10.0.0.0/24", DISCOVERY_RANGE_LIMIT, false).is_ok());

let err = validate("192.168.1.1-100", 50, false).unwrap_err();
assert_eq!(err.kind(), ErrorKind::AddressCountExceeded);
```
*/

mod ipspec;

pub use ipspec::{
    is_valid_ipv4, is_valid_ipv6, validate, AddressCount, ErrorKind, IpFam, IpSpec, IpSpecIter,
    IpSpecValidator, PrefixBounds, Segment, ValidationError, ValidatorConfig,
    DISCOVERY_RANGE_LIMIT,
};
