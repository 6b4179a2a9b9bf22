// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use ipspec::{AddressCount, IpSpec, IpSpecValidator, ValidatorConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Validate comma-separated IP specification lists.
#[derive(Parser, Debug)]
#[command(name = "ipspec-check", version)]
struct Args {
    /// Max addresses per entry (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max: u64,
    /// Accept an empty list
    #[arg(long)]
    allow_empty: bool,
    /// Reject IPv6
    #[arg(long)]
    no_v6: bool,
    /// Reject ranges and masks
    #[arg(long)]
    no_ranges: bool,
    /// Accept DNS names
    #[arg(long)]
    dns: bool,
    /// Accept {$MACRO} entries
    #[arg(long)]
    macros: bool,
    /// Report every bad entry instead of the first one
    #[arg(long)]
    all: bool,
    /// Lists to validate, f.ex. "192.168.1.1-254,10.0.0.0/24"
    #[arg(required = true)]
    specs: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Args = Args::parse();
    let validator = IpSpecValidator::new(ValidatorConfig {
        v6: !args.no_v6,
        ranges: !args.no_ranges,
        dns: args.dns,
        usermacros: args.macros,
        allow_empty: args.allow_empty,
        max_address_count: args.max,
        ..Default::default()
    });

    let mut failed: bool = false;
    for spec in &args.specs {
        if args.all {
            let errors = validator.validate_all(spec);
            if errors.is_empty() {
                eprintln!("OK '{spec}'");
            }
            for (i, e) in errors {
                eprintln!("FAIL '{spec}' entry {}: {e}", i + 1);
                failed = true;
            }
            continue;
        }

        match validator.parse(spec) {
            Ok(entries) => {
                let total: AddressCount = entries.iter().map(IpSpec::address_count).sum();
                eprintln!("OK '{spec}': {} entries, {total} addresses", entries.len());
            }
            Err(e) => {
                eprintln!("FAIL '{spec}': {e}");
                failed = true;
            }
        }
    }

    match failed {
        true => ExitCode::FAILURE,
        false => ExitCode::SUCCESS,
    }
}
