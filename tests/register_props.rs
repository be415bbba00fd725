//! Property tests for the register decoder

// Copyright (c) 2025 Ferrous Systems
// SPDX-License-Identifier: GPL-3.0-or-later

use proptest::prelude::*;
use trapdump::{FormatFlags, RCON_BITS, RegisterDescriptor};

fn flags() -> impl Strategy<Value = FormatFlags> {
    (0u16..16).prop_map(|bits| FormatFlags::from_bits_truncate(bits << 1))
}

fn render(desc: &RegisterDescriptor) -> String {
    let mut s = String::new();
    desc.render(&mut s).unwrap();
    s
}

proptest! {
    #[test]
    fn same_output_every_time(value: u16, flags in flags()) {
        let desc = RegisterDescriptor::new("RCON", 0x0740, value, flags)
            .with_bit_names(Some(&RCON_BITS));
        prop_assert_eq!(render(&desc), render(&desc));
    }

    #[test]
    fn zero_is_hex_only(flags in flags()) {
        let desc = RegisterDescriptor::new("w7", 0x000E, 0, flags);
        prop_assert_eq!(render(&desc), "\n  w7       0x0000");
    }

    #[test]
    fn non_negative_decimal_appears_once(value in 1u16..0x8000) {
        let desc = RegisterDescriptor::new(
            "w7",
            0x000E,
            value,
            FormatFlags::DECIMAL | FormatFlags::UNSIGNED,
        );
        let line = render(&desc);
        let number = value.to_string();
        let count = line
            .split_whitespace()
            .filter(|word| *word == number)
            .count();
        prop_assert_eq!(count, 1);
    }

    #[test]
    fn negative_signed_appears_once(value in 0x8000u16..=0xFFFF) {
        let desc = RegisterDescriptor::new(
            "w7",
            0x000E,
            value,
            FormatFlags::DECIMAL | FormatFlags::UNSIGNED,
        );
        let line = render(&desc);
        let signed = (value as i16).to_string();
        let count = line
            .split_whitespace()
            .filter(|word| *word == signed)
            .count();
        prop_assert_eq!(count, 1);
        let tail = format!("{:5}", value);
        prop_assert!(line.ends_with(&tail));
    }

    #[test]
    fn bit_names_match_set_bits(value in 1u16..) {
        let desc = RegisterDescriptor::new("RCON", 0x0740, value, FormatFlags::empty())
            .with_bit_names(Some(&RCON_BITS));
        let line = render(&desc);
        let start = line.find('{').unwrap();
        let names: Vec<&str> = line[start + 1..line.len() - 1].split(", ").collect();
        prop_assert_eq!(names.len(), value.count_ones() as usize);
        let expected: Vec<&str> = (0..16)
            .rev()
            .filter(|bit| value & (1 << bit) != 0)
            .map(|bit| RCON_BITS.0[bit])
            .collect();
        prop_assert_eq!(names, expected);
    }
}
