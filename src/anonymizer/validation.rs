// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Structural checks that cut false positives per category

use super::config::PatternType;

/// Accept or reject a raw match for its category
pub fn validate(value: &str, pattern_type: PatternType) -> bool {
    match pattern_type {
        PatternType::Ipv4 => value.split('.').count() == 4,

        PatternType::Hostname => {
            value.contains('.') && !value.chars().all(|c| c.is_ascii_digit() || c == '.')
        }

        PatternType::Email => match value.rsplit_once('@') {
            Some((_, domain)) => domain.contains('.'),
            None => false,
        },

        PatternType::Phone => value.chars().filter(|c| c.is_ascii_digit()).count() >= 8,

        PatternType::CreditCard => {
            let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
            digits.len() >= 13 && luhn_valid(&digits)
        }

        PatternType::PathUnix => !value.starts_with("http") && value.matches('/').count() >= 2,

        _ => true,
    }
}

/// Luhn mod-10 check over decimal digits, most significant first
pub fn luhn_valid(digits: &[u32]) -> bool {
    if digits.is_empty() {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    checksum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(s: &str) -> Vec<u32> {
        s.chars().filter_map(|c| c.to_digit(10)).collect()
    }

    #[test]
    fn test_luhn() {
        assert!(luhn_valid(&digits("4532015112830366")));
        assert!(!luhn_valid(&digits("4532015112830367")));
        assert!(luhn_valid(&digits("4111111111111111")));
        assert!(!luhn_valid(&[]));
    }

    #[test]
    fn test_credit_card() {
        assert!(validate("4532015112830366", PatternType::CreditCard));
        assert!(validate("4532-0151-1283-0366", PatternType::CreditCard));
        assert!(!validate("4532015112830367", PatternType::CreditCard));
        // Luhn-valid but too short
        assert!(!validate("4111111111", PatternType::CreditCard));
    }

    #[test]
    fn test_ipv4_parts() {
        assert!(validate("192.168.1.5", PatternType::Ipv4));
        assert!(validate("10.0.0.0/8", PatternType::Ipv4));
        assert!(!validate("192.168.1", PatternType::Ipv4));
    }

    #[test]
    fn test_hostname() {
        assert!(validate("db01.internal", PatternType::Hostname));
        assert!(!validate("localhost", PatternType::Hostname));
        assert!(!validate("1.2.3", PatternType::Hostname));
    }

    #[test]
    fn test_email() {
        assert!(validate("alice@example.com", PatternType::Email));
        assert!(!validate("alice@localhost", PatternType::Email));
        assert!(!validate("example.com", PatternType::Email));
    }

    #[test]
    fn test_phone_digit_count() {
        assert!(validate("+33 6 12 34 56 78", PatternType::Phone));
        assert!(!validate("555-1234", PatternType::Phone));
    }

    #[test]
    fn test_path_unix() {
        assert!(validate("/var/log/syslog", PatternType::PathUnix));
        assert!(!validate("/tmp", PatternType::PathUnix));
        assert!(!validate("http://x/y/z", PatternType::PathUnix));
    }

    #[test]
    fn test_other_types_accepted() {
        assert!(validate("anything", PatternType::Uuid));
        assert!(validate("x", PatternType::Custom));
    }
}
