// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number canonicalization and formatting.
//!
//! Messaging gateways and manual data entry produce inconsistent phone
//! encodings, so canonicalization must be deterministic and total: every
//! input produces *some* canonical string. Matching against historically
//! inconsistent storage is handled separately by the identity resolver,
//! which probes a small fixed set of alternate encodings.

/// Israel's international calling code, without the `+` prefix.
const ISRAEL_CALLING_CODE: &str = "972";

/// Canonicalizes a phone number to international format without the `+`
/// prefix (e.g. `"972501234567"`).
///
/// Country-specific rewrite rules (currently Israel only):
/// - a leading trunk `0` is replaced with the calling code,
/// - a number already bearing the calling code passes through unchanged,
/// - a bare 9- or 10-digit subscriber number starting with `5` (the
///   Israeli mobile shape) is assumed local and prefixed.
///
/// Unrecognized shapes pass through as cleaned digits without a country
/// prefix. This is best-effort, not an error.
pub fn canonicalize(raw: &str, country: &str) -> String {
    let clean: String = raw.chars().filter(char::is_ascii_digit).collect();

    if country.eq_ignore_ascii_case("israel") {
        if let Some(rest) = clean.strip_prefix('0') {
            return format!("{ISRAEL_CALLING_CODE}{rest}");
        }
        if clean.starts_with(ISRAEL_CALLING_CODE) {
            return clean;
        }
        if (clean.len() == 9 || clean.len() == 10) && clean.starts_with('5') {
            return format!("{ISRAEL_CALLING_CODE}{clean}");
        }
    }

    clean
}

/// Renders a canonical number in the country's local trunk form
/// (e.g. `"972501234567"` -> `"0501234567"` for Israel).
///
/// Returns `None` when the number does not carry the country's calling
/// code. Used by the identity resolver to probe legacy storage encodings.
pub fn local_trunk_form(canonical: &str, country: &str) -> Option<String> {
    if country.eq_ignore_ascii_case("israel") {
        return canonical
            .strip_prefix(ISRAEL_CALLING_CODE)
            .map(|rest| format!("0{rest}"));
    }
    None
}

/// Formats a phone number for human-readable display.
///
/// For Israel the calling code is folded back into the trunk `0` and the
/// digits are grouped as `XXX-XXX-XXXX` (10 digits) or `XX-XXX-XXXX`
/// (9 digits). Other numbers are grouped in threes.
pub fn display_format(raw: &str, country: &str) -> String {
    let mut clean: String = raw.chars().filter(char::is_ascii_digit).collect();

    if country.eq_ignore_ascii_case("israel") {
        if let Some(rest) = clean.strip_prefix(ISRAEL_CALLING_CODE) {
            clean = format!("0{rest}");
        }
        if clean.len() == 10 {
            return format!("{}-{}-{}", &clean[0..3], &clean[3..6], &clean[6..]);
        }
        if clean.len() == 9 {
            return format!("{}-{}-{}", &clean[0..2], &clean[2..5], &clean[5..]);
        }
    }

    clean
        .as_bytes()
        .chunks(3)
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}

/// Returns true when two raw numbers canonicalize to the same key.
pub fn are_equivalent(a: &str, b: &str, country: &str) -> bool {
    canonicalize(a, country) == canonicalize(b, country)
}
