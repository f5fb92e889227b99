//! Numeric literal suffixes: an optional SI magnitude followed by an optional unit.
//!
//! `440hz`, `3khz`, `1.5k`, `-3dB`, `2b`. Matching is case-insensitive, so
//! `m` is mega rather than milli.

/// The form a number gets when no unit suffix is present.
pub const DEFAULT_FORM: &str = "lin";

const MAGNITUDES: [(char, f64); 5] = [
    ('K', 1e3),
    ('M', 1e6),
    ('G', 1e9),
    ('T', 1e12),
    ('P', 1e15),
];

const UNITS: [(&str, &str); 6] = [
    ("HZ", "freq"),
    ("DB", "db"),
    ("Q", "q"),
    ("R", "res"),
    ("S", "seconds"),
    ("B", "beats"),
];

/// A recognized suffix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suffix {
    /// Factor applied to the literal's value (1.0 without a magnitude).
    pub multiplier: f64,
    /// Form named by the unit, if one was present.
    pub form: Option<&'static str>,
}

impl Suffix {
    pub fn form_name(&self) -> &'static str {
        self.form.unwrap_or(DEFAULT_FORM)
    }
}

/// Interpret an identifier that follows a numeric literal.
///
/// Returns `None` unless the whole text is a magnitude, a unit, or a magnitude
/// immediately followed by a unit.
pub fn parse_suffix(text: &str) -> Option<Suffix> {
    let upper = text.to_ascii_uppercase();
    let mut rest = upper.as_str();

    let mut multiplier = 1.0;
    let mut matched_magnitude = false;
    if let Some(first) = rest.chars().next() {
        if let Some(&(_, factor)) = MAGNITUDES.iter().find(|(c, _)| *c == first) {
            multiplier = factor;
            matched_magnitude = true;
            rest = &rest[first.len_utf8()..];
        }
    }

    if rest.is_empty() {
        return matched_magnitude.then_some(Suffix {
            multiplier,
            form: None,
        });
    }

    UNITS
        .iter()
        .find(|(unit, _)| *unit == rest)
        .map(|&(_, form)| Suffix {
            multiplier,
            form: Some(form),
        })
}
