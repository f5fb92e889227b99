//! Note name parsing — converts note literals like "a4" or "C#3" to MIDI numbers.

/// Chromatic note names, starting from C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Why a well-shaped note literal could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    /// The letter (with accidental) is not one of [`NOTE_NAMES`], e.g. `H` or `E#`.
    UnknownName(String),
    /// The octave number does not fit the MIDI range representation.
    OctaveOverflow(String),
}

/// Split note text into its name (letter plus optional `#`) and octave digits.
///
/// Returns `None` unless the text is one ASCII letter, an optional `#`, then
/// one or more ASCII digits.
pub fn split_note(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_alphabetic() {
        return None;
    }
    let name_len = if bytes.get(1) == Some(&b'#') { 2 } else { 1 };
    let (name, octave) = text.split_at(name_len);
    if octave.is_empty() || !octave.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((name, octave))
}

/// Whether the text has the shape the lexer emits for note tokens: `[a-gA-G]#?[0-9]+`.
pub fn is_note_literal(text: &str) -> bool {
    matches!(split_note(text), Some((name, _)) if is_note_letter(&name[..1]))
}

/// Whether `text` is exactly one note letter, `A` to `G` in either case.
pub fn is_note_letter(text: &str) -> bool {
    matches!(text.as_bytes(), [b'a'..=b'g' | b'A'..=b'G'])
}

/// Convert a note name and octave into a MIDI number.
///
/// The name is matched case-insensitively. The result is
/// `index_in_scale + octave * 12`, so `A4` is 57 and `C0` is 0.
pub fn midi_number(name: &str, octave: &str) -> Result<u32, NoteError> {
    let upper = name.to_ascii_uppercase();
    let index = NOTE_NAMES
        .iter()
        .position(|n| *n == upper)
        .ok_or_else(|| NoteError::UnknownName(upper.clone()))?;

    octave
        .parse::<u32>()
        .ok()
        .and_then(|o| o.checked_mul(NOTE_NAMES.len() as u32))
        .and_then(|base| base.checked_add(index as u32))
        .ok_or_else(|| NoteError::OctaveOverflow(octave.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<u32, NoteError> {
        let (name, octave) = split_note(text).expect("well-shaped note");
        midi_number(name, octave)
    }

    #[test]
    fn a4() {
        assert_eq!(parse("a4"), Ok(57));
        assert_eq!(parse("A4"), Ok(57));
    }

    #[test]
    fn c0_is_zero() {
        assert_eq!(parse("C0"), Ok(0));
    }

    #[test]
    fn sharps() {
        assert_eq!(parse("c#4"), Ok(49));
        assert_eq!(parse("F#3"), Ok(42));
        assert_eq!(parse("a#0"), Ok(10));
    }

    #[test]
    fn multi_digit_octave() {
        assert_eq!(parse("B10"), Ok(131));
    }

    #[test]
    fn all_naturals_octave_4() {
        let naturals = ["C4", "D4", "E4", "F4", "G4", "A4", "B4"];
        let expected = [48, 50, 52, 53, 55, 57, 59];
        for (name, midi) in naturals.iter().zip(expected) {
            assert_eq!(parse(name), Ok(midi), "{name}");
        }
    }

    #[test]
    fn letters_outside_scale() {
        assert_eq!(parse("h4"), Err(NoteError::UnknownName("H".into())));
        assert_eq!(parse("e#2"), Err(NoteError::UnknownName("E#".into())));
        assert_eq!(parse("B#1"), Err(NoteError::UnknownName("B#".into())));
    }

    #[test]
    fn huge_octave_overflows() {
        assert!(matches!(
            parse("c99999999999"),
            Err(NoteError::OctaveOverflow(_))
        ));
    }

    #[test]
    fn shape() {
        assert!(is_note_literal("a4"));
        assert!(is_note_literal("G#10"));
        assert!(!is_note_literal("h4"));
        assert!(!is_note_literal("a"));
        assert!(!is_note_literal("a#"));
        assert!(!is_note_literal("ab4"));
    }

    #[test]
    fn note_letters() {
        assert!(is_note_letter("c"));
        assert!(is_note_letter("G"));
        assert!(!is_note_letter("h"));
        assert!(!is_note_letter("x"));
        assert!(!is_note_letter("cc"));
        assert!(!is_note_letter(""));
        assert!(!is_note_literal("44"));
        assert!(!is_note_literal(""));
        assert_eq!(split_note("h4"), Some(("h", "4")));
        assert_eq!(split_note("x1y"), None);
    }
}
