//! Escape scanner for extended strings.
//!
//! Extended strings embed raw character-table codes in literal text as
//! `{0xHH}` tokens. Only an exact six-symbol match counts as a token; a
//! lone `{`, a wrong digit count or a bad hex digit all fall through to
//! literal emission, so the scanner never consumes more than it matched.

/// Decodes a `{0xHH}` token at the start of `window`, if one is present.
pub(crate) fn escape_code(window: &[char]) -> Option<u8> {
    if window.len() < 6 {
        return None;
    }
    if window[0] != '{' || window[1] != '0' || window[5] != '}' {
        return None;
    }
    if window[2] != 'x' && window[2] != 'X' {
        return None;
    }
    let hi = window[3].to_digit(16)?;
    let lo = window[4].to_digit(16)?;
    Some((hi << 4 | lo) as u8)
}
