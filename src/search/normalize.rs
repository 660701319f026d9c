//! Query normalization and tokenization.
//!
//! Normalization folds the spellings a Japanese recipe query commonly mixes:
//! katakana vs hiragana, full-width vs ASCII alphanumerics, and letter case.

const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const KATAKANA_TO_HIRAGANA: u32 = 0x60;
const FULLWIDTH_TO_ASCII: u32 = 0xFEE0;
const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// Convert katakana to hiragana, e.g. "カタカナ" -> "かたかな".
/// Characters outside U+30A1..=U+30F6 (including "ー") are kept.
pub fn katakana_to_hiragana(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let code = c as u32;
            if (KATAKANA_START..=KATAKANA_END).contains(&code) {
                char::from_u32(code - KATAKANA_TO_HIRAGANA).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

fn fullwidth_alnum_to_ascii(c: char) -> char {
    match c {
        'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' => {
            char::from_u32(c as u32 - FULLWIDTH_TO_ASCII).unwrap_or(c)
        }
        _ => c,
    }
}

/// Canonicalize a string for matching: katakana to hiragana, full-width
/// alphanumerics to ASCII, lowercase, then trim.
pub fn normalize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let folded: String = katakana_to_hiragana(input)
        .chars()
        .map(fullwidth_alnum_to_ascii)
        .collect();

    folded.to_lowercase().trim().to_string()
}

/// Split a raw query into tokens on runs of whitespace (full-width space
/// included). Order and duplicates are preserved.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .replace(IDEOGRAPHIC_SPACE, " ")
        .split_whitespace()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}
