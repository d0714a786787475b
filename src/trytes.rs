//! Tryte encoding used by the ledger.
//!
//! A tryte is one character of `9ABCDEFGHIJKLMNOPQRSTUVWXYZ` and carries three
//! balanced trits (-1, 0, 1). Index 0..=13 maps to the values 0..=13, index
//! 14..=26 maps to -13..=-1.

pub const ALPHABET: &str = "9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const ALPHABET_BYTES: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of trits packed into one tryte.
pub const TRITS_PER_TRYTE: usize = 3;

pub fn is_tryte(c: char) -> bool {
    c == '9' || c.is_ascii_uppercase()
}

fn index_of(c: char) -> Option<usize> {
    match c {
        '9' => Some(0),
        'A'..='Z' => Some(c as usize - 'A' as usize + 1),
        _ => None,
    }
}

/// Encode every byte of `text` as two trytes, low digit first.
pub fn from_ascii(text: &str) -> String {
    let mut trytes = String::with_capacity(text.len() * 2);
    for byte in text.bytes() {
        let value = byte as usize;
        trytes.push(ALPHABET_BYTES[value % 27] as char);
        trytes.push(ALPHABET_BYTES[value / 27] as char);
    }
    trytes
}

/// Decode trytes produced by [`from_ascii`].
///
/// A trailing odd tryte and trailing all-`9` pairs (padding) are ignored.
/// Returns `None` if a character is outside the alphabet or a pair does not
/// describe a byte.
pub fn to_ascii(trytes: &str) -> Option<String> {
    let chars: Vec<char> = trytes.chars().collect();
    let mut bytes = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks_exact(2) {
        let low = index_of(pair[0])?;
        let high = index_of(pair[1])?;
        let value = low + high * 27;
        if value > u8::MAX as usize {
            return None;
        }
        bytes.push(value as u8);
    }
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    String::from_utf8(bytes).ok()
}

/// Expand trytes into balanced trits. Characters outside the alphabet count as `9`.
pub fn to_trits(trytes: &str) -> Vec<i8> {
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    for c in trytes.chars() {
        let index = index_of(c).unwrap_or(0) as i64;
        let value = if index > 13 { index - 27 } else { index };
        push_balanced(&mut trits, value, TRITS_PER_TRYTE);
    }
    trits
}

/// Pack balanced trits into trytes. A short final group is zero-padded.
pub fn from_trits(trits: &[i8]) -> String {
    trits
        .chunks(TRITS_PER_TRYTE)
        .map(|group| {
            let value = group
                .iter()
                .rev()
                .fold(0i32, |acc, &trit| acc * 3 + trit as i32);
            let index = if value < 0 { value + 27 } else { value };
            ALPHABET_BYTES[index as usize] as char
        })
        .collect()
}

/// Balanced-ternary encoding of `number` as exactly `length` trytes.
///
/// Digits that do not fit are dropped, so the value wraps modulo `27^length`.
pub fn from_number(number: i64, length: usize) -> String {
    let mut trits = Vec::with_capacity(length * TRITS_PER_TRYTE);
    push_balanced(&mut trits, number, length * TRITS_PER_TRYTE);
    from_trits(&trits)
}

fn push_balanced(trits: &mut Vec<i8>, mut value: i64, count: usize) {
    for _ in 0..count {
        let mut remainder = value.rem_euclid(3);
        if remainder == 2 {
            remainder = -1;
        }
        trits.push(remainder as i8);
        value = (value - remainder) / 3;
    }
}
