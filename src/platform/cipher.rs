//! Packed-script deobfuscation for mirror redirector pages
//!
//! The redirector hides the real mirror URL and its CSRF token inside a
//! packed script fragment. Each page carries a quadruple of values that
//! parameterize the packing: the ciphertext itself, a per-page alphabet
//! key, a character-code offset and a numeral base. Decoding reverses the
//! upstream generator: split the ciphertext at a delimiter drawn from the
//! alphabet, rewrite alphabet symbols to their indices, run a base
//! conversion and shift the result back by the offset.

use crate::error::ResolveError;
use crate::Result;
use regex::Regex;

/// Fixed 64-symbol table shared by every numeral base the packer uses.
/// Radix N draws its digit set from the first N symbols.
const BASE_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/";

/// Result of a numeral-base transformation.
///
/// The upstream generator returns a bare symbol when the re-encoded value
/// fits in one digit and a base-10 reinterpretation of the digit string
/// otherwise. The asymmetry is intentional and must not be normalized;
/// decoding depends on matching the generator bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Symbol(char),
    Number(i64),
}

impl Decoded {
    /// Collapse to the integer code the deobfuscator subtracts the offset
    /// from. A symbol contributes its Unicode scalar value.
    pub fn code_point(&self) -> i64 {
        match self {
            Decoded::Symbol(c) => *c as i64,
            Decoded::Number(n) => *n,
        }
    }
}

/// Transform `digits` from `source_radix` into `target_radix`.
///
/// The digit string is read right to left; symbols outside the source
/// digit set are skipped, matching the upstream packer. Radices above 64
/// have no digit set and are rejected.
pub fn decode_digits(digits: &str, source_radix: u32, target_radix: u32) -> Result<Decoded> {
    if !(2..=64).contains(&source_radix) || !(2..=64).contains(&target_radix) {
        return Err(ResolveError::CipherError(format!(
            "radix out of range: {} -> {}",
            source_radix, target_radix
        )));
    }

    let source: Vec<char> = BASE_ALPHABET.chars().take(source_radix as usize).collect();
    let target: Vec<char> = BASE_ALPHABET.chars().take(target_radix as usize).collect();

    // Accumulate the value, least significant digit first
    let mut value: i64 = 0;
    for (position, ch) in digits.chars().rev().enumerate() {
        if let Some(index) = source.iter().position(|&c| c == ch) {
            let weight = (source_radix as i64)
                .checked_pow(position as u32)
                .ok_or_else(|| {
                    ResolveError::CipherError(format!("digit string too long: {}", digits))
                })?;
            value = value
                .checked_add(index as i64 * weight)
                .ok_or_else(|| ResolveError::CipherError("value overflow".to_string()))?;
        }
    }

    if value == 0 {
        return Ok(Decoded::Symbol(target[0]));
    }

    // Re-encode by repeated division, most significant digit first
    let mut encoded = String::new();
    let mut rest = value;
    while rest > 0 {
        encoded.insert(0, target[(rest % target_radix as i64) as usize]);
        rest /= target_radix as i64;
    }

    if encoded.chars().count() == 1 {
        return Ok(Decoded::Symbol(encoded.chars().next().unwrap()));
    }

    // Multi-digit results are reinterpreted as a base-10 integer literal,
    // reading only the leading decimal prefix the way strtol would
    let prefix: String = encoded.chars().take_while(|c| c.is_ascii_digit()).collect();
    if prefix.is_empty() {
        return Err(ResolveError::CipherError(format!(
            "encoded value {} has no decimal prefix",
            encoded
        )));
    }
    Ok(Decoded::Number(prefix.parse::<i64>()?))
}

/// The four values extracted together from one redirector page.
///
/// `offset` and `source_base` come from the same pattern match as the
/// ciphertext and alphabet key; they are only meaningful as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObfuscationQuad {
    pub cipher_text: String,
    pub alphabet_key: String,
    pub offset: i64,
    pub source_base: usize,
}

impl ObfuscationQuad {
    /// Extract a quad from raw page text, if the page carries one.
    ///
    /// Absence is not an error: un-obfuscated redirector pages embed
    /// their mirror URL in plain text instead.
    pub fn from_page(body: &str, packed_args: &Regex) -> Option<Self> {
        let captures = packed_args.captures(body)?;
        Some(Self {
            cipher_text: captures.get(1)?.as_str().to_string(),
            alphabet_key: captures.get(2)?.as_str().to_string(),
            offset: captures.get(3)?.as_str().parse().ok()?,
            source_base: captures.get(4)?.as_str().parse().ok()?,
        })
    }

    /// Decode the packed payload back into the script fragment it was
    /// generated from.
    pub fn decode(&self) -> Result<String> {
        decode_packed(
            &self.cipher_text,
            &self.alphabet_key,
            self.offset,
            self.source_base,
            10,
        )
    }
}

/// Decode a packed ciphertext with the given alphabet, offset and
/// delimiter index.
///
/// The delimiter is `alphabet[delimiter_index]`; it also names the source
/// radix for the digit conversion. Each delimited segment decodes to one
/// character of the plaintext.
pub fn decode_packed(
    cipher: &str,
    alphabet: &str,
    offset: i64,
    delimiter_index: usize,
    target_radix: u32,
) -> Result<String> {
    let symbols: Vec<char> = alphabet.chars().collect();
    let delimiter = *symbols.get(delimiter_index).ok_or_else(|| {
        ResolveError::CipherError(format!(
            "delimiter index {} outside alphabet of {} symbols",
            delimiter_index,
            symbols.len()
        ))
    })?;

    let mut segments: Vec<&str> = cipher.split(delimiter).collect();
    // A trailing delimiter does not open a new segment
    if cipher.ends_with(delimiter) {
        segments.pop();
    }

    let mut plaintext = String::with_capacity(segments.len());
    for segment in segments {
        // Rewrite each alphabet symbol to the decimal string of its index.
        // Mapping char by char keeps substitutions from re-matching text
        // that was already substituted.
        let mut digits = String::with_capacity(segment.len());
        for ch in segment.chars() {
            match symbols.iter().position(|&c| c == ch) {
                Some(index) => digits.push_str(&index.to_string()),
                None => digits.push(ch),
            }
        }

        let code =
            decode_digits(&digits, delimiter_index as u32, target_radix)?.code_point() - offset;
        let decoded = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                ResolveError::CipherError(format!("segment decodes to invalid char code {}", code))
            })?;
        plaintext.push(decoded);
    }

    Ok(plaintext)
}
