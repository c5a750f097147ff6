//! Dictionary-free Indonesian affix stripping.
//!
//! Removes inflectional suffixes (particles, possessive pronouns), one
//! derivational suffix and then derivational prefixes, recoding the nasal
//! prefixes (`meny-` → `s`, `men-` + vowel → `t`, `mem-` + vowel → `p`).
//! Without a root dictionary some words are over-stripped; corpus and
//! queries go through the same rules so matching stays consistent.

use crate::error::{FaqError, Result};
use std::fmt::Debug;

pub trait Stemmer: Send + Sync + Debug {
    fn stem(&self, word: &str) -> Result<String>;
}

const MIN_ROOT: usize = 3;

const PARTICLES: [&str; 4] = ["lah", "kah", "tah", "pun"];
const POSSESSIVES: [&str; 3] = ["nya", "ku", "mu"];
const DERIVATIONAL: [&str; 2] = ["kan", "an"];

#[derive(Debug, Clone, Copy, Default)]
pub struct IndonesianStemmer;

impl Stemmer for IndonesianStemmer {
    fn stem(&self, word: &str) -> Result<String> {
        if !word.chars().all(char::is_alphabetic) {
            return Err(FaqError::Stemming(format!("non-alphabetic token {word:?}")));
        }
        if word.chars().count() <= MIN_ROOT {
            return Ok(word.to_string());
        }

        let mut w = word.to_string();
        strip_suffix_from(&mut w, &PARTICLES, MIN_ROOT + 1);
        strip_suffix_from(&mut w, &POSSESSIVES, MIN_ROOT + 1);
        strip_suffix_from(&mut w, &DERIVATIONAL, MIN_ROOT + 1);

        for _ in 0..2 {
            match strip_prefix(&w) {
                Some(next) => w = next,
                None => break,
            }
        }

        Ok(w)
    }
}

fn strip_suffix_from(word: &mut String, suffixes: &[&str], min_rest: usize) {
    for suffix in suffixes {
        if let Some(rest) = word.strip_suffix(suffix) {
            if rest.chars().count() >= min_rest {
                word.truncate(rest.len());
                return;
            }
        }
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Removes one derivational prefix, returning `None` when nothing applies.
fn strip_prefix(word: &str) -> Option<String> {
    let accept = |root: String, min: usize| (root.chars().count() >= min).then_some(root);

    for plain in ["di", "ke", "se"] {
        if let Some(rest) = word.strip_prefix(plain) {
            return accept(rest.to_string(), MIN_ROOT + 1);
        }
    }
    for plain in ["ter", "ber", "per"] {
        if let Some(rest) = word.strip_prefix(plain) {
            return accept(rest.to_string(), MIN_ROOT);
        }
    }

    for head in ["me", "pe"] {
        let Some(rest) = word.strip_prefix(head) else {
            continue;
        };
        let mut chars = rest.chars();
        let (Some(c1), Some(c2)) = (chars.next(), chars.next()) else {
            return None;
        };
        let root = match (c1, c2) {
            ('n', 'g') => rest[2..].to_string(),
            ('n', 'y') if rest[2..].starts_with(is_vowel) => format!("s{}", &rest[2..]),
            ('n', v) if is_vowel(v) => format!("t{}", &rest[1..]),
            ('n', 'c' | 'd' | 'j' | 'z' | 's' | 't') => rest[1..].to_string(),
            ('m', v) if is_vowel(v) => format!("p{}", &rest[1..]),
            ('m', 'b' | 'f' | 'p' | 'v') => rest[1..].to_string(),
            ('l' | 'm' | 'n' | 'r' | 'w' | 'y', _) => rest.to_string(),
            _ => return None,
        };
        return accept(root, MIN_ROOT);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(w: &str) -> String {
        IndonesianStemmer.stem(w).expect("stem")
    }

    #[test]
    fn strips_suffixes_and_prefixes() {
        assert_eq!(stem("pencegahan"), "cegah");
        assert_eq!(stem("penyebab"), "sebab");
        assert_eq!(stem("makanan"), "makan");
        assert_eq!(stem("memakai"), "pakai");
        assert_eq!(stem("menanam"), "tanam");
        assert_eq!(stem("kesehatan"), "sehat");
        assert_eq!(stem("diberikan"), "beri");
        assert_eq!(stem("anaknya"), "anak");
    }

    #[test]
    fn leaves_short_and_unknown_shapes_alone() {
        assert_eq!(stem("asi"), "asi");
        assert_eq!(stem("stunting"), "stunting");
        assert_eq!(stem("bulan"), "bulan");
        assert_eq!(stem("gizi"), "gizi");
    }

    #[test]
    fn rejects_non_alphabetic_tokens() {
        assert!(IndonesianStemmer.stem("1000").is_err());
    }
}
