//! Edit-distance similarity ratios.

use std::collections::HashMap;

/// Normalized Levenshtein similarity in `[0, 1]`.
pub fn char_similarity(a: &str, b: &str) -> f32 {
    strsim::normalized_levenshtein(a, b) as f32
}

/// Best ratio (`0..=100`) between the shorter string and every equal-length
/// window of the longer one.
///
/// Symmetric in its arguments. Returns `None` when either side is empty,
/// since no meaningful alignment exists.
pub fn partial_ratio(a: &str, b: &str) -> Option<u8> {
    best_window(a, b, 0)
}

/// Whether [`partial_ratio`] is strictly above `threshold`, skipping windows
/// that cannot get there.
pub fn partial_ratio_exceeds(a: &str, b: &str, threshold: u8) -> Option<bool> {
    best_window(a, b, threshold).map(|best| best > threshold)
}

/// Borrowed char window that `strsim::generic_levenshtein` can iterate.
struct Chars<'a>(&'a [char]);

impl<'a, 'b> IntoIterator for &'a Chars<'b> {
    type Item = char;
    type IntoIter = std::iter::Copied<std::slice::Iter<'b, char>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Ratio for an edit distance between two sequences of length `len`.
fn scaled(distance: usize, len: usize) -> u8 {
    ((1.0 - distance as f64 / len as f64) * 100.0).round() as u8
}

/// Highest window ratio above `floor`, or `floor` when no window beats it.
///
/// A window sharing `common` characters with the needle (as multisets) is at
/// least `len - common` edits away, so its ratio is bounded by
/// `scaled(len - common, len)`; windows whose bound cannot beat the current
/// best are never aligned.
fn best_window(a: &str, b: &str, floor: u8) -> Option<u8> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let len = short.len();
    let needle = Chars(short);

    let mut wanted: HashMap<char, usize> = HashMap::new();
    for &c in short.iter() {
        *wanted.entry(c).or_default() += 1;
    }
    let mut seen: HashMap<char, usize> = HashMap::new();
    let mut common = 0usize;
    let admit = |c: char, seen: &mut HashMap<char, usize>| {
        let n = seen.entry(c).or_default();
        *n += 1;
        usize::from(*n <= wanted.get(&c).copied().unwrap_or(0))
    };
    for &c in &long[..len] {
        common += admit(c, &mut seen);
    }

    let mut best = floor;
    for start in 0..=long.len() - len {
        if start > 0 {
            let gone = long[start - 1];
            if let Some(n) = seen.get_mut(&gone) {
                if *n <= wanted.get(&gone).copied().unwrap_or(0) {
                    common -= 1;
                }
                *n -= 1;
            }
            common += admit(long[start + len - 1], &mut seen);
        }

        if scaled(len - common, len) <= best {
            continue;
        }
        let window = Chars(&long[start..start + len]);
        let score = scaled(strsim::generic_levenshtein(&needle, &window), len);
        if score > best {
            best = score;
            if best == 100 {
                break;
            }
        }
    }
    Some(best)
}
