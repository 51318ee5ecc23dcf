// File: src/core/syllable.rs
//! Word segmentation into syllables.
//!
//! Every implementation must be lossless: joining the fragments gives back the
//! input word exactly, case included. Words the rules cannot handle come back
//! as a single fragment.

/// Splits a word into an ordered, non-empty sequence of syllables.
pub trait Syllabifier: Send + Sync {
    fn syllabify(&self, word: &str) -> Vec<String>;
}

/// Treats every word as one syllable.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeWordSyllabifier;

impl Syllabifier for WholeWordSyllabifier {
    fn syllabify(&self, word: &str) -> Vec<String> {
        vec![word.to_string()]
    }
}

pub const DEFAULT_MIN_EDGE: usize = 2;

/// Rule-based Italian syllabification.
///
/// Vowel groups form nuclei (two of `a e o` in contact split, anything with
/// `i`/`u` stays together). The consonants between two nuclei are split so the
/// longest legal onset opens the next syllable. No break is placed closer than
/// `min_edge` characters to either end of the word, the way hyphenation
/// dictionaries behave.
#[derive(Debug, Clone)]
pub struct ItalianSyllabifier {
    min_edge: usize,
}

impl Default for ItalianSyllabifier {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_EDGE)
    }
}

impl ItalianSyllabifier {
    pub fn new(min_edge: usize) -> Self {
        Self {
            min_edge: min_edge.max(1),
        }
    }

    /// Char offsets where a new syllable starts, excluding 0.
    fn breaks(&self, letters: &[char]) -> Vec<usize> {
        let nuclei = nuclei(letters);
        let n = letters.len();

        nuclei
            .windows(2)
            .map(|pair| {
                let (_, prev_end) = pair[0];
                let (next_start, _) = pair[1];
                prev_end + onset_start(&letters[prev_end..next_start])
            })
            .filter(|&cut| cut >= self.min_edge && n - cut >= self.min_edge)
            .collect()
    }
}

impl Syllabifier for ItalianSyllabifier {
    fn syllabify(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() || !chars.iter().all(|c| c.is_alphabetic()) {
            return vec![word.to_string()];
        }

        let letters: Vec<char> = chars.iter().map(|&c| fold(c)).collect();
        let breaks = self.breaks(&letters);
        if breaks.is_empty() {
            return vec![word.to_string()];
        }

        let mut syllables = Vec::with_capacity(breaks.len() + 1);
        let mut start = 0;
        for cut in breaks.into_iter().chain(std::iter::once(chars.len())) {
            syllables.push(chars[start..cut].iter().collect());
            start = cut;
        }
        syllables
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'à' | 'è' | 'é' | 'ì' | 'í' | 'î' | 'ò' | 'ó' | 'ù' | 'ú'
    )
}

fn is_strong(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'o' | 'à' | 'è' | 'é' | 'ò' | 'ó')
}

/// Vowel runs as half-open ranges, with hiatus between strong vowels split.
fn nuclei(letters: &[char]) -> Vec<(usize, usize)> {
    let mut nuclei = Vec::new();
    let mut i = 0;
    while i < letters.len() {
        if !is_vowel(letters[i]) {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        while i < letters.len()
            && is_vowel(letters[i])
            && !(is_strong(letters[i - 1]) && is_strong(letters[i]))
        {
            i += 1;
        }
        nuclei.push((start, i));
    }
    nuclei
}

/// Index inside `cluster` where the longest legal onset begins.
fn onset_start(cluster: &[char]) -> usize {
    (0..=cluster.len())
        .find(|&k| is_onset(&cluster[k..]))
        .unwrap_or(cluster.len())
}

fn is_onset(cluster: &[char]) -> bool {
    match cluster {
        [] | [_] => true,
        [a, b] if a == b => false,
        ['s', _] => true,
        ['g', 'n'] | ['g', 'l'] | ['c', 'h'] | ['g', 'h'] => true,
        [a, 'l'] | [a, 'r'] => matches!(a, 'b' | 'c' | 'd' | 'f' | 'g' | 'p' | 't' | 'v'),
        ['s', b, c] => *b != 's' && is_onset(&[*b, *c]),
        _ => false,
    }
}
