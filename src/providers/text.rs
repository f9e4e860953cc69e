//! Text generation provider.
//!
//! Titles, sentences, and review-length bodies built from a retail word
//! table. Output is plain filler; the LLM path handles anything that must
//! read naturally.

use crate::providers::data::WORDS;
use crate::rng::SmithRng;

/// Generate a sentence of `word_count` words, capitalized, no period.
pub fn generate_title(rng: &mut SmithRng, word_count: usize) -> String {
    let mut words = Vec::with_capacity(word_count);
    for _ in 0..word_count {
        words.push(*rng.choose(WORDS));
    }
    let mut sentence = words.join(" ");
    if let Some(first) = sentence.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    sentence
}

/// Generate a sentence ending with a period.
pub fn generate_sentence(rng: &mut SmithRng, word_count: usize) -> String {
    format!("{}.", generate_title(rng, word_count))
}

/// Generate a short paragraph of `sentence_count` sentences.
pub fn generate_paragraph(rng: &mut SmithRng, sentence_count: usize) -> String {
    let mut sentences = Vec::with_capacity(sentence_count);
    for _ in 0..sentence_count {
        let words = rng.gen_range(5, 12);
        sentences.push(generate_sentence(rng, words));
    }
    sentences.join(" ")
}

/// Generate a string bounded to `[min_chars, max_chars]` characters.
///
/// Words are appended until the minimum is met, then the result is
/// truncated at the maximum on a character boundary.
pub fn generate_bounded(rng: &mut SmithRng, min_chars: usize, max_chars: usize) -> String {
    let (lo, hi) = if min_chars <= max_chars {
        (min_chars, max_chars)
    } else {
        (max_chars, min_chars)
    };

    let mut out = String::new();
    while out.chars().count() < lo {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(*rng.choose(WORDS));
    }
    if out.chars().count() > hi {
        out = out.chars().take(hi).collect();
    }
    out
}
