//! Readability scoring: Flesch Reading Ease, Flesch-Kincaid grade and
//! sentence/paragraph length distribution.
//!
//! Reading Ease: `206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)`,
//! clamped to `[0, 100]`. Higher is easier.
//!
//! Grade: `0.39 * (words/sentences) + 11.8 * (syllables/words) - 15.59`,
//! floored at 0.

use super::text;
use crate::types::{recommend, Category, CategoryResult, Priority, ReadabilityMetrics, Severity};

/// Bodies shorter than this (in characters) are not scored.
pub const MIN_TEXT_CHARS: usize = 100;
pub const LONG_SENTENCE_WORDS: usize = 25;

pub fn flesch_reading_ease(avg_sentence_length: f64, avg_syllables_per_word: f64) -> f64 {
    (206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables_per_word).clamp(0.0, 100.0)
}

pub fn flesch_kincaid_grade(avg_sentence_length: f64, avg_syllables_per_word: f64) -> f64 {
    0.39f64
        .mul_add(avg_sentence_length, 11.8 * avg_syllables_per_word - 15.59)
        .max(0.0)
}

/// Compute metrics for `plain_text`, or `None` when it is too short to be meaningful.
pub fn compute_metrics(plain_text: &str) -> Option<ReadabilityMetrics> {
    if plain_text.trim().chars().count() < MIN_TEXT_CHARS {
        return None;
    }

    let sentences = text::split_sentences(plain_text);
    let word_count = text::count_words(plain_text);
    if sentences.is_empty() || word_count == 0 {
        return None;
    }

    let syllable_count = text::total_syllables(plain_text);
    let paragraphs = text::split_paragraphs(plain_text);
    let paragraph_count = paragraphs.len().max(1);

    let long_sentences = sentences
        .iter()
        .filter(|s| text::count_words(s) > LONG_SENTENCE_WORDS)
        .count();

    let avg_sentence_length = word_count as f64 / sentences.len() as f64;
    let avg_syllables_per_word = syllable_count as f64 / word_count as f64;

    Some(ReadabilityMetrics {
        sentence_count: sentences.len(),
        word_count,
        syllable_count,
        paragraph_count,
        avg_sentence_length,
        avg_syllables_per_word,
        avg_paragraph_length: word_count as f64 / paragraph_count as f64,
        long_sentence_percentage: long_sentences as f64 / sentences.len() as f64 * 100.0,
        flesch_reading_ease: flesch_reading_ease(avg_sentence_length, avg_syllables_per_word),
        flesch_kincaid_grade: flesch_kincaid_grade(avg_sentence_length, avg_syllables_per_word),
    })
}

pub fn analyze_readability(plain_text: &str) -> (CategoryResult, Option<ReadabilityMetrics>) {
    let mut result = CategoryResult::new(Category::Readability);
    let Some(m) = compute_metrics(plain_text) else {
        return (result, None);
    };

    if m.flesch_reading_ease < 30.0 {
        result.penalize(
            30,
            "very_difficult_readability",
            Severity::Warning,
            format!(
                "Flesch Reading Ease is {:.1} (very difficult, grade {:.1}).",
                m.flesch_reading_ease, m.flesch_kincaid_grade
            ),
            recommend(
                Priority::High,
                "Simplify the text: shorter sentences and plainer words",
                "Very difficult text loses most general readers",
            ),
        );
    } else if m.flesch_reading_ease < 50.0 {
        result.penalize(
            15,
            "difficult_readability",
            Severity::Info,
            format!(
                "Flesch Reading Ease is {:.1} (fairly difficult, grade {:.1}).",
                m.flesch_reading_ease, m.flesch_kincaid_grade
            ),
            recommend(
                Priority::Medium,
                "Break up complex sentences and replace jargon where possible",
                "Easier text keeps readers on the page longer",
            ),
        );
    }

    if m.avg_sentence_length > LONG_SENTENCE_WORDS as f64 {
        result.penalize(
            10,
            "long_sentences",
            Severity::Warning,
            format!(
                "Average sentence length is {:.1} words.",
                m.avg_sentence_length
            ),
            recommend(
                Priority::Medium,
                format!("Keep sentences under {} words on average", LONG_SENTENCE_WORDS),
                "Long sentences are hard to follow, especially on mobile",
            ),
        );
    }

    if m.long_sentence_percentage > 30.0 {
        result.penalize(
            8,
            "many_long_sentences",
            Severity::Info,
            format!(
                "{:.0}% of sentences are longer than {} words.",
                m.long_sentence_percentage, LONG_SENTENCE_WORDS
            ),
            recommend(
                Priority::Low,
                "Split the longest sentences in two",
                "Varied sentence length improves flow",
            ),
        );
    }

    if m.avg_paragraph_length > 150.0 {
        result.penalize(
            8,
            "long_paragraphs",
            Severity::Info,
            format!(
                "Paragraphs average {:.0} words.",
                m.avg_paragraph_length
            ),
            recommend(
                Priority::Low,
                "Break long paragraphs into shorter blocks",
                "Walls of text discourage skimming readers",
            ),
        );
    }

    (result, Some(m))
}
