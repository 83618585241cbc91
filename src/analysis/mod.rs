//! Content SEO scoring engine.
//!
//! Five independent analyzers (title, content, readability, technical and,
//! when a focus keyword is set, keywords) each score their category from 100
//! down. The aggregator folds them into one weighted score and a
//! priority-sorted recommendation list. Everything here is a pure function of
//! its inputs.

pub mod aggregate;
pub mod content;
pub mod keywords;
pub mod readability;
pub mod structure;
pub mod technical;
pub mod text;
pub mod title;

use crate::types::{AnalysisConfig, AnalysisReport, BatchReport, ContentItem, ContentStats, Rating};
use structure::PageStructure;
use tracing::debug;
use whatlang::{detect, Lang};

pub use title::TitleIndex;

/// Analyze one item. `titles` decides duplicate-title findings; pass an index
/// built from whatever set the item should be unique within.
pub fn analyze(item: &ContentItem, config: &AnalysisConfig, titles: &TitleIndex) -> AnalysisReport {
    let plain_text = text::html_to_text(&item.body_html);
    let word_count = text::count_words(&plain_text);
    let structure = PageStructure::parse(&item.body_html, config.site_url.as_deref());

    let mut results = vec![
        title::analyze_title(
            &item.title,
            config.title_min_len,
            config.title_max_len,
            titles,
            item.id,
        ),
        content::analyze_content(
            word_count,
            config.content_min_words,
            &item.excerpt,
            config.desc_min_len,
            config.desc_max_len,
        ),
    ];

    let (readability_result, readability_metrics) = readability::analyze_readability(&plain_text);
    results.push(readability_result);

    results.push(technical::analyze_technical(&technical::TechnicalInput {
        structure: &structure,
        slug: &item.slug,
        has_featured_image: item.has_featured_image(),
        word_count,
    }));

    let mut keyword_density = None;
    if let Some(keyword) = config.keyword() {
        let (keyword_result, density) = keywords::analyze_keywords(&keywords::KeywordInput {
            keyword,
            title: &item.title,
            slug: &item.slug,
            plain_text: &plain_text,
            headings: &structure.headings,
        });
        keyword_density = Some((density * 100.0).round() / 100.0);
        results.push(keyword_result);
    }

    let (category_scores, issues, recommendations) = aggregate::combine(results);
    let overall_score = aggregate::overall_score(&category_scores);

    debug!(
        "analyzed content {}: overall={} issues={}",
        item.id,
        overall_score,
        issues.len()
    );

    AnalysisReport {
        content_id: item.id,
        title: item.title.clone(),
        overall_score,
        rating: Rating::from_score(overall_score),
        category_scores,
        issues,
        recommendations,
        stats: ContentStats {
            word_count,
            character_count: plain_text.chars().count(),
            reading_time_minutes: text::reading_time_minutes(word_count),
            heading_count: structure.headings.len(),
            internal_links: structure.internal_links(),
            external_links: structure.external_links(),
            image_count: structure.images.len(),
            language: detect_language(&plain_text),
            keyword_density,
        },
        readability: readability_metrics,
        analyzed_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Analyze a set of items; duplicate titles are judged within the set.
pub fn analyze_batch(items: &[ContentItem], config: &AnalysisConfig) -> BatchReport {
    let titles = TitleIndex::build(items);
    let reports = items
        .iter()
        .map(|item| analyze(item, config, &titles))
        .collect();
    aggregate::summarize(reports)
}

/// ISO-639-1 code for the dominant language, `unknown` when undetectable.
pub fn detect_language(plain_text: &str) -> String {
    match detect(plain_text) {
        Some(info) => match info.lang() {
            Lang::Eng => "en".to_string(),
            Lang::Spa => "es".to_string(),
            Lang::Fra => "fr".to_string(),
            Lang::Deu => "de".to_string(),
            Lang::Ita => "it".to_string(),
            Lang::Por => "pt".to_string(),
            Lang::Nld => "nl".to_string(),
            Lang::Rus => "ru".to_string(),
            Lang::Jpn => "ja".to_string(),
            Lang::Kor => "ko".to_string(),
            Lang::Cmn => "zh".to_string(),
            other => other.code().to_string(),
        },
        None => "unknown".to_string(),
    }
}
