use seo_scout::analysis::{readability, title};
use seo_scout::{analyze, analyze_batch, AnalysisConfig, Category, ContentItem, Rating, TitleIndex};

fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn item(id: u64, title: &str, body_html: &str) -> ContentItem {
    ContentItem {
        id,
        post_type: "post".to_string(),
        title: title.to_string(),
        body_html: body_html.to_string(),
        slug: format!("item-{}", id),
        ..Default::default()
    }
}

#[test]
fn short_thin_item_scores_poorly_end_to_end() {
    init_logger();
    // 50 words, no punctuation, no excerpt, headings, images or links.
    let body = format!("<p>{}</p>", vec!["lorem"; 50].join(" "));
    let thin = item(1, "A", &body);
    let config = AnalysisConfig::default();

    let report = analyze(&thin, &config, &TitleIndex::default());

    assert!(report.category_scores[&Category::Title] <= 62);
    assert!(report.category_scores[&Category::Content] <= 50);
    assert!(report.overall_score < 70, "overall {}", report.overall_score);
    assert_eq!(report.overall_score, 65);
    assert_eq!(report.rating, Rating::NeedsImprovement);
    assert!(!report.category_scores.contains_key(&Category::Keywords));

    for expected in ["title_too_short", "content_too_short", "missing_excerpt", "missing_h1"] {
        assert!(report.has_issue(expected), "missing {}", expected);
    }
    assert_eq!(report.stats.word_count, 50);
    assert_eq!(report.stats.reading_time_minutes, 1);
    assert_eq!(report.stats.keyword_density, None);
}

#[test]
fn recommendations_come_out_high_first() {
    let report = analyze(&item(1, "A", "<p>tiny</p>"), &AnalysisConfig::default(), &TitleIndex::default());
    let ranks: Vec<u8> = report.recommendations.iter().map(|r| r.priority.rank()).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);
}

#[test]
fn perfect_title_has_no_issues() {
    let result = title::analyze_title(
        "7 Essential Rust Tips for Faster Builds",
        30,
        60,
        &TitleIndex::default(),
        1,
    );
    assert_eq!(result.score, 100);
    assert!(result.issues.is_empty());
}

#[test]
fn tiny_body_skips_readability() {
    let (result, metrics) = readability::analyze_readability("Too short to judge.");
    assert_eq!(result.score, 100);
    assert!(result.issues.is_empty());
    assert!(metrics.is_none());
}

#[test]
fn focus_keyword_adds_keyword_category() {
    let body = format!(
        "<h1>Rust macros</h1><p>Rust macros {}</p>",
        vec!["filler"; 60].join(" ")
    );
    let config = AnalysisConfig {
        focus_keyword: Some("rust macros".to_string()),
        ..Default::default()
    };
    let report = analyze(&item(3, "Rust macros guide", &body), &config, &TitleIndex::default());
    assert!(report.category_scores.contains_key(&Category::Keywords));
    assert!(!report.has_issue("keyword_not_in_title"));
    assert!(!report.has_issue("keyword_not_in_headings"));
    assert!(report.stats.keyword_density.is_some());
}

#[test]
fn batch_flags_shared_titles_both_ways() {
    init_logger();
    let items = vec![
        item(10, "Same Title", "<p>one</p>"),
        item(11, "  same title ", "<p>two</p>"),
        item(12, "Unique Title", "<p>three</p>"),
    ];
    let batch = analyze_batch(&items, &AnalysisConfig::default());

    let by_id = |id: u64| batch.reports.iter().find(|r| r.content_id == id).unwrap();
    let first = by_id(10);
    let second = by_id(11);
    let unique = by_id(12);

    let dup_message = |r: &seo_scout::AnalysisReport| {
        r.issues
            .iter()
            .find(|i| i.issue_type == "duplicate_title")
            .map(|i| i.message.clone())
    };
    assert!(dup_message(first).unwrap().contains("11"));
    assert!(dup_message(second).unwrap().contains("10"));
    assert!(dup_message(unique).is_none());

    assert_eq!(batch.summary.total_items, 3);
    assert_eq!(
        batch.summary.good + batch.summary.needs_improvement + batch.summary.poor,
        3
    );
    assert!(batch.ranking.windows(2).all(|w| w[0].overall_score <= w[1].overall_score));
    assert!(batch.summary.most_common_issues.len() <= 10);
    assert!(!batch.category_averages.contains_key(&Category::Keywords));
}

#[test]
fn overall_score_stays_in_bounds() {
    let bodies = [
        String::new(),
        "<h1>x</h1>".repeat(40),
        format!("<p>{}</p>", "word ".repeat(2000)),
        "<img src=a.png><img src=b.png><img src=c.png><img src=d.png>".to_string(),
    ];
    for (i, body) in bodies.iter().enumerate() {
        let report = analyze(&item(i as u64, "", body), &AnalysisConfig::default(), &TitleIndex::default());
        assert!(report.overall_score <= 100);
        for score in report.category_scores.values() {
            assert!(*score <= 100);
        }
    }
}
