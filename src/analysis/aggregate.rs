use crate::types::{
    AnalysisReport, BatchReport, BatchSummary, Category, CategoryResult, CategoryScores,
    IssueFrequency, RankedItem, Rating, Recommendation,
};
use std::collections::{BTreeMap, HashMap};

/// Score a missing category contributes to the overall score.
pub const NEUTRAL_SCORE: u8 = 100;
const MOST_COMMON_LIMIT: usize = 10;

/// Weighted overall score. Categories absent from `scores` (keywords without a
/// focus keyword) count as [`NEUTRAL_SCORE`]; weights are not re-normalized.
pub fn overall_score(scores: &CategoryScores) -> u8 {
    let total: f64 = Category::ALL
        .iter()
        .map(|c| {
            let score = scores.get(c).copied().unwrap_or(NEUTRAL_SCORE).min(100);
            f64::from(score) * c.weight()
        })
        .sum();
    total.round().clamp(0.0, 100.0) as u8
}

/// Stable sort, high → medium → low.
pub fn sort_recommendations(recommendations: &mut [Recommendation]) {
    recommendations.sort_by_key(|r| r.priority.rank());
}

/// Merge per-category findings. Issues and recommendations are kept as produced,
/// duplicates across categories included.
pub fn combine(
    results: Vec<CategoryResult>,
) -> (CategoryScores, Vec<crate::types::Issue>, Vec<Recommendation>) {
    let mut scores = CategoryScores::new();
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    for result in results {
        scores.insert(result.category, result.score);
        issues.extend(result.issues);
        recommendations.extend(result.recommendations);
    }
    sort_recommendations(&mut recommendations);
    (scores, issues, recommendations)
}

pub fn summarize(reports: Vec<AnalysisReport>) -> BatchReport {
    let mut summary = BatchSummary {
        total_items: reports.len(),
        ..Default::default()
    };

    let mut category_totals: BTreeMap<Category, (u64, usize)> = BTreeMap::new();
    let mut issue_counts: HashMap<&str, usize> = HashMap::new();
    let mut score_total: u64 = 0;

    for report in &reports {
        score_total += u64::from(report.overall_score);
        match report.rating {
            Rating::Good => summary.good += 1,
            Rating::NeedsImprovement => summary.needs_improvement += 1,
            Rating::Poor => summary.poor += 1,
        }
        for (category, score) in &report.category_scores {
            let entry = category_totals.entry(*category).or_insert((0, 0));
            entry.0 += u64::from(*score);
            entry.1 += 1;
        }
        for issue in &report.issues {
            *summary.issues_by_severity.entry(issue.severity).or_insert(0) += 1;
            *issue_counts.entry(issue.issue_type.as_str()).or_insert(0) += 1;
        }
    }

    if !reports.is_empty() {
        summary.average_score = round2(score_total as f64 / reports.len() as f64);
    }

    let mut frequencies: Vec<IssueFrequency> = issue_counts
        .into_iter()
        .map(|(issue_type, count)| IssueFrequency {
            issue_type: issue_type.to_string(),
            count,
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.issue_type.cmp(&b.issue_type)));
    frequencies.truncate(MOST_COMMON_LIMIT);
    summary.most_common_issues = frequencies;

    let category_averages = category_totals
        .into_iter()
        .map(|(category, (total, n))| (category, round2(total as f64 / n as f64)))
        .collect();

    let mut ranking: Vec<RankedItem> = reports
        .iter()
        .map(|r| RankedItem {
            id: r.content_id,
            title: r.title.clone(),
            overall_score: r.overall_score,
        })
        .collect();
    ranking.sort_by_key(|r| r.overall_score);

    BatchReport {
        reports,
        summary,
        category_averages,
        ranking,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{recommend, ContentStats, Issue, Priority, Severity};

    fn report(id: u64, overall: u8, scores: &[(Category, u8)], issues: &[(&str, Severity)]) -> AnalysisReport {
        AnalysisReport {
            content_id: id,
            title: format!("Item {}", id),
            overall_score: overall,
            rating: Rating::from_score(overall),
            category_scores: scores.iter().copied().collect(),
            issues: issues
                .iter()
                .map(|(t, severity)| Issue {
                    issue_type: t.to_string(),
                    message: String::new(),
                    severity: *severity,
                    category: Category::Title,
                })
                .collect(),
            recommendations: Vec::new(),
            stats: ContentStats::default(),
            readability: None,
            analyzed_at: String::new(),
        }
    }

    #[test]
    fn test_overall_score_bounds() {
        let mut scores = CategoryScores::new();
        for c in Category::ALL {
            scores.insert(c, 0);
        }
        assert_eq!(overall_score(&scores), 0);
        for c in Category::ALL {
            scores.insert(c, 100);
        }
        assert_eq!(overall_score(&scores), 100);
    }

    #[test]
    fn test_missing_keywords_counts_as_neutral() {
        let scores: CategoryScores = [
            (Category::Title, 60),
            (Category::Content, 60),
            (Category::Readability, 60),
            (Category::Technical, 60),
        ]
        .into_iter()
        .collect();
        // 0.85 * 60 + 0.15 * 100
        assert_eq!(overall_score(&scores), 66);
    }

    #[test]
    fn test_overall_rounds_to_nearest() {
        let scores: CategoryScores = [
            (Category::Title, 62),
            (Category::Content, 50),
            (Category::Readability, 100),
            (Category::Technical, 72),
            (Category::Keywords, 100),
        ]
        .into_iter()
        .collect();
        // 12.4 + 12.5 + 20 + 14.4 + 15 = 74.3
        assert_eq!(overall_score(&scores), 74);
    }

    #[test]
    fn test_recommendation_sort_is_stable() {
        let mut recs = vec![
            recommend(Priority::Low, "l1", ""),
            recommend(Priority::High, "h1", ""),
            recommend(Priority::Medium, "m1", ""),
            recommend(Priority::High, "h2", ""),
            recommend(Priority::Low, "l2", ""),
        ];
        sort_recommendations(&mut recs);
        let order: Vec<&str> = recs.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(order, vec!["h1", "h2", "m1", "l1", "l2"]);
    }

    #[test]
    fn test_summarize_values() {
        let reports = vec![
            report(
                1,
                90,
                &[(Category::Title, 90), (Category::Content, 80)],
                &[("a_issue", Severity::Warning), ("b_issue", Severity::Info)],
            ),
            report(
                2,
                65,
                &[(Category::Title, 70), (Category::Content, 60), (Category::Keywords, 50)],
                &[("a_issue", Severity::Warning), ("c_issue", Severity::Error)],
            ),
            report(
                3,
                41,
                &[(Category::Title, 20), (Category::Content, 41)],
                &[
                    ("c_issue", Severity::Error),
                    ("a_issue", Severity::Warning),
                    ("b_issue", Severity::Info),
                ],
            ),
        ];
        let batch = summarize(reports);
        let s = &batch.summary;

        assert_eq!(s.total_items, 3);
        assert_eq!(s.average_score, 65.33);
        assert_eq!((s.good, s.needs_improvement, s.poor), (1, 1, 1));
        assert_eq!(s.issues_by_severity[&Severity::Warning], 3);
        assert_eq!(s.issues_by_severity[&Severity::Info], 2);
        assert_eq!(s.issues_by_severity[&Severity::Error], 2);

        let order: Vec<(&str, usize)> = s
            .most_common_issues
            .iter()
            .map(|f| (f.issue_type.as_str(), f.count))
            .collect();
        assert_eq!(order, vec![("a_issue", 3), ("b_issue", 2), ("c_issue", 2)]);

        assert_eq!(batch.category_averages[&Category::Title], 60.0);
        assert_eq!(batch.category_averages[&Category::Content], 60.33);
        assert_eq!(batch.category_averages[&Category::Keywords], 50.0);
        assert!(!batch.category_averages.contains_key(&Category::Technical));

        let ranking: Vec<u64> = batch.ranking.iter().map(|r| r.id).collect();
        assert_eq!(ranking, vec![3, 2, 1]);
    }

    #[test]
    fn test_most_common_issues_truncated_to_ten() {
        let mut issues: Vec<(String, Severity)> =
            (0..12).map(|i| (format!("t{:02}", i), Severity::Info)).collect();
        issues.push(("zz_repeat".to_string(), Severity::Warning));
        issues.push(("zz_repeat".to_string(), Severity::Warning));
        let borrowed: Vec<(&str, Severity)> = issues.iter().map(|(t, s)| (t.as_str(), *s)).collect();

        let batch = summarize(vec![report(1, 50, &[], &borrowed)]);
        let types: Vec<&str> = batch
            .summary
            .most_common_issues
            .iter()
            .map(|f| f.issue_type.as_str())
            .collect();
        assert_eq!(types.len(), 10);
        assert_eq!(types[0], "zz_repeat");
        assert_eq!(&types[1..], &["t00", "t01", "t02", "t03", "t04", "t05", "t06", "t07", "t08"]);
    }

    #[test]
    fn test_summarize_empty_batch() {
        let batch = summarize(Vec::new());
        assert_eq!(batch.summary.total_items, 0);
        assert_eq!(batch.summary.average_score, 0.0);
        assert!(batch.ranking.is_empty());
        assert!(batch.category_averages.is_empty());
    }
}
