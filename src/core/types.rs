use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ───────────────────────────────────────────────────────────────────────────
// Content records (supplied by the repository, never mutated by analysis)
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ContentItem {
    pub id: u64,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    /// Raw HTML body as stored by the host.
    #[serde(default)]
    pub body_html: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub featured_image_id: Option<u64>,
    /// taxonomy name -> assigned terms
    #[serde(default)]
    pub assigned_terms: BTreeMap<String, Vec<TermRef>>,
}

fn default_post_type() -> String {
    "post".to_string()
}

impl ContentItem {
    pub fn has_featured_image(&self) -> bool {
        self.featured_image_id.is_some_and(|id| id > 0)
    }

    pub fn has_excerpt(&self) -> bool {
        !self.excerpt.trim().is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TermRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Query used by `ContentRepository::list_content_items`. Empty fields match everything.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ContentFilter {
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub ids: Option<Vec<u64>>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ContentFilter {
    pub fn children_of(parent_id: u64, post_type: Option<&str>) -> Self {
        Self {
            parent_id: Some(parent_id),
            post_type: post_type.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        if let Some(pt) = &self.post_type {
            if &item.post_type != pt {
                return false;
            }
        }
        if let Some(parent) = self.parent_id {
            if item.parent_id != Some(parent) {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&item.id) {
                return false;
            }
        }
        true
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Analysis inputs and findings
// ───────────────────────────────────────────────────────────────────────────

/// Thresholds for one analysis run.
///
/// The engine assumes `title_min_len <= title_max_len` and
/// `desc_min_len <= desc_max_len`; call [`AnalysisConfig::validate`] at the
/// boundary before handing a caller-supplied config to the engine.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub title_min_len: usize,
    pub title_max_len: usize,
    pub content_min_words: usize,
    pub desc_min_len: usize,
    pub desc_max_len: usize,
    pub focus_keyword: Option<String>,
    /// Used to tell internal links from external ones.
    pub site_url: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            title_min_len: 30,
            title_max_len: 60,
            content_min_words: 300,
            desc_min_len: 120,
            desc_max_len: 160,
            focus_keyword: None,
            site_url: None,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), crate::core::error::ScoutError> {
        use crate::core::error::ScoutError;
        if self.title_min_len > self.title_max_len {
            return Err(ScoutError::InvalidConfig(format!(
                "title_min_len ({}) must not exceed title_max_len ({})",
                self.title_min_len, self.title_max_len
            )));
        }
        if self.desc_min_len > self.desc_max_len {
            return Err(ScoutError::InvalidConfig(format!(
                "desc_min_len ({}) must not exceed desc_max_len ({})",
                self.desc_min_len, self.desc_max_len
            )));
        }
        if let Some(site) = &self.site_url {
            if !site.trim().is_empty() && url::Url::parse(site).is_err() {
                return Err(ScoutError::InvalidConfig(format!(
                    "site_url is not an absolute URL: {}",
                    site
                )));
            }
        }
        Ok(())
    }

    /// Apply a request-level override field by field; unset fields keep `self`'s values.
    pub fn merged(&self, overrides: &AnalysisConfigOverrides) -> AnalysisConfig {
        AnalysisConfig {
            title_min_len: overrides.title_min_len.unwrap_or(self.title_min_len),
            title_max_len: overrides.title_max_len.unwrap_or(self.title_max_len),
            content_min_words: overrides.content_min_words.unwrap_or(self.content_min_words),
            desc_min_len: overrides.desc_min_len.unwrap_or(self.desc_min_len),
            desc_max_len: overrides.desc_max_len.unwrap_or(self.desc_max_len),
            focus_keyword: overrides
                .focus_keyword
                .clone()
                .or_else(|| self.focus_keyword.clone()),
            site_url: overrides.site_url.clone().or_else(|| self.site_url.clone()),
        }
    }

    /// Focus keyword, trimmed; `None` when absent or blank.
    pub fn keyword(&self) -> Option<&str> {
        self.focus_keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Partial `AnalysisConfig` carried by HTTP requests.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfigOverrides {
    pub title_min_len: Option<usize>,
    pub title_max_len: Option<usize>,
    pub content_min_words: Option<usize>,
    pub desc_min_len: Option<usize>,
    pub desc_max_len: Option<usize>,
    pub focus_keyword: Option<String>,
    pub site_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Title,
    Content,
    Readability,
    Technical,
    Keywords,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Title,
        Category::Content,
        Category::Readability,
        Category::Technical,
        Category::Keywords,
    ];

    /// Contribution of this category to the overall score.
    pub fn weight(self) -> f64 {
        match self {
            Category::Title => 0.20,
            Category::Content => 0.25,
            Category::Readability => 0.20,
            Category::Technical => 0.20,
            Category::Keywords => 0.15,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub action: String,
    pub priority: Priority,
    pub impact: String,
}

/// Findings of a single analyzer for its category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryResult {
    pub category: Category,
    pub score: u8,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
}

impl CategoryResult {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            score: 100,
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Record a finding and subtract its penalty, flooring the score at zero.
    pub fn penalize(
        &mut self,
        penalty: u8,
        issue_type: &str,
        severity: Severity,
        message: String,
        recommendation: Recommendation,
    ) {
        self.score = self.score.saturating_sub(penalty);
        self.issues.push(Issue {
            issue_type: issue_type.to_string(),
            message,
            severity,
            category: self.category,
        });
        self.recommendations.push(recommendation);
    }

    pub fn has_issue(&self, issue_type: &str) -> bool {
        self.issues.iter().any(|i| i.issue_type == issue_type)
    }
}

pub fn recommend(priority: Priority, action: impl Into<String>, impact: impl Into<String>) -> Recommendation {
    Recommendation {
        action: action.into(),
        priority,
        impact: impact.into(),
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Reports
// ───────────────────────────────────────────────────────────────────────────

pub type CategoryScores = BTreeMap<Category, u8>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Rating::Good
        } else if score >= 60 {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReadabilityMetrics {
    pub sentence_count: usize,
    pub word_count: usize,
    pub syllable_count: usize,
    pub paragraph_count: usize,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
    pub avg_paragraph_length: f64,
    pub long_sentence_percentage: f64,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ContentStats {
    pub word_count: usize,
    pub character_count: usize,
    pub reading_time_minutes: u32,
    pub heading_count: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub image_count: usize,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_density: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisReport {
    pub content_id: u64,
    pub title: String,
    pub overall_score: u8,
    pub rating: Rating,
    pub category_scores: CategoryScores,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
    pub stats: ContentStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readability: Option<ReadabilityMetrics>,
    pub analyzed_at: String,
}

impl AnalysisReport {
    pub fn has_issue(&self, issue_type: &str) -> bool {
        self.issues.iter().any(|i| i.issue_type == issue_type)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankedItem {
    pub id: u64,
    pub title: String,
    pub overall_score: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IssueFrequency {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total_items: usize,
    pub average_score: f64,
    pub good: usize,
    pub needs_improvement: usize,
    pub poor: usize,
    pub issues_by_severity: BTreeMap<Severity, usize>,
    pub most_common_issues: Vec<IssueFrequency>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchReport {
    pub reports: Vec<AnalysisReport>,
    pub summary: BatchSummary,
    pub category_averages: BTreeMap<Category, f64>,
    /// Worst first.
    pub ranking: Vec<RankedItem>,
}

// ───────────────────────────────────────────────────────────────────────────
// HTTP request/response bodies
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub item: Option<ContentItem>,
    #[serde(default)]
    pub config: Option<AnalysisConfigOverrides>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct BatchAnalyzeRequest {
    #[serde(default)]
    pub ids: Option<Vec<u64>>,
    #[serde(default)]
    pub items: Option<Vec<ContentItem>>,
    #[serde(default)]
    pub filter: Option<ContentFilter>,
    #[serde(default)]
    pub config: Option<AnalysisConfigOverrides>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HierarchyRequest {
    pub id: u64,
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HierarchyResponse {
    pub id: u64,
    pub ancestor_depth: usize,
    pub descendant_count: usize,
    pub child_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderTagsRequest {
    pub template: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub ids: Option<Vec<u64>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderTagsResponse {
    pub rendered: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
