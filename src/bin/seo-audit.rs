use anyhow::Context;
use std::path::PathBuf;

use seo_scout::analysis;
use seo_scout::config::load_scout_config;
use seo_scout::repository::{ContentRepository, InMemoryRepository};
use seo_scout::types::{BatchReport, ContentFilter, Rating};

struct AuditArgs {
    corpus: PathBuf,
    keyword: Option<String>,
    site_url: Option<String>,
    json: bool,
}

fn usage() -> ! {
    eprintln!("Usage: seo-audit <corpus.json> [--keyword K] [--site-url U] [--json]");
    eprintln!("\nEnv:");
    eprintln!("  SEO_SCOUT_CONFIG=... (optional, path to seo-scout.json)");
    eprintln!("  SEO_SCOUT_SITE_URL=https://example.com (optional, internal link detection)");
    eprintln!("  RUST_LOG=debug (optional, log to stderr)");
    std::process::exit(2);
}

fn parse_args(args: &[String]) -> Option<AuditArgs> {
    let mut corpus = None;
    let mut keyword = None;
    let mut site_url = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(a) = iter.next() {
        match a.as_str() {
            "--keyword" => keyword = Some(iter.next()?.clone()),
            "--site-url" => site_url = Some(iter.next()?.clone()),
            "--json" => json = true,
            "-h" | "--help" => return None,
            other => {
                if let Some(rest) = other.strip_prefix("--keyword=") {
                    keyword = Some(rest.to_string());
                } else if let Some(rest) = other.strip_prefix("--site-url=") {
                    site_url = Some(rest.to_string());
                } else if other.starts_with("--") || corpus.is_some() {
                    return None;
                } else {
                    corpus = Some(PathBuf::from(other));
                }
            }
        }
    }

    Some(AuditArgs {
        corpus: corpus?,
        keyword,
        site_url,
        json,
    })
}

fn print_table(report: &BatchReport) {
    println!("{:>8}  {:>5}  {:<18}  {:>6}  TITLE", "ID", "SCORE", "RATING", "ISSUES");
    for ranked in &report.ranking {
        let Some(r) = report.reports.iter().find(|r| r.content_id == ranked.id) else {
            continue;
        };
        let rating = match r.rating {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs_improvement",
            Rating::Poor => "poor",
        };
        println!(
            "{:>8}  {:>5}  {:<18}  {:>6}  {}",
            r.content_id,
            r.overall_score,
            rating,
            r.issues.len(),
            r.title
        );
    }

    let s = &report.summary;
    println!();
    println!(
        "{} items, average {:.2} (good {}, needs improvement {}, poor {})",
        s.total_items, s.average_score, s.good, s.needs_improvement, s.poor
    );
    if !s.most_common_issues.is_empty() {
        println!("Most common issues:");
        for f in &s.most_common_issues {
            println!("  {:>4}  {}", f.count, f.issue_type);
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init()
        .ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(audit) = parse_args(&args) else {
        usage();
    };

    let mut config = load_scout_config().analysis_defaults();
    if audit.keyword.is_some() {
        config.focus_keyword = audit.keyword;
    }
    if audit.site_url.is_some() {
        config.site_url = audit.site_url;
    }
    config.validate()?;

    let repo = InMemoryRepository::load(&audit.corpus, std::iter::empty())
        .with_context(|| format!("failed to load corpus {}", audit.corpus.display()))?;
    let items = repo.list_content_items(&ContentFilter::default());
    let report = analysis::analyze_batch(&items, &config);

    if audit.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&args(&["posts.json", "--keyword", "rust", "--json"])).unwrap();
        assert_eq!(parsed.corpus, PathBuf::from("posts.json"));
        assert_eq!(parsed.keyword.as_deref(), Some("rust"));
        assert!(parsed.json);

        let parsed = parse_args(&args(&["--site-url=https://a.example", "x.json"])).unwrap();
        assert_eq!(parsed.site_url.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&args(&[])).is_none());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_none());
        assert!(parse_args(&args(&["a.json", "--keyword"])).is_none());
        assert!(parse_args(&args(&["a.json", "--frobnicate"])).is_none());
    }
}
