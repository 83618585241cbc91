use crate::types::AnalysisConfig;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ScoutConfig: file-based config loader (seo-scout.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "SEO_SCOUT_CONFIG";
pub const ENV_SITE_URL: &str = "SEO_SCOUT_SITE_URL";
pub const ENV_CONTENT_PATH: &str = "SEO_SCOUT_CONTENT_PATH";
pub const ENV_CAPABILITIES: &str = "SEO_SCOUT_CAPABILITIES";
pub const ENV_MAX_HIERARCHY_DEPTH: &str = "SEO_SCOUT_MAX_HIERARCHY_DEPTH";

pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 64;

/// Top-level config loaded from `seo-scout.json`.
#[derive(serde::Deserialize, Default, Clone, Debug)]
#[serde(default)]
pub struct ScoutConfig {
    /// Default thresholds; request-level configs replace these wholesale.
    pub analysis: AnalysisConfig,
    /// Public site URL, used to classify links as internal.
    pub site_url: Option<String>,
    /// JSON corpus backing the in-memory repository.
    pub content_path: Option<String>,
    /// Capabilities granted to the acting user. `None` grants the editor set.
    pub capabilities: Option<Vec<String>>,
    /// Hard cap for parent-chain and subtree walks.
    pub max_hierarchy_depth: Option<usize>,
}

impl ScoutConfig {
    /// Site URL: JSON field → `SEO_SCOUT_SITE_URL` env var → `analysis.site_url` → `None`.
    pub fn resolve_site_url(&self) -> Option<String> {
        if let Some(u) = &self.site_url {
            if !u.trim().is_empty() {
                return Some(u.trim().to_string());
            }
        }
        std::env::var(ENV_SITE_URL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| self.analysis.site_url.clone())
    }

    /// Corpus path: JSON field → `SEO_SCOUT_CONTENT_PATH` env var → `content.json`.
    pub fn resolve_content_path(&self) -> PathBuf {
        if let Some(p) = &self.content_path {
            if !p.trim().is_empty() {
                return PathBuf::from(p.trim());
            }
        }
        std::env::var(ENV_CONTENT_PATH)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("content.json"))
    }

    /// Capabilities: JSON list → `SEO_SCOUT_CAPABILITIES` (comma separated) → editor defaults.
    pub fn resolve_capabilities(&self) -> Vec<String> {
        if let Some(caps) = &self.capabilities {
            return caps.clone();
        }
        if let Ok(v) = std::env::var(ENV_CAPABILITIES) {
            return v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        ["read", "edit_posts", "edit_pages"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Depth cap: JSON field → `SEO_SCOUT_MAX_HIERARCHY_DEPTH` → 64.
    pub fn resolve_max_hierarchy_depth(&self) -> usize {
        if let Some(n) = self.max_hierarchy_depth {
            return n;
        }
        std::env::var(ENV_MAX_HIERARCHY_DEPTH)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_HIERARCHY_DEPTH)
    }

    /// Analysis defaults with the resolved site URL folded in.
    pub fn analysis_defaults(&self) -> AnalysisConfig {
        AnalysisConfig {
            site_url: self.resolve_site_url(),
            ..self.analysis.clone()
        }
    }
}

/// Load `seo-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `SEO_SCOUT_CONFIG` env var path
/// 2. `./seo-scout.json`
/// 3. `../seo-scout.json`
/// 4. `~/.seo-scout/config.json`
///
/// Missing file → `ScoutConfig::default()`.
/// Parse error → log a warning, return `ScoutConfig::default()`.
pub fn load_scout_config() -> ScoutConfig {
    let candidates: Vec<PathBuf> = {
        let mut v = vec![
            PathBuf::from("seo-scout.json"),
            PathBuf::from("../seo-scout.json"),
        ];
        if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
            v.insert(0, PathBuf::from(env_path));
        }
        if let Some(home) = dirs::home_dir() {
            v.push(home.join(".seo-scout").join("config.json"));
        }
        v
    };

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        return parse_scout_config(&contents, &path.display().to_string());
    }

    ScoutConfig::default()
}

pub fn parse_scout_config(contents: &str, origin: &str) -> ScoutConfig {
    match serde_json::from_str::<ScoutConfig>(contents) {
        Ok(cfg) => {
            tracing::info!("seo-scout.json loaded from {}", origin);
            cfg
        }
        Err(e) => {
            tracing::warn!(
                "seo-scout.json parse error at {}: {}; using defaults",
                origin,
                e
            );
            ScoutConfig::default()
        }
    }
}

/// HTTP port: `--port N` / `--port=N` → `SEO_SCOUT_PORT` / `PORT` → 5000.
pub fn resolve_port(args: &[String]) -> u16 {
    parse_port_from_args(args)
        .or_else(port_from_env)
        .unwrap_or(5000)
}

fn parse_port_from_args(args: &[String]) -> Option<u16> {
    let mut iter = args.iter();
    while let Some(a) = iter.next() {
        if a == "--port" {
            if let Some(p) = iter.next().and_then(|v| v.parse::<u16>().ok()) {
                return Some(p);
            }
        } else if let Some(rest) = a.strip_prefix("--port=") {
            if let Ok(p) = rest.parse::<u16>() {
                return Some(p);
            }
        }
    }
    None
}

fn port_from_env() -> Option<u16> {
    for k in ["SEO_SCOUT_PORT", "PORT"] {
        if let Ok(v) = std::env::var(k) {
            if let Ok(p) = v.trim().parse::<u16>() {
                return Some(p);
            }
        }
    }
    None
}
