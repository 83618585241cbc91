use scraper::{Html, Selector};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingRef {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub src: String,
    pub alt: Option<String>,
}

impl ImageRef {
    pub fn missing_alt(&self) -> bool {
        self.alt.as_deref().map(str::trim).unwrap_or("").is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkRef {
    pub href: String,
    pub kind: LinkKind,
}

/// Headings, links and images of a body, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageStructure {
    pub headings: Vec<HeadingRef>,
    pub links: Vec<LinkRef>,
    pub images: Vec<ImageRef>,
}

impl PageStructure {
    pub fn parse(body_html: &str, site_url: Option<&str>) -> Self {
        let document = Html::parse_fragment(body_html);
        let site = site_url.and_then(|s| Url::parse(s.trim()).ok());
        Self {
            headings: extract_headings(&document),
            links: extract_links(&document, site.as_ref()),
            images: extract_images(&document),
        }
    }

    pub fn count_level(&self, level: u8) -> usize {
        self.headings.iter().filter(|h| h.level == level).count()
    }

    pub fn internal_links(&self) -> usize {
        self.links.iter().filter(|l| l.kind == LinkKind::Internal).count()
    }

    pub fn external_links(&self) -> usize {
        self.links.iter().filter(|l| l.kind == LinkKind::External).count()
    }

    /// Number of places where a heading jumps more than one level deeper than
    /// the heading before it (h2 → h4).
    pub fn heading_skips(&self) -> usize {
        self.headings
            .windows(2)
            .filter(|w| w[1].level > w[0].level + 1)
            .count()
    }
}

fn extract_headings(document: &Html) -> Vec<HeadingRef> {
    let Ok(selector) = Selector::parse("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let level = element
                .value()
                .name()
                .strip_prefix('h')
                .and_then(|n| n.parse::<u8>().ok())?;
            let text = element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            Some(HeadingRef { level, text })
        })
        .collect()
}

fn extract_links(document: &Html, site: Option<&Url>) -> Vec<LinkRef> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        let lower = href.to_ascii_lowercase();
        // Skip anchor links, javascript, and contact links
        if href.is_empty()
            || href.starts_with('#')
            || lower.starts_with("javascript:")
            || lower.starts_with("mailto:")
            || lower.starts_with("tel:")
        {
            continue;
        }
        links.push(LinkRef {
            href: href.to_string(),
            kind: classify_link(href, site),
        });
    }
    links
}

/// Relative links and links to the site's own host are internal.
pub fn classify_link(href: &str, site: Option<&Url>) -> LinkKind {
    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Protocol-relative links name a host; everything else stays on site.
            if !href.starts_with("//") {
                return LinkKind::Internal;
            }
            match Url::parse(&format!("https:{}", href)) {
                Ok(url) => url,
                Err(_) => return LinkKind::External,
            }
        }
        Err(_) => return LinkKind::External,
    };

    let Some(site) = site else {
        return LinkKind::External;
    };
    match (resolved.host_str(), site.host_str()) {
        (Some(link_host), Some(site_host)) if bare_host(link_host) == bare_host(site_host) => {
            LinkKind::Internal
        }
        _ => LinkKind::External,
    }
}

fn bare_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

fn extract_images(document: &Html) -> Vec<ImageRef> {
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| ImageRef {
            src: element.value().attr("src").unwrap_or("").to_string(),
            alt: element.value().attr("alt").map(|s| s.to_string()),
        })
        .collect()
}
