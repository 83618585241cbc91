//! Dynamic data tags: `{name}` / `{name:argument}` placeholders resolved
//! against one content item.
//!
//! Handlers live in a [`TagRegistry`] keyed by tag name. Anything that needs to
//! survive between placeholders of one rendering pass (the loop counter) is
//! carried in an explicit [`RenderState`], never in a global.

pub mod builtin;

use crate::core::error::ScoutResult;
use crate::repository::ContentRepository;
use crate::types::ContentItem;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| {
        Regex::new(r"\{([a-z_][a-z0-9_]*)(?::([^{}]*))?\}").expect("tag regex is valid")
    })
}

/// Per-pass mutable state. `render_loop` resets it before the first item.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderState {
    loop_index: u64,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.loop_index = 0;
    }

    /// Bump the counter and return the new value (1-based).
    pub fn advance(&mut self) -> u64 {
        self.loop_index += 1;
        self.loop_index
    }

    pub fn loop_index(&self) -> u64 {
        self.loop_index
    }
}

/// What a handler may look at while resolving a placeholder.
pub struct RenderContext<'a> {
    pub repo: &'a dyn ContentRepository,
    pub item: &'a ContentItem,
    /// Cap for hierarchy walks triggered by tags.
    pub max_depth: usize,
}

pub type TagHandler =
    fn(ctx: &RenderContext<'_>, argument: Option<&str>, state: &mut RenderState) -> ScoutResult<String>;

#[derive(Clone, Default)]
pub struct TagRegistry {
    handlers: HashMap<&'static str, TagHandler>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_tags() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    pub fn register(&mut self, name: &'static str, handler: TagHandler) {
        if self.handlers.insert(name, handler).is_some() {
            debug!("tag handler '{}' replaced", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve every known placeholder in `template`. Unknown names stay as
    /// written; a failing handler renders as an empty string.
    pub fn render(&self, template: &str, ctx: &RenderContext<'_>, state: &mut RenderState) -> String {
        tag_re()
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                let Some(handler) = self.handlers.get(name) else {
                    return caps[0].to_string();
                };
                let argument = caps.get(2).map(|m| m.as_str().trim());
                match handler(ctx, argument, state) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!("tag {{{}}} failed for content {}: {}", name, ctx.item.id, e);
                        String::new()
                    }
                }
            })
            .into_owned()
    }

    /// One rendering pass over a list of items, sharing a freshly reset state.
    pub fn render_loop(
        &self,
        template: &str,
        repo: &dyn ContentRepository,
        items: &[ContentItem],
        max_depth: usize,
        state: &mut RenderState,
    ) -> Vec<String> {
        state.reset();
        items
            .iter()
            .map(|item| {
                let ctx = RenderContext {
                    repo,
                    item,
                    max_depth,
                };
                self.render(template, &ctx, state)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn shout(ctx: &RenderContext<'_>, arg: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
        Ok(format!("{}{}", ctx.item.title.to_uppercase(), arg.unwrap_or("")))
    }

    fn broken(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
        Err(crate::core::error::ScoutError::NotFound(ctx.item.id))
    }

    #[test]
    fn test_unknown_tags_are_left_alone() {
        let mut registry = TagRegistry::new();
        registry.register("shout", shout);
        registry.register("broken", broken);
        let item = ContentItem {
            id: 7,
            title: "hi".to_string(),
            ..Default::default()
        };
        let repo = InMemoryRepository::unrestricted(vec![item.clone()]);
        let ctx = RenderContext {
            repo: &repo,
            item: &item,
            max_depth: 64,
        };
        let mut state = RenderState::new();
        let out = registry.render("{shout:!} {nope} {Shout} [{broken}] {", &ctx, &mut state);
        assert_eq!(out, "HI! {nope} {Shout} [] {");
    }

    #[test]
    fn test_render_state_counts_from_one() {
        let mut state = RenderState::new();
        assert_eq!(state.advance(), 1);
        assert_eq!(state.advance(), 2);
        state.reset();
        assert_eq!(state.loop_index(), 0);
    }
}
