use super::{RenderContext, RenderState, TagRegistry};
use crate::analysis::text;
use crate::core::error::{ScoutError, ScoutResult};
use crate::hierarchy;

pub fn register_all(registry: &mut TagRegistry) {
    registry.register("post_id", post_id);
    registry.register("parent_id", parent_id);
    registry.register("parent_title", parent_title);
    registry.register("hierarchy_depth", hierarchy_depth);
    registry.register("child_count", child_count);
    registry.register("descendant_count", descendant_count);
    registry.register("has_children", has_children);
    registry.register("get_contextual_content", contextual_content);
    registry.register("term_names", term_names);
    registry.register("word_count", word_count);
    registry.register("reading_time", reading_time);
    registry.register("loop_index", loop_index);
}

fn post_id(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    Ok(ctx.item.id.to_string())
}

fn parent_id(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    Ok(ctx.item.parent_id.unwrap_or(0).to_string())
}

fn parent_title(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    match ctx.item.parent_id.filter(|p| *p != 0) {
        Some(parent) => Ok(ctx.repo.fetch_content_item(parent)?.title),
        None => Ok(String::new()),
    }
}

fn hierarchy_depth(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    hierarchy::ancestor_depth(ctx.repo, ctx.item.id, ctx.max_depth).map(|d| d.to_string())
}

/// `{child_count}` counts children of the item's own post type; `{child_count:page}` picks one.
fn child_count(ctx: &RenderContext<'_>, arg: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    let post_type = non_empty(arg).unwrap_or(ctx.item.post_type.as_str());
    Ok(hierarchy::child_count(ctx.repo, ctx.item.id, Some(post_type)).to_string())
}

/// `{descendant_count:2}` limits the walk to two levels; never deeper than the context cap.
fn descendant_count(ctx: &RenderContext<'_>, arg: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    let depth = match non_empty(arg) {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            ScoutError::InvalidConfig(format!("descendant_count depth must be a number, got {:?}", raw))
        })?,
        None => ctx.max_depth,
    };
    let count = hierarchy::descendant_count(
        ctx.repo,
        ctx.item.id,
        Some(ctx.item.post_type.as_str()),
        depth.min(ctx.max_depth),
    );
    Ok(count.to_string())
}

fn has_children(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    let any = hierarchy::child_count(ctx.repo, ctx.item.id, Some(ctx.item.post_type.as_str())) > 0;
    Ok(if any { "1" } else { "0" }.to_string())
}

fn contextual_content(ctx: &RenderContext<'_>, arg: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    let item = ctx.item;
    let value = match non_empty(arg).unwrap_or("title") {
        "title" => item.title.clone(),
        "excerpt" => item.excerpt.clone(),
        "slug" => item.slug.clone(),
        "id" => item.id.to_string(),
        "content" => text::html_to_text(&item.body_html),
        "post_type" => item.post_type.clone(),
        other => {
            return Err(ScoutError::InvalidConfig(format!(
                "unknown contextual field {:?}",
                other
            )))
        }
    };
    Ok(value)
}

fn term_names(ctx: &RenderContext<'_>, arg: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    let taxonomy = non_empty(arg)
        .ok_or_else(|| ScoutError::InvalidConfig("term_names needs a taxonomy".to_string()))?;
    let terms = ctx.repo.fetch_terms_assigned(ctx.item.id, taxonomy)?;
    Ok(terms
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", "))
}

fn word_count(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    Ok(text::count_words(&text::html_to_text(&ctx.item.body_html)).to_string())
}

fn reading_time(ctx: &RenderContext<'_>, _: Option<&str>, _: &mut RenderState) -> ScoutResult<String> {
    let words = text::count_words(&text::html_to_text(&ctx.item.body_html));
    Ok(text::reading_time_minutes(words).to_string())
}

fn loop_index(_: &RenderContext<'_>, _: Option<&str>, state: &mut RenderState) -> ScoutResult<String> {
    Ok(state.advance().to_string())
}

fn non_empty(arg: Option<&str>) -> Option<&str> {
    arg.filter(|a| !a.is_empty())
}
