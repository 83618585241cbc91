//! Parent/child walks over the repository.
//!
//! Both walks carry a visited set and a depth cap, so cyclic or corrupt
//! parent links terminate instead of recursing forever.

use crate::core::error::ScoutResult;
use crate::repository::ContentRepository;
use crate::types::ContentFilter;
use std::collections::HashSet;
use tracing::warn;

/// Number of ancestors above `id`; a root item has depth 0.
///
/// The walk stops at a missing parent, a revisited node, or after `max_depth` hops.
pub fn ancestor_depth(repo: &dyn ContentRepository, id: u64, max_depth: usize) -> ScoutResult<usize> {
    let item = repo.fetch_content_item(id)?;
    let mut visited = HashSet::from([id]);
    let mut depth = 0;
    let mut parent = item.parent_id.filter(|p| *p != 0);

    while let Some(parent_id) = parent {
        if depth >= max_depth {
            warn!("ancestor walk from {} hit depth cap {}", id, max_depth);
            break;
        }
        if !visited.insert(parent_id) {
            warn!("parent cycle detected at {} while walking up from {}", parent_id, id);
            break;
        }
        match repo.fetch_content_item(parent_id) {
            Ok(parent_item) => {
                depth += 1;
                parent = parent_item.parent_id.filter(|p| *p != 0);
            }
            Err(_) => break,
        }
    }
    Ok(depth)
}

/// Direct children of `id`, optionally restricted to one post type.
pub fn child_count(repo: &dyn ContentRepository, id: u64, post_type: Option<&str>) -> usize {
    repo.list_content_items(&ContentFilter::children_of(id, post_type))
        .len()
}

/// Children, grandchildren and so on down to `max_depth` levels.
///
/// Children are queried with the post-type filter, so items of another type are
/// neither counted nor descended into.
pub fn descendant_count(
    repo: &dyn ContentRepository,
    id: u64,
    post_type: Option<&str>,
    max_depth: usize,
) -> usize {
    let mut visited = HashSet::from([id]);
    let mut frontier = vec![id];
    let mut count = 0;

    for _ in 0..max_depth {
        if frontier.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for parent in frontier {
            for child in repo.list_content_items(&ContentFilter::children_of(parent, post_type)) {
                if visited.insert(child.id) {
                    count += 1;
                    next.push(child.id);
                } else {
                    warn!("content {} reached twice below {}; skipping", child.id, id);
                }
            }
        }
        frontier = next;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use crate::types::ContentItem;

    fn page(id: u64, parent: Option<u64>) -> ContentItem {
        ContentItem {
            id,
            post_type: "page".to_string(),
            parent_id: parent,
            title: format!("Page {}", id),
            ..Default::default()
        }
    }

    fn tree() -> InMemoryRepository {
        // A(1) -> {B(2), C(3)}, B -> {D(4)}
        InMemoryRepository::unrestricted(vec![
            page(1, None),
            page(2, Some(1)),
            page(3, Some(1)),
            page(4, Some(2)),
        ])
    }

    #[test]
    fn test_descendants_on_small_tree() {
        let repo = tree();
        assert_eq!(descendant_count(&repo, 1, Some("page"), 64), 3);
        assert_eq!(descendant_count(&repo, 1, Some("page"), 1), 2);
        assert_eq!(descendant_count(&repo, 4, Some("page"), 64), 0);
        assert_eq!(child_count(&repo, 1, None), 2);
    }

    #[test]
    fn test_post_type_filter_blocks_descent() {
        let mut items = vec![page(1, None)];
        items.push(ContentItem {
            id: 2,
            parent_id: Some(1),
            ..Default::default()
        });
        items.push(page(3, Some(2)));
        let repo = InMemoryRepository::unrestricted(items);
        assert_eq!(descendant_count(&repo, 1, Some("page"), 64), 0);
        assert_eq!(descendant_count(&repo, 1, None, 64), 2);
    }

    #[test]
    fn test_ancestor_depth() {
        let repo = tree();
        assert_eq!(ancestor_depth(&repo, 1, 64).unwrap(), 0);
        assert_eq!(ancestor_depth(&repo, 4, 64).unwrap(), 2);
        assert_eq!(ancestor_depth(&repo, 4, 1).unwrap(), 1);
        assert!(ancestor_depth(&repo, 99, 64).is_err());
    }

    #[test]
    fn test_cycles_terminate() {
        let repo = InMemoryRepository::unrestricted(vec![page(1, Some(2)), page(2, Some(1))]);
        assert_eq!(ancestor_depth(&repo, 1, 64).unwrap(), 1);
        assert_eq!(descendant_count(&repo, 1, Some("page"), 64), 1);
    }

    #[test]
    fn test_missing_parent_stops_walk() {
        let repo = InMemoryRepository::unrestricted(vec![page(5, Some(404))]);
        assert_eq!(ancestor_depth(&repo, 5, 64).unwrap(), 0);
    }
}
