//! Read-only access to the host's content. The engine treats the repository as
//! an external collaborator; existence and permission checks live here, not in
//! the scoring pipeline.

pub mod memory;

use crate::core::error::{ScoutError, ScoutResult};
use crate::types::{ContentFilter, ContentItem, TermRef};

pub use memory::InMemoryRepository;

pub const CAP_EDIT_POSTS: &str = "edit_posts";
pub const CAP_READ: &str = "read";

pub trait ContentRepository: Send + Sync {
    fn fetch_content_item(&self, id: u64) -> ScoutResult<ContentItem>;

    fn fetch_terms_assigned(&self, content_id: u64, taxonomy: &str) -> ScoutResult<Vec<TermRef>>;

    fn current_actor_can(&self, capability: &str) -> bool;

    fn list_content_items(&self, filter: &ContentFilter) -> Vec<ContentItem>;

    /// `Forbidden` unless the acting user holds `capability`.
    fn require(&self, capability: &str) -> ScoutResult<()> {
        if self.current_actor_can(capability) {
            Ok(())
        } else {
            Err(ScoutError::Forbidden(capability.to_string()))
        }
    }

    /// Every requested id, in request order; the first missing id fails the call.
    fn fetch_many(&self, ids: &[u64]) -> ScoutResult<Vec<ContentItem>> {
        ids.iter().map(|id| self.fetch_content_item(*id)).collect()
    }
}
