pub mod analysis;
pub mod api;
pub mod core;
pub mod hierarchy;
pub mod repository;
pub mod tags;

// --- Primary core exports ---
pub use core::config;
pub use core::error;
pub use core::types;
pub use core::types::*;
pub use core::AppState;

pub use analysis::{analyze, analyze_batch, TitleIndex};
pub use error::{ScoutError, ScoutResult};
pub use repository::{ContentRepository, InMemoryRepository};
pub use tags::{RenderContext, RenderState, TagRegistry};
