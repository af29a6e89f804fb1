// src/badge/mod.rs
// =============================================================================
// The ref badge: a small link telling readers which branch, commit or pull
// request they are looking at.
//
// The state it reads (RefContext) is owned by whoever builds the page; the
// badge only observes it through a tokio watch channel.
// =============================================================================

mod render;

pub use render::{RefBadge, RefContext, SourceType};
