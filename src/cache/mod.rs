//! Lectern cache layer.
//!
//! Two in-memory, unbounded indexes sit in front of the store:
//!
//! - **[`ArticleIndex`]**: articles by id, plus an advisory title lookup
//! - **[`CommentIndex`]**: comments by id, by author and by owning article
//!
//! Entries appear on read-through or write-through and disappear only when a
//! domain delete invalidates them. There is no size or age based eviction.
//! Each index keeps its primary and secondary maps behind one lock, so a
//! reader never sees an id entry without its secondary entries or the reverse.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enable_article_cache = true
//! enable_comment_cache = true
//! ```

mod articles;
mod comments;
mod config;
mod index;
mod keys;
mod lock;
pub mod stats;

pub use articles::ArticleIndex;
pub use comments::CommentIndex;
pub use config::CacheConfig;
pub use keys::{Indexed, NormalizedKey};
