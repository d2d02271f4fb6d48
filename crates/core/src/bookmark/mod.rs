mod error;
mod types;
mod validation;

pub use error::{BookmarkError, ServiceError, UpdateOutcome};
pub use types::{Bookmark, ETag};
pub use validation::{validate_keys, validate_title, validate_url};
