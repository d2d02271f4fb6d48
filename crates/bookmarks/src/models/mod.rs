mod bookmark;

pub use bookmark::BookmarkRequest;
