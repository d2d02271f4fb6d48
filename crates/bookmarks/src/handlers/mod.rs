pub mod bookmarks;
pub mod error;
pub mod health;

pub use error::AppError;
