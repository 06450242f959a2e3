pub mod catalog;
pub mod content;
pub mod popularity;
pub mod recommender;
pub mod repository;

pub use content::ContentMatcher;
pub use recommender::Recommender;
pub use repository::Repository;
