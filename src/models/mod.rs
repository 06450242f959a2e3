mod article;
mod dataset;
mod recommendation;
mod user;

pub use article::{Article, SizeCategory};
pub use dataset::{Dataset, Tables};
pub use recommendation::{Recommendation, Strategy};
pub use user::{ClickEvent, User};

pub type UserId = i64;
pub type ArticleId = i64;
pub type ClusterId = i64;
