pub mod dedup;
pub mod normalize;
pub mod pipeline;
pub mod sources;

pub use pipeline::{Pipeline, QUERY, REQUIRED_CONFIG};
pub use sources::NewsSource;

pub mod prelude {
    pub use super::pipeline::Pipeline;
    pub use super::sources::NewsSource;
    pub use vigia_core::{Article, Error, Result};
}
