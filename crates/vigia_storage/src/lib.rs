pub mod backends;

pub use backends::*;

pub mod prelude {
    pub use super::backends::*;
    pub use vigia_core::{ArticleStore, StoreFactory};
}
