pub mod types;
pub mod extractor;
pub mod error;

pub mod prelude {
    pub use super::types::prelude::*;

    pub use super::extractor::{
        TokenIdExtractor,
        Strategy,
        Transfer
    };

    pub use super::error::{
        ApiError,
        UNKNOWN_ERROR
    };
}
