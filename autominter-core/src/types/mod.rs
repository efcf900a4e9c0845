pub mod account;
pub mod mint;

pub mod prelude {
    pub use super::account::{UserProfile, Points, AccountSnapshot};
    pub use super::mint::{
        GeneratedImage,
        MintRequest,
        MintStatus,
        MintStatusUpdate,
        TransactionReceipt,
        MintReceipt
    };
}
