pub mod crypto;
pub mod error;
pub mod export;
pub mod index;
pub mod links;
pub mod markdown;
pub mod models;
pub mod storage;
pub mod validation;

pub use error::{Error, Result};
