pub mod items;

pub use items::{DeleteResponse, ItemResponse};
