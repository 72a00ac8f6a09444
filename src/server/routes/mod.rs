pub mod favorites;
pub mod list;
