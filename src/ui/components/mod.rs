pub mod board;
pub mod summary;
