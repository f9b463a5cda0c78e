pub mod common;
pub mod extract;
pub mod info;
pub mod list;
pub mod rewrite;
pub mod save_as;
