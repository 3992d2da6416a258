pub mod client;
pub mod error;
mod retry;
pub mod table;

pub use client::FeedClient;
pub use error::FeedError;
pub use table::{parse_table, read_table_file, TableFormat};
