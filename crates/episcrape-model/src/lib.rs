pub mod catalog;
pub mod record;
pub mod table;
mod shows;

pub use catalog::*;
pub use record::*;
pub use table::{read_table, write_table};
