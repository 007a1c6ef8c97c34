mod table;
mod text;

pub use table::Table;
pub use text::*;
