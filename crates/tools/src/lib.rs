//! Helpers behind the `budget_table` binary

pub mod clock;
pub mod table;
