pub mod footer;
pub mod header;
pub mod network_table;
pub mod quote_bar;
