pub mod library;
pub mod packing;
pub mod table;
pub mod tables;
