//! Utility library for the ns-sweep project

pub mod columns;

pub use columns::{read_columns, Column, ColumnError, ColumnTable};
