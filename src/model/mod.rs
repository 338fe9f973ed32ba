pub mod buffer;
pub mod config;
pub mod cursor;
pub mod unit;
pub mod view;
