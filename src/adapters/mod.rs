pub mod file;
pub mod mock;
pub mod postgres;
