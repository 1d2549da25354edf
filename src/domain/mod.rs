pub mod availability;
pub mod book;
pub mod commands;
pub mod errors;
pub mod report;
pub mod sale;
pub mod snapshot;
pub mod value_objects;

pub use availability::*;
pub use book::*;
pub use errors::*;
pub use report::*;
pub use sale::*;
pub use snapshot::*;
pub use value_objects::*;
