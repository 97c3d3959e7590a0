pub mod error;
pub mod fs;
pub mod scan;
pub mod store;
