pub mod filename;
pub mod id;
pub mod resolve;
pub mod track;
