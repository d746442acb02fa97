pub mod analysis;
pub mod error;
pub mod form;
pub mod schema;
