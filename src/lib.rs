pub mod client;
pub mod collections;
pub mod confirmation;
pub mod directory;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod rental_file;
