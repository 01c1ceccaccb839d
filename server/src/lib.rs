pub mod datetime;
pub mod forms;
pub mod listing;
pub mod routes;
pub mod seed;
pub mod templates;
