pub mod api;
pub mod keyvalue;
pub mod models;
pub mod view;
