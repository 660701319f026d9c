// JSON API over the search engine

pub mod handlers;
pub mod models;
pub mod routes;
