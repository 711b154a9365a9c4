pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod model;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

#[cfg(test)]
pub mod test_support;
