//! HTTP surface: `/health`, `/extract`, `/scrape-latest-one`,
//! `/scrape-latest/{site}`, `/remember` and `/history`.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use routes::create_router;
pub use server::HttpServer;
