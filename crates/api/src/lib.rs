//! HTTP API: server wiring, routing, and request/response mapping for the
//! product catalog.

pub mod app;
pub mod middleware;
