pub mod config;
pub mod deck;
pub mod error;
pub mod image;
pub mod metrics;
pub mod round;
pub mod routes;
pub mod screen;
pub mod session_factory;
pub mod startup;
pub mod store;
pub mod websocket;
