#![doc = "The `pookie_todo` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication mechanisms, the"]
#![doc = "flat-file document store, the chat relay, routing configuration, and"]
#![doc = "error handling for the to-do API. It is used by the main binary"]
#![doc = "(`main.rs`) to construct and run the application."]

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;
