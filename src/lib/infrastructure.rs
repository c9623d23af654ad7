//! Adapters: Postgres stores, SMTP transport and the HTTP API

pub mod db;
pub mod email;
pub mod http;
