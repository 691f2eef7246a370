//! Configuration modules for the Shelfmark API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables:
//!
//! - [`cors`]: allowed CORS origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: the bearer-token shared secret

pub mod cors;
pub mod database;
pub mod jwt;
