mod api_url;
mod auth;
mod client;
pub mod domain;

pub(crate) use api_url::*;

pub use auth::*;
pub use client::*;
