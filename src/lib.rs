pub mod cache;
pub mod config;
pub mod error;
pub mod flight;
pub mod identity;
pub mod images;
pub mod job;
pub mod models;
pub mod normalize;
pub mod service;
mod text;
pub mod tmdb;
pub mod transform;

pub use error::{MediaError, Result};
pub use models::{Listing, MediaKind, Scope};
pub use service::MediaService;
