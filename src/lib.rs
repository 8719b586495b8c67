//! Assistive front-end plumbing for cloud vision and speech services
//!
//! Normalizes an uploaded image, asks Google Cloud Vision for scene labels,
//! objects, or text, reads recognised text aloud through Text-to-Speech, and
//! derives simple keyword guidance from it.

pub mod client;
pub mod cloud;
pub mod error;
pub mod guidance;
pub mod image;
pub mod models;

pub use client::{ActionOutput, Command, EmptyResult, VisionClient, VisionServices};
pub use error::{Error, Result};
