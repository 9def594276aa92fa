//! Blogsmith: topic-to-article generation pipeline
//!
//! Turns a topic and a tone into an illustrated blog article by orchestrating a text-generation
//! service (headline candidates, then article markup) and an image-generation service (cover
//! art), recovering from partial failure along the way.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod orchestrator;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod types;
