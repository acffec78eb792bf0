pub mod error;
pub mod job;
pub mod manifest;
pub mod plan;
pub mod rendition;
