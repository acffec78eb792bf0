//! Upload a video, transcode it into an HLS rendition ladder with ffmpeg and
//! serve the resulting playlists and segments over HTTP.

pub mod app;
pub mod common;
pub mod config;
pub mod docs;
pub mod infrastructure;
pub mod modules;
pub mod routes;
pub mod state;
pub mod transcoder;
