mod canvas;
mod component;
mod config;
mod error;
mod interaction;
mod model;
mod render;
mod scale;
mod simulation;
mod state;
mod status;
mod types;

pub use component::PeerGraphCanvas;
pub use config::GraphConfig;
pub use types::{EdgeSnapshot, GraphSnapshot, NodeSnapshot, Theme};
