mod camera;
mod component;
mod interaction;
mod model;
mod params;
mod render;
mod scheduler;
mod simulation;
mod state;
mod types;

pub use component::KnowledgeGraphCanvas;
pub use types::{KnowledgeNode, NodeType};
