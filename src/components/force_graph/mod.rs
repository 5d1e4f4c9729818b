mod component;
pub mod frame_loop;
pub mod interaction;
pub mod model;
pub mod render;
pub mod sampler;
pub mod simulation;
mod state;
mod types;
pub mod viewport;

pub use component::ForceGraphCanvas;
pub use interaction::{InteractionEvent, ViewportCommand};
pub use sampler::{LinkSampler, TargetPicker};
pub use state::ForceGraphState;
pub use types::{GraphData, GraphLink, GraphNode, Point};
