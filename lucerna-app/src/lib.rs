//! Host glue for the Lucerna demos: GPU/surface bootstrap, the per-frame
//! input event queue, the application context, frame timing, and asset
//! upload (textures, the tutorial cube).

pub mod context;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod texture;
pub mod time;

pub use context::AppContext;
pub use gpu::{FrameAcquire, GpuContext};
pub use input::{InputEvent, InputQueue, Key};
pub use time::FrameClock;
