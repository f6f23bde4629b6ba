//! Configuration for spaudio

mod pipeline_desc;
mod preset;
mod room_desc;

pub use pipeline_desc::PipelineDesc;
pub use preset::RoomPreset;
pub use room_desc::RoomDesc;
