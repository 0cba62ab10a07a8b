// src/reader/mod.rs
mod document;
mod frame;
mod frame_table;
mod options;

pub use document::{CfsDocument, ChannelUnits};
pub use frame::{ChannelData, Frame, FrameChannel};
pub use frame_table::{ChannelBlock, FrameDescriptor, FrameTableParser};
pub use options::DecodeOptions;
