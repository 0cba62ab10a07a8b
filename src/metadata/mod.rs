// src/metadata/mod.rs
mod channel;

pub use channel::{ChannelDefinitionParser, ChannelDescriptor};
