// src/reader/frame.rs
use crate::error::{CfsError, Result};
use crate::header::{read_variables, VariableDescriptor};
use crate::metadata::ChannelDescriptor;
use crate::raw_data::{ByteCursor, DataBlockDecoder, ScalingConverter};
use crate::reader::FrameDescriptor;
use crate::types::Variable;
use tracing::debug;

/// Physical samples of one channel in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelData {
    /// Index into the document's channel table
    pub channel: usize,
    pub name: String,
    /// Sampling interval in x units (usually seconds)
    pub sampling_interval: f64,
    /// Scaled samples in y units
    pub samples: Vec<f64>,
    /// X coordinate of each sample
    pub x: Vec<f64>,
}

impl ChannelData {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A channel's entry in a decoded frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameChannel {
    Decoded(ChannelData),
    /// The channel's layout could not be decoded; other channels are unaffected
    Unavailable {
        channel: usize,
        name: String,
        reason: CfsError,
    },
}

impl FrameChannel {
    pub fn name(&self) -> &str {
        match self {
            FrameChannel::Decoded(data) => &data.name,
            FrameChannel::Unavailable { name, .. } => name,
        }
    }

    pub fn data(&self) -> Option<&ChannelData> {
        match self {
            FrameChannel::Decoded(data) => Some(data),
            FrameChannel::Unavailable { .. } => None,
        }
    }
}

/// One decoded frame (CFS data section)
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub flags: u16,
    /// Frame variables, e.g. trial state or stimulator power
    pub variables: Vec<Variable>,
    /// One entry per channel, in channel order
    pub channels: Vec<FrameChannel>,
}

impl Frame {
    /// Decode every channel block and frame variable described by `descriptor`
    pub(crate) fn decode(
        cursor: &ByteCursor,
        descriptor: &FrameDescriptor,
        channels: &[ChannelDescriptor],
        frame_vars: &[VariableDescriptor],
        filter_internal: bool,
    ) -> Result<Self> {
        let mut decoded = Vec::with_capacity(channels.len());

        for (channel, block) in channels.iter().zip(descriptor.blocks.iter()) {
            let format = match channel.sample_format() {
                Ok(format) => format,
                Err(reason) => {
                    decoded.push(FrameChannel::Unavailable {
                        channel: channel.index,
                        name: channel.name.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let raw = DataBlockDecoder::decode(cursor, format, block.offset, block.length)?;
            let samples = ScalingConverter::to_physical(&raw, block.calibration());
            let x = ScalingConverter::x_coordinates(&block.x_axis(), samples.len())?;

            decoded.push(FrameChannel::Decoded(ChannelData {
                channel: channel.index,
                name: channel.name.clone(),
                sampling_interval: block.x_increment,
                samples,
                x,
            }));
        }

        let variables = read_variables(
            frame_vars,
            cursor,
            descriptor.variables_offset,
            filter_internal,
        )?;

        debug!(frame = descriptor.index, channels = decoded.len(), "decoded frame");
        Ok(Frame {
            index: descriptor.index,
            flags: descriptor.flags,
            variables,
            channels: decoded,
        })
    }

    /// Data for the channel called `name`. When several channels share a
    /// name the one with the highest index wins.
    pub fn channel(&self, name: &str) -> Option<&ChannelData> {
        self.channels
            .iter()
            .rev()
            .find(|c| c.name() == name)
            .and_then(FrameChannel::data)
    }

    /// Like [`Frame::channel`], but says why the data is missing
    pub fn require_channel(&self, name: &str) -> Result<&ChannelData> {
        match self.channels.iter().rev().find(|c| c.name() == name) {
            Some(FrameChannel::Decoded(data)) => Ok(data),
            Some(FrameChannel::Unavailable { reason, .. }) => Err(reason.clone()),
            None => Err(CfsError::ChannelNotFound(name.to_string())),
        }
    }

    pub fn channel_at(&self, index: usize) -> Option<&FrameChannel> {
        self.channels.get(index)
    }

    pub fn samples(&self, name: &str) -> Option<&[f64]> {
        self.channel(name).map(|c| c.samples.as_slice())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(FrameChannel::name)
    }
}
