// src/metadata/channel.rs
use crate::error::{CfsError, Result};
use crate::raw_data::{ByteCursor, SampleFormat};
use crate::types::{ChannelKind, DataType};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Descriptor of one channel from the channel-definition table
///
/// This structure holds everything the file says about a channel that does
/// not change from frame to frame:
/// - Name and axis units
/// - Stored data type and channel kind
/// - Byte spacing between samples (interleaving)
///
/// Calibration and sampling interval are stored per frame in CFS and live on
/// [`ChannelBlock`](crate::reader::ChannelBlock) instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDescriptor {
    /// Position in the channel table, 0-based
    pub index: usize,

    pub name: String,

    pub y_units: String,

    pub x_units: String,

    /// Raw data type code as stored
    pub data_type_code: u8,

    pub kind: ChannelKind,

    /// Distance in bytes between consecutive samples
    pub byte_space: u16,

    /// Next channel in the same interleave group, or -1
    pub next_channel: i16,

    format: std::result::Result<SampleFormat, CfsError>,
}

impl ChannelDescriptor {
    pub const RECORD_SIZE: usize = 48;

    /// Build a descriptor, resolving whether its samples can be decoded
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: usize,
        name: impl Into<String>,
        y_units: impl Into<String>,
        x_units: impl Into<String>,
        data_type_code: u8,
        kind: ChannelKind,
        byte_space: u16,
        next_channel: i16,
    ) -> Self {
        let format = Self::resolve_format(index, data_type_code, kind, byte_space);
        ChannelDescriptor {
            index,
            name: name.into(),
            y_units: y_units.into(),
            x_units: x_units.into(),
            data_type_code,
            kind,
            byte_space,
            next_channel,
            format,
        }
    }

    fn resolve_format(
        index: usize,
        code: u8,
        kind: ChannelKind,
        byte_space: u16,
    ) -> std::result::Result<SampleFormat, CfsError> {
        let data_type = DataType::from_code(code)
            .ok_or(CfsError::UnknownDataType { channel: index, code })?;

        match kind {
            ChannelKind::EqualSpaced => {}
            // No verified sample layout for these
            ChannelKind::Matrix | ChannelKind::Subsidiary | ChannelKind::Other(_) => {
                return Err(CfsError::UnsupportedChannelKind {
                    channel: index,
                    kind: kind.to_string(),
                });
            }
        }

        let format = SampleFormat::new(data_type, byte_space as usize)
            .ok_or(CfsError::NonNumericChannel { channel: index })?;
        if format.stride() < format.sample_size() {
            return Err(CfsError::MisalignedBlock {
                length: 0,
                stride: format.stride(),
                sample_size: format.sample_size(),
            });
        }
        Ok(format)
    }

    /// Parse one 48-byte channel record
    pub fn parse(cursor: &mut ByteCursor, index: usize) -> Result<Self> {
        let name = cursor.read_lstr_field(22)?;
        let y_units = cursor.read_lstr_field(10)?;
        let x_units = cursor.read_lstr_field(10)?;
        let data_type_code = cursor.read_u8()?;
        let kind = ChannelKind::from_code(cursor.read_u8()?);
        let byte_space = cursor.read_u16()?;
        let next_channel = cursor.read_i16()?;

        Ok(Self::new(
            index,
            name,
            y_units,
            x_units,
            data_type_code,
            kind,
            byte_space,
            next_channel,
        ))
    }

    pub fn data_type(&self) -> Option<DataType> {
        DataType::from_code(self.data_type_code)
    }

    /// How to decode this channel's samples, or why it cannot be decoded
    pub fn sample_format(&self) -> Result<SampleFormat> {
        self.format.clone()
    }

    pub fn is_available(&self) -> bool {
        self.format.is_ok()
    }

    pub fn unavailable_reason(&self) -> Option<&CfsError> {
        self.format.as_ref().err()
    }
}

/// Parser for the channel-definition table
pub struct ChannelDefinitionParser;

impl ChannelDefinitionParser {
    /// Parse `count` channel records starting at the cursor's position.
    ///
    /// Channels whose data type or kind cannot be decoded are still returned,
    /// marked unavailable, so the rest of the file stays readable.
    pub fn parse(cursor: &mut ByteCursor, count: usize) -> Result<Vec<ChannelDescriptor>> {
        let mut channels = Vec::with_capacity(count);
        let mut seen = HashSet::with_capacity(count);

        for index in 0..count {
            let channel = ChannelDescriptor::parse(cursor, index)?;

            if let Some(reason) = channel.unavailable_reason() {
                warn!(channel = index, name = %channel.name, %reason, "channel unavailable");
            }
            if !seen.insert(channel.name.clone()) {
                warn!(
                    channel = index,
                    name = %channel.name,
                    "duplicate channel name, later index takes precedence"
                );
            }
            channels.push(channel);
        }

        debug!(count = channels.len(), "decoded channel table");
        Ok(channels)
    }
}
