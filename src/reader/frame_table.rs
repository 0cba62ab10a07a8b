// src/reader/frame_table.rs
use crate::error::{CfsError, Result};
use crate::header::FileHeader;
use crate::metadata::ChannelDescriptor;
use crate::raw_data::{widen_f32, ByteCursor, Calibration, XAxis};
use smallvec::SmallVec;
use std::ops::Range;
use tracing::debug;

/// One channel's data block within a frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBlock {
    /// Absolute offset of the first sample
    pub offset: usize,
    /// Payload bytes, `points * sample size`. Zero for unavailable channels.
    pub length: usize,
    pub points: usize,
    pub y_scale: f64,
    pub y_offset: f64,
    /// Sampling interval in x units
    pub x_increment: f64,
    pub x_offset: f64,
}

impl ChannelBlock {
    pub const SIZE: usize = 24;

    pub fn calibration(&self) -> Calibration {
        Calibration::new(self.y_scale, self.y_offset)
    }

    pub fn x_axis(&self) -> XAxis {
        XAxis::equal_spaced(self.x_offset, self.x_increment)
    }
}

/// Location and layout of one frame (CFS data section)
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDescriptor {
    pub index: usize,
    /// Offset of the data-section header
    pub header_offset: usize,
    pub previous_header: i32,
    /// Start of this frame's channel data
    pub data_pointer: usize,
    pub data_size: usize,
    pub flags: u16,
    /// Start of the frame-variable value area
    pub variables_offset: usize,
    /// One block per channel, in channel order
    pub blocks: SmallVec<[ChannelBlock; 8]>,
}

impl FrameDescriptor {
    pub const FIXED_SIZE: usize = 30;
    pub const CHANNEL_INFO_SIZE: usize = ChannelBlock::SIZE;

    pub fn data_range(&self) -> Range<usize> {
        self.data_pointer..self.data_pointer + self.data_size
    }

    pub fn block(&self, channel: usize) -> Option<&ChannelBlock> {
        self.blocks.get(channel)
    }
}

/// Parser for the frame offset table and the data-section headers it points to
pub struct FrameTableParser;

impl FrameTableParser {
    /// Parse every frame listed in the header's pointer table, checking that
    /// each channel block lies inside its frame's data area and that the data
    /// area lies inside the file.
    pub fn parse(
        cursor: &ByteCursor,
        header: &FileHeader,
        channels: &[ChannelDescriptor],
    ) -> Result<Vec<FrameDescriptor>> {
        let mut table = cursor.at(header.pointer_table).map_err(corrupt)?;
        let mut frames = Vec::with_capacity(header.frame_count);

        for index in 0..header.frame_count {
            let offset = table.read_i32().map_err(corrupt)?;
            let offset = usize::try_from(offset).map_err(|_| {
                CfsError::CorruptFrameTable(format!("frame {} has negative offset {}", index, offset))
            })?;
            frames.push(Self::parse_frame(cursor, header, channels, index, offset)?);
        }

        debug!(frames = frames.len(), "decoded frame table");
        Ok(frames)
    }

    fn parse_frame(
        cursor: &ByteCursor,
        header: &FileHeader,
        channels: &[ChannelDescriptor],
        index: usize,
        header_offset: usize,
    ) -> Result<FrameDescriptor> {
        let fixed = header.frame_header_fixed_bytes();
        let header_len = fixed.max(header.frame_header_bytes);
        if header_offset.checked_add(header_len).map_or(true, |end| end > cursor.len()) {
            return Err(CfsError::CorruptFrameTable(format!(
                "frame {} header at {} runs past end of file ({})",
                index,
                header_offset,
                cursor.len()
            )));
        }

        let mut reader = cursor.at(header_offset)?;
        let previous_header = reader.read_i32()?;
        let data_pointer = frame_field(reader.read_i32()?, index, "data pointer")?;
        let data_size = frame_field(reader.read_i32()?, index, "data size")?;
        let flags = reader.read_u16()?;
        reader.skip(16)?;

        let data_end = data_pointer.checked_add(data_size).filter(|&end| end <= cursor.len());
        if data_end.is_none() {
            return Err(CfsError::CorruptFrameTable(format!(
                "frame {} data ({} bytes at {}) runs past end of file ({}); file truncated?",
                index,
                data_size,
                data_pointer,
                cursor.len()
            )));
        }

        let mut blocks = SmallVec::with_capacity(channels.len());
        for channel in channels {
            let data_offset = frame_field(reader.read_i32()?, index, "channel data offset")?;
            let points = frame_field(reader.read_i32()?, index, "channel point count")?;
            let y_scale = widen_f32(reader.read_f32()?);
            let y_offset = widen_f32(reader.read_f32()?);
            let x_increment = widen_f32(reader.read_f32()?);
            let x_offset = widen_f32(reader.read_f32()?);

            let length = match channel.sample_format() {
                Ok(format) => {
                    let bad = |what: &str| {
                        CfsError::CorruptFrameTable(format!(
                            "frame {} channel {} {}",
                            index, channel.index, what
                        ))
                    };
                    let span = format.span(points).ok_or_else(|| bad("size overflows"))?;
                    if data_offset.checked_add(span).map_or(true, |end| end > data_size) {
                        return Err(bad(&format!(
                            "block ({} bytes at {}) lies outside the {} byte data area",
                            span, data_offset, data_size
                        )));
                    }
                    if points > 0 && y_scale == 0.0 {
                        return Err(bad("has a zero scale"));
                    }
                    points * format.sample_size()
                }
                Err(_) => 0,
            };

            blocks.push(ChannelBlock {
                offset: data_pointer + data_offset,
                length,
                points,
                y_scale,
                y_offset,
                x_increment,
                x_offset,
            });
        }

        Ok(FrameDescriptor {
            index,
            header_offset,
            previous_header,
            data_pointer,
            data_size,
            flags,
            variables_offset: reader.position(),
            blocks,
        })
    }
}

fn frame_field(value: i32, frame: usize, field: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        CfsError::CorruptFrameTable(format!("frame {} has negative {}: {}", frame, field, value))
    })
}

fn corrupt(err: CfsError) -> CfsError {
    CfsError::CorruptFrameTable(err.to_string())
}
