// src/header/file_header.rs
use crate::error::{CfsError, Result};
use crate::header::VariableDescriptor;
use crate::metadata::ChannelDescriptor;
use crate::raw_data::ByteCursor;
use crate::reader::DecodeOptions;
use chrono::NaiveDateTime;
use tracing::{debug, warn};

/// CFS general file header, the fixed 178 bytes at offset 0
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    pub version: u8,
    /// Internal filename, at most 12 characters. May differ from the name on disk.
    pub filename: String,
    pub file_size: u32,
    pub start_time: String,
    pub start_date: String,
    pub channel_count: usize,
    pub file_var_count: usize,
    pub frame_var_count: usize,
    pub header_bytes: usize,
    pub frame_header_bytes: usize,
    pub last_frame_header: usize,
    pub frame_count: usize,
    pub block_size: u16,
    pub comment: String,
    /// Offset of the trailing table of data-section offsets
    pub pointer_table: usize,
}

impl FileHeader {
    pub const SIZE: usize = 178;
    pub const MARKER_PREFIX: &'static [u8; 7] = b"CEDFILE";
    pub const MARKER_LEN: usize = 8;
    pub const SUPPORTED_VERSION: u8 = 2;

    /// Parse and validate the header. The cursor is moved to the start of
    /// the channel table on success.
    pub fn parse(cursor: &mut ByteCursor, options: &DecodeOptions) -> Result<Self> {
        cursor.seek(0)?;
        let version = Self::read_marker(cursor)?;

        if cursor.len() < Self::SIZE {
            return Err(CfsError::CorruptHeader(format!(
                "file is {} bytes, shorter than the {} byte header",
                cursor.len(),
                Self::SIZE
            )));
        }

        let filename = cursor.read_lstr_field(14)?;
        let file_size = cursor.read_i32()?;
        let start_time = cursor.read_fixed_string(8)?;
        let start_date = cursor.read_fixed_string(8)?;
        let channel_count = cursor.read_i16()?;
        let file_var_count = cursor.read_i16()?;
        let frame_var_count = cursor.read_i16()?;
        let header_bytes = cursor.read_u16()? as usize;
        let frame_header_bytes = cursor.read_u16()? as usize;
        let last_frame_header = cursor.read_i32()?;
        let frame_count = cursor.read_u16()? as usize;
        let block_size = cursor.read_u16()?;
        let comment = cursor.read_lstr_field(74)?;
        let pointer_table = cursor.read_i32()?;
        cursor.skip(40)?;

        let header = FileHeader {
            version,
            filename,
            file_size: non_negative(file_size, "file size")?,
            start_time,
            start_date,
            channel_count: non_negative(channel_count as i32, "channel count")? as usize,
            file_var_count: non_negative(file_var_count as i32, "file variable count")? as usize,
            frame_var_count: non_negative(frame_var_count as i32, "frame variable count")? as usize,
            header_bytes,
            frame_header_bytes,
            last_frame_header: non_negative(last_frame_header, "last frame header")? as usize,
            frame_count,
            block_size,
            comment,
            pointer_table: non_negative(pointer_table, "pointer table")? as usize,
        };

        header.validate(cursor.len(), options)?;

        debug!(
            version = header.version,
            channels = header.channel_count,
            frames = header.frame_count,
            file_vars = header.file_var_count,
            frame_vars = header.frame_var_count,
            "decoded CFS header"
        );
        Ok(header)
    }

    fn read_marker(cursor: &mut ByteCursor) -> Result<u8> {
        let available = cursor.remaining().min(Self::MARKER_LEN);
        let marker = cursor.read_bytes(available)?;

        let not_cfs = || CfsError::NotACfsFile {
            found: String::from_utf8_lossy(&marker).to_string(),
        };
        if marker.len() < Self::MARKER_LEN || !marker.starts_with(Self::MARKER_PREFIX) {
            return Err(not_cfs());
        }

        // '!' is version 1, '"' version 2
        let version = marker[7].checked_sub(b'!').ok_or_else(not_cfs)? + 1;
        if version != Self::SUPPORTED_VERSION {
            return Err(CfsError::UnsupportedVersion(version));
        }
        Ok(version)
    }

    fn validate(&self, len: usize, options: &DecodeOptions) -> Result<()> {
        if self.channel_count > options.channel_limit() {
            return Err(CfsError::CorruptHeader(format!(
                "{} channels exceeds the limit of {}",
                self.channel_count,
                options.channel_limit()
            )));
        }
        if self.frame_count > options.frame_limit() {
            return Err(CfsError::CorruptHeader(format!(
                "{} frames exceeds the limit of {}",
                self.frame_count,
                options.frame_limit()
            )));
        }

        let descriptors_end = self.file_var_values_offset();
        if descriptors_end > len {
            return Err(CfsError::CorruptHeader(format!(
                "channel and variable tables end at {} past end of file ({})",
                descriptors_end, len
            )));
        }
        if self.header_bytes > len {
            return Err(CfsError::CorruptHeader(format!(
                "header size {} past end of file ({})",
                self.header_bytes, len
            )));
        }

        let table_end = self
            .pointer_table
            .checked_add(self.frame_count * 4)
            .filter(|&end| end <= len);
        if self.frame_count > 0 && table_end.is_none() {
            return Err(CfsError::CorruptHeader(format!(
                "frame offset table at {} for {} frames runs past end of file ({})",
                self.pointer_table, self.frame_count, len
            )));
        }
        if self.frame_count > 0 && self.last_frame_header >= len {
            return Err(CfsError::CorruptHeader(format!(
                "last frame header {} past end of file ({})",
                self.last_frame_header, len
            )));
        }

        if self.file_size as usize != len {
            warn!(
                declared = self.file_size,
                actual = len,
                "declared file size differs from buffer length"
            );
        }
        Ok(())
    }

    /// The channel table follows the general header directly
    pub fn channel_table_offset(&self) -> usize {
        Self::SIZE
    }

    pub fn file_var_descriptors_offset(&self) -> usize {
        self.channel_table_offset() + self.channel_count * ChannelDescriptor::RECORD_SIZE
    }

    /// Each descriptor list carries one terminating entry
    pub fn frame_var_descriptors_offset(&self) -> usize {
        self.file_var_descriptors_offset()
            + (self.file_var_count + 1) * VariableDescriptor::SIZE
    }

    pub fn file_var_values_offset(&self) -> usize {
        self.frame_var_descriptors_offset()
            + (self.frame_var_count + 1) * VariableDescriptor::SIZE
    }

    /// Offset of the file-variable value area, None when there are no file variables
    pub fn variable_section(&self) -> Option<usize> {
        (self.file_var_count > 0).then(|| self.file_var_values_offset())
    }

    /// Bytes of data-section header before the frame variable values
    pub fn frame_header_fixed_bytes(&self) -> usize {
        crate::reader::FrameDescriptor::FIXED_SIZE
            + self.channel_count * crate::reader::FrameDescriptor::CHANNEL_INFO_SIZE
    }

    /// Creation time from the stored `dd/mm/yy` and `HH:MM:SS` strings
    pub fn created(&self) -> Option<NaiveDateTime> {
        let stamp = format!("{} {}", self.start_date, self.start_time);
        NaiveDateTime::parse_from_str(&stamp, "%d/%m/%y %H:%M:%S").ok()
    }
}

fn non_negative(value: i32, field: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| CfsError::CorruptHeader(format!("negative {}: {}", field, value)))
}
