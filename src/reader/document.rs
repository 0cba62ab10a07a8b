// src/reader/document.rs
use crate::error::{CfsError, Result};
use crate::header::{read_variables, FileHeader, VariableDescriptor};
use crate::metadata::{ChannelDefinitionParser, ChannelDescriptor};
use crate::raw_data::ByteCursor;
use crate::reader::{DecodeOptions, Frame, FrameDescriptor, FrameTableParser};
use crate::types::{Variable, VariableValue};
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Axis units of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelUnits<'a> {
    pub x_units: &'a str,
    pub y_units: &'a str,
}

/// A decoded CFS file
///
/// Opening a document parses the header, the channel table, the variable
/// descriptors and the frame table, and checks every channel block against
/// the buffer, so structural corruption and truncation are reported by
/// [`CfsDocument::open`]. Sample data is decoded lazily: the first call to
/// [`CfsDocument::frame`] for an index decodes and caches that frame, later
/// calls return the cached copy.
///
/// The document is `Send + Sync`. Concurrent first access to the same frame
/// is serialised by a per-frame lock; different frames decode in parallel.
pub struct CfsDocument {
    cursor: ByteCursor,
    options: DecodeOptions,
    header: FileHeader,
    channels: Vec<ChannelDescriptor>,
    frame_var_descriptors: Vec<VariableDescriptor>,
    file_variables: Vec<Variable>,
    creator: Option<String>,
    frames: Vec<FrameDescriptor>,
    cache: Vec<Mutex<Option<Arc<Frame>>>>,
}

impl CfsDocument {
    /// Open a CFS file from its complete contents with default options
    ///
    /// ```no_run
    /// use cfs_rs::CfsDocument;
    ///
    /// let bytes = std::fs::read("recording.cfs").unwrap();
    /// let doc = CfsDocument::open(bytes).unwrap();
    ///
    /// for channel in doc.channels() {
    ///     println!("{} ({} vs {})", channel.name, channel.y_units, channel.x_units);
    /// }
    /// let frame = doc.frame(0).unwrap();
    /// let emg = frame.samples("EMG").unwrap();
    /// println!("{} samples", emg.len());
    /// ```
    pub fn open(bytes: impl Into<Bytes>) -> Result<Self> {
        Self::open_with(bytes, DecodeOptions::default())
    }

    pub fn open_with(bytes: impl Into<Bytes>, options: DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        let header = FileHeader::parse(&mut cursor, &options)?;

        cursor.seek(header.channel_table_offset())?;
        let channels = ChannelDefinitionParser::parse(&mut cursor, header.channel_count)?;

        cursor.seek(header.file_var_descriptors_offset())?;
        let file_var_descriptors = VariableDescriptor::parse_list(&mut cursor, header.file_var_count)?;
        let frame_var_descriptors =
            VariableDescriptor::parse_list(&mut cursor, header.frame_var_count)?;

        let creator = file_var_descriptors.first().and_then(|desc| {
            desc.read_value(&cursor, header.file_var_values_offset())
                .ok()
                .map(|value| format_creator(&desc.name, &value))
        });

        let file_variables = read_variables(
            &file_var_descriptors,
            &cursor,
            header.file_var_values_offset(),
            options.filters_internal_variables(),
        )?;

        let frames = FrameTableParser::parse(&cursor, &header, &channels)?;
        let cache = frames.iter().map(|_| Mutex::new(None)).collect();

        Ok(CfsDocument {
            cursor,
            options,
            header,
            channels,
            frame_var_descriptors,
            file_variables,
            creator,
            frames,
            cache,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Channel descriptors in table order
    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelDescriptor> {
        self.channels.get(index)
    }

    /// Index of the channel called `name`; the highest index wins on duplicates
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().rposition(|c| c.name == name)
    }

    /// Channel name to axis units
    pub fn channel_units(&self) -> HashMap<&str, ChannelUnits<'_>> {
        // Later indices overwrite earlier ones with the same name
        self.channels
            .iter()
            .map(|c| {
                let units = ChannelUnits {
                    x_units: &c.x_units,
                    y_units: &c.y_units,
                };
                (c.name.as_str(), units)
            })
            .collect()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_descriptors(&self) -> &[FrameDescriptor] {
        &self.frames
    }

    /// Decoded frame at `index`
    ///
    /// Accepts any integer type; negative or too-large indices fail with
    /// [`CfsError::IndexOutOfRange`].
    pub fn frame<I>(&self, index: I) -> Result<Arc<Frame>>
    where
        I: TryInto<usize> + fmt::Display + Copy,
    {
        let position = index
            .try_into()
            .ok()
            .filter(|&i| i < self.frames.len())
            .ok_or_else(|| CfsError::IndexOutOfRange {
                index: index.to_string(),
                frame_count: self.frames.len(),
            })?;

        let mut slot = self.cache[position].lock();
        if let Some(frame) = slot.as_ref() {
            return Ok(Arc::clone(frame));
        }

        let frame = Arc::new(Frame::decode(
            &self.cursor,
            &self.frames[position],
            &self.channels,
            &self.frame_var_descriptors,
            self.options.filters_internal_variables(),
        )?);
        *slot = Some(Arc::clone(&frame));
        Ok(frame)
    }

    /// Every frame in order, decoding as it goes
    pub fn frames(&self) -> impl Iterator<Item = Result<Arc<Frame>>> + '_ {
        (0..self.frames.len()).map(move |i| self.frame(i))
    }

    /// Names and units of the frame variables, in declared order
    pub fn frame_variable_units(&self) -> Vec<(&str, &str)> {
        self.frame_var_descriptors
            .iter()
            .filter(|d| !(self.options.filters_internal_variables() && d.is_signal_internal()))
            .map(|d| (d.name.as_str(), d.units.as_str()))
            .collect()
    }

    pub fn file_variables(&self) -> &[Variable] {
        &self.file_variables
    }

    pub fn file_variable(&self, name: &str) -> Option<&Variable> {
        self.file_variables.iter().find(|v| v.name == name)
    }

    /// Name and version of the program that wrote the file, e.g. `Signal 6.04`
    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref()
    }

    pub fn comment(&self) -> &str {
        &self.header.comment
    }

    pub fn file_size(&self) -> usize {
        self.cursor.len()
    }
}

impl fmt::Debug for CfsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CfsDocument")
            .field("channels", &self.channels.len())
            .field("frames", &self.frames.len())
            .field("creator", &self.creator)
            .finish()
    }
}

/// CED programs store their name as the first file variable and their
/// version as its value, e.g. `Signal Program` = 604 for Signal 6.04.
fn format_creator(name: &str, value: &VariableValue) -> String {
    let name = name.replace(" Program", "");
    let name = name.trim();

    let digits = match value {
        VariableValue::Int(v) => v.to_string(),
        VariableValue::UInt(v) => v.to_string(),
        VariableValue::Float(v) if v.fract() == 0.0 => format!("{}", *v as i64),
        other => return format!("{} {}", name, other),
    };

    let mut chars = digits.chars();
    match chars.next() {
        Some(major) if chars.as_str().is_empty() => format!("{} {}", name, major),
        Some(major) => format!("{} {}.{}", name, major, chars.as_str()),
        None => name.to_string(),
    }
}
