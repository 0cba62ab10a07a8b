// src/raw_data/decoder.rs
use crate::error::{CfsError, Result};
use crate::raw_data::ByteCursor;
use crate::types::DataType;
use byteorder::{ByteOrder, LittleEndian};

/// Numeric type and byte stride of a channel's samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    data_type: DataType,
    sample_size: usize,
    stride: usize,
}

impl SampleFormat {
    /// Returns None for non-numeric types
    pub fn new(data_type: DataType, stride: usize) -> Option<Self> {
        let sample_size = data_type.fixed_size()?;
        Some(SampleFormat {
            data_type,
            sample_size,
            stride,
        })
    }

    /// Contiguous layout, stride equal to the sample size
    pub fn contiguous(data_type: DataType) -> Option<Self> {
        let size = data_type.fixed_size()?;
        Self::new(data_type, size)
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Distance between the starts of consecutive samples. Larger than
    /// the sample size when channels are interleaved.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_interleaved(&self) -> bool {
        self.stride > self.sample_size
    }

    /// Number of samples in a block of `length` payload bytes
    pub fn sample_count(&self, length: usize) -> Result<usize> {
        if self.stride < self.sample_size || length % self.sample_size != 0 {
            return Err(CfsError::MisalignedBlock {
                length,
                stride: self.stride,
                sample_size: self.sample_size,
            });
        }
        Ok(length / self.sample_size)
    }

    /// Bytes spanned from the first sample's start to the last sample's end
    pub fn span(&self, count: usize) -> Option<usize> {
        if count == 0 {
            return Some(0);
        }
        (count - 1)
            .checked_mul(self.stride)?
            .checked_add(self.sample_size)
    }
}

/// Decoded samples in their stored numeric type
#[derive(Debug, Clone, PartialEq)]
pub enum RawSamples {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl RawSamples {
    pub fn len(&self) -> usize {
        match self {
            RawSamples::I8(v) => v.len(),
            RawSamples::U8(v) => v.len(),
            RawSamples::I16(v) => v.len(),
            RawSamples::U16(v) => v.len(),
            RawSamples::I32(v) => v.len(),
            RawSamples::F32(v) => v.len(),
            RawSamples::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            RawSamples::I8(_) => DataType::I8,
            RawSamples::U8(_) => DataType::U8,
            RawSamples::I16(_) => DataType::I16,
            RawSamples::U16(_) => DataType::U16,
            RawSamples::I32(_) => DataType::I32,
            RawSamples::F32(_) => DataType::F32,
            RawSamples::F64(_) => DataType::F64,
        }
    }

    /// Every sample widened to f64. All stored types convert exactly.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            RawSamples::I8(v) => v.iter().map(|&x| x as f64).collect(),
            RawSamples::U8(v) => v.iter().map(|&x| x as f64).collect(),
            RawSamples::I16(v) => v.iter().map(|&x| x as f64).collect(),
            RawSamples::U16(v) => v.iter().map(|&x| x as f64).collect(),
            RawSamples::I32(v) => v.iter().map(|&x| x as f64).collect(),
            RawSamples::F32(v) => v.iter().map(|&x| x as f64).collect(),
            RawSamples::F64(v) => v.clone(),
        }
    }
}

/// Decodes one channel's data block into raw samples
pub struct DataBlockDecoder;

impl DataBlockDecoder {
    /// Decode the block of `length` payload bytes starting at absolute
    /// `offset` in the cursor's buffer.
    ///
    /// # Example
    ///
    /// ```
    /// use cfs_rs::raw_data::{ByteCursor, DataBlockDecoder, RawSamples, SampleFormat};
    /// use cfs_rs::DataType;
    ///
    /// let cursor = ByteCursor::new(vec![100u8, 0, 200, 0, 44, 1]);
    /// let format = SampleFormat::contiguous(DataType::I16).unwrap();
    ///
    /// let raw = DataBlockDecoder::decode(&cursor, format, 0, 6).unwrap();
    /// assert_eq!(raw, RawSamples::I16(vec![100, 200, 300]));
    /// ```
    pub fn decode(
        cursor: &ByteCursor,
        format: SampleFormat,
        offset: usize,
        length: usize,
    ) -> Result<RawSamples> {
        let count = format.sample_count(length)?;
        let span = format.span(count).ok_or(CfsError::OutOfBounds {
            offset,
            requested: usize::MAX,
            len: cursor.len(),
        })?;

        let mut block = cursor.at(offset)?;
        let raw = block.read_bytes(span)?;

        let size = format.sample_size;
        let stride = format.stride;
        let samples = (0..count).map(|i| &raw[i * stride..i * stride + size]);

        Ok(match format.data_type {
            DataType::I8 => RawSamples::I8(samples.map(|b| b[0] as i8).collect()),
            DataType::U8 => RawSamples::U8(samples.map(|b| b[0]).collect()),
            DataType::I16 => RawSamples::I16(samples.map(LittleEndian::read_i16).collect()),
            DataType::U16 => RawSamples::U16(samples.map(LittleEndian::read_u16).collect()),
            DataType::I32 => RawSamples::I32(samples.map(LittleEndian::read_i32).collect()),
            DataType::F32 => RawSamples::F32(samples.map(LittleEndian::read_f32).collect()),
            DataType::F64 => RawSamples::F64(samples.map(LittleEndian::read_f64).collect()),
            // SampleFormat cannot be built for text
            DataType::Lstr => unreachable!("sample format for non-numeric type"),
        })
    }
}
