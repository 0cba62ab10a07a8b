// tests/common/mod.rs
//! Writer for small synthetic CFS v2 files.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

/// A typed value for a file or frame variable
#[derive(Debug, Clone)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    F32(f32),
    F64(f64),
    /// Text and the total field width, length byte included
    Lstr(String, usize),
}

impl Value {
    fn code(&self) -> i16 {
        match self {
            Value::I8(_) => 0,
            Value::U8(_) => 1,
            Value::I16(_) => 2,
            Value::U16(_) => 3,
            Value::I32(_) => 4,
            Value::F32(_) => 5,
            Value::F64(_) => 6,
            Value::Lstr(..) => 7,
        }
    }

    fn size(&self) -> usize {
        match self {
            Value::I8(_) | Value::U8(_) => 1,
            Value::I16(_) | Value::U16(_) => 2,
            Value::I32(_) | Value::F32(_) => 4,
            Value::F64(_) => 8,
            Value::Lstr(_, width) => *width,
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Value::I8(v) => out.write_i8(*v).unwrap(),
            Value::U8(v) => out.write_u8(*v).unwrap(),
            Value::I16(v) => out.write_i16::<LittleEndian>(*v).unwrap(),
            Value::U16(v) => out.write_u16::<LittleEndian>(*v).unwrap(),
            Value::I32(v) => out.write_i32::<LittleEndian>(*v).unwrap(),
            Value::F32(v) => out.write_f32::<LittleEndian>(*v).unwrap(),
            Value::F64(v) => out.write_f64::<LittleEndian>(*v).unwrap(),
            Value::Lstr(s, width) => lstr(out, s, *width),
        }
    }
}

/// Write `s` as a length-prefixed string padded to `width` bytes
pub fn lstr(out: &mut Vec<u8>, s: &str, width: usize) {
    assert!(s.len() < width, "{:?} does not fit in {} bytes", s, width);
    let start = out.len();
    out.push(s.len() as u8);
    out.extend_from_slice(s.as_bytes());
    out.resize(start + width, 0);
}

#[derive(Debug, Clone)]
struct ChannelSpec {
    name: String,
    y_units: String,
    x_units: String,
    dtype: u8,
    kind: u8,
    byte_space: u16,
}

#[derive(Debug, Clone)]
struct VarSpec {
    name: String,
    units: String,
    value: Value,
}

#[derive(Debug, Clone, Copy)]
struct BlockSpec {
    offset: i32,
    points: i32,
    y_scale: f32,
    y_offset: f32,
    x_increment: f32,
    x_offset: f32,
}

/// One frame's data area and block descriptions
#[derive(Debug, Clone, Default)]
pub struct FrameSpec {
    data: Vec<u8>,
    blocks: Vec<BlockSpec>,
    vars: Vec<Value>,
    flags: u16,
}

impl FrameSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append int16 samples as the next channel's contiguous block
    pub fn i16_block(self, samples: &[i16], y_scale: f32, y_offset: f32, interval: f32) -> Self {
        let mut bytes = Vec::new();
        for &s in samples {
            bytes.write_i16::<LittleEndian>(s).unwrap();
        }
        self.raw_block(&bytes, samples.len() as i32, y_scale, y_offset, interval)
    }

    /// Append float32 samples as the next channel's contiguous block
    pub fn f32_block(self, samples: &[f32], y_scale: f32, y_offset: f32, interval: f32) -> Self {
        let mut bytes = Vec::new();
        for &s in samples {
            bytes.write_f32::<LittleEndian>(s).unwrap();
        }
        self.raw_block(&bytes, samples.len() as i32, y_scale, y_offset, interval)
    }

    /// Append float64 samples as the next channel's contiguous block
    pub fn f64_block(self, samples: &[f64], y_scale: f32, y_offset: f32, interval: f32) -> Self {
        let mut bytes = Vec::new();
        for &s in samples {
            bytes.write_f64::<LittleEndian>(s).unwrap();
        }
        self.raw_block(&bytes, samples.len() as i32, y_scale, y_offset, interval)
    }

    pub fn raw_block(
        mut self,
        bytes: &[u8],
        points: i32,
        y_scale: f32,
        y_offset: f32,
        interval: f32,
    ) -> Self {
        let offset = self.data.len() as i32;
        self.data.extend_from_slice(bytes);
        self.block_at(offset, points, y_scale, y_offset, interval)
    }

    /// Replace the data area; blocks are then placed with [`FrameSpec::block_at`]
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn block_at(
        mut self,
        offset: i32,
        points: i32,
        y_scale: f32,
        y_offset: f32,
        interval: f32,
    ) -> Self {
        self.blocks.push(BlockSpec {
            offset,
            points,
            y_scale,
            y_offset,
            x_increment: interval,
            x_offset: 0.0,
        });
        self
    }

    /// Start the x axis of the most recent block at `x_offset`
    pub fn x_offset(mut self, x_offset: f32) -> Self {
        if let Some(block) = self.blocks.last_mut() {
            block.x_offset = x_offset;
        }
        self
    }

    /// Placeholder block for a channel that carries no data in this frame
    pub fn empty_block(self) -> Self {
        self.block_at(0, 0, 1.0, 0.0, 1.0)
    }

    /// Value of the next frame variable; unset variables keep their default
    pub fn var(mut self, value: Value) -> Self {
        self.vars.push(value);
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }
}

/// Where the builder put things
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub header_bytes: usize,
    pub frame_headers: Vec<usize>,
    pub data_pointers: Vec<usize>,
    pub pointer_table: usize,
}

/// Builder for a complete CFS v2 file
#[derive(Debug, Clone)]
pub struct CfsBuilder {
    marker: [u8; 8],
    filename: String,
    time: String,
    date: String,
    comment: String,
    channels: Vec<ChannelSpec>,
    file_vars: Vec<VarSpec>,
    frame_vars: Vec<VarSpec>,
    frames: Vec<FrameSpec>,
}

impl Default for CfsBuilder {
    fn default() -> Self {
        CfsBuilder {
            marker: *b"CEDFILE\"",
            filename: "TEST.CFS".into(),
            time: "10:30:00".into(),
            date: "15/06/22".into(),
            comment: String::new(),
            channels: Vec::new(),
            file_vars: Vec::new(),
            frame_vars: Vec::new(),
            frames: Vec::new(),
        }
    }
}

impl CfsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(mut self, marker: &[u8; 8]) -> Self {
        self.marker = *marker;
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.into();
        self
    }

    /// Equal-spaced channel with contiguous samples of type `dtype`
    pub fn channel(self, name: &str, y_units: &str, x_units: &str, dtype: u8) -> Self {
        let size = match dtype {
            0 | 1 => 1,
            2 | 3 => 2,
            4 | 5 => 4,
            6 => 8,
            _ => 1,
        };
        self.channel_with(name, y_units, x_units, dtype, 0, size)
    }

    pub fn channel_with(
        mut self,
        name: &str,
        y_units: &str,
        x_units: &str,
        dtype: u8,
        kind: u8,
        byte_space: u16,
    ) -> Self {
        self.channels.push(ChannelSpec {
            name: name.into(),
            y_units: y_units.into(),
            x_units: x_units.into(),
            dtype,
            kind,
            byte_space,
        });
        self
    }

    pub fn file_var(mut self, name: &str, units: &str, value: Value) -> Self {
        self.file_vars.push(VarSpec {
            name: name.into(),
            units: units.into(),
            value,
        });
        self
    }

    /// Declare a frame variable with the value frames get unless they set one
    pub fn frame_var(mut self, name: &str, units: &str, default: Value) -> Self {
        self.frame_vars.push(VarSpec {
            name: name.into(),
            units: units.into(),
            value: default,
        });
        self
    }

    pub fn frame(mut self, frame: FrameSpec) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_with_layout().0
    }

    pub fn build_with_layout(&self) -> (Vec<u8>, Layout) {
        let mut out = vec![0u8; 178];
        let mut layout = Layout::default();

        for ch in &self.channels {
            lstr(&mut out, &ch.name, 22);
            lstr(&mut out, &ch.y_units, 10);
            lstr(&mut out, &ch.x_units, 10);
            out.push(ch.dtype);
            out.push(ch.kind);
            out.write_u16::<LittleEndian>(ch.byte_space).unwrap();
            out.write_i16::<LittleEndian>(-1).unwrap();
        }

        write_descriptors(&mut out, &self.file_vars);
        write_descriptors(&mut out, &self.frame_vars);
        for var in &self.file_vars {
            var.value.write(&mut out);
        }
        layout.header_bytes = out.len();

        let frame_var_area: usize = self.frame_vars.iter().map(|v| v.value.size()).sum();
        let frame_header_bytes = 30 + 24 * self.channels.len() + frame_var_area;

        let mut previous = 0i32;
        for frame in &self.frames {
            let data_pointer = out.len();
            out.extend_from_slice(&frame.data);

            let header_offset = out.len();
            out.write_i32::<LittleEndian>(previous).unwrap();
            out.write_i32::<LittleEndian>(data_pointer as i32).unwrap();
            out.write_i32::<LittleEndian>(frame.data.len() as i32).unwrap();
            out.write_u16::<LittleEndian>(frame.flags).unwrap();
            out.resize(out.len() + 16, 0);

            for i in 0..self.channels.len() {
                let block = frame.blocks.get(i).copied().unwrap_or(BlockSpec {
                    offset: 0,
                    points: 0,
                    y_scale: 1.0,
                    y_offset: 0.0,
                    x_increment: 1.0,
                    x_offset: 0.0,
                });
                out.write_i32::<LittleEndian>(block.offset).unwrap();
                out.write_i32::<LittleEndian>(block.points).unwrap();
                out.write_f32::<LittleEndian>(block.y_scale).unwrap();
                out.write_f32::<LittleEndian>(block.y_offset).unwrap();
                out.write_f32::<LittleEndian>(block.x_increment).unwrap();
                out.write_f32::<LittleEndian>(block.x_offset).unwrap();
            }

            for (i, var) in self.frame_vars.iter().enumerate() {
                frame.vars.get(i).unwrap_or(&var.value).write(&mut out);
            }

            previous = header_offset as i32;
            layout.data_pointers.push(data_pointer);
            layout.frame_headers.push(header_offset);
        }

        layout.pointer_table = out.len();
        for &offset in &layout.frame_headers {
            out.write_i32::<LittleEndian>(offset as i32).unwrap();
        }

        let mut header = Vec::with_capacity(178);
        header.extend_from_slice(&self.marker);
        lstr(&mut header, &self.filename, 14);
        header.write_i32::<LittleEndian>(out.len() as i32).unwrap();
        header.extend_from_slice(self.time.as_bytes());
        header.extend_from_slice(self.date.as_bytes());
        header.write_i16::<LittleEndian>(self.channels.len() as i16).unwrap();
        header.write_i16::<LittleEndian>(self.file_vars.len() as i16).unwrap();
        header.write_i16::<LittleEndian>(self.frame_vars.len() as i16).unwrap();
        header.write_u16::<LittleEndian>(layout.header_bytes as u16).unwrap();
        header.write_u16::<LittleEndian>(frame_header_bytes as u16).unwrap();
        header
            .write_i32::<LittleEndian>(layout.frame_headers.last().copied().unwrap_or(0) as i32)
            .unwrap();
        header.write_u16::<LittleEndian>(self.frames.len() as u16).unwrap();
        header.write_u16::<LittleEndian>(1).unwrap();
        lstr(&mut header, &self.comment, 74);
        header.write_i32::<LittleEndian>(layout.pointer_table as i32).unwrap();
        header.resize(178, 0);
        out[..178].copy_from_slice(&header);

        (out, layout)
    }
}

fn write_descriptors(out: &mut Vec<u8>, vars: &[VarSpec]) {
    let mut offset = 0usize;
    for var in vars {
        lstr(out, &var.name, 22);
        out.write_i16::<LittleEndian>(var.value.code()).unwrap();
        lstr(out, &var.units, 10);
        out.write_i16::<LittleEndian>(offset as i16).unwrap();
        offset += var.value.size();
    }
    // Terminator carries the total size of the value area
    lstr(out, "", 22);
    out.write_i16::<LittleEndian>(0).unwrap();
    lstr(out, "", 10);
    out.write_i16::<LittleEndian>(offset as i16).unwrap();
}

/// Overwrite the little-endian i32 at `offset`
pub fn patch_i32(bytes: &mut [u8], offset: usize, value: i32) {
    (&mut bytes[offset..offset + 4])
        .write_i32::<LittleEndian>(value)
        .unwrap();
}

/// The single-channel EMG recording used across tests
pub fn emg_file() -> Vec<u8> {
    CfsBuilder::new()
        .channel("EMG", "mV", "s", 2)
        .frame(FrameSpec::new().i16_block(&[100, 200, 300], 0.01, 0.0, 0.001))
        .build()
}
