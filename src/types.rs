// src/types.rs
use std::fmt;

/// CFS data type enumeration, as stored in channel and variable descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// INT1
    I8 = 0,
    /// WRD1
    U8 = 1,
    /// INT2
    I16 = 2,
    /// WRD2
    U16 = 3,
    /// INT4
    I32 = 4,
    /// RL4
    F32 = 5,
    /// RL8
    F64 = 6,
    /// LSTR, a length-prefixed string. Only meaningful for variables.
    Lstr = 7,
}

impl DataType {
    /// Get the fixed size of this data type in bytes, or None if variable-sized
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            DataType::I8 | DataType::U8 => Some(1),
            DataType::I16 | DataType::U16 => Some(2),
            DataType::I32 | DataType::F32 => Some(4),
            DataType::F64 => Some(8),
            DataType::Lstr => None,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DataType::I8),
            1 => Some(DataType::U8),
            2 => Some(DataType::I16),
            3 => Some(DataType::U16),
            4 => Some(DataType::I32),
            5 => Some(DataType::F32),
            6 => Some(DataType::F64),
            7 => Some(DataType::Lstr),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.fixed_size().is_some()
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, DataType::U8 | DataType::U16)
    }

    /// Name used by CED's own documentation
    pub fn ced_name(&self) -> &'static str {
        match self {
            DataType::I8 => "INT1",
            DataType::U8 => "WRD1",
            DataType::I16 => "INT2",
            DataType::U16 => "WRD2",
            DataType::I32 => "INT4",
            DataType::F32 => "RL4",
            DataType::F64 => "RL8",
            DataType::Lstr => "LSTR",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ced_name())
    }
}

/// How a channel's samples are laid out along the x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Samples at a fixed x interval
    EqualSpaced,
    /// Each sample carries its own x value from a subsidiary channel
    Matrix,
    /// Holds x values for a matrix channel
    Subsidiary,
    /// A kind code this reader does not know
    Other(u8),
}

impl ChannelKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ChannelKind::EqualSpaced,
            1 => ChannelKind::Matrix,
            2 => ChannelKind::Subsidiary,
            other => ChannelKind::Other(other),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::EqualSpaced => f.write_str("equal-spaced"),
            ChannelKind::Matrix => f.write_str("matrix"),
            ChannelKind::Subsidiary => f.write_str("subsidiary"),
            ChannelKind::Other(code) => write!(f, "unknown ({})", code),
        }
    }
}

/// Value of a file or frame variable
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Int(i32),
    UInt(u32),
    Float(f64),
    Text(String),
}

impl VariableValue {
    /// Numeric view of the value, None for text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            VariableValue::Int(v) => Some(*v as f64),
            VariableValue::UInt(v) => Some(*v as f64),
            VariableValue::Float(v) => Some(*v),
            VariableValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            VariableValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Int(v) => write!(f, "{}", v),
            VariableValue::UInt(v) => write!(f, "{}", v),
            VariableValue::Float(v) => write!(f, "{}", v),
            VariableValue::Text(s) => f.write_str(s),
        }
    }
}

/// A named, typed variable with units
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub units: String,
    pub value: VariableValue,
}

impl Variable {
    pub fn new(name: impl Into<String>, units: impl Into<String>, value: VariableValue) -> Self {
        Variable {
            name: name.into(),
            units: units.into(),
            value,
        }
    }
}
