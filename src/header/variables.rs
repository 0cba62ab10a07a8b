// src/header/variables.rs
use crate::error::{CfsError, Result};
use crate::raw_data::{widen_f32, ByteCursor};
use crate::types::{DataType, Variable, VariableValue};
use tracing::warn;

/// Prefixes of the housekeeping variables CED Signal adds to every file
const SIGNAL_INTERNAL_PREFIXES: &[&str] = &[
    "RTot", "SysD", "RAcc", "CMemb", "RMemb", "FCom", "SysF", "ClF",
];

/// Descriptor of a file or frame variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDescriptor {
    pub name: String,
    pub type_code: i16,
    pub units: String,
    /// Offset of the value within its value area
    pub offset: usize,
}

impl VariableDescriptor {
    pub const SIZE: usize = 36;

    pub fn parse(cursor: &mut ByteCursor) -> Result<Self> {
        let name = cursor.read_lstr_field(22)?;
        let type_code = cursor.read_i16()?;
        let units = cursor.read_lstr_field(10)?;
        let offset = cursor.read_i16()?;

        let offset = usize::try_from(offset).map_err(|_| {
            CfsError::CorruptHeader(format!("variable {:?} has negative offset {}", name, offset))
        })?;

        Ok(VariableDescriptor {
            name,
            type_code,
            units,
            offset,
        })
    }

    /// Parse `count` descriptors followed by the list's terminating entry
    pub fn parse_list(cursor: &mut ByteCursor, count: usize) -> Result<Vec<Self>> {
        let mut descriptors = Vec::with_capacity(count);
        for _ in 0..count {
            descriptors.push(Self::parse(cursor)?);
        }
        cursor.skip(Self::SIZE)?;
        Ok(descriptors)
    }

    pub fn data_type(&self) -> Option<DataType> {
        u8::try_from(self.type_code).ok().and_then(DataType::from_code)
    }

    /// True for the housekeeping variables Signal writes (`User1`, `SysD`, ...)
    pub fn is_signal_internal(&self) -> bool {
        is_signal_internal(&self.name)
    }

    /// Read the value stored at `area + offset`
    pub fn read_value(&self, cursor: &ByteCursor, area: usize) -> Result<VariableValue> {
        let data_type = self.data_type().ok_or(CfsError::CorruptHeader(format!(
            "variable {:?} has unknown type code {}",
            self.name, self.type_code
        )))?;

        let mut cursor = cursor.at(area + self.offset)?;
        Ok(match data_type {
            DataType::I8 => VariableValue::Int(cursor.read_i8()? as i32),
            DataType::U8 => VariableValue::UInt(cursor.read_u8()? as u32),
            DataType::I16 => VariableValue::Int(cursor.read_i16()? as i32),
            DataType::U16 => VariableValue::UInt(cursor.read_u16()? as u32),
            DataType::I32 => VariableValue::Int(cursor.read_i32()?),
            DataType::F32 => VariableValue::Float(widen_f32(cursor.read_f32()?)),
            DataType::F64 => VariableValue::Float(cursor.read_f64()?),
            DataType::Lstr => VariableValue::Text(cursor.read_length_prefixed_string()?),
        })
    }
}

pub fn is_signal_internal(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("User") {
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return true;
        }
    }
    SIGNAL_INTERNAL_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Read every variable in `descriptors` from the value area at `area`.
///
/// Variables with an unrecognised type are skipped with a warning so one bad
/// descriptor does not hide the others.
pub fn read_variables(
    descriptors: &[VariableDescriptor],
    cursor: &ByteCursor,
    area: usize,
    filter_internal: bool,
) -> Result<Vec<Variable>> {
    let mut variables = Vec::with_capacity(descriptors.len());
    for desc in descriptors {
        if filter_internal && desc.is_signal_internal() {
            continue;
        }
        if desc.data_type().is_none() {
            warn!(name = %desc.name, code = desc.type_code, "skipping variable with unknown type");
            continue;
        }
        let value = desc.read_value(cursor, area)?;
        variables.push(Variable::new(desc.name.clone(), desc.units.clone(), value));
    }
    Ok(variables)
}
