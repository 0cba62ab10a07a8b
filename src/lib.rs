// src/lib.rs
//! # cfs-rs
//!
//! A Rust library for reading CED File System (CFS) files, the container
//! format written by CED Signal and related electrophysiology acquisition
//! software.
//!
//! ## Features
//!
//! - 📂 **Bytes In**: Decodes a complete file held in memory; the caller decides where the bytes come from
//! - 🎯 **Type Safe**: Channel kinds and data types are enums, unsupported layouts are explicit errors
//! - 📏 **Calibrated**: Raw samples are scaled to physical units in double precision
//! - 💤 **Lazy**: Frames are decoded on first access and cached
//! - 🔒 **Thread-Safe**: Documents are `Send + Sync`; frames decode concurrently
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cfs_rs::*;
//!
//! fn main() -> Result<()> {
//!     let bytes = std::fs::read("recording.cfs").expect("readable file");
//!     let doc = CfsDocument::open(bytes)?;
//!
//!     // List channels
//!     for channel in doc.channels() {
//!         println!("{}: {} over {}", channel.name, channel.y_units, channel.x_units);
//!     }
//!
//!     // Read one frame
//!     let frame = doc.frame(0)?;
//!     if let Some(emg) = frame.channel("EMG") {
//!         println!("{} samples at {} s", emg.len(), emg.sampling_interval);
//!     }
//!
//!     // Frame variables
//!     for var in &frame.variables {
//!         println!("{} = {} {}", var.name, var.value, var.units);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Options
//!
//! ```rust,no_run
//! use cfs_rs::*;
//!
//! # fn main() -> Result<()> {
//! # let bytes: Vec<u8> = Vec::new();
//! // Keep Signal's internal housekeeping variables
//! let options = DecodeOptions::default().filter_internal_variables(false);
//! let doc = CfsDocument::open_with(bytes, options)?;
//! println!("{} file variables", doc.file_variables().len());
//! # Ok(())
//! # }
//! ```

// Modules
pub mod error;
pub mod types;
pub mod header;
pub mod metadata;
pub mod raw_data;
pub mod reader;

mod utils;

// Re-export commonly used types at the crate root for convenience
pub use error::{CfsError, Result};

// Type exports
pub use types::{
    ChannelKind,
    DataType,
    Variable,
    VariableValue,
};

// Header exports
pub use header::{
    FileHeader,
    VariableDescriptor,
};

// Metadata exports
pub use metadata::{
    ChannelDefinitionParser,
    ChannelDescriptor,
};

// Raw data exports
pub use raw_data::{
    ByteCursor,
    Calibration,
    DataBlockDecoder,
    RawSamples,
    SampleFormat,
    ScalingConverter,
    XAxis,
};

// Reader exports
pub use reader::{
    CfsDocument,
    ChannelUnits,
    ChannelBlock,
    ChannelData,
    DecodeOptions,
    Frame,
    FrameChannel,
    FrameDescriptor,
    FrameTableParser,
};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use cfs_rs::prelude::*;
    //! ```

    pub use crate::error::{CfsError, Result};
    pub use crate::reader::{CfsDocument, DecodeOptions, Frame};
    pub use crate::types::{DataType, VariableValue};
}

// Version information
/// The CFS format version this library decodes
pub const CFS_VERSION: u8 = FileHeader::SUPPORTED_VERSION;

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
