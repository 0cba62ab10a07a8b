// src/utils/string_encoding.rs

/// Decode a CFS text field. CED software writes ANSI text padded with NULs
/// or spaces; anything that is not valid UTF-8 is replaced rather than rejected.
pub fn decode_cfs_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
