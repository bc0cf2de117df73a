//! Parameter metadata types.
//!
//! This module provides types for describing parameters to the host:
//! - [`ParameterDescriptor`] - name, symbol, automatable flag and default value
//! - [`ParameterName`] - fixed-capacity inline string so describing a
//!   parameter never touches the heap
//! - [`make_basic`] - the symbol transform applied to engine names

use serde::{Serialize, Serializer};

use crate::types::ParameterValue;

/// Maximum parameter name size in bytes.
pub const MAX_PARAMETER_NAME_SIZE: usize = 128;

/// Fixed-capacity UTF-8 string for parameter names and symbols.
///
/// Longer input is truncated on a character boundary.
#[derive(Clone, Copy)]
pub struct ParameterName {
    bytes: [u8; MAX_PARAMETER_NAME_SIZE],
    len: usize,
}

impl ParameterName {
    /// Empty name.
    pub const fn empty() -> Self {
        Self {
            bytes: [0; MAX_PARAMETER_NAME_SIZE],
            len: 0,
        }
    }

    /// Build from a string slice, truncating to capacity.
    pub fn new(s: &str) -> Self {
        let mut name = Self::empty();
        name.set(s);
        name
    }

    /// Replace the contents, truncating to capacity.
    pub fn set(&mut self, s: &str) {
        let end = truncated_len(s);
        self.bytes[..end].copy_from_slice(&s.as_bytes()[..end]);
        self.len = end;
    }

    pub fn as_str(&self) -> &str {
        // Only ever filled from &str cut on a char boundary, or by make_basic
        // which writes ASCII.
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for ParameterName {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ParameterName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ParameterName {}

impl std::fmt::Debug for ParameterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl std::fmt::Display for ParameterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ParameterName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Byte length of `s` cut to capacity on a character boundary.
fn truncated_len(s: &str) -> usize {
    let mut end = s.len().min(MAX_PARAMETER_NAME_SIZE);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Turn a display name into a programmatic symbol.
///
/// Every byte outside `[A-Za-z0-9_]` becomes `_` (multi-byte characters
/// become one `_` per byte), and a leading digit becomes `_` so the result
/// is a valid identifier.
pub fn make_basic(name: &str) -> ParameterName {
    let mut symbol = ParameterName::empty();
    let src = name.as_bytes();
    // Same cut as the display name, so both always have equal length
    let len = truncated_len(name);

    for (i, &b) in src[..len].iter().enumerate() {
        symbol.bytes[i] = if b.is_ascii_alphanumeric() || b == b'_' {
            b
        } else {
            b'_'
        };
    }
    if len > 0 && symbol.bytes[0].is_ascii_digit() {
        symbol.bytes[0] = b'_';
    }
    symbol.len = len;
    symbol
}

/// Host-facing description of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    /// Display name as reported by the engine.
    pub name: ParameterName,
    /// Identifier-safe form of `name`.
    pub symbol: ParameterName,
    /// Whether the host may automate this parameter.
    pub automatable: bool,
    /// Default normalized value.
    pub default_value: ParameterValue,
}

impl ParameterDescriptor {
    /// Create an automatable descriptor, deriving the symbol from the name.
    pub fn new(name: &str, default_value: ParameterValue) -> Self {
        Self {
            name: ParameterName::new(name),
            symbol: make_basic(name),
            automatable: true,
            default_value,
        }
    }

    /// Set the automatable flag.
    pub fn with_automatable(mut self, automatable: bool) -> Self {
        self.automatable = automatable;
        self
    }
}
