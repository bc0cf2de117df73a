//! Plugin identity configuration.
//!
//! Static, non-functional metadata the host reads to identify the plugin:
//! label, description, maker, homepage, license, version and unique id.
//!
//! # Example
//!
//! ```ignore
//! use blockbridge_core::Config;
//!
//! pub static CONFIG: Config = Config::new("Saw Synth", "Bbrg", "saw1")
//!     .with_maker("Blockbridge")
//!     .with_license("ISC")
//!     .with_version(1, 0, 0);
//! ```

use serde::Serialize;

use crate::parameter_info::ParameterDescriptor;

// =========================================================================
// FourCharCode
// =========================================================================

/// Four-character code used to build the plugin's unique id.
///
/// Must be exactly 4 ASCII characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourCharCode(pub [u8; 4]);

impl FourCharCode {
    /// Create a new FourCharCode from a 4-byte array.
    ///
    /// # Panics
    /// Debug builds will panic if any byte is not ASCII.
    pub const fn new(bytes: &[u8; 4]) -> Self {
        debug_assert!(bytes[0].is_ascii(), "FourCC bytes must be ASCII");
        debug_assert!(bytes[1].is_ascii(), "FourCC bytes must be ASCII");
        debug_assert!(bytes[2].is_ascii(), "FourCC bytes must be ASCII");
        debug_assert!(bytes[3].is_ascii(), "FourCC bytes must be ASCII");
        Self(*bytes)
    }

    /// Get the FourCC as a 32-bit value (big-endian).
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Get the FourCC as a string slice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl std::fmt::Display for FourCharCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Macro for creating FourCharCode at compile time with validation.
///
/// # Example
///
/// ```ignore
/// use blockbridge_core::fourcc;
///
/// const MAKER: FourCharCode = fourcc!(b"Bbrg");
/// ```
#[macro_export]
macro_rules! fourcc {
    ($s:literal) => {{
        const BYTES: &[u8] = $s;
        const _: () = assert!(BYTES.len() == 4, "FourCC must be exactly 4 bytes");
        const _: () = assert!(BYTES[0].is_ascii(), "FourCC byte 0 must be ASCII");
        const _: () = assert!(BYTES[1].is_ascii(), "FourCC byte 1 must be ASCII");
        const _: () = assert!(BYTES[2].is_ascii(), "FourCC byte 2 must be ASCII");
        const _: () = assert!(BYTES[3].is_ascii(), "FourCC byte 3 must be ASCII");
        $crate::config::FourCharCode::new(&[BYTES[0], BYTES[1], BYTES[2], BYTES[3]])
    }};
}

// =========================================================================
// Version
// =========================================================================

/// Plugin version as major/minor/patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Packed form handed to hosts: `major << 16 | minor << 8 | patch`.
    pub const fn packed(&self) -> u32 {
        ((self.major as u32) << 16) | ((self.minor as u32) << 8) | self.patch as u32
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// =========================================================================
// Config
// =========================================================================

/// Helper to convert a string literal to a 4-byte array at compile time.
const fn str_to_four_bytes(s: &str) -> [u8; 4] {
    let bytes = s.as_bytes();
    assert!(bytes.len() == 4, "FourCC string must be exactly 4 bytes");
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

/// Static plugin identity.
#[derive(Debug, Clone)]
pub struct Config {
    /// Short plugin label (also used as the display name).
    pub label: &'static str,

    /// Longer description. May be empty.
    pub description: &'static str,

    /// Maker / vendor name.
    pub maker: &'static str,

    /// Homepage URL.
    pub homepage: &'static str,

    /// License identifier (e.g. "ISC", "GPL-3.0").
    pub license: &'static str,

    /// Plugin version.
    pub version: Version,

    /// Maker code (first half of the unique id).
    pub maker_code: FourCharCode,

    /// Plugin code (second half of the unique id).
    pub plugin_code: FourCharCode,
}

impl Config {
    /// Create a new plugin configuration.
    ///
    /// # Panics
    /// Panics at compile time if `maker_code` or `plugin_code` are not exactly
    /// 4 ASCII characters.
    pub const fn new(label: &'static str, maker_code: &str, plugin_code: &str) -> Self {
        Self {
            label,
            description: "",
            maker: "Unknown Maker",
            homepage: "",
            license: "",
            version: Version::new(1, 0, 0),
            maker_code: FourCharCode::new(&str_to_four_bytes(maker_code)),
            plugin_code: FourCharCode::new(&str_to_four_bytes(plugin_code)),
        }
    }

    /// Set the description.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Set the maker name.
    pub const fn with_maker(mut self, maker: &'static str) -> Self {
        self.maker = maker;
        self
    }

    /// Set the homepage URL.
    pub const fn with_homepage(mut self, homepage: &'static str) -> Self {
        self.homepage = homepage;
        self
    }

    /// Set the license identifier.
    pub const fn with_license(mut self, license: &'static str) -> Self {
        self.license = license;
        self
    }

    /// Set the version.
    pub const fn with_version(mut self, major: u8, minor: u8, patch: u8) -> Self {
        self.version = Version::new(major, minor, patch);
        self
    }

    /// 64-bit unique id: maker code in the high half, plugin code in the low half.
    pub const fn unique_id(&self) -> i64 {
        ((self.maker_code.as_u32() as i64) << 32) | self.plugin_code.as_u32() as i64
    }

    /// Serialize identity plus parameter descriptors as a JSON manifest.
    ///
    /// Used by packaging tools to emit host-side metadata. Not real-time safe.
    pub fn manifest_json(&self, parameters: &[ParameterDescriptor]) -> serde_json::Result<String> {
        log::debug!(
            "Building manifest for {} with {} parameters",
            self.label,
            parameters.len()
        );
        let manifest = Manifest {
            label: self.label,
            description: self.description,
            maker: self.maker,
            homepage: self.homepage,
            license: self.license,
            version: self.version.to_string(),
            version_packed: self.version.packed(),
            unique_id: self.unique_id(),
            parameters,
        };
        serde_json::to_string_pretty(&manifest)
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    label: &'static str,
    description: &'static str,
    maker: &'static str,
    homepage: &'static str,
    license: &'static str,
    version: String,
    version_packed: u32,
    unique_id: i64,
    parameters: &'a [ParameterDescriptor],
}
