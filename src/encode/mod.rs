//! Textual encoders over a resolved document.
//!
//! Four fixed grammars, selected once per export: tag/attribute ([`xml`]),
//! token-stream ([`vrml`]), key/value ([`json`]) and wrapped-token
//! ([`html`]). Each performs one depth-first traversal and never mutates
//! the document; numeric formatting is shared so the encodings agree
//! within rounding precision.

mod fmt;
mod html;
mod json;
mod vrml;
mod xml;

pub use fmt::fmt_f32;

use crate::scene::Document;
use crate::util::{Error, Result};

/// Output format selection - a closed set of four encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Tag/attribute encoding (`.x3d`)
    Xml,
    /// Classic VRML token stream (`.x3dv`)
    Vrml,
    /// Key/value tree (`.json`)
    Json,
    /// HTML page embedding the scene (`.html`)
    Html,
}

impl Format {
    /// Canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Xml => "x3d",
            Format::Vrml => "x3dv",
            Format::Json => "json",
            Format::Html => "html",
        }
    }

    /// Format for a file extension; unknown extensions are a caller error.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "x3d" => Ok(Format::Xml),
            "x3dv" | "wrl" => Ok(Format::Vrml),
            "json" => Ok(Format::Json),
            "html" | "xhtml" => Ok(Format::Html),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Xml => "X3D",
            Format::Vrml => "X3DV",
            Format::Json => "JSON",
            Format::Html => "HTML",
        };
        f.write_str(name)
    }
}

/// Encode a resolved document with the selected format.
pub fn encode(doc: &Document, format: Format) -> Result<String> {
    match format {
        Format::Xml => xml::encode(doc),
        Format::Vrml => vrml::encode(doc),
        Format::Json => json::encode(doc),
        Format::Html => html::encode(doc),
    }
}

#[cfg(test)]
mod tests;
