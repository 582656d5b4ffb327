//! Document formats offered by the converter UI.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A document format the input or output side can be set to.
///
/// Written to the state file as the bare variant name, e.g. `"Json"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Toml,
    Yaml,
    Ron,
    Xml,
    Url,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Json,
        Format::Toml,
        Format::Yaml,
        Format::Ron,
        Format::Xml,
        Format::Url,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Format::Json => "Json",
            Format::Toml => "Toml",
            Format::Yaml => "Yaml",
            Format::Ron => "Ron",
            Format::Xml => "Xml",
            Format::Url => "Url",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown format '{0}' (expected one of json, toml, yaml, ron, xml, url)")]
pub struct ParseFormatError(String);

impl FromStr for Format {
    type Err = ParseFormatError;

    /// Case-insensitive; `yml` is accepted for YAML.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            "yaml" | "yml" => Ok(Format::Yaml),
            "ron" => Ok(Format::Ron),
            "xml" => Ok(Format::Xml),
            "url" => Ok(Format::Url),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}
