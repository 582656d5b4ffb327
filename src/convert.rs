//! Text conversion between the supported [`Format`]s.
//!
//! The input is parsed into the source format's own untyped value and then
//! serialized with the target format's serializer. Nothing is validated
//! beyond what the two serde implementations require, so some pairs only
//! work for some documents: TOML needs a table at the root, URL encoding
//! needs a flat map of scalars.

use crate::format::{Format, ParseFormatError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input is not valid {format}: {source}")]
    Parse {
        format: Format,
        #[source]
        source: BoxError,
    },

    #[error("document cannot be written as {format}: {source}")]
    Render {
        format: Format,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    UnknownFormat(#[from] ParseFormatError),
}

impl ConvertError {
    fn parse(format: Format, source: impl Into<BoxError>) -> Self {
        Self::Parse {
            format,
            source: source.into(),
        }
    }

    fn render(format: Format, source: impl Into<BoxError>) -> Self {
        Self::Render {
            format,
            source: source.into(),
        }
    }
}

/// Convert `input` from one format to another.
pub fn convert(input: &str, from: Format, to: Format) -> Result<String, ConvertError> {
    match from {
        Format::Json => {
            let value: serde_json::Value =
                serde_json::from_str(input).map_err(|e| ConvertError::parse(from, e))?;
            render(&value, to)
        }
        Format::Toml => {
            let value: toml::Value =
                toml::from_str(input).map_err(|e| ConvertError::parse(from, e))?;
            render(&value, to)
        }
        Format::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(input).map_err(|e| ConvertError::parse(from, e))?;
            render(&value, to)
        }
        Format::Ron => {
            let value: ron::Value =
                ron::from_str(input).map_err(|e| ConvertError::parse(from, e))?;
            render(&value, to)
        }
        Format::Xml => {
            let value: serde_json::Value =
                serde_xml_rs::from_str(input).map_err(|e| ConvertError::parse(from, e))?;
            render(&value, to)
        }
        Format::Url => {
            let value: BTreeMap<String, String> =
                serde_urlencoded::from_str(input).map_err(|e| ConvertError::parse(from, e))?;
            render(&value, to)
        }
    }
}

fn render<T: Serialize>(value: &T, to: Format) -> Result<String, ConvertError> {
    match to {
        Format::Json => serde_json::to_string_pretty(value).map_err(|e| ConvertError::render(to, e)),
        Format::Toml => toml::to_string_pretty(value).map_err(|e| ConvertError::render(to, e)),
        Format::Yaml => serde_yaml::to_string(value).map_err(|e| ConvertError::render(to, e)),
        Format::Ron => ron::to_string(value).map_err(|e| ConvertError::render(to, e)),
        Format::Xml => serde_xml_rs::to_string(value).map_err(|e| ConvertError::render(to, e)),
        Format::Url => serde_urlencoded::to_string(value).map_err(|e| ConvertError::render(to, e)),
    }
}
