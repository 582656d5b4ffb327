use crate::format::Format;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_INPUT_TEXT: &str = r#"{ "cool_app": true }"#;
pub const DEFAULT_INPUT_FORMAT: Format = Format::Json;
pub const DEFAULT_OUTPUT_FORMAT: Format = Format::Toml;

/// A persisted slot of the application state.
///
/// Every slot holds a string. Format slots are stored as written and only
/// parsed into a [`Format`] when a conversion needs one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    InputText,
    InputFormat,
    OutputFormat,
}

/// Store key and default value of a [`Slot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotDef {
    pub key: &'static str,
    pub default: &'static str,
}

impl Slot {
    /// Every persisted slot, in flush order.
    pub const ALL: [Slot; 3] = [Slot::InputText, Slot::InputFormat, Slot::OutputFormat];

    /// The slot table.
    ///
    /// | Slot           | Key             | Default                |
    /// |----------------|-----------------|------------------------|
    /// | `InputText`    | `input_text`    | `{ "cool_app": true }` |
    /// | `InputFormat`  | `input_format`  | `Json`                 |
    /// | `OutputFormat` | `output_format` | `Toml`                 |
    pub const fn def(self) -> SlotDef {
        match self {
            Slot::InputText => SlotDef {
                key: "input_text",
                default: DEFAULT_INPUT_TEXT,
            },
            Slot::InputFormat => SlotDef {
                key: "input_format",
                default: DEFAULT_INPUT_FORMAT.as_str(),
            },
            Slot::OutputFormat => SlotDef {
                key: "output_format",
                default: DEFAULT_OUTPUT_FORMAT.as_str(),
            },
        }
    }

    /// Store key; stable across releases.
    pub const fn key(self) -> &'static str {
        self.def().key
    }

    pub const fn default_value(self) -> &'static str {
        self.def().default
    }

    /// Position in [`Slot::ALL`].
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown slot '{0}'")]
pub struct ParseSlotError(String);

impl FromStr for Slot {
    type Err = ParseSlotError;

    /// Accepts the store key or its kebab-case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.key() == s.replace('-', "_"))
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = Slot::ALL.iter().map(|slot| slot.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Slot::ALL.len());
    }

    #[test]
    fn table_order_matches_index() {
        for (position, slot) in Slot::ALL.into_iter().enumerate() {
            assert_eq!(slot.index(), position);
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(Slot::InputText.default_value(), "{ \"cool_app\": true }");
        assert_eq!(Slot::InputFormat.default_value(), "Json");
        assert_eq!(Slot::OutputFormat.default_value(), "Toml");
    }

    #[test]
    fn parses_key_and_kebab_case() {
        assert_eq!("input_text".parse::<Slot>(), Ok(Slot::InputText));
        assert_eq!("output-format".parse::<Slot>(), Ok(Slot::OutputFormat));
        assert!("output_text".parse::<Slot>().is_err());
    }
}
