//! Record key normalization.
//!
//! Records are keyed by an identifier derived from their display name. Data
//! files in the wild use two conventions, so the separator is a setting
//! rather than a constant:
//!
//! | Style        | Name            | Key             |
//! |--------------|-----------------|-----------------|
//! | `Underscore` | `Thunder Punch` | `Thunder_Punch` |
//! | `Collapse`   | `Thunder Punch` | `ThunderPunch`  |

/// How spaces in a display name map to a record key.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KeyStyle {
    /// Spaces become `_`.
    #[default]
    Underscore,
    /// Spaces are dropped; word boundaries are recovered from capitals.
    Collapse,
}

impl KeyStyle {
    /// Replacement for each space when deriving a key.
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Underscore => "_",
            Self::Collapse => "",
        }
    }

    /// Derives the record key for a display name.
    pub fn key_for(self, name: &str) -> String {
        name.trim().replace(' ', self.separator())
    }

    /// Recovers a display name from a stored key.
    pub fn display_name(self, key: &str) -> String {
        match self {
            Self::Underscore => key.replace('_', " "),
            Self::Collapse => split_camel(key),
        }
    }
}

/// Inserts a space at every lowercase-or-digit to uppercase boundary.
fn split_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if let Some(p) = prev
            && (p.is_ascii_lowercase() || p.is_ascii_digit())
            && c.is_ascii_uppercase()
        {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
