//! Terminal colors used in spell messages
//!
//! Messages carry inline `<color:c>text</color>` markup, where `c` is the
//! single-letter code of a [`Color`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Color {
    #[strum(serialize = "dark")]
    Dark = 0,
    #[default]
    #[strum(serialize = "white")]
    White = 1,
    #[strum(serialize = "slate")]
    Slate = 2,
    #[strum(serialize = "orange")]
    Orange = 3,
    #[strum(serialize = "red")]
    Red = 4,
    #[strum(serialize = "green")]
    Green = 5,
    #[strum(serialize = "blue")]
    Blue = 6,
    #[strum(serialize = "umber")]
    Umber = 7,
    #[strum(serialize = "light dark")]
    LightDark = 8,
    #[strum(serialize = "light white")]
    LightWhite = 9,
    #[strum(serialize = "violet")]
    Violet = 10,
    #[strum(serialize = "yellow")]
    Yellow = 11,
    #[strum(serialize = "light red")]
    LightRed = 12,
    #[strum(serialize = "light green")]
    LightGreen = 13,
    #[strum(serialize = "light blue")]
    LightBlue = 14,
    #[strum(serialize = "light umber")]
    LightUmber = 15,
}

const ATTR_CHARS: &[u8; 16] = b"dwsorgbuDWvyRGBU";

impl Color {
    /// Markup letter for this color
    pub const fn attr_char(self) -> char {
        ATTR_CHARS[self as usize] as char
    }

    pub fn from_attr_char(c: char) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|color| color.attr_char() == c)
    }

    /// Wrap `text` in color markup.
    pub fn markup(self, text: &str) -> String {
        format!("<color:{}>{}</color>", self.attr_char(), text)
    }
}

/// Remove color markup, leaving plain text.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let tag_len = if tail.starts_with("</color>") {
            Some("</color>".len())
        } else if tail.starts_with("<color:") && tail.len() >= 9 && tail.as_bytes()[8] == b'>' {
            Some(9)
        } else {
            None
        };
        match tag_len {
            Some(len) => rest = &tail[len..],
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_chars_round_trip() {
        use strum::IntoEnumIterator;
        for color in Color::iter() {
            assert_eq!(Color::from_attr_char(color.attr_char()), Some(color));
        }
    }

    #[test]
    fn test_markup() {
        assert_eq!(Color::Red.markup("Fire"), "<color:r>Fire</color>");
        assert_eq!(Color::LightDark.markup("Nether"), "<color:D>Nether</color>");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("It casts a <color:r>Fire Bolt</color>."),
            "It casts a Fire Bolt."
        );
        assert_eq!(strip_markup("a < b"), "a < b");
    }
}
