use std::fmt;

use serde::{Deserialize, Serialize};

/// Standard charsets every consumer is expected to support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Utf16,
    Utf16Be,
    Utf16Le,
    UsAscii,
    Iso8859_1,
}

impl Charset {
    pub const ALL: [Charset; 6] = [
        Self::Utf8,
        Self::Utf16,
        Self::Utf16Be,
        Self::Utf16Le,
        Self::UsAscii,
        Self::Iso8859_1,
    ];

    /// Canonical (IANA) name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::UsAscii => "US-ASCII",
            Self::Iso8859_1 => "ISO-8859-1",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Utf8 => &["utf8", "unicode-1-1-utf-8"],
            Self::Utf16 => &["utf16", "unicode"],
            Self::Utf16Be => &["utf16be", "x-utf-16be"],
            Self::Utf16Le => &["utf16le", "x-utf-16le"],
            Self::UsAscii => &["ascii", "us", "iso646-us", "ansi_x3.4-1968"],
            Self::Iso8859_1 => &["iso8859_1", "iso_8859-1", "latin1", "l1", "8859_1"],
        }
    }

    /// Look up a charset by canonical name or alias, ignoring ASCII case.
    pub fn for_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|charset| {
            charset.name().eq_ignore_ascii_case(name)
                || charset
                    .aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character encoding of a file payload, held by name.
///
/// Set from a [`Charset`] or from any string. Names are not checked when
/// set; [`Encoding::charset`] resolves them on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encoding(String);

impl Encoding {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Resolve the name to a known charset, if any.
    pub fn charset(&self) -> Option<Charset> {
        Charset::for_name(&self.0)
    }
}

impl From<Charset> for Encoding {
    fn from(charset: Charset) -> Self {
        Self(charset.name().to_string())
    }
}

impl From<&str> for Encoding {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Encoding {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
