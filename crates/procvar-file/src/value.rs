use std::fmt;
use std::io::Cursor;

use procvar_types::ValueType;
use serde::{Deserialize, Serialize};

use crate::encoding::{Charset, Encoding};

/// A named binary payload with optional MIME type and encoding.
///
/// Built by [`FileValueBuilder`](crate::FileValueBuilder); immutable once
/// handed out.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValue {
    filename: String,
    value: Option<Vec<u8>>,
    mime_type: Option<String>,
    encoding: Option<Encoding>,
}

impl FileValue {
    pub(crate) fn new(filename: String) -> Self {
        Self {
            filename,
            value: None,
            mime_type: None,
            encoding: None,
        }
    }

    pub(crate) fn set_value(&mut self, value: Vec<u8>) {
        self.value = Some(value);
    }

    pub(crate) fn set_mime_type(&mut self, mime_type: String) {
        self.mime_type = Some(mime_type);
    }

    pub(crate) fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = Some(encoding);
    }

    pub fn value_type(&self) -> ValueType {
        ValueType::File
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The payload, or `None` if no content was ever supplied.
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    pub fn into_value(self) -> Option<Vec<u8>> {
        self.value
    }

    /// An in-memory reader over the payload. Empty when there is none.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.value().unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.value.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }

    /// The encoding resolved to a known charset, if it names one.
    pub fn charset(&self) -> Option<Charset> {
        self.encoding.as_ref().and_then(Encoding::charset)
    }
}

impl fmt::Debug for FileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileValue")
            .field("filename", &self.filename)
            .field("len", &self.value.as_ref().map(Vec::len))
            .field("mime_type", &self.mime_type)
            .field("encoding", &self.encoding)
            .finish()
    }
}
