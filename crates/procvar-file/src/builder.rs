use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::config::BuilderConfig;
use crate::encoding::Encoding;
use crate::error::{FileError, FileResult};
use crate::stream::{drain, ByteStream, StreamGuard};
use crate::value::FileValue;

/// Fluent builder for a [`FileValue`].
///
/// Content comes from exactly one of bytes, a stream, or a path; each call
/// overwrites the previous content, as do repeated `mime_type` and
/// `encoding` calls. A failed ingestion leaves the content untouched.
///
/// ```
/// use procvar_file::{Charset, FileValueBuilder};
///
/// let value = FileValueBuilder::new("notes.txt")?
///     .mime_type("text/plain")
///     .encoding(Charset::Utf8)
///     .file_bytes(b"hello".to_vec())
///     .create();
/// assert_eq!(value.value(), Some(&b"hello"[..]));
/// # Ok::<(), procvar_file::FileError>(())
/// ```
#[derive(Debug)]
pub struct FileValueBuilder {
    config: BuilderConfig,
    file_value: FileValue,
}

impl FileValueBuilder {
    /// Start a file value named `filename`. An empty name is rejected.
    pub fn new(filename: impl Into<String>) -> FileResult<Self> {
        let filename = filename.into();
        if filename.is_empty() {
            return Err(FileError::InvalidArgument {
                name: "filename",
                reason: "must not be empty".into(),
            });
        }
        Ok(Self {
            config: BuilderConfig::default(),
            file_value: FileValue::new(filename),
        })
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn mime_type(&mut self, mime_type: impl Into<String>) -> &mut Self {
        self.file_value.set_mime_type(mime_type.into());
        self
    }

    /// Set the encoding from a [`Charset`](crate::Charset) or a charset name.
    pub fn encoding(&mut self, encoding: impl Into<Encoding>) -> &mut Self {
        self.file_value.set_encoding(encoding.into());
        self
    }

    /// Use `bytes` as the content. The buffer moves into the value.
    pub fn file_bytes(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.file_value.set_value(bytes);
        self
    }

    /// Drain `stream` to end-of-stream and use its bytes as the content.
    ///
    /// The stream is closed on every exit path. Blocks until the stream
    /// ends; there is no timeout.
    pub fn file_stream<S: ByteStream>(&mut self, stream: S) -> FileResult<&mut Self> {
        let mut guard = StreamGuard::new(stream);
        let bytes = drain(&mut *guard, self.config.effective_chunk_size())?;
        debug!(
            filename = %self.file_value.filename(),
            bytes = bytes.len(),
            "drained stream into file value"
        );
        Ok(self.file_bytes(bytes))
    }

    /// Read the file at `path` and use its bytes as the content.
    ///
    /// A path that does not exist, cannot be opened for reading, or is a
    /// directory fails with [`FileError::NotFound`].
    pub fn file_path(&mut self, path: impl AsRef<Path>) -> FileResult<&mut Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        if file.metadata()?.is_dir() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), "reading file value from path");
        self.file_stream(file)
    }

    /// Returns `true` once content has been supplied.
    pub fn has_value(&self) -> bool {
        self.file_value.value().is_some()
    }

    /// Snapshot of the value built so far.
    ///
    /// Later builder calls do not affect snapshots already returned.
    pub fn create(&self) -> FileValue {
        self.file_value.clone()
    }
}

fn open_error(path: &Path, e: io::Error) -> FileError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            FileError::NotFound(path.to_path_buf())
        }
        _ => FileError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::{Cursor, Read, Write};
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::encoding::Charset;

    /// Yields at most one byte per read.
    struct Trickle<'a>(&'a [u8]);

    impl<'a> Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let data: &'a [u8] = self.0;
            match (data.split_first(), buf.first_mut()) {
                (Some((&byte, rest)), Some(slot)) => {
                    *slot = byte;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    impl ByteStream for Trickle<'_> {}

    /// Fails after yielding some bytes; records whether it was closed.
    struct Failing {
        served: bool,
        closed: Rc<Cell<bool>>,
        fail_close: bool,
    }

    impl Failing {
        fn new(closed: Rc<Cell<bool>>) -> Self {
            Self {
                served: false,
                closed,
                fail_close: false,
            }
        }
    }

    impl Read for Failing {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream broke"));
            }
            self.served = true;
            buf[0] = b'x';
            Ok(1)
        }
    }

    impl ByteStream for Failing {
        fn close(&mut self) -> io::Result<()> {
            self.closed.set(true);
            if self.fail_close {
                Err(io::Error::other("close failed too"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn bytes_roundtrip() {
        let bytes = vec![0u8, 1, 2, 255];
        let value = FileValueBuilder::new("raw.bin")
            .unwrap()
            .file_bytes(bytes.clone())
            .create();
        assert_eq!(value.value(), Some(bytes.as_slice()));
        assert_eq!(value.filename(), "raw.bin");
    }

    #[test]
    fn empty_filename_is_rejected() {
        let err = FileValueBuilder::new("").unwrap_err();
        assert!(matches!(err, FileError::InvalidArgument { name: "filename", .. }));
    }

    #[test]
    fn create_without_content_has_no_value() {
        let builder = FileValueBuilder::new("nothing.txt").unwrap();
        assert!(!builder.has_value());
        let value = builder.create();
        assert!(value.value().is_none());
        assert!(value.mime_type().is_none());
        assert!(value.encoding().is_none());
    }

    #[test]
    fn metadata_setters_overwrite() {
        let mut builder = FileValueBuilder::new("a.txt").unwrap();
        builder
            .mime_type("a")
            .mime_type("b")
            .encoding(Charset::Utf16)
            .encoding("ISO-8859-1");
        let value = builder.create();
        assert_eq!(value.mime_type(), Some("b"));
        assert_eq!(value.encoding().map(Encoding::name), Some("ISO-8859-1"));
        assert_eq!(value.charset(), Some(Charset::Iso8859_1));
    }

    #[test]
    fn unresolvable_encoding_name_is_accepted() {
        let mut builder = FileValueBuilder::new("a.txt").unwrap();
        builder.encoding("no-such-charset");
        let value = builder.create();
        assert_eq!(value.encoding().map(Encoding::name), Some("no-such-charset"));
        assert_eq!(value.charset(), None);
    }

    #[test]
    fn later_content_replaces_earlier() {
        let mut builder = FileValueBuilder::new("a.txt").unwrap();
        builder.file_bytes(b"first".to_vec());
        builder.file_stream(Cursor::new(b"second".to_vec())).unwrap();
        assert_eq!(builder.create().value(), Some(&b"second"[..]));
    }

    #[test]
    fn create_returns_independent_snapshots() {
        let mut builder = FileValueBuilder::new("a.txt").unwrap();
        builder.file_bytes(b"one".to_vec()).mime_type("text/plain");
        let first = builder.create();
        assert_eq!(first, builder.create());

        builder.file_bytes(b"two".to_vec()).mime_type("text/csv");
        assert_eq!(first.value(), Some(&b"one"[..]));
        assert_eq!(first.mime_type(), Some("text/plain"));
        assert_eq!(builder.create().value(), Some(&b"two"[..]));
    }

    #[test]
    fn stream_is_drained_across_many_chunks() {
        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let mut builder = FileValueBuilder::new("big.bin").unwrap();
        builder.file_stream(Cursor::new(data.clone())).unwrap();
        assert_eq!(builder.create().value(), Some(data.as_slice()));
    }

    #[test]
    fn read_error_closes_stream_and_keeps_old_value() {
        let closed = Rc::new(Cell::new(false));
        let mut builder = FileValueBuilder::new("a.txt").unwrap();
        builder.file_bytes(b"kept".to_vec());

        let err = builder.file_stream(Failing::new(closed.clone())).unwrap_err();
        assert!(matches!(err, FileError::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));
        assert!(closed.get());
        assert_eq!(builder.create().value(), Some(&b"kept"[..]));
    }

    #[test]
    fn close_error_does_not_mask_read_error() {
        let closed = Rc::new(Cell::new(false));
        let mut stream = Failing::new(closed.clone());
        stream.fail_close = true;

        let mut builder = FileValueBuilder::new("a.txt").unwrap();
        let err = builder.file_stream(stream).unwrap_err();
        assert!(matches!(err, FileError::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));
        assert!(closed.get());
        assert!(!builder.has_value());
    }

    #[test]
    fn close_error_after_success_is_swallowed() {
        struct BadClose {
            inner: Cursor<Vec<u8>>,
            closed: Rc<Cell<bool>>,
        }

        impl Read for BadClose {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.inner.read(buf)
            }
        }

        impl ByteStream for BadClose {
            fn close(&mut self) -> io::Result<()> {
                self.closed.set(true);
                Err(io::Error::other("close failed"))
            }
        }

        let closed = Rc::new(Cell::new(false));
        let stream: Box<dyn ByteStream> = Box::new(BadClose {
            inner: Cursor::new(b"ok".to_vec()),
            closed: closed.clone(),
        });
        let mut builder = FileValueBuilder::new("a.txt").unwrap();
        builder.file_stream(stream).unwrap();
        assert!(closed.get());
        assert_eq!(builder.create().value(), Some(&b"ok"[..]));
    }

    #[test]
    fn path_is_read_fully() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from disk").unwrap();

        let mut builder = FileValueBuilder::new("disk.txt").unwrap();
        builder.file_path(file.path()).unwrap().mime_type("text/plain");
        let value = builder.create();
        assert_eq!(value.value(), Some(&b"from disk"[..]));
        assert_eq!(value.filename(), "disk.txt");
    }

    #[test]
    fn missing_path_is_not_found_and_leaves_value_unset() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.bin");

        let mut builder = FileValueBuilder::new("x.bin").unwrap();
        let err = builder.file_path(&missing).unwrap_err();
        match err {
            FileError::NotFound(path) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(!builder.has_value());
    }

    #[test]
    fn directory_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = FileValueBuilder::new("x.bin").unwrap();
        let err = builder.file_path(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
        assert!(!builder.has_value());
    }

    #[test]
    fn config_chunk_size_is_used() {
        let builder = FileValueBuilder::new("a.txt")
            .unwrap()
            .with_config(BuilderConfig::default().with_chunk_size(3));
        assert_eq!(builder.config().effective_chunk_size(), 3);
    }

    proptest! {
        #[test]
        fn chunking_does_not_change_payload(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            chunk_size in 1usize..64,
        ) {
            let direct = FileValueBuilder::new("p.bin").unwrap().file_bytes(data.clone()).create();

            let mut trickled = FileValueBuilder::new("p.bin").unwrap();
            trickled.file_stream(Trickle(&data)).unwrap();
            prop_assert_eq!(trickled.create(), direct.clone());

            let mut chunked = FileValueBuilder::new("p.bin")
                .unwrap()
                .with_config(BuilderConfig::default().with_chunk_size(chunk_size));
            chunked.file_stream(Cursor::new(data.clone())).unwrap();
            prop_assert_eq!(chunked.create(), direct);
        }
    }
}
