use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Stdin};
use std::ops::{Deref, DerefMut};

use tracing::debug;

/// A readable byte stream with an explicit close.
///
/// Closing defaults to a no-op; the handle itself is released when the
/// stream is dropped.
pub trait ByteStream: Read {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteStream for File {}
impl ByteStream for Stdin {}
impl ByteStream for &[u8] {}
impl<T: AsRef<[u8]>> ByteStream for Cursor<T> {}
impl<R: Read> ByteStream for BufReader<R> {}

impl<S: ByteStream + ?Sized> ByteStream for Box<S> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Closes the wrapped stream when dropped.
///
/// A close failure is logged and discarded so it cannot replace an error
/// already on its way to the caller.
pub struct StreamGuard<S: ByteStream> {
    stream: S,
}

impl<S: ByteStream> StreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

impl<S: ByteStream> Deref for StreamGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.stream
    }
}

impl<S: ByteStream> DerefMut for StreamGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

impl<S: ByteStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.stream.close() {
            debug!(error = %e, "ignoring failure to close stream");
        }
    }
}

/// Read `stream` to end-of-stream in chunks of `chunk_size` bytes.
///
/// Blocks until the stream signals end-of-stream or fails. Interrupted reads
/// are retried. On error nothing read so far is returned.
pub fn drain<R: Read + ?Sized>(stream: &mut R, chunk_size: usize) -> io::Result<Vec<u8>> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut buf = Vec::new();
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(buf)
}
