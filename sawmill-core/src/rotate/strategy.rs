use crate::error::{Result, SawmillError};
use std::fmt::Debug;
use std::fs::File;
use std::hash::Hash;
use std::io::{self, Stdout, Write};

/// A physical output the rotater writes into.
///
/// `lock_exclusive` and `unlock` bracket every write when the rotater is
/// configured for concurrent writers; sinks that cannot be shared between
/// processes keep the no-op defaults.
pub trait Sink: Write + Send {
    fn lock_exclusive(&self) -> io::Result<()> {
        Ok(())
    }

    fn unlock(&self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for File {
    fn lock_exclusive(&self) -> io::Result<()> {
        fs2::FileExt::lock_exclusive(self)
    }

    fn unlock(&self) -> io::Result<()> {
        fs2::FileExt::unlock(self)
    }
}

/// Decides which physical output is current and manages its lifecycle.
///
/// All methods run under the rotater's lock.
pub trait RotationStrategy: Send {
    type Handle: Clone + Eq + Hash + Debug + Send;
    type Sink: Sink;

    /// The handle new channels should bind to right now.
    fn preferred_handle(&self) -> Self::Handle;

    /// Opens the output for `handle`. Called once per open period.
    fn open_handle(&mut self, handle: &Self::Handle) -> Result<Self::Sink>;

    /// Closes an output once no channel refers to it any more.
    fn close_handle(&mut self, handle: &Self::Handle, sink: Self::Sink) -> Result<()>;

    /// Runs before every physical write; the place for rollover side effects.
    fn before_write(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Wraps a plain writer as a [`Sink`] without locking support.
#[derive(Debug)]
pub struct StreamSink<W>(W);

impl<W: Write> Write for StreamSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {}

/// A single never-rotating output, stdout by default.
#[derive(Debug)]
pub struct StreamStrategy<W = Stdout> {
    stream: Option<W>,
}

impl Default for StreamStrategy<Stdout> {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> StreamStrategy<W> {
    pub fn new(stream: W) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// The wrapped writer, unless a channel currently holds it.
    pub fn stream(&self) -> Option<&W> {
        self.stream.as_ref()
    }
}

impl<W: Write + Send> RotationStrategy for StreamStrategy<W> {
    type Handle = ();
    type Sink = StreamSink<W>;

    fn preferred_handle(&self) {}

    fn open_handle(&mut self, _handle: &()) -> Result<StreamSink<W>> {
        self.stream
            .take()
            .map(StreamSink)
            .ok_or(SawmillError::StreamInUse)
    }

    fn close_handle(&mut self, _handle: &(), mut sink: StreamSink<W>) -> Result<()> {
        sink.flush()?;
        self.stream = Some(sink.0);
        Ok(())
    }
}
