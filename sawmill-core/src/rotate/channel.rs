use crate::error::Result;
use crate::rotate::{RotationStrategy, Rotater};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelOptions {
    /// Offer a rotation before every write instead of only on
    /// [`Channel::check_rotate`].
    pub auto_rotate: bool,
}

/// A writer pinned to one of the rotater's handles.
///
/// Until `check_rotate` is called (or `auto_rotate` is set), every write goes
/// to the output the channel was opened on, even after the strategy has moved
/// on to a newer one. Dropping an open channel releases its handle.
pub struct Channel<S: RotationStrategy> {
    rotater: Rotater<S>,
    handle: Option<S::Handle>,
    options: ChannelOptions,
}

impl<S: RotationStrategy> Channel<S> {
    pub(crate) fn open(rotater: Rotater<S>, options: ChannelOptions) -> Result<Self> {
        let handle = rotater.do_open()?;
        Ok(Self {
            rotater,
            handle: Some(handle),
            options,
        })
    }

    pub fn handle(&self) -> Option<&S::Handle> {
        self.handle.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Writes `bytes` in one locked operation. A closed channel ignores writes.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(handle) = &self.handle {
            let handle = self
                .rotater
                .do_write(handle.clone(), bytes, self.options.auto_rotate)?;
            self.handle = Some(handle);
        }
        Ok(())
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.write(text.as_bytes())
    }

    /// Moves to the strategy's preferred handle if it has changed.
    pub fn check_rotate(&mut self) -> Result<()> {
        if let Some(handle) = &self.handle {
            let handle = self.rotater.do_check_rotate(handle.clone())?;
            self.handle = Some(handle);
        }
        Ok(())
    }

    /// Releases the handle. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => self.rotater.do_close(&handle),
            None => Ok(()),
        }
    }
}

impl<S: RotationStrategy> Drop for Channel<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take()
            && let Err(err) = self.rotater.do_close(&handle)
        {
            warn!(error = %err, handle = ?handle, "failed to release rotation handle");
        }
    }
}
