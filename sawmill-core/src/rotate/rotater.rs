use crate::error::{Result, SawmillError};
use crate::format::directive_lines;
use crate::rotate::{Channel, ChannelOptions, RotationStrategy, Sink};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RotaterOptions {
    /// Skip the `# sawmill_format:` lines normally written to each new output.
    pub omit_directives: bool,

    /// Take an advisory lock on the sink around every write, for outputs
    /// shared with other processes.
    pub concurrent_writes: bool,
}

struct OpenHandle<K> {
    sink: K,
    refcount: usize,
}

struct State<S: RotationStrategy> {
    strategy: S,
    handles: HashMap<S::Handle, OpenHandle<S::Sink>>,
}

impl<S: RotationStrategy> State<S> {
    fn obtain(&mut self, options: &RotaterOptions) -> Result<S::Handle> {
        let handle = self.strategy.preferred_handle();
        if let Some(open) = self.handles.get_mut(&handle) {
            open.refcount += 1;
            return Ok(handle);
        }

        let mut sink = self.strategy.open_handle(&handle)?;
        debug!(handle = ?handle, "opened rotation handle");
        if !options.omit_directives
            && let Err(err) = write_directives(&mut sink, options)
        {
            // The handle never entered the table; hand the sink back.
            if let Err(close_err) = self.strategy.close_handle(&handle, sink) {
                warn!(error = %close_err, handle = ?handle, "failed to close rotation handle");
            }
            return Err(err);
        }
        self.handles
            .insert(handle.clone(), OpenHandle { sink, refcount: 1 });
        Ok(handle)
    }

    fn release(&mut self, handle: &S::Handle) -> Result<()> {
        let open = self
            .handles
            .get_mut(handle)
            .ok_or_else(|| unknown_handle(handle))?;
        open.refcount -= 1;
        if open.refcount == 0
            && let Some(open) = self.handles.remove(handle)
        {
            debug!(handle = ?handle, "closing rotation handle");
            self.strategy.close_handle(handle, open.sink)?;
        }
        Ok(())
    }

    fn check_rotate(&mut self, handle: S::Handle, options: &RotaterOptions) -> Result<S::Handle> {
        if handle == self.strategy.preferred_handle() {
            return Ok(handle);
        }
        // Take the new handle first so a failed open leaves the old one held.
        let next = self.obtain(options)?;
        if let Err(err) = self.release(&handle) {
            warn!(error = %err, handle = ?handle, "failed to release rotated-out handle");
        }
        Ok(next)
    }
}

fn unknown_handle<H: std::fmt::Debug>(handle: &H) -> SawmillError {
    SawmillError::UnknownHandle {
        handle: format!("{handle:?}"),
    }
}

fn write_directives<K: Sink>(sink: &mut K, options: &RotaterOptions) -> Result<()> {
    for line in directive_lines() {
        write_to_sink(sink, line.as_bytes(), options)?;
    }
    Ok(())
}

fn write_to_sink<K: Sink>(sink: &mut K, bytes: &[u8], options: &RotaterOptions) -> Result<()> {
    if !options.concurrent_writes {
        sink.write_all(bytes)?;
        sink.flush()?;
        return Ok(());
    }

    sink.lock_exclusive()?;
    let written = sink.write_all(bytes).and_then(|()| sink.flush());
    let unlocked = sink.unlock();
    written?;
    unlocked?;
    Ok(())
}

/// Shares a rotation strategy between any number of channels.
///
/// Cloning is cheap; clones refer to the same handle table. One mutex
/// serializes the table, the strategy's side effects and every physical write.
pub struct Rotater<S: RotationStrategy> {
    state: Arc<Mutex<State<S>>>,
    options: RotaterOptions,
}

impl<S: RotationStrategy> Clone for Rotater<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            options: self.options,
        }
    }
}

impl<S: RotationStrategy> Rotater<S> {
    pub fn new(strategy: S) -> Self {
        Self::with_options(strategy, RotaterOptions::default())
    }

    pub fn with_options(strategy: S, options: RotaterOptions) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                strategy,
                handles: HashMap::new(),
            })),
            options,
        }
    }

    pub fn options(&self) -> &RotaterOptions {
        &self.options
    }

    pub fn create_channel(&self) -> Result<Channel<S>> {
        self.create_channel_with(ChannelOptions::default())
    }

    pub fn create_channel_with(&self, options: ChannelOptions) -> Result<Channel<S>> {
        Channel::open(self.clone(), options)
    }

    /// Number of physical outputs currently open.
    pub fn open_handle_count(&self) -> usize {
        self.state.lock().handles.len()
    }

    /// Channels currently bound to `handle`.
    pub fn refcount(&self, handle: &S::Handle) -> usize {
        self.state
            .lock()
            .handles
            .get(handle)
            .map_or(0, |open| open.refcount)
    }

    /// Runs `f` against the strategy while holding the lock.
    pub fn with_strategy<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.state.lock().strategy)
    }

    pub(crate) fn do_open(&self) -> Result<S::Handle> {
        self.state.lock().obtain(&self.options)
    }

    pub(crate) fn do_write(
        &self,
        handle: S::Handle,
        bytes: &[u8],
        auto_rotate: bool,
    ) -> Result<S::Handle> {
        let mut state = self.state.lock();
        state.strategy.before_write()?;

        let handle = if auto_rotate {
            state.check_rotate(handle, &self.options)?
        } else {
            handle
        };

        let open = state
            .handles
            .get_mut(&handle)
            .ok_or_else(|| unknown_handle(&handle))?;
        write_to_sink(&mut open.sink, bytes, &self.options)?;
        Ok(handle)
    }

    pub(crate) fn do_close(&self, handle: &S::Handle) -> Result<()> {
        self.state.lock().release(handle)
    }

    pub(crate) fn do_check_rotate(&self, handle: S::Handle) -> Result<S::Handle> {
        self.state.lock().check_rotate(handle, &self.options)
    }
}
