use crate::error::{Result, SawmillError};
use crate::rotate::{
    ChannelOptions, RotationStrategy, Rotater, RotaterOptions, Sink, StreamStrategy,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

type Written = Arc<Mutex<HashMap<u32, String>>>;

#[derive(Default)]
struct MemoryStrategy {
    preferred: u32,
    fail_open: Option<u32>,
    written: Written,
    opened: Arc<Mutex<Vec<u32>>>,
    closed: Arc<Mutex<Vec<u32>>>,
}

struct MemorySink {
    handle: u32,
    written: Written,
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written
            .lock()
            .entry(self.handle)
            .or_default()
            .push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {}

impl RotationStrategy for MemoryStrategy {
    type Handle = u32;
    type Sink = MemorySink;

    fn preferred_handle(&self) -> u32 {
        self.preferred
    }

    fn open_handle(&mut self, handle: &u32) -> Result<MemorySink> {
        if self.fail_open == Some(*handle) {
            return Err(SawmillError::NoUniqueLogFile {
                path: format!("memory.{handle}").into(),
            });
        }
        self.opened.lock().push(*handle);
        Ok(MemorySink {
            handle: *handle,
            written: Arc::clone(&self.written),
        })
    }

    fn close_handle(&mut self, handle: &u32, _sink: MemorySink) -> Result<()> {
        self.closed.lock().push(*handle);
        Ok(())
    }
}

struct Fixture {
    rotater: Rotater<MemoryStrategy>,
    written: Written,
    opened: Arc<Mutex<Vec<u32>>>,
    closed: Arc<Mutex<Vec<u32>>>,
}

impl Fixture {
    fn new(omit_directives: bool) -> Self {
        let strategy = MemoryStrategy::default();
        let written = Arc::clone(&strategy.written);
        let opened = Arc::clone(&strategy.opened);
        let closed = Arc::clone(&strategy.closed);
        let rotater = Rotater::with_options(
            strategy,
            RotaterOptions {
                omit_directives,
                concurrent_writes: false,
            },
        );
        Self {
            rotater,
            written,
            opened,
            closed,
        }
    }

    fn prefer(&self, handle: u32) {
        self.rotater.with_strategy(|s| s.preferred = handle);
    }

    fn fail_to_open(&self, handle: Option<u32>) {
        self.rotater.with_strategy(|s| s.fail_open = handle);
    }

    fn contents(&self, handle: u32) -> String {
        self.written.lock().get(&handle).cloned().unwrap_or_default()
    }
}

#[test]
fn new_outputs_start_with_directives() {
    // Arrange
    let fixture = Fixture::new(false);

    // Act
    let mut channel = fixture.rotater.create_channel().unwrap();
    channel.write_str("hello\n").unwrap();

    // Assert
    assert_eq!(
        fixture.contents(0),
        "# sawmill_format: version=1\n# sawmill_format: encoding=UTF-8\nhello\n"
    );
}

#[test]
fn directives_can_be_omitted() {
    let fixture = Fixture::new(true);

    let mut channel = fixture.rotater.create_channel().unwrap();
    channel.write_str("hello\n").unwrap();

    assert_eq!(fixture.contents(0), "hello\n");
}

#[test]
fn channel_stays_pinned_until_check_rotate() {
    // Arrange
    let fixture = Fixture::new(true);
    let mut channel = fixture.rotater.create_channel().unwrap();
    channel.write_str("a\n").unwrap();

    // Act
    fixture.prefer(1);
    channel.write_str("b\n").unwrap();
    channel.check_rotate().unwrap();
    channel.write_str("c\n").unwrap();

    // Assert
    assert_eq!(fixture.contents(0), "a\nb\n");
    assert_eq!(fixture.contents(1), "c\n");
    assert_eq!(channel.handle(), Some(&1));
    assert_eq!(*fixture.closed.lock(), vec![0]);
}

#[test]
fn check_rotate_is_a_no_op_when_preferred_is_unchanged() {
    let fixture = Fixture::new(true);
    let mut channel = fixture.rotater.create_channel().unwrap();

    channel.check_rotate().unwrap();

    assert_eq!(channel.handle(), Some(&0));
    assert_eq!(*fixture.opened.lock(), vec![0]);
    assert!(fixture.closed.lock().is_empty());
}

#[test]
fn shared_handle_closes_once_after_last_release() {
    // Arrange
    let fixture = Fixture::new(true);
    let mut first = fixture.rotater.create_channel().unwrap();
    let mut second = fixture.rotater.create_channel().unwrap();

    // Act / Assert
    assert_eq!(fixture.rotater.refcount(&0), 2);
    assert_eq!(*fixture.opened.lock(), vec![0]);

    first.close().unwrap();
    assert!(fixture.closed.lock().is_empty());
    assert_eq!(fixture.rotater.refcount(&0), 1);

    second.close().unwrap();
    second.close().unwrap();
    assert_eq!(*fixture.closed.lock(), vec![0]);
    assert_eq!(fixture.rotater.open_handle_count(), 0);
}

#[test]
fn auto_rotate_follows_the_preferred_handle() {
    let fixture = Fixture::new(true);
    let mut channel = fixture
        .rotater
        .create_channel_with(ChannelOptions { auto_rotate: true })
        .unwrap();

    channel.write_str("a\n").unwrap();
    fixture.prefer(7);
    channel.write_str("b\n").unwrap();

    assert_eq!(fixture.contents(0), "a\n");
    assert_eq!(fixture.contents(7), "b\n");
    assert_eq!(*fixture.closed.lock(), vec![0]);
}

#[test]
fn dropping_a_channel_releases_its_handle() {
    let fixture = Fixture::new(true);

    {
        let _channel = fixture.rotater.create_channel().unwrap();
        assert_eq!(fixture.rotater.open_handle_count(), 1);
    }

    assert_eq!(fixture.rotater.open_handle_count(), 0);
    assert_eq!(*fixture.closed.lock(), vec![0]);
}

#[test]
fn writes_after_close_are_ignored() {
    let fixture = Fixture::new(true);
    let mut channel = fixture.rotater.create_channel().unwrap();
    channel.close().unwrap();

    channel.write_str("late\n").unwrap();

    assert!(!channel.is_open());
    assert_eq!(fixture.contents(0), "");
}

#[test]
fn stream_strategy_shares_one_stream() {
    let rotater = Rotater::with_options(
        StreamStrategy::new(Vec::<u8>::new()),
        RotaterOptions {
            omit_directives: true,
            concurrent_writes: true,
        },
    );

    let mut a = rotater.create_channel().unwrap();
    let mut b = rotater.create_channel().unwrap();
    a.write_str("one\n").unwrap();
    b.write_str("two\n").unwrap();
    a.close().unwrap();
    b.close().unwrap();

    let written = rotater.with_strategy(|s| s.stream().cloned()).unwrap();
    assert_eq!(String::from_utf8(written).unwrap(), "one\ntwo\n");
}

#[test]
fn failed_rotation_keeps_the_old_handle_held() {
    // Arrange
    let fixture = Fixture::new(true);
    let mut first = fixture.rotater.create_channel().unwrap();
    let mut second = fixture.rotater.create_channel().unwrap();
    fixture.prefer(1);
    fixture.fail_to_open(Some(1));

    // Act
    let err = first.check_rotate().unwrap_err();
    drop(first);
    second.write_str("still here\n").unwrap();

    // Assert
    assert!(matches!(err, SawmillError::NoUniqueLogFile { .. }));
    assert_eq!(fixture.rotater.refcount(&0), 1);
    assert!(fixture.closed.lock().is_empty());
    assert_eq!(fixture.contents(0), "still here\n");
}

#[test]
fn failed_auto_rotate_leaves_the_channel_usable() {
    // Arrange
    let fixture = Fixture::new(true);
    let mut channel = fixture
        .rotater
        .create_channel_with(ChannelOptions { auto_rotate: true })
        .unwrap();
    fixture.prefer(1);
    fixture.fail_to_open(Some(1));

    // Act
    let failed = channel.write_str("lost\n");
    fixture.fail_to_open(None);
    channel.write_str("retried\n").unwrap();

    // Assert
    assert!(failed.is_err());
    assert_eq!(fixture.contents(0), "");
    assert_eq!(fixture.contents(1), "retried\n");
    assert_eq!(*fixture.closed.lock(), vec![0]);
    assert_eq!(fixture.rotater.refcount(&0), 0);
}

struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn failed_directive_write_returns_the_stream() {
    let rotater = Rotater::new(StreamStrategy::new(BrokenWriter));

    let first = rotater.create_channel().err().unwrap();
    let second = rotater.create_channel().err().unwrap();

    assert!(matches!(first, SawmillError::Io(_)));
    assert!(matches!(second, SawmillError::Io(_)));
    assert!(rotater.with_strategy(|s| s.stream().is_some()));
    assert_eq!(rotater.open_handle_count(), 0);
}
