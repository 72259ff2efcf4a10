use chrono::{TimeDelta, TimeZone, Utc};
use sawmill_core::entry::Timestamp;
use sawmill_core::rotate::Clock;
use std::sync::{Arc, Mutex};

/// `2024-03-01` at the given wall time, UTC.
pub fn ts(hour: u32, minute: u32, second: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, second)
        .single()
        .expect("valid fixture time")
}

/// A clock the test moves by hand. Clones share the same time.
#[derive(Clone)]
pub struct FakeClock {
    now: Arc<Mutex<Timestamp>>,
}

impl FakeClock {
    pub fn at(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }

    /// A [`Clock`] reading this fake.
    pub fn clock(&self) -> Clock {
        let now = Arc::clone(&self.now);
        Box::new(move || *now.lock().unwrap())
    }
}
