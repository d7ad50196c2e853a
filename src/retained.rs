//! Cycle history kept in RTC memory across deep sleep.
//!
//! The words are not initialised on power-on, so every restore checks a
//! magic word and a checksum before trusting them.

use core::time::Duration;

use crate::constants::{RETAINED_MAGIC, RETAINED_WORDS};

const NO_CYCLE: u32 = u32::MAX;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleHistory {
    /// Completed cycles since the last power-on
    pub wake_count: u32,
    /// Awake time of the previous cycle, `None` on the first boot
    pub last_cycle: Option<Duration>,
}

impl CycleHistory {
    pub fn decode(words: [u32; RETAINED_WORDS]) -> Option<Self> {
        let [magic, wake_count, last_ms, crc] = words;
        if magic != RETAINED_MAGIC || crc != checksum(magic, wake_count, last_ms) {
            return None;
        }

        let last_cycle = match last_ms {
            NO_CYCLE => None,
            ms => Some(Duration::from_millis(ms.into())),
        };

        Some(Self {
            wake_count,
            last_cycle,
        })
    }

    pub fn encode(&self) -> [u32; RETAINED_WORDS] {
        let last_ms = match self.last_cycle {
            Some(d) => u32::try_from(d.as_millis()).unwrap_or(NO_CYCLE - 1).min(NO_CYCLE - 1),
            None => NO_CYCLE,
        };

        [
            RETAINED_MAGIC,
            self.wake_count,
            last_ms,
            checksum(RETAINED_MAGIC, self.wake_count, last_ms),
        ]
    }

    pub fn record(&mut self, awake: Duration) {
        self.wake_count = self.wake_count.wrapping_add(1);
        self.last_cycle = Some(awake);
    }
}

fn checksum(magic: u32, wake_count: u32, last_ms: u32) -> u32 {
    (magic ^ wake_count.rotate_left(11) ^ last_ms.rotate_left(23)).wrapping_mul(0x9E37_79B1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_boot_has_no_cycle() {
        let words = CycleHistory::default().encode();
        let history = CycleHistory::decode(words).unwrap();

        assert_eq!(history.wake_count, 0);
        assert_eq!(history.last_cycle, None);
    }

    #[test]
    fn test_record_survives_encoding() {
        let mut history = CycleHistory::default();
        history.record(Duration::from_millis(3_412));
        history.record(Duration::from_millis(2_907));

        let restored = CycleHistory::decode(history.encode()).unwrap();
        assert_eq!(restored.wake_count, 2);
        assert_eq!(restored.last_cycle, Some(Duration::from_millis(2_907)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(CycleHistory::decode([0; RETAINED_WORDS]), None);
        assert_eq!(
            CycleHistory::decode([0xDEAD_BEEF, 7, 1200, 42]),
            None
        );

        let mut words = CycleHistory {
            wake_count: 9,
            last_cycle: Some(Duration::from_millis(1_500)),
        }
        .encode();
        words[2] ^= 1;
        assert_eq!(CycleHistory::decode(words), None);
    }

    #[test]
    fn test_long_cycle_saturates() {
        let history = CycleHistory {
            wake_count: 1,
            last_cycle: Some(Duration::from_secs(10_000_000)),
        };

        let restored = CycleHistory::decode(history.encode()).unwrap();
        assert_eq!(
            restored.last_cycle,
            Some(Duration::from_millis(u64::from(NO_CYCLE - 1)))
        );
    }
}
