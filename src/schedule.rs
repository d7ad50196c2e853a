use core::time::Duration;

use crate::battery::BatteryLevel;
use crate::config::OperationalConfig;
use crate::constants::MIN_SLEEP_SECS;

/// Interval until the next reading, doubled on a low battery when enabled.
///
/// An unknown battery level never stretches the interval.
pub fn reporting_interval(config: &OperationalConfig, battery: Option<&BatteryLevel>) -> Duration {
    let interval = config.reporting_interval();

    match battery {
        Some(level) if config.double_interval_on_low_battery && level.is_low() => {
            log::info!(
                "Battery at {}%, doubling reporting interval",
                level.percent
            );
            interval * 2
        }
        _ => interval,
    }
}

/// Time to deep sleep so that the next wake lands one interval after this one.
pub fn sleep_duration(interval: Duration, awake: Duration) -> Duration {
    interval
        .saturating_sub(awake)
        .max(Duration::from_secs(MIN_SLEEP_SECS))
}

/// Measures how long the station stays awake in one cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleTimer {
    started_ms: u64,
}

impl CycleTimer {
    pub fn start(now_ms: u64) -> Self {
        Self { started_ms: now_ms }
    }

    pub fn elapsed(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.started_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(double: bool) -> OperationalConfig {
        OperationalConfig {
            reporting_interval_minutes: 15,
            double_interval_on_low_battery: double,
            output_to_serial_monitor: false,
            status_led_enabled: false,
            publish_battery_level: true,
            publish_last_cycle_time: true,
            mqtt_topic: "WeatherStationIII",
        }
    }

    #[test]
    fn test_interval_doubles_only_when_enabled_and_low() {
        let low = BatteryLevel::from_millivolts(3500);
        let healthy = BatteryLevel::from_millivolts(4000);
        let base = Duration::from_secs(15 * 60);

        assert_eq!(reporting_interval(&config(true), Some(&low)), base * 2);
        assert_eq!(reporting_interval(&config(true), Some(&healthy)), base);
        assert_eq!(reporting_interval(&config(false), Some(&low)), base);
    }

    #[test]
    fn test_unknown_battery_keeps_interval() {
        assert_eq!(
            reporting_interval(&config(true), None),
            Duration::from_secs(900)
        );
    }

    #[test]
    fn test_sleep_subtracts_awake_time() {
        let interval = Duration::from_secs(900);
        assert_eq!(
            sleep_duration(interval, Duration::from_millis(4_500)),
            Duration::from_millis(895_500)
        );
    }

    #[test]
    fn test_sleep_has_a_floor() {
        let interval = Duration::from_secs(60);
        assert_eq!(
            sleep_duration(interval, Duration::from_secs(58)),
            Duration::from_secs(MIN_SLEEP_SECS)
        );
        assert_eq!(
            sleep_duration(interval, Duration::from_secs(120)),
            Duration::from_secs(MIN_SLEEP_SECS)
        );
    }

    #[test]
    fn test_cycle_timer() {
        let timer = CycleTimer::start(1_250);
        assert_eq!(timer.elapsed(4_000), Duration::from_millis(2_750));
        // clock never runs backwards, but don't underflow if it does
        assert_eq!(timer.elapsed(1_000), Duration::ZERO);
    }
}
