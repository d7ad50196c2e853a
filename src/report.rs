use core::fmt::Write;
use core::time::Duration;

use heapless::{FnvIndexMap, String};

use crate::battery::BatteryLevel;
use crate::config::OperationalConfig;
use crate::constants::{REPORT_MAX_LEN, REPORT_MAX_READINGS};

#[derive(Debug)]
pub enum Error {
    TooManyReadings,
    Format,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::Format
    }
}

/// One cycle's worth of data, published as a single MQTT message.
#[derive(Default, Debug)]
pub struct Report {
    pub readings: FnvIndexMap<&'static str, f32, REPORT_MAX_READINGS>,
    pub battery: Option<BatteryLevel>,
    pub last_cycle: Option<Duration>,
}

impl Report {
    pub fn add_reading(&mut self, key: &'static str, value: f32) -> Result<(), Error> {
        self.readings
            .insert(key, value)
            .map(|_| ())
            .map_err(|_| Error::TooManyReadings)
    }

    fn battery_field(&self, config: &OperationalConfig) -> Option<u8> {
        self.battery
            .filter(|_| config.publish_battery_level)
            .map(|b| b.percent)
    }

    fn cycle_field(&self, config: &OperationalConfig) -> Option<u128> {
        self.last_cycle
            .filter(|_| config.publish_last_cycle_time)
            .map(|d| d.as_millis())
    }

    /// Formats the report as InfluxDB line protocol.
    #[cfg(feature = "influx")]
    pub fn format(
        &self,
        config: &OperationalConfig,
        station: &str,
    ) -> Result<String<REPORT_MAX_LEN>, Error> {
        let mut payload: String<REPORT_MAX_LEN> = String::new();

        write!(payload, "weather,station={}", station)?;
        let mut separator = ' ';
        for (key, value) in self.readings.iter() {
            write!(payload, "{}{}={:.2}", separator, key, value)?;
            separator = ',';
        }
        if let Some(percent) = self.battery_field(config) {
            write!(payload, "{}battery_level={}i", separator, percent)?;
            separator = ',';
        }
        if let Some(ms) = self.cycle_field(config) {
            write!(payload, "{}last_cycle_time={}i", separator, ms)?;
        }

        Ok(payload)
    }

    /// Formats the report as a flat JSON object.
    #[cfg(not(feature = "influx"))]
    pub fn format(
        &self,
        config: &OperationalConfig,
        station: &str,
    ) -> Result<String<REPORT_MAX_LEN>, Error> {
        let mut payload: String<REPORT_MAX_LEN> = String::new();

        write!(payload, "{{\"station\":\"{}\"", station)?;
        for (key, value) in self.readings.iter() {
            write!(payload, ",\"{}\":{:.2}", key, value)?;
        }
        if let Some(percent) = self.battery_field(config) {
            write!(payload, ",\"battery_level\":{}", percent)?;
        }
        if let Some(ms) = self.cycle_field(config) {
            write!(payload, ",\"last_cycle_time\":{}", ms)?;
        }
        write!(payload, "}}")?;

        Ok(payload)
    }
}
