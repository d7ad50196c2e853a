use esp_hal::{
    analog::adc::{Adc, AdcConfig, Attenuation},
    peripherals::{ADC1, GPIO35},
};

use solar_weather_station::battery::BatteryLevel;
use solar_weather_station::constants::BATTERY_SAMPLE_COUNT;

// Oneshot conversions that may report "not ready" before giving up on a sample
const READ_ATTEMPTS: usize = 1000;

/// Samples the battery divider on GPIO35, `None` when the ADC never converts.
pub fn read(adc: ADC1<'_>, pin: GPIO35<'_>) -> Option<BatteryLevel> {
    let mut config = AdcConfig::new();
    let mut pin = config.enable_pin(pin, Attenuation::_11dB);
    let mut adc = Adc::new(adc, config);

    let mut samples = [0u16; BATTERY_SAMPLE_COUNT];
    for sample in samples.iter_mut() {
        *sample = (0..READ_ATTEMPTS).find_map(|_| adc.read_oneshot(&mut pin).ok())?;
    }

    let level = BatteryLevel::from_adc_samples(&samples)?;
    log::info!("Battery: {} mV ({}%)", level.millivolts, level.percent);
    Some(level)
}
