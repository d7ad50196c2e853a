use crate::constants::{
    ADC_FULL_SCALE_MV, ADC_MAX_READING, BATTERY_DIVIDER_RATIO, BATTERY_EMPTY_MV, BATTERY_FULL_MV,
    LOW_BATTERY_PERCENT,
};

/// Battery state derived from the divided cell voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryLevel {
    pub millivolts: u32,
    pub percent: u8,
}

impl BatteryLevel {
    /// Linear charge estimate between the empty and full cell voltages, clamped to `0..=100`.
    pub fn from_millivolts(millivolts: u32) -> Self {
        let percent = if millivolts <= BATTERY_EMPTY_MV {
            0
        } else if millivolts >= BATTERY_FULL_MV {
            100
        } else {
            (millivolts - BATTERY_EMPTY_MV) * 100 / (BATTERY_FULL_MV - BATTERY_EMPTY_MV)
        };

        Self {
            millivolts,
            percent: percent as u8,
        }
    }

    /// Averages raw ADC readings taken on the divider midpoint.
    pub fn from_adc_samples(samples: &[u16]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sum: u32 = samples.iter().map(|&s| u32::from(s)).sum();
        let average = (sum / samples.len() as u32).min(ADC_MAX_READING);
        let pin_mv = average * ADC_FULL_SCALE_MV / ADC_MAX_READING;

        Some(Self::from_millivolts(pin_mv * BATTERY_DIVIDER_RATIO))
    }

    pub fn is_low(&self) -> bool {
        self.percent < LOW_BATTERY_PERCENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(BatteryLevel::from_millivolts(2900).percent, 0);
        assert_eq!(BatteryLevel::from_millivolts(BATTERY_EMPTY_MV).percent, 0);
        assert_eq!(BatteryLevel::from_millivolts(BATTERY_FULL_MV).percent, 100);
        assert_eq!(BatteryLevel::from_millivolts(4350).percent, 100);
    }

    #[test]
    fn test_percent_is_linear() {
        assert_eq!(BatteryLevel::from_millivolts(3700).percent, 50);
        assert_eq!(BatteryLevel::from_millivolts(3450).percent, 25);
        assert_eq!(BatteryLevel::from_millivolts(4100).percent, 90);
    }

    #[test]
    fn test_low_threshold() {
        assert!(BatteryLevel::from_millivolts(3690).is_low());
        assert!(!BatteryLevel::from_millivolts(3700).is_low());
    }

    #[test]
    fn test_from_adc_samples() {
        assert_eq!(BatteryLevel::from_adc_samples(&[]), None);

        // full scale on the divider midpoint reads as 6.6 V at the cell
        let full = BatteryLevel::from_adc_samples(&[4095; 4]).unwrap();
        assert_eq!(full.millivolts, 6600);
        assert_eq!(full.percent, 100);

        // 2482 * 3300 / 4095 = 2000 mV at the pin, 4000 mV at the cell
        let level = BatteryLevel::from_adc_samples(&[2480, 2484, 2482, 2482]).unwrap();
        assert_eq!(level.millivolts, 4000);
        assert_eq!(level.percent, 80);
    }
}
