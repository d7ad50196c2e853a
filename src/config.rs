use core::fmt;
use core::time::Duration;

use log::LevelFilter;

use crate::constants::{
    MAX_CLIENT_NAME_LEN, MAX_HOSTNAME_LEN, MAX_LABEL_LEN, MAX_SSID_LEN, MAX_TOPIC_LEN,
    MAX_WIFI_PASSWORD_LEN, MIN_WIFI_PASSWORD_LEN,
};

/// How the station behaves: cadence, feature toggles and where it publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationalConfig {
    // Minutes between two published readings
    pub reporting_interval_minutes: u16,

    // Double the interval while the battery is below 50%
    pub double_interval_on_low_battery: bool,

    // Log to the serial monitor
    pub output_to_serial_monitor: bool,

    // Light the on-board LED while a cycle is running
    pub status_led_enabled: bool,

    // Include the battery level in each report
    pub publish_battery_level: bool,

    // Include the duration of the previous cycle in each report
    pub publish_last_cycle_time: bool,

    // MQTT topic to publish readings to
    pub mqtt_topic: &'static str,
}

/// Where the station connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCredentials {
    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,

    // Wi-Fi pre-shared key, empty for an open network
    pub wifi_password: &'static str,

    // MQTT broker hostname or IP address
    pub mqtt_broker_host: &'static str,

    // MQTT username for authentication
    pub mqtt_user: &'static str,

    // MQTT password for authentication
    pub mqtt_password: &'static str,

    // MQTT client identifier, also used as DHCP hostname
    pub mqtt_client_name: &'static str,

    // MQTT port (usually 1883)
    pub mqtt_port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroReportingInterval,
    EmptyTopic,
    InvalidTopic,
    TopicTooLong,
    EmptySsid,
    SsidTooLong,
    InvalidWifiPassword,
    InvalidBrokerHost,
    EmptyClientName,
    ClientNameTooLong,
    ZeroPort,
}

impl ConfigError {
    pub const fn message(&self) -> &'static str {
        match self {
            ConfigError::ZeroReportingInterval => "reporting_interval_minutes must be greater than zero",
            ConfigError::EmptyTopic => "mqtt_topic must not be empty",
            ConfigError::InvalidTopic => "mqtt_topic must not contain wildcards or NUL",
            ConfigError::TopicTooLong => "mqtt_topic is too long",
            ConfigError::EmptySsid => "wifi_ssid must not be empty",
            ConfigError::SsidTooLong => "wifi_ssid must be at most 32 bytes",
            ConfigError::InvalidWifiPassword => "wifi_password must be empty or 8 to 64 bytes",
            ConfigError::InvalidBrokerHost => "mqtt_broker_host is not a valid hostname or IPv4 address",
            ConfigError::EmptyClientName => "mqtt_client_name must not be empty",
            ConfigError::ClientNameTooLong => "mqtt_client_name must be at most 23 bytes",
            ConfigError::ZeroPort => "mqtt_port must be between 1 and 65535",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl OperationalConfig {
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.reporting_interval_minutes == 0 {
            return Err(ConfigError::ZeroReportingInterval);
        }

        let topic = self.mqtt_topic.as_bytes();
        if topic.is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if topic.len() > MAX_TOPIC_LEN {
            return Err(ConfigError::TopicTooLong);
        }
        let mut i = 0;
        while i < topic.len() {
            if matches!(topic[i], b'+' | b'#' | 0) {
                return Err(ConfigError::InvalidTopic);
            }
            i += 1;
        }

        Ok(())
    }

    /// Configured interval between readings, before any battery adjustment.
    pub const fn reporting_interval(&self) -> Duration {
        Duration::from_secs(self.reporting_interval_minutes as u64 * 60)
    }

    pub const fn log_level(&self) -> LevelFilter {
        if self.output_to_serial_monitor {
            LevelFilter::Info
        } else {
            LevelFilter::Off
        }
    }
}

impl NetworkCredentials {
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let ssid = self.wifi_ssid.len();
        if ssid == 0 {
            return Err(ConfigError::EmptySsid);
        }
        if ssid > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong);
        }

        let psk = self.wifi_password.len();
        if psk != 0 && (psk < MIN_WIFI_PASSWORD_LEN || psk > MAX_WIFI_PASSWORD_LEN) {
            return Err(ConfigError::InvalidWifiPassword);
        }

        if !is_valid_host(self.mqtt_broker_host) {
            return Err(ConfigError::InvalidBrokerHost);
        }

        let client = self.mqtt_client_name.len();
        if client == 0 {
            return Err(ConfigError::EmptyClientName);
        }
        if client > MAX_CLIENT_NAME_LEN {
            return Err(ConfigError::ClientNameTooLong);
        }

        if self.mqtt_port == 0 {
            return Err(ConfigError::ZeroPort);
        }

        Ok(())
    }
}

/// Accepts a dotted IPv4 address or an RFC 1123 hostname.
///
/// A name made only of digits and dots is treated as an address and must
/// have exactly four octets in `0..=255`.
pub const fn is_valid_host(host: &str) -> bool {
    let bytes = host.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    let mut numeric = true;
    let mut labels = 0;
    let mut label_len = 0;
    let mut octet: u32 = 0;
    let mut octet_overflow = false;

    let mut i = 0;
    while i <= bytes.len() {
        if i == bytes.len() || bytes[i] == b'.' {
            if label_len == 0 || label_len > MAX_LABEL_LEN {
                return false;
            }
            if bytes[i - label_len] == b'-' || bytes[i - 1] == b'-' {
                return false;
            }
            if label_len > 3 || octet > 255 {
                octet_overflow = true;
            }
            labels += 1;
            label_len = 0;
            octet = 0;
        } else {
            let b = bytes[i];
            if b.is_ascii_digit() {
                octet = octet * 10 + (b - b'0') as u32;
                if octet > 255 {
                    // keep the accumulator bounded
                    octet = 256;
                }
            } else if b.is_ascii_alphabetic() || b == b'-' {
                numeric = false;
            } else {
                return false;
            }
            label_len += 1;
        }
        i += 1;
    }

    !numeric || (labels == 4 && !octet_overflow)
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));

const _: () = {
    if let Err(e) = OPERATIONAL.validate() {
        panic!("{}", e.message());
    }
    if let Err(e) = CREDENTIALS.validate() {
        panic!("{}", e.message());
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    fn operational() -> OperationalConfig {
        OperationalConfig {
            reporting_interval_minutes: 15,
            double_interval_on_low_battery: false,
            output_to_serial_monitor: true,
            status_led_enabled: false,
            publish_battery_level: false,
            publish_last_cycle_time: true,
            mqtt_topic: "WeatherStationIII",
        }
    }

    fn credentials() -> NetworkCredentials {
        NetworkCredentials {
            wifi_ssid: "YourSSID",
            wifi_password: "YourSSIDsPASSWORD",
            mqtt_broker_host: "192.168.1.173",
            mqtt_user: "MQTTUser",
            mqtt_password: "whatever",
            mqtt_client_name: "WSIII",
            mqtt_port: 1883,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(operational().validate(), Ok(()));
        assert_eq!(credentials().validate(), Ok(()));
    }

    #[test]
    fn test_generated_config_is_valid() {
        assert!(OPERATIONAL.validate().is_ok());
        assert!(CREDENTIALS.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = OperationalConfig {
            reporting_interval_minutes: 0,
            ..operational()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroReportingInterval));
    }

    #[test]
    fn test_topic_rules() {
        let empty = OperationalConfig {
            mqtt_topic: "",
            ..operational()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyTopic));

        for topic in ["station/+/temp", "station/#", "bad\0topic"] {
            let config = OperationalConfig {
                mqtt_topic: topic,
                ..operational()
            };
            assert_eq!(config.validate(), Err(ConfigError::InvalidTopic), "{topic:?}");
        }

        let nested = OperationalConfig {
            mqtt_topic: "home/garden/weather",
            ..operational()
        };
        assert_eq!(nested.validate(), Ok(()));
    }

    #[test]
    fn test_reporting_interval_in_seconds() {
        assert_eq!(operational().reporting_interval(), Duration::from_secs(900));
    }

    #[test]
    fn test_log_level_follows_serial_toggle() {
        assert_eq!(operational().log_level(), LevelFilter::Info);
        let quiet = OperationalConfig {
            output_to_serial_monitor: false,
            ..operational()
        };
        assert_eq!(quiet.log_level(), LevelFilter::Off);
    }

    #[test]
    fn test_wifi_rules() {
        let no_ssid = NetworkCredentials {
            wifi_ssid: "",
            ..credentials()
        };
        assert_eq!(no_ssid.validate(), Err(ConfigError::EmptySsid));

        let long_ssid = NetworkCredentials {
            wifi_ssid: "an-ssid-that-is-longer-than-32-bytes",
            ..credentials()
        };
        assert_eq!(long_ssid.validate(), Err(ConfigError::SsidTooLong));

        let open = NetworkCredentials {
            wifi_password: "",
            ..credentials()
        };
        assert_eq!(open.validate(), Ok(()));

        let short = NetworkCredentials {
            wifi_password: "1234567",
            ..credentials()
        };
        assert_eq!(short.validate(), Err(ConfigError::InvalidWifiPassword));
    }

    #[test]
    fn test_client_name_and_port() {
        let unnamed = NetworkCredentials {
            mqtt_client_name: "",
            ..credentials()
        };
        assert_eq!(unnamed.validate(), Err(ConfigError::EmptyClientName));

        let long_name = NetworkCredentials {
            mqtt_client_name: "weather-station-rooftop-01",
            ..credentials()
        };
        assert_eq!(long_name.validate(), Err(ConfigError::ClientNameTooLong));

        let no_port = NetworkCredentials {
            mqtt_port: 0,
            ..credentials()
        };
        assert_eq!(no_port.validate(), Err(ConfigError::ZeroPort));
    }

    #[test]
    fn test_hosts() {
        for host in ["192.168.1.173", "0.0.0.0", "mqtt.whatever.com", "broker", "my-broker.local"] {
            assert!(is_valid_host(host), "{host} should be accepted");
        }
        for host in [
            "",
            "192.168.1.300",
            "192.168.1",
            "1.2.3.4.5",
            "mqtt..example.com",
            "-broker.lan",
            "broker-.lan",
            "broker.lan.",
            "mqtt_broker",
            "mqtt://192.168.1.173",
        ] {
            assert!(!is_valid_host(host), "{host} should be rejected");
        }
    }

    #[test]
    fn test_invalid_host_in_credentials() {
        let config = NetworkCredentials {
            mqtt_broker_host: "192.168.1.256",
            ..credentials()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidBrokerHost));
    }

    #[test]
    fn test_error_display_names_field() {
        assert!(ConfigError::ZeroPort.to_string().starts_with("mqtt_port"));
    }
}
