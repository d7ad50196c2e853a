/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Size of the heap in DRAM (internal memory)
pub const HEAP_SIZE: usize = 72 * 1024;

/// Size of the TCP socket receive buffer
pub const RX_BUFFER_SIZE: usize = 1536;
/// Size of the TCP socket transmit buffer
pub const TX_BUFFER_SIZE: usize = 1536;

/// Size of the MQTT client receive buffer for application data
pub const MQTT_RX_BUFFER_SIZE: usize = 512;
/// Size of the MQTT client transmit buffer for application data
pub const MQTT_TX_BUFFER_SIZE: usize = 512;
/// Maximum number of MQTT v5 properties per packet
pub const MQTT_MAX_PROPERTIES: usize = 5;
/// Publish attempts before a cycle gives up on the broker
pub const MQTT_PUBLISH_ATTEMPTS: usize = 3;
/// MQTT keep-alive in seconds (one cycle never lasts longer)
pub const MQTT_KEEP_ALIVE_SECS: u16 = 60;

/// Capacity of a formatted report
pub const REPORT_MAX_LEN: usize = 256;
/// Maximum number of sensor readings in one report
pub const REPORT_MAX_READINGS: usize = 8;

/// Seconds to wait for Wi-Fi association and DHCP before skipping the cycle
pub const WIFI_CONNECT_TIMEOUT_SECS: u64 = 20;
/// Delay before retrying a failed Wi-Fi connection
pub const WIFI_RECONNECT_DELAY_MS: u64 = 2000;
/// TCP socket timeout towards the broker
pub const SOCKET_TIMEOUT_SECS: u64 = 10;

/// Settle time after the BME280 switches to normal mode
pub const SENSOR_WARMUP_MS: u64 = 100;

/// Number of ADC readings averaged per battery measurement
pub const BATTERY_SAMPLE_COUNT: usize = 8;
/// Battery voltage reported as 0%
pub const BATTERY_EMPTY_MV: u32 = 3200;
/// Battery voltage reported as 100%
pub const BATTERY_FULL_MV: u32 = 4200;
/// Below this level the reporting interval may be doubled
pub const LOW_BATTERY_PERCENT: u8 = 50;
/// Battery voltage divider ratio (two equal resistors)
pub const BATTERY_DIVIDER_RATIO: u32 = 2;
/// ADC input voltage at full scale with 11 dB attenuation
pub const ADC_FULL_SCALE_MV: u32 = 3300;
/// Highest raw reading of the 12-bit ADC
pub const ADC_MAX_READING: u32 = 4095;

/// Shortest deep sleep between two cycles
pub const MIN_SLEEP_SECS: u64 = 10;

/// Words of RTC memory kept across deep sleep
pub const RETAINED_WORDS: usize = 4;
/// Marks retained memory as written by this firmware
pub const RETAINED_MAGIC: u32 = 0x5753_4933;

/// MQTT topic length limit enforced at build time
pub const MAX_TOPIC_LEN: usize = 128;
/// 802.11 SSID length limit
pub const MAX_SSID_LEN: usize = 32;
/// WPA2 passphrase bounds
pub const MIN_WIFI_PASSWORD_LEN: usize = 8;
pub const MAX_WIFI_PASSWORD_LEN: usize = 64;
/// Client identifier length every MQTT broker must accept
pub const MAX_CLIENT_NAME_LEN: usize = 23;
/// RFC 1123 hostname limits
pub const MAX_HOSTNAME_LEN: usize = 253;
pub const MAX_LABEL_LEN: usize = 63;
