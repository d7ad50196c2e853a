use std::{env, error::Error, fs, path::Path};

use serde::Deserialize;

const CONFIG_FILE: &str = "cfg.toml";
const EXAMPLE_CONFIG_FILE: &str = "cfg.toml.example";

// Credentials that may be supplied through the environment (or .env) instead of cfg.toml
const ENV_OVERRIDES: [&str; 4] = ["WIFI_SSID", "WIFI_PASSWORD", "MQTT_USER", "MQTT_PASSWORD"];

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    operational: RawOperational,
    credentials: RawCredentials,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawOperational {
    reporting_interval_minutes: u16,
    double_interval_on_low_battery: bool,
    output_to_serial_monitor: bool,
    status_led_enabled: bool,
    publish_battery_level: bool,
    publish_last_cycle_time: bool,
    mqtt_topic: String,
}

impl Default for RawOperational {
    fn default() -> Self {
        Self {
            reporting_interval_minutes: 15,
            double_interval_on_low_battery: false,
            output_to_serial_monitor: true,
            status_led_enabled: false,
            publish_battery_level: false,
            publish_last_cycle_time: true,
            mqtt_topic: "WeatherStationIII".into(),
        }
    }
}

#[derive(Deserialize)]
struct RawCredentials {
    wifi_ssid: String,
    #[serde(default)]
    wifi_password: String,
    mqtt_broker_host: String,
    #[serde(default)]
    mqtt_user: String,
    #[serde(default)]
    mqtt_password: String,
    mqtt_client_name: String,
    #[serde(default = "default_mqtt_port")]
    mqtt_port: u16,
}

fn default_mqtt_port() -> u16 {
    1883
}

impl RawCredentials {
    fn apply_env_overrides(&mut self) {
        for key in ENV_OVERRIDES {
            let Ok(value) = env::var(key) else {
                continue;
            };
            let field = match key {
                "WIFI_SSID" => &mut self.wifi_ssid,
                "WIFI_PASSWORD" => &mut self.wifi_password,
                "MQTT_USER" => &mut self.mqtt_user,
                _ => &mut self.mqtt_password,
            };
            *field = value;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if the config or any override changes
    println!("cargo:rerun-if-changed={CONFIG_FILE}");
    println!("cargo:rerun-if-changed={EXAMPLE_CONFIG_FILE}");
    if Path::new(".env").exists() {
        println!("cargo:rerun-if-changed=.env");
    }
    for key in ENV_OVERRIDES {
        println!("cargo:rerun-if-env-changed={key}");
    }

    dotenvy::dotenv().ok();

    let path = if Path::new(CONFIG_FILE).exists() {
        CONFIG_FILE
    } else {
        println!("cargo:warning={CONFIG_FILE} not found, building with {EXAMPLE_CONFIG_FILE}");
        EXAMPLE_CONFIG_FILE
    };

    // Read and parse
    let toml_str = fs::read_to_string(path)?;
    let mut raw: RawConfig = toml::from_str(&toml_str)?;
    raw.credentials.apply_env_overrides();

    let op = &raw.operational;
    let cred = &raw.credentials;

    // Generate Rust code, validated by const assertions in src/config.rs
    let code = format!(
        r#"
        pub const OPERATIONAL: OperationalConfig = OperationalConfig {{
            reporting_interval_minutes: {interval},
            double_interval_on_low_battery: {double},
            output_to_serial_monitor: {serial},
            status_led_enabled: {led},
            publish_battery_level: {battery},
            publish_last_cycle_time: {cycle},
            mqtt_topic: {topic:?},
        }};

        pub const CREDENTIALS: NetworkCredentials = NetworkCredentials {{
            wifi_ssid: {ssid:?},
            wifi_password: {psk:?},
            mqtt_broker_host: {host:?},
            mqtt_user: {user:?},
            mqtt_password: {pw:?},
            mqtt_client_name: {client:?},
            mqtt_port: {port},
        }};
    "#,
        interval = op.reporting_interval_minutes,
        double = op.double_interval_on_low_battery,
        serial = op.output_to_serial_monitor,
        led = op.status_led_enabled,
        battery = op.publish_battery_level,
        cycle = op.publish_last_cycle_time,
        topic = op.mqtt_topic,
        ssid = cred.wifi_ssid,
        psk = cred.wifi_password,
        host = cred.mqtt_broker_host,
        user = cred.mqtt_user,
        pw = cred.mqtt_password,
        client = cred.mqtt_client_name,
        port = cred.mqtt_port,
    );

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    fs::write(dest_path, code)?;
    Ok(())
}
