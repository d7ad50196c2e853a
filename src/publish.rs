use embassy_net::Stack;
use static_cell::StaticCell;

use solar_weather_station::config::{CREDENTIALS, OPERATIONAL};
use solar_weather_station::constants::*;
use solar_weather_station::report::Report;

use crate::mqtt::Mqtt;
use crate::transport;

static RX_BUF: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
static TX_BUF: StaticCell<[u8; TX_BUFFER_SIZE]> = StaticCell::new();
static MQTT_RX_BUF: StaticCell<[u8; MQTT_RX_BUFFER_SIZE]> = StaticCell::new();
static MQTT_TX_BUF: StaticCell<[u8; MQTT_TX_BUFFER_SIZE]> = StaticCell::new();

#[derive(Debug)]
pub enum Error {
    Format,
    Transport,
    Mqtt,
}

/// Sends the cycle's report to the broker. Built once per wake.
pub struct Publisher {
    stack: Stack<'static>,
    rx_buf: &'static mut [u8; RX_BUFFER_SIZE],
    tx_buf: &'static mut [u8; TX_BUFFER_SIZE],
    mqtt_rx_buf: &'static mut [u8; MQTT_RX_BUFFER_SIZE],
    mqtt_tx_buf: &'static mut [u8; MQTT_TX_BUFFER_SIZE],
}

impl Publisher {
    pub fn new(stack: Stack<'static>) -> Self {
        Self {
            stack,
            rx_buf: RX_BUF.init([0; RX_BUFFER_SIZE]),
            tx_buf: TX_BUF.init([0; TX_BUFFER_SIZE]),
            mqtt_rx_buf: MQTT_RX_BUF.init([0; MQTT_RX_BUFFER_SIZE]),
            mqtt_tx_buf: MQTT_TX_BUF.init([0; MQTT_TX_BUFFER_SIZE]),
        }
    }

    pub async fn send(&mut self, report: &Report) -> Result<(), Error> {
        let message = report
            .format(&OPERATIONAL, CREDENTIALS.mqtt_client_name)
            .map_err(|_| Error::Format)?;
        log::debug!("Formatted MQTT message: {}", message);

        let socket = transport::connect(
            self.stack,
            &mut self.rx_buf[..],
            &mut self.tx_buf[..],
            CREDENTIALS.mqtt_broker_host,
            CREDENTIALS.mqtt_port,
        )
        .await
        .map_err(|e| {
            log::error!("Transport error: {:?}", e);
            Error::Transport
        })?;

        let mut mqtt = Mqtt::new(socket, &mut *self.mqtt_tx_buf, &mut *self.mqtt_rx_buf)
            .await
            .map_err(|_| Error::Mqtt)?;

        let result = mqtt
            .send_message(OPERATIONAL.mqtt_topic, message.as_bytes())
            .await
            .map_err(|_| Error::Mqtt);

        // Explicitly disconnect, even after a failed publish
        mqtt.disconnect().await;

        result?;
        log::info!("MQTT data published to {}", OPERATIONAL.mqtt_topic);
        Ok(())
    }
}
