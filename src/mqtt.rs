use embedded_io_async::{Read, Write};
use rust_mqtt::{
    client::{
        client::MqttClient,
        client_config::{ClientConfig, MqttVersion},
    },
    packet::v5::publish_packet::QualityOfService,
    utils::rng_generator::CountingRng,
};

use solar_weather_station::config::CREDENTIALS;
use solar_weather_station::constants::{
    MQTT_KEEP_ALIVE_SECS, MQTT_MAX_PROPERTIES, MQTT_PUBLISH_ATTEMPTS, MQTT_RX_BUFFER_SIZE,
    MQTT_TX_BUFFER_SIZE,
};

#[derive(Debug)]
pub enum Error {
    ConnectionFailed,
    PublishMessageFailed,
}

pub struct Mqtt<'a, T>
where
    T: Read + Write,
{
    client: MqttClient<'a, T, MQTT_MAX_PROPERTIES, CountingRng>,
}

impl<'a, T> Mqtt<'a, T>
where
    T: Read + Write,
{
    pub async fn new(
        transport: T,
        tx_buffer: &'a mut [u8; MQTT_TX_BUFFER_SIZE],
        rx_buffer: &'a mut [u8; MQTT_RX_BUFFER_SIZE],
    ) -> Result<Self, Error> {
        let mut config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
        config.add_max_subscribe_qos(QualityOfService::QoS1);
        config.add_client_id(CREDENTIALS.mqtt_client_name);
        if !CREDENTIALS.mqtt_user.is_empty() {
            config.add_username(CREDENTIALS.mqtt_user);
            config.add_password(CREDENTIALS.mqtt_password);
        }
        config.keep_alive = MQTT_KEEP_ALIVE_SECS;
        config.max_packet_size = MQTT_TX_BUFFER_SIZE as u32;

        let mut client = MqttClient::<_, MQTT_MAX_PROPERTIES, _>::new(
            transport,
            tx_buffer,
            MQTT_TX_BUFFER_SIZE,
            rx_buffer,
            MQTT_RX_BUFFER_SIZE,
            config,
        );

        match client.connect_to_broker().await {
            Ok(_) => {
                log::info!("MQTT connected to broker successfully");
            }
            Err(e) => {
                log::error!("MQTT connect_to_broker failed: {:?}", e);
                return Err(Error::ConnectionFailed);
            }
        }

        Ok(Self { client })
    }

    pub async fn send_message(&mut self, topic: &str, message: &[u8]) -> Result<(), Error> {
        for attempt in 1..=MQTT_PUBLISH_ATTEMPTS {
            match self
                .client
                .send_message(topic, message, QualityOfService::QoS1, false)
                .await
            {
                Ok(_) => {
                    log::debug!("Message published and acknowledged");
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("Publish attempt {} failed: {:?}", attempt, e);
                }
            }
        }

        log::error!("Failed to publish message");
        Err(Error::PublishMessageFailed)
    }

    pub async fn disconnect(mut self) {
        let _ = self.client.disconnect().await;
    }
}
