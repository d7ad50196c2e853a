use bme280_rs::{AsyncBme280, Oversampling, SensorMode};
use embassy_time::{Delay, Duration, Timer};
use log::info;

use solar_weather_station::constants::SENSOR_WARMUP_MS;
use solar_weather_station::report::Report;

use super::SensorError;

pub struct Bme280<I2c> {
    sensor: AsyncBme280<I2c, Delay>,
}

impl<I2C: embedded_hal_async::i2c::I2c> Bme280<I2C> {
    pub async fn new(i2c: I2C) -> Result<Self, SensorError> {
        info!("Initialising BME280...");
        let mut sensor = AsyncBme280::new(i2c, Delay);
        sensor.init().await.map_err(|_| SensorError::InitFailure)?;

        sensor
            .set_sampling_configuration(
                bme280_rs::Configuration::default()
                    .with_temperature_oversampling(Oversampling::Oversample1)
                    .with_pressure_oversampling(Oversampling::Oversample1)
                    .with_humidity_oversampling(Oversampling::Oversample1)
                    .with_sensor_mode(SensorMode::Normal),
            )
            .await
            .map_err(|_| SensorError::InitFailure)?;

        info!("Initialised BME280");

        Ok(Self { sensor })
    }

    /// Adds temperature (°C), humidity (%RH) and pressure (hPa) to the report.
    pub async fn measure(&mut self, report: &mut Report) -> Result<(), SensorError> {
        Timer::after(Duration::from_millis(SENSOR_WARMUP_MS)).await;

        let sample = self
            .sensor
            .read_sample()
            .await
            .map_err(|_| SensorError::MeasurementFailure)?;

        let temperature = sample.temperature.ok_or(SensorError::NoTemperatureData)?;
        let humidity = sample.humidity.ok_or(SensorError::NoHumidityData)?;
        let pressure = sample.pressure.ok_or(SensorError::NoPressureData)?;

        report
            .add_reading("temperature", temperature)
            .and_then(|_| report.add_reading("humidity", humidity))
            .and_then(|_| report.add_reading("pressure", pressure / 100.0))
            .map_err(|_| SensorError::ReportFull)
    }
}
