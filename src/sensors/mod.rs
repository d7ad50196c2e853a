pub mod battery;
pub mod bme280;

#[derive(Debug)]
pub enum SensorError {
    InitFailure,
    MeasurementFailure,
    NoTemperatureData,
    NoHumidityData,
    NoPressureData,
    ReportFull,
}
