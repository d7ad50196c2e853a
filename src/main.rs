#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Instant;

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{self as hal};
use esp_println::logger::init_logger;
use esp_wifi::EspWifiController;
use static_cell::StaticCell;

use hal::{
    gpio::{Level, Output, OutputConfig},
    i2c::master::I2c,
    ram,
    rng::Rng,
    rtc_cntl::{sleep::TimerWakeupSource, wakeup_cause, Rtc, SleepSource},
    time::Rate,
    timer::timg::TimerGroup,
};

use log::{error, info, warn};

extern crate alloc;

mod mqtt;
mod publish;
mod sensors;
mod transport;
mod wifi;

use solar_weather_station::config::OPERATIONAL;
use solar_weather_station::constants::*;
use solar_weather_station::report::Report;
use solar_weather_station::retained::CycleHistory;
use solar_weather_station::schedule::{self, CycleTimer};
use solar_weather_station::status_led::StatusLed;

use publish::Publisher;
use sensors::bme280::Bme280;
use wifi::Wifi;

static WIFI_CONTROLLER: StaticCell<EspWifiController<'static>> = StaticCell::new();

// Not initialised on power-on, only trusted after a timer wakeup
#[ram(rtc_fast, persistent)]
static mut RETAINED: [u32; RETAINED_WORDS] = [0; RETAINED_WORDS];

esp_bootloader_esp_idf::esp_app_desc!();

fn restore_history() -> CycleHistory {
    if !matches!(wakeup_cause(), SleepSource::Timer) {
        return CycleHistory::default();
    }

    // SAFETY: single core, read before any task is spawned
    let words = unsafe { core::ptr::addr_of!(RETAINED).read_volatile() };
    CycleHistory::decode(words).unwrap_or_else(|| {
        warn!("Retained cycle history is invalid, starting over");
        CycleHistory::default()
    })
}

fn store_history(history: &CycleHistory) {
    // SAFETY: single core, written right before deep sleep
    unsafe { core::ptr::addr_of_mut!(RETAINED).write_volatile(history.encode()) };
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    init_logger(OPERATIONAL.log_level());

    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let timg1 = TimerGroup::new(peripherals.TIMG1);

    esp_hal_embassy::init(timg1.timer0);
    let timer = CycleTimer::start(Instant::now().as_millis());

    let mut history = restore_history();
    info!(
        "Solar weather station v{} starting cycle {}",
        VERSION,
        history.wake_count.wrapping_add(1)
    );

    let Ok(mut led) = StatusLed::new(
        Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default()),
        OPERATIONAL.status_led_enabled,
    );
    led.processing().ok();

    let battery = sensors::battery::read(peripherals.ADC1, peripherals.GPIO35);
    if battery.is_none() {
        warn!("Battery level unavailable");
    }
    let interval = schedule::reporting_interval(&OPERATIONAL, battery.as_ref());

    let mut report = Report {
        battery,
        last_cycle: history.last_cycle,
        ..Default::default()
    };

    let i2c_config = hal::i2c::master::Config::default().with_frequency(Rate::from_khz(100));
    match I2c::new(peripherals.I2C0, i2c_config) {
        Ok(i2c) => {
            let i2c = i2c
                .with_sda(peripherals.GPIO21)
                .with_scl(peripherals.GPIO22)
                .into_async();
            match Bme280::new(i2c).await {
                Ok(mut bme280) => {
                    if let Err(e) = bme280.measure(&mut report).await {
                        error!("BME280 measurement error: {:?}", e);
                    }
                }
                Err(e) => error!("BME280 init error: {:?}", e),
            }
        }
        Err(e) => error!("I2C config error: {:?}", e),
    }

    let rng = Rng::new(peripherals.RNG);
    match esp_wifi::init(timg0.timer0, rng.clone()) {
        Ok(controller) => {
            let controller = WIFI_CONTROLLER.init(controller);
            match Wifi::new(controller, peripherals.WIFI, rng, spawner) {
                Ok(wifi) => publish(&wifi, &report).await,
                Err(e) => error!("WiFi init error: {:?}", e),
            }
        }
        Err(e) => error!("WiFi controller init error: {:?}", e),
    }

    led.idle().ok();

    let awake = timer.elapsed(Instant::now().as_millis());
    history.record(awake);
    store_history(&history);

    let sleep = schedule::sleep_duration(interval, awake);
    info!(
        "Cycle took {} ms, sleeping for {} s",
        awake.as_millis(),
        sleep.as_secs()
    );

    let mut rtc = Rtc::new(peripherals.LPWR);
    let wakeup = TimerWakeupSource::new(sleep);
    rtc.sleep_deep(&[&wakeup]);
}

async fn publish(wifi: &Wifi, report: &Report) {
    if let Err(e) = wifi.connect().await {
        error!("Network unavailable, skipping publish: {:?}", e);
        return;
    }

    let mut publisher = Publisher::new(wifi.stack);
    if let Err(e) = publisher.send(report).await {
        error!("Publish error: {:?}", e);
    }
}
