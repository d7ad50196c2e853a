//! Hardware-independent core of the solar weather station.
//!
//! Holds the build-time configuration and everything the duty cycle decides
//! without touching a peripheral, so it runs on the host for tests and on the
//! ESP32 for the firmware binary.

#![cfg_attr(not(test), no_std)]

pub mod battery;
pub mod config;
pub mod constants;
pub mod report;
pub mod retained;
pub mod schedule;
pub mod status_led;
