use embedded_hal::digital::OutputPin;

/// On-board LED lit while a cycle is running, when enabled.
pub struct StatusLed<P> {
    pin: P,
    enabled: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Takes the pin and drives it low whatever the setting.
    pub fn new(mut pin: P, enabled: bool) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, enabled })
    }

    pub fn processing(&mut self) -> Result<(), P::Error> {
        if self.enabled {
            self.pin.set_high()?;
        }
        Ok(())
    }

    pub fn idle(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()
    }
}
