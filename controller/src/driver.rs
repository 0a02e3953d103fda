use ac_common::{Actuator, OutputDriver};
use tracing::debug;

pub type BoxedDriver = Box<dyn OutputDriver + Send>;

/// Host driver: no hardware attached, writes go to the log. Useful for
/// development and as the non-Pi fallback.
#[derive(Debug, Default)]
pub struct LogDriver;

impl OutputDriver for LogDriver {
    fn set_output(&mut self, actuator: Actuator, on: bool) {
        debug!("output {} -> {}", actuator.as_str(), if on { "ON" } else { "OFF" });
    }
}

#[cfg(feature = "gpio")]
pub use gpio::GpioDriver;

#[cfg(feature = "gpio")]
mod gpio {
    use ac_common::{Actuator, OutputDriver, OutputPinConfig};
    use anyhow::Context;
    use rppal::gpio::{Gpio, OutputPin};

    /// Relay driver for the Raspberry Pi header. Acquiring the pins can
    /// fail (missing /dev/gpiomem, pin already claimed); writes cannot.
    /// Pins reset low when the driver is dropped.
    pub struct GpioDriver {
        fan_low: OutputPin,
        fan_med: OutputPin,
        fan_high: OutputPin,
        compressor: OutputPin,
    }

    impl GpioDriver {
        pub fn new(pins: &OutputPinConfig) -> anyhow::Result<Self> {
            let gpio = Gpio::new().context("failed to open GPIO")?;
            let claim = |bcm: u8| -> anyhow::Result<OutputPin> {
                Ok(gpio
                    .get(bcm)
                    .with_context(|| format!("failed to claim BCM pin {bcm}"))?
                    .into_output_low())
            };

            Ok(Self {
                fan_low: claim(pins.fan_low)?,
                fan_med: claim(pins.fan_med)?,
                fan_high: claim(pins.fan_high)?,
                compressor: claim(pins.compressor)?,
            })
        }

        fn pin(&mut self, actuator: Actuator) -> &mut OutputPin {
            match actuator {
                Actuator::FanLow => &mut self.fan_low,
                Actuator::FanMed => &mut self.fan_med,
                Actuator::FanHigh => &mut self.fan_high,
                Actuator::Compressor => &mut self.compressor,
            }
        }
    }

    impl OutputDriver for GpioDriver {
        fn set_output(&mut self, actuator: Actuator, on: bool) {
            let pin = self.pin(actuator);
            if on {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
    }
}
