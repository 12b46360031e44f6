//! Analog sensor inputs.
//!
//! Both sensors hang off one 10-bit ADC and are selected through its input
//! multiplexer: channel 0 is the temperature sensor, channel 1 the light
//! sensor.

use core::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Largest value a 10-bit conversion can return.
pub const ADC_MAX: u16 = 1023;

/// ADC reference voltage in millivolts.
pub const ADC_REFERENCE_MV: i32 = 5000;

/// Number of ADC steps.
pub const ADC_STEPS: i32 = 1024;

/// Temperature sensor output at 0 °C, in millivolts.
pub const TEMPERATURE_OFFSET_MV: i32 = 500;

/// Multiplexed ADC input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdcChannel {
    /// Temperature sensor, mux channel 0.
    Temperature,
    /// Light sensor, mux channel 1.
    Light,
}

impl AdcChannel {
    /// Both channels, in mux order.
    pub const ALL: [Self; 2] = [Self::Temperature, Self::Light];

    /// Multiplexer input selecting this channel.
    #[must_use]
    pub const fn mux(self) -> u8 {
        match self {
            Self::Temperature => 0,
            Self::Light => 1,
        }
    }
}

impl fmt::Display for AdcChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Light => write!(f, "light"),
        }
    }
}

/// A source of single 10-bit conversions.
///
/// `sample` blocks until the conversion completes, like polling the ADC's
/// start-conversion bit until it clears.
pub trait AdcSource: Sync {
    /// Convert one sample on `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be read.
    fn sample(&self, channel: AdcChannel) -> ControlResult<u16>;
}

/// Reject conversions that a 10-bit ADC cannot produce.
///
/// # Errors
///
/// Returns [`ControlError::SampleOutOfRange`] if `raw` exceeds [`ADC_MAX`].
pub const fn check_sample(channel: AdcChannel, raw: u16) -> ControlResult<u16> {
    if raw > ADC_MAX {
        return Err(ControlError::sample_out_of_range(channel, raw));
    }
    Ok(raw)
}

/// Convert a temperature sample to degrees Celsius.
///
/// The millivolt step is integer arithmetic (truncating), the final scaling
/// to 10 mV/°C is not.
#[must_use]
pub fn temperature_celsius(raw: u16) -> f64 {
    let millivolts = i32::from(raw) * ADC_REFERENCE_MV / ADC_STEPS;
    f64::from(millivolts - TEMPERATURE_OFFSET_MV) / 10.0
}

/// Convert a light sample to a percentage (0 to just under 100).
#[must_use]
pub fn light_percent(raw: u16) -> f64 {
    f64::from(raw) / f64::from(ADC_STEPS) * 100.0
}

/// How a simulated channel produces samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// The same value on every sample.
    Constant(u16),
    /// Sweep between `low` and `high` and back, moving `step` per sample.
    Triangle {
        /// Lowest value.
        low: u16,
        /// Highest value.
        high: u16,
        /// Change per sample.
        step: u16,
    },
}

#[derive(Debug, Clone, Copy)]
struct Channel {
    waveform: Waveform,
    value: u16,
    rising: bool,
    samples: u64,
}

impl Channel {
    const fn new(waveform: Waveform) -> Self {
        let value = match waveform {
            Waveform::Constant(value) => value,
            Waveform::Triangle { low, .. } => low,
        };
        Self {
            waveform,
            value,
            rising: true,
            samples: 0,
        }
    }

    fn next(&mut self) -> u16 {
        let current = self.value;
        self.samples = self.samples.saturating_add(1);

        if let Waveform::Triangle { low, high, step } = self.waveform {
            let (low, high) = (low.min(high), low.max(high));
            if self.rising {
                self.value = self.value.saturating_add(step).min(high);
                if self.value == high {
                    self.rising = false;
                }
            } else {
                self.value = self.value.saturating_sub(step).max(low);
                if self.value == low {
                    self.rising = true;
                }
            }
        }
        current
    }
}

/// ADC stand-in for host runs and tests.
///
/// Each channel follows a [`Waveform`]. Samples are checked against the
/// 10-bit range, so a waveform above [`ADC_MAX`] exercises the fault path.
#[derive(Debug)]
pub struct SimulatedAdc {
    channels: Mutex<[Channel; AdcChannel::ALL.len()]>,
}

impl SimulatedAdc {
    /// Create an ADC with the given temperature and light waveforms.
    #[must_use]
    pub const fn new(temperature: Waveform, light: Waveform) -> Self {
        Self {
            channels: Mutex::new([Channel::new(temperature), Channel::new(light)]),
        }
    }

    /// Create an ADC returning fixed raw values.
    #[must_use]
    pub const fn constant(temperature: u16, light: u16) -> Self {
        Self::new(Waveform::Constant(temperature), Waveform::Constant(light))
    }

    /// Replace a channel's waveform, restarting it.
    pub fn set_waveform(&self, channel: AdcChannel, waveform: Waveform) {
        if let Some(slot) = self.channels.lock().get_mut(usize::from(channel.mux())) {
            *slot = Channel::new(waveform);
        }
    }

    /// Replace a channel's waveform with a constant value.
    pub fn set(&self, channel: AdcChannel, raw: u16) {
        self.set_waveform(channel, Waveform::Constant(raw));
    }

    /// Samples taken from `channel` so far.
    #[must_use]
    pub fn samples_taken(&self, channel: AdcChannel) -> u64 {
        self.channels
            .lock()
            .get(usize::from(channel.mux()))
            .map_or(0, |slot| slot.samples)
    }
}

impl Default for SimulatedAdc {
    /// Roughly 22 °C and 40 % light.
    fn default() -> Self {
        Self::constant(147, 410)
    }
}

impl AdcSource for SimulatedAdc {
    fn sample(&self, channel: AdcChannel) -> ControlResult<u16> {
        let raw = self
            .channels
            .lock()
            .get_mut(usize::from(channel.mux()))
            .map(Channel::next)
            .ok_or_else(|| ControlError::channel_unavailable(channel, "no such mux input"))?;
        check_sample(channel, raw)
    }
}
