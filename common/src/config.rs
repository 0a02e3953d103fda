use serde::{Deserialize, Serialize};

use crate::types::{CycleMode, FanSpeed};

/// Settings applied each time the duty cycle activates the unit.
/// Mutable while a cycle runs; picked up on the next activation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub mode: CycleMode,
    pub speed: FanSpeed,
}

impl CycleConfig {
    /// Default duty-cycle settings: cooling at medium airflow.
    pub fn initial() -> Self {
        Self {
            mode: CycleMode::Cool,
            speed: FanSpeed::Med,
        }
    }
}

/// BCM pin assignments for the four relay outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputPinConfig {
    pub fan_low: u8,
    pub fan_med: u8,
    pub fan_high: u8,
    pub compressor: u8,
}

impl Default for OutputPinConfig {
    fn default() -> Self {
        Self {
            fan_low: 4,
            fan_med: 17,
            fan_high: 22,
            compressor: 18,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub on_phase_secs: u64,
    pub off_phase_secs: u64,
    pub http_port: u16,
    pub pins: OutputPinConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            on_phase_secs: 1_800,
            off_phase_secs: 1_800,
            http_port: 5000,
            pins: OutputPinConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub fn sanitize(&mut self) {
        if self.on_phase_secs == 0 {
            self.on_phase_secs = 1;
        }
        if self.off_phase_secs == 0 {
            self.off_phase_secs = 1;
        }
    }
}
