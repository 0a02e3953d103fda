use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FanSpeed {
    #[default]
    Low,
    Med,
    High,
}

impl FanSpeed {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Med => "MED",
            Self::High => "HIGH",
        }
    }

    /// The fan relay carrying airflow for this speed.
    pub fn actuator(self) -> Actuator {
        match self {
            Self::Low => Actuator::FanLow,
            Self::Med => Actuator::FanMed,
            Self::High => Actuator::FanHigh,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CycleMode {
    #[default]
    Cool,
    Fan,
}

impl CycleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cool => "COOL",
            Self::Fan => "FAN",
        }
    }
}

/// Logical device state. Exactly one value is current at any instant;
/// the energized actuators always correspond 1:1 to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    Off,
    Fan(FanSpeed),
    Cool(FanSpeed),
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Fan(FanSpeed::Low) => "FAN_LOW",
            Self::Fan(FanSpeed::Med) => "FAN_MED",
            Self::Fan(FanSpeed::High) => "FAN_HIGH",
            Self::Cool(FanSpeed::Low) => "COOL_LOW",
            Self::Cool(FanSpeed::Med) => "COOL_MED",
            Self::Cool(FanSpeed::High) => "COOL_HIGH",
        }
    }
}

/// One physical binary-output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    FanLow,
    FanMed,
    FanHigh,
    Compressor,
}

impl Actuator {
    pub const ALL: [Actuator; 4] = [
        Actuator::FanLow,
        Actuator::FanMed,
        Actuator::FanHigh,
        Actuator::Compressor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FanLow => "fan_low",
            Self::FanMed => "fan_med",
            Self::FanHigh => "fan_high",
            Self::Compressor => "compressor",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerStatus {
    pub current_mode: &'static str,
    pub is_running: bool,
    pub schedule_enabled: bool,
    pub cycle_mode: &'static str,
    pub cycle_fan_speed: &'static str,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
