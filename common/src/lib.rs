pub mod ac;
pub mod config;
pub mod outputs;
pub mod schedule;
pub mod types;

pub use ac::AcController;
pub use config::{ControllerConfig, CycleConfig, OutputPinConfig};
pub use outputs::OutputDriver;
pub use schedule::{Schedule, ScheduleError};
pub use types::{Actuator, ControllerStatus, CycleMode, FanSpeed, OperatingMode};
