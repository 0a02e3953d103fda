use crate::{
    outputs::OutputDriver,
    types::{Actuator, FanSpeed, OperatingMode},
};

/// Owns the device's operating mode and the four relay outputs.
///
/// Every transition is break-before-make: all outputs are dropped
/// before the new mode's outputs are energized, so at most one fan
/// relay is ever on and the compressor is never on without airflow.
/// The brief all-off flicker between modes is the accepted cost.
///
/// The struct itself is synchronous; callers that share it across
/// tasks wrap it in a mutex and hold the lock for one transition at a
/// time, never across an await.
#[derive(Debug)]
pub struct AcController<D> {
    driver: D,
    mode: OperatingMode,
}

impl<D: OutputDriver> AcController<D> {
    /// Takes ownership of the outputs and drives them all low, so the
    /// process starts from a known all-off state.
    pub fn new(driver: D) -> Self {
        let mut controller = Self {
            driver,
            mode: OperatingMode::Off,
        };
        controller.clear_outputs();
        controller
    }

    pub fn current_mode(&self) -> OperatingMode {
        self.mode
    }

    /// Fan-only operation: exactly one fan relay on, compressor off.
    pub fn set_fan(&mut self, speed: FanSpeed) {
        self.clear_outputs();
        self.driver.set_output(speed.actuator(), true);
        self.mode = OperatingMode::Fan(speed);
    }

    /// Cooling: the matching fan relay plus the compressor. Cooling
    /// without airflow is not a representable state.
    pub fn set_cooling(&mut self, speed: FanSpeed) {
        self.clear_outputs();
        self.driver.set_output(speed.actuator(), true);
        self.driver.set_output(Actuator::Compressor, true);
        self.mode = OperatingMode::Cool(speed);
    }

    pub fn turn_off(&mut self) {
        self.clear_outputs();
        self.mode = OperatingMode::Off;
    }

    fn clear_outputs(&mut self) {
        for actuator in Actuator::ALL {
            self.driver.set_output(actuator, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Records every write so tests can replay transition histories.
    #[derive(Debug, Clone, Default)]
    struct RecordingDriver {
        writes: Arc<Mutex<Vec<(Actuator, bool)>>>,
    }

    impl OutputDriver for RecordingDriver {
        fn set_output(&mut self, actuator: Actuator, on: bool) {
            self.writes.lock().unwrap().push((actuator, on));
        }
    }

    impl RecordingDriver {
        fn final_states(&self) -> HashMap<Actuator, bool> {
            let mut states: HashMap<Actuator, bool> =
                Actuator::ALL.iter().map(|&a| (a, false)).collect();
            for &(actuator, on) in self.writes.lock().unwrap().iter() {
                states.insert(actuator, on);
            }
            states
        }

        fn on_set(&self) -> Vec<Actuator> {
            let mut on: Vec<Actuator> = self
                .final_states()
                .into_iter()
                .filter(|&(_, v)| v)
                .map(|(a, _)| a)
                .collect();
            on.sort_by_key(|a| a.as_str());
            on
        }
    }

    #[test]
    fn construction_clears_all_outputs() {
        let driver = RecordingDriver::default();
        let controller = AcController::new(driver.clone());

        assert_eq!(controller.current_mode(), OperatingMode::Off);
        assert_eq!(driver.writes.lock().unwrap().len(), 4);
        assert!(driver.on_set().is_empty());
    }

    #[test]
    fn fan_mode_energizes_exactly_one_output() {
        for speed in [FanSpeed::Low, FanSpeed::Med, FanSpeed::High] {
            let driver = RecordingDriver::default();
            let mut controller = AcController::new(driver.clone());

            controller.set_fan(speed);

            assert_eq!(driver.on_set(), vec![speed.actuator()]);
            assert_eq!(controller.current_mode(), OperatingMode::Fan(speed));
        }
    }

    #[test]
    fn cooling_mode_energizes_compressor_and_matching_fan() {
        for speed in [FanSpeed::Low, FanSpeed::Med, FanSpeed::High] {
            let driver = RecordingDriver::default();
            let mut controller = AcController::new(driver.clone());

            controller.set_cooling(speed);

            let mut expected = vec![speed.actuator(), Actuator::Compressor];
            expected.sort_by_key(|a| a.as_str());
            assert_eq!(driver.on_set(), expected);
            assert_eq!(controller.current_mode(), OperatingMode::Cool(speed));
        }
    }

    #[test]
    fn turn_off_drops_every_output() {
        let driver = RecordingDriver::default();
        let mut controller = AcController::new(driver.clone());

        controller.set_cooling(FanSpeed::High);
        controller.turn_off();

        assert!(driver.on_set().is_empty());
        assert_eq!(controller.current_mode(), OperatingMode::Off);
    }

    #[test]
    fn transitions_never_leave_stale_outputs() {
        let driver = RecordingDriver::default();
        let mut controller = AcController::new(driver.clone());

        controller.set_fan(FanSpeed::High);
        controller.set_cooling(FanSpeed::Low);
        controller.set_fan(FanSpeed::Med);
        controller.set_cooling(FanSpeed::High);

        // Replay the full write history: at most one fan relay may be
        // on at any point, including mid-transition.
        let mut states: HashMap<Actuator, bool> =
            Actuator::ALL.iter().map(|&a| (a, false)).collect();
        for &(actuator, on) in driver.writes.lock().unwrap().iter() {
            states.insert(actuator, on);
            let fans_on = [Actuator::FanLow, Actuator::FanMed, Actuator::FanHigh]
                .into_iter()
                .filter(|a| states[a])
                .count();
            assert!(fans_on <= 1, "multiple fan relays energized");
        }

        let mut expected = vec![FanSpeed::High.actuator(), Actuator::Compressor];
        expected.sort_by_key(|a| a.as_str());
        assert_eq!(driver.on_set(), expected);
    }
}
