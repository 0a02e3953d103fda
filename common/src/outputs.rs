use crate::types::Actuator;

/// Binary output interface to the relay hardware.
///
/// Writes are fire-and-forget at this layer: the controller records the
/// mode it commanded and has no feedback path from the outputs.
pub trait OutputDriver {
    fn set_output(&mut self, actuator: Actuator, on: bool);
}

impl<D: OutputDriver + ?Sized> OutputDriver for Box<D> {
    fn set_output(&mut self, actuator: Actuator, on: bool) {
        (**self).set_output(actuator, on);
    }
}
