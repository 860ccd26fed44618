//! Controller-wide fault type

use crate::config::PersistError;
use crate::control::ActuatorError;
use crate::sensor::SensorError;
use crate::terminal::ProtocolError;

/// Any fault raised while running the controller
///
/// Every fault is local: the loop keeps going with the last good values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    Sensor(SensorError),
    Actuator(ActuatorError),
    Protocol(ProtocolError),
    Persist(PersistError),
}

impl From<SensorError> for Fault {
    fn from(e: SensorError) -> Self {
        Fault::Sensor(e)
    }
}

impl From<ActuatorError> for Fault {
    fn from(e: ActuatorError) -> Self {
        Fault::Actuator(e)
    }
}

impl From<ProtocolError> for Fault {
    fn from(e: ProtocolError) -> Self {
        Fault::Protocol(e)
    }
}

impl From<PersistError> for Fault {
    fn from(e: PersistError) -> Self {
        Fault::Persist(e)
    }
}

impl Fault {
    /// Short name for terminal output
    pub fn as_str(&self) -> &'static str {
        match self {
            Fault::Sensor(_) => "sensor",
            Fault::Actuator(_) => "actuator",
            Fault::Protocol(_) => "protocol",
            Fault::Persist(_) => "persistence",
        }
    }
}
