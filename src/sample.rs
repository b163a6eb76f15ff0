//! Input sample types shared by all source adapters.

/// Activation level of one observation from an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    /// A discrete button state (pressed / not pressed).
    Digital(bool),
    /// An analog trigger magnitude in `0..=255`.
    Analog(u8),
}

impl Activation {
    /// Whether this activation counts as "pressed" against the given threshold.
    ///
    /// Digital states pass the boolean through unchanged; analog magnitudes use
    /// a strict `value > threshold` comparison, so a magnitude equal to the
    /// threshold is *not* pressed.
    pub fn is_active(&self, threshold: u8) -> bool {
        match self {
            Activation::Digital(pressed) => *pressed,
            Activation::Analog(value) => *value > threshold,
        }
    }
}

/// One observation delivered by a [`SampleSource`](crate::source::SampleSource).
///
/// Samples are transient: produced, fed to the forwarder, and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSample {
    /// The observed activation level.
    pub activation: Activation,
    /// Screen coordinates of the event, if the source knows them. Hook-style
    /// sources carry the event position; poll-style sources leave this empty
    /// and the emitter queries the live cursor instead.
    pub position: Option<(f64, f64)>,
    /// Monotonic packet/sequence number for polled sources. Two consecutive
    /// samples with the same sequence id are the same device state and the
    /// second is skipped entirely.
    pub sequence: Option<u64>,
}

impl InputSample {
    /// Create a digital sample (discrete press/release).
    pub fn digital(pressed: bool) -> Self {
        Self {
            activation: Activation::Digital(pressed),
            position: None,
            sequence: None,
        }
    }

    /// Create an analog sample from a trigger magnitude.
    pub fn analog(value: u8) -> Self {
        Self {
            activation: Activation::Analog(value),
            position: None,
            sequence: None,
        }
    }

    /// Attach the screen position the event occurred at.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Attach a packet/sequence number.
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analog_threshold_is_strict() {
        assert!(!Activation::Analog(0).is_active(30));
        assert!(!Activation::Analog(30).is_active(30));
        assert!(Activation::Analog(31).is_active(30));
        assert!(Activation::Analog(255).is_active(30));
    }

    #[test]
    fn test_digital_ignores_threshold() {
        assert!(Activation::Digital(true).is_active(255));
        assert!(!Activation::Digital(false).is_active(0));
    }

    #[test]
    fn test_sample_builders() {
        let sample = InputSample::analog(50).with_sequence(7);
        assert_eq!(sample.activation, Activation::Analog(50));
        assert_eq!(sample.sequence, Some(7));
        assert_eq!(sample.position, None);

        let sample = InputSample::digital(true).at(10.0, 20.0);
        assert_eq!(sample.position, Some((10.0, 20.0)));
    }
}
