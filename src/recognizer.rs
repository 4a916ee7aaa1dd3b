//! Speech recognizer collaborator
//!
//! The processor never owns a speech engine. It only asks the injected
//! [`Recognizer`] to start (re-arm) or stop listening.

/// Re-arm interface of the external speech engine
pub trait Recognizer {
    /// Begin listening for the next utterance
    fn start_listening(&mut self);

    /// Stop listening, no further results are expected
    fn stop_listening(&mut self);
}

/// Recognizer driven by the caller, which delivers results itself
///
/// Records every start/stop request so the caller knows when the engine has
/// been re-armed and can report readiness.
#[derive(Debug, Default)]
pub struct ManualRecognizer {
    armed: bool,
    starts: usize,
    stops: usize,
}

impl ManualRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once per start request, clearing the flag
    pub fn take_armed(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl Recognizer for ManualRecognizer {
    fn start_listening(&mut self) {
        self.armed = true;
        self.starts += 1;
    }

    fn stop_listening(&mut self) {
        self.armed = false;
        self.stops += 1;
    }
}

impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    fn start_listening(&mut self) {
        (**self).start_listening();
    }

    fn stop_listening(&mut self) {
        (**self).stop_listening();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_armed_once() {
        let mut recognizer = ManualRecognizer::new();
        recognizer.start_listening();

        assert!(recognizer.take_armed());
        assert!(!recognizer.take_armed());
        assert_eq!(recognizer.starts(), 1);
    }

    #[test]
    fn test_stop_disarms() {
        let mut recognizer = ManualRecognizer::new();
        recognizer.start_listening();
        recognizer.stop_listening();

        assert!(!recognizer.is_armed());
        assert_eq!((recognizer.starts(), recognizer.stops()), (1, 1));
    }

    #[test]
    fn test_boxed_recognizer() {
        let mut boxed: Box<dyn Recognizer> = Box::new(ManualRecognizer::new());
        boxed.start_listening();
        boxed.stop_listening();
    }
}
