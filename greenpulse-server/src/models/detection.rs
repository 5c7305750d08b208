use serde::{Deserialize, Serialize};

/// People count produced by one backend in one scan cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub count: u32,
    pub confidence: f64,
}

impl Detection {
    pub fn new(count: u32, confidence: f64) -> Self {
        Self {
            count,
            confidence: round_confidence(confidence),
        }
    }

    pub fn empty() -> Self {
        Self {
            count: 0,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionOutcome {
    Detected(Detection),
    Unavailable,
}

fn round_confidence(confidence: f64) -> f64 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_rounded_and_clamped() {
        assert_eq!(Detection::new(1, 0.876).confidence, 0.88);
        assert_eq!(Detection::new(1, 1.7).confidence, 1.0);
        assert_eq!(Detection::new(0, -0.2).confidence, 0.0);
    }
}
