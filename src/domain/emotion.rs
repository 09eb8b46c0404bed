// ============================================================
// Layer 3 — Emotion Label Set
// ============================================================
// The seven emotion classes shared by both network variants.
// Dataset files store the class as an integer code 0..=6 in
// this exact order, and the networks emit one logit per class
// in the same order.
//
//   0 angry   1 disgust   2 fear   3 happy
//   4 sad     5 surprise  6 neutral

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of emotion classes — the width of every output layer.
pub const NUM_CLASSES: usize = 7;

/// A facial emotion class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    /// All classes in label-index order.
    pub const ALL: [Emotion; NUM_CLASSES] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// Map a dataset code to its class. Returns None outside 0..=6.
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// The class index used by the dataset and the output layer.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Angry    => "angry",
            Emotion::Disgust  => "disgust",
            Emotion::Fear     => "fear",
            Emotion::Happy    => "happy",
            Emotion::Sad      => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral  => "neutral",
        }
    }

    /// One-hot vector with a single 1.0 at this class's index.
    pub fn one_hot(self) -> [f32; NUM_CLASSES] {
        let mut v = [0.0; NUM_CLASSES];
        v[self.index()] = 1.0;
        v
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_one_hot() {
        let happy = Emotion::from_code(3).unwrap();
        assert_eq!(happy, Emotion::Happy);
        assert_eq!(happy.one_hot(), [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_codes_follow_label_order() {
        let names: Vec<&str> = (0..7)
            .map(|c| Emotion::from_code(c).unwrap().name())
            .collect();
        assert_eq!(
            names,
            ["angry", "disgust", "fear", "happy", "sad", "surprise", "neutral"]
        );
    }

    #[test]
    fn test_out_of_range_codes() {
        assert_eq!(Emotion::from_code(-1), None);
        assert_eq!(Emotion::from_code(7), None);
    }

    #[test]
    fn test_index_roundtrip() {
        for e in Emotion::ALL {
            assert_eq!(Emotion::from_code(e.index() as i64), Some(e));
        }
    }
}
