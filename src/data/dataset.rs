use burn::data::dataset::Dataset;

use crate::domain::sample::EmotionSample;

/// In-memory split exposed through Burn's Dataset trait.
pub struct EmotionDataset {
    samples: Vec<EmotionSample>,
}

impl EmotionDataset {
    pub fn new(samples: Vec<EmotionSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn samples(&self) -> &[EmotionSample] { &self.samples }
}

impl Dataset<EmotionSample> for EmotionDataset {
    fn get(&self, index: usize) -> Option<EmotionSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::emotion::Emotion;

    #[test]
    fn test_get_and_len() {
        let ds = EmotionDataset::new(vec![
            EmotionSample::new(vec![0.0; 4], [2, 2], Emotion::Sad),
            EmotionSample::new(vec![1.0; 4], [2, 2], Emotion::Fear),
        ]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).unwrap().label, Emotion::Fear);
        assert!(ds.get(2).is_none());
    }
}
