// ============================================================
// Layer 3 — Facial Landmark Feature Groups
// ============================================================
// A face is described by 68 (x, y) landmarks, grouped into
// eight anatomical regions. The dataset stores each region in
// its own column; the landmark network encodes each region
// independently before combining them.
//
// Two orders matter and they are NOT the same:
//
//   LOADER_ORDER       — the order in which the loader concatenates
//                        the dataset columns into the 68×2 matrix
//                        (right_brow before left_brow)
//
//   ARCHITECTURE_ORDER — the order in which the network slices
//                        that matrix back into regions
//                        (left_brow before right_brow)
//
// Both brows have 5 points, so the slices line up by size, but
// rows 17..22 carry right-brow data while the network names that
// slice "left_brow". This asymmetry is kept exactly as-is.

use std::ops::Range;

/// Total number of landmarks per face.
pub const NUM_LANDMARKS: usize = 68;

/// Coordinates per landmark (x, y).
pub const COORDS_PER_LANDMARK: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    Jaw,
    LeftBrow,
    RightBrow,
    Nose,
    RightEye,
    LeftEye,
    Mouth,
    Lips,
}

impl FeatureGroup {
    /// Column order used when building the landmark matrix from a row.
    pub const LOADER_ORDER: [FeatureGroup; 8] = [
        FeatureGroup::Jaw,
        FeatureGroup::RightBrow,
        FeatureGroup::LeftBrow,
        FeatureGroup::Nose,
        FeatureGroup::RightEye,
        FeatureGroup::LeftEye,
        FeatureGroup::Mouth,
        FeatureGroup::Lips,
    ];

    /// Slice order used by the landmark network.
    pub const ARCHITECTURE_ORDER: [FeatureGroup; 8] = [
        FeatureGroup::Jaw,
        FeatureGroup::LeftBrow,
        FeatureGroup::RightBrow,
        FeatureGroup::Nose,
        FeatureGroup::RightEye,
        FeatureGroup::LeftEye,
        FeatureGroup::Mouth,
        FeatureGroup::Lips,
    ];

    /// Dataset column name for this group.
    pub fn column(self) -> &'static str {
        match self {
            FeatureGroup::Jaw       => "jaw",
            FeatureGroup::LeftBrow  => "left_brow",
            FeatureGroup::RightBrow => "right_brow",
            FeatureGroup::Nose      => "nose",
            FeatureGroup::RightEye  => "right_eye",
            FeatureGroup::LeftEye   => "left_eye",
            FeatureGroup::Mouth     => "mouth",
            FeatureGroup::Lips      => "lips",
        }
    }

    /// Number of landmarks in this group.
    pub fn point_count(self) -> usize {
        match self {
            FeatureGroup::Jaw       => 17,
            FeatureGroup::LeftBrow  => 5,
            FeatureGroup::RightBrow => 5,
            FeatureGroup::Nose      => 9,
            FeatureGroup::RightEye  => 6,
            FeatureGroup::LeftEye   => 6,
            FeatureGroup::Mouth     => 13,
            FeatureGroup::Lips      => 7,
        }
    }

    /// Row range the network slices for this group:
    /// jaw 0..17, left_brow 17..22, right_brow 22..27, nose 27..36,
    /// right_eye 36..42, left_eye 42..48, mouth 48..61, lips 61..68.
    pub fn architecture_range(self) -> Range<usize> {
        let mut start = 0;
        for group in Self::ARCHITECTURE_ORDER {
            let end = start + group.point_count();
            if group == self {
                return start..end;
            }
            start = end;
        }
        unreachable!("every group appears in ARCHITECTURE_ORDER")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_ranges() {
        let ranges: Vec<Range<usize>> = FeatureGroup::ARCHITECTURE_ORDER
            .iter()
            .map(|g| g.architecture_range())
            .collect();
        assert_eq!(
            ranges,
            vec![0..17, 17..22, 22..27, 27..36, 36..42, 42..48, 48..61, 61..68]
        );
    }

    #[test]
    fn test_groups_cover_all_landmarks() {
        let total: usize = FeatureGroup::LOADER_ORDER
            .iter()
            .map(|g| g.point_count())
            .sum();
        assert_eq!(total, NUM_LANDMARKS);
    }

    #[test]
    fn test_brow_order_differs_between_loader_and_network() {
        assert_eq!(FeatureGroup::LOADER_ORDER[1], FeatureGroup::RightBrow);
        assert_eq!(FeatureGroup::ARCHITECTURE_ORDER[1], FeatureGroup::LeftBrow);
    }
}
