use std::fmt;
use std::str::FromStr;

use crate::shared::constants::{FULL_RANGE_MODEL_NAME, SHORT_RANGE_MODEL_NAME};

/// BlazeFace model flavour: trades range and accuracy for speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelVariant {
    /// Faces within roughly two metres of the camera. Lightweight.
    #[default]
    ShortRange,
    /// Faces up to roughly five metres away. Larger input, slower.
    FullRange,
}

impl ModelVariant {
    pub fn model_name(self) -> &'static str {
        match self {
            ModelVariant::ShortRange => SHORT_RANGE_MODEL_NAME,
            ModelVariant::FullRange => FULL_RANGE_MODEL_NAME,
        }
    }

    /// Square model input resolution in pixels.
    pub fn input_size(self) -> u32 {
        match self {
            ModelVariant::ShortRange => 128,
            ModelVariant::FullRange => 192,
        }
    }

    /// Feature map layout as `(stride, anchors_per_cell)` pairs.
    pub fn anchor_layout(self) -> &'static [(usize, usize)] {
        match self {
            ModelVariant::ShortRange => &[(8, 2), (16, 6)],
            ModelVariant::FullRange => &[(4, 1)],
        }
    }

    pub fn num_anchors(self) -> usize {
        let size = self.input_size() as usize;
        self.anchor_layout()
            .iter()
            .map(|&(stride, per_cell)| (size / stride) * (size / stride) * per_cell)
            .sum()
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::ShortRange => write!(f, "short-range"),
            ModelVariant::FullRange => write!(f, "full-range"),
        }
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short-range" | "short" | "0" => Ok(ModelVariant::ShortRange),
            "full-range" | "full" | "1" => Ok(ModelVariant::FullRange),
            other => Err(format!(
                "Model variant must be 'short-range' or 'full-range', got '{other}'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_lightweight() {
        assert_eq!(ModelVariant::default(), ModelVariant::ShortRange);
    }

    #[test]
    fn test_short_range_anchor_count() {
        // 16×16 × 2 + 8×8 × 6
        assert_eq!(ModelVariant::ShortRange.num_anchors(), 896);
    }

    #[test]
    fn test_full_range_anchor_count() {
        // 48×48 × 1
        assert_eq!(ModelVariant::FullRange.num_anchors(), 2304);
    }

    #[rstest]
    #[case("short-range", ModelVariant::ShortRange)]
    #[case("0", ModelVariant::ShortRange)]
    #[case("full-range", ModelVariant::FullRange)]
    #[case("full", ModelVariant::FullRange)]
    fn test_parse(#[case] input: &str, #[case] expected: ModelVariant) {
        assert_eq!(input.parse::<ModelVariant>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "medium".parse::<ModelVariant>().unwrap_err();
        assert!(err.contains("medium"));
    }

    #[test]
    fn test_display_round_trips() {
        for v in [ModelVariant::ShortRange, ModelVariant::FullRange] {
            assert_eq!(v.to_string().parse::<ModelVariant>().unwrap(), v);
        }
    }
}
