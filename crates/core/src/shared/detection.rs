use super::region::Region;

/// A face located by a detector in one frame.
///
/// Keypoints are in frame pixel coordinates. BlazeFace emits six of them
/// (eyes, nose tip, mouth centre, ear tragions); other detectors may emit
/// none.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub region: Region,
    pub score: f64,
    pub keypoints: Vec<(i32, i32)>,
}

impl Detection {
    pub fn new(region: Region, score: f64) -> Self {
        Self {
            region,
            score,
            keypoints: Vec::new(),
        }
    }

    pub fn with_keypoints(mut self, keypoints: Vec<(i32, i32)>) -> Self {
        self.keypoints = keypoints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_keypoints() {
        let d = Detection::new(Region::new(1, 2, 3, 4), 0.9);
        assert!(d.keypoints.is_empty());
        assert_eq!(d.region, Region::new(1, 2, 3, 4));
    }

    #[test]
    fn test_with_keypoints_replaces_list() {
        let d = Detection::new(Region::new(0, 0, 10, 10), 0.7)
            .with_keypoints(vec![(1, 1), (2, 2)]);
        assert_eq!(d.keypoints, vec![(1, 1), (2, 2)]);
    }
}
