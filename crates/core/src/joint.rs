//! Pose landmark names and body sides.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
    /// Any landmark name the source emits that the analyzer does not use.
    #[serde(other)]
    Other,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn shoulder(self) -> Joint {
        match self {
            Self::Left => Joint::LeftShoulder,
            Self::Right => Joint::RightShoulder,
        }
    }

    pub fn elbow(self) -> Joint {
        match self {
            Self::Left => Joint::LeftElbow,
            Self::Right => Joint::RightElbow,
        }
    }

    pub fn wrist(self) -> Joint {
        match self {
            Self::Left => Joint::LeftWrist,
            Self::Right => Joint::RightWrist,
        }
    }

    pub fn index(self) -> Joint {
        match self {
            Self::Left => Joint::LeftIndex,
            Self::Right => Joint::RightIndex,
        }
    }

    pub fn thumb(self) -> Joint {
        match self {
            Self::Left => Joint::LeftThumb,
            Self::Right => Joint::RightThumb,
        }
    }

    pub fn hip(self) -> Joint {
        match self {
            Self::Left => Joint::LeftHip,
            Self::Right => Joint::RightHip,
        }
    }

    pub fn knee(self) -> Joint {
        match self {
            Self::Left => Joint::LeftKnee,
            Self::Right => Joint::RightKnee,
        }
    }

    pub fn ankle(self) -> Joint {
        match self {
            Self::Left => Joint::LeftAnkle,
            Self::Right => Joint::RightAnkle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_side() {
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }

    #[test]
    fn test_side_joints() {
        assert_eq!(Side::Right.wrist(), Joint::RightWrist);
        assert_eq!(Side::Left.knee(), Joint::LeftKnee);
        assert_eq!(Side::Left.thumb(), Joint::LeftThumb);
    }

    #[test]
    fn test_joint_names_are_snake_case() {
        let json = serde_json::to_string(&Joint::RightFootIndex).expect("serialize joint");
        assert_eq!(json, "\"right_foot_index\"");
    }

    #[test]
    fn test_unknown_joint_maps_to_other() {
        let joint: Joint = serde_json::from_str("\"left_eye_inner\"").expect("deserialize joint");
        assert_eq!(joint, Joint::Other);
    }
}
