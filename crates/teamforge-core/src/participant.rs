//! Participants and skill levels.

use std::fmt;

use crate::error::{PartitionError, Result};

/// Skill rating of a participant, 1 (strongest) to 4 (weakest).
///
/// # Examples
///
/// ```
/// use teamforge_core::SkillLevel;
///
/// let level = SkillLevel::try_from(2).unwrap();
/// assert_eq!(level.value(), 2);
/// assert!(SkillLevel::try_from(5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub struct SkillLevel(u8);

impl SkillLevel {
    /// Number of distinct levels.
    pub const COUNT: usize = 4;

    pub const STRONGEST: SkillLevel = SkillLevel(1);
    pub const WEAKEST: SkillLevel = SkillLevel(4);

    /// All levels, strongest first.
    pub const ALL: [SkillLevel; Self::COUNT] =
        [SkillLevel(1), SkillLevel(2), SkillLevel(3), SkillLevel(4)];

    /// Creates a level, returning `None` outside `1..=4`.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= Self::COUNT as u8 {
            Some(SkillLevel(value))
        } else {
            None
        }
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Zero-based position of this level in [`SkillLevel::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Levels 1 and 2.
    #[inline]
    pub const fn is_strong(self) -> bool {
        self.0 <= 2
    }
}

impl TryFrom<i64> for SkillLevel {
    type Error = PartitionError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(SkillLevel::new)
            .ok_or_else(|| {
                PartitionError::malformed("", format!("skill level {value} outside 1..=4"))
            })
    }
}

impl From<SkillLevel> for i64 {
    fn from(level: SkillLevel) -> i64 {
        i64::from(level.0)
    }
}

impl fmt::Debug for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SkillLevel({})", self.0)
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rated roster entry.
///
/// The membership string is carried through untouched for the presentation
/// layer; the engine never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    name: String,
    level: SkillLevel,
    membership: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, level: SkillLevel, membership: impl Into<String>) -> Self {
        Participant {
            name: name.into(),
            level,
            membership: membership.into(),
        }
    }

    /// Creates a participant from a raw integer level.
    ///
    /// # Errors
    ///
    /// Returns [`PartitionError::MalformedParticipant`] if `level` is not in `1..=4`.
    pub fn try_new(
        name: impl Into<String>,
        level: i64,
        membership: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let level = SkillLevel::try_from(level).map_err(|err| match err {
            PartitionError::MalformedParticipant { reason, .. } => {
                PartitionError::malformed(name.clone(), reason)
            }
            other => other,
        })?;
        Ok(Participant::new(name, level, membership))
    }

    /// Adapts a roster-lookup record where either field may be absent.
    ///
    /// A missing level is rejected instead of defaulted. A missing membership
    /// becomes the empty string.
    ///
    /// ```
    /// use teamforge_core::{Participant, PartitionError};
    ///
    /// let p = Participant::from_record("ana", Some(3), Some("Monthly".into())).unwrap();
    /// assert_eq!(p.level().value(), 3);
    ///
    /// let err = Participant::from_record("bob", None, None).unwrap_err();
    /// assert!(matches!(err, PartitionError::MalformedParticipant { .. }));
    /// ```
    pub fn from_record(
        name: impl Into<String>,
        level: Option<i64>,
        membership: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        match level {
            Some(level) => Participant::try_new(name, level, membership.unwrap_or_default()),
            None => Err(PartitionError::malformed(name, "missing skill level")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> SkillLevel {
        self.level
    }

    pub fn membership(&self) -> &str {
        &self.membership
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {})", self.name, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bounds() {
        assert!(SkillLevel::new(0).is_none());
        assert_eq!(SkillLevel::new(1), Some(SkillLevel::STRONGEST));
        assert_eq!(SkillLevel::new(4), Some(SkillLevel::WEAKEST));
        assert!(SkillLevel::new(5).is_none());
    }

    #[test]
    fn test_level_try_from() {
        assert_eq!(SkillLevel::try_from(3).unwrap().value(), 3);
        assert!(SkillLevel::try_from(-1).is_err());
        assert!(SkillLevel::try_from(300).is_err());
    }

    #[test]
    fn test_level_index_matches_all() {
        for (i, level) in SkillLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn test_try_new_reports_name() {
        let err = Participant::try_new("carla", 7, "Guest").unwrap_err();
        assert_eq!(
            err,
            PartitionError::MalformedParticipant {
                name: "carla".to_string(),
                reason: "skill level 7 outside 1..=4".to_string(),
            }
        );
    }

    #[test]
    fn test_from_record_missing_membership() {
        let p = Participant::from_record("dan", Some(1), None).unwrap();
        assert_eq!(p.membership(), "");
        assert!(p.level().is_strong());
    }

    #[test]
    fn test_display() {
        let p = Participant::new("eva", SkillLevel::WEAKEST, "Monthly");
        assert_eq!(format!("{p}"), "eva (level 4)");
    }
}
