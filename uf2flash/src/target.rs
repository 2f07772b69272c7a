//! Board targets and their bootloader volume labels.
//!
//! Each supported board reboots into a UF2 bootloader that presents itself
//! as a USB mass-storage volume with a fixed label. The label is how the
//! bootloader volume is told apart from unrelated removable drives.

use std::fmt;

/// Supported board targets.
///
/// The set is closed: a target is validated at the CLI boundary and maps
/// to exactly one bootloader volume label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Adafruit PyPortal (SAMD51).
    Pyportal,
    /// Adafruit Feather M4 Express (SAMD51).
    FeatherM4,
    /// Adafruit Trinket M0 (SAMD21).
    TrinketM0,
}

impl Target {
    /// All supported targets.
    pub const ALL: &'static [Self] = &[Self::Pyportal, Self::FeatherM4, Self::TrinketM0];

    /// Get the label the target's bootloader volume mounts under.
    #[must_use]
    pub fn volume_label(&self) -> &'static str {
        match self {
            Self::Pyportal => "PORTALBOOT",
            Self::FeatherM4 => "FEATHERBOOT",
            Self::TrinketM0 => "TRINKETBOOT",
        }
    }

    /// Get the target's canonical name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pyportal => "pyportal",
            Self::FeatherM4 => "feather-m4",
            Self::TrinketM0 => "trinket-m0",
        }
    }

    /// Get the target from its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pyportal" => Some(Self::Pyportal),
            "feather-m4" => Some(Self::FeatherM4),
            "trinket-m0" => Some(Self::TrinketM0),
            _ => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_label_total_and_stable() {
        for target in Target::ALL {
            let first = target.volume_label();
            assert!(!first.is_empty());
            assert_eq!(first, target.volume_label());
        }
    }

    #[test]
    fn test_expected_labels() {
        assert_eq!(Target::Pyportal.volume_label(), "PORTALBOOT");
        assert_eq!(Target::FeatherM4.volume_label(), "FEATHERBOOT");
        assert_eq!(Target::TrinketM0.volume_label(), "TRINKETBOOT");
    }

    #[test]
    fn test_from_name_roundtrip() {
        for target in Target::ALL {
            assert_eq!(Target::from_name(target.name()), Some(*target));
        }
        assert_eq!(Target::from_name("ws63"), None);
    }
}
