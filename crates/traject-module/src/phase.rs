//! The `def`/`init`/`exec` phase set.

use std::fmt;

/// Which phases of the module contract a module participates in.
///
/// Declared per module by the scenario (`MODULES` section); the scheduler
/// only invokes the entry points listed here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseSet(u8);

impl PhaseSet {
    const DEF: u8 = 1 << 0;
    const INIT: u8 = 1 << 1;
    const EXEC: u8 = 1 << 2;

    /// The empty set.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Only `def`.
    pub const fn def() -> Self {
        Self(Self::DEF)
    }

    /// `def` and `exec` — the common case for stateless modules.
    pub const fn def_exec() -> Self {
        Self(Self::DEF | Self::EXEC)
    }

    /// All three phases.
    pub const fn def_init_exec() -> Self {
        Self(Self::DEF | Self::INIT | Self::EXEC)
    }

    /// Union of two sets.
    pub const fn and(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Participates in `def`?
    pub const fn has_def(self) -> bool {
        self.0 & Self::DEF != 0
    }

    /// Participates in `init`?
    pub const fn has_init(self) -> bool {
        self.0 & Self::INIT != 0
    }

    /// Participates in `exec`?
    pub const fn has_exec(self) -> bool {
        self.0 & Self::EXEC != 0
    }

    /// Whether every phase of `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Parse a comma-separated phase list (`"def,init,exec"`).
    ///
    /// Returns `None` on an unknown phase name or an empty list.
    pub fn parse(text: &str) -> Option<Self> {
        let mut set = Self::none();
        for part in text.split(',') {
            set = match part.trim() {
                "def" => set.and(Self::def()),
                "init" => set.and(Self(Self::INIT)),
                "exec" => set.and(Self(Self::EXEC)),
                _ => return None,
            };
        }
        if set == Self::none() {
            None
        } else {
            Some(set)
        }
    }
}

impl fmt::Display for PhaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (set, label) in [
            (self.has_def(), "def"),
            (self.has_init(), "init"),
            (self.has_exec(), "exec"),
        ] {
            if set {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "{label}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_list() {
        let set = PhaseSet::parse("def,init,exec").unwrap();
        assert!(set.has_def() && set.has_init() && set.has_exec());
        assert_eq!(format!("{set}"), "def,init,exec");
    }

    #[test]
    fn parse_tolerates_spaces() {
        let set = PhaseSet::parse("def, exec").unwrap();
        assert!(set.has_def());
        assert!(!set.has_init());
        assert!(set.has_exec());
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert_eq!(PhaseSet::parse("def,run"), None);
        assert_eq!(PhaseSet::parse(""), None);
    }

    #[test]
    fn contains_is_subset_check() {
        assert!(PhaseSet::def_init_exec().contains(PhaseSet::def_exec()));
        assert!(!PhaseSet::def_exec().contains(PhaseSet::def_init_exec()));
    }
}
