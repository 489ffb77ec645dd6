//! Slot metadata: kinds, values, roles, and output routing tags.

use std::fmt;
use traject_math::{Mat3, Vec3};

/// Classification of a slot's data kind.
///
/// A slot's kind is fixed at definition time and never changes afterwards;
/// every typed read and write is checked against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    /// Never defined by any module.
    Empty,
    /// A signed integer (flags, mode selectors, counters).
    Int,
    /// A double-precision scalar.
    Real,
    /// A 3-component vector.
    Vec3,
    /// A 3×3 matrix.
    Mat3,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::Int => "int",
            Self::Real => "real",
            Self::Vec3 => "vec3",
            Self::Mat3 => "mat3",
        };
        write!(f, "{s}")
    }
}

/// The current value of a slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SlotValue {
    /// No value; the slot was never defined.
    Empty,
    /// Integer value.
    Int(i64),
    /// Scalar value.
    Real(f64),
    /// Vector value.
    Vec3(Vec3),
    /// Matrix value.
    Mat3(Mat3),
}

impl SlotValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Empty => SlotKind::Empty,
            Self::Int(_) => SlotKind::Int,
            Self::Real(_) => SlotKind::Real,
            Self::Vec3(_) => SlotKind::Vec3,
            Self::Mat3(_) => SlotKind::Mat3,
        }
    }

    /// The zero value of a kind (initial content of a freshly defined slot).
    pub fn zero_of(kind: SlotKind) -> Self {
        match kind {
            SlotKind::Empty => Self::Empty,
            SlotKind::Int => Self::Int(0),
            SlotKind::Real => Self::Real(0.0),
            SlotKind::Vec3 => Self::Vec3(Vec3::zero()),
            SlotKind::Mat3 => Self::Mat3(Mat3::zero()),
        }
    }
}

/// What part a slot plays in the module contract.
///
/// The role governs who may write the slot and when: `data` and `init`
/// slots are populated by the scenario loader (and module `init`) and are
/// immutable afterwards; the remaining roles are written by the owning
/// module during `exec`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Scenario-supplied parameter; immutable after the init phase.
    Data,
    /// Initial-condition input; immutable after the init phase.
    Init,
    /// Integration state carried across steps by the owning module.
    State,
    /// Previous-step value saved by the owning module (integrator priming,
    /// crossing detectors).
    Save,
    /// Output consumed by other modules.
    Out,
    /// Diagnostic output, not consumed by other modules.
    Diag,
    /// Executive signal (stop flags, clocks).
    Exec,
}

impl Role {
    /// Whether the owning module may write this slot during `exec`.
    pub fn writable_in_exec(self) -> bool {
        matches!(
            self,
            Self::State | Self::Save | Self::Out | Self::Diag | Self::Exec
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Data => "data",
            Self::Init => "init",
            Self::State => "state",
            Self::Save => "save",
            Self::Out => "out",
            Self::Diag => "diag",
            Self::Exec => "exec",
        };
        write!(f, "{s}")
    }
}

/// Output sinks a slot is routed to, as a small bitset.
///
/// A slot may be tagged for any combination of the screen/tab table, the
/// plot file, and the communications bus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputTags(u8);

impl OutputTags {
    const SCREEN: u8 = 1 << 0;
    const PLOT: u8 = 1 << 1;
    const COM: u8 = 1 << 2;

    /// No output routing.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Screen and tabular file.
    pub const fn screen() -> Self {
        Self(Self::SCREEN)
    }

    /// Plot file.
    pub const fn plot() -> Self {
        Self(Self::PLOT)
    }

    /// Communications bus.
    pub const fn com() -> Self {
        Self(Self::COM)
    }

    /// Union of two tag sets.
    pub const fn and(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Routed to the screen/tab table?
    pub const fn has_screen(self) -> bool {
        self.0 & Self::SCREEN != 0
    }

    /// Routed to the plot file?
    pub const fn has_plot(self) -> bool {
        self.0 & Self::PLOT != 0
    }

    /// Routed to the communications bus?
    pub const fn has_com(self) -> bool {
        self.0 & Self::COM != 0
    }
}

impl fmt::Display for OutputTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (set, label) in [
            (self.has_screen(), "scrn"),
            (self.has_plot(), "plot"),
            (self.has_com(), "com"),
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

/// Full definition of a slot: everything but its current value.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotDef {
    /// Short unique name, used by the scenario loader and the doc pass.
    pub name: String,
    /// Data kind; fixed for the slot's lifetime.
    pub kind: SlotKind,
    /// Human-readable definition, including units.
    pub definition: String,
    /// Name of the owning module.
    pub module: String,
    /// Contract role.
    pub role: Role,
    /// Output routing.
    pub output: OutputTags,
}

impl SlotDef {
    /// Convenience constructor.
    pub fn new(
        name: impl Into<String>,
        kind: SlotKind,
        definition: impl Into<String>,
        module: impl Into<String>,
        role: Role,
        output: OutputTags,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            definition: definition.into(),
            module: module.into(),
            role,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kind_matches_variant() {
        assert_eq!(SlotValue::Int(3).kind(), SlotKind::Int);
        assert_eq!(SlotValue::Real(1.5).kind(), SlotKind::Real);
        assert_eq!(SlotValue::Vec3(Vec3::zero()).kind(), SlotKind::Vec3);
        assert_eq!(SlotValue::zero_of(SlotKind::Mat3).kind(), SlotKind::Mat3);
    }

    #[test]
    fn output_tags_union_and_queries() {
        let tags = OutputTags::screen().and(OutputTags::plot());
        assert!(tags.has_screen());
        assert!(tags.has_plot());
        assert!(!tags.has_com());
        assert_eq!(format!("{tags}"), "scrn,plot");
    }

    #[test]
    fn exec_writable_roles() {
        assert!(Role::State.writable_in_exec());
        assert!(Role::Diag.writable_in_exec());
        assert!(!Role::Data.writable_in_exec());
        assert!(!Role::Init.writable_in_exec());
    }
}
