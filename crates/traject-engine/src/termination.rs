//! The termination engine: composite stop-condition evaluation.

use crate::event::Relation;
use std::error::Error;
use std::fmt;
use traject_core::{SlotIdx, SlotKind, SlotValue, StoreError, VarStore};

/// Why a run stopped. The numeric code is what `lconv` mirrors into the
/// store and what the CLI maps to its exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// `time >= endtime`.
    Time,
    /// Ground impact (`altitude <= min_alt`).
    Ground,
    /// Proximity (`range_to_target <= min_range`).
    Proximity,
    /// Sensor-detected intercept (`intercept_flag = 1`).
    Intercept,
    /// User-declared predicate with its own code (>= 5).
    Custom(i64),
}

impl StopReason {
    /// The reason code recorded in the `lconv` slot.
    pub fn code(self) -> i64 {
        match self {
            Self::Time => 1,
            Self::Ground => 2,
            Self::Proximity => 3,
            Self::Intercept => 4,
            Self::Custom(code) => code,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => write!(f, "time limit"),
            Self::Ground => write!(f, "ground impact"),
            Self::Proximity => write!(f, "proximity"),
            Self::Intercept => write!(f, "intercept"),
            Self::Custom(code) => write!(f, "custom ({code})"),
        }
    }
}

/// Where a predicate's threshold comes from.
///
/// The standard predicates compare against scenario `data` slots
/// (`endtime`, `min_alt`, `min_range`), resolved once when the engine
/// binds — after init, when data slots are final.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold {
    /// A literal value.
    Literal(SlotValue),
    /// The value of a slot at bind time.
    FromSlot(SlotIdx),
}

/// An unbound stop predicate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminatorSpec {
    /// The watched slot.
    pub watch: SlotIdx,
    /// The comparison.
    pub relation: Relation,
    /// The threshold source.
    pub threshold: Threshold,
    /// Reason recorded if this predicate stops the run.
    pub reason: StopReason,
}

/// Errors from terminator binding.
#[derive(Clone, Debug, PartialEq)]
pub enum TerminationError {
    /// The watched slot is not defined.
    UndefinedWatch {
        /// The missing slot.
        slot: SlotIdx,
    },
    /// The watched slot is not a scalar kind.
    UnwatchableKind {
        /// The watched slot.
        slot: SlotIdx,
        /// Its kind.
        kind: SlotKind,
    },
    /// Threshold kind differs from the watched slot's kind.
    KindMismatch {
        /// The watched slot.
        slot: SlotIdx,
        /// The slot's kind.
        watch_kind: SlotKind,
        /// The threshold's kind.
        threshold_kind: SlotKind,
    },
    /// Resolving a `FromSlot` threshold failed.
    Store(StoreError),
}

impl fmt::Display for TerminationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedWatch { slot } => {
                write!(f, "stop predicate watches undefined slot {slot}")
            }
            Self::UnwatchableKind { slot, kind } => {
                write!(f, "stop predicate watches slot {slot} of unwatchable kind {kind}")
            }
            Self::KindMismatch {
                slot,
                watch_kind,
                threshold_kind,
            } => write!(
                f,
                "stop predicate threshold kind {threshold_kind} does not match slot {slot} kind {watch_kind}"
            ),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl Error for TerminationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for TerminationError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

#[derive(Clone, Copy, Debug)]
struct StopPredicate {
    watch: SlotIdx,
    relation: Relation,
    threshold: SlotValue,
    reason: StopReason,
}

/// The bound stop-predicate list.
///
/// Scanned once per step, after all modules and events have run. The
/// first satisfied predicate (declaration order) wins; its reason is
/// recorded and held for the rest of the run.
#[derive(Debug)]
pub struct TerminationEngine {
    predicates: Vec<StopPredicate>,
    verdict: Option<StopReason>,
}

impl TerminationEngine {
    /// Bind predicate specs against the store, resolving `FromSlot`
    /// thresholds to their current values.
    pub fn bind(specs: &[TerminatorSpec], store: &VarStore) -> Result<Self, TerminationError> {
        let mut predicates = Vec::with_capacity(specs.len());
        for spec in specs {
            let watch_def = store
                .def(spec.watch)
                .ok_or(TerminationError::UndefinedWatch { slot: spec.watch })?;
            if !matches!(watch_def.kind, SlotKind::Real | SlotKind::Int) {
                return Err(TerminationError::UnwatchableKind {
                    slot: spec.watch,
                    kind: watch_def.kind,
                });
            }
            let threshold = match spec.threshold {
                Threshold::Literal(v) => v,
                Threshold::FromSlot(idx) => store.value(idx)?,
            };
            if threshold.kind() != watch_def.kind {
                return Err(TerminationError::KindMismatch {
                    slot: spec.watch,
                    watch_kind: watch_def.kind,
                    threshold_kind: threshold.kind(),
                });
            }
            predicates.push(StopPredicate {
                watch: spec.watch,
                relation: spec.relation,
                threshold,
                reason: spec.reason,
            });
        }
        Ok(Self {
            predicates,
            verdict: None,
        })
    }

    /// Evaluate the predicates in declared order; record and return the
    /// first satisfied one. Idempotent once a verdict is reached.
    pub fn scan(&mut self, store: &VarStore) -> Result<Option<StopReason>, StoreError> {
        if self.verdict.is_some() {
            return Ok(self.verdict);
        }
        for p in &self.predicates {
            let current = store.value(p.watch)?;
            if p.relation.holds(&current, &p.threshold) {
                self.verdict = Some(p.reason);
                break;
            }
        }
        Ok(self.verdict)
    }

    /// The recorded verdict, if any.
    pub fn verdict(&self) -> Option<StopReason> {
        self.verdict
    }
}
