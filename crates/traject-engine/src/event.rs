//! The event engine: threshold crossings and atomic slot reassignment.

use smallvec::SmallVec;
use std::error::Error;
use std::fmt;
use traject_core::{SlotIdx, SlotKind, SlotValue, StoreError, VarStore};

/// Comparison relation used by events and stop predicates.
///
/// The scenario event grammar exposes `<`, `=`, `>`; the inclusive
/// variants exist for termination predicates (`time ≥ endtime`,
/// `altitude ≤ min_alt`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    /// Strictly less than.
    Less,
    /// Less than or equal.
    LessEq,
    /// Equal (integer slots only).
    Equal,
    /// Strictly greater than.
    Greater,
    /// Greater than or equal.
    GreaterEq,
}

impl Relation {
    /// Parse a scenario event operator (`<`, `=`, `>`).
    pub fn parse_event_op(text: &str) -> Option<Self> {
        match text {
            "<" => Some(Self::Less),
            "=" => Some(Self::Equal),
            ">" => Some(Self::Greater),
            _ => None,
        }
    }

    /// Evaluate `lhs <relation> rhs`. Kinds must match (the binder
    /// guarantees it); mismatched kinds compare false.
    pub fn holds(self, lhs: &SlotValue, rhs: &SlotValue) -> bool {
        match (lhs, rhs) {
            (SlotValue::Real(a), SlotValue::Real(b)) => self.holds_f64(*a, *b),
            (SlotValue::Int(a), SlotValue::Int(b)) => match self {
                Self::Less => a < b,
                Self::LessEq => a <= b,
                Self::Equal => a == b,
                Self::Greater => a > b,
                Self::GreaterEq => a >= b,
            },
            _ => false,
        }
    }

    fn holds_f64(self, a: f64, b: f64) -> bool {
        match self {
            Self::Less => a < b,
            Self::LessEq => a <= b,
            Self::Equal => a == b,
            Self::Greater => a > b,
            Self::GreaterEq => a >= b,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Equal => "=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        };
        write!(f, "{s}")
    }
}

/// One slot reassignment applied when an event fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assignment {
    /// Target slot.
    pub slot: SlotIdx,
    /// New value (kind matches the slot; checked at bind).
    pub value: SlotValue,
}

/// Errors from event binding — always at scenario load, never at run time.
#[derive(Clone, Debug, PartialEq)]
pub enum EventError {
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
    /// Equality comparison bound to a real-kinded slot.
    ///
    /// Floating-point equality is brittle; the scenario grammar allows
    /// `=` on integer slots only.
    EqualityOnReal {
        /// The watched slot.
        slot: SlotIdx,
    },
    /// Threshold kind differs from the watched slot's kind.
    ThresholdKindMismatch {
        /// The watched slot.
        slot: SlotIdx,
        /// The slot's kind.
        watch_kind: SlotKind,
        /// The threshold's kind.
        threshold_kind: SlotKind,
    },
    /// A reassignment targets an undefined slot.
    AssignmentUndefined {
        /// The missing slot.
        slot: SlotIdx,
    },
    /// A reassignment's value kind differs from its target slot's kind.
    AssignmentKindMismatch {
        /// The target slot.
        slot: SlotIdx,
        /// The slot's kind.
        slot_kind: SlotKind,
        /// The value's kind.
        value_kind: SlotKind,
    },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedWatch { slot } => write!(f, "event watches undefined slot {slot}"),
            Self::UnwatchableKind { slot, kind } => {
                write!(f, "event watches slot {slot} of unwatchable kind {kind}")
            }
            Self::EqualityOnReal { slot } => {
                write!(f, "equality event on real-kinded slot {slot}")
            }
            Self::ThresholdKindMismatch {
                slot,
                watch_kind,
                threshold_kind,
            } => write!(
                f,
                "event threshold kind {threshold_kind} does not match slot {slot} kind {watch_kind}"
            ),
            Self::AssignmentUndefined { slot } => {
                write!(f, "event assigns undefined slot {slot}")
            }
            Self::AssignmentKindMismatch {
                slot,
                slot_kind,
                value_kind,
            } => write!(
                f,
                "event assigns {value_kind} value to slot {slot} of kind {slot_kind}"
            ),
        }
    }
}

impl Error for EventError {}

/// Lifecycle of an event: it fires at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EventState {
    Armed,
    Retired,
}

/// A bound event: watched slot, relation, threshold, and the
/// reassignments applied when it fires.
#[derive(Clone, Debug)]
pub struct Event {
    watch: SlotIdx,
    relation: Relation,
    threshold: SlotValue,
    assignments: SmallVec<[Assignment; 4]>,
    state: EventState,
    description: String,
}

impl Event {
    /// Bind an event against the store, checking every kind up front so
    /// firing can never fail structurally.
    pub fn bind(
        store: &VarStore,
        watch: SlotIdx,
        relation: Relation,
        threshold: SlotValue,
        assignments: impl IntoIterator<Item = Assignment>,
    ) -> Result<Self, EventError> {
        let watch_def = store
            .def(watch)
            .ok_or(EventError::UndefinedWatch { slot: watch })?;
        let watch_kind = watch_def.kind;
        if !matches!(watch_kind, SlotKind::Real | SlotKind::Int) {
            return Err(EventError::UnwatchableKind {
                slot: watch,
                kind: watch_kind,
            });
        }
        if relation == Relation::Equal && watch_kind == SlotKind::Real {
            return Err(EventError::EqualityOnReal { slot: watch });
        }
        if threshold.kind() != watch_kind {
            return Err(EventError::ThresholdKindMismatch {
                slot: watch,
                watch_kind,
                threshold_kind: threshold.kind(),
            });
        }
        let assignments: SmallVec<[Assignment; 4]> = assignments.into_iter().collect();
        for a in &assignments {
            let def = store
                .def(a.slot)
                .ok_or(EventError::AssignmentUndefined { slot: a.slot })?;
            if a.value.kind() != def.kind {
                return Err(EventError::AssignmentKindMismatch {
                    slot: a.slot,
                    slot_kind: def.kind,
                    value_kind: a.value.kind(),
                });
            }
        }
        let threshold_text = match threshold {
            SlotValue::Real(v) => format!("{v}"),
            SlotValue::Int(v) => format!("{v}"),
            _ => String::new(),
        };
        let description = format!("{} {relation} {threshold_text}", watch_def.name);
        Ok(Self {
            watch,
            relation,
            threshold,
            assignments,
            state: EventState::Armed,
            description,
        })
    }

    /// Human-readable condition, for the trace line.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the event is still armed.
    pub fn is_armed(&self) -> bool {
        self.state == EventState::Armed
    }
}

/// All declared events of a vehicle.
#[derive(Debug, Default)]
pub struct EventEngine {
    events: Vec<Event>,
}

impl EventEngine {
    /// An engine with no events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bound event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of declared events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are declared.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event at `index` (trace formatting).
    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Scan all armed events against the store; fire those whose
    /// condition holds, applying their reassignments in order, and retire
    /// them. Returns the indices of the events that fired this step.
    ///
    /// Reassignments go through the privileged store path: events may
    /// retarget `data` parameters (that is their purpose — staging,
    /// parachute deploys, mode switches).
    pub fn scan(
        &mut self,
        store: &mut VarStore,
    ) -> Result<SmallVec<[usize; 2]>, StoreError> {
        let mut fired = SmallVec::new();
        for (i, event) in self.events.iter_mut().enumerate() {
            if event.state != EventState::Armed {
                continue;
            }
            let current = store.value(event.watch)?;
            if event.relation.holds(&current, &event.threshold) {
                for a in &event.assignments {
                    store.store_write(a.slot, a.value)?;
                }
                event.state = EventState::Retired;
                fired.push(i);
            }
        }
        Ok(fired)
    }
}
