//! The fixed-step scheduler.

use crate::clock::SimClock;
use crate::config::{ConfigError, SimConfig};
use crate::event::{Assignment, Event, EventEngine, EventError, Relation};
use crate::metrics::StepMetrics;
use crate::termination::{
    StopReason, TerminationEngine, TerminationError, TerminatorSpec, Threshold,
};
use std::error::Error;
use std::fmt;
use std::io;
use traject_core::{
    OutputTags, Phase, Role, SlotDef, SlotIdx, SlotKind, SlotValue, StepId, StoreError, VarStore,
};
use traject_module::{validate_pipeline, Module, ModuleContext, ModuleError, PhaseSet};
use traject_output::OutputSet;
use traject_table::{Deck, TableError};

/// Owner tag of the scheduler's own slots.
pub const EXECUTIVE: &str = "executive";

/// Slot 0: simulation time, rewritten by the scheduler every step.
pub const TIME: SlotIdx = SlotIdx(0);
/// Slot 5: stop flag mirror (1 once a stop predicate fired).
pub const STOP: SlotIdx = SlotIdx(5);
/// Slot 6: termination reason code mirror.
pub const LCONV: SlotIdx = SlotIdx(6);
/// Slot 7: maximum simulation time (scenario `data`).
pub const ENDTIME: SlotIdx = SlotIdx(7);
/// Slot 8: minimum altitude for the ground predicate (scenario `data`).
pub const MIN_ALT: SlotIdx = SlotIdx(8);
/// Slot 9: minimum target range for the proximity predicate (scenario `data`).
pub const MIN_RANGE: SlotIdx = SlotIdx(9);

// ── RunError ───────────────────────────────────────────────────────

/// Errors from a running simulation.
///
/// Whatever the failure, the scheduler writes a final data row and
/// flushes its sinks before returning — the simulation is deterministic,
/// so there is nothing to retry, only state to preserve for diagnosis.
#[derive(Debug)]
pub enum RunError {
    /// A module's `init` or `exec` failed.
    Module {
        /// The failing module.
        module: String,
        /// Simulation time at the failure.
        time: f64,
        /// The underlying error.
        source: ModuleError,
    },
    /// A scheduler-level store access failed.
    Store(StoreError),
    /// Terminator binding failed.
    Termination(TerminationError),
    /// An output sink failed.
    Io(io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module {
                module,
                time,
                source,
            } => write!(f, "module '{module}' failed at t={time:.6}: {source}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Termination(e) => write!(f, "termination: {e}"),
            Self::Io(e) => write!(f, "output: {e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Module { source, .. } => Some(source),
            Self::Store(e) => Some(e),
            Self::Termination(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<StoreError> for RunError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<TerminationError> for RunError {
    fn from(e: TerminationError) -> Self {
        Self::Termination(e)
    }
}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ── RunSummary ─────────────────────────────────────────────────────

/// Result of a completed run.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    /// Why the run stopped.
    pub reason: StopReason,
    /// Simulation time at the stop.
    pub sim_time: f64,
    /// Steps executed.
    pub steps: StepId,
    /// Output rows emitted, including the initial and final rows.
    pub rows: u64,
}

// ── Scheduler ──────────────────────────────────────────────────────

/// Single-threaded cooperative driver of one vehicle's module pipeline.
///
/// Construction consumes a [`SimConfig`], runs every module's `def`, and
/// validates the pipeline; the load surface
/// ([`set_value`](Scheduler::set_value), [`add_event`](Scheduler::add_event),
/// [`add_terminator`](Scheduler::add_terminator),
/// [`load_deck_text`](Scheduler::load_deck_text)) is then open until
/// [`run`](Scheduler::run), which executes init, the step loop, and
/// teardown.
pub struct Scheduler {
    title: String,
    vehicle: String,
    modules: Vec<(Box<dyn Module>, PhaseSet)>,
    store: VarStore,
    deck: Deck,
    events: EventEngine,
    terminator_specs: Vec<TerminatorSpec>,
    clock: SimClock,
    steps_per_output: u64,
    since_output: u64,
    rows: u64,
    last_metrics: StepMetrics,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("title", &self.title)
            .field("vehicle", &self.vehicle)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Build a scheduler: validate the config, define the executive
    /// slots, run the def phase, validate the pipeline, and open the
    /// load phase.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let steps_per_output = config.steps_per_output();
        let SimConfig {
            title,
            vehicle,
            modules,
            store_capacity,
            dt,
            ..
        } = config;

        let mut store = VarStore::new(store_capacity);
        define_executive_slots(&mut store)?;
        for (module, phases) in &modules {
            if phases.has_def() {
                module.def(&mut store)?;
            }
        }
        validate_pipeline(&modules, &store, &[EXECUTIVE])?;
        store.set_phase(Phase::Load);

        Ok(Self {
            title,
            vehicle,
            modules,
            store,
            deck: Deck::new(),
            events: EventEngine::new(),
            terminator_specs: Vec::new(),
            clock: SimClock::new(dt),
            steps_per_output,
            since_output: 0,
            rows: 0,
            last_metrics: StepMetrics::default(),
        })
    }

    /// The variable store (doc pass, scenario binder, tests).
    pub fn store(&self) -> &VarStore {
        &self.store
    }

    /// The loaded table deck.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The run title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The vehicle name.
    pub fn vehicle(&self) -> &str {
        &self.vehicle
    }

    /// Metrics of the most recent step.
    pub fn last_metrics(&self) -> StepMetrics {
        self.last_metrics
    }

    // ── Load surface ───────────────────────────────────────────────

    /// Privileged kind-checked write, used by the scenario loader to
    /// populate `data`/`init`/`state` slots before the run.
    pub fn set_value(&mut self, index: SlotIdx, value: SlotValue) -> Result<(), StoreError> {
        self.store.store_write(index, value)
    }

    /// Parse deck text and merge its tables into the run's deck.
    pub fn load_deck_text(&mut self, text: &str) -> Result<(), TableError> {
        self.deck.parse_text(text)
    }

    /// Bind and register an event.
    pub fn add_event(
        &mut self,
        watch: SlotIdx,
        relation: Relation,
        threshold: SlotValue,
        assignments: impl IntoIterator<Item = Assignment>,
    ) -> Result<(), EventError> {
        let event = Event::bind(&self.store, watch, relation, threshold, assignments)?;
        self.events.push(event);
        Ok(())
    }

    /// Register a stop predicate. Declaration order is evaluation order;
    /// the first satisfied predicate wins.
    pub fn add_terminator(&mut self, spec: TerminatorSpec) {
        self.terminator_specs.push(spec);
    }

    /// Register the three standard predicates for whichever of the
    /// executive data slots were set: ground impact, proximity, time
    /// limit — in that order.
    pub fn add_standard_terminators(&mut self, altitude: Option<SlotIdx>, range: Option<SlotIdx>) {
        if let Some(alt) = altitude {
            self.add_terminator(TerminatorSpec {
                watch: alt,
                relation: Relation::LessEq,
                threshold: Threshold::FromSlot(MIN_ALT),
                reason: StopReason::Ground,
            });
        }
        if let Some(range) = range {
            self.add_terminator(TerminatorSpec {
                watch: range,
                relation: Relation::LessEq,
                threshold: Threshold::FromSlot(MIN_RANGE),
                reason: StopReason::Proximity,
            });
        }
        self.add_terminator(TerminatorSpec {
            watch: TIME,
            relation: Relation::GreaterEq,
            threshold: Threshold::FromSlot(ENDTIME),
            reason: StopReason::Time,
        });
    }

    // ── Run ────────────────────────────────────────────────────────

    /// Execute the simulation: init phase, banners and initial row, the
    /// step loop, teardown. The final data row and sink flush happen on
    /// the failure path too.
    pub fn run(&mut self, outputs: &mut OutputSet) -> Result<RunSummary, RunError> {
        // Phase init, in declared order, at t = 0.
        self.store.set_phase(Phase::Init);
        for (module, phases) in &self.modules {
            if phases.has_init() {
                let mut ctx = ModuleContext::new(
                    &mut self.store,
                    &self.deck,
                    module.name(),
                    0.0,
                    self.clock.step(),
                    StepId(0),
                );
                module.init(&mut ctx).map_err(|e| RunError::Module {
                    module: module.name().to_string(),
                    time: 0.0,
                    source: e,
                })?;
            }
        }

        // Terminators bind after init, when data slots are final.
        let mut termination = TerminationEngine::bind(&self.terminator_specs, &self.store)?;
        self.store.set_phase(Phase::Exec);

        // Banners and the initial data row.
        self.banners(outputs)?;
        self.emit_rows(outputs)?;

        let outcome = loop {
            match self.step(outputs, &mut termination) {
                Ok(Some(reason)) => break Ok(reason),
                Ok(None) => {}
                Err(e) => break Err(e),
            }
        };

        // Teardown: final data row and flush, on both paths.
        let teardown: Result<(), RunError> = (|| {
            self.emit_rows(outputs)?;
            self.flush(outputs)?;
            Ok(())
        })();

        match outcome {
            Ok(reason) => {
                teardown?;
                Ok(RunSummary {
                    reason,
                    sim_time: self.clock.time(),
                    steps: self.clock.step_id(),
                    rows: self.rows,
                })
            }
            // The run error takes precedence over any teardown error.
            Err(e) => Err(e),
        }
    }

    /// One full step: modules, clock, events, termination, output
    /// cadence. Returns the stop reason once termination fires.
    fn step(
        &mut self,
        outputs: &mut OutputSet,
        termination: &mut TerminationEngine,
    ) -> Result<Option<StopReason>, RunError> {
        // a. Every exec module, in declared order.
        for (module, phases) in &self.modules {
            if !phases.has_exec() {
                continue;
            }
            let mut ctx = ModuleContext::new(
                &mut self.store,
                &self.deck,
                module.name(),
                self.clock.time(),
                self.clock.step(),
                self.clock.step_id(),
            );
            module.exec(&mut ctx).map_err(|e| RunError::Module {
                module: module.name().to_string(),
                time: self.clock.time(),
                source: e,
            })?;
        }

        // b. Advance the clock and republish the time slot.
        self.clock.advance();
        self.store
            .store_write(TIME, SlotValue::Real(self.clock.time()))?;

        // c. Events. Fired assignments take effect now and are observed
        //    by every module from the next step on.
        let fired = self.events.scan(&mut self.store)?;
        if !fired.is_empty() {
            self.clock.mark_event();
            if let Some(screen) = outputs.screen.as_mut() {
                for &i in fired.iter() {
                    let description = self
                        .events
                        .event(i)
                        .map(Event::description)
                        .unwrap_or_default();
                    screen.event_line(self.clock.time(), description)?;
                }
            }
        }

        // d. Termination.
        let stop = termination.scan(&self.store)?;
        if let Some(reason) = stop {
            self.store.store_write(STOP, SlotValue::Int(1))?;
            self.store
                .store_write(LCONV, SlotValue::Int(reason.code()))?;
        }

        // e. Output cadence.
        let mut row_emitted = false;
        if stop.is_none() {
            self.since_output += 1;
            if self.since_output == self.steps_per_output {
                self.since_output = 0;
                self.emit_rows(outputs)?;
                row_emitted = true;
            }
        }

        self.last_metrics = StepMetrics {
            step_id: self.clock.step_id(),
            sim_time: self.clock.time(),
            events_fired: fired.len() as u32,
            row_emitted,
            stop,
        };
        Ok(stop)
    }

    fn banners(&mut self, outputs: &mut OutputSet) -> Result<(), RunError> {
        if let Some(w) = outputs.screen.as_mut() {
            w.banner(&self.store, &self.title, &self.vehicle)?;
        }
        if let Some(w) = outputs.tab.as_mut() {
            w.banner(&self.store, &self.title, &self.vehicle)?;
        }
        if let Some(w) = outputs.plot.as_mut() {
            w.banner(&self.store, &self.title, &self.vehicle)?;
        }
        if let Some(w) = outputs.com.as_mut() {
            w.banner(&self.store)?;
        }
        Ok(())
    }

    fn emit_rows(&mut self, outputs: &mut OutputSet) -> Result<(), RunError> {
        if let Some(w) = outputs.screen.as_mut() {
            w.row(&self.store)?;
        }
        if let Some(w) = outputs.tab.as_mut() {
            w.row(&self.store)?;
        }
        if let Some(w) = outputs.plot.as_mut() {
            w.row(&self.store)?;
        }
        if let Some(w) = outputs.com.as_mut() {
            w.packet(&self.store)?;
        }
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self, outputs: &mut OutputSet) -> Result<(), RunError> {
        if let Some(w) = outputs.screen.as_mut() {
            w.flush()?;
        }
        if let Some(w) = outputs.tab.as_mut() {
            w.flush()?;
        }
        if let Some(w) = outputs.plot.as_mut() {
            w.flush()?;
        }
        if let Some(w) = outputs.com.as_mut() {
            w.flush()?;
        }
        Ok(())
    }
}

/// Define the scheduler's own slots: the clock, the stop mirrors, and
/// the standard termination data parameters.
fn define_executive_slots(store: &mut VarStore) -> Result<(), StoreError> {
    store.define(
        TIME,
        SlotDef::new(
            "time",
            SlotKind::Real,
            "Simulation time - s",
            EXECUTIVE,
            Role::Exec,
            OutputTags::screen().and(OutputTags::plot()),
        ),
    )?;
    store.define(
        STOP,
        SlotDef::new(
            "stop",
            SlotKind::Int,
            "Stop flag (1=stop) - ND",
            EXECUTIVE,
            Role::Exec,
            OutputTags::none(),
        ),
    )?;
    store.define(
        LCONV,
        SlotDef::new(
            "lconv",
            SlotKind::Int,
            "Termination reason code - ND",
            EXECUTIVE,
            Role::Exec,
            OutputTags::none(),
        ),
    )?;
    store.define(
        ENDTIME,
        SlotDef::new(
            "endtime",
            SlotKind::Real,
            "Maximum simulation time - s",
            EXECUTIVE,
            Role::Data,
            OutputTags::none(),
        ),
    )?;
    store.define(
        MIN_ALT,
        SlotDef::new(
            "min_alt",
            SlotKind::Real,
            "Minimum altitude - m",
            EXECUTIVE,
            Role::Data,
            OutputTags::none(),
        ),
    )?;
    store.define(
        MIN_RANGE,
        SlotDef::new(
            "min_range",
            SlotKind::Real,
            "Minimum target range - m",
            EXECUTIVE,
            Role::Data,
            OutputTags::none(),
        ),
    )?;
    Ok(())
}
