//! The binder: resolve a parsed scenario against the module library and
//! hand back a loaded scheduler.

use crate::error::ScenarioError;
use crate::parse::ScenarioSpec;
use std::io;
use traject_core::{SlotKind, SlotValue};
use traject_engine::scheduler::{ENDTIME, MIN_ALT, MIN_RANGE, TIME};
use traject_engine::{
    Assignment, Relation, Scheduler, SimConfig, StopReason, TerminatorSpec, Threshold,
};
use traject_module::{Module, PhaseSet};
use traject_modules::build_module;

/// Default integration step when the scenario omits `dt`.
const DEFAULT_DT: f64 = 0.01;
/// Default output cadence when the scenario omits `output_step`.
const DEFAULT_OUTPUT_STEP: f64 = 0.1;

/// Build a loaded scheduler from a parsed scenario.
///
/// `title` becomes the banner line; `read_deck` maps a deck file name
/// (as written in the scenario) to its text — the CLI passes a
/// filesystem read, tests pass a lookup into literals.
///
/// Binding order: construct modules → scheduler (def + validation) →
/// apply `DATA` by name → load decks → bind events → register the
/// standard terminators for whichever stop parameters the scenario set.
pub fn build(
    spec: &ScenarioSpec,
    title: &str,
    read_deck: &mut dyn FnMut(&str) -> io::Result<String>,
) -> Result<Scheduler, ScenarioError> {
    // Modules, in declared order.
    let module_names: Vec<String> = spec.modules.iter().map(|(_, n, _)| n.clone()).collect();
    let mut modules: Vec<(Box<dyn Module>, PhaseSet)> = Vec::with_capacity(spec.modules.len());
    for (line, name, phases) in &spec.modules {
        let module = build_module(name, &module_names).ok_or_else(|| {
            ScenarioError::UnknownModule {
                line: *line,
                name: name.clone(),
            }
        })?;
        modules.push((module, *phases));
    }

    let config = SimConfig {
        title: title.to_string(),
        vehicle: spec.vehicle.clone(),
        modules,
        store_capacity: 250,
        dt: spec.dt.unwrap_or(DEFAULT_DT),
        output_step: spec.output_step.unwrap_or(DEFAULT_OUTPUT_STEP),
    };
    let mut sched = Scheduler::new(config)?;

    // DATA assignments, coerced to each slot's kind.
    for (line, name, value) in &spec.data {
        let idx = sched
            .store()
            .by_name(name)
            .ok_or_else(|| ScenarioError::UnknownSlot {
                line: *line,
                name: name.clone(),
            })?;
        let coerced = coerce(sched.store().kind(idx), *value);
        sched.set_value(idx, coerced)?;
    }

    // Table decks.
    for file in &spec.decks {
        let text = read_deck(file).map_err(|source| ScenarioError::DeckIo {
            file: file.clone(),
            source,
        })?;
        sched.load_deck_text(&text)?;
    }

    // Events.
    for event in &spec.events {
        let watch = sched
            .store()
            .by_name(&event.watch)
            .ok_or_else(|| ScenarioError::UnknownSlot {
                line: event.line,
                name: event.watch.clone(),
            })?;
        let relation =
            Relation::parse_event_op(&event.op).ok_or_else(|| ScenarioError::Parse {
                line: event.line,
                message: format!("bad event operator '{}'", event.op),
            })?;
        let threshold = coerce(sched.store().kind(watch), event.threshold);
        let mut assignments = Vec::with_capacity(event.assignments.len());
        for (line, name, value) in &event.assignments {
            let slot = sched
                .store()
                .by_name(name)
                .ok_or_else(|| ScenarioError::UnknownSlot {
                    line: *line,
                    name: name.clone(),
                })?;
            assignments.push(Assignment {
                slot,
                value: coerce(sched.store().kind(slot), *value),
            });
        }
        sched
            .add_event(watch, relation, threshold, assignments)
            .map_err(|source| ScenarioError::Event {
                line: event.line,
                source,
            })?;
    }

    // Standard terminators, for whichever stop parameters the scenario
    // configured: ground, proximity, intercept, then the time limit.
    if spec.assigns("min_alt") {
        if let Some(altitude) = sched.store().by_name("altitude") {
            sched.add_terminator(TerminatorSpec {
                watch: altitude,
                relation: Relation::LessEq,
                threshold: Threshold::FromSlot(MIN_ALT),
                reason: StopReason::Ground,
            });
        }
    }
    if spec.assigns("min_range") {
        if let Some(range) = sched.store().by_name("dta") {
            sched.add_terminator(TerminatorSpec {
                watch: range,
                relation: Relation::LessEq,
                threshold: Threshold::FromSlot(MIN_RANGE),
                reason: StopReason::Proximity,
            });
        }
    }
    if let Some(flag) = sched.store().by_name("intercept_flag") {
        sched.add_terminator(TerminatorSpec {
            watch: flag,
            relation: Relation::Equal,
            threshold: Threshold::Literal(SlotValue::Int(1)),
            reason: StopReason::Intercept,
        });
    }
    if spec.assigns("endtime") {
        sched.add_terminator(TerminatorSpec {
            watch: TIME,
            relation: Relation::GreaterEq,
            threshold: Threshold::FromSlot(ENDTIME),
            reason: StopReason::Time,
        });
    }

    Ok(sched)
}

fn coerce(kind: SlotKind, value: f64) -> SlotValue {
    match kind {
        SlotKind::Int => SlotValue::Int(value as i64),
        _ => SlotValue::Real(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traject_engine::EventError;

    fn no_decks() -> impl FnMut(&str) -> io::Result<String> {
        |file: &str| {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no deck '{file}' in this test"),
            ))
        }
    }

    #[test]
    fn unknown_module_reported_with_line() {
        let spec = ScenarioSpec::parse("BALL\nMODULES\n warp_drive def,exec\nEND\n").unwrap();
        match build(&spec, "t", &mut no_decks()) {
            Err(ScenarioError::UnknownModule { line, name }) => {
                assert_eq!(line, 3);
                assert_eq!(name, "warp_drive");
            }
            other => panic!("expected UnknownModule, got {other:?}"),
        }
    }

    #[test]
    fn unknown_data_slot_reported_with_line() {
        let text = "BALL\nMODULES\n environment def,exec\nDATA\n warp = 9\nEND\n";
        let spec = ScenarioSpec::parse(text).unwrap();
        match build(&spec, "t", &mut no_decks()) {
            Err(ScenarioError::UnknownSlot { line, name }) => {
                assert_eq!(line, 5);
                assert_eq!(name, "warp");
            }
            other => panic!("expected UnknownSlot, got {other:?}"),
        }
    }

    #[test]
    fn equality_event_on_real_slot_rejected() {
        let text = "\
BALL
MODULES
 environment def,exec
 atmosphere def,exec
 forces def,exec
 kinematics def,init,exec
IF altitude = 100
 cd 1.0
ENDIF
END
";
        let spec = ScenarioSpec::parse(text).unwrap();
        match build(&spec, "t", &mut no_decks()) {
            Err(ScenarioError::Event {
                source: EventError::EqualityOnReal { .. },
                ..
            }) => {}
            other => panic!("expected EqualityOnReal, got {other:?}"),
        }
    }

    #[test]
    fn data_coerces_to_int_slots() {
        let text = "\
BALL
MODULES
 propulsion def,init,exec
DATA
 mprop = 0
 spi = 290
END
";
        let spec = ScenarioSpec::parse(text).unwrap();
        let sched = build(&spec, "t", &mut no_decks()).unwrap();
        let mprop = sched.store().by_name("mprop").unwrap();
        assert_eq!(sched.store().read_int(mprop).unwrap(), 0);
        let spi = sched.store().by_name("spi").unwrap();
        assert_eq!(sched.store().read_real(spi).unwrap(), 290.0);
    }

    #[test]
    fn missing_deck_file_surfaces_as_deck_io() {
        let text = "BALL\nMODULES\n environment def,exec\nAERO_DECK ghost.asc\nEND\n";
        let spec = ScenarioSpec::parse(text).unwrap();
        match build(&spec, "t", &mut no_decks()) {
            Err(ScenarioError::DeckIo { file, .. }) => assert_eq!(file, "ghost.asc"),
            other => panic!("expected DeckIo, got {other:?}"),
        }
    }
}
