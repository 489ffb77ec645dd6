//! Full scenario-file round trips: text in, trajectory out.

use std::io;
use traject_engine::StopReason;
use traject_output::{doc, DocWriter, OutputSet};
use traject_scenario::{build, ScenarioSpec};

const BALLISTIC: &str = "\
# 45-degree lofted shot, no drag
BALL
MODULES
  environment  def,exec
  atmosphere   def,exec
  forces       def,exec
  kinematics   def,init,exec
DATA
  dt = 0.01
  output_step = 0.1
  cd = 0
  area = 0.0314
  vbel1 = 35.36
  vbel3 = -35.36
  endtime = 10
  min_alt = 0
END
";

fn no_decks() -> impl FnMut(&str) -> io::Result<String> {
    |file: &str| {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unexpected deck '{file}'"),
        ))
    }
}

#[test]
fn ballistic_scenario_impacts_on_schedule() {
    let spec = ScenarioSpec::parse(BALLISTIC).unwrap();
    let mut sched = build(&spec, "Ballistic shot", &mut no_decks()).unwrap();
    let summary = sched.run(&mut OutputSet::null()).unwrap();

    assert_eq!(summary.reason, StopReason::Ground);
    assert!(
        (summary.sim_time - 7.21).abs() < 0.03,
        "impact at {}",
        summary.sim_time
    );

    let altitude = sched.store().by_name("altitude").unwrap();
    assert!(sched.store().read_real(altitude).unwrap() <= 0.0);
}

#[test]
fn parachute_scenario_fires_its_event() {
    let text = "\
BALL
MODULES
  environment  def,exec
  atmosphere   def,exec
  forces       def,exec
  kinematics   def,init,exec
DATA
  dt = 0.01
  cd = 0.1
  area = 1.0
  sbel3 = -300
  endtime = 60
  min_alt = 0
IF altitude < 100
  cd 1.0
ENDIF
END
";
    let spec = ScenarioSpec::parse(text).unwrap();
    let mut sched = build(&spec, "Parachute", &mut no_decks()).unwrap();
    let summary = sched.run(&mut OutputSet::null()).unwrap();
    assert_eq!(summary.reason, StopReason::Ground);

    let cd = sched.store().by_name("cd").unwrap();
    assert_eq!(sched.store().read_real(cd).unwrap(), 1.0);
}

#[test]
fn doc_listing_round_trips_the_loaded_slot_table() {
    let spec = ScenarioSpec::parse(BALLISTIC).unwrap();
    let sched = build(&spec, "Ballistic shot", &mut no_decks()).unwrap();

    let mut buf = Vec::new();
    DocWriter::write(&mut buf, sched.store(), "Ballistic shot").unwrap();
    let listing = String::from_utf8(buf).unwrap();
    let entries = doc::parse_listing(&listing);

    // Every defined slot appears, structurally identical.
    assert_eq!(entries.len(), sched.store().defined_count());
    for entry in &entries {
        let def = sched.store().def(entry.index).expect("listed slot exists");
        assert_eq!(entry.name, def.name);
        assert_eq!(entry.kind, def.kind);
        assert_eq!(entry.module, def.module);
        assert_eq!(entry.role, def.role);
        assert_eq!(entry.output, def.output);
    }
}

#[test]
fn deck_tables_are_reachable_from_the_scenario() {
    let text = "\
BALL
MODULES
  environment  def,exec
DATA
  endtime = 1
AERO_DECK cd_table.asc
END
";
    let deck_text = "TITLE drag deck\n1DIM cd_mach\nNX1 2\n0 2\n0.3 0.5\n".to_string();
    let spec = ScenarioSpec::parse(text).unwrap();
    let mut reader = move |file: &str| {
        assert_eq!(file, "cd_table.asc");
        Ok(deck_text.clone())
    };
    let sched = build(&spec, "deck", &mut reader).unwrap();
    assert_eq!(sched.deck().look_up1("cd_mach", 1.0).unwrap(), 0.4);
}
