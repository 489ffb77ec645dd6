//! End-to-end ballistic scenarios driven through the scheduler.

use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, SlotValue, StoreError, VarStore};
use traject_engine::scheduler::{ENDTIME, MIN_ALT};
use traject_engine::{Assignment, Relation, Scheduler, SimConfig, StopReason};
use traject_module::{Module, ModuleContext, ModuleError, PhaseSet};
use traject_modules::slots::{ALTITUDE, AREA, CD, DVBE, SBEL, VBEL1, VBEL3};
use traject_modules::{AtmosphereConstant, GravityConstant, Kinematics, PointMassForces};
use traject_output::{OutputSet, TabWriter};
use traject_test_utils::SharedBuf;

const APEX_ALT: SlotIdx = SlotIdx(200);
const APEX_TIME: SlotIdx = SlotIdx(201);

/// Records the highest altitude seen and the time it was seen at.
struct ApexProbe;

impl Module for ApexProbe {
    fn name(&self) -> &str {
        "apex_probe"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            APEX_ALT,
            SlotDef::new(
                "apexalt",
                SlotKind::Real,
                "Highest altitude seen - m",
                self.name(),
                Role::State,
                OutputTags::none(),
            ),
        )?;
        store.define(
            APEX_TIME,
            SlotDef::new(
                "apextime",
                SlotKind::Real,
                "Time of highest altitude - s",
                self.name(),
                Role::State,
                OutputTags::none(),
            ),
        )
    }

    fn reads(&self) -> Vec<SlotIdx> {
        vec![ALTITUDE]
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let altitude = ctx.read_real(ALTITUDE)?;
        if altitude > ctx.read_real(APEX_ALT)? {
            ctx.write_real(APEX_ALT, altitude)?;
            ctx.write_real(APEX_TIME, ctx.sim_time())?;
        }
        Ok(())
    }
}

fn ballistic_scheduler(dt: f64, cd: f64, area: f64) -> Scheduler {
    let modules: Vec<(Box<dyn Module>, PhaseSet)> = vec![
        (Box::new(GravityConstant::default()), PhaseSet::def_exec()),
        (Box::new(AtmosphereConstant::default()), PhaseSet::def_exec()),
        (Box::new(PointMassForces::new()), PhaseSet::def_exec()),
        (Box::new(Kinematics::new()), PhaseSet::def_init_exec()),
        (Box::new(ApexProbe), PhaseSet::def_exec()),
    ];
    let config = SimConfig {
        title: "Ballistic".to_string(),
        vehicle: "BALL".to_string(),
        modules,
        store_capacity: 250,
        dt,
        output_step: 0.1,
    };
    let mut sched = Scheduler::new(config).unwrap();
    sched.set_value(CD, SlotValue::Real(cd)).unwrap();
    sched.set_value(AREA, SlotValue::Real(area)).unwrap();
    sched.set_value(VBEL1, SlotValue::Real(35.36)).unwrap();
    sched.set_value(VBEL3, SlotValue::Real(-35.36)).unwrap();
    sched.set_value(ENDTIME, SlotValue::Real(10.0)).unwrap();
    sched.set_value(MIN_ALT, SlotValue::Real(0.0)).unwrap();
    // Ground declared first, time second.
    sched.add_standard_terminators(Some(ALTITUDE), None);
    sched
}

#[test]
fn s1_pure_ballistic_apex_and_impact() {
    let mut sched = ballistic_scheduler(0.01, 0.0, 0.0314);
    let summary = sched.run(&mut OutputSet::null()).unwrap();

    assert_eq!(summary.reason, StopReason::Ground);
    assert!(
        (summary.sim_time - 7.21).abs() < 0.03,
        "impact at {}",
        summary.sim_time
    );

    let apex = sched.store().read_real(APEX_ALT).unwrap();
    let apex_time = sched.store().read_real(APEX_TIME).unwrap();
    assert!((apex - 63.73).abs() < 0.3, "apex {apex}");
    assert!((apex_time - 3.60).abs() < 0.05, "apex at {apex_time}");
}

#[test]
fn s2_drag_lowers_and_advances_the_apex() {
    let mut sched = ballistic_scheduler(0.01, 0.47, 0.0314);
    let summary = sched.run(&mut OutputSet::null()).unwrap();
    assert_eq!(summary.reason, StopReason::Ground);

    let apex = sched.store().read_real(APEX_ALT).unwrap();
    let apex_time = sched.store().read_real(APEX_TIME).unwrap();
    assert!(apex < 63.7, "drag apex {apex} not below vacuum apex");
    assert!(apex_time < 3.60, "drag apex time {apex_time} not earlier");

    // The fall asymptotes toward terminal velocity and cannot exceed it.
    let terminal: f64 = (2.0_f64 * 9.81 / (1.225 * 0.47 * 0.0314)).sqrt();
    let impact_speed = sched.store().read_real(DVBE).unwrap();
    assert!(
        impact_speed < terminal + 0.5,
        "impact speed {impact_speed} above terminal {terminal}"
    );
    assert!(impact_speed > 0.5 * terminal);
}

#[test]
fn s6_ground_predicate_declared_first_wins_the_race() {
    // Both predicates are live (endtime 10 s, impact ~7.21 s); the
    // ground predicate is declared first and must be the recorded
    // reason.
    let mut sched = ballistic_scheduler(0.01, 0.0, 0.0314);
    let summary = sched.run(&mut OutputSet::null()).unwrap();
    assert_eq!(summary.reason, StopReason::Ground);
    assert_ne!(summary.reason, StopReason::Time);
    assert!(summary.sim_time < 8.0);
    assert_eq!(sched.store().read_int(SlotIdx(6)).unwrap(), 2);
}

#[test]
fn s5_parachute_event_fires_once_and_slows_the_fall() {
    // Drop from 300 m with a small drag coefficient; below 100 m an
    // event swaps cd for a parachute-sized one.
    let modules: Vec<(Box<dyn Module>, PhaseSet)> = vec![
        (Box::new(GravityConstant::default()), PhaseSet::def_exec()),
        (Box::new(AtmosphereConstant::default()), PhaseSet::def_exec()),
        (Box::new(PointMassForces::new()), PhaseSet::def_exec()),
        (Box::new(Kinematics::new()), PhaseSet::def_init_exec()),
    ];
    let config = SimConfig {
        title: "Parachute".to_string(),
        vehicle: "BALL".to_string(),
        modules,
        store_capacity: 250,
        dt: 0.01,
        output_step: 0.1,
    };
    let mut sched = Scheduler::new(config).unwrap();
    sched.set_value(CD, SlotValue::Real(0.1)).unwrap();
    sched.set_value(AREA, SlotValue::Real(1.0)).unwrap();
    sched
        .set_value(traject_modules::slots::SBEL3, SlotValue::Real(-300.0))
        .unwrap();
    sched.set_value(ENDTIME, SlotValue::Real(60.0)).unwrap();
    sched.set_value(MIN_ALT, SlotValue::Real(0.0)).unwrap();
    sched.add_standard_terminators(Some(ALTITUDE), None);
    sched
        .add_event(
            ALTITUDE,
            Relation::Less,
            SlotValue::Real(100.0),
            [Assignment {
                slot: CD,
                value: SlotValue::Real(1.0),
            }],
        )
        .unwrap();

    let screen = SharedBuf::new();
    let mut outputs = OutputSet::null();
    outputs.screen = Some(TabWriter::new(Box::new(screen.clone())));

    let summary = sched.run(&mut outputs).unwrap();
    assert_eq!(summary.reason, StopReason::Ground);

    // The reassignment stuck.
    assert_eq!(sched.store().read_real(CD).unwrap(), 1.0);

    // Impact near the parachute terminal velocity, well below the
    // clean-configuration one.
    let impact_speed = sched.store().read_real(DVBE).unwrap();
    let chute_terminal: f64 = (2.0_f64 * 9.81 / (1.225 * 1.0 * 1.0)).sqrt();
    assert!(
        (impact_speed - chute_terminal).abs() < 1.0,
        "impact speed {impact_speed}, chute terminal {chute_terminal}"
    );

    // Exactly one trace line, at the first sub-100 m step.
    let trace = screen.text();
    let fires: Vec<&str> = trace
        .lines()
        .filter(|l| l.contains("Event at time"))
        .collect();
    assert_eq!(fires.len(), 1, "trace: {trace}");
    assert!(fires[0].contains("altitude < 100"));
}

#[test]
fn halving_the_step_does_not_degrade_the_trajectory() {
    // Gravity-only: the trapezoid is exact for constant acceleration, so
    // both step sizes land on the analytic apex to rounding level —
    // consistent with the integrator's second-order rate.
    for dt in [0.01, 0.005] {
        let mut sched = ballistic_scheduler(dt, 0.0, 0.0314);
        sched.run(&mut OutputSet::null()).unwrap();
        let apex = sched.store().read_real(APEX_ALT).unwrap();
        let analytic = 35.36_f64.powi(2) / (2.0 * 9.81);
        // Apex sampling is quantized by dt; the integration itself is
        // exact.
        assert!(
            (apex - analytic).abs() < 9.81 * dt,
            "dt {dt}: apex {apex} vs {analytic}"
        );
    }
}

#[test]
fn with_drag_the_error_shrinks_as_the_step_shrinks() {
    // The drag force is state-dependent, so the scheme is no longer
    // exact; successively halved steps must converge on the same state.
    // Compare downrange position at a fixed stop time so termination
    // quantization does not pollute the measurement.
    fn downrange_at_two_seconds(dt: f64) -> f64 {
        let mut sched = ballistic_scheduler(dt, 0.47, 0.0314);
        sched.set_value(MIN_ALT, SlotValue::Real(-1.0e9)).unwrap();
        sched.set_value(ENDTIME, SlotValue::Real(2.0)).unwrap();
        sched.run(&mut OutputSet::null()).unwrap();
        sched.store().read_vec3(SBEL).unwrap().x()
    }
    let coarse = downrange_at_two_seconds(0.02);
    let medium = downrange_at_two_seconds(0.01);
    let fine = downrange_at_two_seconds(0.005);
    let e1 = (coarse - fine).abs();
    let e2 = (medium - fine).abs();
    assert!(e1 > 0.0, "coarse run suspiciously exact");
    assert!(
        e2 < e1 * 0.75,
        "no convergence: |coarse-fine|={e1}, |medium-fine|={e2}"
    );
}

#[test]
fn consumer_without_its_producer_is_rejected_at_startup() {
    // Kinematics reads the specific-force slot; without a forces module
    // the pipeline must fail validation, not the first step.
    let modules: Vec<(Box<dyn Module>, PhaseSet)> = vec![
        (Box::new(GravityConstant::default()), PhaseSet::def_exec()),
        (Box::new(Kinematics::new()), PhaseSet::def_init_exec()),
    ];
    let config = SimConfig {
        title: "broken".to_string(),
        vehicle: "BALL".to_string(),
        modules,
        store_capacity: 250,
        dt: 0.01,
        output_step: 0.1,
    };
    match Scheduler::new(config) {
        Err(traject_engine::ConfigError::Pipeline(
            traject_module::PipelineError::UndefinedRead { module, .. },
        )) => assert_eq!(module, "kinematics"),
        other => panic!("expected UndefinedRead, got {other:?}"),
    }
}

#[test]
fn time_terminator_alone_stops_at_endtime() {
    let mut sched = ballistic_scheduler(0.01, 0.0, 0.0314);
    // Raise the floor so the ball "falls through" and only time stops
    // the run.
    sched.set_value(MIN_ALT, SlotValue::Real(-1.0e6)).unwrap();
    let summary = sched.run(&mut OutputSet::null()).unwrap();
    assert_eq!(summary.reason, StopReason::Time);
    assert!((summary.sim_time - 10.0).abs() < 1e-9);
}
