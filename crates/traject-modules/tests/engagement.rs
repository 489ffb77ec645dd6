//! End-to-end engagement scenarios: seeker, intercept, proximity stop.

use traject_core::SlotValue;
use traject_engine::scheduler::{ENDTIME, MIN_RANGE};
use traject_engine::{
    Relation, Scheduler, SimConfig, StopReason, TerminatorSpec, Threshold,
};
use traject_module::{Module, PhaseSet};
use traject_modules::slots::{
    CD, DETECT_RANGE, DTA, INTERCEPT_FLAG, MISS, STEL1, STEL2, TINTERCEPT, VBEL1,
};
use traject_modules::{
    AtmosphereConstant, GravityConstant, InterceptDetect, Kinematics, PointMassForces,
    SeekerPerfect, TargetConstVelocity,
};
use traject_output::OutputSet;

/// Zero-g straight-line flyby: vehicle at the origin doing 100 m/s east,
/// stationary target offset 10 m north of the flight path at x = 50 m.
fn flyby_scheduler() -> Scheduler {
    let modules: Vec<(Box<dyn Module>, PhaseSet)> = vec![
        (Box::new(GravityConstant::new(0.0)), PhaseSet::def_exec()),
        (Box::new(AtmosphereConstant::default()), PhaseSet::def_exec()),
        (Box::new(PointMassForces::new()), PhaseSet::def_exec()),
        (Box::new(Kinematics::new()), PhaseSet::def_init_exec()),
        (Box::new(TargetConstVelocity::new()), PhaseSet::def_init_exec()),
        (Box::new(SeekerPerfect::new()), PhaseSet::def_exec()),
        (Box::new(InterceptDetect::new()), PhaseSet::def_exec()),
    ];
    let config = SimConfig {
        title: "Flyby".to_string(),
        vehicle: "MISSILE".to_string(),
        modules,
        store_capacity: 250,
        dt: 0.005,
        output_step: 0.1,
    };
    let mut sched = Scheduler::new(config).unwrap();
    sched.set_value(CD, SlotValue::Real(0.0)).unwrap();
    sched.set_value(VBEL1, SlotValue::Real(100.0)).unwrap();
    sched.set_value(STEL1, SlotValue::Real(50.0)).unwrap();
    sched.set_value(STEL2, SlotValue::Real(10.0)).unwrap();
    sched.set_value(DETECT_RANGE, SlotValue::Real(100.0)).unwrap();
    sched.set_value(ENDTIME, SlotValue::Real(2.0)).unwrap();
    sched
}

#[test]
fn intercept_flag_stops_the_run_at_closest_approach() {
    let mut sched = flyby_scheduler();
    sched.add_terminator(TerminatorSpec {
        watch: INTERCEPT_FLAG,
        relation: Relation::Equal,
        threshold: Threshold::Literal(SlotValue::Int(1)),
        reason: StopReason::Intercept,
    });
    sched.add_standard_terminators(None, None);

    let summary = sched.run(&mut OutputSet::null()).unwrap();
    assert_eq!(summary.reason, StopReason::Intercept);
    // Closest approach of the straight flyby is at t = 0.5 s.
    assert!(
        (summary.sim_time - 0.5).abs() < 0.02,
        "stopped at {}",
        summary.sim_time
    );

    // Miss distance and its time frozen at the lateral offset.
    let miss = sched.store().read_real(MISS).unwrap();
    assert!((miss - 10.0).abs() < 0.2, "miss {miss}");
    let tintercept = sched.store().read_real(TINTERCEPT).unwrap();
    assert!((tintercept - 0.5).abs() < 0.02, "tintercept {tintercept}");
    assert_eq!(sched.store().read_int(INTERCEPT_FLAG).unwrap(), 1);
}

#[test]
fn proximity_predicate_stops_before_closest_approach() {
    let mut sched = flyby_scheduler();
    sched.set_value(MIN_RANGE, SlotValue::Real(20.0)).unwrap();
    sched.add_standard_terminators(None, Some(DTA));

    let summary = sched.run(&mut OutputSet::null()).unwrap();
    assert_eq!(summary.reason, StopReason::Proximity);
    // Range reaches 20 m when (50 - 100 t)² + 10² = 20²  →  t ≈ 0.327.
    assert!(
        (summary.sim_time - 0.327).abs() < 0.02,
        "stopped at {}",
        summary.sim_time
    );
    assert!(sched.store().read_real(DTA).unwrap() <= 20.0);
}

#[test]
fn without_a_stop_predicate_hit_the_time_limit() {
    let mut sched = flyby_scheduler();
    sched.add_standard_terminators(None, None);
    let summary = sched.run(&mut OutputSet::null()).unwrap();
    assert_eq!(summary.reason, StopReason::Time);
    // Flag raised on the way through, even though it terminated nothing.
    assert_eq!(sched.store().read_int(INTERCEPT_FLAG).unwrap(), 1);
}
