//! Integration test: numerical divergence detection.
//!
//! A step that produces a NaN or infinity must leave the field, step
//! index and history exactly at the last good step, and every later
//! request must repeat the same error.

use tarn_core::{Dimension, StepError, StepId};
use tarn_engine::{IntegrationMethod, IntegratorState, SimulationDriver};
use tarn_init::InitialCondition;
use tarn_stencil::BoundaryCondition;
use tarn_test_utils::fixtures::{PoisonSource, RecordingObserver};
use tarn_test_utils::{box_config, integration, line_config, periodic_config};

fn poisoned(method: IntegrationMethod) -> SimulationDriver {
    let mut cfg = line_config(
        6,
        BoundaryCondition::Floating,
        integration(method, 0.1, 50),
    );
    cfg.initial = InitialCondition::Constant(1.0);
    cfg.source = Some(Box::new(PoisonSource { from_time: 0.27 }));
    SimulationDriver::new(cfg).unwrap()
}

#[test]
fn euler_diverges_when_source_turns_nan() {
    let mut driver = poisoned(IntegrationMethod::Euler);
    // Euler samples the source at t = 0.0, 0.1, 0.2, then 0.3.
    for _ in 0..3 {
        driver.step().unwrap();
    }
    let good = driver.grid().clone();

    let err = driver.step().unwrap_err();
    match &err {
        StepError::NumericalDivergence { step, cell, value } => {
            assert_eq!(*step, StepId(4));
            assert_eq!(cell.as_slice(), &[0]);
            assert!(value.is_nan());
        }
        other => panic!("expected NumericalDivergence, got {other:?}"),
    }

    assert_eq!(driver.integrator_state(), IntegratorState::Diverged);
    assert_eq!(driver.current_step(), StepId(3));
    assert_eq!(driver.grid(), &good);
    assert_eq!(driver.history().unwrap().len(), 4);
}

#[test]
fn rk4_stage_times_reach_the_poison_earlier() {
    // The last stage of step 3 samples t = 0.2 + 0.1.
    let mut driver = poisoned(IntegrationMethod::RungeKutta);
    driver.step().unwrap();
    driver.step().unwrap();
    let err = driver.step().unwrap_err();
    assert!(matches!(
        err,
        StepError::NumericalDivergence {
            step: StepId(3),
            ..
        }
    ));
    assert_eq!(driver.current_step(), StepId(2));
}

#[test]
fn divergence_is_sticky() {
    let mut driver = poisoned(IntegrationMethod::Euler);
    let err = driver.run().unwrap_err();
    let frozen = driver.grid().clone();
    for _ in 0..3 {
        assert_eq!(driver.step().unwrap_err(), err);
    }
    assert_eq!(driver.run().unwrap_err(), err);
    assert_eq!(driver.run_steps(5).unwrap_err(), err);
    assert_eq!(driver.grid(), &frozen);
}

#[test]
fn observers_never_see_a_diverged_field() {
    let mut driver = poisoned(IntegrationMethod::Euler);
    let (obs, recording) = RecordingObserver::new();
    driver.add_observer("all", 1, obs).unwrap();
    assert!(driver.run().is_err());
    assert_eq!(recording.steps(), vec![0, 1, 2, 3]);
    assert_eq!(recording.finished(), 0);
    assert!(recording
        .snapshots()
        .iter()
        .all(|s| s.values.iter().all(|v| v.is_finite())));
}

#[test]
fn unstable_euler_blows_up() {
    // dt far above the explicit stability limit h²/(2·ndim·D).
    let mut cfg = box_config(
        Dimension::D2,
        8,
        BoundaryCondition::FixedValue(0.0),
        integration(IntegrationMethod::Euler, 10.0, 10_000),
    );
    cfg.initial = InitialCondition::RandomUniform { min: -1.0, max: 1.0 };
    cfg.seed = 7;
    let mut driver = SimulationDriver::new(cfg).unwrap();
    match driver.run() {
        Err(StepError::NumericalDivergence { step, .. }) => {
            assert!(step.0 < 1_000, "diverged late at {step}");
            assert_eq!(driver.current_step().0, step.0 - 1);
            assert!(driver.grid().values().iter().all(|v| v.is_finite()));
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

#[test]
fn divergence_reports_full_coordinate() {
    let mut cfg = periodic_config(
        Dimension::D3,
        2,
        1.0,
        integration(IntegrationMethod::Euler, 0.1, 5),
    );
    cfg.source = Some(Box::new(|u: f64, _t: f64| if u > 0.5 { f64::INFINITY } else { 0.0 }));
    cfg.initial = InitialCondition::SingleSeed {
        index: smallvec::smallvec![1, 0, 1],
        value: 1.0,
        background: 0.0,
    };
    let mut driver = SimulationDriver::new(cfg).unwrap();
    match driver.step() {
        Err(StepError::NumericalDivergence { cell, value, .. }) => {
            assert_eq!(cell.as_slice(), &[1, 0, 1]);
            assert_eq!(value, f64::INFINITY);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}
