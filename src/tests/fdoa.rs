use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    prelude::*,
    tests::{fdoa_emitter, fdoa_stations, init_logger},
};

#[test]
fn observation_window_is_usable() {
    init_logger();

    let stations = fdoa_stations();
    let emitter = fdoa_emitter();

    let window = observation_window(&stations, &emitter).unwrap();

    assert!(window.min_s > 0.0);
    assert!(window.min_s.is_finite());
    assert!(window.max_s > window.min_s);

    assert!(window.admits(60.0));
    assert!(!window.admits(0.0));
    assert!(!window.admits(window.max_s * 3.0 + 1.0));

    // bounds are inclusive
    assert!(window.admits(window.min_s));
    assert!(window.admits(3.0 * window.max_s));
}

#[test]
fn simulation_time_outside_window_rejected() {
    let stations = fdoa_stations();
    let emitter = fdoa_emitter();
    let cfg = Config::simulation();

    let result = solve_fdoa(&stations, &emitter, 1.0e-9, &cfg, &mut NoErrors);

    assert!(matches!(
        result,
        Err(crate::Error::TimeWindowOutOfBounds(..))
    ));
}

#[test]
fn static_geometry_has_no_window() {
    // nothing moves: no Doppler, no range-exit time, no usable window
    let stations = fdoa_stations()
        .iter()
        .map(|s| s.with_velocity(Velocity::ZERO))
        .collect::<Vec<_>>();
    let emitter = fdoa_emitter();

    let result = observation_window(&stations, &emitter);
    assert!(matches!(
        result,
        Err(crate::Error::NoPositiveTimeWindowRoot)
    ));
}

#[test]
fn noise_free_solve_recovers_truth_and_zero_velocity() {
    init_logger();

    let stations = fdoa_stations();
    let emitter = fdoa_emitter();
    let cfg = Config::simulation();

    let result = solve_fdoa(&stations, &emitter, 60.0, &cfg, &mut NoErrors).unwrap();

    let error_m = (result.position_ecef_m.to_vec3() - emitter.ecef_m()).norm();
    assert!(error_m < 1.0, "position error: {} m", error_m);

    // stationary emitter: solved residual speed snapped to exactly zero
    let velocity = result.velocity.expect("fdoa solves velocity");
    assert_eq!(velocity.speed_m_s, 0.0);

    match result.accuracy {
        Accuracy::Crlb(crlb_m) => {
            assert!(crlb_m.is_finite());
            assert!(crlb_m > 0.0);
        },
        other => panic!("unexpected accuracy metric: {:?}", other),
    }
}

#[test]
fn noisy_solve_stays_near_truth() {
    init_logger();

    let stations = fdoa_stations();
    let emitter = fdoa_emitter();
    let cfg = Config::simulation();

    let mut noise = GaussianErrors::new(SmallRng::seed_from_u64(21));

    let result = solve_fdoa(&stations, &emitter, 60.0, &cfg, &mut noise).unwrap();

    // altitude is the weakly observed direction, most of the spread
    // lands there
    let error_m = (result.position_ecef_m.to_vec3() - emitter.ecef_m()).norm();
    assert!(error_m < 2000.0, "position error: {} m", error_m);

    let velocity = result.velocity.expect("fdoa solves velocity");
    assert!(velocity.speed_m_s < 1.0e-3);
}

#[test]
fn moving_emitter_velocity_is_estimated() {
    init_logger();

    let stations = fdoa_stations();
    let emitter = fdoa_emitter().with_velocity(Velocity::new(30.0, 45.0, 0.0));
    let cfg = Config::simulation();

    let result = solve_fdoa(&stations, &emitter, 60.0, &cfg, &mut NoErrors).unwrap();

    let velocity = result.velocity.expect("fdoa solves velocity");
    assert!(
        (velocity.speed_m_s - 30.0).abs() < 1.0,
        "speed: {} m/s",
        velocity.speed_m_s
    );
}

#[test]
fn deployment_mode_requires_an_apriori() {
    let stations = fdoa_stations();
    let emitter = fdoa_emitter();
    let cfg = Config::simulation().with_simulation_mode(false);

    let result = solve_fdoa(&stations, &emitter, 60.0, &cfg, &mut NoErrors);

    assert!(matches!(result, Err(crate::Error::MissingApriori)));
}

#[test]
fn two_stations_is_the_minimum() {
    let stations = fdoa_stations();
    let emitter = fdoa_emitter();
    let cfg = Config::simulation();

    let result = solve_fdoa(&stations[..1], &emitter, 60.0, &cfg, &mut NoErrors);

    assert!(matches!(
        result,
        Err(crate::Error::NotEnoughStations {
            technique: "FDOA",
            required: 2,
            proposed: 1,
        })
    ));
}

#[test]
fn crlb_shrinks_with_quieter_measurements() {
    let stations = fdoa_stations();
    let emitter = fdoa_emitter();

    let times = [0.0, 30.0, 60.0];

    let noisy = crlb_composite_m(
        &stations,
        &emitter.ecef_m(),
        &emitter.ecef_velocity_m_s(),
        emitter.carrier_frequency_hz(),
        &times,
        2.0,
    )
    .unwrap();

    let quiet = crlb_composite_m(
        &stations,
        &emitter.ecef_m(),
        &emitter.ecef_velocity_m_s(),
        emitter.carrier_frequency_hz(),
        &times,
        0.5,
    )
    .unwrap();

    assert!(quiet < noisy);
    // CRLB scales linearly with σ
    assert!((noisy / quiet - 4.0).abs() < 1.0e-6);
}

#[test]
fn fisher_information_is_symmetric() {
    let stations = fdoa_stations();
    let emitter = fdoa_emitter();

    let fim = fisher_information(
        &stations,
        &emitter.ecef_m(),
        &emitter.ecef_velocity_m_s(),
        emitter.carrier_frequency_hz(),
        &[0.0, 30.0, 60.0],
        1.0,
    );

    for i in 0..6 {
        for j in 0..6 {
            assert!((fim[(i, j)] - fim[(j, i)]).abs() < 1.0e-9 * fim[(i, i)].abs().max(1.0));
        }
    }
}
