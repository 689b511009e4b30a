use nalgebra::Vector3;

use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    df::intersect_directions_2d,
    prelude::*,
    tests::{df_emitter, df_stations, init_logger},
};

#[test]
fn two_station_exact_intersection() {
    init_logger();

    let stations = df_stations();
    let emitter = df_emitter();

    // zero bias, zero noise: the two rays intersect at the truth
    let params = BearingErrorParams {
        mean_error_deg: 0.0,
        std_dev_deg: 0.0,
    };

    let result =
        solve_two_station(&stations[..2], &emitter, &params, &mut NoErrors).unwrap();

    assert!(result.converged);
    match result.accuracy {
        Accuracy::TruthError(error_m) => {
            assert!(error_m < 1.0e-6, "planar error: {} m", error_m)
        },
        other => panic!("unexpected accuracy metric: {:?}", other),
    }
}

#[test]
fn two_station_noisy_intersection_stays_bounded() {
    init_logger();

    let stations = df_stations();
    let emitter = df_emitter();

    let mut noise = GaussianErrors::new(SmallRng::seed_from_u64(13));

    let result = solve_two_station(
        &stations[..2],
        &emitter,
        &BearingErrorParams::default(),
        &mut noise,
    )
    .unwrap();

    // 3-4° of bearing error over a ~10 km baseline: kilometers of spread
    assert!(result.accuracy.value() < 50_000.0);
    assert!(result.position_ecef_m.to_vec3().norm().is_finite());
}

#[test]
fn parallel_rays_fall_back_to_midpoint() {
    let obs1 = Vector3::new(0.0, 0.0, 10.0);
    let obs2 = Vector3::new(1000.0, 0.0, 10.0);
    let direction = Vector3::new(0.0, 1.0, 0.0);

    let (estimate, intersected) = intersect_directions_2d(&obs1, &direction, &obs2, &direction);

    assert!(!intersected);
    assert_eq!(estimate, Vector3::new(500.0, 0.0, 10.0));
    assert!(estimate[0].is_finite() && estimate[1].is_finite());
}

#[test]
fn colocated_stations_produce_midpoint_not_nan() {
    init_logger();

    // two receivers on the same mast: identical bearings, parallel rays
    let position = GeodeticPoint::new(118.78, 32.07, 50.0).unwrap();
    let band = FrequencyBand::new(1.0, 2.0).unwrap();
    let stations = vec![
        Station::new("mast-low", position, band),
        Station::new("mast-high", position, band),
    ];

    let params = BearingErrorParams {
        mean_error_deg: 0.0,
        std_dev_deg: 0.0,
    };

    let result =
        solve_two_station(&stations, &df_emitter(), &params, &mut NoErrors).unwrap();

    assert!(!result.converged);
    let estimate = result.position_ecef_m.to_vec3();
    assert!(estimate.norm().is_finite());
    // midpoint of two colocated stations is the station itself
    assert!((estimate - stations[0].ecef_m()).norm() < 1.0e-6);
}

#[test]
fn n_station_refinement_recovers_emitter() {
    init_logger();

    let stations = df_stations();
    let emitter = df_emitter();
    let cfg = Config::simulation();

    let result = solve_direction_finding(
        &stations,
        &emitter,
        &DirectionErrorModel::PerStation(vec![1.0, 1.0, 1.0]),
        &cfg,
        &mut NoErrors,
    )
    .unwrap();

    // the planar estimate is sharp; the altitude goes through the blend
    // and may keep a few hundred meters of cross-check spread
    assert!(
        (result.position.longitude_deg - emitter.position.longitude_deg).abs() < 1.0e-4,
        "longitude: {}",
        result.position.longitude_deg
    );
    assert!(
        (result.position.latitude_deg - emitter.position.latitude_deg).abs() < 1.0e-4,
        "latitude: {}",
        result.position.latitude_deg
    );

    let error_m = (result.position_ecef_m.to_vec3() - emitter.ecef_m()).norm();
    assert!(error_m < 1000.0, "position error: {} m", error_m);

    match result.accuracy {
        Accuracy::Gdop(gdop_m) => {
            assert!(gdop_m.is_finite());
            assert!(gdop_m > 0.0);
        },
        other => panic!("unexpected accuracy metric: {:?}", other),
    }
}

#[test]
fn n_station_noisy_refinement_stays_bounded() {
    init_logger();

    let stations = df_stations();
    let emitter = df_emitter();
    let cfg = Config::simulation();

    let mut noise = GaussianErrors::new(SmallRng::seed_from_u64(99));

    let result = solve_direction_finding(
        &stations,
        &emitter,
        &DirectionErrorModel::Device,
        &cfg,
        &mut noise,
    )
    .unwrap();

    let error_m = (result.position_ecef_m.to_vec3() - emitter.ecef_m()).norm();
    assert!(error_m < 20_000.0, "position error: {} m", error_m);
    assert!(result.residual_norm.is_finite());
}

#[test]
fn insufficient_stations_rejected() {
    let stations = df_stations();
    let emitter = df_emitter();
    let cfg = Config::simulation();

    let result = solve_direction_finding(
        &stations[..1],
        &emitter,
        &DirectionErrorModel::Device,
        &cfg,
        &mut NoErrors,
    );

    assert!(matches!(
        result,
        Err(crate::Error::NotEnoughStations {
            technique: "direction finding",
            required: 2,
            ..
        })
    ));
}

#[test]
fn per_station_sigma_dimension_checked() {
    let stations = df_stations();
    let emitter = df_emitter();
    let cfg = Config::simulation();

    let result = solve_direction_finding(
        &stations,
        &emitter,
        &DirectionErrorModel::PerStation(vec![1.0]),
        &cfg,
        &mut NoErrors,
    );

    assert!(matches!(
        result,
        Err(crate::Error::ErrorParamsDimension {
            expected: 3,
            proposed: 1,
        })
    ));
}

#[test]
fn device_error_heuristic_bounds() {
    let station = df_stations().remove(0);
    let sigma = direction_error_deg(&station);
    assert!((1.0..=10.0).contains(&sigma));

    // longer baseline tightens the figure
    let long_baseline = station.with_baseline_length_m(100.0);
    assert!(direction_error_deg(&long_baseline) <= sigma);
}

#[test]
fn gdop_degrades_with_collapsed_geometry() {
    let cfg = Config::simulation();

    let spread = df_stations().iter().map(|s| s.ecef_m()).collect::<Vec<_>>();
    let emitter = df_emitter().ecef_m();

    let healthy = gdop(&spread, &[1.0, 1.0, 1.0], &emitter, &cfg);
    assert!(healthy.is_finite());
    assert!(healthy > 0.0);

    // all stations collapsed on one point: singular normal matrix,
    // clamped to the configured ceiling
    let collapsed = vec![spread[0], spread[0], spread[0]];
    let clamped = gdop(&collapsed, &[1.0, 1.0, 1.0], &emitter, &cfg);
    assert_eq!(clamped, cfg.df.max_gdop);
}

#[test]
fn interferometer_budget_is_positive() {
    let wavelength_m = crate::SPEED_OF_LIGHT_M_S / 1.5e9;
    let budget = interferometer_error_budget(wavelength_m, 10.0, 30.0, 15.0);

    assert!(budget.composite_deg > 0.0);
    assert!(budget.composite_deg >= budget.cone_effect_deg);
    assert!(budget.composite_deg >= budget.antenna_array_deg);
}
