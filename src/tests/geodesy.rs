use rstest::rstest;

use crate::prelude::*;

#[rstest]
#[case(118.78, 32.07, 50.0)]
#[case(119.97, 31.71, 100.0)]
#[case(0.0, 0.0, 0.0)]
#[case(-122.42, 37.77, 16.0)]
#[case(151.21, -33.87, 58.0)]
#[case(10.0, 78.0, 25_000.0)]
fn geodetic_round_trip(#[case] lon: f64, #[case] lat: f64, #[case] alt: f64) {
    let point = GeodeticPoint::new(lon, lat, alt).unwrap();
    let back = ecef_to_geodetic(&point.to_ecef());

    assert!((back.longitude_deg - lon).abs() < 1.0e-6);
    assert!((back.latitude_deg - lat).abs() < 1.0e-6);
    assert!((back.altitude_m - alt).abs() < 1.0e-3);
}

#[rstest]
#[case(118.78, 32.07, 119.97, 31.71)]
#[case(0.0, 0.0, 1.0, 1.0)]
#[case(-60.0, -30.0, -61.0, -29.0)]
fn distance_is_symmetric(
    #[case] lon_a: f64,
    #[case] lat_a: f64,
    #[case] lon_b: f64,
    #[case] lat_b: f64,
) {
    let a = GeodeticPoint::new(lon_a, lat_a, 10.0).unwrap();
    let b = GeodeticPoint::new(lon_b, lat_b, 20.0).unwrap();

    assert_eq!(distance(&a, &b), distance(&b, &a));
    assert!(distance(&a, &b) > 0.0);
}

#[test]
fn bearing_azimuth_is_normalized() {
    let origin = GeodeticPoint::new(118.78, 32.07, 50.0).unwrap().to_ecef();

    for (dx, dy, dz) in [
        (1000.0, 0.0, 0.0),
        (-1000.0, 0.0, 100.0),
        (0.0, -1000.0, -100.0),
        (-500.0, -500.0, 0.0),
    ] {
        let target = origin + Vector3::new(dx, dy, dz);
        let (azimuth, elevation) = azimuth_elevation_deg(&origin, &target);
        assert!((0.0..360.0).contains(&azimuth));
        assert!((-90.0..=90.0).contains(&elevation));
    }
}

#[test]
fn reciprocal_bearings_share_magnitude() {
    let a = GeodeticPoint::new(118.78, 32.07, 50.0).unwrap().to_ecef();
    let b = GeodeticPoint::new(119.97, 31.71, 100.0).unwrap().to_ecef();

    let (_, elevation_ab) = azimuth_elevation_deg(&a, &b);
    let (_, elevation_ba) = azimuth_elevation_deg(&b, &a);

    // straight line between two ECEF points: the look-down mirrors the
    // look-up
    assert!((elevation_ab + elevation_ba).abs() < 1.0e-9);
}
