#![cfg(test)]

use core::f64::consts::{FRAC_PI_2, PI, TAU};
use std::ptr;

use glam::DVec3;

use crate::{
    body_presets,
    constants::{AU, G, GM_EARTH, GM_SUN},
    frames::EarthRotation,
    tle::parse_tle,
    units::{
        normalize_angle, normalize_dimensionless, normalize_length, normalize_position,
        normalize_time, normalize_velocity, Dimension,
    },
    Body, ConicKind, Duration, Epoch, Frame, FrameState, Orbit, OrbitError, OrbitalElements,
    PropagationMethod, Quantity, Unit,
};


use assertions::*;
use seeders::*;

const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

fn unit_orbit(attractor: &Body) -> Orbit<'_> {
    Orbit::from_classical(attractor, 7000e3, 0.0, 0.0, 0.0, 0.0, 0.0, None).unwrap()
}

#[test]
fn circular_orbit_quantities() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    let a: f64 = 7000e3;
    let expected_period = TAU * (a * a * a / GM_EARTH).sqrt();

    assert_rel_eq(orbit.get_orbital_period().unwrap(), expected_period, 1e-12, "period");
    assert_rel_eq(
        orbit.get_mean_motion().unwrap(),
        TAU / expected_period,
        1e-12,
        "mean motion",
    );
    assert_rel_eq(orbit.get_periapsis().unwrap(), a, 1e-12, "periapsis");
    assert_rel_eq(orbit.get_apoapsis().unwrap(), a, 1e-12, "apoapsis");
    assert_rel_eq(orbit.get_semi_latus_rectum().unwrap(), a, 1e-12, "semi-latus rectum");
    assert_rel_eq(
        orbit.get_specific_energy(),
        -GM_EARTH / (2.0 * a),
        1e-12,
        "specific energy",
    );
    assert_eq!(orbit.get_conic_kind().unwrap(), ConicKind::Circular);
    assert_eq!(orbit.get_long_asc_node().unwrap(), 0.0);
    assert_eq!(orbit.get_arg_pe().unwrap(), 0.0);
    assert_almost_eq(orbit.get_inclination().unwrap(), 0.0, "inclination");
    assert_almost_eq(orbit.get_eccentricity().unwrap(), 0.0, "eccentricity");
}

#[test]
fn hyperbolic_period_is_undefined() {
    let earth = body_presets::earth();
    let orbit = Orbit::from_classical(&earth, -7000e3, 1.5, 0.3, 0.0, 0.0, 0.0, None).unwrap();

    let expected = Err(OrbitError::UndefinedQuantity {
        quantity: "orbital period",
        conic: ConicKind::Hyperbolic,
    });

    assert_eq!(orbit.get_orbital_period(), expected);
    assert!(orbit.get_mean_motion().is_err());
    assert!(orbit.get_apoapsis().unwrap() < 0.0);
    assert!(orbit.get_specific_energy() > 0.0);
    assert_rel_eq(orbit.get_semi_major_axis().unwrap(), -7000e3, 1e-9, "a");
}

#[test]
fn parabolic_orbit() {
    let earth = body_presets::earth();
    let r = 7000e3;
    let v = (2.0 * GM_EARTH / r).sqrt();
    let orbit = Orbit::from_vectors(&earth, [r, 0.0, 0.0], [0.0, 0.0, v], None).unwrap();

    assert_eq!(orbit.get_conic_kind().unwrap(), ConicKind::Parabolic);
    assert!(orbit.get_specific_energy().abs() < 1e-6 * GM_EARTH / r);
    assert_eq!(orbit.get_apoapsis().unwrap(), f64::INFINITY);
    assert_eq!(orbit.get_semi_major_axis().unwrap(), f64::INFINITY);
    assert!(matches!(
        orbit.get_orbital_period(),
        Err(OrbitError::UndefinedQuantity {
            conic: ConicKind::Parabolic,
            ..
        })
    ));

    let there = orbit.propagate(5000.0, PropagationMethod::Keplerian).unwrap();
    let back = there.propagate(-5000.0, PropagationMethod::Keplerian).unwrap();
    assert_rel_eq_vec3(back.get_position(), orbit.get_position(), 1e-8, "position");
    assert_rel_eq_vec3(back.get_velocity(), orbit.get_velocity(), 1e-8, "velocity");
}

#[test]
fn parabolic_elements_constructor() {
    let earth = body_presets::earth();
    let elements = OrbitalElements::parabolic(14000e3, FRAC_PI_2, 0.0, 0.0, 0.0).unwrap();
    let orbit = Orbit::from_elements(&earth, &elements, None).unwrap();

    assert_rel_eq(orbit.get_position().length(), 7000e3, 1e-12, "periapsis distance");
    assert_eq!(orbit.get_conic_kind().unwrap(), ConicKind::Parabolic);

    assert!(OrbitalElements::parabolic(-1.0, 0.0, 0.0, 0.0, 0.0).is_err());
}

#[test]
fn invalid_elements() {
    let cases = [
        (7000e3, -0.1, 0.0),
        (-7000e3, 0.5, 0.0),
        (7000e3, 1.5, 0.0),
        (7000e3, 1.0, 0.0),
        (7000e3, 0.1, -0.1),
        (7000e3, 0.1, 4.0),
        (7000e3, f64::NAN, 0.0),
        (f64::INFINITY, 0.1, 0.0),
        (f64::NAN, 0.1, 0.0),
        (f64::NEG_INFINITY, 1.5, 0.0),
    ];

    for (a, e, i) in cases {
        assert!(
            matches!(
                OrbitalElements::new(a, e, i, 0.0, 0.0, 0.0),
                Err(OrbitError::Validation(_))
            ),
            "a = {a}, e = {e}, i = {i}"
        );
    }

    let angles = [
        (f64::NAN, 0.0, 0.0),
        (0.0, f64::INFINITY, 0.0),
        (0.0, 0.0, f64::NAN),
        (0.0, 0.0, f64::NEG_INFINITY),
    ];

    for (raan, argp, nu) in angles {
        assert!(
            matches!(
                OrbitalElements::new(7000e3, 0.1, 0.2, raan, argp, nu),
                Err(OrbitError::Validation(_))
            ),
            "Ω = {raan}, ω = {argp}, ν = {nu}"
        );
        assert!(
            matches!(
                OrbitalElements::parabolic(7000e3, 0.2, raan, argp, nu),
                Err(OrbitError::Validation(_))
            ),
            "parabolic with Ω = {raan}, ω = {argp}, ν = {nu}"
        );
    }

    // Angles outside [0, 2π) get wrapped
    let elements = OrbitalElements::new(7000e3, 0.1, 0.2, -1.0, 7.0, -0.5).unwrap();
    assert_almost_eq(elements.get_long_asc_node(), TAU - 1.0, "LAN");
    assert_almost_eq(elements.get_arg_pe(), 7.0 - TAU, "argument of periapsis");
    assert_almost_eq(elements.get_true_anomaly(), TAU - 0.5, "true anomaly");

    let elements = OrbitalElements::new(7000e3, 0.0, 0.2, 0.0, 0.0, 9.0).unwrap();
    assert_almost_eq(elements.get_true_anomaly(), 9.0 - TAU, "circular true anomaly");

    // An open orbit keeps the sign of its true anomaly
    let elements = OrbitalElements::new(-7000e3, 1.5, 0.2, 0.0, 0.0, -0.5).unwrap();
    assert_eq!(elements.get_true_anomaly(), -0.5);
}

#[test]
fn non_finite_classical_elements_are_rejected() {
    let earth = body_presets::earth();

    let cases = [
        (7000e3, 0.1, f64::NAN, 0.0, 0.0),
        (7000e3, 0.1, 0.0, f64::INFINITY, 0.0),
        (7000e3, 0.1, 0.0, 0.0, f64::NAN),
        (f64::INFINITY, 0.1, 0.0, 0.0, 0.0),
    ];

    for (a, e, raan, argp, nu) in cases {
        assert!(
            matches!(
                Orbit::from_classical(&earth, a, e, 0.5, raan, argp, nu, None),
                Err(OrbitError::Validation(_))
            ),
            "a = {a}, Ω = {raan}, ω = {argp}, ν = {nu}"
        );
    }
}

#[test]
fn element_cache_is_populated_once() {
    let earth = body_presets::earth();
    let orbit = Orbit::from_classical(&earth, 9000e3, 0.2, 0.5, 1.0, 2.0, 3.0, None).unwrap();

    assert!(!orbit.has_cached_elements());

    let first = orbit.get_elements().unwrap();
    assert!(orbit.has_cached_elements());
    let second = orbit.get_elements().unwrap();
    assert!(ptr::eq(first, second));

    // Every derived quantity goes through the same cache entry.
    orbit.get_orbital_period().unwrap();
    assert!(ptr::eq(first, orbit.get_elements().unwrap()));

    let propagated = orbit.propagate(100.0, PropagationMethod::Keplerian).unwrap();
    assert!(!propagated.has_cached_elements());

    let maneuvered = orbit.apply_maneuver(&[1.0, 0.0, 0.0]).unwrap();
    assert!(!maneuvered.has_cached_elements());

    // The original is untouched.
    assert!(ptr::eq(first, orbit.get_elements().unwrap()));
}

#[test]
fn cache_is_shared_across_threads() {
    let earth = body_presets::earth();
    let orbit = Orbit::from_classical(&earth, 9000e3, 0.2, 0.5, 1.0, 2.0, 3.0, None).unwrap();

    let results: Vec<OrbitalElements> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| *orbit.get_elements().unwrap()))
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for elements in results {
        assert_eq!(&elements, orbit.get_elements().unwrap());
    }
}

#[test]
fn maneuver() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    let maneuvered = orbit.apply_maneuver(&[0.0, 100.0, 0.0]).unwrap();

    assert_eq_vec3(maneuvered.get_position(), orbit.get_position(), "position");
    assert_almost_eq_vec3(
        maneuvered.get_velocity(),
        orbit.get_velocity() + DVec3::new(0.0, 100.0, 0.0),
        "velocity",
    );
    assert_eq!(maneuvered.get_epoch(), orbit.get_epoch());
    assert!(maneuvered.get_apoapsis().unwrap() > orbit.get_apoapsis().unwrap());
}

#[test]
fn maneuver_shape_validation() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    for delta_v in [&[1.0, 2.0][..], &[1.0, 2.0, 3.0, 4.0][..], &[][..]] {
        assert!(
            matches!(orbit.apply_maneuver(delta_v), Err(OrbitError::Validation(_))),
            "{delta_v:?}"
        );
    }

    assert!(matches!(
        orbit.apply_maneuver(&[f64::NAN, 0.0, 0.0]),
        Err(OrbitError::Validation(_))
    ));
}

#[test]
fn propagate_advances_epoch() {
    let earth = body_presets::earth();
    let start = Epoch::from_gregorian_utc(2024, 3, 1, 0, 0, 0, 0).unwrap();
    let orbit = Orbit::from_classical(&earth, 7000e3, 0.01, 0.9, 0.0, 0.0, 0.0, Some(start)).unwrap();

    let forward = orbit
        .propagate(Duration::from_hours(2.0).unwrap(), PropagationMethod::Keplerian)
        .unwrap();
    assert_eq!(forward.get_epoch() - start, Duration::from_hours(2.0).unwrap());
    assert!(ptr::eq(forward.get_attractor(), &earth));

    let backward = orbit
        .propagate(Quantity::new(-30.0, Unit::Minute), PropagationMethod::Keplerian)
        .unwrap();
    assert_eq!(backward.get_epoch() - start, Duration::from_minutes(-30.0).unwrap());

    let target = start.checked_add(Duration::from_days(1.0).unwrap()).unwrap();
    let at_target = orbit.propagate_to(target, PropagationMethod::Keplerian).unwrap();
    assert_eq!(at_target.get_epoch(), target);

    assert!(matches!(
        orbit.propagate(Quantity::new(1.0, Unit::Kilometer), PropagationMethod::Keplerian),
        Err(OrbitError::Unit {
            expected: Dimension::Time,
            found: Dimension::Length,
            ..
        })
    ));
}

#[test]
fn propagate_rejects_j2() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    for method in ["j2", "j2_dopri5", "j2_dop853"] {
        let method: PropagationMethod = method.parse().unwrap();
        assert_eq!(
            orbit.propagate(60.0, method).unwrap_err(),
            OrbitError::NotImplemented(method)
        );
    }
}

#[test]
fn propagation_out_of_range() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    assert!(matches!(
        orbit.propagate(1e20, PropagationMethod::Keplerian),
        Err(OrbitError::Range(_))
    ));
}

#[test]
fn default_epoch_is_j2000() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    assert_eq!(orbit.get_epoch(), Epoch::j2000());
    assert_eq!(Epoch::default(), Epoch::j2000());
    assert_eq!(Epoch::j2000().seconds_since_j2000(), 0.0);
}

#[test]
fn unit_tagged_constructors() {
    let earth = body_presets::earth();

    let si = Orbit::from_classical(&earth, 7000e3, 0.1, 0.5, 1.0, 0.25, 2.0, None).unwrap();
    let tagged = Orbit::from_classical(
        &earth,
        Quantity::new(7000.0, Unit::Kilometer),
        Quantity::new(0.1, Unit::Dimensionless),
        Quantity::new(0.5_f64.to_degrees(), Unit::Degree),
        Quantity::new(1.0, Unit::Radian),
        Quantity::new(0.25_f64.to_degrees(), Unit::Degree),
        2.0,
        None,
    )
    .unwrap();

    assert_rel_eq_vec3(tagged.get_position(), si.get_position(), 1e-12, "position");
    assert_rel_eq_vec3(tagged.get_velocity(), si.get_velocity(), 1e-12, "velocity");

    let from_km = Orbit::from_vectors(
        &earth,
        (DVec3::new(7000.0, 0.0, 0.0), Unit::Kilometer),
        (DVec3::new(0.0, 7.5, 0.0), Unit::KilometerPerSecond),
        None,
    )
    .unwrap();
    assert_eq!(from_km.get_position(), DVec3::new(7000e3, 0.0, 0.0));
    assert_eq!(from_km.get_velocity(), DVec3::new(0.0, 7500.0, 0.0));

    assert_eq!(
        Orbit::from_classical(
            &earth,
            7000e3,
            Quantity::new(0.1, Unit::Meter),
            0.0,
            0.0,
            0.0,
            0.0,
            None
        )
        .unwrap_err(),
        OrbitError::Unit {
            label: "eccentricity",
            expected: Dimension::Dimensionless,
            found: Dimension::Length,
        }
    );

    assert!(matches!(
        Orbit::from_vectors(
            &earth,
            (DVec3::X, Unit::KilometerPerSecond),
            DVec3::Y,
            None
        ),
        Err(OrbitError::Unit {
            label: "position",
            ..
        })
    ));
    assert!(matches!(
        Orbit::from_vectors(&earth, [f64::INFINITY, 0.0, 0.0], DVec3::Y, None),
        Err(OrbitError::Validation(_))
    ));
}

#[test]
fn unit_normalization() {
    assert_eq!(
        normalize_length(Quantity::new(2.0, Unit::Kilometer), "x").unwrap(),
        2000.0
    );
    assert_eq!(
        normalize_length(Quantity::new(1.0, Unit::AstronomicalUnit), "x").unwrap(),
        AU
    );
    assert_eq!(normalize_length(42.0, "x").unwrap(), 42.0);
    assert_almost_eq(
        normalize_angle(Quantity::new(180.0, Unit::Degree), "x").unwrap(),
        PI,
        "180°",
    );
    assert_eq!(
        normalize_dimensionless(Quantity::new(0.5, Unit::Dimensionless), "x").unwrap(),
        0.5
    );
    assert_eq!(
        normalize_time(Quantity::new(1.5, Unit::Hour), "x").unwrap(),
        5400.0
    );
    assert_eq!(
        normalize_time(Quantity::new(1.0, Unit::Day), "x").unwrap(),
        86400.0
    );
    assert_eq!(
        normalize_time(Duration::from_minutes(2.0).unwrap(), "x").unwrap(),
        120.0
    );
    assert_eq!(
        normalize_position((DVec3::new(1.0, 2.0, 3.0), Unit::Kilometer), "x").unwrap(),
        DVec3::new(1000.0, 2000.0, 3000.0)
    );
    assert_eq!(
        normalize_velocity([1.0, 2.0, 3.0], "x").unwrap(),
        DVec3::new(1.0, 2.0, 3.0)
    );

    assert_eq!(
        normalize_angle(Quantity::new(1.0, Unit::Second), "inclination").unwrap_err(),
        OrbitError::Unit {
            label: "inclination",
            expected: Dimension::Angle,
            found: Dimension::Time,
        }
    );
    assert!(normalize_velocity((DVec3::X, Unit::Meter), "velocity").is_err());

    let message = normalize_length(Quantity::new(1.0, Unit::Degree), "semi-major axis")
        .unwrap_err()
        .to_string();
    assert!(message.contains("semi-major axis"), "{message}");
}

#[test]
fn epoch_arithmetic() {
    let start = Epoch::from_gregorian_utc(2023, 6, 15, 12, 30, 0, 0).unwrap();
    let offset = Duration::from_seconds(12345.5).unwrap();

    let later = start.checked_add(offset).unwrap();
    assert_eq!(later - start, offset);
    assert_eq!(later.checked_sub(offset).unwrap(), start);
    assert!(later > start);
    assert_eq!(start - later, -offset);
    assert!((start - later).is_negative());

    let from_offset = Epoch::from_j2000_offset(Duration::from_days(1.0).unwrap()).unwrap();
    assert_eq!(from_offset.seconds_since_j2000(), 86400.0);

    assert_eq!(
        Duration::from_days(1.0)
            .unwrap()
            .checked_add(Duration::from_hours(12.0).unwrap())
            .unwrap()
            .to_days(),
        1.5
    );
    assert_eq!(Duration::ZERO.to_seconds(), 0.0);
}

#[test]
fn invalid_calendar_dates() {
    let cases = [
        (2020, 13, 40, 0, 0, 0),
        (2021, 2, 29, 0, 0, 0),
        (2020, 4, 31, 0, 0, 0),
        (2020, 1, 1, 24, 0, 0),
        (2020, 1, 1, 0, 60, 0),
    ];

    for (year, month, day, hour, minute, second) in cases {
        assert!(
            matches!(
                Epoch::from_gregorian_utc(year, month, day, hour, minute, second, 0),
                Err(OrbitError::Validation(_))
            ),
            "{year}-{month}-{day} {hour}:{minute}:{second}"
        );
    }

    // Leap day
    assert!(Epoch::from_gregorian_utc(2020, 2, 29, 0, 0, 0, 0).is_ok());
}

#[test]
fn time_overflow_is_a_range_error() {
    assert!(matches!(
        Duration::from_seconds(1e20),
        Err(OrbitError::Range(_))
    ));
    assert!(matches!(
        Duration::from_seconds(f64::NAN),
        Err(OrbitError::Range(_))
    ));
    assert!(matches!(
        Duration::from_days(f64::INFINITY),
        Err(OrbitError::Range(_))
    ));

    let huge = Duration::from_seconds(1e14).unwrap();
    assert!(matches!(
        Epoch::j2000().checked_add(huge),
        Err(OrbitError::Range(_))
    ));
    assert!(matches!(
        Epoch::j2000().checked_sub(huge),
        Err(OrbitError::Range(_))
    ));
}

#[test]
fn frames_round_trip() {
    let earth = body_presets::earth();
    let epoch = Epoch::from_gregorian_utc(2024, 1, 1, 6, 0, 0, 0).unwrap();

    for _ in 0..100 {
        let elements = random_elliptic();
        let orbit = Orbit::from_elements(&earth, &elements, Some(epoch)).unwrap();

        for name in ["icrs", "GCRS", "Itrs"] {
            let frame_state = orbit.to_frame(name).unwrap();
            assert_eq!(frame_state.epoch, epoch);
            assert_rel_eq(
                frame_state.position.length(),
                orbit.get_position().length(),
                1e-12,
                "distance from Earth's center",
            );

            let back = Orbit::from_frame(&frame_state, &earth).unwrap();
            assert_eq!(back.get_epoch(), epoch);
            assert_rel_eq_vec3(back.get_position(), orbit.get_position(), 1e-12, name);
            assert_rel_eq_vec3(back.get_velocity(), orbit.get_velocity(), 1e-12, name);
        }
    }
}

#[test]
fn inertial_frames_are_pass_through() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    for frame in [Frame::Icrs, Frame::Gcrs] {
        let state = orbit.to_frame_with(frame, &EarthRotation).unwrap();
        assert_eq!(state.frame, frame);
        assert_eq!(state.position, orbit.get_position());
        assert_eq!(state.velocity, orbit.get_velocity());
    }
}

#[test]
fn earth_fixed_frame_co_rotates() {
    let earth = body_presets::earth();
    let r = 42_164_172.0;
    let v = (GM_EARTH / r).sqrt();
    let epoch = Epoch::j2000();

    // A geostationary orbit is at rest in the Earth-fixed frame.
    let orbit = Orbit::from_vectors(&earth, [r, 0.0, 0.0], [0.0, v, 0.0], Some(epoch)).unwrap();
    let state = orbit.to_frame("itrs").unwrap();

    assert!(state.velocity.length() < 1.0, "{}", state.velocity);

    let angle = EarthRotation::rotation_angle(epoch);
    assert!((0.0..TAU).contains(&angle));
    let expected = DVec3::new(r * angle.cos(), -r * angle.sin(), 0.0);
    assert_rel_eq_vec3(state.position, expected, 1e-12, "Earth-fixed position");
}

#[test]
fn unsupported_frames() {
    let earth = body_presets::earth();
    let orbit = unit_orbit(&earth);

    assert_eq!(
        orbit.to_frame("fk5").unwrap_err(),
        OrbitError::UnsupportedFrame("fk5".to_string())
    );
    assert!(matches!(
        "teme".parse::<Frame>(),
        Err(OrbitError::UnsupportedFrame(_))
    ));
    assert_eq!("ICRS".parse::<Frame>(), Ok(Frame::Icrs));
    assert_eq!(Frame::Itrs.to_string(), "itrs");

    let state = FrameState {
        frame: Frame::Gcrs,
        position: DVec3::new(7000e3, 0.0, 0.0),
        velocity: DVec3::new(0.0, 7.5e3, 0.0),
        epoch: Epoch::j2000(),
    };
    let orbit = Orbit::from_frame(&state, &earth).unwrap();
    assert_eq!(orbit.get_position(), state.position);
}

#[test]
fn display_shows_elements() {
    let earth = body_presets::earth();
    let orbit = Orbit::from_classical(&earth, 7000e3, 0.1, 0.5, 0.0, 0.0, 0.0, None).unwrap();

    let text = orbit.to_string();

    assert!(text.contains("Earth"), "{text}");
    assert!(text.contains("e = 0.100000"), "{text}");
    assert!(text.contains("a = 7000.000 km"), "{text}");
}

#[test]
fn display_falls_back_to_state() {
    let earth = body_presets::earth();
    // No velocity means no orbital plane, so the elements can't be computed.
    let orbit = Orbit::from_vectors(&earth, [7000e3, 0.0, 0.0], [0.0, 0.0, 0.0], None).unwrap();

    assert!(orbit.get_elements().is_err());

    let text = orbit.to_string();
    assert!(text.contains("r = [7000.000, 0.000, 0.000] km"), "{text}");
    assert!(!text.contains("a ="), "{text}");
}

#[test]
fn errors_reach_the_caller() {
    let earth = body_presets::earth();
    let orbit = Orbit::from_vectors(&earth, [7000e3, 0.0, 0.0], [0.0, 0.0, 0.0], None).unwrap();

    assert!(matches!(orbit.get_orbital_period(), Err(OrbitError::Domain(_))));
    assert!(matches!(
        orbit.propagate(60.0, PropagationMethod::Keplerian),
        Err(OrbitError::Domain(_))
    ));
    assert!(matches!(
        orbit.sample(&[60.0], PropagationMethod::Keplerian),
        Err(OrbitError::Domain(_))
    ));
}

#[test]
fn tle_parsing() {
    let tle = parse_tle(ISS_TLE).unwrap();

    assert_eq!(tle.get_name(), Some("ISS (ZARYA)"));
    assert_eq!(tle.get_elements().norad_id, 25544);

    // Day 264.51782528 of 2008 is September 20th, around 12:25:40 UTC.
    let expected = Epoch::from_gregorian_utc(2008, 9, 20, 12, 25, 40, 0).unwrap();
    assert!((tle.get_epoch() - expected).to_seconds().abs() < 1.0);

    let two_lines: String = ISS_TLE.lines().skip(1).collect::<Vec<_>>().join("\n");
    let unnamed = parse_tle(&two_lines).unwrap();
    assert_eq!(unnamed.get_name(), None);
    assert_eq!(unnamed.get_epoch(), tle.get_epoch());

    let copy = tle.clone();
    assert_eq!(copy.get_epoch(), tle.get_epoch());
    assert_eq!(copy.get_name(), tle.get_name());
    assert_eq!(
        copy.state_at(tle.get_epoch()).unwrap(),
        tle.state_at(tle.get_epoch()).unwrap()
    );

    let debug = format!("{tle:?}");
    assert!(debug.contains("ISS (ZARYA)"), "{debug}");
    assert!(debug.contains("25544"), "{debug}");

    assert!(matches!(parse_tle("just one line"), Err(OrbitError::Tle(_))));
    assert!(matches!(
        parse_tle("name\nnot line one\nnot line two"),
        Err(OrbitError::Tle(_))
    ));
}

#[test]
fn orbit_from_tle() {
    let earth = body_presets::earth();
    let tle = parse_tle(ISS_TLE).unwrap();

    let at_epoch = Orbit::from_tle(ISS_TLE, &earth, None).unwrap();
    assert_eq!(at_epoch.get_epoch(), tle.get_epoch());

    let radius = at_epoch.get_position().length();
    assert!((6.6e6..6.9e6).contains(&radius), "ISS radius {radius}");
    let speed = at_epoch.get_velocity().length();
    assert!((7.5e3..7.9e3).contains(&speed), "ISS speed {speed}");
    assert!(at_epoch.get_eccentricity().unwrap() < 0.01);
    let inclination = at_epoch.get_inclination().unwrap().to_degrees();
    assert!((inclination - 51.6416).abs() < 0.2, "ISS inclination {inclination}");

    // A later epoch gets its own SGP4 state, not the one at the TLE epoch.
    let target = tle
        .get_epoch()
        .checked_add(Duration::from_minutes(30.0).unwrap())
        .unwrap();
    let later = Orbit::from_tle(ISS_TLE, &earth, Some(target)).unwrap();

    assert_eq!(later.get_epoch(), target);
    assert!((later.get_position() - at_epoch.get_position()).length() > 1e6);
    assert_rel_eq_vec3(
        later.get_position(),
        tle.propagate(30.0).unwrap().state.position,
        1e-9,
        "SGP4 position 30 minutes after the TLE epoch",
    );
}

#[test]
fn bodies() {
    let earth = Body::default();
    assert_eq!(earth, body_presets::earth());
    assert_eq!(body_presets::the_sun().mu, GM_SUN);

    let from_mass = Body::from_mass("Test", 1e24, 1e6).unwrap();
    assert_rel_eq(from_mass.mu, G * 1e24, 1e-15, "μ from mass");
    assert_rel_eq(from_mass.get_mass(), 1e24, 1e-12, "mass");

    for mu in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(Body::new("Nothing", mu, 1.0), Err(OrbitError::Domain(_))),
            "μ = {mu}"
        );
    }

    for body in [
        body_presets::the_sun(),
        body_presets::mercury(),
        body_presets::venus(),
        body_presets::earth(),
        body_presets::the_moon(),
        body_presets::mars(),
        body_presets::jupiter(),
    ] {
        assert!(body.mu > 0.0 && body.radius > 0.0, "{body:?}");
    }
}

#[test]
fn orbits_share_an_attractor() {
    let sun = body_presets::the_sun();

    let orbits: Vec<Orbit> = (1..=3)
        .map(|k| Orbit::from_classical(&sun, k as f64 * AU, 0.0, 0.0, 0.0, 0.0, 0.0, None).unwrap())
        .collect();

    for orbit in &orbits {
        assert!(ptr::eq(orbit.get_attractor(), &sun));
    }

    // Kepler's third law
    let ratio = orbits[2].get_orbital_period().unwrap() / orbits[0].get_orbital_period().unwrap();
    assert_rel_eq(ratio, 27.0_f64.sqrt(), 1e-9, "period ratio");
}

#[test]
fn get_state_matches_parts() {
    let earth = body_presets::earth();
    let orbit = Orbit::from_elements(&earth, &random_elliptic(), None).unwrap();

    let state = orbit.get_state();
    assert_eq!(state.position, orbit.get_position());
    assert_eq!(state.velocity, orbit.get_velocity());
    assert_eq!(orbit.get_angular_momentum(), state.angular_momentum());
    assert_rel_eq(
        orbit.get_specific_energy(),
        state.specific_energy(MU),
        1e-15,
        "specific energy",
    );
}
