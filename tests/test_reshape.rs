mod common;
use common::{session, two_sensor_session, ALCOHOLIC_HEADER};

use approx::assert_abs_diff_eq;
use eegtab::wide::pivot;
use eegtab::{import_session, ImportConfig, Layout, SessionTable};
use std::io::Cursor;

fn import(text: &str, cfg: &ImportConfig) -> SessionTable {
    import_session(&mut Cursor::new(text), cfg).unwrap()
}

#[test]
fn two_sensors_two_samples_one_trial_pivot_shape() {
    let cfg = ImportConfig { layout: Layout::Wide, optimize: true };
    let SessionTable::Wide(wide) = import(&two_sensor_session(), &cfg) else {
        unreachable!()
    };
    assert_eq!(wide.n_samples(), 2);
    assert_eq!(wide.n_columns(), 2);
    assert_eq!(wide.samples, vec![0, 1]);
    assert_eq!(wide.columns[0].sensor, "FP1");
    assert_eq!(wide.columns[1].sensor, "FP2");
    // Both columns nest under the single subject/trial/condition combination.
    assert_eq!(wide.columns[0].subject, wide.columns[1].subject);
    assert_eq!(wide.columns[0].trial, wide.columns[1].trial);
}

#[test]
fn pivot_places_values_by_sample_and_sensor() {
    let cfg = ImportConfig { layout: Layout::Wide, optimize: false };
    let SessionTable::Wide(wide) = import(&two_sensor_session(), &cfg) else {
        unreachable!()
    };
    assert_abs_diff_eq!(wide.values[[0, 0]], -8.921, epsilon = 1e-12); // FP1 sample 0
    assert_abs_diff_eq!(wide.values[[1, 0]], -8.433, epsilon = 1e-12); // FP1 sample 1
    assert_abs_diff_eq!(wide.values[[0, 1]], 0.305, epsilon = 1e-12); // FP2 sample 0
    assert_abs_diff_eq!(wide.values[[1, 1]], 2.594, epsilon = 1e-12); // FP2 sample 1
}

#[test]
fn long_then_pivot_matches_direct_wide_import() {
    let long_cfg = ImportConfig { layout: Layout::Long, optimize: true };
    let wide_cfg = ImportConfig { layout: Layout::Wide, optimize: true };

    let SessionTable::Long(frame) = import(&two_sensor_session(), &long_cfg) else {
        unreachable!()
    };
    let SessionTable::Wide(direct) = import(&two_sensor_session(), &wide_cfg) else {
        unreachable!()
    };

    let reshaped = pivot(&frame);
    assert_eq!(reshaped.samples, direct.samples);
    assert_eq!(reshaped.columns, direct.columns);
    assert_eq!(reshaped.values.dim(), direct.values.dim());
    for (a, b) in reshaped.values.iter().zip(direct.values.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn optimized_and_plain_pivots_agree() {
    // f32 narrowing must not move any cell of this exactly-representable data.
    let data = "0 FP1 0 1.5\n0 FP1 1 -2.25\n0 FP2 0 0.5\n0 FP2 1 4.0\n";
    let text = session(ALCOHOLIC_HEADER, "# S1 obj , trial 0", data);

    let SessionTable::Wide(plain) =
        import(&text, &ImportConfig { layout: Layout::Wide, optimize: false })
    else {
        unreachable!()
    };
    let SessionTable::Wide(packed) =
        import(&text, &ImportConfig { layout: Layout::Wide, optimize: true })
    else {
        unreachable!()
    };
    assert_eq!(plain, packed);
}

#[test]
fn unset_match_category_still_pivots() {
    // An unrecognized condition token leaves the match category unset; the
    // session's data must still appear in the wide frame, keyed with the
    // category left open, not be dropped.
    let data = "0 FP1 0 1.0\n0 FP1 1 2.0\n";
    let text = session(ALCOHOLIC_HEADER, "# S2 wat, trial 57", data);
    let SessionTable::Wide(wide) = import(&text, &ImportConfig::default()) else {
        unreachable!()
    };
    assert_eq!(wide.n_samples(), 2);
    assert_eq!(wide.n_columns(), 1);
    assert_eq!(wide.columns[0].match_category, None);
    assert_eq!(wide.columns[0].label(), "co2a0000364/0/true/-/false/FP1");
}

#[test]
fn multiple_trials_fan_out_into_columns() {
    let data = "0 FP1 0 1.0\n0 FP1 1 2.0\n1 FP1 0 3.0\n1 FP1 1 4.0\n";
    let text = session(ALCOHOLIC_HEADER, "# S1 obj , trial 0", data);
    let SessionTable::Wide(wide) = import(&text, &ImportConfig::default()) else {
        unreachable!()
    };
    // One sensor, two trials: still 2 sample rows, but 2 columns.
    assert_eq!(wide.n_samples(), 2);
    assert_eq!(wide.n_columns(), 2);
    assert_eq!(wide.columns[0].trial, 0);
    assert_eq!(wide.columns[1].trial, 1);
}
