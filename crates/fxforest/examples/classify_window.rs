//! Classify telemetry windows with an ensemble imported from flat exported arrays.
//!
//! The exporter writes one set of parallel arrays per tree, with float
//! thresholds in the same fixed-point scale as the features. Here we fabricate
//! such an export: every tree checks the turning entropy first and the mean
//! speed second, with slightly different cut points.
//!
//! Run with:
//! ```bash
//! cargo run --example classify_window
//! ```

use fxforest::inference::features;
use fxforest::model::{ClassifierConfig, EnsembleMeta, ForestClassifier, TraversalKind};
use fxforest::repr::{Ensemble, FlatTreeArrays, Q16};
use fxforest::{N_FEATURES, N_TREES};
use ndarray::Array2;

/// Fixed-point scale applied by the quantization stage (value * SCALE).
const SCALE: f64 = 256.0;

const TURNING_ENTROPY: i32 = 5;
const MEAN_SPEED: i32 = 4;

fn quantize(value: f64) -> i32 {
    (value * SCALE).round() as i32
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // =========================================================================
    // Import the exported trees
    // =========================================================================
    //
    //        [0] turning_entropy <= t_i
    //        /                  \
    //   [1] leaf=0        [2] mean_speed <= s_i
    //                        /            \
    //                   [3] leaf=1     [4] leaf=0
    let children_left = [1, -1, 3, -1, -1];
    let children_right = [2, -1, 4, -1, -1];
    let feature = [TURNING_ENTROPY, -2, MEAN_SPEED, -2, -2];
    let leaf_vote = [0u8, 0, 0, 1, 0];

    let thresholds: Vec<[Q16; 5]> = (0..N_TREES)
        .map(|i| {
            let entropy_cut = 1.8 + 0.005 * i as f64;
            let speed_cut = 2.5 - 0.004 * i as f64;
            Ok([
                Q16::from_threshold_f64(entropy_cut * SCALE)?,
                Q16::ZERO,
                Q16::from_threshold_f64(speed_cut * SCALE)?,
                Q16::ZERO,
                Q16::ZERO,
            ])
        })
        .collect::<Result<_, fxforest::repr::QuantizeError>>()?;

    let arrays: Vec<FlatTreeArrays<'_>> = thresholds
        .iter()
        .map(|threshold| FlatTreeArrays {
            children_left: &children_left,
            children_right: &children_right,
            feature: &feature,
            threshold,
            leaf_vote: &leaf_vote,
        })
        .collect();

    let ensemble = Ensemble::from_flat_arrays(&arrays)?;
    println!(
        "Imported {} trees ({} nodes, max depth {})",
        ensemble.n_trees(),
        ensemble.n_nodes(),
        ensemble.max_depth()
    );

    let config = ClassifierConfig::builder()
        .traversal(TraversalKind::Unrolled)
        .n_threads(0)
        .build()?;
    let meta = EnsembleMeta::for_ensemble(&ensemble);
    let clf = ForestClassifier::from_parts(ensemble, meta, config);

    // =========================================================================
    // Classify single windows
    // =========================================================================
    let windows: [(&str, [f64; N_FEATURES]); 3] = [
        ("cruising", [0.05, 0.30, 12.0, 0.4, 6.0, 0.9]),
        ("loitering", [0.40, 0.02, 3.5, 2.9, 1.2, 2.6]),
        ("borderline", [0.20, 0.10, 6.0, 1.5, 2.3, 2.0]),
    ];

    for (name, window) in &windows {
        let raw: Vec<i32> = window.iter().copied().map(quantize).collect();
        let fv = features::try_from_slice(&raw)?;
        let votes = clf.vote_count(&fv);
        println!("{name:>10}: votes {votes} -> class {}", clf.predict(&fv).as_u8());
    }

    // Values outside the 16-bit range are rejected at the boundary.
    let overflow = [0, 0, quantize(500.0), 0, 0, 0];
    if let Err(err) = clf.predict_raw(&overflow) {
        println!("rejected window: {err}");
    }

    // =========================================================================
    // Classify a batch
    // =========================================================================
    let n_rows = 1_000;
    let batch = Array2::from_shape_fn((n_rows, N_FEATURES), |(row, col)| {
        let phase = (row * (col + 3)) as f64 * 0.01;
        quantize(1.5 + 1.5 * phase.sin()) as i16
    });
    let labels = clf.predict_batch(batch.view())?;
    let positives = labels.iter().filter(|l| l.is_positive()).count();
    println!("batch: {positives}/{n_rows} windows flagged");

    Ok(())
}
