//! # Rare-Token Batch Reweighting
//!
//! Turns a batch of target-id sequences into a per-position loss-weight
//! matrix. Within each row, positions holding rare ids are amplified and
//! positions holding frequent ids are damped, while the total weight mass
//! over weighted positions is preserved: the output weights of the
//! positions with defined table entries always sum to the count of those
//! positions. Positions whose id has no table entry get weight 0 and are
//! excluded from the loss entirely.

use num_traits::{Float, FromPrimitive};

use crate::frequency::WeightTable;

/// Options for [`reweight_batch`].
#[derive(Debug, Clone)]
pub struct ReweightOptions {
    /// The reweighting exponent applied to each table weight.
    pub alpha: f64,

    /// Exponentiate `ln(weight)` instead of `weight`.
    pub log_weight: bool,

    /// Multiplicative decay applied to `alpha` per decay step.
    pub alpha_decay: f64,

    /// The number of decay steps taken so far (training progress).
    pub decay_steps: u32,
}

impl ReweightOptions {
    /// Create new options with no log mode and no decay.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            log_weight: false,
            alpha_decay: 1.0,
            decay_steps: 0,
        }
    }

    /// Sets log-weight mode.
    pub fn with_log_weight(
        self,
        log_weight: bool,
    ) -> Self {
        Self { log_weight, ..self }
    }

    /// Sets the per-step alpha decay factor.
    pub fn with_alpha_decay(
        self,
        alpha_decay: f64,
    ) -> Self {
        Self {
            alpha_decay,
            ..self
        }
    }

    /// Sets the number of decay steps taken so far.
    pub fn with_decay_steps(
        self,
        decay_steps: u32,
    ) -> Self {
        Self {
            decay_steps,
            ..self
        }
    }

    /// The effective exponent: `alpha * alpha_decay^decay_steps`.
    ///
    /// Monotonically shrinks toward 0 as `decay_steps` grows (for decay
    /// factors below 1), annealing the reweighting strength over training.
    pub fn effective_alpha(&self) -> f64 {
        self.alpha_decay.powi(self.decay_steps as i32) * self.alpha
    }
}

/// Reweight a batch of target-id rows into a same-shape weight matrix.
///
/// Weights are computed in `F`, matching the batch's float precision.
/// For each row: ids with a table entry contribute
/// `raw = ln(w)^alpha` (log mode) or `w^alpha`, and are emitted as
/// `raw / sum(raw) * count`, so the emitted weights over those positions
/// sum to their count. Ids without a table entry are emitted as 0.
///
/// A row whose present ids all produce raw weight 0 (reachable only in
/// log mode when every present weight is exactly 1) is detected and
/// zero-filled; no division by the zero mass is attempted.
pub fn reweight_batch<F>(
    batch: &[Vec<usize>],
    weights: &WeightTable,
    options: &ReweightOptions,
) -> Vec<Vec<F>>
where
    F: Float + FromPrimitive,
{
    let alpha = F::from_f64(options.effective_alpha()).unwrap();
    batch
        .iter()
        .map(|row| reweight_row(row, weights, alpha, options.log_weight))
        .collect()
}

fn reweight_row<F>(
    row: &[usize],
    weights: &WeightTable,
    alpha: F,
    log_weight: bool,
) -> Vec<F>
where
    F: Float + FromPrimitive,
{
    let raw: Vec<Option<F>> = row
        .iter()
        .map(|&id| {
            weights.get(id).and_then(F::from_f64).map(|w| {
                let base = if log_weight { w.ln() } else { w };
                base.powf(alpha)
            })
        })
        .collect();

    let known = raw.iter().flatten().count();
    let mass = raw.iter().flatten().fold(F::zero(), |acc, &w| acc + w);

    if known > 0 && mass.is_zero() {
        log::debug!("degenerate reweight row: {known} known ids with zero weight mass");
        return vec![F::zero(); row.len()];
    }

    let scale = F::from_usize(known).unwrap();
    raw.into_iter()
        .map(|r| match r {
            Some(w) => w / mass * scale,
            None => F::zero(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{frequency::analyze_frequency, types::PMHashMap};

    const EPS: f64 = 1e-9;

    fn test_table() -> WeightTable {
        // Corpus "4 4 4 5 5 6": counts {4: 3, 5: 2, 6: 1, EOS: 1}, total 7.
        let dir = tempdir::TempDir::new("reweight_test").unwrap();
        let ids_path = dir.path().join("train.ids");
        std::fs::write(&ids_path, "4 4 4 5 5 6\n").unwrap();
        analyze_frequency(&ids_path).unwrap()
    }

    fn unit_table(ids: &[usize]) -> WeightTable {
        let counts: PMHashMap<usize, crate::types::Count> =
            ids.iter().map(|&id| (id, 1)).collect();
        // Every id counted once: weight = total / 1 = ids.len().
        WeightTable::from_counts(&counts)
    }

    #[test]
    fn test_row_sum_invariant() {
        let table = test_table();
        let batch = vec![vec![4, 5, 6], vec![4, 4, 5, 6, 6]];
        let out: Vec<Vec<f64>> = reweight_batch(&batch, &table, &ReweightOptions::new(1.0));

        for (row, expected) in out.iter().zip([3.0, 5.0]) {
            let sum: f64 = row.iter().sum();
            assert!((sum - expected).abs() < EPS, "row sum {sum} != {expected}");
        }
    }

    #[test]
    fn test_rare_ids_amplified() {
        let table = test_table();
        let out: Vec<Vec<f64>> =
            reweight_batch(&[vec![4, 5, 6]], &table, &ReweightOptions::new(1.0));
        let row = &out[0];
        // Id 6 is rarest, id 4 most frequent.
        assert!(row[2] > row[1]);
        assert!(row[1] > row[0]);
    }

    #[test]
    fn test_unknown_ids_get_zero() {
        let table = test_table();
        let out: Vec<Vec<f64>> =
            reweight_batch(&[vec![4, 99, 4]], &table, &ReweightOptions::new(1.0));
        let row = &out[0];
        assert_eq!(row[1], 0.0);
        // The two known positions still carry mass 2.
        assert!((row[0] + row[2] - 2.0).abs() < EPS);
    }

    #[test]
    fn test_all_unknown_row() {
        let table = test_table();
        let out: Vec<Vec<f64>> =
            reweight_batch(&[vec![100, 101]], &table, &ReweightOptions::new(1.0));
        assert_eq!(out, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn test_alpha_decay_anneals_toward_uniform() {
        let table = test_table();
        let options = ReweightOptions::new(1.0)
            .with_alpha_decay(0.5)
            .with_decay_steps(2);
        assert!((options.effective_alpha() - 0.25).abs() < EPS);

        let strong: Vec<Vec<f64>> =
            reweight_batch(&[vec![4, 6]], &table, &ReweightOptions::new(1.0));
        let annealed: Vec<Vec<f64>> = reweight_batch(&[vec![4, 6]], &table, &options);

        // Annealing shrinks the spread between rare and frequent ids.
        let spread = |row: &[f64]| row[1] - row[0];
        assert!(spread(&annealed[0]) < spread(&strong[0]));
        assert!(spread(&annealed[0]) > 0.0);
    }

    #[test]
    fn test_log_weight_mode() {
        let table = test_table();
        let options = ReweightOptions::new(1.0).with_log_weight(true);
        let out: Vec<Vec<f64>> = reweight_batch(&[vec![4, 5, 6]], &table, &options);

        let row = &out[0];
        let sum: f64 = row.iter().sum();
        assert!((sum - 3.0).abs() < EPS);
        assert!(row[2] > row[0]);
    }

    #[test]
    fn test_degenerate_log_row_is_zero_filled() {
        // Single-id corpus: that id's weight is exactly total/total = 1,
        // so ln(1)^alpha = 0 for every present position.
        let table = unit_table(&[9]);
        let options = ReweightOptions::new(1.0).with_log_weight(true);
        let out: Vec<Vec<f64>> = reweight_batch(&[vec![9, 9]], &table, &options);

        assert_eq!(out, vec![vec![0.0, 0.0]]);
        assert!(out[0].iter().all(|w| !w.is_nan()));
    }

    #[test]
    fn test_f32_precision() {
        let table = test_table();
        let out: Vec<Vec<f32>> =
            reweight_batch(&[vec![4, 5, 6]], &table, &ReweightOptions::new(0.5));
        let sum: f32 = out[0].iter().sum();
        assert!((sum - 3.0).abs() < 1e-5);
    }
}
