use std::sync::Arc;

use parking_lot::RwLock;

use super::{Surrogate, SurrogateBuilder};
use crate::error::{Error, Result};
use crate::sample_set::SampleSet;
use crate::types::Bounds;

/// An immutable set of surrogates, one per objective, together with the
/// samples they were trained on.
///
/// Snapshots are shared behind an [`Arc`]; a retraining never alters an
/// existing snapshot, it publishes a new one with a higher
/// [`version`](Self::version).
pub struct BankSnapshot {
    version: u64,
    models: Vec<Box<dyn Surrogate>>,
    training: SampleSet,
}

impl BankSnapshot {
    /// Number of retrainings that produced this snapshot (starting at 1).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of objectives (one surrogate each).
    #[must_use]
    pub fn n_obj(&self) -> usize {
        self.models.len()
    }

    /// The surrogates, in objective order.
    #[must_use]
    pub fn models(&self) -> &[Box<dyn Surrogate>] {
        &self.models
    }

    /// The samples the surrogates were trained on.
    #[must_use]
    pub fn training(&self) -> &SampleSet {
        &self.training
    }

    /// Predicted mean of every objective at `x`.
    #[must_use]
    pub fn predict_means(&self, x: &[f64]) -> Vec<f64> {
        self.models.iter().map(|m| m.predict_mean(x)).collect()
    }

    /// Predicted mean and standard deviation of every objective at `x`.
    #[must_use]
    pub fn predict_mean_std(&self, x: &[f64]) -> (Vec<f64>, Vec<f64>) {
        self.models
            .iter()
            .map(|m| {
                let (mean, var) = m.predict(x);
                (mean, var.max(0.0).sqrt())
            })
            .unzip()
    }
}

impl core::fmt::Debug for BankSnapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BankSnapshot")
            .field("version", &self.version)
            .field("n_obj", &self.models.len())
            .field("n_samples", &self.training.len())
            .finish()
    }
}

/// Owns one trained surrogate per objective and retrains them on demand.
///
/// [`retrain`](Self::retrain) fits every surrogate first and only then swaps
/// the published snapshot, so readers observe either the previous complete
/// set or the new one.
pub struct SurrogateBank {
    builder: Arc<dyn SurrogateBuilder>,
    bounds: Bounds,
    current: RwLock<Option<Arc<BankSnapshot>>>,
}

impl SurrogateBank {
    /// Creates an empty bank that fits surrogates with `builder`.
    #[must_use]
    pub fn new(builder: Arc<dyn SurrogateBuilder>, bounds: Bounds) -> Self {
        Self {
            builder,
            bounds,
            current: RwLock::new(None),
        }
    }

    /// Trains one surrogate per objective column of `samples` and publishes
    /// them as a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SurrogateTraining`] for the first objective whose
    /// surrogate cannot be fitted; the previous snapshot stays published.
    pub fn retrain(&self, samples: &SampleSet) -> Result<Arc<BankSnapshot>> {
        if samples.is_empty() {
            return Err(Error::EmptyDesign);
        }

        let models = (0..samples.n_obj())
            .map(|objective| {
                self.builder
                    .train(samples.x(), &samples.column(objective), &self.bounds)
                    .map_err(|reason| Error::SurrogateTraining { objective, reason })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut current = self.current.write();
        let version = current.as_ref().map_or(1, |s| s.version + 1);
        let snapshot = Arc::new(BankSnapshot {
            version,
            models,
            training: samples.clone(),
        });
        *current = Some(Arc::clone(&snapshot));
        trace_debug!(version, n_samples = samples.len(), "surrogates retrained");
        Ok(snapshot)
    }

    /// The most recently published snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<BankSnapshot>> {
        self.current.read().clone()
    }

    /// The design-space bounds the surrogates are trained over.
    #[must_use]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }
}
