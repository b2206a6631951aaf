use crate::config::SynthesisCfg;
use crate::errors::{Error, Result};
use crate::types::{Embedding, OrphanSet, Vocabulary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Draws random embeddings for orphans, uniformly from
/// `[-half_range, half_range)` in every component.
pub struct OrphanSynthesizer {
    dim: usize,
    half_range: f32,
    rng: StdRng,
}

impl OrphanSynthesizer {
    pub fn new(cfg: &SynthesisCfg, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding dimensionality must be greater than zero",
            ));
        }
        if !cfg.half_range.is_finite() || cfg.half_range <= 0.0 {
            return Err(Error::Validation(format!(
                "synthesis.half_range must be a positive finite number (got {})",
                cfg.half_range
            )));
        }

        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            dim,
            half_range: cfg.half_range,
            rng,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn synthesize(&mut self) -> Embedding {
        let bound = self.half_range;
        let values = (0..self.dim)
            .map(|_| self.rng.gen_range(-bound..bound))
            .collect();
        Embedding::new(values)
    }

    /// Gives every orphan that is not yet a vocabulary key a fresh embedding.
    ///
    /// Orphans are visited in sorted order, so a seeded synthesizer assigns
    /// the same vector to the same key across runs. Returns how many entries
    /// were added.
    pub fn extend(&mut self, vocabulary: &mut Vocabulary<Embedding>, orphans: &OrphanSet) -> usize {
        let mut added = 0;
        for orphan in orphans {
            if orphan.is_empty() || vocabulary.contains_key(orphan) {
                continue;
            }
            let embedding = self.synthesize();
            vocabulary.insert(orphan.clone(), embedding);
            added += 1;
        }

        info!(added, dim = self.dim, "synthesized orphan embeddings");
        added
    }
}
