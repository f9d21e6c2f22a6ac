use super::{Embedder, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

/// Produces vectors of uniform random components in `[0, 1)`.
///
/// The text is ignored. Seeded embedders produce the same sequence of
/// vectors on every run, which keeps demos and tests reproducible.
pub struct RandomEmbedder {
    dimension: usize,
    rng: Mutex<StdRng>,
}

impl RandomEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(dimension: usize, seed: u64) -> Self {
        Self {
            dimension,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl Embedder for RandomEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        let mut rng = self.rng.lock().await;
        Ok((0..self.dimension).map(|_| rng.gen::<f32>()).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
