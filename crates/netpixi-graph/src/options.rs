use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// How a graph is loaded and first shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Canvas width in pixels.
    pub width: f64,
    /// Width over height.
    pub aspect: f64,
    /// Rescale input coordinates to fill the canvas.
    pub normalize: bool,
    /// Let the lower-degree endpoint lead each edge.
    pub broker: bool,
    /// Seed for coordinates drawn at random; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            aspect: 16.0 / 9.0,
            normalize: true,
            broker: false,
            seed: None,
        }
    }
}

impl ViewOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn height(&self) -> f64 {
        self.width / self.aspect
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
