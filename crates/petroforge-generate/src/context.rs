use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random source and reference date threaded through every generator call.
///
/// Seeding the context and pinning `today` makes a whole run reproducible.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub rng: ChaCha8Rng,
    pub today: NaiveDate,
}

impl GenerationContext {
    pub fn seeded(seed: u64, today: NaiveDate) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            today,
        }
    }

    /// Unseeded context anchored at the local calendar date.
    pub fn from_os_rng() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
            today: Local::now().date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}
