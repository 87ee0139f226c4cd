//! Sampling helpers shared by the table generators.

use chrono::{Days, Months, NaiveDate};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;

use crate::errors::GenerationError;

/// A fixed catalog sampled with integer weights.
#[derive(Debug, Clone)]
pub struct Weighted<T: Copy> {
    items: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T: Copy> Weighted<T> {
    pub fn new(entries: &[(T, u32)]) -> Result<Self, GenerationError> {
        let index = WeightedIndex::new(entries.iter().map(|(_, weight)| *weight))
            .map_err(|err| GenerationError::InvalidWeights(err.to_string()))?;
        Ok(Self {
            items: entries.iter().map(|(item, _)| *item).collect(),
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.items[self.index.sample(rng)]
    }
}

/// Uniform pick from a catalog.
pub fn pick<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    items: &'a [T],
    catalog: &'static str,
) -> Result<&'a T, GenerationError> {
    items.choose(rng).ok_or(GenerationError::EmptyCatalog(catalog))
}

/// Uniform date in `[start, end]`. Collapses to `start` when the range is empty.
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    let offset = rng.random_range(0..=span as u64);
    start.checked_add_days(Days::new(offset)).unwrap_or(end)
}

/// `date + days`, failing instead of overflowing the calendar.
pub fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, GenerationError> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| GenerationError::DateOutOfRange(format!("{date} + {days} days")))
}

pub fn sub_months(date: NaiveDate, months: u32) -> Result<NaiveDate, GenerationError> {
    date.checked_sub_months(Months::new(months))
        .ok_or_else(|| GenerationError::DateOutOfRange(format!("{date} - {months} months")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_between_is_inclusive_and_collapses() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 3);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let value = date_between(&mut rng, start, end);
            assert!(value >= start && value <= end);
            seen.insert(value);
        }
        assert_eq!(seen.len(), 3);

        assert_eq!(date_between(&mut rng, end, start), end);
        assert_eq!(date_between(&mut rng, start, start), start);
    }

    #[test]
    fn zero_weight_items_are_never_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let weighted = Weighted::new(&[("a", 0), ("b", 3)]).unwrap();
        for _ in 0..100 {
            assert_eq!(weighted.sample(&mut rng), "b");
        }
    }

    #[test]
    fn invalid_weights_are_reported() {
        assert!(matches!(
            Weighted::new(&[("a", 0), ("b", 0)]),
            Err(GenerationError::InvalidWeights(_))
        ));
        let empty: &[(&str, u32)] = &[];
        assert!(Weighted::new(empty).is_err());
    }

    #[test]
    fn pick_from_empty_catalog_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let empty: [u8; 0] = [];
        assert!(matches!(
            pick(&mut rng, &empty, "marca"),
            Err(GenerationError::EmptyCatalog("marca"))
        ));
    }
}
