use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::errors::GenerationError;

/// Textual template of an entity code: `<prefix><n>` with `n` in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTemplate {
    pub prefix: &'static str,
    pub min: u32,
    pub max: u32,
}

impl CodeTemplate {
    pub const WELL: CodeTemplate = CodeTemplate::new("POCO_", 100, 6_606);
    pub const EQUIPMENT: CodeTemplate = CodeTemplate::new("EQUIP_", 100, 9_999);
    pub const PRODUCTION: CodeTemplate = CodeTemplate::new("PROD-", 1, 9_999);
    pub const INCIDENT: CodeTemplate = CodeTemplate::new("INC-", 1, 9_999);

    pub const fn new(prefix: &'static str, min: u32, max: u32) -> Self {
        Self { prefix, min, max }
    }

    /// Number of distinct codes the template can produce.
    pub fn capacity(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    pub fn format(&self, n: u32) -> String {
        format!("{}{}", self.prefix, n)
    }

    /// True when `code` is one this template can produce.
    pub fn matches(&self, code: &str) -> bool {
        code.strip_prefix(self.prefix)
            .filter(|digits| !digits.starts_with('0') || *digits == "0")
            .and_then(|digits| digits.parse::<u32>().ok())
            .is_some_and(|n| (self.min..=self.max).contains(&n))
    }
}

/// Mints unique codes by rejection sampling against an avoid-set.
///
/// The avoid-set is the union of the caller's persisted codes and every code
/// minted by this allocator. Each draw is bounded by `max_attempts`.
#[derive(Debug)]
pub struct CodeAllocator<'a> {
    template: CodeTemplate,
    existing: Option<&'a HashSet<String>>,
    minted: HashSet<String>,
    max_attempts: u32,
}

impl<'a> CodeAllocator<'a> {
    pub fn new(
        template: CodeTemplate,
        existing: Option<&'a HashSet<String>>,
        max_attempts: u32,
    ) -> Self {
        Self {
            template,
            existing,
            minted: HashSet::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Codes of the template that are neither persisted nor minted yet.
    pub fn available(&self) -> usize {
        let persisted = self
            .existing
            .map(|codes| {
                codes
                    .iter()
                    .filter(|code| self.template.matches(code) && !self.minted.contains(*code))
                    .count()
            })
            .unwrap_or(0);
        self.template
            .capacity()
            .saturating_sub(persisted)
            .saturating_sub(self.minted.len())
    }

    /// Fail fast when `requested` codes cannot fit the unused space.
    pub fn ensure_capacity(&self, requested: usize) -> Result<(), GenerationError> {
        let available = self.available();
        if requested > available {
            return Err(GenerationError::CodeSpaceExhausted {
                prefix: self.template.prefix,
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Mint one unused code.
    ///
    /// Draws at random up to `max_attempts` times, then picks among the
    /// remaining free codes. Fails only when the template has none left.
    pub fn allocate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, GenerationError> {
        for _ in 0..self.max_attempts {
            let code = self
                .template
                .format(rng.random_range(self.template.min..=self.template.max));
            if self.is_taken(&code) {
                continue;
            }
            self.minted.insert(code.clone());
            return Ok(code);
        }

        let free: Vec<String> = (self.template.min..=self.template.max)
            .map(|n| self.template.format(n))
            .filter(|code| !self.is_taken(code))
            .collect();
        let code = free
            .choose(rng)
            .cloned()
            .ok_or(GenerationError::CodeRetriesExhausted {
                prefix: self.template.prefix,
                attempts: self.max_attempts,
            })?;
        self.minted.insert(code.clone());
        Ok(code)
    }

    fn is_taken(&self, code: &str) -> bool {
        self.minted.contains(code) || self.existing.is_some_and(|codes| codes.contains(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn template_matches_only_its_range() {
        let template = CodeTemplate::WELL;
        assert!(template.matches("POCO_100"));
        assert!(template.matches("POCO_6606"));
        assert!(!template.matches("POCO_99"));
        assert!(!template.matches("POCO_6607"));
        assert!(!template.matches("POCO_0100"));
        assert!(!template.matches("EQUIP_100"));
        assert_eq!(template.capacity(), 6_507);
    }

    #[test]
    fn allocator_never_reuses_existing_or_minted_codes() {
        let existing: HashSet<String> = (1..=9).map(|n| format!("T-{n}")).collect();
        let template = CodeTemplate::new("T-", 1, 12);
        let mut allocator = CodeAllocator::new(template, Some(&existing), 10_000);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(allocator.available(), 3);
        let mut minted = HashSet::new();
        for _ in 0..3 {
            let code = allocator.allocate(&mut rng).expect("free code");
            assert!(!existing.contains(&code));
            assert!(minted.insert(code));
        }
        assert_eq!(allocator.available(), 0);
        assert!(matches!(
            allocator.ensure_capacity(1),
            Err(GenerationError::CodeSpaceExhausted { available: 0, .. })
        ));
        assert!(matches!(
            allocator.allocate(&mut rng),
            Err(GenerationError::CodeRetriesExhausted { attempts: 10_000, .. })
        ));
    }

    #[test]
    fn foreign_codes_do_not_shrink_capacity() {
        let existing: HashSet<String> = ["legacy-1".to_string(), "T-3".to_string()].into();
        let allocator = CodeAllocator::new(CodeTemplate::new("T-", 1, 5), Some(&existing), 10);
        assert_eq!(allocator.available(), 4);
        assert!(allocator.ensure_capacity(4).is_ok());
    }

    #[test]
    fn last_free_codes_are_found_when_random_draws_give_up() {
        let existing: HashSet<String> = (1..=95).map(|n| format!("T-{n}")).collect();
        let template = CodeTemplate::new("T-", 1, 100);
        let mut allocator = CodeAllocator::new(template, Some(&existing), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let mut minted = HashSet::new();
        for _ in 0..5 {
            let code = allocator.allocate(&mut rng).expect("free code left");
            assert!(!existing.contains(&code));
            assert!(minted.insert(code));
        }
        let expected: HashSet<String> = (96..=100).map(|n| format!("T-{n}")).collect();
        assert_eq!(minted, expected);
        assert!(matches!(
            allocator.allocate(&mut rng),
            Err(GenerationError::CodeRetriesExhausted { attempts: 1, .. })
        ));
    }
}
