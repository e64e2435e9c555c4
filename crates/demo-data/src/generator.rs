//! Deterministic cohort generation from a numeric seed.
//!
//! This module provides the core generation function that produces a
//! reproducible demo cohort. The same configuration always produces
//! identical output, so repeated seeding runs are idempotent.

use fake::Fake;
use fake::faker::company::raw::{Bs, CatchPhrase, CompanyName};
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::seed::{
    DemoCohort, DemoCompanySeed, DemoFounderSeed, DemoInvestorSeed, DemoJobseekerSeed,
    DemoPostSeed, DemoPostingSeed, ExperienceLevelSeed, FundingStageSeed,
};
use crate::validation::{PERSONA_NAME_MAX, email_local_part, is_valid_persona_name};

/// Maximum number of attempts to generate a valid persona name.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Minimum number of companies per founder.
const MIN_COMPANIES: usize = 1;

/// Maximum number of companies per founder.
const MAX_COMPANIES: usize = 2;

/// Maximum number of postings per company.
const MAX_POSTINGS: usize = 2;

/// Minimum number of skills per jobseeker.
const MIN_SKILLS: usize = 2;

/// Maximum number of skills per jobseeker.
const MAX_SKILLS: usize = 5;

/// Minimum number of preferred industries per investor.
const MIN_PREFERRED_INDUSTRIES: usize = 1;

/// Maximum number of preferred industries per investor.
const MAX_PREFERRED_INDUSTRIES: usize = 3;

/// Maximum number of achievement blurbs per founder.
const MAX_ACHIEVEMENTS: usize = 3;

/// Domain used for generated contact addresses.
const EMAIL_DOMAIN: &str = "demo.venturemesh.io";

/// Industry labels shared by companies and investor preferences.
const INDUSTRIES: [&str; 8] = [
    "fintech",
    "healthtech",
    "climate",
    "devtools",
    "edtech",
    "logistics",
    "ai",
    "consumer",
];

/// Skill labels shared by jobseekers and job postings.
const SKILLS: [&str; 10] = [
    "rust",
    "typescript",
    "react",
    "postgres",
    "product",
    "sales",
    "design",
    "data",
    "devops",
    "marketing",
];

/// Role titles for generated postings.
const TITLES: [&str; 6] = [
    "Founding Engineer",
    "Product Designer",
    "Growth Lead",
    "Platform Engineer",
    "Data Scientist",
    "Developer Advocate",
];

/// Configuration for cohort generation.
///
/// The defaults produce a small cohort suitable for local demonstration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortConfig {
    /// RNG seed; equal seeds produce equal cohorts.
    pub seed: u64,
    /// Number of founder personas.
    pub founder_count: usize,
    /// Number of investor personas.
    pub investor_count: usize,
    /// Number of jobseeker personas.
    pub jobseeker_count: usize,
    /// Number of community posts.
    pub post_count: usize,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            seed: 2024,
            founder_count: 4,
            investor_count: 3,
            jobseeker_count: 5,
            post_count: 8,
        }
    }
}

/// Generates a demo cohort from the provided configuration.
///
/// Uses the configuration's `seed` to initialise a deterministic RNG,
/// ensuring identical output for the same configuration. Generated personas
/// carry stable civic identifiers (`demo-founder-01`, ...) so a seeding run
/// against a store that already contains the cohort is a no-op upsert.
///
/// # Errors
///
/// Returns [`GenerationError`] if:
/// - Persona name generation fails after maximum retries
/// - Posts are requested but the cohort has no personas to author them
///
/// # Example
///
/// ```
/// use demo_data::{CohortConfig, generate_demo_cohort};
///
/// let config = CohortConfig { post_count: 2, ..CohortConfig::default() };
/// let cohort = generate_demo_cohort(&config).expect("generated");
///
/// assert_eq!(cohort.posts.len(), 2);
/// // Same config produces an identical cohort.
/// let again = generate_demo_cohort(&config).expect("generated");
/// assert_eq!(cohort, again);
/// ```
pub fn generate_demo_cohort(config: &CohortConfig) -> Result<DemoCohort, GenerationError> {
    let persona_total = config.founder_count + config.investor_count + config.jobseeker_count;
    if config.post_count > 0 && persona_total == 0 {
        return Err(GenerationError::NoAuthorsForPosts {
            post_count: config.post_count,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut founders = Vec::with_capacity(config.founder_count);
    for index in 0..config.founder_count {
        founders.push(generate_founder(&mut rng, index)?);
    }

    let mut investors = Vec::with_capacity(config.investor_count);
    for index in 0..config.investor_count {
        investors.push(generate_investor(&mut rng, index)?);
    }

    let mut jobseekers = Vec::with_capacity(config.jobseeker_count);
    for index in 0..config.jobseeker_count {
        jobseekers.push(generate_jobseeker(&mut rng, index)?);
    }

    let author_ids: Vec<Uuid> = founders
        .iter()
        .map(|founder| founder.id)
        .chain(investors.iter().map(|investor| investor.id))
        .chain(jobseekers.iter().map(|jobseeker| jobseeker.id))
        .collect();
    let posts = generate_posts(&mut rng, &author_ids, config.post_count);

    Ok(DemoCohort {
        founders,
        investors,
        jobseekers,
        posts,
    })
}

fn generate_founder(
    rng: &mut ChaCha8Rng,
    index: usize,
) -> Result<DemoFounderSeed, GenerationError> {
    let id = Uuid::from_u128(rng.random());
    let name = generate_persona_name(rng)?;
    let bio: String = CatchPhrase(EN).fake_with_rng(rng);

    let achievement_count = rng.random_range(0..=MAX_ACHIEVEMENTS);
    let achievements = (0..achievement_count)
        .map(|_| {
            let phrase: String = Bs(EN).fake_with_rng(rng);
            format!("Helped {phrase}")
        })
        .collect();

    let company_count = rng.random_range(MIN_COMPANIES..=MAX_COMPANIES);
    let companies = (0..company_count)
        .map(|_| generate_company(rng))
        .collect();

    Ok(DemoFounderSeed {
        id,
        civic_id: demo_civic_id("founder", index),
        email: demo_email(&name),
        name,
        bio,
        achievements,
        companies,
    })
}

fn generate_company(rng: &mut ChaCha8Rng) -> DemoCompanySeed {
    let stage = pick_copy(rng, &FundingStageSeed::ALL);
    let posting_count = rng.random_range(0..=MAX_POSTINGS);
    let postings = (0..posting_count)
        .map(|_| generate_posting(rng))
        .collect();

    DemoCompanySeed {
        id: Uuid::from_u128(rng.random()),
        name: CompanyName(EN).fake_with_rng(rng),
        industry: pick_label(rng, &INDUSTRIES),
        stage,
        valuation: valuation_for_stage(rng, stage),
        postings,
    }
}

fn generate_posting(rng: &mut ChaCha8Rng) -> DemoPostingSeed {
    DemoPostingSeed {
        id: Uuid::from_u128(rng.random()),
        title: pick_label(rng, &TITLES),
        skills_required: select_labels(rng, &SKILLS, 1, 3),
    }
}

fn generate_investor(
    rng: &mut ChaCha8Rng,
    index: usize,
) -> Result<DemoInvestorSeed, GenerationError> {
    let id = Uuid::from_u128(rng.random());
    let name = generate_persona_name(rng)?;
    let firm_base: String = LastName(EN).fake_with_rng(rng);
    let check_size_min = rng.random_range(25_000..=250_000_i64);
    let multiplier = rng.random_range(2..=10_i64);

    let stage_count = rng.random_range(1..=3);
    let mut stages = FundingStageSeed::ALL.to_vec();
    stages.shuffle(rng);
    stages.truncate(stage_count);

    Ok(DemoInvestorSeed {
        id,
        civic_id: demo_civic_id("investor", index),
        email: demo_email(&name),
        name,
        firm_name: format!("{firm_base} Capital"),
        check_size_min,
        check_size_max: check_size_min.saturating_mul(multiplier),
        preferred_stages: stages,
        preferred_industries: select_labels(
            rng,
            &INDUSTRIES,
            MIN_PREFERRED_INDUSTRIES,
            MAX_PREFERRED_INDUSTRIES,
        ),
    })
}

fn generate_jobseeker(
    rng: &mut ChaCha8Rng,
    index: usize,
) -> Result<DemoJobseekerSeed, GenerationError> {
    let id = Uuid::from_u128(rng.random());
    let name = generate_persona_name(rng)?;

    Ok(DemoJobseekerSeed {
        id,
        civic_id: demo_civic_id("jobseeker", index),
        email: demo_email(&name),
        name,
        skills: select_labels(rng, &SKILLS, MIN_SKILLS, MAX_SKILLS),
        experience_level: pick_copy(rng, &ExperienceLevelSeed::ALL),
    })
}

fn generate_posts(rng: &mut ChaCha8Rng, author_ids: &[Uuid], count: usize) -> Vec<DemoPostSeed> {
    (0..count)
        .filter_map(|_| {
            let author_index = rng.random_range(0..author_ids.len().max(1));
            let author_id = author_ids.get(author_index).copied()?;
            let topic: String = Bs(EN).fake_with_rng(rng);
            Some(DemoPostSeed {
                id: Uuid::from_u128(rng.random()),
                author_id,
                content: format!("Looking for advice on how to {topic} while staying lean."),
            })
        })
        .collect()
}

/// Generates a valid persona name using the provided RNG.
///
/// Retries up to `MAX_NAME_ATTEMPTS` times if the generated name fails
/// validation. Names are first name followed by last name, truncated to the
/// maximum length preserving whole characters.
fn generate_persona_name(rng: &mut ChaCha8Rng) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);
        let candidate: String = format!("{first} {last}")
            .chars()
            .take(PERSONA_NAME_MAX)
            .collect();

        if is_valid_persona_name(&candidate) {
            return Ok(candidate);
        }
    }

    Err(GenerationError::PersonaNameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}

fn demo_civic_id(role: &str, index: usize) -> String {
    format!("demo-{role}-{:02}", index + 1)
}

fn demo_email(name: &str) -> String {
    format!("{}@{EMAIL_DOMAIN}", email_local_part(name))
}

fn valuation_for_stage(rng: &mut ChaCha8Rng, stage: FundingStageSeed) -> i64 {
    let (low, high) = match stage {
        FundingStageSeed::PreSeed => (500_000, 2_000_000),
        FundingStageSeed::Seed => (2_000_000, 10_000_000),
        FundingStageSeed::SeriesA => (10_000_000, 50_000_000),
        FundingStageSeed::SeriesB => (50_000_000, 200_000_000),
        FundingStageSeed::Growth => (200_000_000, 1_000_000_000),
    };
    rng.random_range(low..=high)
}

/// Picks one element from a non-empty slice of labels.
fn pick_label(rng: &mut ChaCha8Rng, labels: &[&str]) -> String {
    let index = rng.random_range(0..labels.len().max(1));
    labels.get(index).map(|s| (*s).to_owned()).unwrap_or_default()
}

/// Picks one element by copy from a non-empty slice.
fn pick_copy<T: Copy + Default>(rng: &mut ChaCha8Rng, items: &[T]) -> T {
    let index = rng.random_range(0..items.len().max(1));
    items.get(index).copied().unwrap_or_default()
}

/// Selects a deterministic subset of labels from the provided slice.
///
/// The selection count is bounded by `min_count` and `max_count`, clamped to
/// the available labels.
fn select_labels(
    rng: &mut ChaCha8Rng,
    labels: &[&str],
    min_count: usize,
    max_count: usize,
) -> Vec<String> {
    if labels.is_empty() {
        return Vec::new();
    }

    let clamped_min = min_count.min(labels.len());
    let clamped_max = max_count.min(labels.len());
    let count = if clamped_min == clamped_max {
        clamped_min
    } else {
        rng.random_range(clamped_min..=clamped_max)
    };

    let mut shuffled: Vec<String> = labels.iter().map(|s| (*s).to_owned()).collect();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn config() -> CohortConfig {
        CohortConfig::default()
    }

    #[rstest]
    fn generates_configured_counts(config: CohortConfig) {
        let cohort = generate_demo_cohort(&config).expect("generated");

        assert_eq!(cohort.founders.len(), config.founder_count);
        assert_eq!(cohort.investors.len(), config.investor_count);
        assert_eq!(cohort.jobseekers.len(), config.jobseeker_count);
        assert_eq!(cohort.posts.len(), config.post_count);
    }

    #[rstest]
    fn generation_is_deterministic(config: CohortConfig) {
        let first = generate_demo_cohort(&config).expect("generated");
        let second = generate_demo_cohort(&config).expect("generated");

        assert_eq!(first, second);
    }

    #[rstest]
    fn different_seeds_produce_different_cohorts(config: CohortConfig) {
        let other = CohortConfig {
            seed: config.seed + 1,
            ..config.clone()
        };

        let first = generate_demo_cohort(&config).expect("generated");
        let second = generate_demo_cohort(&other).expect("generated");

        assert_ne!(
            first.founders.first().map(|f| f.id),
            second.founders.first().map(|f| f.id)
        );
    }

    #[rstest]
    fn civic_ids_are_stable_and_unique(config: CohortConfig) {
        let cohort = generate_demo_cohort(&config).expect("generated");

        assert_eq!(
            cohort.founders.first().map(|f| f.civic_id.as_str()),
            Some("demo-founder-01")
        );

        let all_civic_ids: HashSet<&str> = cohort
            .founders
            .iter()
            .map(|f| f.civic_id.as_str())
            .chain(cohort.investors.iter().map(|i| i.civic_id.as_str()))
            .chain(cohort.jobseekers.iter().map(|j| j.civic_id.as_str()))
            .collect();
        let persona_total =
            cohort.founders.len() + cohort.investors.len() + cohort.jobseekers.len();
        assert_eq!(all_civic_ids.len(), persona_total);
    }

    #[rstest]
    fn all_persona_names_are_valid(config: CohortConfig) {
        let cohort = generate_demo_cohort(&config).expect("generated");

        for name in cohort
            .founders
            .iter()
            .map(|f| f.name.as_str())
            .chain(cohort.investors.iter().map(|i| i.name.as_str()))
            .chain(cohort.jobseekers.iter().map(|j| j.name.as_str()))
        {
            assert!(is_valid_persona_name(name), "invalid persona name: {name}");
        }
    }

    #[rstest]
    fn founders_have_companies_within_bounds(config: CohortConfig) {
        let cohort = generate_demo_cohort(&config).expect("generated");

        for founder in &cohort.founders {
            assert!(founder.companies.len() >= MIN_COMPANIES);
            assert!(founder.companies.len() <= MAX_COMPANIES);
        }
    }

    #[rstest]
    fn investor_check_sizes_are_ordered(config: CohortConfig) {
        let cohort = generate_demo_cohort(&config).expect("generated");

        for investor in &cohort.investors {
            assert!(
                investor.check_size_min <= investor.check_size_max,
                "check sizes out of order for {}",
                investor.civic_id
            );
        }
    }

    #[rstest]
    fn jobseeker_skills_come_from_the_catalogue(config: CohortConfig) {
        let catalogue: HashSet<&str> = SKILLS.iter().copied().collect();
        let cohort = generate_demo_cohort(&config).expect("generated");

        for jobseeker in &cohort.jobseekers {
            assert!(!jobseeker.skills.is_empty());
            for skill in &jobseeker.skills {
                assert!(catalogue.contains(skill.as_str()), "unknown skill {skill}");
            }
        }
    }

    #[rstest]
    fn posts_are_authored_by_cohort_personas(config: CohortConfig) {
        let cohort = generate_demo_cohort(&config).expect("generated");

        let persona_ids: HashSet<Uuid> = cohort
            .founders
            .iter()
            .map(|f| f.id)
            .chain(cohort.investors.iter().map(|i| i.id))
            .chain(cohort.jobseekers.iter().map(|j| j.id))
            .collect();

        for post in &cohort.posts {
            assert!(persona_ids.contains(&post.author_id));
        }
    }

    #[test]
    fn rejects_posts_without_authors() {
        let config = CohortConfig {
            seed: 1,
            founder_count: 0,
            investor_count: 0,
            jobseeker_count: 0,
            post_count: 3,
        };

        let result = generate_demo_cohort(&config);
        assert_eq!(
            result,
            Err(GenerationError::NoAuthorsForPosts { post_count: 3 })
        );
    }

    #[test]
    fn valuations_match_stage_bands() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let valuation = valuation_for_stage(&mut rng, FundingStageSeed::Seed);
            assert!((2_000_000..=10_000_000).contains(&valuation));
        }
    }

    #[test]
    fn select_labels_respects_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..100 {
            let subset = select_labels(&mut rng, &SKILLS, 2, 5);
            assert!(subset.len() >= 2, "subset too small: {}", subset.len());
            assert!(subset.len() <= 5, "subset too large: {}", subset.len());
        }
    }

    #[test]
    fn select_labels_handles_empty_slice() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let subset = select_labels(&mut rng, &[], 1, 3);
        assert!(subset.is_empty());
    }
}
