//! Startup demo data seeding behind the `demo-data` feature.
//!
//! Generates a deterministic cohort of personas, companies, postings, and
//! posts, and inserts it through the same repository ports the handlers
//! use. Seeding is skipped when the cohort's first persona already exists
//! so restarts do not duplicate data.

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;

use backend::domain::{
    CivicId, Company, CompanyDraft, CommunityPost, ExperienceLevel, FounderProfile,
    FounderProfileDraft, FundingStage, InvestorProfile, InvestorProfileDraft, JobPosting,
    JobPostingDraft, JobseekerProfile, JobseekerProfileDraft, PostingStatus, User, UserRole,
};
use demo_data::{
    CohortConfig, DemoCohort, DemoFounderSeed, DemoInvestorSeed, DemoJobseekerSeed,
    ExperienceLevelSeed, FundingStageSeed, generate_demo_cohort,
};

use super::state_builders::BackendHandles;

/// Generate and insert the demo cohort unless it is already present.
pub(crate) async fn seed_demo_data(
    handles: &BackendHandles,
    config: &CohortConfig,
) -> Result<()> {
    let cohort = generate_demo_cohort(config).wrap_err("demo cohort generation failed")?;

    if let Some(sentinel) = cohort.founders.first() {
        let civic_id = CivicId::new(&sentinel.civic_id)
            .map_err(|err| eyre!("generated civic id rejected: {err}"))?;
        let existing = handles
            .users
            .find_by_civic_id(&civic_id)
            .await
            .wrap_err("demo seed presence check failed")?;
        if existing.is_some() {
            info!("demo cohort already seeded, skipping");
            return Ok(());
        }
    }

    insert_cohort(handles, &cohort).await?;
    info!(
        founders = cohort.founders.len(),
        investors = cohort.investors.len(),
        jobseekers = cohort.jobseekers.len(),
        posts = cohort.posts.len(),
        "demo cohort seeded"
    );
    Ok(())
}

async fn insert_cohort(handles: &BackendHandles, cohort: &DemoCohort) -> Result<()> {
    for founder in &cohort.founders {
        insert_founder(handles, founder).await?;
    }
    for investor in &cohort.investors {
        insert_investor(handles, investor).await?;
    }
    for jobseeker in &cohort.jobseekers {
        insert_jobseeker(handles, jobseeker).await?;
    }
    for post in &cohort.posts {
        let post = CommunityPost::compose(
            post.id,
            post.author_id,
            post.content.clone(),
            Utc::now(),
        )
        .map_err(|err| eyre!("generated post rejected: {err}"))?;
        handles
            .posts
            .insert(&post)
            .await
            .wrap_err("demo post insert failed")?;
    }
    Ok(())
}

async fn insert_founder(handles: &BackendHandles, seed: &DemoFounderSeed) -> Result<()> {
    let user = User::try_from_strings(
        seed.id,
        &seed.civic_id,
        seed.email.clone(),
        seed.name.clone(),
        vec![UserRole::Founder],
    )
    .map_err(|err| eyre!("generated founder rejected: {err}"))?;
    handles
        .users
        .insert(&user)
        .await
        .wrap_err("demo founder insert failed")?;

    let company_count = i32::try_from(seed.companies.len()).unwrap_or(i32::MAX);
    let profile = FounderProfile::new(FounderProfileDraft {
        user_id: seed.id,
        company_count,
        cofounders: Vec::new(),
        bio: Some(seed.bio.clone()),
        achievements: seed.achievements.clone(),
    })
    .map_err(|err| eyre!("generated founder profile rejected: {err}"))?;
    handles
        .profiles
        .upsert_founder(&profile)
        .await
        .wrap_err("demo founder profile upsert failed")?;

    for company_seed in &seed.companies {
        let company = Company::new(CompanyDraft {
            id: company_seed.id,
            founder_id: seed.id,
            name: company_seed.name.clone(),
            industry: company_seed.industry.clone(),
            stage: map_stage(company_seed.stage),
            valuation: company_seed.valuation,
        })
        .map_err(|err| eyre!("generated company rejected: {err}"))?;
        handles
            .companies
            .insert(&company)
            .await
            .wrap_err("demo company insert failed")?;

        for posting_seed in &company_seed.postings {
            let posting = JobPosting::new(JobPostingDraft {
                id: posting_seed.id,
                company_id: company_seed.id,
                title: posting_seed.title.clone(),
                skills_required: posting_seed.skills_required.clone(),
                status: PostingStatus::Open,
            })
            .map_err(|err| eyre!("generated posting rejected: {err}"))?;
            handles
                .postings
                .insert(&posting)
                .await
                .wrap_err("demo posting insert failed")?;
        }
    }
    Ok(())
}

async fn insert_investor(handles: &BackendHandles, seed: &DemoInvestorSeed) -> Result<()> {
    let user = User::try_from_strings(
        seed.id,
        &seed.civic_id,
        seed.email.clone(),
        seed.name.clone(),
        vec![UserRole::Investor],
    )
    .map_err(|err| eyre!("generated investor rejected: {err}"))?;
    handles
        .users
        .insert(&user)
        .await
        .wrap_err("demo investor insert failed")?;

    let profile = InvestorProfile::new(InvestorProfileDraft {
        user_id: seed.id,
        firm_name: seed.firm_name.clone(),
        check_size_min: seed.check_size_min,
        check_size_max: seed.check_size_max,
        preferred_stages: seed.preferred_stages.iter().copied().map(map_stage).collect(),
        preferred_industries: seed.preferred_industries.clone(),
    })
    .map_err(|err| eyre!("generated investor profile rejected: {err}"))?;
    handles
        .profiles
        .upsert_investor(&profile)
        .await
        .wrap_err("demo investor profile upsert failed")?;
    Ok(())
}

async fn insert_jobseeker(handles: &BackendHandles, seed: &DemoJobseekerSeed) -> Result<()> {
    let user = User::try_from_strings(
        seed.id,
        &seed.civic_id,
        seed.email.clone(),
        seed.name.clone(),
        vec![UserRole::Jobseeker],
    )
    .map_err(|err| eyre!("generated jobseeker rejected: {err}"))?;
    handles
        .users
        .insert(&user)
        .await
        .wrap_err("demo jobseeker insert failed")?;

    let profile = JobseekerProfile::new(JobseekerProfileDraft {
        user_id: seed.id,
        skills: seed.skills.clone(),
        experience_level: map_level(seed.experience_level),
        resume_url: None,
        portfolio_url: None,
    })
    .map_err(|err| eyre!("generated jobseeker profile rejected: {err}"))?;
    handles
        .profiles
        .upsert_jobseeker(&profile)
        .await
        .wrap_err("demo jobseeker profile upsert failed")?;
    Ok(())
}

const fn map_stage(seed: FundingStageSeed) -> FundingStage {
    match seed {
        FundingStageSeed::PreSeed => FundingStage::PreSeed,
        FundingStageSeed::Seed => FundingStage::Seed,
        FundingStageSeed::SeriesA => FundingStage::SeriesA,
        FundingStageSeed::SeriesB => FundingStage::SeriesB,
        FundingStageSeed::Growth => FundingStage::Growth,
    }
}

const fn map_level(seed: ExperienceLevelSeed) -> ExperienceLevel {
    match seed {
        ExperienceLevelSeed::Junior => ExperienceLevel::Junior,
        ExperienceLevelSeed::Mid => ExperienceLevel::Mid,
        ExperienceLevelSeed::Senior => ExperienceLevel::Senior,
        ExperienceLevelSeed::Lead => ExperienceLevel::Lead,
    }
}
