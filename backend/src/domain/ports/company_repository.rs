//! Port for company persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Company;

/// Errors raised by company repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompanyRepositoryError {
    /// Repository connection could not be established.
    #[error("company repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("company repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// A stored row failed domain validation on load.
    #[error("stored company failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for company storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a new company.
    async fn insert(&self, company: &Company) -> Result<(), CompanyRepositoryError>;

    /// Fetch a company by id.
    async fn find_by_id(
        &self,
        company_id: Uuid,
    ) -> Result<Option<Company>, CompanyRepositoryError>;

    /// List companies founded by `founder_id`, ordered by name.
    async fn list_by_founder(
        &self,
        founder_id: Uuid,
    ) -> Result<Vec<Company>, CompanyRepositoryError>;

    /// List all companies, ordered by name.
    ///
    /// Backs the investor-facing browse surfaces; the platform is small
    /// enough that pagination is deferred until it is needed.
    async fn list_all(&self) -> Result<Vec<Company>, CompanyRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct FixtureCompanyRepository {
    companies: Mutex<HashMap<Uuid, Company>>,
}

impl FixtureCompanyRepository {
    /// Pre-load a company, replacing any previous entry with the same id.
    pub fn seed(&self, company: Company) {
        self.lock().insert(company.id(), company);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Company>> {
        self.companies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn sorted_by_name(mut companies: Vec<Company>) -> Vec<Company> {
    companies.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
    companies
}

#[async_trait]
impl CompanyRepository for FixtureCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<(), CompanyRepositoryError> {
        self.lock().insert(company.id(), company.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        company_id: Uuid,
    ) -> Result<Option<Company>, CompanyRepositoryError> {
        Ok(self.lock().get(&company_id).cloned())
    }

    async fn list_by_founder(
        &self,
        founder_id: Uuid,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let companies = self
            .lock()
            .values()
            .filter(|company| company.founder_id() == founder_id)
            .cloned()
            .collect();
        Ok(sorted_by_name(companies))
    }

    async fn list_all(&self) -> Result<Vec<Company>, CompanyRepositoryError> {
        let companies = self.lock().values().cloned().collect();
        Ok(sorted_by_name(companies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanyDraft, FundingStage};

    fn company(founder_id: Uuid, name: &str) -> Company {
        Company::new(CompanyDraft {
            id: Uuid::new_v4(),
            founder_id,
            name: name.to_owned(),
            industry: "DevTools".to_owned(),
            stage: FundingStage::Seed,
            valuation: 1_000_000,
        })
        .expect("valid company")
    }

    #[tokio::test]
    async fn fixture_lists_companies_per_founder_sorted_by_name() {
        let repo = FixtureCompanyRepository::default();
        let founder = Uuid::new_v4();
        repo.insert(&company(founder, "Zephyr")).await.expect("insert");
        repo.insert(&company(founder, "Anvil")).await.expect("insert");
        repo.insert(&company(Uuid::new_v4(), "Other"))
            .await
            .expect("insert");

        let listed = repo.list_by_founder(founder).await.expect("list");
        let names: Vec<_> = listed.iter().map(Company::name).collect();
        assert_eq!(names, vec!["Anvil", "Zephyr"]);
    }

    #[tokio::test]
    async fn fixture_find_returns_none_for_unknown_ids() {
        let repo = FixtureCompanyRepository::default();
        let found = repo.find_by_id(Uuid::new_v4()).await.expect("lookup");
        assert!(found.is_none());
    }
}
