//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    applications, community_posts, companies, deal_flows, founder_profiles, idea_validations,
    idempotency_keys, investor_profiles, job_postings, jobseeker_profiles, users,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub civic_id: String,
    pub email: String,
    pub name: String,
    pub active_roles: Vec<String>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub civic_id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub active_roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Profile models
// ---------------------------------------------------------------------------

/// Row struct for reading from the founder_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = founder_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FounderProfileRow {
    pub user_id: Uuid,
    pub company_count: i32,
    pub cofounders: Vec<String>,
    pub bio: Option<String>,
    pub achievements: Vec<String>,
}

/// Insertable and changeset struct for writing founder profiles.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = founder_profiles)]
pub(crate) struct FounderProfileUpsert<'a> {
    pub user_id: Uuid,
    pub company_count: i32,
    pub cofounders: Vec<String>,
    pub bio: Option<&'a str>,
    pub achievements: Vec<String>,
}

/// Row struct for reading from the investor_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = investor_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvestorProfileRow {
    pub user_id: Uuid,
    pub firm_name: String,
    pub check_size_min: i64,
    pub check_size_max: i64,
    pub preferred_stages: Vec<String>,
    pub preferred_industries: Vec<String>,
}

/// Insertable and changeset struct for writing investor profiles.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = investor_profiles)]
pub(crate) struct InvestorProfileUpsert<'a> {
    pub user_id: Uuid,
    pub firm_name: &'a str,
    pub check_size_min: i64,
    pub check_size_max: i64,
    pub preferred_stages: Vec<String>,
    pub preferred_industries: Vec<String>,
}

/// Row struct for reading from the jobseeker_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jobseeker_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobseekerProfileRow {
    pub user_id: Uuid,
    pub skills: Vec<String>,
    pub experience_level: String,
    pub resume_url: Option<String>,
    pub portfolio_url: Option<String>,
}

/// Insertable and changeset struct for writing jobseeker profiles.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = jobseeker_profiles)]
pub(crate) struct JobseekerProfileUpsert<'a> {
    pub user_id: Uuid,
    pub skills: Vec<String>,
    pub experience_level: &'a str,
    pub resume_url: Option<&'a str>,
    pub portfolio_url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Company and job board models
// ---------------------------------------------------------------------------

/// Row struct for reading from the companies table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub id: Uuid,
    pub founder_id: Uuid,
    pub name: String,
    pub industry: String,
    pub stage: String,
    pub valuation: i64,
}

/// Insertable struct for creating new company records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = companies)]
pub(crate) struct NewCompanyRow<'a> {
    pub id: Uuid,
    pub founder_id: Uuid,
    pub name: &'a str,
    pub industry: &'a str,
    pub stage: &'a str,
    pub valuation: i64,
}

/// Row struct for reading from the job_postings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = job_postings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobPostingRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub skills_required: Vec<String>,
    pub status: String,
}

/// Insertable struct for creating new job posting records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = job_postings)]
pub(crate) struct NewJobPostingRow<'a> {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: &'a str,
    pub skills_required: Vec<String>,
    pub status: &'a str,
}

/// Row struct for reading from the applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: Uuid,
    pub job_posting_id: Uuid,
    pub jobseeker_id: Uuid,
    pub status: String,
    pub cover_letter: Option<String>,
}

/// Insertable struct for creating new application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub id: Uuid,
    pub job_posting_id: Uuid,
    pub jobseeker_id: Uuid,
    pub status: &'a str,
    pub cover_letter: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Idea validation models
// ---------------------------------------------------------------------------

/// Row struct for reading from the idea_validations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = idea_validations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdeaValidationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub idea_text: String,
    pub score: i32,
    pub validation_result: String,
    #[expect(dead_code, reason = "schema field used only for ordering")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new idea validation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = idea_validations)]
pub(crate) struct NewIdeaValidationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub idea_text: &'a str,
    pub score: i32,
    pub validation_result: &'a str,
}

// ---------------------------------------------------------------------------
// Deal flow models
// ---------------------------------------------------------------------------

/// Row struct for reading from the deal_flows table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deal_flows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DealFlowRow {
    pub id: Uuid,
    pub investor_id: Uuid,
    pub company_id: Uuid,
    pub status: String,
    pub investment_amount: i64,
    pub sync_state: String,
    pub tx_ref: Option<String>,
    pub failure_reason: Option<String>,
}

/// Insertable struct for creating new deal records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deal_flows)]
pub(crate) struct NewDealFlowRow<'a> {
    pub id: Uuid,
    pub investor_id: Uuid,
    pub company_id: Uuid,
    pub status: &'a str,
    pub investment_amount: i64,
    pub sync_state: &'a str,
    pub tx_ref: Option<&'a str>,
    pub failure_reason: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Community models
// ---------------------------------------------------------------------------

/// Row struct for reading from the community_posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = community_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommunityPostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub liked_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new community post records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = community_posts)]
pub(crate) struct NewCommunityPostRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: &'a str,
    pub liked_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Idempotency key models
// ---------------------------------------------------------------------------

/// Row struct for reading from the idempotency_keys table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = idempotency_keys)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdempotencyKeyRow {
    pub key: Uuid,
    pub user_id: Uuid,
    pub mutation_type: String,
    pub payload_hash: Vec<u8>,
    pub response_snapshot: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new idempotency records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = idempotency_keys)]
pub(crate) struct NewIdempotencyKeyRow<'a> {
    pub key: Uuid,
    pub user_id: Uuid,
    pub mutation_type: &'a str,
    pub payload_hash: &'a [u8],
    pub response_snapshot: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}
