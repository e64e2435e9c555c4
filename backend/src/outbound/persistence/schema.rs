//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Platform user accounts.
    ///
    /// The `id` column is the internal join key; `civic_id` is the external
    /// identity-provider key and carries a unique index.
    users (id) {
        id -> Uuid,
        civic_id -> Varchar,
        email -> Varchar,
        name -> Varchar,
        /// Role vocabulary strings ("founder", "investor", "jobseeker").
        active_roles -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Founder persona profiles, one row per user.
    founder_profiles (user_id) {
        user_id -> Uuid,
        company_count -> Int4,
        cofounders -> Array<Text>,
        bio -> Nullable<Text>,
        achievements -> Array<Text>,
    }
}

diesel::table! {
    /// Investor persona profiles, one row per user.
    investor_profiles (user_id) {
        user_id -> Uuid,
        firm_name -> Varchar,
        check_size_min -> Int8,
        check_size_max -> Int8,
        preferred_stages -> Array<Text>,
        preferred_industries -> Array<Text>,
    }
}

diesel::table! {
    /// Jobseeker persona profiles, one row per user.
    jobseeker_profiles (user_id) {
        user_id -> Uuid,
        skills -> Array<Text>,
        experience_level -> Varchar,
        resume_url -> Nullable<Text>,
        portfolio_url -> Nullable<Text>,
    }
}

diesel::table! {
    /// Companies registered by founders.
    companies (id) {
        id -> Uuid,
        founder_id -> Uuid,
        name -> Varchar,
        industry -> Varchar,
        /// Funding stage vocabulary string ("pre-seed" through "growth").
        stage -> Varchar,
        valuation -> Int8,
    }
}

diesel::table! {
    /// Job postings advertised by companies.
    job_postings (id) {
        id -> Uuid,
        company_id -> Uuid,
        title -> Varchar,
        skills_required -> Array<Text>,
        /// Posting status vocabulary string ("open", "closed").
        status -> Varchar,
    }
}

diesel::table! {
    /// Jobseeker applications against postings.
    applications (id) {
        id -> Uuid,
        job_posting_id -> Uuid,
        jobseeker_id -> Uuid,
        /// Application status vocabulary string ("applied" onwards).
        status -> Varchar,
        cover_letter -> Nullable<Text>,
    }
}

diesel::table! {
    /// Scored idea assessments submitted by founders.
    idea_validations (id) {
        id -> Uuid,
        user_id -> Uuid,
        company_id -> Nullable<Uuid>,
        idea_text -> Text,
        score -> Int4,
        validation_result -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Investor deal pipelines with their chain sync state.
    ///
    /// `sync_state` holds the discriminator ("not-requested", "pending",
    /// "confirmed", "failed"); `tx_ref` and `failure_reason` carry the
    /// variant payloads and are null otherwise.
    deal_flows (id) {
        id -> Uuid,
        investor_id -> Uuid,
        company_id -> Uuid,
        status -> Varchar,
        investment_amount -> Int8,
        sync_state -> Varchar,
        tx_ref -> Nullable<Text>,
        failure_reason -> Nullable<Text>,
    }
}

diesel::table! {
    /// Community feed posts with their liker sets.
    community_posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        content -> Text,
        liked_by -> Array<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Idempotency records for replay-safe mutations.
    ///
    /// Keyed by `(key, mutation_type)` so the same UUID cannot collide
    /// across operation kinds.
    idempotency_keys (key, mutation_type) {
        key -> Uuid,
        user_id -> Uuid,
        mutation_type -> Varchar,
        payload_hash -> Bytea,
        response_snapshot -> Jsonb,
        created_at -> Timestamptz,
    }
}
