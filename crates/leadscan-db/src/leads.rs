//! Database operations for `leads`.

use chrono::{DateTime, Utc};
use leadscan_core::{LeadRecord, LeadStatus, LeadStore, LeadStrength, PriceTier, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Largest page [`list_leads`] will return.
pub const MAX_PAGE_SIZE: i64 = 100;

const LEAD_COLUMNS: &str = "id, run_id, external_id, company_name, website, phone, address, \
     industry, source, rating, review_count, photo_count, price_tier, \
     ui_score, seo_score, tech_score, performance_score, security_score, total_score, \
     speed_score, loading_time, lead_strength, status, issues, tech_stack, \
     executive_summary, recommendations, pitch_subject, pitch_body, \
     last_checked, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `leads` table, in column types.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub run_id: Uuid,
    pub external_id: String,
    pub company_name: String,
    pub website: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: String,
    pub source: String,
    pub rating: Option<f64>,
    pub review_count: i32,
    pub photo_count: i32,
    pub price_tier: Option<i16>,
    pub ui_score: Option<i16>,
    pub seo_score: Option<i16>,
    pub tech_score: Option<i16>,
    pub performance_score: Option<i16>,
    pub security_score: Option<i16>,
    pub total_score: Option<i16>,
    pub speed_score: Option<i16>,
    pub loading_time: Option<String>,
    /// `strong`, `medium` or `weak`.
    pub lead_strength: String,
    /// `completed`, `analyzing` or `failed`.
    pub status: String,
    pub issues: Vec<String>,
    pub tech_stack: Vec<String>,
    pub executive_summary: Option<String>,
    pub recommendations: Vec<String>,
    pub pitch_subject: Option<String>,
    pub pitch_body: Option<String>,
    pub last_checked: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for LeadRecord {
    type Error = DbError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let lead_strength =
            LeadStrength::parse(&row.lead_strength).ok_or_else(|| DbError::Decode {
                column: "lead_strength",
                value: row.lead_strength.clone(),
            })?;
        let status = LeadStatus::parse(&row.status).ok_or_else(|| DbError::Decode {
            column: "status",
            value: row.status.clone(),
        })?;
        let price_tier = row
            .price_tier
            .map(|t| {
                u8::try_from(t)
                    .ok()
                    .and_then(|t| PriceTier::try_from(t).ok())
                    .ok_or_else(|| DbError::Decode {
                        column: "price_tier",
                        value: t.to_string(),
                    })
            })
            .transpose()?;

        Ok(LeadRecord {
            id: row.id,
            run_id: row.run_id,
            external_id: row.external_id,
            company_name: row.company_name,
            website: row.website,
            phone: row.phone,
            address: row.address,
            industry: row.industry,
            source: row.source,
            rating: row.rating,
            review_count: count_from_db(row.review_count),
            photo_count: count_from_db(row.photo_count),
            price_tier,
            ui_score: score_from_db("ui_score", row.ui_score)?,
            seo_score: score_from_db("seo_score", row.seo_score)?,
            tech_score: score_from_db("tech_score", row.tech_score)?,
            performance_score: score_from_db("performance_score", row.performance_score)?,
            security_score: score_from_db("security_score", row.security_score)?,
            total_score: score_from_db("total_score", row.total_score)?,
            speed_score: score_from_db("speed_score", row.speed_score)?,
            loading_time: row.loading_time,
            lead_strength,
            status,
            issues: row.issues,
            tech_stack: row.tech_stack,
            executive_summary: row.executive_summary,
            recommendations: row.recommendations,
            pitch_subject: row.pitch_subject,
            pitch_body: row.pitch_body,
            last_checked: row.last_checked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn score_from_db(column: &'static str, value: Option<i16>) -> Result<Option<u8>, DbError> {
    value
        .map(|v| {
            u8::try_from(v)
                .ok()
                .filter(|v| *v <= 100)
                .ok_or_else(|| DbError::Decode {
                    column,
                    value: v.to_string(),
                })
        })
        .transpose()
}

fn count_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn count_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Upserts a lead keyed by `external_id`.
///
/// On conflict every column except `id` and `created_at` is replaced, so the
/// most recent write wins.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_lead(pool: &PgPool, lead: &LeadRecord) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO leads \
             (id, run_id, external_id, company_name, website, phone, address, \
              industry, source, rating, review_count, photo_count, price_tier, \
              ui_score, seo_score, tech_score, performance_score, security_score, \
              total_score, speed_score, loading_time, lead_strength, status, issues, \
              tech_stack, executive_summary, recommendations, pitch_subject, pitch_body, \
              last_checked, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                 $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, \
                 $31, $32) \
         ON CONFLICT (external_id) DO UPDATE SET \
             run_id            = EXCLUDED.run_id, \
             company_name      = EXCLUDED.company_name, \
             website           = EXCLUDED.website, \
             phone             = EXCLUDED.phone, \
             address           = EXCLUDED.address, \
             industry          = EXCLUDED.industry, \
             source            = EXCLUDED.source, \
             rating            = EXCLUDED.rating, \
             review_count      = EXCLUDED.review_count, \
             photo_count       = EXCLUDED.photo_count, \
             price_tier        = EXCLUDED.price_tier, \
             ui_score          = EXCLUDED.ui_score, \
             seo_score         = EXCLUDED.seo_score, \
             tech_score        = EXCLUDED.tech_score, \
             performance_score = EXCLUDED.performance_score, \
             security_score    = EXCLUDED.security_score, \
             total_score       = EXCLUDED.total_score, \
             speed_score       = EXCLUDED.speed_score, \
             loading_time      = EXCLUDED.loading_time, \
             lead_strength     = EXCLUDED.lead_strength, \
             status            = EXCLUDED.status, \
             issues            = EXCLUDED.issues, \
             tech_stack        = EXCLUDED.tech_stack, \
             executive_summary = EXCLUDED.executive_summary, \
             recommendations   = EXCLUDED.recommendations, \
             pitch_subject     = EXCLUDED.pitch_subject, \
             pitch_body        = EXCLUDED.pitch_body, \
             last_checked      = EXCLUDED.last_checked, \
             updated_at        = EXCLUDED.updated_at",
    )
    .bind(lead.id)
    .bind(lead.run_id)
    .bind(&lead.external_id)
    .bind(&lead.company_name)
    .bind(&lead.website)
    .bind(&lead.phone)
    .bind(&lead.address)
    .bind(&lead.industry)
    .bind(&lead.source)
    .bind(lead.rating)
    .bind(count_to_db(lead.review_count))
    .bind(count_to_db(lead.photo_count))
    .bind(lead.price_tier.map(|t| i16::from(t.level())))
    .bind(lead.ui_score.map(i16::from))
    .bind(lead.seo_score.map(i16::from))
    .bind(lead.tech_score.map(i16::from))
    .bind(lead.performance_score.map(i16::from))
    .bind(lead.security_score.map(i16::from))
    .bind(lead.total_score.map(i16::from))
    .bind(lead.speed_score.map(i16::from))
    .bind(&lead.loading_time)
    .bind(lead.lead_strength.as_str())
    .bind(lead.status.as_str())
    .bind(&lead.issues)
    .bind(&lead.tech_stack)
    .bind(&lead.executive_summary)
    .bind(&lead.recommendations)
    .bind(&lead.pitch_subject)
    .bind(&lead.pitch_body)
    .bind(lead.last_checked)
    .bind(lead.created_at)
    .bind(lead.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Filters and paging for [`list_leads`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadQuery {
    /// `1..=MAX_PAGE_SIZE`.
    pub limit: i64,
    pub offset: i64,
    pub status: Option<LeadStatus>,
    pub strength: Option<LeadStrength>,
}

impl Default for LeadQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            status: None,
            strength: None,
        }
    }
}

impl LeadQuery {
    /// # Errors
    ///
    /// Returns [`DbError::InvalidQuery`] if `limit` is outside
    /// `1..=MAX_PAGE_SIZE` or `offset` is negative.
    pub fn validate(&self) -> Result<(), DbError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) {
            return Err(DbError::InvalidQuery(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.limit
            )));
        }
        if self.offset < 0 {
            return Err(DbError::InvalidQuery(format!(
                "offset must not be negative, got {}",
                self.offset
            )));
        }
        Ok(())
    }
}

/// Lists leads, most recently updated first.
///
/// # Errors
///
/// Returns [`DbError::InvalidQuery`] for out-of-range paging,
/// [`DbError::Sqlx`] if the query fails, or [`DbError::Decode`] if a row
/// holds a value outside the domain.
pub async fn list_leads(pool: &PgPool, query: &LeadQuery) -> Result<Vec<LeadRecord>, DbError> {
    query.validate()?;

    let sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads \
         WHERE ($1::text IS NULL OR status = $1) \
           AND ($2::text IS NULL OR lead_strength = $2) \
         ORDER BY updated_at DESC, id \
         LIMIT $3 OFFSET $4"
    );
    let rows = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(query.status.map(LeadStatus::as_str))
        .bind(query.strength.map(LeadStrength::as_str))
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(LeadRecord::try_from).collect()
}

// ---------------------------------------------------------------------------
// LeadStore adapter
// ---------------------------------------------------------------------------

/// [`LeadStore`] backed by the `leads` table.
#[derive(Debug, Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl LeadStore for PgLeadStore {
    async fn upsert_lead(&self, lead: &LeadRecord) -> Result<(), StoreError> {
        upsert_lead(&self.pool, lead)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_limits_are_enforced() {
        assert!(LeadQuery::default().validate().is_ok());
        for limit in [0, 101, -5] {
            let q = LeadQuery {
                limit,
                ..LeadQuery::default()
            };
            assert!(matches!(q.validate(), Err(DbError::InvalidQuery(_))));
        }
        let q = LeadQuery {
            offset: -1,
            ..LeadQuery::default()
        };
        assert!(q.validate().is_err());
    }

    #[test]
    fn scores_outside_range_fail_to_decode() {
        assert_eq!(score_from_db("ui_score", Some(87)).unwrap(), Some(87));
        assert_eq!(score_from_db("ui_score", None).unwrap(), None);
        assert!(matches!(
            score_from_db("ui_score", Some(140)),
            Err(DbError::Decode { column: "ui_score", .. })
        ));
        assert!(score_from_db("ui_score", Some(-1)).is_err());
    }

    #[test]
    fn counts_saturate_across_the_boundary() {
        assert_eq!(count_to_db(u32::MAX), i32::MAX);
        assert_eq!(count_from_db(-3), 0);
        assert_eq!(count_from_db(12), 12);
    }
}
