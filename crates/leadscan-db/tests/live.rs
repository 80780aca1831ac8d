//! Live integration tests for leadscan-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. Run with `DATABASE_URL` set and `--ignored`.

use chrono::Utc;
use leadscan_core::{LeadRecord, LeadStatus, LeadStrength, LEAD_SOURCE};
use leadscan_db::{list_leads, upsert_lead, DbError, LeadQuery};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_lead(external_id: &str, strength: LeadStrength) -> LeadRecord {
    let now = Utc::now();
    LeadRecord {
        id: Uuid::new_v4(),
        run_id: Uuid::new_v4(),
        external_id: external_id.to_string(),
        company_name: format!("Business {external_id}"),
        website: format!("https://{external_id}.example"),
        phone: None,
        address: Some("Hauptstrasse 1, Berlin".to_string()),
        industry: "Cafe".to_string(),
        source: LEAD_SOURCE.to_string(),
        rating: Some(3.9),
        review_count: 12,
        photo_count: 3,
        price_tier: None,
        ui_score: Some(45),
        seo_score: Some(40),
        tech_score: Some(50),
        performance_score: Some(38),
        security_score: Some(55),
        total_score: Some(44),
        speed_score: Some(38),
        loading_time: Some("5.2 s".to_string()),
        lead_strength: strength,
        status: LeadStatus::Completed,
        issues: vec!["Missing Content-Security-Policy header".to_string()],
        tech_stack: vec![],
        executive_summary: Some("Slow mobile site.".to_string()),
        recommendations: vec!["Compress images".to_string()],
        pitch_subject: Some("Faster site".to_string()),
        pitch_body: Some("Hi there".to_string()),
        last_checked: now,
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// Upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn lead_upsert_is_idempotent(pool: sqlx::PgPool) {
    let lead = make_lead("p-1", LeadStrength::Strong);
    upsert_lead(&pool, &lead).await.expect("first upsert failed");
    upsert_lead(&pool, &lead).await.expect("second upsert failed");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE external_id = $1")
        .bind("p-1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn lead_upsert_replaces_fields_but_keeps_identity(pool: sqlx::PgPool) {
    let first = make_lead("p-2", LeadStrength::Strong);
    upsert_lead(&pool, &first).await.unwrap();

    let mut second = make_lead("p-2", LeadStrength::Weak);
    second.company_name = "Renamed".to_string();
    second.tech_stack = vec!["Shopify".to_string()];
    upsert_lead(&pool, &second).await.unwrap();

    let stored = list_leads(&pool, &LeadQuery::default()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, first.id);
    assert_eq!(stored[0].company_name, "Renamed");
    assert_eq!(stored[0].lead_strength, LeadStrength::Weak);
    assert_eq!(stored[0].tech_stack, vec!["Shopify".to_string()]);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_leads_filters_by_strength_and_pages(pool: sqlx::PgPool) {
    for (id, strength) in [
        ("a", LeadStrength::Strong),
        ("b", LeadStrength::Medium),
        ("c", LeadStrength::Strong),
    ] {
        upsert_lead(&pool, &make_lead(id, strength)).await.unwrap();
    }

    let strong = list_leads(
        &pool,
        &LeadQuery {
            strength: Some(LeadStrength::Strong),
            ..LeadQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(strong.len(), 2);
    assert!(strong.iter().all(|l| l.lead_strength == LeadStrength::Strong));

    let page = list_leads(
        &pool,
        &LeadQuery {
            limit: 1,
            offset: 1,
            ..LeadQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_leads_rejects_oversized_page(pool: sqlx::PgPool) {
    let result = list_leads(
        &pool,
        &LeadQuery {
            limit: 500,
            ..LeadQuery::default()
        },
    )
    .await;
    assert!(matches!(result, Err(DbError::InvalidQuery(_))));
}
