//! Demo seed data for local development.

use sqlx::PgPool;

use crate::DbError;

pub const DEMO_USER_ID: &str = "demo-user";

const DEMO_CLIENTS: &[(&str, &str)] = &[
    ("TechVentures Inc", "techventures.io"),
    ("CloudScale Solutions", "cloudscale.dev"),
    ("DataDrive Analytics", "datadrive.ai"),
    ("AI Innovations Lab", "aiinnovations.com"),
    ("EnterpriseFlow", "enterpriseflow.io"),
];

const DEMO_KEYWORDS: &[&str] = &[
    "Series B",
    "hiring",
    "AI",
    "automation",
    "enterprise",
    "funding",
    "product launch",
    "expansion",
    "partnership",
    "acquisition",
];

/// Seeds the demo user's roster. Idempotent: re-running leaves existing rows
/// untouched. Returns the number of clients and keywords now present.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn seed_demo_data(pool: &PgPool) -> Result<(usize, usize), DbError> {
    for (name, domain) in DEMO_CLIENTS {
        sqlx::query(
            "INSERT INTO clients (user_id, name, domain) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, name) DO NOTHING",
        )
        .bind(DEMO_USER_ID)
        .bind(name)
        .bind(domain)
        .execute(pool)
        .await?;
    }

    for keyword in DEMO_KEYWORDS {
        sqlx::query(
            "INSERT INTO trend_keywords (user_id, keyword) VALUES ($1, $2) \
             ON CONFLICT (user_id, keyword) DO NOTHING",
        )
        .bind(DEMO_USER_ID)
        .bind(keyword)
        .execute(pool)
        .await?;
    }

    tracing::info!(
        clients = DEMO_CLIENTS.len(),
        keywords = DEMO_KEYWORDS.len(),
        user = DEMO_USER_ID,
        "demo data seeded"
    );

    Ok((DEMO_CLIENTS.len(), DEMO_KEYWORDS.len()))
}
