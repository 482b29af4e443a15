/// Demo data seeding
///
/// Enabled with `SEED_DEMO_DATA=true`. Creates one demo tenant with a known
/// login, three managed clients, and six months of revenue spread across
/// several sources. Seeding is skipped when the demo user already exists.

use crate::app::AppState;
use anyhow::Context;
use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use revintel_shared::auth::password;
use revintel_shared::models::client::{Client, ClientPlan, ClientStatus, CreateClient};
use revintel_shared::models::revenue::{CreateRevenueRecord, RevenueRecord};
use revintel_shared::models::user::{User, UserRole};

/// Demo login email
pub const DEMO_EMAIL: &str = "demo@revintel.io";

/// Demo login password
pub const DEMO_PASSWORD: &str = "DemoPass123!";

// (company, domain, industry, plan, mrr)
const MANAGED_CLIENTS: [(&str, &str, &str, ClientPlan, f64); 3] = [
    ("Northwind Traders", "northwind.example", "retail", ClientPlan::Professional, 4_200.0),
    ("Globex Analytics", "globex.example", "software", ClientPlan::Enterprise, 12_500.0),
    ("Initech Supply", "initech.example", "manufacturing", ClientPlan::Starter, 900.0),
];

// (source, channel, base monthly amount)
const REVENUE_SOURCES: [(&str, &str, f64); 4] = [
    ("stripe", "paid_search", 8_000.0),
    ("shopify", "organic", 5_500.0),
    ("paypal", "email", 2_400.0),
    ("direct", "social", 1_200.0),
];

const SEED_MONTHS: u32 = 6;

/// What [`seed_demo_data`] created
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub clients: usize,
    pub revenue_records: usize,
}

/// Seeds the demo tenant
pub async fn seed_demo_data(state: &AppState) -> anyhow::Result<SeedSummary> {
    let stores = &state.stores;

    if stores.users.find_by_email(DEMO_EMAIL).await?.is_some() {
        tracing::info!(email = DEMO_EMAIL, "Demo data already present, skipping seed");
        return Ok(SeedSummary::default());
    }

    let mut tenant = Client::new_tenant(
        state.ids.next_id(),
        CreateClient {
            company_name: "RevIntel Demo Co".to_string(),
            domain: Some("demo.revintel.io".to_string()),
            industry: Some("saas".to_string()),
            plan: ClientPlan::Professional,
        },
    );
    tenant.status = ClientStatus::Active;
    tenant.onboarding_completed = true;
    let tenant_id = tenant.id;

    let password_hash = tokio::task::spawn_blocking(|| password::hash_password(DEMO_PASSWORD))
        .await
        .context("password hashing task failed")??;

    stores
        .users
        .insert(User::new(
            state.ids.next_id(),
            DEMO_EMAIL,
            password_hash,
            "Demo".to_string(),
            "User".to_string(),
            tenant_id,
            UserRole::Admin,
        ))
        .await?;
    stores.clients.insert(tenant).await?;

    let mut summary = SeedSummary {
        users: 1,
        clients: 1,
        revenue_records: 0,
    };

    for (company, domain, industry, plan, mrr) in MANAGED_CLIENTS {
        let mut client = Client::new(
            state.ids.next_id(),
            tenant_id,
            CreateClient {
                company_name: company.to_string(),
                domain: Some(domain.to_string()),
                industry: Some(industry.to_string()),
                plan,
            },
        );
        client.status = ClientStatus::Active;
        client.onboarding_completed = true;
        client.mrr = mrr;
        client.arr = mrr * 12.0;

        stores.clients.insert(client).await?;
        summary.clients += 1;
    }

    let today = Utc::now().date_naive();
    for months_back in 0..SEED_MONTHS {
        let Some(month_start) = month_start(today, months_back) else {
            continue;
        };

        for (index, (source, channel, base)) in REVENUE_SOURCES.iter().enumerate() {
            // Older months earn less, so the demo shows growth
            let growth = 1.0 - 0.06 * f64::from(months_back);
            let amount = (base * growth).round();
            let date = month_start + Days::new(3 + 5 * index as u64);

            let record = RevenueRecord::new(
                state.ids.next_id(),
                tenant_id,
                CreateRevenueRecord {
                    date,
                    amount,
                    source: Some((*source).to_string()),
                    channel: Some((*channel).to_string()),
                    currency: None,
                    customer_id: None,
                    metadata: None,
                },
            );
            stores.revenue.insert(record).await?;
            summary.revenue_records += 1;
        }
    }

    tracing::info!(
        email = DEMO_EMAIL,
        tenant_id = %tenant_id,
        clients = summary.clients,
        revenue_records = summary.revenue_records,
        "Demo data seeded"
    );

    Ok(summary)
}

fn month_start(today: NaiveDate, months_back: u32) -> Option<NaiveDate> {
    today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(months_back)))
}
