use std::collections::BTreeMap;
use std::env;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use petroforge_core::TableName;
use petroforge_generate::{BatchSizes, DataGenerator, GenerateOptions, GenerationContext};
use petroforge_store::{PostgresStore, RecordStore, TableRegistry};

fn database_url() -> Result<String> {
    env::var("TEST_DATABASE_URL").context("set TEST_DATABASE_URL for Postgres integration tests")
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn round_trips_generated_tables_through_postgres() -> Result<()> {
    let store = PostgresStore::connect(&database_url()?, TableRegistry::standard())
        .await
        .context("connecting to Postgres")?;
    store.ensure_schema().await.context("creating tables")?;
    store.truncate(&TableName::ALL, true).await?;

    let today = NaiveDate::from_ymd_opt(2025, 5, 20).context("date")?;
    let mut generator =
        DataGenerator::new(GenerationContext::seeded(17, today), GenerateOptions::default());
    let sizes = BatchSizes {
        wells: 12,
        equipment: 24,
        production: 48,
        incidents: 10,
    };
    let tables = generator.generate_all(&sizes, &Default::default())?;

    let inserted = store.insert_records(&tables.frames()).await?;
    assert_eq!(inserted[&TableName::Wells], 12);
    assert_eq!(inserted[&TableName::Incidents], 10);

    let codes = store.existing_codes(TableName::Equipment, "cod_equipamento").await?;
    assert_eq!(codes.len(), 24);

    let err = store
        .insert_records(&BTreeMap::from([(TableName::Wells, tables.wells.to_frame())]))
        .await
        .expect_err("duplicate wells");
    assert!(err.is_integrity(), "unexpected error {err}");

    let counts = store.count_records(None).await?;
    assert_eq!(counts[&TableName::Wells], 12);
    assert_eq!(counts[&TableName::Production], 48);

    store.truncate(&TableName::ALL, true).await?;
    Ok(())
}
