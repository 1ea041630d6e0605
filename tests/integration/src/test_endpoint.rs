//! Builders driven through the AWS SDK against a running DynamoDB-compatible
//! server.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aws_sdk_dynamodb::types::{
        AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
    };
    use dynaquery_aws::AwsClient;
    use dynaquery_core::{ConflictPolicy, Dynaquery, FetchConfig, PutOutcome, QueryBuilder};
    use futures::TryStreamExt;

    use crate::fixtures::{dracula, id, item};
    use crate::{dynamodb_client, test_table_name};

    /// Create a hash-keyed table (`id: S`) and return the builder entry point.
    async fn setup(prefix: &str) -> anyhow::Result<(Dynaquery<AwsClient>, String)> {
        let sdk = dynamodb_client();
        let table_name = test_table_name(prefix);
        sdk.create_table()
            .table_name(&table_name)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("id")
                    .key_type(KeyType::Hash)
                    .build()?,
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("id")
                    .attribute_type(ScalarAttributeType::S)
                    .build()?,
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await?;

        let db = Dynaquery::with_config(
            Arc::new(AwsClient::new(sdk)),
            FetchConfig::default().with_max_backoff_ms(50),
        );
        Ok((db, table_name))
    }

    async fn teardown(table_name: &str) -> anyhow::Result<()> {
        dynamodb_client()
            .delete_table()
            .table_name(table_name)
            .send()
            .await?;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_insert_and_find_item() -> anyhow::Result<()> {
        let (db, table_name) = setup("dq-find").await?;
        let table = db.table(&table_name);

        let outcome = table.insert(id("abc123"), dracula()).send().await?;
        assert!(outcome.is_written());
        assert!(outcome.output().and_then(|o| o.metadata.request_id.as_ref()).is_some());

        let out = table.find(id("abc123")).send().await?;
        assert_eq!(out.item, Some(dracula()));

        let out = table
            .find(id("abc123"))
            .select(["name", "species"])
            .send()
            .await?;
        assert_eq!(
            out.item,
            Some(item(&[("name", "dracula"), ("species", "vampire")]))
        );

        teardown(&table_name).await
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_skip_existing_item_on_do_nothing() -> anyhow::Result<()> {
        let (db, table_name) = setup("dq-insert").await?;
        let table = db.table(&table_name);

        table.insert(id("abc123"), dracula()).send().await?;
        let outcome = table
            .insert(id("abc123"), item(&[("name", "newDracula")]))
            .on_conflict(ConflictPolicy::DoNothing)
            .send()
            .await?;
        assert_eq!(outcome, PutOutcome::AlreadyExists);

        let out = table.find(id("abc123")).send().await?;
        assert_eq!(out.item, Some(dracula()));

        teardown(&table_name).await
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_find_many_across_pages() -> anyhow::Result<()> {
        let (db, table_name) = setup("dq-batch").await?;
        let table = db.table(&table_name);

        let text = "mine".repeat(100_000);
        for i in 0..60 {
            table
                .insert(id(&i.to_string()), item(&[("text", text.as_str())]))
                .send()
                .await?;
        }

        let keys: Vec<_> = (0..60).map(|i| id(&i.to_string())).collect();
        let pages: Vec<_> = table.find_many(keys.clone()).pages().try_collect().await?;
        assert!(pages.len() > 1, "expected several pages, got {}", pages.len());

        let out = table.find_many(keys).send().await?;
        assert_eq!(out.items.len(), 60);

        teardown(&table_name).await
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_missing_table() {
        let db = Dynaquery::new(Arc::new(AwsClient::new(dynamodb_client())));
        let err = db
            .table(test_table_name("dq-missing"))
            .find(id("abc123"))
            .send()
            .await
            .unwrap_err();
        assert_eq!(
            err.store_error().map(|e| e.code),
            Some(dynaquery_model::StoreErrorCode::ResourceNotFoundException)
        );
    }
}
