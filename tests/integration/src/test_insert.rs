//! Inserts and conflict policies against the memory store.

#[cfg(test)]
mod tests {
    use dynaquery_core::{ConflictPolicy, Dynaquery, PutOutcome, QueryBuilder, QueryError};
    use dynaquery_model::{AttributeValue, Item, StoreOperation};

    use crate::fixtures::{COMPOSITE_TABLE, HASH_TABLE, dracula, fighter, id, item};
    use crate::memory_client;

    fn new_dracula() -> Item {
        item(&[("name", "newDracula"), ("species", "vampire")])
    }

    #[tokio::test]
    async fn test_should_insert_new_item() {
        let db = Dynaquery::new(memory_client());
        let table = db.table(HASH_TABLE);

        let outcome = table
            .insert(id("xyz000"), item(&[("name", "carmilla")]))
            .send()
            .await
            .unwrap();
        assert!(outcome.is_written());

        let out = table.find(id("xyz000")).send().await.unwrap();
        assert_eq!(
            out.item,
            Some(item(&[("id", "xyz000"), ("name", "carmilla")]))
        );
    }

    #[tokio::test]
    async fn test_should_replace_existing_item_by_default() {
        let db = Dynaquery::new(memory_client());
        let table = db.table(HASH_TABLE);

        table
            .insert(id("abc123"), new_dracula())
            .send()
            .await
            .unwrap();

        let out = table.find(id("abc123")).send().await.unwrap();
        let mut expected = new_dracula();
        expected.extend(id("abc123"));
        assert_eq!(out.item, Some(expected));
        assert!(!out.item.unwrap().contains_key("aka"));
    }

    #[tokio::test]
    async fn test_should_leave_existing_item_on_do_nothing() {
        let client = memory_client();
        let db = Dynaquery::new(client.clone());
        let table = db.table(HASH_TABLE);

        let outcome = table
            .insert(id("abc123"), new_dracula())
            .on_conflict(ConflictPolicy::DoNothing)
            .send()
            .await
            .unwrap();
        assert_eq!(outcome, PutOutcome::AlreadyExists);
        assert_eq!(client.calls(StoreOperation::PutItem), 1);

        let out = table.find(id("abc123")).send().await.unwrap();
        assert_eq!(out.item, Some(dracula()));
    }

    #[tokio::test]
    async fn test_should_write_on_do_nothing_when_key_is_free() {
        let db = Dynaquery::new(memory_client());
        let table = db.table(COMPOSITE_TABLE);

        let outcome = table
            .insert(fighter("krillin", 75), item(&[("saga", "Emperor Pilaf")]))
            .on_conflict(ConflictPolicy::DoNothing)
            .send()
            .await
            .unwrap();
        assert!(outcome.is_written());

        let out = table.find(fighter("krillin", 75)).send().await.unwrap();
        assert!(out.item.is_some());
    }

    #[tokio::test]
    async fn test_should_treat_update_as_replace() {
        let db = Dynaquery::new(memory_client());
        let table = db.table(HASH_TABLE);

        let outcome = table
            .insert(id("abc123"), new_dracula())
            .on_conflict(ConflictPolicy::Update)
            .send()
            .await
            .unwrap();
        assert!(outcome.is_written());

        let out = table.find(id("abc123")).send().await.unwrap();
        assert_eq!(
            out.item.as_ref().and_then(|i| i.get("name")),
            Some(&AttributeValue::from("newDracula"))
        );
    }

    #[tokio::test]
    async fn test_should_report_failed_caller_condition() {
        let db = Dynaquery::new(memory_client());
        let mut insert = db
            .table(HASH_TABLE)
            .insert(id("nobody"), item(&[("name", "ghost")]));
        let alias = insert.alias("id").unwrap();
        let insert = insert.condition(&format!("attribute_exists({alias})"));

        let err = insert.send().await.unwrap_err();
        assert!(matches!(err, QueryError::ConditionFailed { .. }));
    }

    #[tokio::test]
    async fn test_should_not_claim_existence_when_only_caller_condition_fails() {
        let client = memory_client();
        let db = Dynaquery::new(client.clone());
        let table = db.table(HASH_TABLE);

        let mut insert = table
            .insert(id("nobody"), item(&[("name", "ghost")]))
            .on_conflict(ConflictPolicy::DoNothing);
        let alias = insert.alias("name").unwrap();
        let err = insert
            .condition(&format!("attribute_exists({alias})"))
            .send()
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::ConditionFailed { .. }));
        assert_eq!(client.calls(StoreOperation::GetItem), 1);
        let out = table.find(id("nobody")).send().await.unwrap();
        assert!(out.item.is_none());
    }

    #[tokio::test]
    async fn test_should_report_existing_item_despite_caller_condition() {
        let db = Dynaquery::new(memory_client());
        let table = db.table(HASH_TABLE);

        let mut insert = table
            .insert(id("abc123"), new_dracula())
            .on_conflict(ConflictPolicy::DoNothing);
        let alias = insert.alias("species").unwrap();
        let outcome = insert
            .condition(&format!("attribute_exists({alias})"))
            .send()
            .await
            .unwrap();

        assert_eq!(outcome, PutOutcome::AlreadyExists);
        let out = table.find(id("abc123")).send().await.unwrap();
        assert_eq!(out.item, Some(dracula()));
    }
}
