//! Multi-key reads, including reads that span several pages.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use dynaquery_core::{Dynaquery, FetchConfig, QueryBuilder};
    use dynaquery_memory::MemoryStoreConfig;
    use dynaquery_model::{AttributeValue, StoreOperation};
    use futures::TryStreamExt;

    use crate::fixtures::{
        BIG_TABLE, BIG_TABLE_ITEMS, COMPOSITE_TABLE, HASH_TABLE, fighter, id, item,
    };
    use crate::{memory_client, memory_client_with, seed_big_table};

    fn fast() -> FetchConfig {
        FetchConfig::default().with_max_backoff_ms(5)
    }

    #[tokio::test]
    async fn test_should_get_multiple_hash_keys() {
        let db = Dynaquery::new(memory_client());
        let out = db
            .table(HASH_TABLE)
            .find_many([id("hij789"), id("klm123")])
            .send()
            .await
            .unwrap();
        assert_eq!(out.items.len(), 2);
        assert!(out.items.contains(&item(&[
            ("id", "hij789"),
            ("name", "sypha"),
            ("species", "human"),
        ])));
        assert!(out.items.contains(&item(&[
            ("id", "klm123"),
            ("name", "trevor"),
            ("species", "human"),
        ])));
        assert_eq!(out.page_count(), 1);
    }

    #[tokio::test]
    async fn test_should_get_multiple_composite_keys() {
        let db = Dynaquery::new(memory_client());
        let out = db
            .table(COMPOSITE_TABLE)
            .find_many([fighter("goku", 100), fighter("vegeta", 18000)])
            .send()
            .await
            .unwrap();
        assert_eq!(out.items.len(), 2);
        let sources: HashSet<_> = out
            .items
            .iter()
            .filter_map(|i| i.get("source").and_then(AttributeValue::as_s))
            .collect();
        assert_eq!(sources, HashSet::from(["Daizenshuu 7", "Vol. 21, #249"]));
    }

    #[tokio::test]
    async fn test_should_select_attributes_on_every_item() {
        let db = Dynaquery::new(memory_client());
        let out = db
            .table(HASH_TABLE)
            .find_many([id("def456"), id("klm123")])
            .select(["name", "species", "aka"])
            .send()
            .await
            .unwrap();
        assert_eq!(out.items.len(), 2);
        assert!(out.items.contains(&item(&[
            ("name", "alucard"),
            ("species", "dhampir"),
            ("aka", "Adrian Ţepeş"),
        ])));
        assert!(out.items.contains(&item(&[("name", "trevor"), ("species", "human")])));
    }

    #[tokio::test]
    async fn test_should_follow_unprocessed_keys_until_done() {
        let client = memory_client_with(MemoryStoreConfig::default().with_batch_page_size(25));
        let mut keys: Vec<_> = (0..50).map(|i| id(&format!("missing-{i}"))).collect();
        keys.push(id("abc123"));

        let db = Dynaquery::with_config(client.clone(), fast());
        let out = db
            .table(HASH_TABLE)
            .find_many(keys)
            .send()
            .await
            .unwrap();

        assert_eq!(client.calls(StoreOperation::BatchGetItem), 3);
        assert_eq!(out.page_count(), 3);
        assert_eq!(out.items.len(), 1);
    }

    #[tokio::test]
    async fn test_should_page_through_big_table() {
        let client = memory_client();
        seed_big_table(&client);
        let db = Dynaquery::with_config(client.clone(), fast());
        let keys: Vec<_> = (0..BIG_TABLE_ITEMS).map(|i| id(&i.to_string())).collect();

        let out = db.table(BIG_TABLE).find_many(keys).send().await.unwrap();

        assert_eq!(out.items.len(), BIG_TABLE_ITEMS);
        let ids: HashSet<_> = out
            .items
            .iter()
            .filter_map(|i| i.get("id").and_then(AttributeValue::as_s))
            .collect();
        assert_eq!(ids.len(), BIG_TABLE_ITEMS);
        let calls = client.calls(StoreOperation::BatchGetItem);
        assert!(calls > 1, "expected several pages, got {calls}");
        assert_eq!(out.page_count() as u64, calls);
        let request_ids: HashSet<_> = out.metadata.iter().map(|m| m.request_id.clone()).collect();
        assert_eq!(request_ids.len(), out.page_count());
    }

    #[tokio::test]
    async fn test_should_stream_pages_in_order() {
        let client = memory_client_with(MemoryStoreConfig::default().with_batch_page_size(1));
        let db = Dynaquery::with_config(client.clone(), fast());

        let pages: Vec<_> = db
            .table(HASH_TABLE)
            .find_many([id("abc123"), id("def456"), id("hij789")])
            .pages()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(pages.len(), 3);
        assert!(pages[0].has_unprocessed_keys());
        assert!(pages[1].has_unprocessed_keys());
        assert!(!pages[2].has_unprocessed_keys());
        let served: Vec<_> = pages
            .iter()
            .flat_map(|p| p.responses[HASH_TABLE].iter())
            .filter_map(|i| i.get("id").and_then(AttributeValue::as_s))
            .collect();
        assert_eq!(served, vec!["abc123", "def456", "hij789"]);
    }
}
