//! Single-item reads against the memory store.

#[cfg(test)]
mod tests {
    use dynaquery_core::{Dynaquery, QueryBuilder, ReadOptions};
    use dynaquery_model::{ReturnConsumedCapacity, StoreOperation};

    use crate::fixtures::{COMPOSITE_TABLE, HASH_TABLE, dracula, fighter, id, item};
    use crate::memory_client;

    #[tokio::test]
    async fn test_should_get_all_attributes_for_hash_key() {
        let db = Dynaquery::new(memory_client());
        let out = db.table(HASH_TABLE).find(id("abc123")).send().await.unwrap();
        assert_eq!(out.item, Some(dracula()));
    }

    #[tokio::test]
    async fn test_should_get_all_attributes_for_composite_key() {
        let db = Dynaquery::new(memory_client());
        let out = db
            .table(COMPOSITE_TABLE)
            .find(fighter("goku", 10))
            .send()
            .await
            .unwrap();
        let mut expected = fighter("goku", 10);
        expected.extend(item(&[
            ("series", "dragonball"),
            ("saga", "Emperor Pilaf"),
            ("source", "Daizenshuu 7"),
            ("form", "human"),
        ]));
        assert_eq!(out.item, Some(expected));
    }

    #[tokio::test]
    async fn test_should_return_no_item_for_missing_keys() {
        let db = Dynaquery::new(memory_client());
        let out = db.table(HASH_TABLE).find(id("notreal")).send().await.unwrap();
        assert!(out.item.is_none());

        let out = db
            .table(COMPOSITE_TABLE)
            .find(fighter("goku", 0))
            .send()
            .await
            .unwrap();
        assert!(out.item.is_none());
    }

    #[tokio::test]
    async fn test_should_select_single_attribute() {
        let db = Dynaquery::new(memory_client());
        let out = db
            .table(HASH_TABLE)
            .find(id("hij789"))
            .select(["species"])
            .send()
            .await
            .unwrap();
        assert_eq!(out.item, Some(item(&[("species", "human")])));
    }

    #[tokio::test]
    async fn test_should_select_multiple_attributes() {
        let db = Dynaquery::new(memory_client());
        let out = db
            .table(HASH_TABLE)
            .find(id("def456"))
            .select(["species", "name"])
            .send()
            .await
            .unwrap();
        assert_eq!(
            out.item,
            Some(item(&[("species", "dhampir"), ("name", "alucard")]))
        );
    }

    #[tokio::test]
    async fn test_should_omit_selected_attributes_the_item_lacks() {
        let db = Dynaquery::new(memory_client());
        let out = db
            .table(HASH_TABLE)
            .find(id("def456"))
            .select(["species", "name", "favoriteFood"])
            .send()
            .await
            .unwrap();
        assert_eq!(
            out.item,
            Some(item(&[("species", "dhampir"), ("name", "alucard")]))
        );
    }

    #[tokio::test]
    async fn test_should_report_capacity_on_request() {
        let client = memory_client();
        let db = Dynaquery::new(client.clone());
        let options = ReadOptions {
            consistent_read: Some(true),
            return_consumed_capacity: Some(ReturnConsumedCapacity::Total),
        };
        let out = db
            .table(HASH_TABLE)
            .find_with(id("abc123"), options)
            .send()
            .await
            .unwrap();
        assert!(out.consumed_capacity.is_some());
        assert_eq!(client.calls(StoreOperation::GetItem), 1);
    }

    #[tokio::test]
    async fn test_should_fail_for_unknown_table() {
        let db = Dynaquery::new(memory_client());
        let err = db.table("nope").find(id("abc123")).send().await.unwrap_err();
        assert_eq!(
            err.store_error().map(|e| e.code),
            Some(dynaquery_model::StoreErrorCode::ResourceNotFoundException)
        );
    }
}
