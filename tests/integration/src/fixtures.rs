//! Seed data for the fixture tables.

use std::collections::HashMap;

use dynaquery_model::{AttributeValue, Item};

/// Hash-keyed table, key `id`.
pub const HASH_TABLE: &str = "test-hash-table";
/// Composite-keyed table, keys `name` and `powerLevel`.
pub const COMPOSITE_TABLE: &str = "test-composite-table";
/// Hash-keyed table of large items, key `id`.
pub const BIG_TABLE: &str = "test-big-table";

/// Number of items in [`BIG_TABLE`].
pub const BIG_TABLE_ITEMS: usize = 120;

/// Build an item from string attributes.
#[must_use]
pub fn item(pairs: &[(&str, &str)]) -> Item {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), AttributeValue::from(*v)))
        .collect()
}

/// Key of [`HASH_TABLE`] / [`BIG_TABLE`].
#[must_use]
pub fn id(value: &str) -> Item {
    item(&[("id", value)])
}

/// Key of [`COMPOSITE_TABLE`].
#[must_use]
pub fn fighter(name: &str, power_level: i64) -> Item {
    HashMap::from([
        ("name".to_owned(), AttributeValue::from(name)),
        ("powerLevel".to_owned(), AttributeValue::from(power_level)),
    ])
}

/// The original record stored under `abc123`.
#[must_use]
pub fn dracula() -> Item {
    item(&[
        ("id", "abc123"),
        ("name", "dracula"),
        ("aka", "Vlad Ţepeş"),
        ("species", "vampire"),
    ])
}

/// Items of [`HASH_TABLE`].
#[must_use]
pub fn hash_seed() -> Vec<Item> {
    vec![
        dracula(),
        item(&[
            ("id", "def456"),
            ("name", "alucard"),
            ("aka", "Adrian Ţepeş"),
            ("species", "dhampir"),
        ]),
        item(&[("id", "hij789"), ("species", "human"), ("name", "sypha")]),
        item(&[("id", "klm123"), ("species", "human"), ("name", "trevor")]),
    ]
}

fn with_details(mut key: Item, details: &[(&str, &str)]) -> Item {
    key.extend(item(details));
    key
}

/// Items of [`COMPOSITE_TABLE`].
#[must_use]
pub fn composite_seed() -> Vec<Item> {
    vec![
        with_details(
            fighter("goku", 10),
            &[
                ("series", "dragonball"),
                ("saga", "Emperor Pilaf"),
                ("source", "Daizenshuu 7"),
                ("form", "human"),
            ],
        ),
        with_details(
            fighter("goku", 100),
            &[
                ("series", "dragonball"),
                ("saga", "Emperor Pilaf"),
                ("source", "Daizenshuu 7"),
                ("form", "great ape"),
            ],
        ),
        with_details(
            fighter("shu", 40),
            &[
                ("series", "dragonball"),
                ("saga", "Emperor Pilaf"),
                ("source", "Movie 6 Pamphlet"),
            ],
        ),
        with_details(
            fighter("goku", 9001),
            &[
                ("series", "dragonball z"),
                ("saga", "Vegeta"),
                ("source", "Vol. 19, #224 (Ocean Dub)"),
            ],
        ),
        with_details(
            fighter("piccolo", 3500),
            &[
                ("series", "dragonball z"),
                ("saga", "Vegeta"),
                ("source", "Daizenshuu 7"),
            ],
        ),
        with_details(
            fighter("vegeta", 18000),
            &[
                ("series", "dragonball z"),
                ("saga", "Vegeta"),
                ("source", "Vol. 21, #249"),
            ],
        ),
    ]
}

/// Items of [`BIG_TABLE`]: each about 400 KB, so a batch read of all of
/// them exceeds a single response.
#[must_use]
pub fn big_seed() -> Vec<Item> {
    let text = "mine".repeat(100_000);
    (0..BIG_TABLE_ITEMS)
        .map(|i| item(&[("id", i.to_string().as_str()), ("text", text.as_str())]))
        .collect()
}
