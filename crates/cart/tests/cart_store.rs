//! Cart store behavior through the public API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nouie_cart::{CartStore, FileStore, KeyValueStore, MemoryStore, StorageError};
use nouie_core::{CartItem, ProductId};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn memory_cart() -> CartStore {
    CartStore::new(Arc::new(MemoryStore::new()))
}

#[test]
fn test_hoodie_twice_is_one_line() {
    let cart = memory_cart();
    cart.add_item("CAT01", "Hoodie", "M", Decimal::new(100, 0));
    cart.add_item("CAT01", "Hoodie", "M", Decimal::new(100, 0));

    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].qty, 2);
    assert_eq!(cart.total(), Decimal::new(200, 0));
}

#[test]
fn test_two_sizes_two_lines() {
    let cart = memory_cart();
    cart.add_item("CAT01", "Hoodie", "M", Decimal::new(100, 0));
    cart.add_item("CAT01", "Hoodie", "L", Decimal::new(100, 0));

    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.total_quantity(), 2);
}

#[test]
fn test_remove_only_line() {
    let cart = memory_cart();
    cart.add_item("CAT01", "Hoodie", "M", Decimal::new(100, 0));
    cart.remove_item(0);
    assert!(cart.items().is_empty());
}

#[test]
fn test_invalid_saved_json_starts_empty() {
    let storage = MemoryStore::new();
    storage.set("nouie_cart", "[{\"id\":").unwrap();

    let cart = CartStore::new(Arc::new(storage));
    assert!(cart.items().is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
}

/// Store whose reads always fail; writes go to an inner memory store.
#[derive(Default)]
struct UnreadableStore {
    writes: MemoryStore,
}

impl KeyValueStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io {
            key: key.to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read denied"),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.set(key, value)
    }
}

#[test]
fn test_read_failure_starts_empty() {
    let storage = Arc::new(UnreadableStore::default());
    let cart = CartStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStore>);

    assert!(cart.items().is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
    assert_eq!(cart.total_quantity(), 0);

    cart.add_item("CAT01", "Hoodie", "M", Decimal::new(100, 0));
    assert_eq!(cart.total_quantity(), 1);
    assert!(storage.writes.get("nouie_cart").unwrap().is_some());
}

#[test]
fn test_unreadable_cart_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the key file should be makes the read fail.
    std::fs::create_dir(dir.path().join("nouie_cart.json")).unwrap();
    let storage = FileStore::open(dir.path()).unwrap();
    assert!(storage.get("nouie_cart").is_err());

    let cart = CartStore::new(Arc::new(storage));
    assert!(cart.items().is_empty());
}

#[test]
fn test_reload_from_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let cart = CartStore::new(Arc::clone(&storage));
    cart.add_item("CAT01", "Hoodie", "M", Decimal::new(12050, 2));
    cart.add_item("CAT02", "Cargo Pant", "32", Decimal::new(180, 0));
    cart.add_item("CAT01", "Hoodie", "M", Decimal::new(12050, 2));
    let before = cart.items();
    drop(cart);

    let reloaded = CartStore::new(storage);
    assert_eq!(reloaded.items(), before);
    assert_eq!(reloaded.total(), Decimal::new(42100, 2));
}

#[test]
fn test_reads_cart_written_by_storefront() {
    let storage = MemoryStore::new();
    storage
        .set(
            "nouie_cart",
            r#"[{"id":"CAT01","name":"Hoodie","size":"M","price":100,"qty":2},
                {"id":"CAT07","name":"Beanie","size":"OS","price":35,"qty":1}]"#,
        )
        .unwrap();

    let cart = CartStore::new(Arc::new(storage));
    assert_eq!(cart.total(), Decimal::new(235, 0));
    assert_eq!(cart.total_quantity(), 3);

    cart.add_item("CAT07", "Beanie", "OS", Decimal::new(35, 0));
    assert_eq!(cart.items()[1].qty, 2);
}

#[test]
fn test_custom_key_isolated() {
    let storage = MemoryStore::new();
    let a = CartStore::with_key(Arc::new(storage.clone()), "cart_a");
    let b = CartStore::with_key(Arc::new(storage.clone()), "cart_b");

    a.add_item("CAT01", "Hoodie", "M", Decimal::ONE);
    assert!(b.is_empty());
    assert_eq!(storage.len(), 1);
    assert_eq!(a.storage_key(), "cart_a");
}

#[test]
fn test_every_listener_called_on_each_mutation() {
    let cart = memory_cart();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    for counter in [&first, &second] {
        let counter = Arc::clone(counter);
        cart.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    cart.add_item("CAT01", "Hoodie", "M", Decimal::ONE);
    cart.add_item("CAT01", "Hoodie", "M", Decimal::ONE);
    cart.remove_item(0);
    cart.clear();

    assert_eq!(first.load(Ordering::SeqCst), 4);
    assert_eq!(second.load(Ordering::SeqCst), 4);
}

#[test]
fn test_clones_share_state() {
    let cart = memory_cart();
    let badge = cart.clone();
    cart.add_item("CAT01", "Hoodie", "M", Decimal::ONE);
    assert_eq!(badge.total_quantity(), 1);
}

// =============================================================================
// Properties
// =============================================================================

fn line_strategy() -> impl Strategy<Value = (String, String, i64)> {
    ("CAT0[0-9]", "(XS|S|M|L|XL)", 0i64..100_000)
}

proptest! {
    #[test]
    fn prop_same_pair_accumulates(count in 1usize..40, cents in 0i64..100_000) {
        let cart = memory_cart();
        let price = Decimal::new(cents, 2);
        for _ in 0..count {
            cart.add_item("CAT01", "Hoodie", "M", price);
        }

        let items = cart.items();
        prop_assert_eq!(items.len(), 1);
        prop_assert_eq!(items[0].qty as usize, count);
    }

    #[test]
    fn prop_one_line_per_pair_in_first_seen_order(
        adds in prop::collection::vec(line_strategy(), 0..60)
    ) {
        let cart = memory_cart();
        let mut expected: Vec<(ProductId, String)> = Vec::new();

        for (id, size, cents) in &adds {
            cart.add_item(id.as_str(), "Item", size.as_str(), Decimal::new(*cents, 2));
            let key = (ProductId::new(id.as_str()), size.clone());
            if !expected.contains(&key) {
                expected.push(key);
            }
        }

        let actual: Vec<(ProductId, String)> = cart
            .items()
            .into_iter()
            .map(|item| (item.id, item.size))
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(cart.total_quantity() as usize, adds.len());
    }

    #[test]
    fn prop_totals_match_lines(
        adds in prop::collection::vec(line_strategy(), 0..60),
        removals in prop::collection::vec(0usize..20, 0..10)
    ) {
        let cart = memory_cart();
        for (id, size, cents) in &adds {
            cart.add_item(id.as_str(), "Item", size.as_str(), Decimal::new(*cents, 2));
        }
        for index in removals {
            cart.remove_item(index);
        }

        let items = cart.items();
        let total: Decimal = items.iter().map(|i| i.price * Decimal::from(i.qty)).sum();
        let qty: u32 = items.iter().map(|i| i.qty).sum();
        prop_assert_eq!(cart.total(), total);
        prop_assert_eq!(cart.total_quantity(), qty);
    }

    #[test]
    fn prop_persist_and_reload_is_equal(
        adds in prop::collection::vec(line_strategy(), 0..30)
    ) {
        let storage = MemoryStore::new();
        let cart = CartStore::new(Arc::new(storage.clone()));
        for (id, size, cents) in &adds {
            cart.add_item(id.as_str(), "Item", size.as_str(), Decimal::new(*cents, 2));
        }

        let reloaded = CartStore::new(Arc::new(storage));
        let before: Vec<CartItem> = cart.items();
        prop_assert_eq!(reloaded.items(), before);
    }

    #[test]
    fn prop_clear_always_empties(adds in prop::collection::vec(line_strategy(), 0..30)) {
        let cart = memory_cart();
        for (id, size, cents) in &adds {
            cart.add_item(id.as_str(), "Item", size.as_str(), Decimal::new(*cents, 2));
        }
        cart.clear();

        prop_assert!(cart.items().is_empty());
        prop_assert_eq!(cart.total(), Decimal::ZERO);
    }
}
