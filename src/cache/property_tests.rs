//! Property-Based Tests for the Cache Service
//!
//! Uses proptest to check the service laws against the in-process backend.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheNamespace, CacheService};
use crate::config::Config;
use crate::protect::{AesDataProtector, CACHE_PROTECTION_PURPOSE};
use crate::telemetry::NoopTelemetry;

// == Test Configuration ==
/// Small enough that generated payloads exercise both envelope kinds.
const TEST_COMPRESSION_THRESHOLD: usize = 128;

fn service() -> CacheService {
    let config = Config {
        compression_threshold: TEST_COMPRESSION_THRESHOLD,
        ..Config::default().with_connection_string("memory://")
    };
    let protector = AesDataProtector::new(CACHE_PROTECTION_PURPOSE, "property-tests").unwrap();
    CacheService::new(&config, Arc::new(protector), Arc::new(NoopTelemetry))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Customer {
    id: u32,
    name: String,
    tags: Vec<String>,
}

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,48}"
}

fn customer_strategy() -> impl Strategy<Value = Customer> {
    (any::<u32>(), "[a-zA-Z ]{0,300}", prop::collection::vec("[a-z]{1,12}", 0..8))
        .prop_map(|(id, name, tags)| Customer { id, name, tags })
}

fn namespace_strategy() -> impl Strategy<Value = CacheNamespace> {
    prop_oneof![Just(CacheNamespace::Authentication), Just(CacheNamespace::DataStructures)]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Store { key: String, value: Customer },
    Fetch { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), customer_strategy()).prop_map(|(key, value)| CacheOp::Store { key, value }),
        key_strategy().prop_map(|key| CacheOp::Fetch { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Store followed by Fetch returns the stored value
    #[test]
    fn prop_round_trip(ns in namespace_strategy(), key in key_strategy(), value in customer_strategy()) {
        let service = service();

        service.store_blocking(ns, &key, &value, None).unwrap();
        let fetched: Option<Customer> = service.fetch_blocking(ns, &key).unwrap();

        prop_assert_eq!(fetched, Some(value));
    }

    // Deleting twice never errors and leaves nothing behind
    #[test]
    fn prop_delete_idempotent(key in key_strategy(), value in customer_strategy()) {
        let service = service();
        let ns = CacheNamespace::DataStructures;

        service.store_blocking(ns, &key, &value, None).unwrap();
        service.delete_blocking(ns, &key).unwrap();
        service.delete_blocking(ns, &key).unwrap();

        let fetched: Option<Customer> = service.fetch_blocking(ns, &key).unwrap();
        prop_assert!(fetched.is_none());
    }

    // Clearing one namespace removes all its keys and none of the other's
    #[test]
    fn prop_clear_is_namespace_scoped(
        auth_keys in prop::collection::hash_set(key_strategy(), 1..10),
        data_keys in prop::collection::hash_set(key_strategy(), 1..10),
    ) {
        let service = service();

        for key in &auth_keys {
            service.store_blocking(CacheNamespace::Authentication, key, key, None).unwrap();
        }
        for key in &data_keys {
            service.store_blocking(CacheNamespace::DataStructures, key, key, None).unwrap();
        }

        service.clear_blocking(CacheNamespace::Authentication).unwrap();

        for key in &auth_keys {
            let fetched: Option<String> = service.fetch_blocking(CacheNamespace::Authentication, key).unwrap();
            prop_assert!(fetched.is_none());
        }
        for key in &data_keys {
            let fetched: Option<String> = service.fetch_blocking(CacheNamespace::DataStructures, key).unwrap();
            prop_assert_eq!(fetched.as_ref(), Some(key));
        }
    }

    // Any operation sequence agrees with a HashMap model, and the counters match
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let service = service();
        let ns = CacheNamespace::DataStructures;
        let mut model: HashMap<String, Customer> = HashMap::new();
        let (mut hits, mut misses) = (0u64, 0u64);

        for op in ops {
            match op {
                CacheOp::Store { key, value } => {
                    service.store_blocking(ns, &key, &value, None).unwrap();
                    model.insert(key, value);
                }
                CacheOp::Fetch { key } => {
                    let fetched: Option<Customer> = service.fetch_blocking(ns, &key).unwrap();
                    if fetched.is_some() { hits += 1 } else { misses += 1 }
                    prop_assert_eq!(fetched.as_ref(), model.get(&key));
                }
                CacheOp::Delete { key } => {
                    service.delete_blocking(ns, &key).unwrap();
                    model.remove(&key);
                }
            }
        }

        let stats = service.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
    }
}
