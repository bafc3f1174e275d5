//! Scope partitioning properties
use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use wfsecrets::secrets::{path, Scope, SecretString};

use crate::common::memory_repository;

fn scope_strategy() -> impl Strategy<Value = Scope> {
    prop_oneof![
        Just(Scope::Global),
        Just(Scope::workflow("billing")),
        Just(Scope::workflow("shipping")),
    ]
}

fn operation_strategy() -> impl Strategy<Value = (bool, String, Scope)> {
    (any::<bool>(), "[a-c]{1,2}", scope_strategy())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn listing_reflects_writes_of_that_scope_only(
        ops in prop::collection::vec(operation_strategy(), 1..24)
    ) {
        tokio_test::block_on(async {
            let (_api, repo) = memory_repository();
            let mut expected: HashMap<Scope, BTreeSet<String>> = HashMap::new();

            for (is_save, name, scope) in &ops {
                // Read first so every write has a cached list to invalidate
                repo.list(scope).await.unwrap();

                if *is_save {
                    repo.save(name, &SecretString::new("v"), scope).await.unwrap();
                    expected.entry(scope.clone()).or_default().insert(name.clone());
                } else {
                    repo.delete(name, scope).await.unwrap();
                    expected.entry(scope.clone()).or_default().remove(name);
                }
            }

            for scope in [Scope::Global, Scope::workflow("billing"), Scope::workflow("shipping")] {
                let listed: BTreeSet<String> =
                    repo.list(&scope).await.unwrap().into_iter().collect();
                let wanted = expected.remove(&scope).unwrap_or_default();
                assert_eq!(listed, wanted, "scope {}", scope);
            }
        });
    }

    #[test]
    fn workflow_name_survives_query_encoding(workflow in "\\PC{1,20}") {
        let list_path = path::list_path(&Scope::workflow(workflow.clone()));
        let encoded = list_path.strip_prefix("/secrets?workflowName=").unwrap();
        prop_assert!(!encoded.contains('&') && !encoded.contains(' '));
        prop_assert_eq!(urlencoding::decode(encoded).unwrap(), workflow);
    }
}
