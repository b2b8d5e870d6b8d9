use fastconf_serialize::SerializerRegistry;
use fastconf_tree::Value;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Endpoint {
    host: String,
    port: u16,
    tags: Vec<String>,
    weight: Option<i64>,
}

fn endpoint() -> impl Strategy<Value = Endpoint> {
    (
        "[a-z0-9.-]{0,12}",
        any::<u16>(),
        proptest::collection::vec("[a-z]{0,5}", 0..4),
        proptest::option::of(any::<i64>()),
    )
        .prop_map(|(host, port, tags, weight)| Endpoint {
            host,
            port,
            tags,
            weight,
        })
}

proptest! {
    #[test]
    fn prop_serde_bridge_round_trips(value in endpoint()) {
        let registry = SerializerRegistry::new();
        registry.register_serde::<Endpoint>();

        let stored = registry.serialize(&value).unwrap();
        prop_assert!(stored.is_tree());
        prop_assert_eq!(registry.deserialize::<Endpoint>(&stored).unwrap(), value);
    }

    #[test]
    fn prop_stored_form_matches_serde_json(value in endpoint()) {
        let registry = SerializerRegistry::new();
        registry.register_serde::<Endpoint>();

        let stored = registry.serialize(&value).unwrap();
        let expected = Value::from_json(serde_json::to_value(&value).unwrap());
        prop_assert_eq!(stored, expected);
    }
}
