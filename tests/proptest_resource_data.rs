//! Property-based tests using proptest
//!
//! Malformed lease user data must always be rejected before any
//! collaborator is contacted.

mod common;

use common::{lease_with, FakeBackend};
use powervs_janitor::pool::{
    get_resource_data, MetadataError, API_KEY_KEY, REGION_KEY, SERVICE_INSTANCE_ID_KEY, ZONE_KEY,
};
use powervs_janitor::{CleanupOptions, ClientError, PowerVsClient};
use proptest::prelude::*;

const KEYS: [&str; 4] = [SERVICE_INSTANCE_ID_KEY, REGION_KEY, ZONE_KEY, API_KEY_KEY];

/// How one user-data key is broken, if at all
#[derive(Debug, Clone)]
enum Damage {
    Intact(String),
    Missing,
    Blank(String),
}

fn arb_damage() -> impl Strategy<Value = Damage> {
    prop_oneof![
        "[a-z0-9][a-z0-9-]{0,30}".prop_map(Damage::Intact),
        Just(Damage::Missing),
        "[ \t]{0,4}".prop_map(Damage::Blank),
    ]
}

/// Damage for all four keys, with at least one of them broken
fn arb_broken_user_data() -> impl Strategy<Value = Vec<Damage>> {
    prop::collection::vec(arb_damage(), 4).prop_filter("at least one key broken", |d| {
        d.iter().any(|d| !matches!(d, Damage::Intact(_)))
    })
}

fn build(damage: &[Damage]) -> Vec<(&'static str, String)> {
    KEYS.iter()
        .zip(damage)
        .filter_map(|(key, d)| match d {
            Damage::Intact(v) | Damage::Blank(v) => Some((*key, v.clone())),
            Damage::Missing => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn test_first_broken_key_is_reported(damage in arb_broken_user_data()) {
        let pairs = build(&damage);
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let resource = lease_with(&borrowed);

        let (index, first) = damage
            .iter()
            .enumerate()
            .find(|(_, d)| !matches!(d, Damage::Intact(_)))
            .unwrap();

        let err = get_resource_data(&resource).unwrap_err();
        match (first, err) {
            (Damage::Missing, MetadataError::MissingField { key, .. }) => prop_assert_eq!(key, KEYS[index]),
            (Damage::Blank(_), MetadataError::EmptyField { key, .. }) => prop_assert_eq!(key, KEYS[index]),
            (d, e) => prop_assert!(false, "unexpected {:?} for {:?}", e, d),
        }
    }

    #[test]
    fn test_intact_values_are_trimmed(values in prop::collection::vec("[a-z0-9-]{1,20}", 4)) {
        let pairs: Vec<(&str, String)> = KEYS
            .iter()
            .zip(&values)
            .map(|(k, v)| (*k, format!("  {v}\n")))
            .collect();
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let data = get_resource_data(&lease_with(&borrowed)).unwrap();
        prop_assert_eq!(&data.service_instance_id, &values[0]);
        prop_assert_eq!(&data.region, &values[1]);
        prop_assert_eq!(&data.zone, &values[2]);
        prop_assert_eq!(&data.api_key, &values[3]);
    }

    #[test]
    fn test_broken_lease_never_reaches_backend(damage in arb_broken_user_data()) {
        let pairs = build(&damage);
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let options = CleanupOptions::new(lease_with(&borrowed));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let backend = FakeBackend::new("http://127.0.0.1:9");
        let result = runtime.block_on(PowerVsClient::new(&options, &backend));

        prop_assert!(matches!(result, Err(ClientError::Metadata(_))));
        prop_assert_eq!(backend.calls(), (0, 0, 0));
    }
}
