//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::{Config, OutputFormat};
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(1u64..=10_000),
        prop::option::of(1u64..=600),
        prop::option::of(1u64..=600),
        prop::option::of(1usize..=20),
        prop::option::of(any::<bool>()),
        prop::option::of(prop_oneof![Just(OutputFormat::Human), Just(OutputFormat::Json)]),
    )
        .prop_map(|(ttl, lock, timeout, min_len, autoinit, format)| Config {
            session_ttl_minutes: ttl,
            maximum_lock_wait_seconds: lock,
            booking_timeout_seconds: timeout,
            min_first_name_length: min_len,
            disable_autoinit: autoinit,
            output_format: format,
            rooms: None,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn merge_set_fields_win(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(merged.session_ttl_minutes, high.session_ttl_minutes.or(low.session_ttl_minutes));
        prop_assert_eq!(merged.maximum_lock_wait_seconds, high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds));
        prop_assert_eq!(merged.booking_timeout_seconds, high.booking_timeout_seconds.or(low.booking_timeout_seconds));
        prop_assert_eq!(merged.min_first_name_length, high.min_first_name_length.or(low.min_first_name_length));
        prop_assert_eq!(merged.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));
        prop_assert_eq!(merged.output_format, high.output_format.or(low.output_format));
    }

    #[test]
    fn merge_with_empty_is_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(&merged, &config);

        let mut from_empty = Config::default();
        ConfigMerger::merge_into(&mut from_empty, &config);
        prop_assert_eq!(from_empty, config);
    }

    #[test]
    fn yaml_roundtrip(config in config_strategy()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
