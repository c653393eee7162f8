//! Property tests for the load, validate, emit pipeline

use apkplan_android::validator::rules;
use apkplan_android::{emit, load, plan, validate, BuildConfigError, RawEntries, SigningRegistry};
use apkplan_core::config::DefaultsConfig;
use proptest::prelude::*;

fn entries(min: u32, target: u32, compile: u32, desugaring: bool) -> RawEntries {
    [
        ("applicationId", "com.agendaapp.agenda_app".to_string()),
        ("minSdk", min.to_string()),
        ("targetSdk", target.to_string()),
        ("compileSdk", compile.to_string()),
        ("desugaringEnabled", desugaring.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

proptest! {
    #[test]
    fn validated_configs_respect_sdk_order(
        min in 1u32..=40,
        target in 1u32..=40,
        compile in 1u32..=40,
        desugaring in any::<bool>(),
    ) {
        let config = load(&entries(min, target, compile, desugaring), &DefaultsConfig::default())
            .unwrap();
        match validate(&config, &SigningRegistry::default()) {
            Ok(valid) => {
                prop_assert!(valid.min_sdk() <= valid.target_sdk());
                prop_assert!(valid.target_sdk() <= valid.compile_sdk());
            }
            Err(err) => {
                let rule = err.rule().map(str::to_string);
                prop_assert!(
                    rule.as_deref() == Some(rules::SDK_ORDER)
                        || rule.as_deref() == Some(rules::DESUGARING_MIN_SDK)
                );
            }
        }
    }

    #[test]
    fn desugaring_below_21_never_validates(min in 1u32..21, extra in 0u32..20) {
        let target = min + extra;
        let config = load(&entries(min, target, target, true), &DefaultsConfig::default())
            .unwrap();
        let err = validate(&config, &SigningRegistry::default()).unwrap_err();
        prop_assert_eq!(err.rule(), Some(rules::DESUGARING_MIN_SDK));
    }

    #[test]
    fn emission_is_deterministic(
        min in 21u32..=30,
        extra in 0u32..=5,
        desugaring in any::<bool>(),
    ) {
        let input = entries(min, min + extra, min + extra, desugaring);
        let defaults = DefaultsConfig::default();
        let registry = SigningRegistry::default();

        let first = plan(&input, &defaults, &registry).unwrap();
        let second = plan(&input, &defaults, &registry).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.desugaring_artifact().is_some(), desugaring);
    }

    #[test]
    fn unknown_keys_always_fail(suffix in "[a-z]{1,8}") {
        let mut input = entries(21, 34, 34, false);
        input.insert(format!("x{suffix}"), "1".to_string());
        let err = load(&input, &DefaultsConfig::default()).unwrap_err();
        let is_unknown_field = matches!(err, BuildConfigError::UnknownField { .. });
        prop_assert!(is_unknown_field);
    }

    #[test]
    fn unknown_keys_win_over_malformed_values(
        suffix in "[a-z]{1,8}",
        bad in "[a-z]{1,5}",
    ) {
        let mut input = entries(21, 34, 34, false);
        input.insert("minSdk".to_string(), bad);
        input.insert(format!("zz{suffix}"), "1".to_string());
        let err = load(&input, &DefaultsConfig::default()).unwrap_err();
        let is_unknown_field = matches!(err, BuildConfigError::UnknownField { .. });
        prop_assert!(is_unknown_field);
    }
}

#[test]
fn scenario_desugaring_at_21_emits_desugaring() {
    let input = entries(21, 34, 34, true);
    let result = plan(&input, &DefaultsConfig::default(), &SigningRegistry::default()).unwrap();
    assert_eq!(
        result.desugaring_artifact(),
        Some("com.android.tools:desugar_jdk_libs:2.1.4")
    );
}

#[test]
fn scenario_desugaring_at_16_names_rule() {
    let input = entries(16, 34, 34, true);
    let err = plan(&input, &DefaultsConfig::default(), &SigningRegistry::default()).unwrap_err();
    match err {
        BuildConfigError::InvariantViolation { rule, message } => {
            assert_eq!(rule, rules::DESUGARING_MIN_SDK);
            assert!(message.contains("minSdk>=21"));
        }
        other => panic!("expected InvariantViolation, got {other:?}"),
    }
}

#[test]
fn scenario_unregistered_signing_profile_fails_at_emission() {
    let mut input = entries(21, 34, 34, false);
    input.insert("signingConfigRef".to_string(), "production".to_string());
    let config = load(&input, &DefaultsConfig::default()).unwrap();

    let err = emit(&config, &SigningRegistry::default()).unwrap_err();
    match err {
        BuildConfigError::UnresolvedReference { name, known } => {
            assert_eq!(name, "production");
            assert_eq!(known, vec!["debug".to_string(), "release".to_string()]);
        }
        other => panic!("expected UnresolvedReference, got {other:?}"),
    }
}
