//! Property tests for canonicalization.

use proptest::prelude::*;
use scim_provisioning::ResourceType;
use serde_json::{Map, Value, json};

fn arb_email() -> impl Strategy<Value = Value> {
    (
        "[a-z]{1,8}@[a-z]{1,8}\\.com",
        prop::option::of(prop::sample::select(vec!["work", "home", "other"])),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(value, kind, primary)| {
            let mut email = json!({ "value": value });
            if let Some(kind) = kind {
                email["type"] = json!(kind);
            }
            if let Some(primary) = primary {
                email["primary"] = json!(primary);
            }
            email
        })
}

prop_compose! {
    fn arb_user()(
        user_name in "[a-zA-Z][a-zA-Z0-9._-]{0,15}",
        display_name in prop::option::of("[A-Za-z ]{1,20}"),
        active in prop::option::of(any::<bool>()),
        emails in prop::collection::vec(arb_email(), 0..4),
        given_name in prop::option::of("[A-Za-z]{1,10}"),
        external_id in prop::option::of("[0-9]{1,8}"),
        noise in prop::option::of("[a-z]{1,8}"),
    ) -> Value {
        let mut user = Map::new();
        user.insert("userName".to_string(), json!(user_name));
        if let Some(display_name) = display_name {
            user.insert("displayName".to_string(), json!(display_name));
        }
        if let Some(active) = active {
            user.insert("active".to_string(), json!(active));
        }
        user.insert("emails".to_string(), Value::Array(emails));
        if let Some(given_name) = given_name {
            user.insert("name".to_string(), json!({ "givenName": given_name }));
        }
        if let Some(external_id) = external_id {
            user.insert("externalId".to_string(), json!(external_id));
        }
        if let Some(noise) = noise {
            user.insert("x-undeclared".to_string(), json!(noise));
        }
        Value::Object(user)
    }
}

/// Flip the case of every ASCII letter in top-level keys.
fn shout_keys(user: &Value) -> Value {
    let Some(object) = user.as_object() else {
        return user.clone();
    };
    Value::Object(
        object
            .iter()
            .map(|(key, value)| (key.to_ascii_uppercase(), value.clone()))
            .collect(),
    )
}

proptest! {
    /// Validating the JSON form of a canonical resource reproduces it exactly.
    #[test]
    fn canonical_form_is_a_fixed_point(user in arb_user()) {
        let user_type = ResourceType::core_user().unwrap();
        let canonical = user_type.validate(&user).unwrap();
        let again = user_type.validate(&canonical.to_json()).unwrap();
        prop_assert_eq!(again, canonical);
    }

    /// Attribute names are matched case-insensitively.
    #[test]
    fn key_case_does_not_change_the_canonical_form(user in arb_user()) {
        let schema = ResourceType::core_user().unwrap().schema().clone();
        let canonical = schema.validate(&user).unwrap();
        let shouted = schema.validate(&shout_keys(&user)).unwrap();
        prop_assert_eq!(shouted, canonical);
    }

    /// Undeclared keys never reach the canonical form.
    #[test]
    fn canonical_form_only_holds_declared_names(user in arb_user()) {
        let user_type = ResourceType::core_user().unwrap();
        let canonical = user_type.validate(&user).unwrap();
        for (name, _) in canonical.iter() {
            prop_assert!(
                name == "externalId" || user_type.schema().attribute(name).is_some(),
                "unexpected attribute {}", name
            );
        }
    }
}
