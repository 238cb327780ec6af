// tests/editor/registration_test.rs
//
// Registering, replacing and disposing the providers of a language.

mod common;

use std::sync::Arc;

use kexpr::lsp::{LanguageRegistry, RegistrationOptions};
use kexpr::{InputItem, InputSource, Position, SharedInputs, TextModel};

const LANGUAGE: &str = "knime-expression";

fn options(columns: Arc<dyn InputSource>) -> RegistrationOptions {
    RegistrationOptions {
        language_id: LANGUAGE.to_string(),
        catalog: Arc::new(common::catalog()),
        columns,
        flow_variables: Arc::new(common::flow_variables),
    }
}

#[test]
fn test_register_provides_completion_and_hover() {
    let registry = LanguageRegistry::new();
    let registration = registry.register(options(Arc::new(common::columns)));
    assert_eq!(registration.language_id(), LANGUAGE);
    assert!(registry.is_registered(LANGUAGE));

    let providers = registry.providers(LANGUAGE).expect("providers registered");
    let model = TextModel::new("$[\"");
    let list = providers
        .completion
        .provide(&model, Position::new(1, 4))
        .expect("completions");
    assert!(list.items.iter().any(|c| c.insert_text == "$[\"input 4\"]"));

    let hover = providers
        .hover
        .provide(&TextModel::new("MAX_INT"), Position::new(1, 2))
        .expect("hover");
    assert!(hover.markdown.contains("The largest integer."));
}

#[test]
fn test_unregister_removes_both_providers() {
    let registry = LanguageRegistry::new();
    let mut registration = registry.register(options(Arc::new(common::columns)));

    assert!(registration.unregister());
    assert!(!registry.is_registered(LANGUAGE));
    assert!(registry.providers(LANGUAGE).is_none());
    // a second call has nothing left to remove
    assert!(!registration.unregister());
}

#[test]
fn test_drop_unregisters() {
    let registry = LanguageRegistry::new();
    {
        let _registration = registry.register(options(Arc::new(common::columns)));
        assert!(registry.is_registered(LANGUAGE));
    }
    assert!(!registry.is_registered(LANGUAGE));
}

#[test]
fn test_replaced_registration_leaves_successor() {
    let registry = LanguageRegistry::new();
    let mut first = registry.register(options(Arc::new(common::columns)));
    let second = registry.register(options(Arc::new(Vec::<InputItem>::new)));

    assert!(!first.unregister());
    assert!(registry.is_registered(LANGUAGE));

    // The successor's providers answer: no columns at all.
    let providers = registry.providers(LANGUAGE).expect("successor registered");
    let list = providers
        .completion
        .provide(&TextModel::new("$["), Position::new(1, 3))
        .expect("completions");
    assert!(!list.items.iter().any(|c| c.insert_text.starts_with("$[\"")));

    drop(second);
    assert!(!registry.is_registered(LANGUAGE));
}

#[test]
fn test_languages_are_independent() {
    let registry = LanguageRegistry::new();
    let _expression = registry.register(options(Arc::new(common::columns)));
    let other = registry.register(RegistrationOptions {
        language_id: "other".to_string(),
        ..options(Arc::new(common::columns))
    });

    drop(other);
    assert!(registry.is_registered(LANGUAGE));
    assert!(!registry.is_registered("other"));
}

#[test]
fn test_inputs_update_without_reregistering() {
    let registry = LanguageRegistry::new();
    let inputs = SharedInputs::new(vec![InputItem::new("old", "STRING")]);
    let _registration = registry.register(options(Arc::new(inputs.clone())));

    let providers = registry.providers(LANGUAGE).expect("providers registered");
    let model = TextModel::new("$");
    let position = Position::new(1, 2);
    let texts = |providers: &kexpr::lsp::LanguageProviders| -> Vec<String> {
        providers
            .completion
            .provide(&model, position)
            .map(|list| list.items.into_iter().map(|c| c.insert_text).collect())
            .unwrap_or_default()
    };
    assert!(texts(&providers).contains(&"$old".to_string()));

    inputs.replace(vec![InputItem::new("new", "STRING")]);
    let current = texts(&providers);
    assert!(current.contains(&"$new".to_string()));
    assert!(!current.contains(&"$old".to_string()));
}
