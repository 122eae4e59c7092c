//! Tests for the model catalog.

use switchyard::{CapabilityEmbedding, ModelCatalog, ModelDescriptor, SwitchyardError};

fn model(id: &str) -> ModelDescriptor {
    ModelDescriptor::new(id, CapabilityEmbedding::new(0.5, 0.5, 0.5, 0.5), "target")
}

#[test]
fn empty_catalog_is_rejected() {
    let err = ModelCatalog::new(vec![]).unwrap_err();
    assert!(matches!(err, SwitchyardError::Configuration(_)));
    assert!(err.to_string().contains("empty"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = ModelCatalog::new(vec![model("a"), model("b"), model("a")]).unwrap_err();
    assert!(matches!(err, SwitchyardError::Configuration(_)));
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn catalog_preserves_order() {
    let catalog = ModelCatalog::new(vec![model("c"), model("a"), model("b")]).unwrap();
    let ids: Vec<_> = catalog.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(catalog.first().id, "c");
}

#[test]
fn lookup_by_id() {
    let catalog = ModelCatalog::new(vec![model("a"), model("b")]).unwrap();
    assert_eq!(catalog.get("b").map(|m| m.id.as_str()), Some("b"));
    assert!(catalog.get("zzz").is_none());
    assert!(catalog.contains("a"));
    assert_eq!(catalog.len(), 2);
    assert!(!catalog.is_empty());
}

#[test]
fn builtin_catalog_contents() {
    let catalog = ModelCatalog::builtin();
    assert_eq!(catalog.len(), 18);
    assert_eq!(catalog.first().id, "omni");

    let arabic = catalog.get("arabic").unwrap();
    assert_eq!(arabic.embedding.language_affinity, 1.0);
    assert!(arabic.system_preamble.is_some());

    let logic = catalog.get("logic").unwrap();
    assert_eq!(logic.embedding.complexity, 1.0);

    assert!(catalog.iter().all(|m| m.invocation_target == "gemini-2.5-flash"));
}

#[test]
fn descriptor_builder_methods() {
    let m = model("x")
        .display_name("Model X")
        .description("test model")
        .system_preamble("be brief");
    assert_eq!(m.display_name, "Model X");
    assert_eq!(m.description, "test model");
    assert_eq!(m.system_preamble.as_deref(), Some("be brief"));
}

#[test]
fn descriptor_display_name_defaults_to_id() {
    assert_eq!(model("plain").display_name, "plain");
}
