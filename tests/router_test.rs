//! Tests for the feature-scoring router.

use std::sync::Arc;

use switchyard::{
    CallerProfile, CapabilityEmbedding, ModelCatalog, ModelDescriptor, Router, RoutingWeights,
    features,
};

fn model(id: &str, embedding: [f64; 4]) -> ModelDescriptor {
    let [c, code, lang, cost] = embedding;
    ModelDescriptor::new(id, CapabilityEmbedding::new(c, code, lang, cost), "target")
}

fn router_over(models: Vec<ModelDescriptor>) -> Router {
    Router::new(
        Arc::new(ModelCatalog::new(models).unwrap()),
        RoutingWeights::default(),
    )
}

fn builtin_router() -> Router {
    Router::new(Arc::new(ModelCatalog::builtin()), RoutingWeights::default())
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn routing_is_deterministic() {
    let router = builtin_router();
    let profile = CallerProfile::default();
    for prompt in ["hi", "Explain recursion step-by-step", "مرحبا", "sudo bash -c ls"] {
        let first = router.route(prompt, "omni", &profile);
        let second = router.route(prompt, "omni", &profile);
        assert_eq!(first, second, "prompt {prompt:?}");
    }
}

// ============================================================================
// Stickiness and tie-breaking
// ============================================================================

#[test]
fn stickiness_breaks_ties_towards_requested_model() {
    let router = router_over(vec![
        model("a", [0.5, 0.5, 0.5, 0.5]),
        model("b", [0.5, 0.5, 0.5, 0.5]),
    ]);
    let profile = CallerProfile::default();

    let decision = router.route("hello there", "b", &profile);
    assert_eq!(decision.chosen_model_id, "b");
    assert!(!decision.caused_switch);

    let decision = router.route("hello there", "a", &profile);
    assert_eq!(decision.chosen_model_id, "a");
    assert!(!decision.caused_switch);
}

#[test]
fn ties_without_bonus_go_to_first_in_catalog() {
    let router = router_over(vec![
        model("a", [0.5, 0.5, 0.5, 0.5]),
        model("b", [0.5, 0.5, 0.5, 0.5]),
    ]);
    let decision = router.route("hello there", "not-in-catalog", &CallerProfile::default());
    assert_eq!(decision.chosen_model_id, "a");
    assert!(decision.caused_switch);
}

#[test]
fn winning_score_includes_bonus() {
    let router = router_over(vec![
        model("a", [0.5, 0.5, 0.5, 0.5]),
        model("b", [0.5, 0.5, 0.5, 0.5]),
    ]);
    let profile = CallerProfile::default();
    let unbiased = router.route("hello", "nobody", &profile);
    let sticky = router.route("hello", "b", &profile);
    assert!((sticky.score - unbiased.score - 0.05).abs() < 1e-9);
}

#[test]
fn clearly_better_model_beats_stickiness() {
    let router = router_over(vec![
        model("cheap", [0.1, 0.0, 0.0, 1.0]),
        model("coder", [0.5, 1.0, 0.0, 1.0]),
    ]);
    let decision = router.route(
        "import x; export y; function z() { return class }",
        "cheap",
        &CallerProfile::default(),
    );
    assert_eq!(decision.chosen_model_id, "coder");
    assert!(decision.caused_switch);
}

#[test]
fn custom_stickiness_can_hold_a_weaker_model() {
    let models = vec![
        model("cheap", [0.1, 0.0, 0.0, 1.0]),
        model("coder", [0.5, 1.0, 0.0, 1.0]),
    ];
    let router = Router::new(
        Arc::new(ModelCatalog::new(models).unwrap()),
        RoutingWeights::default().stickiness(10.0),
    );
    let decision = router.route("import x; export y", "cheap", &CallerProfile::default());
    assert_eq!(decision.chosen_model_id, "cheap");
}

// ============================================================================
// Routing outcomes
// ============================================================================

#[test]
fn reasoning_prompt_routes_to_most_complex_candidate() {
    // The prompt's complexity (0.46) sits above every candidate, so the
    // closest match is the most complex one.
    let router = router_over(vec![
        model("light", [0.2, 0.5, 0.5, 0.5]),
        model("medium", [0.3, 0.5, 0.5, 0.5]),
        model("deep", [0.45, 0.5, 0.5, 0.5]),
    ]);
    let prompt = "Explain recursion step-by-step";
    let f = features::extract(prompt, &CallerProfile::default());
    assert_eq!(f.code_density, 0.0);
    assert_eq!(f.language_signal, 0.0);

    let decision = router.route(prompt, "light", &CallerProfile::default());
    assert_eq!(decision.chosen_model_id, "deep");
    assert!(decision.caused_switch);
}

#[test]
fn arabic_prompt_routes_to_language_specialist() {
    let router = builtin_router();
    let decision = router.route("ما هو الذكاء الاصطناعي؟", "logic", &CallerProfile::default());
    assert_eq!(decision.chosen_model_id, "arabic");
    assert!(decision.caused_switch);
}

#[test]
fn arabic_specialist_wins_despite_mediocre_other_dimensions() {
    let router = router_over(vec![
        model("genius", [0.95, 0.9, 0.1, 0.5]),
        model("arabic", [0.3, 0.2, 1.0, 0.3]),
    ]);
    let decision = router.route("اكتب قصيدة", "genius", &CallerProfile::default());
    assert_eq!(decision.chosen_model_id, "arabic");
}

#[test]
fn enterprise_callers_are_not_pushed_to_cheap_models() {
    let router = router_over(vec![
        model("cheap", [0.3, 0.5, 0.2, 1.0]),
        model("premium", [0.5, 0.5, 0.2, 0.0]),
    ]);
    // complexity 0.46: premium is the better fit, cheap only wins on cost
    let prompt = "Explain recursion step-by-step";
    assert_eq!(
        router.route(prompt, "none", &CallerProfile::standard()).chosen_model_id,
        "cheap"
    );
    assert_eq!(
        router.route(prompt, "none", &CallerProfile::enterprise()).chosen_model_id,
        "premium"
    );
}

#[test]
fn unknown_requested_model_always_switches() {
    let decision = builtin_router().route("hello", "gpt-unknown", &CallerProfile::default());
    assert!(decision.caused_switch);
    assert!(ModelCatalog::builtin().contains(&decision.chosen_model_id));
}

#[test]
fn route_with_model_returns_matching_descriptor() {
    let router = builtin_router();
    let (decision, model) = router.route_with_model("مرحبا", "omni", &CallerProfile::default());
    assert_eq!(decision.chosen_model_id, model.id);
}
