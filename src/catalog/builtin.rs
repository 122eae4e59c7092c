//! Built-in model personas.
//!
//! Every persona currently fronts the same backend model; they differ in
//! capability embedding and system preamble only.

use super::{CapabilityEmbedding, ModelDescriptor};

/// Backend model all built-in personas invoke.
pub(crate) const DEFAULT_TARGET: &str = "gemini-2.5-flash";

fn persona(
    id: &str,
    display_name: &str,
    description: &str,
    embedding: [f64; 4],
) -> ModelDescriptor {
    let [complexity, code, language, cost] = embedding;
    ModelDescriptor::new(
        id,
        CapabilityEmbedding::new(complexity, code, language, cost),
        DEFAULT_TARGET,
    )
    .display_name(display_name)
    .description(description)
}

pub(crate) fn models() -> Vec<ModelDescriptor> {
    vec![
        // Flagships
        persona("omni", "Omni", "General purpose", [0.6, 0.5, 0.2, 0.9])
            .system_preamble("You are Omni, a helpful AI assistant."),
        persona("pro", "Pro", "Advanced intelligence", [0.95, 0.7, 0.3, 0.2]),
        persona("logic", "Logic", "Complex problem solver", [1.0, 0.6, 0.2, 0.1])
            .system_preamble("You are a logic engine. Explain your reasoning step by step."),
        persona("architect", "Architect", "Code and infrastructure", [0.7, 1.0, 0.1, 0.6])
            .system_preamble("You are an expert software engineer."),
        // Wrappers
        persona("deep-v3", "Deep V3", "Advanced model", [0.8, 0.8, 0.1, 0.5]),
        persona("open-405", "Open 405", "Open-weights wrapper", [0.7, 0.6, 0.2, 0.7]),
        persona("next-gen", "Next-Gen Preview", "Experimental", [0.9, 0.9, 0.2, 0.1]),
        persona("o-mini", "O Mini", "Fast reasoning", [0.8, 0.5, 0.2, 0.8]),
        persona("maverick", "Maverick 17B", "Experimental", [0.5, 0.5, 0.1, 0.8]),
        persona("preview-4", "Preview 4", "Advanced preview", [0.85, 0.8, 0.2, 0.4]),
        persona("transcribe", "Transcribe", "Audio processing", [0.3, 0.2, 0.4, 0.8]),
        persona("mini", "Mini", "Lightweight model", [0.4, 0.4, 0.2, 1.0]),
        persona("phi", "Phi", "Small language model", [0.3, 0.3, 0.1, 1.0]),
        // Arabic
        persona("arabic", "Arabic", "Arabic language specialist", [0.5, 0.3, 1.0, 0.7])
            .system_preamble("أنت مساعد ذكي يجيب باللغة العربية الفصحى بوضوح ودقة."),
        persona("jais", "JAIS Adapter", "Arabic LLM adapter", [0.4, 0.2, 0.9, 0.6]),
        persona("enterprise", "Secure Enterprise", "Enterprise security", [0.6, 0.5, 0.8, 0.5]),
        // Tools
        persona("agent", "Agent", "Autonomous agent", [0.7, 0.7, 0.1, 0.5]),
        persona("shell", "Shell", "Command line assistant", [0.2, 0.8, 0.0, 0.9]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let models = models();
        let ids: HashSet<_> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), models.len());
    }

    #[test]
    fn embeddings_in_unit_range() {
        for m in models() {
            let e = m.embedding;
            for v in [e.complexity, e.code_affinity, e.language_affinity, e.cost_efficiency] {
                assert!((0.0..=1.0).contains(&v), "{} out of range", m.id);
            }
        }
    }
}
