//! Canned answers used when the AI agent cannot be reached.
//!
//! Matching runs on the raw message, not on extracted tags, and follows the
//! same order as use-case detection.

const MIGRATION_ANSWER: &str = "For PCF migration, I found these proven solutions in our catalog: **ECS** (Enterprise Container Service) for production-grade workloads, and **Dolly** migration tool for automated, low-risk migration with rollback capabilities. Both have established success records for enterprise migrations with minimal downtime.";

const CONTAINER_ANSWER: &str = "For containerization, our catalog includes: **Cloud@cx Andromeda** for cost-effective container deployment, **ECS** for enterprise-grade Kubernetes, and comprehensive containerization patterns. These solutions provide security compliance and operational excellence for modern application architecture.";

const CLOUD_ANSWER: &str = "For cloud-native development, I recommend: **Innovation Lab** for rapid prototyping, **ECS** for microservices deployment, and our cloud-native development patterns. These enable modern architectures with proper service mesh, API gateways, and comprehensive observability.";

const TESTING_ANSWER: &str = "For testing environments, our catalog offers comprehensive testing platforms with automated testing capabilities, CI/CD integration, and quality assurance tools designed for enterprise workflows and seamless development integration.";

const AI_ML_ANSWER: &str = "For AI/ML integration, **Innovation Lab** provides rapid prototyping capabilities and experimentation environments. Our catalog includes platforms for data processing, model development, and AI application deployment with enterprise security features.";

const GENERIC_ANSWER: &str = "Based on your query, I'm searching our technology catalog to find the best solutions. Please be more specific about your technology needs (e.g., 'PCF migration', 'containerization', 'cloud-native development') for better recommendations.";

/// Answer `message` from the local catalog.
pub fn respond(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    let has = |kw: &str| lower.contains(kw);

    if has("migrate") && has("pcf") {
        MIGRATION_ANSWER
    } else if has("container") {
        CONTAINER_ANSWER
    } else if has("cloud") || has("microservices") {
        CLOUD_ANSWER
    } else if has("test") {
        TESTING_ANSWER
    } else if has("ai") || has("machine learning") {
        AI_ML_ANSWER
    } else {
        GENERIC_ANSWER
    }
}
