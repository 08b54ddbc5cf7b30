//! Static text used to dress generated scenes
//!
//! There is no retrieval backend, so titles, excerpts and the answer itself
//! come from fixed template lists.

pub const SOURCES: &[&str] = &[
    "Physics Principles",
    "Orbital Mechanics",
    "Gravitational Theory",
    "Satellite Engineering",
    "Space Technology",
    "Aerospace Research",
    "Newtonian Laws",
    "Celestial Mechanics",
    "Space Science",
    "Astrophysics Fundamentals",
];

pub const CHUNK_TEXTS: &[&str] = &[
    "This source provides fundamental concepts about the underlying principles and methodologies. \
     The content discusses key aspects that are essential for understanding the broader context.",
    "Research shows that this approach has been validated through multiple studies and practical \
     applications. The evidence suggests strong correlation with theoretical frameworks.",
    "The implementation details outlined here demonstrate practical applications of the concept. \
     These methods have been tested and refined over multiple iterations.",
    "Historical context reveals the evolution of this idea and its impact on current practices. \
     Understanding this background is crucial for proper application.",
    "Key principles demonstrate how fundamental forces and dynamics govern behavior in this domain. \
     Mathematical models support these observations with quantitative precision.",
];

pub const WHY_USED: &[&str] = &[
    "Provides foundational context for the main answer",
    "Offers supporting evidence and validation",
    "Presents practical examples and applications",
    "Gives historical perspective and background",
    "Explains core principles and methodologies",
    "Demonstrates real-world implementation",
];

const ANSWER_PARTS: &[&str] = &[
    "To answer your question, we need to understand several interconnected concepts.",
    "The fundamental principle involves a balance of forces and energy.",
    "Key factors include velocity, altitude, and gravitational pull.",
    "These elements work together in a precisely calculated equilibrium.",
    "The result is a stable configuration that can be maintained over time.",
];

/// Ordered answer parts for a question.
///
/// The parts do not depend on the question yet; the signature leaves room for
/// a real answer source.
pub fn answer_parts(_question: &str) -> Vec<String> {
    ANSWER_PARTS.iter().map(|part| (*part).to_string()).collect()
}
