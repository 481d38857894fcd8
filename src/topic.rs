use rand::Rng;

/// Candidate subjects for generated posts.
pub const TOPICS: [&str; 20] = [
    "JavaScript Performance Optimization",
    "TypeScript Tips and Tricks",
    "React Server Components",
    "CSS Grid Layouts",
    "Web Accessibility Fundamentals",
    "Version Control with Git",
    "Docker for Developers",
    "REST API Design",
    "GraphQL Best Practices",
    "Database Indexing Strategies",
    "Test Driven Development",
    "Continuous Integration Pipelines",
    "Serverless Architecture Patterns",
    "Progressive Web Apps",
    "Browser Rendering Internals",
    "Node.js Event Loop",
    "Functional Programming Concepts",
    "Microservices Communication Patterns",
    "Web Security Essentials",
    "Caching Strategies for Web Applications",
];

/// Picks one topic uniformly at random. Repeats across runs are expected;
/// duplicate posts are caught later by the slug existence check.
pub fn select_topic<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TOPICS[rng.gen_range(0..TOPICS.len())]
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{TOPICS, select_topic};

    #[test]
    fn selection_stays_inside_the_list() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let topic = select_topic(&mut rng);
            assert!(TOPICS.contains(&topic));
        }
    }

    #[test]
    fn seeded_selection_is_deterministic() {
        let first = select_topic(&mut StdRng::seed_from_u64(42));
        let second = select_topic(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
