//! Content store
//!
//! Holds the solutions and enrichment tables. The store is built once at
//! startup and shared read-only by every connection.

use super::model::{Enrichment, Solution};

const WEB_ICON: &str = r#"<svg className="w-8 h-8" fill="none" stroke="currentColor" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path strokeLinecap="round" strokeLinejoin="round" strokeWidth="2" d="M10 20l4-16m4 4l4 4-4 4M6 16l-4-4 4-4"></path></svg>"#;
const MOBILE_ICON: &str = r#"<svg className="w-8 h-8" fill="none" stroke="currentColor" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path strokeLinecap="round" strokeLinejoin="round" strokeWidth="2" d="M12 18h.01M8 21h8a2 2 0 002-2V5a2 2 0 00-2-2H8a2 2 0 00-2 2v14a2 2 0 002 2z"></path></svg>"#;
const CLOUD_ICON: &str = r#"<svg className="w-8 h-8" fill="none" stroke="currentColor" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path strokeLinecap="round" strokeLinejoin="round" strokeWidth="2" d="M3 15a4 4 0 004 4h9a5 5 0 10-.1-9.999 5.002 5.002 0 10-9.78 2.096A4.001 4.001 0 003 15z"></path></svg>"#;

/// Read-only content tables
#[derive(Debug, Clone)]
pub struct ContentStore {
    solutions: Vec<Solution>,
    enrichment: Vec<Enrichment>,
}

impl ContentStore {
    /// Build the store from explicit tables
    pub const fn new(solutions: Vec<Solution>, enrichment: Vec<Enrichment>) -> Self {
        Self {
            solutions,
            enrichment,
        }
    }

    /// Build the store with the published site content
    pub fn seeded() -> Self {
        Self::new(seed_solutions(), seed_enrichment())
    }

    /// Solutions in publication order
    pub fn list_solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Enrichment activities in publication order
    pub fn list_enrichment_activities(&self) -> &[Enrichment] {
        &self.enrichment
    }
}

fn seed_solutions() -> Vec<Solution> {
    vec![
        Solution::new(
            "1",
            "Web Development",
            "Creating responsive, high-performing websites tailored to your brand.",
            WEB_ICON,
            "teal",
        ),
        Solution::new(
            "2",
            "Mobile Apps",
            "Developing intuitive, engaging mobile applications for iOS & Android.",
            MOBILE_ICON,
            "blue",
        ),
        Solution::new(
            "3",
            "Cloud Solutions",
            "Leveraging cloud infrastructure for scalable, secure, and efficient operations.",
            CLOUD_ICON,
            "indigo",
        ),
    ]
}

fn seed_enrichment() -> Vec<Enrichment> {
    vec![
        Enrichment::new(
            "1",
            "Yoga Classes",
            "Find balance with our rejuvenating yoga sessions for all skill levels.",
            "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?q=80&w=1200&auto-format&fit=crop",
            "Yoga Class",
        ),
        Enrichment::new(
            "2",
            "Bharatanatyam",
            "Explore the grace of this beautiful classical Indian dance form.",
            "https://images.unsplash.com/photo-1621335824967-24AC02190534?q=80&w=1200&auto-format&fit=crop",
            "Bharatanatyam Dance",
        ),
        Enrichment::new(
            "3",
            "Bhajan Classes",
            "Join our soulful singing sessions to experience devotional music.",
            "https://images.unsplash.com/photo-1583573636327-1279a0525255?q=80&w=1200&auto-format&fit=crop",
            "People singing Bhajans",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_solutions_order() {
        let store = ContentStore::seeded();
        let ids: Vec<&str> = store.list_solutions().iter().map(|s| s.id.as_str()).collect();
        let titles: Vec<&str> = store
            .list_solutions()
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(titles, ["Web Development", "Mobile Apps", "Cloud Solutions"]);
    }

    #[test]
    fn test_enrichment_order() {
        let store = ContentStore::seeded();
        let ids: Vec<&str> = store
            .list_enrichment_activities()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        let titles: Vec<&str> = store
            .list_enrichment_activities()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(titles, ["Yoga Classes", "Bharatanatyam", "Bhajan Classes"]);
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let store = ContentStore::seeded();
        assert_eq!(store.list_solutions(), store.list_solutions());
        assert_eq!(
            serde_json::to_vec(store.list_enrichment_activities()).unwrap(),
            serde_json::to_vec(store.list_enrichment_activities()).unwrap()
        );
    }

    #[test]
    fn test_ids_unique() {
        let store = ContentStore::seeded();
        let ids: HashSet<&str> = store.list_solutions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), store.list_solutions().len());
        let ids: HashSet<&str> = store
            .list_enrichment_activities()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids.len(), store.list_enrichment_activities().len());
    }

    #[test]
    fn test_icons_are_svg_markup() {
        let store = ContentStore::seeded();
        for solution in store.list_solutions() {
            assert!(solution.icon.starts_with("<svg"));
            assert!(solution.icon.ends_with("</svg>"));
        }
        let colors: Vec<&str> = store.list_solutions().iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, ["teal", "blue", "indigo"]);
    }
}
