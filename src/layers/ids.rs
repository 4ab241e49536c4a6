//! Fresh element ids

use std::collections::{HashMap, HashSet};

use crate::model::Template;

/// Hands out `<kind>-<n>` ids that collide with nothing already in the
/// document or handed out before. Numbering per kind starts at 1 and only
/// moves forward, so allocation is deterministic for a given document.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    taken: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_template(template: &Template) -> Self {
        Self {
            taken: template.all_ids().into_iter().collect(),
            counters: HashMap::new(),
        }
    }

    /// Mark an id as used
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.taken.insert(id.into());
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    pub fn next(&mut self, kind: &str) -> String {
        let counter = self.counters.entry(kind.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let id = format!("{}-{}", kind, counter);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayoutBox;

    #[test]
    fn test_skips_existing_ids() {
        let template = Template::new(100.0, 100.0)
            .with_box(LayoutBox::new("box-1"))
            .with_box(LayoutBox::new("box-3"));
        let mut ids = IdAllocator::for_template(&template);
        assert_eq!(ids.next("box"), "box-2");
        assert_eq!(ids.next("box"), "box-4");
        assert_eq!(ids.next("text"), "text-1");
    }

    #[test]
    fn test_reserved_ids_are_skipped() {
        let mut ids = IdAllocator::new();
        ids.reserve("image-1");
        assert!(ids.is_taken("image-1"));
        assert_eq!(ids.next("image"), "image-2");
    }
}
