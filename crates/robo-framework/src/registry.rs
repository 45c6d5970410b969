//! The ordered handler table.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::descriptor::{HandlerDescriptor, Tier};

/// One line of generated help.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerDoc {
    pub description: String,
    pub pattern: String,
}

/// Ordered table of descriptors from every registered handler instance.
///
/// Descriptors are ordered by tier, then trigger name; the sort is stable so
/// equal keys keep insertion order. Readers get an immutable snapshot, so a
/// dispatch in progress never observes a half-updated table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    table: Arc<[HandlerDescriptor]>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `descriptors` and re-sorts the whole table.
    pub fn insert(&mut self, descriptors: Vec<HandlerDescriptor>) {
        let mut table: Vec<HandlerDescriptor> = self.table.iter().cloned().collect();
        table.extend(descriptors);
        table.sort_by(|a, b| {
            a.tier()
                .cmp(&b.tier())
                .then_with(|| a.trigger_name().cmp(b.trigger_name()))
        });
        self.table = table.into();
    }

    /// Snapshot of the table.
    pub fn all(&self) -> Arc<[HandlerDescriptor]> {
        Arc::clone(&self.table)
    }

    /// Help entries for every descriptor with a description, in table order.
    pub fn documentation(&self) -> Vec<HandlerDoc> {
        self.table
            .iter()
            .filter_map(|d| {
                d.description().map(|description| HandlerDoc {
                    description: description.to_string(),
                    pattern: d.pattern_text().to_string(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of distinct handler instances in the table.
    pub fn instance_count(&self) -> usize {
        self.table
            .iter()
            .map(HandlerDescriptor::instance_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Returns `true` if any descriptor belongs to `tier`.
    pub fn has_tier(&self, tier: Tier) -> bool {
        self.table.iter().any(|d| d.tier() == tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TriggerContext;
    use crate::handler::{Handler, HandlerResult};
    use crate::trigger::TriggerSpec;

    struct Alpha;

    impl Alpha {
        async fn zeta(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }

        async fn beta(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }
    }

    impl Handler for Alpha {
        fn triggers(&self) -> Vec<TriggerSpec<Self>> {
            crate::triggers! {
                /// last
                zeta => "^z",
                beta => "^b",
            }
        }
    }

    struct Omega;

    impl Omega {
        async fn alpha(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }

        async fn beta(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }
    }

    impl Handler for Omega {
        fn triggers(&self) -> Vec<TriggerSpec<Self>> {
            crate::triggers! {
                /// first
                alpha => "^a",
                beta => "^b2",
            }
        }
    }

    struct Gamma;

    impl Gamma {
        async fn gamma(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }

        async fn delta(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }
    }

    impl Handler for Gamma {
        fn triggers(&self) -> Vec<TriggerSpec<Self>> {
            crate::triggers! {
                gamma => "^g",
                delta => "^d",
            }
        }
    }

    fn names(registry: &Registry) -> Vec<(String, String)> {
        registry
            .all()
            .iter()
            .map(|d| (d.handler_name().to_string(), d.trigger_name().to_string()))
            .collect()
    }

    fn extract<H: Handler>(h: H, id: u64, tier: Tier) -> Vec<HandlerDescriptor> {
        HandlerDescriptor::extract(Arc::new(h), id, tier).unwrap()
    }

    #[test]
    fn test_sorted_by_trigger_name_with_stable_ties() {
        let mut registry = Registry::new();
        registry.insert(extract(Alpha, 0, Tier::User));
        registry.insert(extract(Omega, 1, Tier::User));

        assert_eq!(
            names(&registry),
            vec![
                ("Omega".to_string(), "alpha".to_string()),
                ("Alpha".to_string(), "beta".to_string()),
                ("Omega".to_string(), "beta".to_string()),
                ("Alpha".to_string(), "zeta".to_string()),
            ]
        );
        assert_eq!(registry.instance_count(), 2);
    }

    #[test]
    fn test_order_independent_of_registration_order_for_distinct_names() {
        let mut forward = Registry::new();
        forward.insert(extract(Alpha, 0, Tier::User));
        forward.insert(extract(Gamma, 1, Tier::User));

        let mut backward = Registry::new();
        backward.insert(extract(Gamma, 0, Tier::User));
        backward.insert(extract(Alpha, 1, Tier::User));

        let triggers = |r: &Registry| -> Vec<String> {
            r.all()
                .iter()
                .map(|d| d.pattern_text().to_string())
                .collect()
        };
        assert_eq!(triggers(&forward), triggers(&backward));
        assert_eq!(triggers(&forward), vec!["^b", "^d", "^g", "^z"]);
    }

    #[test]
    fn test_shared_trigger_name_keeps_registration_order() {
        let mut registry = Registry::new();
        registry.insert(extract(Omega, 0, Tier::User));
        registry.insert(extract(Alpha, 1, Tier::User));

        assert_eq!(
            names(&registry),
            vec![
                ("Omega".to_string(), "alpha".to_string()),
                ("Omega".to_string(), "beta".to_string()),
                ("Alpha".to_string(), "beta".to_string()),
                ("Alpha".to_string(), "zeta".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_tier_sorts_after_user_tier() {
        let mut registry = Registry::new();
        registry.insert(extract(Omega, 0, Tier::Default));
        registry.insert(extract(Alpha, 1, Tier::User));

        let order = names(&registry);
        assert_eq!(order[0], ("Alpha".to_string(), "beta".to_string()));
        assert_eq!(order[1], ("Alpha".to_string(), "zeta".to_string()));
        assert_eq!(order[2], ("Omega".to_string(), "alpha".to_string()));
        assert!(registry.has_tier(Tier::Default));
    }

    #[test]
    fn test_documentation_skips_undocumented() {
        let mut registry = Registry::new();
        registry.insert(extract(Alpha, 0, Tier::User));
        registry.insert(extract(Omega, 1, Tier::User));

        assert_eq!(
            registry.documentation(),
            vec![
                HandlerDoc {
                    description: "first".to_string(),
                    pattern: "^a".to_string(),
                },
                HandlerDoc {
                    description: "last".to_string(),
                    pattern: "^z".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_inserts() {
        let mut registry = Registry::new();
        registry.insert(extract(Alpha, 0, Tier::User));
        let snapshot = registry.all();
        registry.insert(extract(Omega, 1, Tier::User));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 4);
    }
}
