// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::actor::ActorKind;
use crate::token::GrantToken;

/// One declared assignment rule: the given users and groups should hold the
/// given tokens on the remote object.
///
/// Multiple assignments may name the same actor. When they do, the rule with
/// the higher priority wins for that actor; between two rules with equal
/// priority the one declared later in the input wins.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Assignment<T> {
    pub priority: i64,
    pub users: Vec<String>,
    pub groups: Vec<String>,
    pub tokens: Vec<T>,
}

/// The canonical, conflict-free view resolved from a list of [`Assignment`]
/// rules.
///
/// Holds one final token set per actor, the ordered name lists in
/// priority-ascending resolution order and the set of all distinct tokens any
/// visited rule referenced. The name lists keep duplicates when an actor is
/// named at more than one priority; the mappings always reflect the final
/// write only.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct AssignmentOrder<T> {
    /// Every distinct token referenced by the visited rules, sorted.
    ///
    /// Used to scope the gateway read for currently-assigned permissions.
    pub tokens: Vec<T>,

    /// Final token set per user.
    pub users: HashMap<String, Vec<T>>,

    /// User names in resolution order.
    pub user_names: Vec<String>,

    /// Final token set per group.
    pub groups: HashMap<String, Vec<T>>,

    /// Group names in resolution order.
    pub group_names: Vec<String>,
}

impl<T> AssignmentOrder<T>
where
    T: GrantToken,
{
    /// Collapse a list of assignment rules into their canonical order.
    ///
    /// Rules are visited in ascending priority and every visit overwrites the
    /// named actors' token sets, so the highest priority naming an actor
    /// determines its final tokens. The sort is stable: two rules with equal
    /// priority are visited in input order and the later declaration wins.
    ///
    /// An empty rule list resolves to an empty order; nothing here errors.
    pub fn resolve(assignments: &[Assignment<T>]) -> Self {
        let mut ordered: Vec<&Assignment<T>> = assignments.iter().collect();
        ordered.sort_by_key(|assignment| assignment.priority);

        let mut tokens = BTreeSet::new();
        let mut users = HashMap::new();
        let mut user_names = Vec::new();
        let mut groups = HashMap::new();
        let mut group_names = Vec::new();

        for assignment in ordered {
            for user in &assignment.users {
                users.insert(user.clone(), assignment.tokens.clone());
                user_names.push(user.clone());
            }

            for group in &assignment.groups {
                groups.insert(group.clone(), assignment.tokens.clone());
                group_names.push(group.clone());
            }

            tokens.extend(assignment.tokens.iter().cloned());
        }

        Self {
            tokens: tokens.into_iter().collect(),
            users,
            user_names,
            groups,
            group_names,
        }
    }

    /// An order declaring no actors and no tokens.
    pub fn empty() -> Self {
        Self {
            tokens: Vec::new(),
            users: HashMap::new(),
            user_names: Vec::new(),
            groups: HashMap::new(),
            group_names: Vec::new(),
        }
    }

    /// Return true if no actor of either kind is declared.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }

    /// The final actor-to-tokens mapping for one kind.
    pub fn mapping(&self, kind: ActorKind) -> &HashMap<String, Vec<T>> {
        match kind {
            ActorKind::User => &self.users,
            ActorKind::Group => &self.groups,
        }
    }

    /// The ordered name list for one kind.
    pub fn names(&self, kind: ActorKind) -> &[String] {
        match kind {
            ActorKind::User => &self.user_names,
            ActorKind::Group => &self.group_names,
        }
    }

    /// Return true if this order declares the named actor.
    pub fn declares(&self, kind: ActorKind, name: &str) -> bool {
        self.mapping(kind).contains_key(name)
    }

    /// Distinct tokens of this order and another, sorted.
    ///
    /// Scopes the gateway read when transitioning between two orders.
    pub fn tokens_with(&self, other: &Self) -> Vec<T> {
        let mut tokens: BTreeSet<T> = self.tokens.iter().cloned().collect();
        tokens.extend(other.tokens.iter().cloned());
        tokens.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Assignment, AssignmentOrder};

    fn assignment(
        priority: i64,
        users: &[&str],
        groups: &[&str],
        tokens: &[&'static str],
    ) -> Assignment<&'static str> {
        Assignment {
            priority,
            users: users.iter().map(|name| name.to_string()).collect(),
            groups: groups.iter().map(|name| name.to_string()).collect(),
            tokens: tokens.to_vec(),
        }
    }

    #[test]
    fn higher_priority_overrides() {
        let assignments = vec![
            assignment(1, &["alice"], &[], &["read"]),
            assignment(2, &["alice"], &[], &["write"]),
        ];

        let order = AssignmentOrder::resolve(&assignments);

        assert_eq!(order.users["alice"], vec!["write"]);
        // Both visits left their mark on the ordered name list.
        assert_eq!(order.user_names, vec!["alice", "alice"]);
        // The distinct token set is the union of every visited rule.
        assert_eq!(order.tokens, vec!["read", "write"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let assignments = vec![
            assignment(20, &["carol"], &["ops"], &["admin"]),
            assignment(10, &["alice", "bob"], &[], &["read", "write"]),
            assignment(30, &["bob"], &["eng"], &["read"]),
        ];

        let first = AssignmentOrder::resolve(&assignments);
        let second = AssignmentOrder::resolve(&assignments);

        assert_eq!(first, second);
        assert_eq!(first.user_names, vec!["alice", "bob", "carol", "bob"]);
        assert_eq!(first.group_names, vec!["ops", "eng"]);
        assert_eq!(first.users["bob"], vec!["read"]);
    }

    #[test]
    fn equal_priority_last_declared_wins() {
        let assignments = vec![
            assignment(1, &["alice"], &[], &["read"]),
            assignment(1, &["alice"], &[], &["write"]),
        ];

        let order = AssignmentOrder::resolve(&assignments);

        assert_eq!(order.users["alice"], vec!["write"]);
        assert_eq!(order.tokens, vec!["read", "write"]);
    }

    #[test]
    fn empty_input_resolves_to_empty_order() {
        let order = AssignmentOrder::resolve(&Vec::<Assignment<String>>::new());

        assert!(order.is_empty());
        assert!(order.tokens.is_empty());
        assert!(order.user_names.is_empty());
        assert!(order.group_names.is_empty());
    }

    #[test]
    fn name_lists_match_mapping_keys() {
        let assignments = vec![
            assignment(1, &["alice"], &["eng"], &["read"]),
            assignment(2, &["bob"], &["ops", "eng"], &["write"]),
        ];

        let order = AssignmentOrder::resolve(&assignments);

        for name in &order.user_names {
            assert!(order.users.contains_key(name));
        }
        for name in &order.group_names {
            assert!(order.groups.contains_key(name));
        }
        assert_eq!(order.users.len(), 2);
        assert_eq!(order.groups.len(), 2);
    }

    #[test]
    fn token_union_across_rules() {
        let assignments = vec![
            assignment(1, &["alice"], &[], &["x"]),
            assignment(2, &["alice"], &[], &["y"]),
        ];

        let order = AssignmentOrder::resolve(&assignments);

        assert_eq!(order.tokens, vec!["x", "y"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn assignment_serializes_as_plain_record() {
        let value = serde_json::json!({
            "priority": 2,
            "users": ["alice"],
            "groups": [],
            "tokens": ["read", "write"],
        });

        let assignment: Assignment<String> = serde_json::from_value(value).unwrap();
        assert_eq!(assignment.priority, 2);
        assert_eq!(assignment.users, vec!["alice"]);
        assert_eq!(assignment.tokens, vec!["read", "write"]);
    }
}
