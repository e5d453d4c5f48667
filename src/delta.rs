// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partitioning of declared actors between two resolved orders.

use std::collections::HashSet;

use crate::actor::ActorKind;
use crate::assignment::AssignmentOrder;
use crate::token::GrantToken;

/// Order-independent set equality over two token lists.
pub fn same_tokens<T>(left: &[T], right: &[T]) -> bool
where
    T: GrantToken,
{
    let left: HashSet<&T> = left.iter().collect();
    let right: HashSet<&T> = right.iter().collect();

    left == right
}

/// The partition of one actor kind between a previously-applied order and a
/// newly-planned one.
///
/// Names appear once each, in the resolution order of the side they came
/// from, even when the underlying name lists carry duplicates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Delta {
    /// Declared on both sides with equal token sets; no remote call needed.
    pub unchanged: Vec<String>,

    /// Newly declared, or declared with a different token set; to be granted.
    pub changed: Vec<String>,

    /// Declared previously but absent from the plan; to be revoked.
    pub removing: Vec<String>,
}

impl Delta {
    /// Partition the actors of one kind between two orders.
    pub fn between<T>(
        previous: &AssignmentOrder<T>,
        planned: &AssignmentOrder<T>,
        kind: ActorKind,
    ) -> Self
    where
        T: GrantToken,
    {
        let mut delta = Delta::default();

        let mut seen = HashSet::new();
        for name in planned.names(kind) {
            if !seen.insert(name.as_str()) {
                continue;
            }

            let requested = &planned.mapping(kind)[name];
            match previous.mapping(kind).get(name) {
                Some(in_state) if same_tokens(in_state, requested) => {
                    delta.unchanged.push(name.clone());
                }
                _ => delta.changed.push(name.clone()),
            }
        }

        let mut seen = HashSet::new();
        for name in previous.names(kind) {
            if !seen.insert(name.as_str()) {
                continue;
            }

            if !planned.declares(kind, name) {
                delta.removing.push(name.clone());
            }
        }

        delta
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::ActorKind;
    use crate::assignment::{Assignment, AssignmentOrder};

    use super::{Delta, same_tokens};

    fn order(rules: &[(i64, &[&str], &[&'static str])]) -> AssignmentOrder<&'static str> {
        let assignments: Vec<Assignment<&'static str>> = rules
            .iter()
            .map(|(priority, users, tokens)| Assignment {
                priority: *priority,
                users: users.iter().map(|name| name.to_string()).collect(),
                groups: Vec::new(),
                tokens: tokens.to_vec(),
            })
            .collect();

        AssignmentOrder::resolve(&assignments)
    }

    #[test]
    fn set_equality_ignores_order() {
        assert!(same_tokens(&["read", "write"], &["write", "read"]));
        assert!(!same_tokens(&["read"], &["write", "read"]));
        assert!(same_tokens::<&str>(&[], &[]));
    }

    #[test]
    fn partitions_actors() {
        let previous = order(&[
            (1, &["alice"], &["read"]),
            (2, &["bob"], &["write"]),
            (3, &["carol"], &["read"]),
        ]);
        let planned = order(&[
            (1, &["alice"], &["read"]),
            (2, &["bob"], &["admin"]),
            (3, &["dave"], &["read"]),
        ]);

        let delta = Delta::between(&previous, &planned, ActorKind::User);

        assert_eq!(delta.unchanged, vec!["alice"]);
        assert_eq!(delta.changed, vec!["bob", "dave"]);
        assert_eq!(delta.removing, vec!["carol"]);
    }

    #[test]
    fn duplicate_names_partition_once() {
        // Alice is declared at two priorities; only her final token set
        // takes part in the comparison.
        let previous = order(&[(1, &["alice"], &["read"])]);
        let planned = order(&[(1, &["alice"], &["read"]), (2, &["alice"], &["read"])]);

        let delta = Delta::between(&previous, &planned, ActorKind::User);

        assert_eq!(delta.unchanged, vec!["alice"]);
        assert!(delta.changed.is_empty());
        assert!(delta.removing.is_empty());
    }

    #[test]
    fn empty_previous_marks_everything_changed() {
        let previous = AssignmentOrder::<&str>::empty();
        let planned = order(&[(1, &["alice", "bob"], &["read"])]);

        let delta = Delta::between(&previous, &planned, ActorKind::User);

        assert!(delta.unchanged.is_empty());
        assert_eq!(delta.changed, vec!["alice", "bob"]);
        assert!(delta.removing.is_empty());
    }
}
