// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::actor::ActorKind;
use crate::token::GrantToken;

/// The observable result for one actor after a reconciliation pass: the
/// tokens now in effect for it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ComputedAssignment<T> {
    pub name: String,
    pub tokens: Vec<T>,
}

impl<T> ComputedAssignment<T>
where
    T: GrantToken,
{
    pub fn new(name: &str, tokens: &[T]) -> Self {
        Self {
            name: name.to_string(),
            tokens: tokens.to_vec(),
        }
    }
}

/// The durable output of a reconciliation pass, one computed assignment per
/// granted actor.
///
/// Entries are sorted by name ascending and tokens within each entry are
/// sorted ascending, so two results over the same grants always compare
/// equal.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Reconciled<T> {
    pub users: Vec<ComputedAssignment<T>>,
    pub groups: Vec<ComputedAssignment<T>>,
}

impl<T> Reconciled<T>
where
    T: GrantToken,
{
    /// Build a deterministically-sorted result from unsorted computed lists.
    pub fn new(
        mut users: Vec<ComputedAssignment<T>>,
        mut groups: Vec<ComputedAssignment<T>>,
    ) -> Self {
        sort_computed(&mut users);
        sort_computed(&mut groups);

        Self { users, groups }
    }
}

/// Sort computed assignments by name and their token lists ascending.
fn sort_computed<T>(computed: &mut [ComputedAssignment<T>])
where
    T: GrantToken,
{
    computed.sort_by(|left, right| left.name.cmp(&right.name));
    for assignment in computed.iter_mut() {
        assignment.tokens.sort_by(|left, right| left.cmp(right));
    }
}

/// The tokens currently granted to one actor, as observed on the remote
/// system.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ObservedGrant<T> {
    pub name: String,
    pub tokens: Vec<T>,
}

impl<T> ObservedGrant<T>
where
    T: GrantToken,
{
    pub fn new(name: &str, tokens: &[T]) -> Self {
        Self {
            name: name.to_string(),
            tokens: tokens.to_vec(),
        }
    }
}

/// Snapshot of the access-control state actually present on the remote
/// object.
///
/// Read through the gateway at the start of removal and drift-check passes;
/// never persisted by the engine.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ObservedPermissions<T> {
    pub users: Vec<ObservedGrant<T>>,
    pub groups: Vec<ObservedGrant<T>>,
}

impl<T> ObservedPermissions<T>
where
    T: GrantToken,
{
    /// A snapshot with no grants at all.
    pub fn empty() -> Self {
        Self {
            users: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// The observed grants for one actor kind.
    pub fn grants(&self, kind: ActorKind) -> &[ObservedGrant<T>] {
        match kind {
            ActorKind::User => &self.users,
            ActorKind::Group => &self.groups,
        }
    }
}
