// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation driver.
//!
//! Drives the permission state of one remote object to match a resolved
//! [`AssignmentOrder`], issuing the minimal number of mutating calls through
//! an injected [`PermissionGateway`]. Four operations cover the lifecycle of
//! a managed object: [`apply`] grants a fresh order, [`update`] transitions
//! between two orders, [`remove`] tears down everything the engine granted
//! and [`compute`] refreshes the computed output from observed state without
//! mutating anything.
//!
//! The driver is synchronous and fail-fast: one actor at a time in
//! resolution order, users fully before groups, stopping at the first failed
//! mutating call without rolling back calls already made.

use std::collections::HashSet;
use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, trace};

use crate::actor::{ActorKind, ActorRef};
use crate::assignment::AssignmentOrder;
use crate::delta::{Delta, same_tokens};
use crate::result::{ComputedAssignment, ObservedPermissions, Reconciled};
use crate::token::GrantToken;
use crate::traits::{ActorDirectory, PermissionGateway};


/// Errors surfaced by a reconciliation pass.
///
/// Grant and revoke failures are distinct so callers can report a failed
/// update separately from a failed removal; both carry the actor the pass
/// stopped at.
#[derive(Debug, Error)]
pub enum ReconcileError<T, E>
where
    T: GrantToken,
    E: std::error::Error,
{
    #[error("failed to read assigned permissions")]
    ReadPermissions(#[source] E),

    #[error("failed to update permissions of user {name}")]
    GrantUser {
        name: String,
        tokens: Vec<T>,
        #[source]
        source: E,
    },

    #[error("failed to update permissions of group {name}")]
    GrantGroup {
        name: String,
        tokens: Vec<T>,
        #[source]
        source: E,
    },

    #[error("failed to remove permissions of user {name}")]
    RevokeUser {
        name: String,
        #[source]
        source: E,
    },

    #[error("failed to remove permissions of group {name}")]
    RevokeGroup {
        name: String,
        #[source]
        source: E,
    },
}

impl<T, E> ReconcileError<T, E>
where
    T: GrantToken,
    E: std::error::Error,
{
    fn grant(kind: ActorKind, name: &str, tokens: &[T], source: E) -> Self {
        match kind {
            ActorKind::User => ReconcileError::GrantUser {
                name: name.to_string(),
                tokens: tokens.to_vec(),
                source,
            },
            ActorKind::Group => ReconcileError::GrantGroup {
                name: name.to_string(),
                tokens: tokens.to_vec(),
                source,
            },
        }
    }

    fn revoke(kind: ActorKind, name: &str, source: E) -> Self {
        match kind {
            ActorKind::User => ReconcileError::RevokeUser {
                name: name.to_string(),
                source,
            },
            ActorKind::Group => ReconcileError::RevokeGroup {
                name: name.to_string(),
                source,
            },
        }
    }
}

fn find<D>(directory: &D, kind: ActorKind, name: &str) -> Option<ActorRef>
where
    D: ActorDirectory,
{
    match kind {
        ActorKind::User => directory.find_user(name),
        ActorKind::Group => directory.find_group(name),
    }
}

fn grant<T, G>(gateway: &G, kind: ActorKind, name: &str, tokens: &[T]) -> Result<(), G::Error>
where
    T: GrantToken,
    G: PermissionGateway<T>,
{
    match kind {
        ActorKind::User => gateway.grant_user(name, tokens),
        ActorKind::Group => gateway.grant_group(name, tokens),
    }
}

/// Grant a freshly-resolved order against an object with no prior state.
///
/// Every resolvable actor receives one grant call with its final token set;
/// actors absent from the directory are skipped silently. The computed
/// output reflects exactly the grants that were issued.
pub fn apply<T, D, G>(
    directory: &D,
    gateway: &G,
    order: &AssignmentOrder<T>,
) -> Result<Reconciled<T>, ReconcileError<T, G::Error>>
where
    T: GrantToken,
    D: ActorDirectory,
    G: PermissionGateway<T>,
{
    let users = apply_kind(directory, gateway, order, ActorKind::User)?;
    let groups = apply_kind(directory, gateway, order, ActorKind::Group)?;

    Ok(Reconciled::new(users, groups))
}

fn apply_kind<T, D, G>(
    directory: &D,
    gateway: &G,
    order: &AssignmentOrder<T>,
    kind: ActorKind,
) -> Result<Vec<ComputedAssignment<T>>, ReconcileError<T, G::Error>>
where
    T: GrantToken,
    D: ActorDirectory,
    G: PermissionGateway<T>,
{
    let mut computed = Vec::new();

    let mut seen = HashSet::new();
    for name in order.names(kind) {
        if !seen.insert(name.as_str()) {
            continue;
        }

        if find(directory, kind, name).is_none() {
            trace!(%kind, %name, "actor not found in directory, skipping");
            continue;
        }

        let tokens = &order.mapping(kind)[name];
        debug!(%kind, %name, ?tokens, "granting permissions");
        grant(gateway, kind, name, tokens)
            .map_err(|source| ReconcileError::grant(kind, name, tokens, source))?;

        computed.push(ComputedAssignment::new(name, tokens));
    }

    Ok(computed)
}

/// Transition an object from a previously-applied order to a planned one.
///
/// Actors whose token sets are unchanged generate no remote call yet still
/// appear in the computed output with their planned tokens; `force_update`
/// reissues the grant for every resolvable actor regardless. Actors declared
/// previously but absent from the plan are revoked after the grant walk of
/// their kind. Users are processed fully before groups.
pub fn update<T, D, G>(
    directory: &D,
    gateway: &G,
    previous: &AssignmentOrder<T>,
    planned: &AssignmentOrder<T>,
    force_update: bool,
) -> Result<Reconciled<T>, ReconcileError<T, G::Error>>
where
    T: GrantToken,
    D: ActorDirectory,
    G: PermissionGateway<T>,
{
    let users = update_kind(
        directory,
        gateway,
        previous,
        planned,
        force_update,
        ActorKind::User,
    )?;
    let groups = update_kind(
        directory,
        gateway,
        previous,
        planned,
        force_update,
        ActorKind::Group,
    )?;

    Ok(Reconciled::new(users, groups))
}

fn update_kind<T, D, G>(
    directory: &D,
    gateway: &G,
    previous: &AssignmentOrder<T>,
    planned: &AssignmentOrder<T>,
    force_update: bool,
    kind: ActorKind,
) -> Result<Vec<ComputedAssignment<T>>, ReconcileError<T, G::Error>>
where
    T: GrantToken,
    D: ActorDirectory,
    G: PermissionGateway<T>,
{
    let delta = Delta::between(previous, planned, kind);
    let removing: HashSet<&str> = delta.removing.iter().map(String::as_str).collect();

    let mut computed = Vec::new();

    let mut seen = HashSet::new();
    for name in planned.names(kind) {
        if !seen.insert(name.as_str()) {
            continue;
        }

        // Handled by the revocation walk below.
        if removing.contains(name.as_str()) {
            continue;
        }

        if find(directory, kind, name).is_none() {
            trace!(%kind, %name, "actor not found in directory, skipping");
            continue;
        }

        let requested = &planned.mapping(kind)[name];
        let in_state = previous.mapping(kind).get(name);

        let unchanged = in_state.is_some_and(|tokens| same_tokens(tokens, requested));
        if force_update || !unchanged {
            debug!(%kind, %name, ?requested, "granting permissions");
            grant(gateway, kind, name, requested)
                .map_err(|source| ReconcileError::grant(kind, name, requested, source))?;
        } else {
            trace!(%kind, %name, "tokens unchanged, no call issued");
        }

        // The computed output reflects intent, whether or not a call was
        // issued.
        computed.push(ComputedAssignment::new(name, requested));
    }

    for name in &delta.removing {
        debug!(%kind, %name, "revoking permissions");
        grant(gateway, kind, name, &[])
            .map_err(|source| ReconcileError::revoke(kind, name, source))?;
    }

    Ok(computed)
}

/// Tear down every grant the engine made for an object.
///
/// Revokes exactly the actors which are both observed on the remote object
/// and declared in the previously-applied order. Observed actors the engine
/// never declared are left untouched: the engine only revokes what it
/// granted.
pub fn remove<T, G>(
    gateway: &G,
    previous: &AssignmentOrder<T>,
    observed: &ObservedPermissions<T>,
) -> Result<(), ReconcileError<T, G::Error>>
where
    T: GrantToken,
    G: PermissionGateway<T>,
{
    for kind in [ActorKind::User, ActorKind::Group] {
        for granted in observed.grants(kind) {
            if !previous.declares(kind, &granted.name) {
                trace!(%kind, name = %granted.name, "not declared here, leaving untouched");
                continue;
            }

            debug!(%kind, name = %granted.name, "revoking permissions");
            grant(gateway, kind, &granted.name, &[])
                .map_err(|source| ReconcileError::revoke(kind, &granted.name, source))?;
        }
    }

    Ok(())
}

/// Refresh the computed output from observed remote state, without mutating
/// anything.
///
/// Emits the *observed* tokens for every observed actor the order declares.
/// This is the drift-detection path: unlike [`apply`] and [`update`], which
/// emit intent, the result reports what is actually granted.
pub fn compute<T>(
    observed: &ObservedPermissions<T>,
    order: &AssignmentOrder<T>,
) -> Reconciled<T>
where
    T: GrantToken,
{
    let mut users = Vec::new();
    let mut groups = Vec::new();

    for kind in [ActorKind::User, ActorKind::Group] {
        let computed = match kind {
            ActorKind::User => &mut users,
            ActorKind::Group => &mut groups,
        };

        for granted in observed.grants(kind) {
            if order.declares(kind, &granted.name) {
                computed.push(ComputedAssignment::new(&granted.name, &granted.tokens));
            }
        }
    }

    Reconciled::new(users, groups)
}

/// Drives full reconciliation passes against one remote object.
///
/// Wraps the four driver operations with the pass orchestration: announcing
/// the names in play to the directory and warming the gateway with a scoped
/// read before mutating. One pass runs at a time; callers coordinating
/// concurrent passes over the same object must serialise them externally.
pub struct Reconciler<'a, T, D, G> {
    directory: &'a D,
    gateway: &'a G,
    _marker: PhantomData<T>,
}

impl<'a, T, D, G> Reconciler<'a, T, D, G>
where
    T: GrantToken,
    D: ActorDirectory,
    G: PermissionGateway<T>,
{
    pub fn new(directory: &'a D, gateway: &'a G) -> Self {
        Self {
            directory,
            gateway,
            _marker: PhantomData,
        }
    }

    /// Run a fresh-grant pass. See [`apply`].
    pub fn apply(
        &self,
        order: &AssignmentOrder<T>,
    ) -> Result<Reconciled<T>, ReconcileError<T, G::Error>> {
        self.register(order, None);
        // Scoping read for cache warm-up only; failures are tolerated.
        let _ = self.gateway.read(&order.tokens);

        apply(self.directory, self.gateway, order)
    }

    /// Run a state-transition pass. See [`update`].
    pub fn update(
        &self,
        previous: &AssignmentOrder<T>,
        planned: &AssignmentOrder<T>,
        force_update: bool,
    ) -> Result<Reconciled<T>, ReconcileError<T, G::Error>> {
        self.register(planned, Some(previous));
        let _ = self.gateway.read(&previous.tokens_with(planned));

        update(self.directory, self.gateway, previous, planned, force_update)
    }

    /// Run a teardown pass. See [`remove`].
    ///
    /// The observed snapshot scopes the revocations, so this read is
    /// load-bearing and its failure is fatal to the pass.
    pub fn remove(
        &self,
        previous: &AssignmentOrder<T>,
    ) -> Result<(), ReconcileError<T, G::Error>> {
        self.register(previous, None);
        let observed = self
            .gateway
            .read(&previous.tokens)
            .map_err(ReconcileError::ReadPermissions)?;

        remove(self.gateway, previous, &observed)
    }

    /// Run a read-only drift check. See [`compute`].
    pub fn refresh(
        &self,
        order: &AssignmentOrder<T>,
    ) -> Result<Reconciled<T>, ReconcileError<T, G::Error>> {
        let observed = self
            .gateway
            .read(&order.tokens)
            .map_err(ReconcileError::ReadPermissions)?;

        Ok(compute(&observed, order))
    }

    fn register(&self, planned: &AssignmentOrder<T>, previous: Option<&AssignmentOrder<T>>) {
        let users = unique_names(
            planned.names(ActorKind::User),
            previous.map(|order| order.names(ActorKind::User)),
        );
        self.directory.register_usernames(&users);

        let groups = unique_names(
            planned.names(ActorKind::Group),
            previous.map(|order| order.names(ActorKind::Group)),
        );
        self.directory.register_group_names(&groups);
    }
}

fn unique_names(planned: &[String], previous: Option<&[String]>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for name in planned.iter().chain(previous.into_iter().flatten()) {
        if seen.insert(name.as_str()) {
            names.push(name.clone());
        }
    }

    names
}
