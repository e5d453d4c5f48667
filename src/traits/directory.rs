// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::actor::ActorRef;

/// Name-to-identity lookups against the identity system backing the remote
/// object.
///
/// The engine treats a directory as read-only: it looks actors up and skips
/// any it cannot resolve, so a declared actor which does not (yet, or no
/// longer) exist never blocks reconciliation of the actors which do.
/// Implementations which look up over the network are expected to absorb
/// their own transport failures and report such actors as absent.
pub trait ActorDirectory {
    /// Resolve a user by name, absent if no such user exists.
    fn find_user(&self, name: &str) -> Option<ActorRef>;

    /// Resolve a group by name, absent if no such group exists.
    fn find_group(&self, name: &str) -> Option<ActorRef>;

    /// Announce the usernames an upcoming pass will look up.
    ///
    /// Best-effort cache warm-up hint so implementations can batch their
    /// lookups; the default does nothing.
    fn register_usernames(&self, _names: &[String]) {}

    /// Announce the group names an upcoming pass will look up.
    fn register_group_names(&self, _names: &[String]) {}
}
