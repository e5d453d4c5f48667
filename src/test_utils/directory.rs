// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::HashSet;

use crate::actor::ActorRef;
use crate::traits::ActorDirectory;

/// Directory with a fixed set of known users and groups.
///
/// Records the warm-up hints it receives so tests can assert which names a
/// pass announced.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    users: HashSet<String>,
    groups: HashSet<String>,
    registered_users: RefCell<Vec<String>>,
    registered_groups: RefCell<Vec<String>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, name: &str) -> Self {
        self.users.insert(name.to_string());
        self
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.groups.insert(name.to_string());
        self
    }

    /// Every username announced through the warm-up hint so far.
    pub fn registered_usernames(&self) -> Vec<String> {
        self.registered_users.borrow().clone()
    }

    /// Every group name announced through the warm-up hint so far.
    pub fn registered_group_names(&self) -> Vec<String> {
        self.registered_groups.borrow().clone()
    }
}

impl ActorDirectory for StaticDirectory {
    fn find_user(&self, name: &str) -> Option<ActorRef> {
        self.users.contains(name).then(|| ActorRef::user(name))
    }

    fn find_group(&self, name: &str) -> Option<ActorRef> {
        self.groups.contains(name).then(|| ActorRef::group(name))
    }

    fn register_usernames(&self, names: &[String]) {
        self.registered_users
            .borrow_mut()
            .extend(names.iter().cloned());
    }

    fn register_group_names(&self, names: &[String]) {
        self.registered_groups
            .borrow_mut()
            .extend(names.iter().cloned());
    }
}
