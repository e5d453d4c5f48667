// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two kinds of actor an assignment can name.
///
/// The engine is generic over the kind: users and groups run through the same
/// resolution and reconciliation paths, dispatching on `ActorKind` only at
/// the directory and gateway seams.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ActorKind {
    User,
    Group,
}

impl ActorKind {
    /// Return true if this is the user kind.
    pub fn is_user(&self) -> bool {
        matches!(self, ActorKind::User)
    }

    /// Return true if this is the group kind.
    pub fn is_group(&self) -> bool {
        matches!(self, ActorKind::Group)
    }
}

impl Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActorKind::User => "user",
            ActorKind::Group => "group",
        };

        write!(f, "{}", s)
    }
}

/// A directory entry for an actor which exists in the identity system.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ActorRef {
    pub name: String,
    pub kind: ActorKind,
}

impl ActorRef {
    /// Directory entry for a user.
    pub fn user(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ActorKind::User,
        }
    }

    /// Directory entry for a group.
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ActorKind::Group,
        }
    }
}
