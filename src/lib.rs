// SPDX-License-Identifier: MIT OR Apache-2.0

mod actor;
mod assignment;
mod delta;
pub mod reconcile;
mod result;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
mod token;
pub mod traits;

pub use actor::{ActorKind, ActorRef};
pub use assignment::{Assignment, AssignmentOrder};
pub use delta::Delta;
pub use reconcile::{ReconcileError, Reconciler};
pub use result::{ComputedAssignment, ObservedGrant, ObservedPermissions, Reconciled};
pub use token::GrantToken;
