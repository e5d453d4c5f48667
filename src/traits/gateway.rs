// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use crate::result::ObservedPermissions;
use crate::token::GrantToken;

/// Access to the permission state of one remote object.
///
/// The gateway owns all I/O against the remote system, including any retry
/// or timeout policy. Both grant methods must be idempotent on the remote
/// side: setting the tokens an actor already holds is a no-op there, and
/// granting an empty token list revokes everything the actor holds.
pub trait PermissionGateway<T>
where
    T: GrantToken,
{
    type Error: Error;

    /// Read the currently granted permissions, scoped to the given tokens.
    fn read(&self, scope: &[T]) -> Result<ObservedPermissions<T>, Self::Error>;

    /// Replace the tokens granted to a user.
    fn grant_user(&self, name: &str, tokens: &[T]) -> Result<(), Self::Error>;

    /// Replace the tokens granted to a group.
    fn grant_group(&self, name: &str, tokens: &[T]) -> Result<(), Self::Error>;
}
