// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;

use thiserror::Error;

use crate::result::ObservedPermissions;
use crate::token::GrantToken;
use crate::traits::PermissionGateway;

/// Error returned by a [`RecordingGateway`] call set up to fail.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("remote call rejected")]
pub struct GatewayError;

/// One mutating call received by a [`RecordingGateway`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GatewayCall<T> {
    GrantUser { name: String, tokens: Vec<T> },
    GrantGroup { name: String, tokens: Vec<T> },
}

impl<T> GatewayCall<T>
where
    T: GrantToken,
{
    pub fn user(name: &str, tokens: &[T]) -> Self {
        GatewayCall::GrantUser {
            name: name.to_string(),
            tokens: tokens.to_vec(),
        }
    }

    pub fn group(name: &str, tokens: &[T]) -> Self {
        GatewayCall::GrantGroup {
            name: name.to_string(),
            tokens: tokens.to_vec(),
        }
    }
}

/// Gateway which serves a canned observed snapshot and records every
/// mutating call it receives.
///
/// Reads and grants can be set up to fail for testing the fail-fast paths.
#[derive(Debug)]
pub struct RecordingGateway<T> {
    observed: ObservedPermissions<T>,
    calls: RefCell<Vec<GatewayCall<T>>>,
    read_scopes: RefCell<Vec<Vec<T>>>,
    fail_reads: bool,
    fail_calls_for: Option<String>,
}

impl<T> RecordingGateway<T>
where
    T: GrantToken,
{
    pub fn new() -> Self {
        Self::with_observed(ObservedPermissions::empty())
    }

    /// Gateway whose `read` returns the given snapshot.
    pub fn with_observed(observed: ObservedPermissions<T>) -> Self {
        Self {
            observed,
            calls: RefCell::new(Vec::new()),
            read_scopes: RefCell::new(Vec::new()),
            fail_reads: false,
            fail_calls_for: None,
        }
    }

    /// Make every `read` fail.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make every grant or revoke for the named actor fail.
    pub fn fail_calls_for(mut self, name: &str) -> Self {
        self.fail_calls_for = Some(name.to_string());
        self
    }

    /// Every mutating call received, in order.
    pub fn calls(&self) -> Vec<GatewayCall<T>> {
        self.calls.borrow().clone()
    }

    /// The scope of every `read` received, in order.
    pub fn read_scopes(&self) -> Vec<Vec<T>> {
        self.read_scopes.borrow().clone()
    }

    fn record(&self, call: GatewayCall<T>, name: &str) -> Result<(), GatewayError> {
        if self.fail_calls_for.as_deref() == Some(name) {
            return Err(GatewayError);
        }

        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl<T> Default for RecordingGateway<T>
where
    T: GrantToken,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PermissionGateway<T> for RecordingGateway<T>
where
    T: GrantToken,
{
    type Error = GatewayError;

    fn read(&self, scope: &[T]) -> Result<ObservedPermissions<T>, Self::Error> {
        self.read_scopes.borrow_mut().push(scope.to_vec());
        if self.fail_reads {
            return Err(GatewayError);
        }

        Ok(self.observed.clone())
    }

    fn grant_user(&self, name: &str, tokens: &[T]) -> Result<(), Self::Error> {
        self.record(GatewayCall::user(name, tokens), name)
    }

    fn grant_group(&self, name: &str, tokens: &[T]) -> Result<(), Self::Error> {
        self.record(GatewayCall::group(name, tokens), name)
    }
}
