// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Debug;
use std::hash::Hash as StdHash;

/// Opaque permission or role identifier which can be granted to an actor.
///
/// The engine never interprets tokens. It compares them for set equality when
/// deciding whether a remote call is needed, sorts them for deterministic
/// output and otherwise forwards them to the gateway untouched.
pub trait GrantToken: Clone + Debug + Eq + Ord + StdHash {}

impl GrantToken for String {}
impl GrantToken for &'static str {}
