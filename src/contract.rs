// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The interface between a hosted contract and the session running it.

use core::fmt;

use crate::abi::Env;
use crate::error::ContractError;
use crate::schema::ContractSchema;

/// A contract that can be deployed into a [`Session`](crate::session::Session).
///
/// The session only ever sees archived bytes: `call` receives the archived
/// argument and returns the archived result. Use [`abi::handle`] to map a
/// function name onto a typed method.
///
/// [`abi::handle`]: crate::abi::handle
pub trait Contract: fmt::Debug + Send {
    /// Executes the exported function `fn_name`.
    ///
    /// # Errors
    /// Any error aborts the call and reverts its effects.
    fn call(&mut self, env: &mut Env, fn_name: &str, arg: &[u8]) -> Result<Vec<u8>, ContractError>;

    /// Returns a copy of the current state, used to roll back failed calls
    /// and to run read-only queries.
    fn snapshot(&self) -> Box<dyn Contract>;

    /// The contract's static schema.
    fn schema(&self) -> &'static ContractSchema;
}
