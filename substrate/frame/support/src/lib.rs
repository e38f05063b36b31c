// This file is part of Sable.

// Copyright (C) Sable Developers.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Support code for the modules of the Sable runtime.
//!
//! - [`registry`]: the static table of modules that routes calls and identifies inherents.
//! - [`traits`]: the interface a module implements to be registered.
//! - [`dispatch`]: origins and dispatch information.
//! - [`storage`]: typed access to the key-value store of the host.

#![warn(missing_docs)]

#[doc(hidden)]
pub mod __private {
	pub use codec;
	pub use sable_storage;
}

#[macro_use]
mod macros;

pub mod dispatch;
pub mod registry;
pub mod storage;
pub mod traits;

pub use registry::{ModuleRegistry, RegistryError};
pub use sable_storage::{Blake2_128Concat, Identity, StorageHasher, Twox64Concat};

/// Return `Err($y)` if the condition `$x` is false.
#[macro_export]
macro_rules! ensure {
	( $x:expr, $y:expr $(,)? ) => {{
		if !$x {
			return Err($y.into())
		}
	}};
}

/// Evaluate an expression, assert it returns an expected `Err` value.
#[macro_export]
macro_rules! assert_err {
	( $x:expr , $y:expr $(,)? ) => {
		assert_eq!($x, Err($y.into()));
	};
}

/// Panic if an expression doesn't evaluate to `Ok`.
#[macro_export]
macro_rules! assert_ok {
	( $x:expr $(,)? ) => {
		let is = $x;
		match is {
			Ok(_) => (),
			_ => assert!(false, "Expected Ok(_). Got {:#?}", is),
		}
	};
	( $x:expr, $y:expr $(,)? ) => {
		assert_eq!($x, Ok($y));
	};
}
