// solana-config-store — wire format and instruction helpers for the Solana
//                       Config program
// © 2025 by Michał Nazarewicz <mina86@mina86.com>
//
// This program is free software; you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation; either version 2 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program; if not, see <https://www.gnu.org/licenses/>.

//! Client library for the Solana Config program.
//!
//! The Config program stores arbitrary bytes in an account together with
//! a list of keys authorised to modify it.  It has a single Store instruction
//! whose data is the list of keys followed by the bytes to store.  The key
//! list uses compact length prefix (see [`short_vec`]) while the stored bytes
//! are not prefixed and span the rest of the instruction data.  Any client
//! must reproduce that format exactly.
//!
//! [`instruction::StoreBuilder`] constructs the instruction and
//! [`instruction::parse_store`] decomposes it back.  [`state`] handles the
//! keys and reading data of a config account.
//!
//! None of the functions perform any I/O or keep any state; they’re pure
//! transformations of their arguments.
//!
//! # Features
#![doc = document_features::document_features!()]

pub mod error;
pub mod instruction;
pub mod short_vec;
pub mod state;

pub use error::Error;

solana_program::declare_id!("Config1111111111111111111111111111111111111");

pub type Result<T = (), E = Error> = core::result::Result<T, E>;
