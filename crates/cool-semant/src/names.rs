// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Predefined symbols.
//!
//! Names of the built-in classes and methods, plus the reserved identifiers
//! the checker treats specially.

/// Root of the class hierarchy.
pub const OBJECT: &str = "Object";
/// Built-in input/output class.
pub const IO: &str = "IO";
/// Built-in integer class.
pub const INT: &str = "Int";
/// Built-in boolean class (sealed).
pub const BOOL: &str = "Bool";
/// Built-in string class (sealed).
pub const STRING: &str = "String";

/// Class that must hold the program entry point.
pub const MAIN: &str = "Main";
/// Entry point method.
pub const MAIN_METHOD: &str = "main";

/// The receiver identifier.
pub const SELF: &str = "self";
/// The self-referential type.
pub const SELF_TYPE: &str = "SELF_TYPE";
/// Type of an absent expression. Never the name of a class.
pub const NO_TYPE: &str = "_no_type";
/// Type of the runtime-managed slots in `Int`, `Bool` and `String`.
pub const PRIM_SLOT: &str = "_prim_slot";

/// File name reported for built-in classes.
pub const BASIC_CLASS_FILE: &str = "<basic class>";

/// Built-ins that can never be subclassed.
pub const SEALED_CLASSES: [&str; 2] = [BOOL, STRING];

/// Built-in value types; equality between them must be exact.
pub const BASIC_VALUE_CLASSES: [&str; 3] = [INT, BOOL, STRING];
