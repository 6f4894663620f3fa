// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every function takes a `SqliteConnection` and returns domain values.
//! Missing rows are reported as `Ok(None)` rather than an error.

pub mod conversation;
pub mod employees;
pub mod requests;
pub mod shifts;
