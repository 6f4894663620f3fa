// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Functions here do not open transactions themselves. The `Persistence`
//! adapter wraps each public operation in a single immediate transaction
//! so that every check-then-write sequence is atomic.

pub mod conversation;
pub mod decisions;
pub mod employees;
pub mod requests;
pub mod shifts;
