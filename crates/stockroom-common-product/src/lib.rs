// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

pub mod index;
pub mod model;

pub use index::index_name_problem;
pub use model::*;
