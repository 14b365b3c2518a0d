// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod elasticsearch;
pub mod logging;
pub mod query_builder;
pub mod result_mapper;
pub mod search;
pub mod seed;
