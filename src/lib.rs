// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! HTTP facade translating structured instrument searches into Elasticsearch
//! boolean queries and reshaping the hits into a flat result list.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
