// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Command-line and environment configuration.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP facade for searching the musical instrument catalog
#[derive(Debug, Clone, Parser)]
#[command(name = "instrument-search", version = env!("INSTRUMENT_SEARCH_VERSION"))]
pub struct Settings {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Elasticsearch base URL; `host:port` is accepted and treated as http
    #[arg(long, env = "ELASTICSEARCH_URL", default_value = "http://es01:9200")]
    pub elasticsearch_url: String,

    /// Index holding the instrument documents
    #[arg(long, env = "SEARCH_INDEX", default_value = "musical-instruments")]
    pub index: String,

    /// Timeout for each call to Elasticsearch, in seconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,

    /// JSON array of instruments to bulk-index at startup
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags() {
        let settings = Settings::try_parse_from([
            "instrument-search",
            "--listen-addr",
            "127.0.0.1:9000",
            "--elasticsearch-url",
            "localhost:9200",
            "--index",
            "instruments-test",
            "--request-timeout-secs",
            "3",
            "--seed-file",
            "data/sample.json",
        ])
        .unwrap();

        assert_eq!(settings.listen_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(settings.elasticsearch_url, "localhost:9200");
        assert_eq!(settings.index, "instruments-test");
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        assert_eq!(settings.seed_file, Some(PathBuf::from("data/sample.json")));
    }

    #[test]
    fn test_invalid_listen_addr_is_rejected() {
        let result = Settings::try_parse_from(["instrument-search", "--listen-addr", "nowhere"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result =
            Settings::try_parse_from(["instrument-search", "--request-timeout-secs", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Settings::try_parse_from(["instrument-search", "--request-timeout-secs", "0"]);
        assert!(result.is_err());

        let settings =
            Settings::try_parse_from(["instrument-search", "--request-timeout-secs", "1"]).unwrap();
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}
