#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::config::Config;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(["deep-research", "--topic", "quantum computing"]).unwrap();

        assert_eq!(args.topic, "quantum computing");
        assert!(args.date_from.is_none());
        assert!(args.date_to.is_none());
        assert!(args.max_results.is_none());
        assert!(args.output.is_none());
        assert!(!args.no_filter);
        assert!(!args.no_source_selection);
        assert!(!args.no_rewrite);
        assert!(!args.verbose);
    }

    #[test]
    fn test_topic_is_required() {
        let result = Args::try_parse_from(["deep-research"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_long_options() {
        let args = Args::try_parse_from([
            "deep-research",
            "--topic", "AI safety",
            "--date-from", "2024-01-01",
            "--date-to", "2024-06-30",
            "--max-results", "5",
            "--output", "/tmp/report.md",
            "--exclude-source", "news,web",
            "--no-filter",
            "--no-source-selection",
            "--no-rewrite",
            "--config", "/tmp/deep_research.toml",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(args.date_from.as_deref(), Some("2024-01-01"));
        assert_eq!(args.date_to.as_deref(), Some("2024-06-30"));
        assert_eq!(args.max_results, Some(5));
        assert_eq!(args.output, Some(PathBuf::from("/tmp/report.md")));
        assert_eq!(args.excluded_sources(), vec!["news", "web"]);
        assert!(args.no_filter);
        assert!(args.no_source_selection);
        assert!(args.no_rewrite);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/deep_research.toml")));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_short_options() {
        let args = Args::try_parse_from([
            "deep-research",
            "-t", "rust async",
            "-m", "3",
            "-o", "out.md",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.topic, "rust async");
        assert_eq!(args.max_results, Some(3));
        assert_eq!(args.output, Some(PathBuf::from("out.md")));
        assert!(args.verbose);
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::try_parse_from([
            "deep-research",
            "--topic", "x",
            "--max-results", "42",
            "--no-filter",
            "--no-rewrite",
            "--verbose",
        ])
        .unwrap();

        let config = args.apply_overrides(Config::default());

        assert_eq!(config.max_results, 42);
        assert!(!config.enable_relevance_filter);
        assert!(config.enable_source_selection);
        assert!(!config.enable_query_rewrite);
        assert!(config.verbose);
    }

    #[test]
    fn test_to_query_uses_default_date_from() {
        let args = Args::try_parse_from(["deep-research", "--topic", "  graph neural networks "]).unwrap();
        let mut config = Config::default();
        config.default_date_from = "2023-05-01".to_string();

        let query = args.to_query(&config).unwrap();

        assert_eq!(query.topic(), "graph neural networks");
        assert_eq!(query.date_from(), Some("2023-05-01"));
        assert_eq!(query.date_to(), None);
        assert_eq!(query.max_results(), 10);
    }

    #[test]
    fn test_to_query_rejects_blank_topic() {
        let args = Args::try_parse_from(["deep-research", "--topic", "   "]).unwrap();
        assert!(args.to_query(&Config::default()).is_err());
    }

    #[test]
    fn test_excluded_sources_empty() {
        let args = Args::try_parse_from(["deep-research", "--topic", "x"]).unwrap();
        assert!(args.excluded_sources().is_empty());
    }
}
