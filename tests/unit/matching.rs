//! Unit tests for path matching
//!
//! Tests for `CompiledPattern::parse`: parameter extraction, absent optional
//! slots, positional slots, percent decoding and idempotence.

#[cfg(test)]
mod matching_tests {
    use regex::Regex;
    use waypoint_router::{compile, ParamKey, Pattern};

    #[test]
    fn test_named_params() {
        let pattern = compile("/user/:id", false, false).unwrap();

        let request = pattern.parse("/user/42");
        assert!(request.matched);
        assert_eq!(request.param("id"), Some("42"));
        assert_eq!(request.path, "/user/42");

        let request = pattern.parse("/user/");
        assert!(!request.matched);
        assert!(request.params.is_empty());
        assert!(request.captures.is_empty());
    }

    #[test]
    fn test_params_keep_declaration_order() {
        let pattern = compile("/a/:x/:y", false, false).unwrap();
        let request = pattern.parse("/a/1/2");

        let pairs: Vec<_> = request
            .params
            .iter()
            .map(|(key, value)| (key.to_string(), value.map(str::to_string)))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("x".to_string(), Some("1".to_string())),
                ("y".to_string(), Some("2".to_string())),
            ]
        );
    }

    #[test]
    fn test_optional_param_absent_and_present() {
        let pattern = compile("/user/:id?", false, false).unwrap();

        let request = pattern.parse("/user");
        assert!(request.matched);
        assert!(request.params.contains("id"));
        assert_eq!(request.param("id"), None);
        assert_eq!(request.captures, vec![None]);

        let request = pattern.parse("/user/5");
        assert!(request.matched);
        assert_eq!(request.param("id"), Some("5"));
    }

    #[test]
    fn test_wildcard_captures_rest_of_path() {
        let pattern = compile("/files/*", false, false).unwrap();
        let request = pattern.parse("/files/a/b/c.txt");

        assert!(request.matched);
        assert_eq!(request.params.len(), 1);
        assert_eq!(request.params.get_index(0), Some("a/b/c.txt"));
        assert_eq!(
            request.params.get_key(&ParamKey::Index(0)),
            Some("a/b/c.txt")
        );
    }

    #[test]
    fn test_mixed_named_and_positional() {
        let pattern = compile("/repo/:owner/*", false, false).unwrap();
        let request = pattern.parse("/repo/alice/src/lib.rs");

        assert_eq!(request.param("owner"), Some("alice"));
        assert_eq!(request.params.get_index(0), Some("src/lib.rs"));
    }

    #[test]
    fn test_alternatives_capture_member() {
        let pattern = compile(vec!["/about", "/info"], false, false).unwrap();
        let request = pattern.parse("/info");
        assert!(request.matched);
        assert_eq!(request.params.get_index(0), Some("/info"));
    }

    #[test]
    fn test_prebuilt_regex_positional_captures() {
        let regex = Regex::new(r"^/raw/(\d+)/(\w+)?$").unwrap();
        let pattern = compile(Pattern::Regex(regex), false, false).unwrap();
        let request = pattern.parse("/raw/7/");

        assert!(request.matched);
        assert_eq!(request.params.get_index(0), Some("7"));
        assert_eq!(request.params.get_index(1), None);
        assert_eq!(request.params.len(), 2);
    }

    #[test]
    fn test_consecutive_optional_params() {
        let pattern = compile("/a/:x?/:y?", false, false).unwrap();

        let request = pattern.parse("/a");
        assert!(request.matched);
        assert_eq!(request.captures, vec![None, None]);

        let request = pattern.parse("/a/");
        assert!(request.matched);
        assert_eq!(request.captures, vec![None, None]);

        // the first optional slot is filled first
        let request = pattern.parse("/a/1");
        assert_eq!(request.param("x"), Some("1"));
        assert_eq!(request.param("y"), None);

        let request = pattern.parse("/a/1/2/");
        assert_eq!(request.param("x"), Some("1"));
        assert_eq!(request.param("y"), Some("2"));

        assert!(!pattern.parse("/a/1/2/3").matched);
    }

    #[test]
    fn test_optional_format_param() {
        let pattern = compile("/:file.:ext?", false, false).unwrap();
        assert!(!pattern.keys()[0].optional);
        assert!(pattern.keys()[1].optional);

        let request = pattern.parse("/report.pdf");
        assert_eq!(request.param("file"), Some("report"));
        assert_eq!(request.param("ext"), Some("pdf"));

        let request = pattern.parse("/readme");
        assert!(request.matched);
        assert_eq!(request.param("file"), Some("readme"));
        assert_eq!(request.param("ext"), None);

        // the extension cannot contain a dot, so the last one splits
        let request = pattern.parse("/archive.tar.gz");
        assert_eq!(request.param("file"), Some("archive.tar"));
        assert_eq!(request.param("ext"), Some("gz"));

        assert!(!pattern.parse("/docs/readme.md").matched);
    }

    #[test]
    fn test_percent_decoding() {
        let pattern = compile("/search/:q", false, false).unwrap();
        let request = pattern.parse("/search/hello%20world");

        assert_eq!(request.param("q"), Some("hello world"));
        assert_eq!(request.captures, vec![Some("hello%20world".to_string())]);
    }

    #[test]
    fn test_undecodable_param_keeps_raw_text() {
        let pattern = compile("/search/:q", false, false).unwrap();
        let request = pattern.parse("/search/%FF");

        assert!(request.matched);
        assert_eq!(request.param("q"), Some("%FF"));
    }

    #[test]
    fn test_typed_param_access() {
        let pattern = compile(r"/page/:n(\d+)", false, false).unwrap();
        let request = pattern.parse("/page/12");

        assert_eq!(request.params.get_as::<u32>("n"), Some(12));
        assert_eq!(request.params.get_as::<u32>("missing"), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let pattern = compile("/user/:id/:tab?", false, false).unwrap();
        for path in ["/user/1", "/user/1/posts", "/nope"] {
            assert_eq!(pattern.parse(path), pattern.parse(path), "path {}", path);
        }
    }
}
