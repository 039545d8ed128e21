//! Unit tests for pattern compilation
//!
//! Covers the pattern grammar (literals, named and optional parameters,
//! format parameters, custom captures, wildcards, groups, alternatives and
//! pre-built regexes) and the case and strict flags.

#[cfg(test)]
mod pattern_tests {
    use regex::Regex;
    use waypoint_router::{compile, ParamKey, Pattern};

    // ========================================================================
    // Literals and flags
    // ========================================================================

    #[test]
    fn test_literal_matches_only_itself() {
        let pattern = compile("/about/team", false, false).unwrap();

        assert!(pattern.is_match("/about/team"));
        assert!(pattern.is_match("/about/team/"));
        assert!(!pattern.is_match("/about"));
        assert!(!pattern.is_match("/about/team/lead"));
        assert!(!pattern.is_match("/prefix/about/team"));
        assert!(pattern.keys().is_empty());
    }

    #[test]
    fn test_case_rule() {
        let loose = compile("/About", false, false).unwrap();
        assert!(loose.is_match("/about"));
        assert!(loose.is_match("/ABOUT"));

        let exact = compile("/About", true, false).unwrap();
        assert!(exact.is_match("/About"));
        assert!(!exact.is_match("/about"));
    }

    #[test]
    fn test_strict_trailing_slash() {
        let loose = compile("/about", false, false).unwrap();
        let strict = compile("/about", false, true).unwrap();

        assert!(loose.is_match("/about/"));
        assert!(strict.is_match("/about"));
        assert!(!strict.is_match("/about/"));
    }

    #[test]
    fn test_dot_is_literal() {
        let pattern = compile("/feed.xml", false, true).unwrap();
        assert!(pattern.is_match("/feed.xml"));
        assert!(!pattern.is_match("/feedaxml"));
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    #[test]
    fn test_required_param_needs_segment() {
        for strict in [false, true] {
            let pattern = compile("/user/:id", false, strict).unwrap();
            assert!(pattern.is_match("/user/42"), "strict={}", strict);
            assert!(!pattern.is_match("/user/"), "strict={}", strict);
            assert!(!pattern.is_match("/user"), "strict={}", strict);
        }
    }

    #[test]
    fn test_param_keys_in_declaration_order() {
        let pattern = compile("/a/:x/:y", false, false).unwrap();
        let keys: Vec<_> = pattern.keys().iter().map(|spec| spec.key.clone()).collect();
        assert_eq!(keys, vec![ParamKey::from("x"), ParamKey::from("y")]);
        assert!(pattern.keys().iter().all(|spec| !spec.optional));
    }

    #[test]
    fn test_optional_param_includes_slash() {
        let pattern = compile("/user/:id?", false, true).unwrap();
        assert!(pattern.is_match("/user"));
        assert!(pattern.is_match("/user/5"));
        assert!(!pattern.is_match("/user/"));
        assert!(pattern.keys()[0].optional);
    }

    #[test]
    fn test_param_does_not_cross_segments() {
        let pattern = compile("/user/:id", false, false).unwrap();
        assert!(!pattern.is_match("/user/1/2"));
    }

    #[test]
    fn test_custom_capture() {
        let pattern = compile(r"/post/:id(\d+)", false, false).unwrap();
        assert!(pattern.is_match("/post/12"));
        assert!(!pattern.is_match("/post/ab"));
        assert_eq!(pattern.keys().len(), 1);
    }

    #[test]
    fn test_custom_capture_with_nested_group() {
        let pattern = compile(r"/v/:ver((\d+)\.(\d+))/:page", false, false).unwrap();
        let request = pattern.parse("/v/1.2/intro");

        assert!(request.matched);
        assert_eq!(request.param("ver"), Some("1.2"));
        assert_eq!(request.param("page"), Some("intro"));
    }

    #[test]
    fn test_format_param_stops_at_dot() {
        let pattern = compile("/:file.:ext", false, false).unwrap();
        let request = pattern.parse("/archive.tar.gz");

        assert!(request.matched);
        assert_eq!(request.param("file"), Some("archive.tar"));
        assert_eq!(request.param("ext"), Some("gz"));
    }

    #[test]
    fn test_non_capturing_group_is_not_a_param() {
        let pattern = compile("/(?:en|de)/home", false, false).unwrap();
        assert!(pattern.is_match("/en/home"));
        assert!(pattern.is_match("/de/home"));
        assert!(pattern.keys().is_empty());
    }

    // ========================================================================
    // Wildcards, groups and classes
    // ========================================================================

    #[test]
    fn test_star_wildcard_is_positional() {
        let pattern = compile("/files/*", false, false).unwrap();
        assert_eq!(pattern.keys().len(), 1);
        assert_eq!(pattern.keys()[0].key, ParamKey::Index(0));
        assert!(pattern.is_match("/files/"));
        assert!(pattern.is_match("/files/a/b/c.txt"));
    }

    #[test]
    fn test_plus_wildcard_requires_content() {
        let pattern = compile("/files/+", false, true).unwrap();
        assert!(!pattern.is_match("/files/"));
        assert!(pattern.is_match("/files/x"));
    }

    #[test]
    fn test_slash_group() {
        let pattern = compile(r"/docs/(v\d)", false, false).unwrap();
        assert!(pattern.is_match("/docs/v2"));
        assert!(!pattern.is_match("/docs/vx"));
        assert!(pattern.keys().is_empty());
    }

    #[test]
    fn test_character_class_and_quantifier() {
        let pattern = compile("/id/[0-9]{3}", false, false).unwrap();
        assert!(pattern.is_match("/id/123"));
        assert!(!pattern.is_match("/id/12"));
        assert!(!pattern.is_match("/id/abc"));
    }

    #[test]
    fn test_bare_group_is_positional() {
        let pattern = compile("/lang(-[a-z]{2})?", false, false).unwrap();
        assert!(pattern.is_match("/lang"));
        assert!(pattern.is_match("/lang-fr"));
        assert_eq!(pattern.keys()[0].key, ParamKey::Index(0));
    }

    // ========================================================================
    // Alternatives and pre-built regexes
    // ========================================================================

    #[test]
    fn test_alternatives() {
        let pattern = compile(vec!["/about", "/info"], false, false).unwrap();
        assert!(pattern.is_match("/about"));
        assert!(pattern.is_match("/info/"));
        assert!(!pattern.is_match("/contact"));
        assert_eq!(pattern.source(), "(/about|/info)");
    }

    #[test]
    fn test_alternatives_from_array() {
        let pattern = compile(["/a", "/b"], false, true).unwrap();
        assert!(pattern.is_match("/b"));
        assert!(!pattern.is_match("/b/"));
    }

    #[test]
    fn test_alternatives_with_shared_param_name() {
        let pattern = compile(vec!["/user/:id", "/member/:id"], false, false).unwrap();
        assert_eq!(
            pattern.keys().iter().map(|k| k.key.clone()).collect::<Vec<_>>(),
            vec![ParamKey::Index(0), ParamKey::from("id"), ParamKey::from("id")]
        );

        // the whole alternation is positional slot 0
        let request = pattern.parse("/member/9");
        assert_eq!(request.params.get_index(0), Some("/member/9"));
        assert_eq!(request.param("id"), Some("9"));

        // a repeated name binds to its last slot, which did not participate
        let request = pattern.parse("/user/7");
        assert!(request.matched);
        assert_eq!(request.captures[1].as_deref(), Some("7"));
        assert_eq!(request.param("id"), None);
        assert_eq!(request.params.len(), 2);
    }

    #[test]
    fn test_prebuilt_regex_is_used_as_is() {
        let regex = Regex::new(r"^/raw/(\d+)$").unwrap();
        let pattern = compile(Pattern::from(regex), false, false).unwrap();

        assert!(pattern.is_match("/raw/7"));
        // flags do not apply to a pre-built matcher
        assert!(!pattern.is_match("/raw/7/"));
        assert!(pattern.keys().is_empty());
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_invalid_pattern_reports_source() {
        let err = compile("/users/(", false, false).unwrap_err();
        assert!(err.is_invalid_pattern());
        assert!(err.to_string().contains("/users/("));
    }
}
