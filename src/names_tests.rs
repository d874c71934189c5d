#[cfg(test)]
mod tests {
    use crate::error::{ERR_COMPONENT_AMBIGUOUS, ERR_CSS_PARSE, ERR_NAME_COLLISION};
    use crate::names::{collect_names, extract_names, ExtractOptions};
    use crate::rewrite::{rewrite_styles, RewriteOptions};
    use crate::tree::BuildTree;

    fn options(terse: bool) -> ExtractOptions {
        ExtractOptions {
            extensions: vec!["css".to_string(), "scss".to_string()],
            terse_class_names: terse,
            ..ExtractOptions::default()
        }
    }

    #[test]
    fn test_single_component() {
        let tree = BuildTree::from_entries([("widget/style.css", ".box { color: red; }")]);
        let mapping = collect_names(&[tree], &options(false)).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("widget"), Some(&["widget__box".to_string()][..]));
    }

    #[test]
    fn test_names_match_rewritten_css() {
        let source = ".card { } .card .title:hover { } .footer { }";
        let tree = BuildTree::from_entries([("profile/card/style.css", source)]);

        for terse in [false, true] {
            let rewritten = rewrite_styles(
                &tree,
                &RewriteOptions {
                    terse_class_names: terse,
                    ..RewriteOptions::default()
                },
            )
            .unwrap();
            let css = rewritten.get("profile/card/style.css").unwrap();

            let mapping = collect_names(&[tree.clone()], &options(terse)).unwrap();
            let names = mapping.get("profile/card").unwrap();
            assert_eq!(names.len(), 3);
            for name in names {
                assert!(css.contains(&format!(".{}", name)), "{} not in {}", name, css);
            }
        }
    }

    #[test]
    fn test_classic_and_pod_components_together() {
        let tree = BuildTree::from_entries([
            ("widget/style.css", ".box {}"),
            ("styles/component-styles/nav.scss", ".link {}"),
        ]);
        let mapping = collect_names(&[tree], &options(false)).unwrap();
        let components: Vec<&str> = mapping.iter().map(|(c, _)| c).collect();
        assert_eq!(components, vec!["nav", "widget"]);
        assert_eq!(mapping.get("nav"), Some(&["nav__link".to_string()][..]));
    }

    #[test]
    fn test_later_tree_wins() {
        let first = BuildTree::from_entries([("widget/style.css", ".old {}")]);
        let second = BuildTree::from_entries([("widget/style.css", ".new {}")]);
        let mapping = collect_names(&[first, second], &options(false)).unwrap();
        assert_eq!(mapping.get("widget"), Some(&["widget__new".to_string()][..]));
    }

    #[test]
    fn test_repeated_tree_is_harmless() {
        let tree = BuildTree::from_entries([("widget/style.css", ".box {}")]);
        let once = collect_names(&[tree.clone()], &options(false)).unwrap();
        let twice = collect_names(&[tree.clone(), tree], &options(false)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pod_and_classic_for_one_component_is_ambiguous() {
        let tree = BuildTree::from_entries([
            ("foo/style.css", ".a {}"),
            ("styles/component-styles/foo.css", ".b {}"),
        ]);
        let err = collect_names(&[tree], &options(false)).unwrap_err();
        assert_eq!(err.code(), ERR_COMPONENT_AMBIGUOUS);
        assert!(err.to_string().contains("'foo'"));
    }

    #[test]
    fn test_sanitized_aliases_collide() {
        let tree = BuildTree::from_entries([
            ("my.widget/style.css", ".x {}"),
            ("my_widget/style.css", ".x {}"),
        ]);
        let err = collect_names(&[tree], &options(false)).unwrap_err();
        assert_eq!(err.code(), ERR_NAME_COLLISION);
        assert!(err.to_string().contains("my_widget__x"));
    }

    #[test]
    fn test_other_extensions_are_ignored() {
        let tree = BuildTree::from_entries([
            ("widget/style.css", ".box {}"),
            ("widget/style.less", ".ignored {}"),
            ("widget/component.js", "export default {}"),
        ]);
        let mapping = collect_names(&[tree], &options(false)).unwrap();
        assert_eq!(mapping.get("widget"), Some(&["widget__box".to_string()][..]));
    }

    #[test]
    fn test_escaped_classes_are_unescaped_in_artifact() {
        let tree = BuildTree::from_entries([("grid/style.css", ".md\\:col-6 {}")]);
        let mapping = collect_names(&[tree], &options(false)).unwrap();
        assert_eq!(mapping.get("grid"), Some(&["grid__md:col-6".to_string()][..]));
    }

    #[test]
    fn test_parse_errors_propagate() {
        let tree = BuildTree::from_entries([("widget/style.css", ".box {")]);
        let err = collect_names(&[tree], &options(false)).unwrap_err();
        assert_eq!(err.code(), ERR_CSS_PARSE);
    }

    #[test]
    fn test_artifact_files() {
        let tree = BuildTree::from_entries([
            ("widget/style.css", ".box {} .title {}"),
            ("empty/style.css", "p {}"),
        ]);
        let artifact = extract_names(&[tree], &options(false)).unwrap();
        assert_eq!(artifact.len(), 2);

        let module = artifact.get("pod-names.js").unwrap();
        assert!(module.starts_with("// Generated by component-css"));
        assert!(module.contains("export default {\n"));
        assert!(module.contains("  \"empty\": [],\n"));
        assert!(module.contains("  \"widget\": [\"widget__box\",\"widget__title\"],\n"));
        assert!(module.ends_with("};\n"));

        let json: serde_json::Value =
            serde_json::from_str(artifact.get("pod-names.json").unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "empty": [],
                "widget": ["widget__box", "widget__title"]
            })
        );
    }

    #[test]
    fn test_custom_output_name() {
        let artifact = extract_names(
            &[],
            &ExtractOptions {
                output_name: "class-map".to_string(),
                ..ExtractOptions::default()
            },
        )
        .unwrap();
        assert_eq!(artifact.get("class-map.js"), Some("// Generated by component-css. Maps components to their namespaced class names.\nexport default {\n};\n"));
        assert_eq!(artifact.get("class-map.json"), Some("{}\n"));
    }

    #[test]
    fn test_escaped_class_matches_rewritten_css() {
        let tree = BuildTree::from_entries([("widget/style.css", ".\\31 0 { color: red; }")]);

        let mapping = collect_names(&[tree.clone()], &options(false)).unwrap();
        assert_eq!(mapping.get("widget"), Some(&["widget__10".to_string()][..]));

        let mapping = collect_names(&[tree.clone()], &options(true)).unwrap();
        let name = &mapping.get("widget").unwrap()[0];
        let rewritten = rewrite_styles(
            &tree,
            &RewriteOptions {
                terse_class_names: true,
                ..RewriteOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            rewritten.get("widget/style.css").unwrap(),
            format!(".{} {{ color: red; }}", name)
        );
    }

    #[test]
    fn test_partials_merge_into_their_component() {
        let tree = BuildTree::from_entries([
            ("widget/_vars.scss", ".muted { }"),
            ("widget/style.scss", ".box { } .muted { }"),
            ("_mixins.scss", ".helper { }"),
        ]);
        let mapping = collect_names(&[tree], &options(false)).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get("widget"),
            Some(&["widget__muted".to_string(), "widget__box".to_string()][..])
        );
    }

    #[test]
    fn test_interpolated_classes_are_not_listed() {
        let tree = BuildTree::from_entries([(
            "widget/style.scss",
            "@for $i from 1 through 2 { .m-#{$i} { margin: 0; } }\n.box { }",
        )]);
        let mapping = collect_names(&[tree], &options(false)).unwrap();
        assert_eq!(mapping.get("widget"), Some(&["widget__box".to_string()][..]));
    }
}
