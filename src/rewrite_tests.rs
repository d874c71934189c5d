#[cfg(test)]
mod tests {
    use crate::error::ERR_CSS_PARSE;
    use crate::rewrite::{rewrite_styles, RewriteOptions};
    use crate::tree::BuildTree;

    fn options(extensions: &[&str], terse: bool) -> RewriteOptions {
        RewriteOptions {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            terse_class_names: terse,
            ..RewriteOptions::default()
        }
    }

    #[test]
    fn test_rewrites_pod_style() {
        let tree = BuildTree::from_entries([("widget/style.css", ".box { color: red; }")]);
        let out = rewrite_styles(&tree, &options(&["css"], false)).unwrap();
        assert_eq!(
            out.get("widget/style.css"),
            Some(".widget__box { color: red; }")
        );
    }

    #[test]
    fn test_rewrites_classic_style() {
        let tree = BuildTree::from_entries([(
            "styles/component-styles/nav-bar.scss",
            ".nav { &.is-active { color: red; } }",
        )]);
        let out = rewrite_styles(&tree, &options(&["scss"], false)).unwrap();
        assert_eq!(
            out.get("styles/component-styles/nav-bar.scss"),
            Some(".nav-bar__nav { &.nav-bar__is-active { color: red; } }")
        );
    }

    #[test]
    fn test_same_input_same_output() {
        let tree = BuildTree::from_entries([
            ("a/style.css", ".x {} .y {}"),
            ("b/style.css", ".x {}"),
            ("c/d/style.css", ".z:hover {}"),
        ]);
        let opts = options(&["css"], true);
        let first = rewrite_styles(&tree, &opts).unwrap();
        let second = rewrite_styles(&tree, &opts).unwrap();
        assert_eq!(first, second);
        assert_ne!(first.get("a/style.css"), tree.get("a/style.css"));
    }

    #[test]
    fn test_same_class_in_two_components_differs() {
        let tree = BuildTree::from_entries([("a/style.css", ".x {}"), ("b/style.css", ".x {}")]);
        let out = rewrite_styles(&tree, &options(&["css"], true)).unwrap();
        assert_ne!(out.get("a/style.css"), out.get("b/style.css"));
    }

    #[test]
    fn test_non_style_files_pass_through() {
        let tree = BuildTree::from_entries([
            ("widget/template.hbs", "<div class=\"box\"></div>"),
            ("widget/style.less", ".box {}"),
            ("widget/style.css", ".box {}"),
        ]);
        let out = rewrite_styles(&tree, &options(&["css"], false)).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.get("widget/template.hbs"), tree.get("widget/template.hbs"));
        assert_eq!(out.get("widget/style.less"), Some(".box {}"));
        assert_eq!(out.get("widget/style.css"), Some(".widget__box {}"));
    }

    #[test]
    fn test_file_without_classes_is_unchanged() {
        let source = "/* nothing to scope */\nbody > main { margin: 0; }\n";
        let tree = BuildTree::from_entries([("layout/style.css", source)]);
        let out = rewrite_styles(&tree, &options(&["css"], false)).unwrap();
        assert_eq!(out.get("layout/style.css"), Some(source));
    }

    #[test]
    fn test_parse_error_fails_the_tree() {
        let tree = BuildTree::from_entries([
            ("good/style.css", ".ok {}"),
            ("bad/style.css", ".broken { color: red;"),
        ]);
        let err = rewrite_styles(&tree, &options(&["css"], false)).unwrap_err();
        assert_eq!(err.code(), ERR_CSS_PARSE);
        assert!(err.to_string().starts_with("bad/style.css:"));
    }

    #[test]
    fn test_empty_tree() {
        let out = rewrite_styles(&BuildTree::new(), &RewriteOptions::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_less_mixin_calls_follow_their_definition() {
        let tree = BuildTree::from_entries([(
            "widget/style.less",
            ".rounded() { border-radius: 2px; }\n.box { .rounded(); }",
        )]);
        let out = rewrite_styles(&tree, &options(&["less"], false)).unwrap();
        assert_eq!(
            out.get("widget/style.less"),
            Some(".widget__rounded() { border-radius: 2px; }\n.widget__box { .widget__rounded(); }")
        );
    }

    #[test]
    fn test_escaped_class_rewrites_to_one_selector() {
        let tree = BuildTree::from_entries([("widget/style.css", ".\\31 0 { color: red; }")]);

        let verbose = rewrite_styles(&tree, &options(&["css"], false)).unwrap();
        assert_eq!(
            verbose.get("widget/style.css"),
            Some(".widget__\\31 0 { color: red; }")
        );

        let terse = rewrite_styles(&tree, &options(&["css"], true)).unwrap();
        let css = terse.get("widget/style.css").unwrap();
        assert!(css.starts_with("._"));
        assert!(css.ends_with(" { color: red; }"));
        assert_eq!(css.len(), "._0123456789 { color: red; }".len());
    }
}
