//! End-to-end tests: stylesheet text in, processed stylesheet text out.

use cssvalues::{
    parse_stylesheet, transform, transform_with, DiagnosticKind, ProcessorConfig, ValuesProcessor,
};
use insta::assert_snapshot;

fn css(input: &str) -> String {
    let out = transform(input).unwrap();
    assert!(
        out.report.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        out.report.diagnostics
    );
    out.css
}

// ============================================================================
// Local constants
// ============================================================================

#[test]
fn test_local_constants_in_values_and_selectors() {
    let out = css(
        "@value colorValue: red;\n\
         .colorValue { color: colorValue; }\n\
         .colorValue > .colorValue { top: 0; }",
    );
    assert_snapshot!(out, @r"
    :export {
      colorValue: red
    }
    .red {
      color: red;
    }
    .red > .red {
      top: 0;
    }
    ");
}

#[test]
fn test_chain_resolves_to_literals() {
    let out = css(
        "@value unit: 4px;\n\
         @value gap: unit;\n\
         @value frame: gap solid black;\n\
         .box { border: frame; margin: calc(gap * 2) auto; }",
    );
    assert_snapshot!(out, @r"
    :export {
      unit: 4px;
      gap: 4px;
      frame: 4px solid black
    }
    .box {
      border: 4px solid black;
      margin: calc(4px * 2) auto;
    }
    ");
}

#[test]
fn test_nested_function_arguments() {
    let out = css(
        "@value base: red;\n\
         @value pct: 50%;\n\
         .a { color: color(base lightness(pct)); }",
    );
    assert!(out.contains("color: color(red lightness(50%));"));
}

#[test]
fn test_custom_property_values() {
    let out = css("@value brand: #0af;\n:root { --brand-color: brand; }");
    assert!(out.contains("--brand-color: #0af;"));
}

#[test]
fn test_only_whole_tokens_are_replaced() {
    let out = css(
        "@value primary: red;\n\
         .a { color: primary-dark; background: xprimary; border-color: primary; }",
    );
    assert!(out.contains("color: primary-dark;"));
    assert!(out.contains("background: xprimary;"));
    assert!(out.contains("border-color: red;"));
}

#[test]
fn test_strings_are_left_alone() {
    let out = css(
        "@value icon: star;\n\
         .a { content: \"icon\"; background: url(\"icon.png\") icon; }",
    );
    assert!(out.contains("content: \"icon\";"));
    assert!(out.contains("background: url(\"icon.png\") star;"));
}

#[test]
fn test_url_argument_is_substituted() {
    let out = css("@value logo: \"./logo.png\";\n.a { background: url(logo) no-repeat; }");
    assert!(out.contains("background: url(\"./logo.png\") no-repeat;"));
}

#[test]
fn test_selector_fragments() {
    let out = css(
        "@value btn: button-primary;\n\
         @value main: content;\n\
         div.btn#main:not(.btn), [class=btn] { top: 0; }",
    );
    assert!(out.contains("div.button-primary#content:not(.button-primary), [class=btn] {"));
}

#[test]
fn test_later_redefinition_applies_to_rules_only() {
    let out = css(
        "@value size: 1px;\n\
         @value border: size solid;\n\
         @value size: 2px;\n\
         .a { width: size; border: border; }",
    );
    assert_snapshot!(out, @r"
    :export {
      size: 2px;
      border: 1px solid
    }
    .a {
      width: 2px;
      border: 1px solid;
    }
    ");
}

#[test]
fn test_media_and_supports_params() {
    let out = css(
        "@value small: (max-width: 599px);\n\
         @value has-grid: (display: grid);\n\
         @media small { .a { color: red; } }\n\
         @supports has-grid { .b { display: grid; } }",
    );
    assert_snapshot!(out, @r"
    :export {
      small: (max-width: 599px);
      has-grid: (display: grid)
    }
    @media (max-width: 599px) {
      .a {
        color: red;
      }
    }
    @supports (display: grid) {
      .b {
        display: grid;
      }
    }
    ");
}

#[test]
fn test_whitespace_only_value_round_trips() {
    let out = transform("@value v-empty: ;\n.a { margin: v-empty; }").unwrap();
    assert!(out.report.diagnostics.is_empty());
    assert_eq!(out.report.export("v-empty"), Some(" "));
    assert_eq!(
        out.css,
        ":export {\n  v-empty:  \n}\n.a {\n  margin:  ;\n}\n"
    );
}

// ============================================================================
// Imports
// ============================================================================

#[test]
fn test_import_from_path_declared_later() {
    let out = css("@value red from colors;\n@value colors: \"./colors.css\";");
    assert_snapshot!(out, @r#"
    :import(colors) {
      i__const_red_0: red
    }
    :export {
      red: i__const_red_0;
      colors: "./colors.css"
    }
    "#);
}

#[test]
fn test_import_from_path_constant() {
    let out = css(
        "@value colors: \"./colors.css\";\n\
         @value primary, secondary from colors;\n\
         .a { color: primary; }",
    );
    assert_snapshot!(out, @r#"
    :import("./colors.css") {
      i__const_primary_0: primary;
      i__const_secondary_1: secondary
    }
    :export {
      colors: "./colors.css";
      primary: i__const_primary_0;
      secondary: i__const_secondary_1
    }
    .a {
      color: i__const_primary_0;
    }
    "#);
}

#[test]
fn test_imports_group_by_source_in_first_appearance_order() {
    let out = css(
        "@value a from \"./a.css\";\n\
         @value b, c as cc from './b.css';\n\
         @value d from \"./a.css\";\n\
         @value local: 1px;\n\
         .x { border: local solid a; color: cc; }",
    );
    assert_snapshot!(out, @r#"
    :import("./a.css") {
      i__const_a_0: a;
      i__const_d_3: d
    }
    :import('./b.css') {
      i__const_b_1: b;
      i__const_cc_2: c
    }
    :export {
      a: i__const_a_0;
      b: i__const_b_1;
      cc: i__const_cc_2;
      d: i__const_d_3;
      local: 1px
    }
    .x {
      border: 1px solid i__const_a_0;
      color: i__const_cc_2;
    }
    "#);
}

#[test]
fn test_quote_styles_are_distinct_sources() {
    let out = transform("@value a from \"./x.css\";\n@value b from './x.css';").unwrap();
    assert_eq!(out.report.imports.len(), 2);
}

#[test]
fn test_multiline_parenthesized_import() {
    let out = css(
        "@value (\n  primary,\n  secondary as accent\n) from \"./theme.css\";\n\
         .a { color: accent; }",
    );
    assert!(out.contains("i__const_accent_1: secondary"));
    assert!(out.contains("color: i__const_accent_1;"));
}

#[test]
fn test_imported_name_used_in_later_definition() {
    let out = css(
        "@value accent from \"./theme.css\";\n\
         @value ring: 0 0 0 2px accent;\n\
         .a { box-shadow: ring; }",
    );
    assert!(out.contains("ring: 0 0 0 2px i__const_accent_0"));
    assert!(out.contains("box-shadow: 0 0 0 2px i__const_accent_0;"));
}

#[test]
fn test_alias_sanitizes_dashed_names() {
    let out = css("@value --brand-color from \"./theme.css\";");
    assert!(out.contains("i__const___brand_color_0: --brand-color"));
}

// ============================================================================
// Malformed statements
// ============================================================================

#[test]
fn test_missing_terminator_is_reported_once() {
    let out = transform("@value red blue\n@value green yellow").unwrap();
    let diagnostics = &out.report.diagnostics;
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MalformedDeclaration);
    assert_eq!(
        diagnostics[0].message,
        "Invalid value definition: red blue\n@value green yellow"
    );
    assert_eq!(out.css, ":export {\n  green: yellow\n}\n");
}

#[test]
fn test_comment_only_value_is_reported() {
    let out = transform("@value v-comment:/* comment */;\n.a { color: v-comment; }").unwrap();
    assert_eq!(out.report.diagnostics.len(), 1);
    assert_eq!(
        out.report.diagnostics[0].message,
        "Invalid value definition: v-comment:"
    );
    assert_eq!(out.report.diagnostics[0].source_text, "@value v-comment:/* comment */");
    assert_eq!(out.css, ".a {\n  color: v-comment;\n}\n");
}

#[test]
fn test_invalid_import_list_has_no_effect() {
    let out = transform("@value a, from \"./x.css\";\n@value b: 1;").unwrap();
    assert_eq!(out.report.diagnostics.len(), 1);
    assert_eq!(
        out.report.diagnostics[0].message,
        "Invalid value import: a, from \"./x.css\""
    );
    assert!(out.report.imports.is_empty());
    assert_eq!(out.css, ":export {\n  b: 1\n}\n");
}

#[test]
fn test_malformed_statements_are_removed() {
    let out = transform(".a { top: 0; }\n@value :;").unwrap();
    assert_eq!(out.report.diagnostics.len(), 1);
    assert_eq!(out.css, ".a {\n  top: 0;\n}\n");
}

#[test]
fn test_deep_nesting_is_reported() {
    let processor = ValuesProcessor::new(ProcessorConfig::default().max_nesting_depth(2));
    let out = transform_with(
        "@value x: 1;\n.a { width: a(b(c(x))) b(x); }",
        &processor,
    )
    .unwrap();
    assert_eq!(out.report.diagnostics.len(), 1);
    assert_eq!(out.report.diagnostics[0].kind, DiagnosticKind::NestingTooDeep);
    assert_eq!(out.report.diagnostics[0].source_text, "width: a(b(c(x))) b(x)");
    assert!(out.css.contains("width: a(b(c(x))) b(1);"));
}

// ============================================================================
// Whole-stylesheet behavior
// ============================================================================

#[test]
fn test_output_is_stable_when_reprocessed() {
    let first = css(
        "@value a: 1px;\n@value b: a a;\n.x { margin: b; }\n@media print { .y { padding: a; } }",
    );
    let second = css(&first);
    assert_eq!(first, second);
}

#[test]
fn test_stylesheet_without_constants_is_unchanged() {
    let input = ".a {\n  color: red;\n}\n";
    assert_eq!(css(input), input);
}

#[test]
fn test_synthesized_rules_replace_first_statement() {
    let out = css(
        "@import \"./reset.css\";\n\
         @value a: 1;\n\
         .x { z-index: a; }\n\
         @value b: 2;",
    );
    assert_snapshot!(out, @r#"
    @import "./reset.css";
    :export {
      a: 1;
      b: 2
    }
    .x {
      z-index: 1;
    }
    "#);
}

#[test]
fn test_nested_rules_are_rewritten() {
    let out = css("@value c: red;\n.a { color: c; .c { color: c; } }");
    assert_snapshot!(out, @r"
    :export {
      c: red
    }
    .a {
      color: red;
      .red {
        color: red;
      }
    }
    ");
}

#[test]
fn test_top_level_comments_survive() {
    let out = css("/* header */\n@value c: red;\n/* rules */\n.a { color: c; }");
    assert_snapshot!(out, @r"
    /* header */
    :export {
      c: red
    }
    /* rules */
    .a {
      color: red;
    }
    ");
}

#[test]
fn test_important_survives_substitution() {
    let out = css("@value c: red;\n.a { color: c !important; }");
    assert!(out.contains("color: red !important;"));
}

#[test]
fn test_report_lists_exports_and_imports() {
    let out = transform("@value a from \"./a.css\";\n@value b: 2;").unwrap();
    let exports: Vec<_> = out
        .report
        .exports
        .iter()
        .map(|entry| (entry.name.as_str(), entry.value.as_str()))
        .collect();
    assert_eq!(exports, vec![("a", "i__const_a_0"), ("b", "2")]);
    assert_eq!(out.report.imports[0].source.reference(), "\"./a.css\"");
    assert_eq!(out.report.imports[0].names[0].remote, "a");
}

#[test]
fn test_syntax_error_is_returned() {
    let err = transform("@value a: 1;\n.orphan").unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(parse_stylesheet(".ok {}").is_ok());
}
