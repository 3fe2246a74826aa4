//! retina-css is a CSS post processor that generates media queries serving
//! high resolution ("retina") variants of the images referenced in style
//! rules.
//!
//! A style sheet is parsed into a structural tree, every style rule with an
//! image-bearing declaration (`background`, `background-image`,
//! `list-style-image`) is rewritten against the configured density tiers,
//! and a new `@media` block is inserted after the rule for each tier whose
//! suffixed image variant (e.g. `logo@2x.png`) exists on disk. Media queries
//! already authored by hand are detected and left alone.
//!
//! # Example
//!
//! ```
//! use retina_css::retina::RetinaOptions;
//! use retina_css::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
//!
//! let mut stylesheet = StyleSheet::parse(
//!   "a {\n  background-image: url('logo.png');\n}",
//!   ParserOptions::default(),
//! ).unwrap();
//!
//! let result = stylesheet.add_retina_rules(&RetinaOptions {
//!   asset_directory: Some("assets".into()),
//!   ..RetinaOptions::default()
//! }).unwrap();
//!
//! for warning in &result.warnings {
//!   eprintln!("{}", warning);
//! }
//!
//! let code = stylesheet.to_css(PrinterOptions::default()).unwrap();
//! ```

pub mod declaration;
pub mod error;
pub mod image;
pub mod media_query;
mod parser;
pub mod printer;
pub mod retina;
pub mod rules;
pub mod stylesheet;
pub mod traits;

#[cfg(test)]
mod tests {
  use crate::error::{RetinaErrorKind, RetinaWarningKind, Warning};
  use crate::image::AssetProvider;
  use crate::retina::{Resolution, RetinaOptions};
  use crate::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
  use indoc::indoc;
  use smallvec::smallvec;
  use std::path::Path;

  /// An in-memory asset tree rooted at `assets`.
  struct TestProvider(&'static [&'static str]);

  impl AssetProvider for TestProvider {
    fn exists(&self, path: &Path) -> bool {
      self.0.iter().any(|file| path == Path::new("assets").join(file))
    }
  }

  static ASSETS: TestProvider = TestProvider(&[
    "file-with-all-res@2x.png",
    "file-with-all-res@3x.png",
    "file-with-all-res@4x.png",
    "file-with-one-retina@2x.png",
    "file-with-other-retina_2x.png",
    "file-with-svg-ext@2x.svg",
    "icons/menu@2x.png",
  ]);

  fn options() -> RetinaOptions<'static> {
    RetinaOptions {
      asset_directory: Some("assets".into()),
      provider: Some(&ASSETS),
      ..RetinaOptions::default()
    }
  }

  /// Options with only the 192dpi tier enabled.
  fn options_2x() -> RetinaOptions<'static> {
    let mut options = options();
    options.resolutions.insert(288, None);
    options.resolutions.insert(384, None);
    options
  }

  fn run(source: &str, options: &RetinaOptions) -> (String, Vec<Warning>) {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default()).unwrap();
    let result = stylesheet.add_retina_rules(options).unwrap();
    let code = stylesheet.to_css(PrinterOptions::default()).unwrap();
    (code, result.warnings)
  }

  fn test(source: &str, expected: &str, options: &RetinaOptions) {
    let (code, warnings) = run(source, options);
    assert_eq!(code, expected);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
  }

  #[test]
  fn test_add_retina_rules() {
    test(
      indoc! {r#"
        a {
          background-image: url('file-with-all-res.png');
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('file-with-all-res.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-all-res@2x.png');
          }
        }

        @media (-webkit-min-device-pixel-ratio: 3), (min-resolution: 288dpi) {
          a {
            background-image: url('file-with-all-res@3x.png');
          }
        }

        @media (-webkit-min-device-pixel-ratio: 4), (min-resolution: 384dpi) {
          a {
            background-image: url('file-with-all-res@4x.png');
          }
        }
      "#},
      &options(),
    );
  }

  #[test]
  fn test_disabled_resolutions() {
    test(
      indoc! {r#"
        a {
          background-image: url('file-with-all-res.png');
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('file-with-all-res.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-all-res@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_custom_suffix() {
    let mut options = options_2x();
    options.resolutions.insert(
      192,
      Some(Resolution {
        suffix: smallvec!["_2x".into()],
        media_query: "(-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi)".into(),
      }),
    );

    test(
      indoc! {r#"
        a {
          background: url('file-with-other-retina.png');
        }
      "#},
      indoc! {r#"
        a {
          background: url('file-with-other-retina.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-other-retina_2x.png');
          }
        }
      "#},
      &options,
    );
  }

  #[test]
  fn test_multiple_suffixes() {
    let mut options = options_2x();
    options.resolutions.insert(
      192,
      Some(Resolution {
        suffix: smallvec!["@2x".into(), "_2x".into()],
        media_query: "(-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi)".into(),
      }),
    );

    // `file-with-other-retina@2x.png` does not exist, so the second suffix wins.
    test(
      indoc! {r#"
        a {
          background-image: url('file-with-other-retina.png');
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('file-with-other-retina.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-other-retina_2x.png');
          }
        }
      "#},
      &options,
    );
  }

  #[test]
  fn test_custom_media_query() {
    let mut options = options_2x();
    options.resolutions.insert(
      192,
      Some(Resolution {
        suffix: smallvec!["@2x".into()],
        media_query: "(min-resolution: 2dppx)".into(),
      }),
    );

    test(
      indoc! {r#"
        a {
          background-image: url('file-with-one-retina.png');
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('file-with-one-retina.png');
        }

        @media (min-resolution: 2dppx) {
          a {
            background-image: url('file-with-one-retina@2x.png');
          }
        }
      "#},
      &options,
    );
  }

  #[test]
  fn test_background_shorthand() {
    test(
      indoc! {r#"
        a {
          background: url('file-with-one-retina.png') no-repeat center center;
        }
      "#},
      indoc! {r#"
        a {
          background: url('file-with-one-retina.png') no-repeat center center;
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-one-retina@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_list_style_image() {
    test(
      indoc! {r#"
        li {
          list-style-image: url('file-with-one-retina.png');
        }
      "#},
      indoc! {r#"
        li {
          list-style-image: url('file-with-one-retina.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          li {
            list-style-image: url('file-with-one-retina@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_unquoted_and_double_quoted_urls() {
    test(
      indoc! {r#"
        a {
          background-image: url(file-with-one-retina.png);
        }

        b {
          background-image: url("file-with-one-retina.png");
        }
      "#},
      indoc! {r#"
        a {
          background-image: url(file-with-one-retina.png);
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-one-retina@2x.png');
          }
        }

        b {
          background-image: url("file-with-one-retina.png");
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          b {
            background-image: url('file-with-one-retina@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_absolute_paths_resolve_against_asset_directory() {
    test(
      indoc! {r#"
        a {
          background-image: url('/file-with-all-res.png');
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('/file-with-all-res.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('/file-with-all-res@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_subdirectory_paths() {
    test(
      indoc! {r#"
        a {
          background-image: url('icons/menu.png');
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('icons/menu.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('icons/menu@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_multiple_layers_keep_fallback() {
    let (code, warnings) = run(
      indoc! {r#"
        a {
          background-image: url('file-with-one-retina.png'), url('file-without-retina.png');
        }
      "#},
      &options_2x(),
    );

    assert_eq!(
      code,
      indoc! {r#"
        a {
          background-image: url('file-with-one-retina.png'), url('file-without-retina.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-one-retina@2x.png'), url('file-without-retina.png');
          }
        }
      "#}
    );

    assert_eq!(warnings.len(), 1);
    assert_eq!(
      warnings[0].kind,
      RetinaWarningKind::MissingHighResImage {
        path: "file-without-retina.png".into(),
        suffixes: smallvec!["@2x".into()],
      }
    );
    assert_eq!(
      warnings[0].kind.to_string(),
      "Could not find high resolution version for `file-without-retina.png` with suffixes @2x"
    );
  }

  #[test]
  fn test_missing_image_warns_per_tier() {
    let source = indoc! {r#"
      a {
        background-image: url('file-without-retina.png');
      }
    "#};

    let (code, warnings) = run(source, &options());
    assert_eq!(code, source);
    assert_eq!(warnings.len(), 3);
    for (warning, suffix) in warnings.iter().zip(["@2x", "@3x", "@4x"]) {
      assert_eq!(
        warning.kind.to_string(),
        format!(
          "Could not find high resolution version for `file-without-retina.png` with suffixes {}",
          suffix
        )
      );
      assert_eq!(warning.loc.as_ref().unwrap().line, 1);
    }
  }

  #[test]
  fn test_remote_urls_ignored() {
    let source = indoc! {r#"
      a {
        background-image: url('http://foo.com/bar.jpg');
      }

      b {
        background-image: url('https://foo.com/bar.png');
      }
    "#};

    test(source, source, &options());
  }

  #[test]
  fn test_extension_not_included() {
    let source = indoc! {r#"
      a {
        background-image: url('file-with-svg-ext.svg');
      }
    "#};

    test(source, source, &options());
  }

  #[test]
  fn test_custom_extensions() {
    let mut options = options_2x();
    options.include_file_extensions = vec!["svg".into(), "png".into()];

    test(
      indoc! {r#"
        a {
          background-image: url('file-with-svg-ext.svg');
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('file-with-svg-ext.svg');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-svg-ext@2x.svg');
          }
        }
      "#},
      &options,
    );
  }

  #[test]
  fn test_value_without_url() {
    let source = indoc! {r#"
      a {
        background: red;
      }
    "#};

    test(source, source, &options());
  }

  #[test]
  fn test_nested_media_distribution() {
    test(
      indoc! {r#"
        @media (min-width: 600px) {
          a {
            background-image: url('file-with-all-res.png');
          }
        }
      "#},
      indoc! {r#"
        @media (min-width: 600px) {
          a {
            background-image: url('file-with-all-res.png');
          }
        }

        @media (-webkit-min-device-pixel-ratio: 2) and (min-width: 600px), (min-resolution: 192dpi) and (min-width: 600px) {
          a {
            background-image: url('file-with-all-res@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_nested_media_distribution_all_tiers() {
    let (code, warnings) = run(
      indoc! {r#"
        @media (min-width: 600px) {
          a {
            background-image: url('file-with-all-res.png');
          }
        }
      "#},
      &options(),
    );

    assert!(warnings.is_empty());
    let queries: Vec<&str> = code
      .lines()
      .filter(|line| line.starts_with("@media"))
      .collect();
    assert_eq!(
      queries,
      vec![
        "@media (min-width: 600px) {",
        "@media (-webkit-min-device-pixel-ratio: 2) and (min-width: 600px), (min-resolution: 192dpi) and (min-width: 600px) {",
        "@media (-webkit-min-device-pixel-ratio: 3) and (min-width: 600px), (min-resolution: 288dpi) and (min-width: 600px) {",
        "@media (-webkit-min-device-pixel-ratio: 4) and (min-width: 600px), (min-resolution: 384dpi) and (min-width: 600px) {",
      ]
    );
  }

  #[test]
  fn test_short_circuit_in_covered_media() {
    // All tiers are active, but coverage by any single tier is enough to
    // leave the rule untouched.
    let source = indoc! {r#"
      @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
        a {
          background-image: url('file-with-all-res.png');
        }
      }
    "#};

    test(source, source, &options());
  }

  #[test]
  fn test_short_circuit_with_reordered_clauses() {
    let source = indoc! {r#"
      @media (min-resolution: 192dpi), (-webkit-min-device-pixel-ratio: 2) {
        a {
          background-image: url('file-with-all-res.png');
        }
      }
    "#};

    test(source, source, &options());
  }

  #[test]
  fn test_short_circuit_in_stricter_media() {
    // Extra predicates make the block stricter than the tier query, so the
    // tier still covers it.
    let source = indoc! {r#"
      @media (-webkit-min-device-pixel-ratio: 2) and (min-width: 600px), (min-resolution: 192dpi) and (min-width: 600px) {
        a {
          background-image: url('file-with-all-res.png');
        }
      }
    "#};

    test(source, source, &options());
  }

  #[test]
  fn test_existing_different_image_blocks_generation() {
    let source = indoc! {r#"
      a {
        background-image: url('file-with-one-retina.png');
      }

      @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
        a {
          background-image: url('some-other-retina-image.png');
        }
      }
    "#};

    test(source, source, &options_2x());
  }

  #[test]
  fn test_existing_same_image_warns() {
    let source = indoc! {r#"
      a {
        background-image: url('file-with-one-retina.png');
      }

      @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
        a {
          background-image: url('file-with-one-retina@2x.png');
        }
      }
    "#};

    let (code, warnings) = run(source, &options_2x());
    assert_eq!(code, source);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, RetinaWarningKind::UnnecessaryHighResImage);
    // The warning points at the manually authored declaration.
    assert_eq!(warnings[0].loc.as_ref().unwrap().line, 6);
  }

  #[test]
  fn test_existing_distributed_query_warns() {
    let source = indoc! {r#"
      @media (min-width: 600px) {
        a {
          background-image: url('file-with-one-retina.png');
        }
      }

      @media (-webkit-min-device-pixel-ratio: 2) and (min-width: 600px), (min-resolution: 192dpi) and (min-width: 600px) {
        a {
          background-image: url('file-with-one-retina@2x.png');
        }
      }
    "#};

    let (code, warnings) = run(source, &options_2x());
    assert_eq!(code, source);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, RetinaWarningKind::UnnecessaryHighResImage);
  }

  #[test]
  fn test_existing_media_without_image_is_ignored() {
    let source = indoc! {r#"
      a {
        background: red;
      }

      @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
        a {
          background: blue;
        }
      }
    "#};

    test(source, source, &options());
  }

  #[test]
  fn test_remote_layer_aborts_declaration() {
    // The first layer has a retina variant, but the remote second layer
    // aborts the whole declaration before anything is generated.
    let source = indoc! {r#"
      a {
        background-image: url('file-with-one-retina.png'), url('http://foo.com/bar.png');
      }
    "#};

    test(source, source, &options_2x());
  }

  #[test]
  fn test_aborted_declaration_keeps_earlier_warnings() {
    let source = indoc! {r#"
      a {
        background-image: url('file-without-retina.png'), url('http://foo.com/bar.png');
      }
    "#};

    let (code, warnings) = run(source, &options_2x());
    assert_eq!(code, source);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
      warnings[0].kind,
      RetinaWarningKind::MissingHighResImage { .. }
    ));
  }

  #[test]
  fn test_important_not_copied() {
    test(
      indoc! {r#"
        a {
          background-image: url('file-with-one-retina.png') !important;
        }
      "#},
      indoc! {r#"
        a {
          background-image: url('file-with-one-retina.png') !important;
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-one-retina@2x.png');
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_unknown_at_rules_preserved() {
    test(
      indoc! {r#"
        @import 'other.css';

        a {
          background-image: url('file-with-one-retina.png');
        }

        @keyframes spin {
          from {
            opacity: 0;
          }
        }
      "#},
      indoc! {r#"
        @import 'other.css';

        a {
          background-image: url('file-with-one-retina.png');
        }

        @media (-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi) {
          a {
            background-image: url('file-with-one-retina@2x.png');
          }
        }

        @keyframes spin {
          from {
            opacity: 0;
          }
        }
      "#},
      &options_2x(),
    );
  }

  #[test]
  fn test_idempotent() {
    let source = indoc! {r#"
      a {
        background-image: url('file-with-all-res.png');
      }
    "#};

    let (first, warnings) = run(source, &options());
    assert!(warnings.is_empty());

    // The second run recognizes every generated block and adds nothing.
    let (second, warnings) = run(&first, &options());
    assert_eq!(second, first);
    assert_eq!(warnings.len(), 3);
    assert!(warnings
      .iter()
      .all(|w| w.kind == RetinaWarningKind::UnnecessaryHighResImage));
  }

  #[test]
  fn test_minify() {
    let mut stylesheet = StyleSheet::parse(
      "a {\n  background-image: url('file-with-one-retina.png');\n}\n",
      ParserOptions::default(),
    )
    .unwrap();
    stylesheet.add_retina_rules(&options_2x()).unwrap();
    let code = stylesheet.to_css(PrinterOptions { minify: true }).unwrap();

    assert_eq!(
      code,
      "a{background-image:url('file-with-one-retina.png')}@media (-webkit-min-device-pixel-ratio: 2),(min-resolution: 192dpi){a{background-image:url('file-with-one-retina@2x.png')}}"
    );
  }

  #[test]
  fn test_missing_asset_directory() {
    let mut stylesheet = StyleSheet::parse(
      "a {\n  background-image: url('file-with-one-retina.png');\n}\n",
      ParserOptions::default(),
    )
    .unwrap();

    let err = stylesheet
      .add_retina_rules(&RetinaOptions {
        provider: Some(&ASSETS),
        ..RetinaOptions::default()
      })
      .unwrap_err();
    assert_eq!(err.kind, RetinaErrorKind::MissingAssetDirectory);
    assert_eq!(err.to_string(), "You must provide an assets directory");
  }

  #[test]
  fn test_derives_asset_directory_from_source_file() {
    let mut stylesheet = StyleSheet::parse(
      "a {\n  background-image: url('file-with-one-retina.png');\n}\n",
      ParserOptions {
        filename: concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test.css").into(),
        ..ParserOptions::default()
      },
    )
    .unwrap();

    let result = stylesheet.add_retina_rules(&options_2x_on_disk()).unwrap();
    assert!(result.warnings.is_empty());

    let code = stylesheet.to_css(PrinterOptions::default()).unwrap();
    assert!(code.contains("url('file-with-one-retina@2x.png')"));
  }

  /// Like [options_2x](options_2x), but against the real filesystem with no
  /// asset directory configured.
  fn options_2x_on_disk() -> RetinaOptions<'static> {
    let mut options = RetinaOptions::default();
    options.resolutions.insert(288, None);
    options.resolutions.insert(384, None);
    options
  }
}
