//! CSS style sheets.
//!
//! A [StyleSheet](StyleSheet) represents a `.css` file or `<style>` element.
//! It holds a structural tree: selectors, declaration values and unknown
//! at-rules are kept as raw text, while `@media` preludes are parsed into
//! [MediaList](crate::media_query::MediaList) values so they can take part
//! in the rewriting algebra.

use crate::error::{Error, ParserError, PrinterErrorKind};
use crate::parser::TopLevelRuleParser;
use crate::printer::Printer;
use crate::rules::CssRuleList;
use crate::traits::ToCss;
use cssparser::{Parser, ParserInput, RuleListParser};

pub use crate::parser::ParserOptions;
pub use crate::printer::PrinterOptions;

/// A CSS style sheet, representing a `.css` file or inline `<style>` element.
///
/// Style sheets can be parsed from a string, rewritten with
/// [add_retina_rules](StyleSheet::add_retina_rules), and serialized back to a
/// string.
///
/// # Example
///
/// ```
/// use retina_css::stylesheet::{StyleSheet, ParserOptions, PrinterOptions};
///
/// let stylesheet = StyleSheet::parse(
///   ".foo {\n  color: red;\n}",
///   ParserOptions::default()
/// ).unwrap();
///
/// let res = stylesheet.to_css(PrinterOptions::default()).unwrap();
/// assert_eq!(res, ".foo {\n  color: red;\n}\n");
/// ```
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleSheet {
  /// A list of top-level rules within the style sheet.
  pub rules: CssRuleList,
  /// A list of file names for all source files included within the style sheet.
  pub sources: Vec<String>,
}

impl StyleSheet {
  /// Creates a new style sheet with the given source filenames and rules.
  pub fn new(sources: Vec<String>, rules: CssRuleList) -> StyleSheet {
    StyleSheet { sources, rules }
  }

  /// Parse a style sheet from a string.
  pub fn parse(code: &str, options: ParserOptions) -> Result<Self, Error<ParserError>> {
    let mut input = ParserInput::new(code);
    let mut parser = Parser::new(&mut input);
    let rule_list_parser =
      RuleListParser::new_for_stylesheet(&mut parser, TopLevelRuleParser::new(&options));

    let mut rules = vec![];
    for rule in rule_list_parser {
      let rule = match rule {
        Ok(rule) => rule,
        Err((e, _)) => {
          if options.error_recovery {
            continue;
          }

          return Err(Error::from(e, options.filename.clone()));
        }
      };

      rules.push(rule)
    }

    Ok(StyleSheet {
      sources: vec![options.filename.clone()],
      rules: CssRuleList(rules),
    })
  }

  /// Serialize the style sheet to a CSS string.
  pub fn to_css(&self, options: PrinterOptions) -> Result<String, Error<PrinterErrorKind>> {
    let mut dest = String::new();
    let mut printer = Printer::new(&mut dest, options);
    self.rules.to_css(&mut printer)?;
    printer.newline()?;
    Ok(dest)
  }
}
