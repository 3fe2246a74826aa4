use crate::declaration::DeclarationBlock;
use crate::error::ParserError;
use crate::media_query::MediaList;
use crate::rules::media::MediaRule;
use crate::rules::style::StyleRule;
use crate::rules::unknown::UnknownAtRule;
use crate::rules::{CssRule, CssRuleList};
use cssparser::{
  _cssparser_internal_to_lowercase, match_ignore_ascii_case, AtRuleParser, CowRcStr, ParseError,
  Parser, ParserState, QualifiedRuleParser, RuleListParser,
};

/// CSS parsing options.
#[derive(Clone, Debug, Default)]
pub struct ParserOptions {
  /// Filename to use in error messages, and the source a default asset
  /// directory can be derived from.
  pub filename: String,
  /// Whether to ignore invalid rules and declarations rather than erroring.
  pub error_recovery: bool,
}

/// The parser for the rules in a stylesheet. The same parser handles both
/// the top level and the rule lists nested inside `@media` blocks.
pub(crate) struct TopLevelRuleParser<'a> {
  options: &'a ParserOptions,
}

impl<'a> TopLevelRuleParser<'a> {
  pub fn new(options: &'a ParserOptions) -> Self {
    TopLevelRuleParser { options }
  }

  fn nested(&self) -> TopLevelRuleParser<'a> {
    TopLevelRuleParser {
      options: self.options,
    }
  }
}

/// A rule prelude for an at-rule.
pub(crate) enum AtRulePrelude {
  /// A `@media` rule prelude, with its media queries.
  Media(MediaList),
  /// An unknown prelude, kept as raw text together with the rule name.
  Unknown(String, String),
}

impl<'a, 'i> AtRuleParser<'i> for TopLevelRuleParser<'a> {
  type Prelude = AtRulePrelude;
  type AtRule = CssRule;
  type Error = ParserError;

  fn parse_prelude<'t>(
    &mut self,
    name: CowRcStr<'i>,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
    match_ignore_ascii_case! { &*name,
      "media" => {
        let media = MediaList::parse(input);
        Ok(AtRulePrelude::Media(media))
      },
      _ => {
        let prelude = exhaust(input).trim().to_string();
        Ok(AtRulePrelude::Unknown(name.to_string(), prelude))
      }
    }
  }

  fn parse_block<'t>(
    &mut self,
    prelude: Self::Prelude,
    start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
    let loc = start.source_location();
    match prelude {
      AtRulePrelude::Media(query) => {
        let mut rules = vec![];
        let rule_parser = RuleListParser::new_for_nested_rule(input, self.nested());
        for rule in rule_parser {
          match rule {
            Ok(rule) => rules.push(rule),
            Err((err, _)) => {
              if self.options.error_recovery {
                continue;
              }
              return Err(err);
            }
          }
        }

        Ok(CssRule::Media(MediaRule {
          query,
          rules: CssRuleList(rules),
          loc: loc.into(),
        }))
      }
      AtRulePrelude::Unknown(name, prelude) => {
        let block = exhaust(input).to_string();
        Ok(CssRule::Unknown(UnknownAtRule {
          name,
          prelude,
          block: Some(block),
          loc: loc.into(),
        }))
      }
    }
  }

  fn rule_without_block(
    &mut self,
    prelude: Self::Prelude,
    start: &ParserState,
  ) -> Result<Self::AtRule, ()> {
    match prelude {
      AtRulePrelude::Media(..) => Err(()),
      AtRulePrelude::Unknown(name, prelude) => Ok(CssRule::Unknown(UnknownAtRule {
        name,
        prelude,
        block: None,
        loc: start.source_location().into(),
      })),
    }
  }
}

impl<'a, 'i> QualifiedRuleParser<'i> for TopLevelRuleParser<'a> {
  type Prelude = String;
  type QualifiedRule = CssRule;
  type Error = ParserError;

  fn parse_prelude<'t>(
    &mut self,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
    Ok(exhaust(input).trim().to_string())
  }

  fn parse_block<'t>(
    &mut self,
    selectors: Self::Prelude,
    start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
    let loc = start.source_location();
    let declarations = DeclarationBlock::parse(input, self.options)?;
    Ok(CssRule::Style(StyleRule {
      selectors,
      declarations,
      loc: loc.into(),
    }))
  }
}

/// Consumes the remaining input and returns it as a raw slice.
pub(crate) fn exhaust<'i>(input: &mut Parser<'i, '_>) -> &'i str {
  let start = input.position();
  while input.next().is_ok() {}
  input.slice_from(start)
}
