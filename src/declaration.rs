use crate::error::{ParserError, PrinterError};
use crate::parser::{exhaust, ParserOptions};
use crate::printer::Printer;
use crate::rules::Location;
use crate::traits::ToCss;
use cssparser::{
  AtRuleParser, CowRcStr, DeclarationListParser, DeclarationParser, Delimiter, ParseError, Parser,
};

/// A declaration block, as found within a style rule.
#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclarationBlock {
  /// The declarations, in source order.
  pub declarations: Vec<Declaration>,
}

impl DeclarationBlock {
  pub(crate) fn parse<'i, 't>(
    input: &mut Parser<'i, 't>,
    options: &ParserOptions,
  ) -> Result<Self, ParseError<'i, ParserError>> {
    let mut declarations = vec![];
    let parser = DeclarationListParser::new(input, PropertyDeclarationParser);
    for decl in parser {
      match decl {
        Ok(decl) => declarations.push(decl),
        Err((err, _)) => {
          if options.error_recovery {
            continue;
          }
          return Err(err);
        }
      }
    }

    Ok(DeclarationBlock { declarations })
  }
}

/// A property declaration. The value is kept as the raw text the author
/// wrote, with any `!important` flag split off.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
  /// The property name.
  pub property: String,
  /// The value, as raw text.
  pub value: String,
  /// Whether the declaration carried `!important`.
  pub important: bool,
  /// The location of the value in the source file.
  pub loc: Location,
}

impl ToCss for Declaration {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), PrinterError>
  where
    W: std::fmt::Write,
  {
    dest.write_str(&self.property)?;
    dest.delim(':', false)?;
    dest.write_str(&self.value)?;
    if self.important {
      dest.whitespace()?;
      dest.write_str("!important")?;
    }
    Ok(())
  }
}

struct PropertyDeclarationParser;

impl<'i> DeclarationParser<'i> for PropertyDeclarationParser {
  type Declaration = Declaration;
  type Error = ParserError;

  fn parse_value<'t>(
    &mut self,
    name: CowRcStr<'i>,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
    let loc = input.current_source_location();
    let value = input.parse_until_before(
      Delimiter::Bang,
      |input| -> Result<String, ParseError<'i, ParserError>> {
        Ok(exhaust(input).trim().to_string())
      },
    )?;
    let important = input
      .try_parse(|input| {
        input.expect_delim('!')?;
        input.expect_ident_matching("important")
      })
      .is_ok();

    Ok(Declaration {
      property: name.to_string(),
      value,
      important,
      loc: loc.into(),
    })
  }
}

/// Default methods reject any at-rule within a declaration list.
impl<'i> AtRuleParser<'i> for PropertyDeclarationParser {
  type Prelude = ();
  type AtRule = Declaration;
  type Error = ParserError;
}
