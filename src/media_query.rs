//! Media query lists and the syntactic algebra over them.
//!
//! Media queries are kept as raw text split into their boolean structure: a
//! [MediaList](MediaList) is a disjunction (comma separated) of
//! [MediaQuery](MediaQuery) clauses, and each clause is a conjunction of
//! predicates joined by `and`. Predicates are opaque strings compared only by
//! exact text equality after trimming. No numeric reasoning happens here:
//! `(min-width: 601px)` and `(min-width: 600px)` are simply different
//! predicates.

use crate::error::PrinterError;
use crate::printer::Printer;
use crate::traits::ToCss;
use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};
use itertools::iproduct;

/// A type that encapsulates a media query list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaList {
  /// The list of media queries.
  pub media_queries: Vec<MediaQuery>,
}

impl MediaList {
  /// Parse a media query list from CSS.
  ///
  /// Never fails: clauses are recovered as raw predicate text, so the worst
  /// case is a clause with a single opaque predicate.
  pub fn parse(input: &mut Parser) -> Self {
    let mut media_queries = vec![];
    loop {
      if let Ok(query) = input.parse_until_before(Delimiter::Comma, MediaQuery::parse) {
        if !query.predicates.is_empty() {
          media_queries.push(query);
        }
      }

      match input.next() {
        Ok(&Token::Comma) => {}
        Ok(_) => unreachable!(),
        Err(_) => break,
      }
    }

    MediaList { media_queries }
  }

  /// Parse a media query list from a string.
  pub fn parse_string(input: &str) -> Self {
    let mut input = ParserInput::new(input);
    let mut parser = Parser::new(&mut input);
    Self::parse(&mut parser)
  }

  /// Returns whether satisfying `candidate` guarantees satisfying `self`:
  /// every clause of `candidate` must contain some clause of `self` as a
  /// subset of its predicates.
  ///
  /// This is not symmetric in argument order, and it is purely syntactic.
  /// Reordering predicates within a clause, or clauses within a list, never
  /// changes the result.
  pub fn covers(&self, candidate: &MediaList) -> bool {
    candidate
      .media_queries
      .iter()
      .all(|c| self.media_queries.iter().any(|r| r.is_subset_of(c)))
  }

  /// Combines every clause of `self` with every clause of `other` into a
  /// single flat list, so a query that would otherwise rely on nesting
  /// stands alone.
  ///
  /// The result preserves nesting order: the outer loop runs over `self`'s
  /// clauses, the inner loop over `other`'s.
  pub fn distribute(&self, other: &MediaList) -> MediaList {
    let mut media_queries = Vec::with_capacity(self.media_queries.len() * other.media_queries.len());
    for (a, b) in iproduct!(&self.media_queries, &other.media_queries) {
      let mut predicates = a.predicates.clone();
      predicates.extend(b.predicates.iter().cloned());
      media_queries.push(MediaQuery { predicates });
    }

    MediaList { media_queries }
  }
}

impl ToCss for MediaList {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), PrinterError>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for query in &self.media_queries {
      if !first {
        dest.delim(',', false)?;
      }
      first = false;
      query.to_css(dest)?;
    }
    Ok(())
  }
}

/// A single media query clause: a conjunction of opaque predicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaQuery {
  /// The predicates of this clause, in source order, as trimmed raw text.
  pub predicates: Vec<String>,
}

impl MediaQuery {
  /// Parse a single media query clause, splitting on top level `and`
  /// keywords. Parenthesized content is opaque, so an `and` inside a
  /// predicate never splits it.
  pub fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, ParseError<'i, ()>> {
    let mut predicates: Vec<String> = vec![];
    let mut start = input.position();
    loop {
      let state = input.state();
      let is_and = match input.next() {
        Ok(&Token::Ident(ref ident)) => ident.eq_ignore_ascii_case("and"),
        Ok(_) => false,
        Err(_) => break,
      };

      if is_and {
        let predicate = input.slice(start..state.position()).trim();
        if !predicate.is_empty() {
          predicates.push(predicate.into());
        }
        start = input.position();
      }
    }

    let predicate = input.slice_from(start).trim();
    if !predicate.is_empty() {
      predicates.push(predicate.into());
    }

    Ok(MediaQuery { predicates })
  }

  /// Returns whether every predicate of `self` also appears in `other`.
  fn is_subset_of(&self, other: &MediaQuery) -> bool {
    self.predicates.iter().all(|p| other.predicates.contains(p))
  }
}

impl ToCss for MediaQuery {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), PrinterError>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for predicate in &self.predicates {
      if !first {
        dest.write_str(" and ")?;
      }
      first = false;
      dest.write_str(predicate)?;
    }
    Ok(())
  }
}
