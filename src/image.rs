//! Locating high resolution image assets.

use cssparser::{
  _cssparser_internal_to_lowercase, match_ignore_ascii_case, ParseError, Parser, ParserInput, Token,
};
use std::fs;
use std::path::Path;

/// Answers file existence checks for image assets.
///
/// The rewriter only ever asks whether a candidate path exists; hosts and
/// tests can substitute their own implementation (e.g. an in-memory tree or
/// a virtual filesystem).
pub trait AssetProvider {
  /// Returns whether a file exists at the given path.
  fn exists(&self, path: &Path) -> bool;
}

/// An [AssetProvider](AssetProvider) backed by the real filesystem.
///
/// Any access failure (missing file, permission error, broken link) is
/// treated as non-existence, never surfaced as an error.
pub struct FileProvider;

impl AssetProvider for FileProvider {
  fn exists(&self, path: &Path) -> bool {
    fs::metadata(path).is_ok()
  }
}

/// Finds the first suffixed variant of `path` that exists under
/// `asset_directory`, preserving the un-resolved relative spelling of the
/// result so the emitted declaration keeps the path style the author used.
///
/// The suffix is inserted immediately before the file extension:
/// `dir/name.png` with `@2x` becomes `dir/name@2x.png`.
pub fn find_high_res_image(
  path: &str,
  asset_directory: &Path,
  suffixes: &[String],
  provider: &dyn AssetProvider,
) -> Option<String> {
  suffixes
    .iter()
    .map(|suffix| high_res_image_path(path, suffix))
    .find(|candidate| {
      // Site-absolute paths resolve against the asset root too.
      let relative = candidate.strip_prefix('/').unwrap_or(candidate);
      provider.exists(&asset_directory.join(relative))
    })
}

fn high_res_image_path(path: &str, suffix: &str) -> String {
  match Path::new(path).extension().and_then(|ext| ext.to_str()) {
    Some(ext) => {
      let stem = &path[..path.len() - ext.len() - 1];
      format!("{}{}.{}", stem, suffix, ext)
    }
    None => format!("{}{}", path, suffix),
  }
}

/// Extracts the first `url()` image path from a declaration value,
/// tolerating single, double, or absent quoting. Returns `None` if the
/// value contains no `url()`.
pub fn extract_url_value(value: &str) -> Option<String> {
  let mut input = ParserInput::new(value);
  let mut parser = Parser::new(&mut input);
  loop {
    let token = match parser.next() {
      Ok(token) => token.clone(),
      Err(_) => return None,
    };

    match token {
      Token::UnquotedUrl(url) => return Some(url.to_string()),
      Token::Function(ref name) if name.eq_ignore_ascii_case("url") => {
        return parser.parse_nested_block(parse_url_string).ok();
      }
      _ => {}
    }
  }
}

fn parse_url_string<'i, 't>(input: &mut Parser<'i, 't>) -> Result<String, ParseError<'i, ()>> {
  let url = input.expect_string()?.to_string();
  Ok(url)
}

/// Returns whether the path is a full network URL rather than a file path.
pub fn is_remote_url(path: &str) -> bool {
  path.starts_with("http://") || path.starts_with("https://")
}

/// Splits a declaration value into its top level comma separated image
/// layers. Commas inside parentheses or quoted strings do not split.
pub(crate) fn split_image_layers(value: &str) -> Vec<&str> {
  let mut layers = vec![];
  let mut depth = 0u32;
  let mut quote: Option<char> = None;
  let mut start = 0;

  for (i, c) in value.char_indices() {
    match c {
      '\'' | '"' => {
        if quote == Some(c) {
          quote = None;
        } else if quote.is_none() {
          quote = Some(c);
        }
      }
      '(' if quote.is_none() => depth += 1,
      ')' if quote.is_none() => depth = depth.saturating_sub(1),
      ',' if quote.is_none() && depth == 0 => {
        layers.push(&value[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }

  layers.push(&value[start..]);
  layers
}

/// Maps a source property name to the property generated for it.
pub(crate) fn canonical_image_property(name: &str) -> Option<&'static str> {
  match_ignore_ascii_case! { name,
    "background" => Some("background-image"),
    "background-image" => Some("background-image"),
    "list-style-image" => Some("list-style-image"),
    _ => None
  }
}
