//! Generation of high resolution image media queries.
//!
//! The rewrite runs in two passes over a parsed style sheet. The first pass
//! records image declarations already authored inside media blocks covered
//! by a configured density tier. The second pass visits every style rule,
//! rewrites its image-bearing declarations into per-tier variants, and
//! collects the new `@media` blocks, which are spliced in after their
//! anchors only once traversal is complete.

use crate::declaration::{Declaration, DeclarationBlock};
use crate::error::{Error, ErrorLocation, RetinaErrorKind, RetinaWarningKind, Warning};
use crate::image::{
  canonical_image_property, extract_url_value, find_high_res_image, is_remote_url,
  split_image_layers, AssetProvider, FileProvider,
};
use crate::media_query::MediaList;
use crate::rules::media::MediaRule;
use crate::rules::style::StyleRule;
use crate::rules::{CssRule, CssRuleList, Location};
use crate::stylesheet::StyleSheet;
use itertools::Itertools;
use smallvec::{smallvec, SmallVec};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// A density tier: the filename suffixes to try, and the media query that
/// selects devices of that density.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
  /// Filename suffixes to try, in order. The first existing variant wins.
  pub suffix: SmallVec<[String; 1]>,
  /// The media query selecting devices of this density.
  pub media_query: String,
}

/// Options for [add_retina_rules](StyleSheet::add_retina_rules).
pub struct RetinaOptions<'a> {
  /// The directory image paths are resolved against. When `None`, the
  /// directory of the style sheet's source file is used; if no source file
  /// is known either, the rewrite fails.
  pub asset_directory: Option<PathBuf>,
  /// File extensions (without the leading dot) eligible for processing.
  pub include_file_extensions: Vec<String>,
  /// Density tiers, keyed by threshold. A `None` value disables a tier.
  /// Tiers are processed in ascending key order.
  pub resolutions: BTreeMap<u32, Option<Resolution>>,
  /// Answers file existence checks. `None` uses the real filesystem.
  pub provider: Option<&'a dyn AssetProvider>,
}

impl<'a> Default for RetinaOptions<'a> {
  fn default() -> Self {
    let mut resolutions = BTreeMap::new();
    resolutions.insert(
      192,
      Some(Resolution {
        suffix: smallvec!["@2x".into()],
        media_query: "(-webkit-min-device-pixel-ratio: 2), (min-resolution: 192dpi)".into(),
      }),
    );
    resolutions.insert(
      288,
      Some(Resolution {
        suffix: smallvec!["@3x".into()],
        media_query: "(-webkit-min-device-pixel-ratio: 3), (min-resolution: 288dpi)".into(),
      }),
    );
    resolutions.insert(
      384,
      Some(Resolution {
        suffix: smallvec!["@4x".into()],
        media_query: "(-webkit-min-device-pixel-ratio: 4), (min-resolution: 384dpi)".into(),
      }),
    );

    RetinaOptions {
      asset_directory: None,
      include_file_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
      resolutions,
      provider: None,
    }
  }
}

/// The result of a rewrite. Warnings are diagnostics, not failures: the
/// style sheet is still produced.
#[derive(Debug)]
pub struct RetinaResult {
  /// The warnings produced while rewriting.
  pub warnings: Vec<Warning>,
}

/// One active tier, with its media query parsed.
struct Tier {
  suffix: SmallVec<[String; 1]>,
  query: MediaList,
}

/// An image declaration already authored inside a tier covered media block.
struct ExistingImage {
  path: String,
  loc: Location,
}

/// Per rule, per tier rewriting state. The image list and flags are reset
/// for each declaration; the pending declarations accumulate across the
/// whole rule.
struct TierWork {
  suffix: SmallVec<[String; 1]>,
  query: MediaList,
  decls: Vec<Declaration>,
  image_list: Vec<String>,
  image_found: bool,
  blocked: bool,
}

struct Rewriter<'a> {
  asset_directory: PathBuf,
  include_file_extensions: &'a [String],
  provider: &'a dyn AssetProvider,
  tiers: Vec<Tier>,
  existing: HashMap<MediaList, HashMap<String, ExistingImage>>,
  warnings: Vec<Warning>,
  filename: String,
}

impl StyleSheet {
  /// Inserts `@media` blocks that substitute high resolution variants of
  /// the images referenced in style rules.
  ///
  /// For every style rule with an image-bearing declaration (`background`,
  /// `background-image`, `list-style-image`), each active tier whose
  /// suffixed image variant exists on disk gains a new media block placed
  /// immediately after the rule (or after its enclosing media block, with
  /// the enclosing condition distributed into the tier's query). Rules that
  /// already sit inside a media block covered by any active tier are left
  /// alone, and manually authored variants recorded in the first pass
  /// suppress generation for their tier.
  pub fn add_retina_rules(
    &mut self,
    options: &RetinaOptions,
  ) -> Result<RetinaResult, Error<RetinaErrorKind>> {
    let filename = self.sources.first().cloned().unwrap_or_default();
    let asset_directory = match &options.asset_directory {
      Some(directory) => directory.clone(),
      None => match Path::new(&filename).parent() {
        Some(parent) => parent.to_path_buf(),
        None => {
          return Err(Error {
            kind: RetinaErrorKind::MissingAssetDirectory,
            loc: None,
          })
        }
      },
    };

    let tiers: Vec<Tier> = options
      .resolutions
      .values()
      .flatten()
      .map(|resolution| Tier {
        suffix: resolution.suffix.clone(),
        query: MediaList::parse_string(&resolution.media_query),
      })
      .collect();

    let mut rewriter = Rewriter {
      asset_directory,
      include_file_extensions: &options.include_file_extensions,
      provider: options.provider.unwrap_or(&FileProvider),
      tiers,
      existing: HashMap::new(),
      warnings: Vec::new(),
      filename,
    };

    rewriter.build_index(&self.rules);
    let insertions = rewriter.rewrite_rules(&self.rules);

    // Inserting while walking would invalidate the traversal, so the new
    // blocks are collected first and spliced in afterwards.
    if !insertions.is_empty() {
      let rules = std::mem::take(&mut self.rules.0);
      let mut result = Vec::with_capacity(rules.len() + insertions.len());
      let mut pending = insertions.into_iter().peekable();
      for (index, rule) in rules.into_iter().enumerate() {
        result.push(rule);
        while pending.peek().map_or(false, |(anchor, _)| *anchor == index) {
          if let Some((_, new_rule)) = pending.next() {
            result.push(new_rule);
          }
        }
      }
      self.rules.0 = result;
    }

    Ok(RetinaResult {
      warnings: rewriter.warnings,
    })
  }
}

impl<'a> Rewriter<'a> {
  fn warn(&mut self, kind: RetinaWarningKind, loc: Location) {
    self.warnings.push(Error {
      kind,
      loc: Some(ErrorLocation::new(loc, self.filename.clone())),
    });
  }

  /// First pass: record image declarations already authored inside media
  /// blocks whose query is covered by at least one active tier. A block
  /// covering none of the tiers is ignored entirely.
  fn build_index(&mut self, rules: &CssRuleList) {
    for rule in &rules.0 {
      if let CssRule::Media(media) = rule {
        if self.tiers.iter().any(|tier| tier.query.covers(&media.query)) {
          self.index_block(&media.query, &media.rules);
        }
        self.build_index(&media.rules);
      }
    }
  }

  fn index_block(&mut self, query: &MediaList, rules: &CssRuleList) {
    for rule in &rules.0 {
      match rule {
        CssRule::Style(style) => {
          for decl in &style.declarations.declarations {
            if canonical_image_property(&decl.property).is_none() {
              continue;
            }
            if let Some(path) = extract_url_value(&decl.value) {
              self
                .existing
                .entry(query.clone())
                .or_default()
                .insert(style.selectors.clone(), ExistingImage { path, loc: decl.loc });
            }
          }
        }
        CssRule::Media(media) => self.index_block(query, &media.rules),
        _ => {}
      }
    }
  }

  /// Second pass: visit every style rule and collect the media blocks to
  /// insert, keyed by the index of the top level rule they anchor after.
  fn rewrite_rules(&mut self, rules: &CssRuleList) -> Vec<(usize, CssRule)> {
    let mut insertions = vec![];
    for (index, rule) in rules.0.iter().enumerate() {
      match rule {
        CssRule::Style(style) => {
          for new_rule in self.rewrite_rule(style, None) {
            insertions.push((index, CssRule::Media(new_rule)));
          }
        }
        CssRule::Media(media) => {
          // The new blocks anchor after the enclosing media block itself.
          for rule in &media.rules.0 {
            if let CssRule::Style(style) = rule {
              for new_rule in self.rewrite_rule(style, Some(&media.query)) {
                insertions.push((index, CssRule::Media(new_rule)));
              }
            }
          }
        }
        _ => {}
      }
    }
    insertions
  }

  /// Rewrites one style rule, returning the media blocks generated for it
  /// in ascending tier order.
  fn rewrite_rule(&mut self, style: &StyleRule, enclosing: Option<&MediaList>) -> Vec<MediaRule> {
    let mut work: Vec<TierWork> = self
      .tiers
      .iter()
      .map(|tier| TierWork {
        suffix: tier.suffix.clone(),
        query: tier.query.clone(),
        decls: Vec::new(),
        image_list: Vec::new(),
        image_found: false,
        blocked: false,
      })
      .collect();

    if let Some(enclosing) = enclosing {
      // A rule nested inside a media block covered by any active tier is
      // assumed to handle its own variants, even when other tiers are not
      // covered.
      if self.tiers.iter().any(|tier| tier.query.covers(enclosing)) {
        return vec![];
      }

      // Push the enclosing condition through each tier condition so the
      // generated block stands alone instead of relying on nesting.
      for item in &mut work {
        item.query = item.query.distribute(enclosing);
      }
    }

    for decl in &style.declarations.declarations {
      self.rewrite_declaration(decl, &style.selectors, &mut work);
    }

    work
      .into_iter()
      .filter(|item| !item.decls.is_empty())
      .map(|item| MediaRule {
        query: item.query,
        rules: CssRuleList(vec![CssRule::Style(StyleRule {
          selectors: style.selectors.clone(),
          declarations: DeclarationBlock {
            declarations: item.decls,
          },
          loc: style.loc,
        })]),
        loc: style.loc,
      })
      .collect()
  }

  /// Rewrites a single declaration into the per tier work items.
  ///
  /// A layer that does not qualify (no `url()`, a network URL, or a
  /// disallowed extension) aborts the whole declaration: remaining layers
  /// and the merge step are skipped, while warnings already emitted stay.
  fn rewrite_declaration(&mut self, decl: &Declaration, selectors: &str, work: &mut [TierWork]) {
    let property = match canonical_image_property(&decl.property) {
      Some(property) => property,
      None => return,
    };

    for item in work.iter_mut() {
      item.image_list.clear();
      item.image_found = false;
      item.blocked = false;
    }

    for layer in split_image_layers(&decl.value) {
      let path = match extract_url_value(layer) {
        Some(path) => path,
        None => return,
      };

      if is_remote_url(&path) || !self.allows_extension(&path) {
        return;
      }

      for item in work.iter_mut() {
        if item.blocked {
          continue;
        }

        let image_path = match find_high_res_image(
          &path,
          &self.asset_directory,
          &item.suffix,
          self.provider,
        ) {
          Some(found) => {
            item.image_found = true;
            found
          }
          None => {
            let kind = RetinaWarningKind::MissingHighResImage {
              path: path.clone(),
              suffixes: item.suffix.clone(),
            };
            self.warn(kind, decl.loc);
            path.clone()
          }
        };

        if let Some(existing) = self
          .existing
          .get(&item.query)
          .and_then(|by_selector| by_selector.get(selectors))
        {
          // The author already handles this tier, whether with the same
          // image or a deliberately different one.
          let redundant = existing.path == image_path;
          let loc = existing.loc;
          if redundant {
            self.warn(RetinaWarningKind::UnnecessaryHighResImage, loc);
          }
          item.blocked = true;
          continue;
        }

        item.image_list.push(image_path);
      }
    }

    for item in work.iter_mut() {
      // Tiers with only fallback paths produce no declaration at all.
      if item.image_found && !item.blocked && !item.image_list.is_empty() {
        let value = item
          .image_list
          .iter()
          .map(|path| format!("url('{}')", path))
          .join(", ");
        item.decls.push(Declaration {
          property: property.into(),
          value,
          important: false,
          loc: decl.loc,
        });
      }
    }
  }

  fn allows_extension(&self, path: &str) -> bool {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
      Some(extension) => self
        .include_file_extensions
        .iter()
        .any(|allowed| allowed == extension),
      None => false,
    }
  }
}
