//!
//! Pass ordering for the two pipeline variants.
//!
//! ```text
//! basic:     builder -> detail-merger -> sibling-list -> list-kind -> cleanup -> coalescer
//! advanced:  pre-normalizer -> builder -> detail-merger -> sibling-list -> list-kind
//!            -> cleanup -> orphan-absorber -> coalescer
//! ```
//!
//! Any pass can be switched off by name; the base builder always runs.

use serde::{Deserialize, Serialize};

use crate::builder::{ColonSyntaxBuilder, DefinitionListBuilder};
use crate::config::{Config, normalize_key};
use crate::error::Error;
use crate::mdast::Node;
use crate::parser::{ParseOptions, parse};
use crate::passes::{Pass, PassContext, Prenormalizer, all_passes, known_names};

/// Which set of passes runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Tree passes only
    Basic,
    /// Source pre-normalization, seed-item removal and orphan absorption on top of basic
    #[default]
    Advanced,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Advanced => "advanced",
        }
    }

    /// Tree passes of this variant, in order
    fn passes(self) -> Vec<Box<dyn Pass>> {
        all_passes()
            .into_iter()
            .filter(|pass| self == Variant::Advanced || !pass.advanced_only())
            .collect()
    }
}

/// A configured transformation from parsed Markdown to repaired definition lists.
pub struct Transformer {
    options: ParseOptions,
    prenormalizer: Option<Prenormalizer>,
    builder: Box<dyn DefinitionListBuilder>,
    passes: Vec<Box<dyn Pass>>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::assemble(Variant::default(), ParseOptions::default())
    }
}

impl Transformer {
    /// Build the pipeline described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPass`] when `disable` names a pass that does not exist.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let options = ParseOptions::from(&config.markdown);
        let mut transformer = Self::assemble(config.transform.variant, options);

        let known = known_names();
        for name in &config.transform.disable {
            let name = normalize_key(name);
            if !known.iter().any(|known| *known == name) {
                return Err(Error::UnknownPass(name));
            }
            transformer.disable(&name);
        }
        Ok(transformer)
    }

    fn assemble(variant: Variant, options: ParseOptions) -> Self {
        Self {
            options,
            prenormalizer: (variant == Variant::Advanced).then(|| Prenormalizer::new(options)),
            builder: Box::new(ColonSyntaxBuilder::new(options)),
            passes: variant.passes(),
        }
    }

    fn disable(&mut self, name: &str) {
        if self.prenormalizer.as_ref().is_some_and(|p| p.name() == name) {
            self.prenormalizer = None;
        }
        self.passes.retain(|pass| pass.name() != name);
        log::debug!("Disabled pass '{name}'");
    }

    /// Replace the base builder.
    pub fn with_builder(mut self, builder: impl DefinitionListBuilder + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    /// Names of the stages that will run, in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.passes.len() + 2);
        if let Some(prenormalizer) = &self.prenormalizer {
            names.push(prenormalizer.name());
        }
        names.push("builder");
        names.extend(self.passes.iter().map(|pass| pass.name()));
        names
    }

    /// Transform a tree parsed from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRange`] when a paragraph position does not fit `source`.
    pub fn transform(&self, tree: Node, source: &str) -> Result<Node, Error> {
        let mut tree = tree;
        let rewritten = self
            .prenormalizer
            .as_ref()
            .and_then(|prenormalizer| prenormalizer.apply(&mut tree, source));
        let ctx = PassContext {
            prenormalized: rewritten.is_some(),
        };

        self.builder.build(&mut tree, rewritten.as_deref().unwrap_or(source))?;
        for pass in &self.passes {
            log::trace!("Running pass '{}'", pass.name());
            pass.apply(&mut tree, &ctx);
        }
        Ok(tree)
    }

    /// Parse Markdown text and transform it.
    pub fn process(&self, source: &str) -> Result<Node, Error> {
        self.transform(parse(source, self.options), source)
    }
}

/// Transformation with default settings, as a reusable function.
///
/// Equivalent to `Transformer::default()`: the advanced pipeline with every pass enabled.
pub fn deflist_with_lists() -> impl Fn(Node, &str) -> Result<Node, Error> + Send + Sync {
    let transformer = Transformer::default();
    move |tree, source| transformer.transform(tree, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;

    #[test]
    fn test_stage_order() {
        assert_eq!(
            Transformer::default().stage_names(),
            vec![
                "pre-normalizer",
                "builder",
                "detail-merger",
                "sibling-list",
                "list-kind",
                "cleanup",
                "orphan-absorber",
                "coalescer",
            ]
        );

        let basic = Transformer::new(&Config {
            transform: TransformConfig {
                variant: Variant::Basic,
                disable: Vec::new(),
            },
            ..Config::default()
        })
        .unwrap();
        assert_eq!(
            basic.stage_names(),
            vec!["builder", "detail-merger", "sibling-list", "list-kind", "cleanup", "coalescer"]
        );
    }

    #[test]
    fn test_disable_passes() {
        let config = Config::default().with_overrides(None, &["pre_normalizer".to_string(), "coalescer".to_string()]);
        let transformer = Transformer::new(&config).unwrap();
        assert_eq!(
            transformer.stage_names(),
            vec!["builder", "detail-merger", "sibling-list", "list-kind", "cleanup", "orphan-absorber"]
        );
    }

    #[test]
    fn test_unknown_pass_is_rejected() {
        let config = Config::default().with_overrides(None, &["reflow".to_string()]);
        let err = Transformer::new(&config).err().unwrap();
        assert!(matches!(err, Error::UnknownPass(name) if name == "reflow"));
    }

    #[test]
    fn test_custom_builder() {
        struct Nothing;
        impl DefinitionListBuilder for Nothing {
            fn build(&self, _tree: &mut Node, _source: &str) -> Result<(), Error> {
                Ok(())
            }
        }

        let tree = Transformer::default().with_builder(Nothing).process("Term\n: Definition\n").unwrap();
        assert!(tree.children().unwrap().iter().all(|n| n.kind() == "paragraph"));
    }

    #[test]
    fn test_factory_matches_default_transformer() {
        let source = "Term\n: - item A\n  - item B\n";
        let transform = deflist_with_lists();
        let from_factory = transform(parse(source, ParseOptions::default()), source).unwrap();
        assert_eq!(from_factory, Transformer::default().process(source).unwrap());
    }
}
