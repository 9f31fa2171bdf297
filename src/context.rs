use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::output::{OutputProperties, Transformer};
use crate::parse::{DocumentBuilder, ParserConfig};

/// Supplies parsers and transformers to the operations that need them.
///
/// Implement this to control how documents are parsed and written, or to
/// substitute a stub in tests.
pub trait ExecutionContext {
    /// A non-validating document builder.
    fn document_builder(&self) -> Result<DocumentBuilder, Error>;

    /// A transformer. With an output format file, the transformer is
    /// configured from it; without, it has the context's default
    /// properties.
    fn transformer(&self, output_format: Option<&Path>) -> Result<Transformer, Error>;
}

/// An [`ExecutionContext`] with fixed parser settings and default output
/// properties.
///
/// ```rust
/// use domutils::{DefaultContext, Dom, ExecutionContext};
///
/// let context = DefaultContext::new();
/// let mut dom = Dom::new();
/// let doc = context.document_builder()?.parse_str(&mut dom, "<doc/>")?;
/// let output = context.transformer(None)?.transform_to_string(&dom, doc)?;
/// assert_eq!(output, r#"<?xml version="1.0" encoding="UTF-8"?><doc/>"#);
/// # Ok::<(), domutils::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultContext {
    parser_config: ParserConfig,
    default_output: OutputProperties,
}

impl DefaultContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these parser settings. Builders from this context never
    /// validate, whatever the settings say.
    pub fn with_parser_config(mut self, parser_config: ParserConfig) -> Self {
        self.parser_config = ParserConfig {
            validating: false,
            ..parser_config
        };
        self
    }

    /// Use these output properties for transformers without an output
    /// format file.
    pub fn with_output_properties(mut self, default_output: OutputProperties) -> Self {
        self.default_output = default_output;
        self
    }
}

impl ExecutionContext for DefaultContext {
    fn document_builder(&self) -> Result<DocumentBuilder, Error> {
        DocumentBuilder::new(self.parser_config.clone())
    }

    fn transformer(&self, output_format: Option<&Path>) -> Result<Transformer, Error> {
        match output_format {
            Some(path) => Transformer::from_output_format(path),
            None => {
                debug!("transformer with default output properties");
                Ok(Transformer::with_properties(self.default_output.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_never_validate() {
        let context = DefaultContext::new().with_parser_config(ParserConfig {
            validating: true,
            strip_whitespace: true,
            ..Default::default()
        });
        let builder = context.document_builder().unwrap();
        assert!(!builder.config().validating);
        assert!(builder.config().strip_whitespace);
    }

    #[test]
    fn test_default_output_properties() {
        let context = DefaultContext::new().with_output_properties(OutputProperties {
            indent: true,
            ..Default::default()
        });
        let transformer = context.transformer(None).unwrap();
        assert!(transformer.properties().indent);
    }
}
