//! Wrapper element construction.
//!
//! A [`WrapperSpec`] may carry several forms at once; [`WrapperSpec::resolve`]
//! picks one with the precedence callback > template > tag/class > default,
//! validates it, and returns a [`WrapperFactory`] that the applier calls once
//! per text leaf.

use crate::config::HighlightConfig;
use crate::error::HighlightError;
use dom::{Document, DomError, NodeId, NodeType};
use std::fmt;

type FactoryFn<'a> = Box<dyn FnMut(&mut Document, NodeId) -> Result<NodeId, DomError> + 'a>;

/// How wrapper elements are made.
#[derive(Default)]
pub struct WrapperSpec<'a> {
    factory: Option<FactoryFn<'a>>,
    template: Option<NodeId>,
    tag_name: Option<String>,
    class_name: Option<String>,
    attributes: Vec<(String, String)>,
}

impl<'a> WrapperSpec<'a> {
    /// Elements named `name`.
    pub fn tag(name: impl Into<String>) -> Self {
        Self::default().with_tag(name)
    }

    /// Shallow clones of an existing element.
    pub fn template(node: NodeId) -> Self {
        Self::default().with_template(node)
    }

    /// Whatever `factory` returns for each leaf. The returned node must be a
    /// detached element, otherwise applying fails with
    /// [`HighlightError::InvalidWrapper`]. Any children it has are discarded.
    pub fn factory(
        factory: impl FnMut(&mut Document, NodeId) -> Result<NodeId, DomError> + 'a,
    ) -> Self {
        Self::default().with_factory(factory)
    }

    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tag_name = Some(name.into());
        self
    }

    pub fn with_template(mut self, node: NodeId) -> Self {
        self.template = Some(node);
        self
    }

    pub fn with_factory(
        mut self,
        factory: impl FnMut(&mut Document, NodeId) -> Result<NodeId, DomError> + 'a,
    ) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub(crate) fn resolve(
        self,
        doc: &Document,
        config: &HighlightConfig,
    ) -> Result<WrapperFactory<'a>, HighlightError> {
        if let Some(factory) = self.factory {
            return Ok(WrapperFactory::Callback(factory));
        }
        if let Some(template) = self.template {
            return match doc.node_type(template) {
                Ok(NodeType::Element) => Ok(WrapperFactory::Template(template)),
                Ok(other) => Err(malformed(format!(
                    "template {template:?} is a {other:?} node, not an element"
                ))),
                Err(_) => Err(malformed(format!("template {template:?} does not exist"))),
            };
        }

        for (name, _) in &self.attributes {
            if !is_valid_attribute_name(name) {
                return Err(malformed(format!("invalid attribute name {name:?}")));
            }
        }
        let has_class_attribute = self.attributes.iter().any(|(k, _)| k == "class");
        let explicit = self.tag_name.is_some() || self.class_name.is_some();
        let name = self.tag_name.unwrap_or_else(|| config.tag_name.clone());
        if !is_valid_tag_name(&name) {
            return Err(malformed(format!("invalid tag name {name:?}")));
        }
        let class = match self.class_name {
            Some(class) => Some(class),
            None if !explicit && !has_class_attribute => Some(config.class_name.clone()),
            None => None,
        };
        let mut attributes = self.attributes;
        if let Some(class) = class {
            if class.trim().is_empty() {
                return Err(malformed("class name is empty".to_string()));
            }
            match attributes.iter_mut().find(|(k, _)| k == "class") {
                Some((_, existing)) => {
                    existing.push(' ');
                    existing.push_str(&class);
                }
                None => attributes.insert(0, ("class".to_string(), class)),
            }
        }
        Ok(WrapperFactory::Element { name, attributes })
    }
}

impl fmt::Debug for WrapperSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperSpec")
            .field("factory", &self.factory.as_ref().map(|_| "<fn>"))
            .field("template", &self.template)
            .field("tag_name", &self.tag_name)
            .field("class_name", &self.class_name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

fn malformed(reason: String) -> HighlightError {
    HighlightError::MalformedWrapperSpec(reason)
}

fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '='))
}

/// A resolved, validated way of producing one wrapper per leaf.
pub(crate) enum WrapperFactory<'a> {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Template(NodeId),
    Callback(FactoryFn<'a>),
}

impl WrapperFactory<'_> {
    pub(crate) fn create(&mut self, doc: &mut Document, leaf: NodeId) -> Result<NodeId, DomError> {
        match self {
            WrapperFactory::Element { name, attributes } => Ok(doc
                .create_element_with_attributes(
                    name.as_str(),
                    attributes.iter().map(|(k, v)| (k.as_str(), v.clone())),
                )),
            WrapperFactory::Template(template) => doc.clone_node(*template, false),
            WrapperFactory::Callback(factory) => factory(doc, leaf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(factory: WrapperFactory<'_>) -> (String, Vec<(String, String)>) {
        match factory {
            WrapperFactory::Element { name, attributes } => (name, attributes),
            WrapperFactory::Template(_) => panic!("expected element factory, got template"),
            WrapperFactory::Callback(_) => panic!("expected element factory, got callback"),
        }
    }

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_uses_config_tag_and_class() {
        let doc = Document::new();
        let config = HighlightConfig::default();
        let resolved = element(WrapperSpec::default().resolve(&doc, &config).unwrap());
        assert_eq!(resolved, ("mark".to_string(), attrs(&[("class", "highlight")])));
    }

    #[test]
    fn explicit_tag_drops_default_class() {
        let doc = Document::new();
        let config = HighlightConfig::default();
        let resolved = element(
            WrapperSpec::tag("span")
                .attribute("data-note", "1")
                .resolve(&doc, &config)
                .unwrap(),
        );
        assert_eq!(resolved, ("span".to_string(), attrs(&[("data-note", "1")])));
    }

    #[test]
    fn class_merges_into_class_attribute() {
        let doc = Document::new();
        let config = HighlightConfig::default();
        let resolved = element(
            WrapperSpec::default()
                .attribute("class", "a")
                .class("b")
                .resolve(&doc, &config)
                .unwrap(),
        );
        assert_eq!(resolved, ("mark".to_string(), attrs(&[("class", "a b")])));
    }

    #[test]
    fn class_attribute_suppresses_default_class() {
        let doc = Document::new();
        let config = HighlightConfig::default();
        let resolved = element(
            WrapperSpec::default()
                .attribute("class", "mine")
                .resolve(&doc, &config)
                .unwrap(),
        );
        assert_eq!(resolved, ("mark".to_string(), attrs(&[("class", "mine")])));
    }

    #[test]
    fn precedence_callback_then_template_then_tag() {
        let mut doc = Document::new();
        let template = doc.create_element("ins");
        let config = HighlightConfig::default();
        let spec = WrapperSpec::tag("span")
            .with_template(template)
            .with_factory(|doc, _| Ok(doc.create_element("b")));
        assert!(matches!(
            spec.resolve(&doc, &config).unwrap(),
            WrapperFactory::Callback(_)
        ));
        let spec = WrapperSpec::tag("span").with_template(template);
        assert!(matches!(
            spec.resolve(&doc, &config).unwrap(),
            WrapperFactory::Template(t) if t == template
        ));
    }

    #[test]
    fn malformed_specs_are_rejected() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        let config = HighlightConfig::default();
        for spec in [
            WrapperSpec::tag(""),
            WrapperSpec::tag("two words"),
            WrapperSpec::tag("1st"),
            WrapperSpec::default().class("  "),
            WrapperSpec::default().attribute("", "v"),
            WrapperSpec::default().attribute("a b", "v"),
            WrapperSpec::template(text),
            WrapperSpec::template(NodeId(999)),
        ] {
            let described = format!("{spec:?}");
            assert!(
                matches!(
                    spec.resolve(&doc, &config),
                    Err(HighlightError::MalformedWrapperSpec(_))
                ),
                "expected rejection of {described}"
            );
        }
        let bad_config = HighlightConfig {
            tag_name: "<mark>".to_string(),
            ..HighlightConfig::default()
        };
        assert!(matches!(
            WrapperSpec::default().resolve(&doc, &bad_config),
            Err(HighlightError::MalformedWrapperSpec(_))
        ));
    }

    #[test]
    fn template_factory_clones_shallowly() {
        let mut doc = Document::new();
        let template = doc.create_element_with_attributes("mark", [("data-k", "v")]);
        let child = doc.create_text("ignored");
        doc.append_child(template, child).unwrap();
        let leaf = doc.create_text("leaf");
        let mut factory = WrapperSpec::template(template)
            .resolve(&doc, &HighlightConfig::default())
            .unwrap();
        let wrapper = factory.create(&mut doc, leaf).unwrap();
        assert_ne!(wrapper, template);
        assert!(doc.children(wrapper).unwrap().is_empty());
        assert_eq!(doc.attribute(wrapper, "data-k").unwrap(), Some("v"));
    }
}
