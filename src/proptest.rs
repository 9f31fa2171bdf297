//! Proptest strategies for documents.
//!
//! Enable with the `proptest` feature. The generated [`fixed::Document`]
//! values can be built into a [`Dom`](crate::Dom) with their `build`
//! method.
//!
//! The documents are the ones that survive a trip through
//! [`document_to_string`](crate::document_to_string) and a
//! whitespace-stripping parse: no whitespace-only text, comments without
//! `-`, and no `xml:space`.

use ahash::HashSet;
use proptest::prelude::*;

use crate::fixed;

const NAMESPACES: &[&str] = &["", "http://example.com/x", "http://example.com/y"];
const PREFIXES: &[&str] = &["", "x", "y"];
const ELEMENT_NAMES: &[&str] = &["a", "b", "c", "d", "e"];
const ATTRIBUTE_NAMES: &[&str] = &["q", "r", "s"];
const PI_TARGETS: &[&str] = &["pi1", "pi2", "pi3"];
const XML_STRING: &str = "[\t\n\u{0020}-\u{D7FF}\u{E000}-\u{FFFD}]{0,12}";

fn arb_name(names: &'static [&'static str]) -> impl Strategy<Value = fixed::Name> {
    (prop::sample::select(NAMESPACES), prop::sample::select(names))
        .prop_map(|(namespace, local_name)| fixed::Name::new(namespace, local_name))
}

fn arb_text() -> impl Strategy<Value = String> {
    XML_STRING.prop_filter("text with content", |s| {
        s.chars().any(|c| !c.is_ascii_whitespace())
    })
}

fn arb_comment() -> impl Strategy<Value = String> {
    XML_STRING.prop_filter("comment", |s| !s.contains('-'))
}

fn arb_processing_instruction() -> impl Strategy<Value = fixed::ProcessingInstruction> {
    (
        prop::sample::select(PI_TARGETS),
        prop::option::of("[a-z]{1,5}"),
    )
        .prop_map(|(target, data)| fixed::ProcessingInstruction {
            target: target.to_string(),
            data,
        })
}

fn arb_prefix() -> impl Strategy<Value = fixed::Prefix> {
    (prop::sample::select(PREFIXES), prop::sample::select(NAMESPACES))
        // a prefix can't be undeclared
        .prop_filter("bindable prefix", |(prefix, namespace)| {
            prefix.is_empty() || !namespace.is_empty()
        })
        .prop_map(|(prefix, namespace)| fixed::Prefix {
            prefix: prefix.to_string(),
            namespace: namespace.to_string(),
        })
}

fn arb_element_with(
    children: impl Strategy<Value = Vec<fixed::Content>>,
) -> impl Strategy<Value = fixed::Element> {
    (
        arb_name(ELEMENT_NAMES),
        prop::collection::vec(arb_prefix(), 0..3),
        prop::collection::vec((arb_name(ATTRIBUTE_NAMES), XML_STRING), 0..4),
        children,
    )
        .prop_map(|(name, prefixes, attributes, children)| fixed::Element {
            name,
            prefixes: unduplicate_prefixes(prefixes),
            attributes: unduplicate_attributes(attributes),
            children,
        })
}

fn arb_content() -> impl Strategy<Value = fixed::Content> {
    let leaf = prop_oneof![
        arb_text().prop_map(fixed::Content::Text),
        arb_comment().prop_map(fixed::Content::Comment),
        arb_processing_instruction().prop_map(fixed::Content::ProcessingInstruction),
    ];
    leaf.prop_recursive(
        4,  // levels deep
        64, // maximum number of nodes
        6,  // items per collection
        |inner| {
            arb_element_with(prop::collection::vec(inner, 0..6)).prop_map(fixed::Content::Element)
        },
    )
}

fn unduplicate_attributes(attributes: Vec<(fixed::Name, String)>) -> Vec<(fixed::Name, String)> {
    let mut seen = HashSet::default();
    attributes
        .into_iter()
        .filter(|(name, _)| seen.insert(name.clone()))
        .collect()
}

fn unduplicate_prefixes(prefixes: Vec<fixed::Prefix>) -> Vec<fixed::Prefix> {
    let mut seen = HashSet::default();
    prefixes
        .into_iter()
        .filter(|prefix| seen.insert(prefix.prefix.clone()))
        .collect()
}

/// Generate an arbitrary document.
pub fn arb_document() -> impl Strategy<Value = fixed::Document> {
    let around = prop::collection::vec(
        prop_oneof![
            arb_comment().prop_map(fixed::DocumentContent::Comment),
            arb_processing_instruction().prop_map(fixed::DocumentContent::ProcessingInstruction),
        ],
        0..3,
    );
    (
        around.clone(),
        arb_element_with(prop::collection::vec(arb_content(), 0..6)),
        around,
    )
        .prop_map(|(before, document_element, after)| fixed::Document {
            before,
            document_element,
            after,
        })
}
