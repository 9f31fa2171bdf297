use insta::assert_snapshot;
use rstest::rstest;

use domutils::{document_to_string_with, Dom, Method, OutputProperties, Transformer};

fn plain() -> Transformer {
    let mut transformer = Transformer::new();
    transformer.set_omit_xml_declaration(true);
    transformer
}

#[test]
fn test_serialize_subtree_declares_prefix() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(r#"<doc xmlns:foo="http://example.com"><foo:a/></doc>"#)
        .unwrap();
    let a = dom.first_child(dom.document_element(doc).unwrap()).unwrap();
    assert_eq!(
        plain().transform_to_string(&dom, a).unwrap(),
        r#"<foo:a xmlns:foo="http://example.com"/>"#
    );
}

#[test]
fn test_serialize_subtree_declares_default_namespace() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(r#"<doc xmlns="http://example.com"><a><b/></a></doc>"#)
        .unwrap();
    let a = dom.first_child(dom.document_element(doc).unwrap()).unwrap();
    assert_eq!(
        plain().transform_to_string(&dom, a).unwrap(),
        r#"<a xmlns="http://example.com"><b/></a>"#
    );
}

#[test]
fn test_serialize_keeps_declarations() {
    let mut dom = Dom::new();
    let xml = r#"<doc xmlns="urn:a" xmlns:b="urn:b"><b:x b:y="1"/><z/></doc>"#;
    let doc = dom.parse(xml).unwrap();
    assert_eq!(plain().transform_to_string(&dom, doc).unwrap(), xml);
}

#[test]
fn test_serialize_undeclares_default_namespace() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<doc xmlns="urn:a"/>"#).unwrap();
    let doc_el = dom.document_element(doc).unwrap();
    let name = dom.add_name("plain");
    dom.append_element(doc_el, name).unwrap();
    assert_eq!(
        plain().transform_to_string(&dom, doc).unwrap(),
        r#"<doc xmlns="urn:a"><plain xmlns=""/></doc>"#
    );
}

#[test]
fn test_serialize_created_namespaced_element() {
    let mut dom = Dom::new();
    let doc = dom.new_document();
    let ns = dom.add_namespace("urn:created");
    let name = dom.add_name_ns("doc", ns);
    let doc_el = dom.append_element(doc, name).unwrap();
    let attribute = dom.add_name_ns("attr", ns);
    dom.element_mut(doc_el)
        .unwrap()
        .set_attribute(attribute, "value");
    assert_eq!(
        plain().transform_to_string(&dom, doc).unwrap(),
        r#"<doc xmlns="urn:created" xmlns:ns0="urn:created" ns0:attr="value"/>"#
    );
}

#[test]
fn test_serialize_prefixed_element_keeps_prefix() {
    let mut dom = Dom::new();
    let doc = dom.new_document();
    let ns = dom.add_namespace("urn:p");
    let prefix = dom.add_prefix("p");
    let name = dom.add_name_ns("doc", ns);
    let doc_el = dom.new_prefixed_element(name, prefix);
    dom.append(doc, doc_el).unwrap();
    assert_eq!(
        plain().transform_to_string(&dom, doc).unwrap(),
        r#"<p:doc xmlns:p="urn:p"/>"#
    );
}

#[test]
fn test_serialize_xml_prefix_never_declared() {
    let mut dom = Dom::new();
    let xml = r#"<doc xml:lang="en"/>"#;
    let doc = dom.parse(xml).unwrap();
    assert_eq!(plain().transform_to_string(&dom, doc).unwrap(), xml);
}

#[rstest]
#[case("<a>&lt;&amp;&gt;</a>", "<a>&lt;&amp;&gt;</a>")]
#[case(r#"<a b="&quot;&lt;&amp;'"/>"#, r#"<a b="&quot;&lt;&amp;'"/>"#)]
#[case("<a b=\"x&#9;y&#10;z\"/>", "<a b=\"x&#9;y&#10;z\"/>")]
#[case("<a><![CDATA[<b>]]></a>", "<a>&lt;b&gt;</a>")]
#[case("<a><!-- note --><?pi data?><?empty?></a>", "<a><!-- note --><?pi data?><?empty?></a>")]
fn test_escaping(#[case] xml: &str, #[case] expected: &str) {
    let mut dom = Dom::new();
    let doc = dom.parse(xml).unwrap();
    assert_eq!(plain().transform_to_string(&dom, doc).unwrap(), expected);
}

#[test]
fn test_unrepresentable_attribute_character() {
    let mut dom = Dom::new();
    let doc = dom.parse("<a b=\"\u{20ac}\"/>").unwrap();
    let mut transformer = plain();
    transformer.set_encoding("ISO-8859-1");
    assert_eq!(
        transformer.transform_to_string(&dom, doc).unwrap(),
        r#"<a b="&#8364;"/>"#
    );
}

#[test]
fn test_text_method_on_subtree() {
    let mut dom = Dom::new();
    let doc = dom.parse("<doc><a>one</a><b>two</b></doc>").unwrap();
    let b = dom.last_child(dom.document_element(doc).unwrap()).unwrap();
    let transformer = Transformer::with_properties(OutputProperties {
        method: Method::Text,
        ..Default::default()
    });
    assert_eq!(transformer.transform_to_string(&dom, b).unwrap(), "two");
}

fn pretty(xml: &str) -> String {
    let mut dom = Dom::new();
    let doc = dom.parse(xml).unwrap();
    document_to_string_with(&dom, doc, true).unwrap()
}

#[test]
fn test_pretty_elements() {
    assert_snapshot!(pretty("<doc><a><b/></a><a><b/><b/></a></doc>"), @r###"
    <doc>
      <a>
        <b/>
      </a>
      <a>
        <b/>
        <b/>
      </a>
    </doc>
    "###);
}

#[test]
fn test_pretty_mixed() {
    assert_snapshot!(pretty("<doc><p>Hello <em>world</em>!</p><p>Bye</p></doc>"), @r###"
    <doc>
      <p>Hello <em>world</em>!</p>
      <p>Bye</p>
    </doc>
    "###);
}

#[test]
fn test_pretty_comments_and_processing_instructions() {
    assert_snapshot!(pretty("<!--top--><doc><a><!--hello--><?pi?></a></doc>"), @r###"
    <!--top-->
    <doc>
      <a>
        <!--hello-->
        <?pi?>
      </a>
    </doc>
    "###);
}

#[test]
fn test_pretty_space_preserve() {
    assert_snapshot!(pretty(r#"<doc><pre xml:space="preserve"><a><b/></a></pre></doc>"#), @r###"
    <doc>
      <pre xml:space="preserve"><a><b/></a></pre>
    </doc>
    "###);
}

#[test]
fn test_pretty_with_declaration_and_doctype() {
    let mut dom = Dom::new();
    let doc = dom.parse("<doc><a/></doc>").unwrap();
    let transformer = Transformer::with_properties(OutputProperties {
        indent: true,
        doctype_system: Some("doc.dtd".to_string()),
        ..Default::default()
    });
    assert_snapshot!(transformer.transform_to_string(&dom, doc).unwrap(), @r###"
    <?xml version="1.0" encoding="UTF-8"?>
    <!DOCTYPE doc SYSTEM "doc.dtd">
    <doc>
      <a/>
    </doc>
    "###);
}
