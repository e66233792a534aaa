//! SOAP 1.1 envelope and common request fragments.

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::params::RequestIdentifier;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Wraps a method element into `soapenv:Envelope` with an empty header.
pub fn soap_envelope(method: Element) -> Element {
    let mut envelope = Element::new("soapenv:Envelope");
    envelope
        .attributes
        .insert("xmlns:soapenv".to_string(), SOAP_ENVELOPE_NS.to_string());

    envelope
        .children
        .push(XMLNode::Element(Element::new("soapenv:Header")));

    let mut body = Element::new("soapenv:Body");
    body.children.push(XMLNode::Element(method));
    envelope.children.push(XMLNode::Element(body));

    envelope
}

/// Serializes a request document with an XML declaration and two-space
/// indentation.
pub fn serialize_document(root: &Element) -> String {
    let config = EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");

    let mut buffer = Vec::new();
    if root.write_with_config(&mut buffer, config).is_err() {
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

/// An element with a single text child.
pub fn text_element(name: &str, value: &str) -> Element {
    let mut element = Element::new(name);
    element.children.push(XMLNode::Text(value.to_string()));
    element
}

/// Builds the `clientIdentifier` element carrying the caller identity.
///
/// The attribute names always live in the `base` namespace, the element
/// name takes the prefix of the surrounding method (colon included).
pub fn client_identifier(prefix: &str, identifier: &RequestIdentifier) -> Element {
    let mut element = Element::new(&format!("{prefix}clientIdentifier"));
    element.attributes.insert(
        "base:leistungsVermittler".to_string(),
        identifier.service_agent.clone(),
    );
    element.attributes.insert(
        "base:kanalCode".to_string(),
        identifier.channel_code.clone(),
    );
    element.attributes.insert(
        "base:verkaufsStelle".to_string(),
        identifier.point_of_sale.clone(),
    );
    element.attributes.insert(
        "base:vertriebsPunkt".to_string(),
        identifier.distribution_point.clone(),
    );
    element.attributes.insert(
        "base:verkaufsGeraeteId".to_string(),
        identifier.sale_device_id.clone(),
    );
    element
}

/// Builds the `correlationKontext` element with the correlation id.
pub fn correlation_context(prefix: &str, identifier: &RequestIdentifier) -> Element {
    let mut context = Element::new(&format!("{prefix}correlationKontext"));
    context.children.push(XMLNode::Element(text_element(
        "base:correlationId",
        &identifier.correlation_id,
    )));
    context
}

/// Appends one child element per set entry, in entry order.
///
/// Follows the NOVA search parameter convention: unset and empty values
/// are skipped, and the literal string `"0"` counts as unset too.
pub fn append_parameters(parent: &mut Element, prefix: &str, entries: &[(&str, Option<String>)]) {
    for (name, value) in entries {
        if let Some(value) = value {
            if value.is_empty() || value.as_str() == "0" {
                continue;
            }
            parent.children.push(XMLNode::Element(text_element(
                &format!("{prefix}{name}"),
                value,
            )));
        }
    }
}
