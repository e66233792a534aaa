//! Extraction of NOVA business messages from response documents.

use novaxml::XmlDocument;

use crate::error::Result;
use crate::models::NovaMessage;

/// Namespace prefix pairs (message container, attribute) under which
/// responses have been observed to carry message lists.
const PREFIX_PAIRS: [(&str, &str); 5] = [
    ("", ""),
    ("ns13", "base"),
    ("ns1", "ns2"),
    ("xmlns", "base"),
    ("novasp-swisspass", "base"),
];

/// Collects every business message of a response document, scanning all
/// known prefix pairs in order.
///
/// Callers pass the namespace-stripped document; a prefixed pair only
/// applies while the document still declares its prefix.
pub fn find_nova_messages(doc: &XmlDocument) -> Result<Vec<NovaMessage>> {
    let mut messages = Vec::new();
    for (outer, inner) in PREFIX_PAIRS {
        append_messages(doc, outer, inner, &mut messages)?;
    }
    Ok(messages)
}

fn append_messages(
    doc: &XmlDocument,
    outer: &str,
    inner: &str,
    messages: &mut Vec<NovaMessage>,
) -> Result<()> {
    if !outer.is_empty() && !doc.namespace_declared(outer) {
        return Ok(());
    }

    let outer = qualify(outer);
    let inner = qualify(inner);

    let nodes = doc.query_nodes(&format!("//{outer}meldungen/{inner}meldung"), None)?;

    for node in nodes {
        let mut message = NovaMessage::default();

        message.code = attribute(doc, &format!("@{inner}meldungsCode"), node)?;
        // The message text lives in the first description element of the
        // whole document, not below the message node.
        message.message = attribute(
            doc,
            &format!("//{inner}beschreibung/@{inner}defaultWert"),
            node,
        )?;
        message.id = attribute(doc, &format!("@{inner}id"), node)?;
        message.message_type = attribute(doc, &format!("@{inner}typ"), node)?;
        message.timestamp = attribute(doc, &format!("@{inner}zeitStempel"), node)?;
        message.customer_relevant = attribute(doc, &format!("@{inner}endKundenRelevant"), node)?;

        messages.push(message);
    }

    Ok(())
}

fn qualify(prefix: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}:")
    }
}

/// Reads an attribute, treating empty values and the literal `"0"` as
/// absent.
fn attribute(
    doc: &XmlDocument,
    expr: &str,
    node: &xmltree::Element,
) -> Result<Option<String>> {
    Ok(doc
        .find_attribute_value(expr, Some(node))?
        .filter(|value| !value.is_empty() && value != "0"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_MESSAGES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Envelope>
  <Body>
    <erstelleAngeboteResponse>
      <angebotsResponse>
        <meldungen>
          <meldung id="M0" meldungsCode="33098" typ="WARNUNG"
                   zeitStempel="2019-09-05T13:40:28.000+02:00"
                   endKundenRelevant="false">
            <beschreibung defaultWert="Der Reisende 1 hat bereits einen SwissPass."/>
          </meldung>
        </meldungen>
      </angebotsResponse>
    </erstelleAngeboteResponse>
  </Body>
</Envelope>"#;

    #[test]
    fn extracts_unprefixed_messages() {
        let doc = XmlDocument::parse(WITH_MESSAGES).unwrap();
        let messages = find_nova_messages(&doc).unwrap();

        assert_eq!(messages.len(), 1);
        let message = &messages[0];
        assert_eq!(message.id.as_deref(), Some("M0"));
        assert_eq!(message.code.as_deref(), Some("33098"));
        assert_eq!(message.message_type.as_deref(), Some("WARNUNG"));
        assert_eq!(
            message.timestamp.as_deref(),
            Some("2019-09-05T13:40:28.000+02:00")
        );
        // endKundenRelevant="false" is kept verbatim, it is not empty.
        assert_eq!(message.customer_relevant.as_deref(), Some("false"));
        assert_eq!(
            message.message.as_deref(),
            Some("Der Reisende 1 hat bereits einen SwissPass.")
        );
    }

    #[test]
    fn no_messages_yields_an_empty_list() {
        let doc = XmlDocument::parse("<Envelope><Body/></Envelope>").unwrap();
        assert!(find_nova_messages(&doc).unwrap().is_empty());
    }

    #[test]
    fn empty_attributes_stay_unset() {
        let doc = XmlDocument::parse(
            r#"<r><meldungen><meldung id="" meldungsCode="0" typ="HINWEIS"/></meldungen></r>"#,
        )
        .unwrap();
        let messages = find_nova_messages(&doc).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, None);
        // "0" counts as unset, like an empty value.
        assert_eq!(messages[0].code, None);
        assert_eq!(messages[0].message_type.as_deref(), Some("HINWEIS"));
    }

    #[test]
    fn prefixed_pairs_require_a_declared_prefix() {
        let doc = XmlDocument::parse(
            r#"<r xmlns:ns1="urn:a" xmlns:ns2="urn:b"><ns1:meldungen><ns2:meldung ns2:meldungsCode="5"/></ns1:meldungen></r>"#,
        )
        .unwrap();
        let messages = find_nova_messages(&doc).unwrap();
        // Only the declared ns1/ns2 pair matches; the ns13 and swisspass
        // pairs are skipped without error.
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code.as_deref(), Some("5"));
    }

    #[test]
    fn declared_prefix_pair_is_scanned() {
        let doc = XmlDocument::parse(
            r#"<r xmlns:ns13="urn:a" xmlns:base="urn:b"><ns13:meldungen><base:meldung base:meldungsCode="77"/></ns13:meldungen></r>"#,
        )
        .unwrap();
        let messages = find_nova_messages(&doc).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code.as_deref(), Some("77"));
    }
}
