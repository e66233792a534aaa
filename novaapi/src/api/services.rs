//! Search of previously sold services.

use novaxml::XmlDocument;
use novaxml::datetime::parse_xs_datetime;
use xmltree::{Element, XMLNode};

use super::{NovaApi, response_document};
use crate::error::Result;
use crate::models::{NovaService, SearchServicesResult};
use crate::params::SearchServicesParams;
use crate::soap::envelope::{client_identifier, correlation_context, text_element};

impl NovaApi {
    /// Searches the services sold to a customer, identified by TKID.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/sucheLeistungen>
    pub async fn search_services(
        &self,
        params: &SearchServicesParams,
    ) -> Result<SearchServicesResult> {
        params.identifier.validate()?;

        // The method goes to the sales service, its SOAPAction however
        // names the partner system. The interface wants it this way.
        let path = self.action().sales_service_path();
        let soap_action = self
            .action()
            .soap_action("geschaeftspartner", "sucheLeistungen");
        let method = self.search_services_request(params);

        let doc = self.call(path, soap_action, method).await?;

        search_services_result(&doc)
    }

    fn search_services_request(&self, params: &SearchServicesParams) -> Element {
        let mut method = Element::new("sucheLeistungen");
        self.action().apply_method_namespaces(&mut method);

        let mut request = Element::new("leistungsSuchRequest");
        request.children.push(XMLNode::Element(client_identifier(
            "",
            &params.identifier,
        )));
        request.children.push(XMLNode::Element(correlation_context(
            "",
            &params.identifier,
        )));

        let mut service = Element::new("leistung");
        service
            .children
            .push(XMLNode::Element(text_element("tkid", &params.tk_id)));
        request.children.push(XMLNode::Element(service));

        method.children.push(XMLNode::Element(request));

        method
    }
}

fn search_services_result(doc: &XmlDocument) -> Result<SearchServicesResult> {
    let (doc, messages) = response_document(doc)?;
    let mut result = SearchServicesResult {
        messages,
        ..SearchServicesResult::default()
    };

    let response = doc.require_node(
        "/Envelope/Body/sucheLeistungenResponse/leistungsSuchResponse",
        None,
    )?;
    for node in doc.query_nodes("leistungsSuchErgebnis/leistung", Some(response))? {
        result.services.push(service_from_node(&doc, node)?);
    }

    Ok(result)
}

fn service_from_node(doc: &XmlDocument, node: &Element) -> Result<NovaService> {
    let valid_from = doc.require_attribute(
        "nutzungsInfo/nutzungsZeitraum/tarifierbarerZeitraum/@von",
        Some(node),
    )?;
    let valid_to = doc.require_attribute(
        "nutzungsInfo/nutzungsZeitraum/tarifierbarerZeitraum/@bis",
        Some(node),
    )?;

    let mut service = NovaService {
        tk_id: doc.find_node_text("verkaufsParameter/wert/tkid", Some(node))?,
        valid_from: parse_xs_datetime(&valid_from)?,
        valid_to: parse_xs_datetime(&valid_to)?,
        product_number: doc.find_attribute_value("@produktNummer", Some(node))?,
        zones: Vec::new(),
    };

    let all_zones = doc.find_attribute_value(
        "geltungsBereich/zonenGeltungsBereich/zonenBuendel/@alleZonen",
        Some(node),
    )?;
    if all_zones.as_deref() == Some("true") {
        service.zones.push("all".to_string());

        return Ok(service);
    }

    for zone in doc.query_nodes(
        "geltungsBereich/zonenGeltungsBereich/zonenBuendel/zonen",
        Some(node),
    )? {
        if let Some(code) = doc.find_node_text("code", Some(zone))? {
            service.zones.push(code);
        }
    }

    Ok(service)
}
