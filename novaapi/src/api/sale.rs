//! Turning offers into services and purchasing them.

use novaxml::XmlDocument;
use xmltree::{Element, XMLNode};

use super::{NovaApi, response_document, service_item_from_node};
use crate::error::Result;
use crate::models::{CreateServicesResult, PurchaseServicesResult};
use crate::params::{CreateServicesParams, PurchaseServicesParams};
use crate::soap::envelope::{client_identifier, correlation_context, text_element};

impl NovaApi {
    /// Accepts an offer, turning it into a service whose sale NOVA
    /// guarantees.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/offeriereLeistungen>
    pub async fn create_service(
        &self,
        params: &CreateServicesParams,
    ) -> Result<CreateServicesResult> {
        params.identifier.validate()?;

        let path = self.action().sales_service_path();
        let soap_action = self.action().soap_action("vertrieb", "offeriereLeistungen");
        let method = self.create_service_request(params);

        let doc = self.call(path, soap_action, method).await?;

        create_service_result(&doc)
    }

    fn create_service_request(&self, params: &CreateServicesParams) -> Element {
        let mut method = Element::new("offeriereLeistungen");
        self.action().apply_method_namespaces(&mut method);

        let mut request = Element::new("ns18:offertenRequest");
        request.attributes.insert(
            "ns18:transaktionsVerhalten".to_string(),
            "ROLLBACK_ON_ERROR".to_string(),
        );
        request
            .attributes
            .insert("ns18:fachlogLevel".to_string(), "OFF".to_string());

        request.children.push(XMLNode::Element(client_identifier(
            "ns18:",
            &params.identifier,
        )));
        request.children.push(XMLNode::Element(correlation_context(
            "ns18:",
            &params.identifier,
        )));

        let mut service = Element::new("ns18:leistungsRequest");
        service.attributes.insert(
            "ns18:angebotsId".to_string(),
            params.nova_offer_id.clone(),
        );
        service.attributes.insert(
            "ns18:externeLeistungsReferenzId".to_string(),
            String::new(),
        );
        service.attributes.insert(
            "ns18:externeReisendenReferenzId".to_string(),
            String::new(),
        );

        let mut traveller = Element::new("ns18:verkaufsParameter");
        traveller
            .attributes
            .insert("ns18:code".to_string(), "REISENDER".to_string());

        let mut value = Element::new("ns18:wert");
        value.children.push(XMLNode::Element(text_element(
            "vertriebsbase:tkid",
            &params.tk_id,
        )));
        traveller.children.push(XMLNode::Element(value));
        service.children.push(XMLNode::Element(traveller));
        request.children.push(XMLNode::Element(service));

        method.children.push(XMLNode::Element(request));

        method
    }

    /// Purchases a created service with the given payment information.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/kaufeLeistungen>
    pub async fn purchase_service(
        &self,
        params: &PurchaseServicesParams,
    ) -> Result<PurchaseServicesResult> {
        params.identifier.validate()?;

        let path = self.action().sales_service_path();
        let soap_action = self.action().soap_action("vertrieb", "kaufeLeistungen");
        let method = self.purchase_service_request(params);

        let doc = self.call(path, soap_action, method).await?;

        purchase_service_result(&doc)
    }

    fn purchase_service_request(&self, params: &PurchaseServicesParams) -> Element {
        let mut method = Element::new("ns18:kaufeLeistungen");
        self.action().apply_method_namespaces(&mut method);

        let mut request = Element::new("ns18:kaufRequest");
        request.attributes.insert(
            "ns18:transaktionsVerhalten".to_string(),
            "ROLLBACK_ON_ERROR".to_string(),
        );
        request
            .attributes
            .insert("ns18:fachlogLevel".to_string(), "OFF".to_string());

        request.children.push(XMLNode::Element(client_identifier(
            "ns18:",
            &params.identifier,
        )));
        request.children.push(XMLNode::Element(correlation_context(
            "ns18:",
            &params.identifier,
        )));

        let mut service = Element::new("ns18:leistungsKaufRequest");
        service.attributes.insert(
            "ns18:leistungsId".to_string(),
            params.nova_service_id.clone(),
        );

        let mut payment = Element::new("ns18:zahlungsInformation");
        payment.attributes.insert(
            "ns18:zahlungsArtCode".to_string(),
            params.payment_type_code.clone(),
        );
        payment.attributes.insert(
            "ns18:externeZahlungsReferenz".to_string(),
            String::new(),
        );

        let mut amount = Element::new("ns18:geldBetrag");
        amount
            .attributes
            .insert("base:betrag".to_string(), params.price.clone());
        amount
            .attributes
            .insert("base:waehrung".to_string(), params.currency.clone());
        payment.children.push(XMLNode::Element(amount));
        service.children.push(XMLNode::Element(payment));
        request.children.push(XMLNode::Element(service));

        method.children.push(XMLNode::Element(request));

        method
    }
}

fn create_service_result(doc: &XmlDocument) -> Result<CreateServicesResult> {
    let (doc, messages) = response_document(doc)?;
    let mut result = CreateServicesResult {
        messages,
        ..CreateServicesResult::default()
    };

    let response = doc.require_node("/Envelope/Body/offeriereLeistungenResponse", None)?;
    for node in doc.query_nodes("offertenResponse/leistung", Some(response))? {
        result.services.push(service_item_from_node(&doc, node)?);
    }

    Ok(result)
}

fn purchase_service_result(doc: &XmlDocument) -> Result<PurchaseServicesResult> {
    let (doc, messages) = response_document(doc)?;
    let mut result = PurchaseServicesResult {
        messages,
        ..PurchaseServicesResult::default()
    };

    let response = doc.require_node("/Envelope/Body/kaufeLeistungenResponse", None)?;
    for node in doc.query_nodes("kaufResponse/leistung", Some(response))? {
        result.services.push(service_item_from_node(&doc, node)?);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{identifier, leistung_xml, sales_envelope};
    use crate::config::NovaConfig;
    use crate::soap::envelope::serialize_document;

    fn api() -> NovaApi {
        let mut config = NovaConfig::default();
        config.default.base_url = Some("https://nova-int.sbb.ch".to_string());
        config.sso.client_id = "client".to_string();
        config.sso.client_secret = "secret".to_string();
        NovaApi::new(config.resolve().unwrap())
    }

    #[test]
    fn create_request_binds_the_offer_to_the_traveller() {
        let params = CreateServicesParams {
            identifier: identifier(),
            nova_offer_id: "_5c63dc7d-62e5-4f3a-a761-464488e92000".to_string(),
            tk_id: "949e2e6a-fdd1-4f07-8784-201e588ae834".to_string(),
            ..CreateServicesParams::default()
        };

        let method = api().create_service_request(&params);
        let doc = XmlDocument::parse(&serialize_document(&method)).unwrap();

        let request = doc.require_node("//ns18:offertenRequest", None).unwrap();
        assert_eq!(
            doc.require_attribute("@ns18:transaktionsVerhalten", Some(request))
                .unwrap(),
            "ROLLBACK_ON_ERROR"
        );
        assert_eq!(
            doc.require_attribute("ns18:leistungsRequest/@ns18:angebotsId", Some(request))
                .unwrap(),
            "_5c63dc7d-62e5-4f3a-a761-464488e92000"
        );
        assert_eq!(
            doc.require_attribute(
                "ns18:leistungsRequest/ns18:verkaufsParameter/@ns18:code",
                Some(request)
            )
            .unwrap(),
            "REISENDER"
        );
        assert_eq!(
            doc.require_node_text("//vertriebsbase:tkid", None).unwrap(),
            "949e2e6a-fdd1-4f07-8784-201e588ae834"
        );
    }

    #[test]
    fn purchase_request_carries_the_payment() {
        let params = PurchaseServicesParams {
            identifier: identifier(),
            nova_service_id: "15900011821804".to_string(),
            price: "105.00".to_string(),
            ..PurchaseServicesParams::default()
        };

        let method = api().purchase_service_request(&params);
        let doc = XmlDocument::parse(&serialize_document(&method)).unwrap();

        let service = doc
            .require_node(
                "/ns18:kaufeLeistungen/ns18:kaufRequest/ns18:leistungsKaufRequest",
                None,
            )
            .unwrap();
        assert_eq!(
            doc.require_attribute("@ns18:leistungsId", Some(service))
                .unwrap(),
            "15900011821804"
        );
        assert_eq!(
            doc.require_attribute(
                "ns18:zahlungsInformation/@ns18:zahlungsArtCode",
                Some(service)
            )
            .unwrap(),
            "BAR"
        );
        assert_eq!(
            doc.require_attribute(
                "ns18:zahlungsInformation/ns18:geldBetrag/@base:betrag",
                Some(service)
            )
            .unwrap(),
            "105.00"
        );
        assert_eq!(
            doc.require_attribute(
                "ns18:zahlungsInformation/ns18:geldBetrag/@base:waehrung",
                Some(service)
            )
            .unwrap(),
            "CHF"
        );
    }

    #[test]
    fn created_service_is_offered() {
        let body = format!(
            "<ns2:offeriereLeistungenResponse><ns2:offertenResponse>{}</ns2:offertenResponse></ns2:offeriereLeistungenResponse>",
            leistung_xml("OFFERIERT")
        );
        let doc = XmlDocument::parse(&sales_envelope(&body)).unwrap();

        let result = create_service_result(&doc).unwrap();
        assert_eq!(result.services.len(), 1);
        assert_eq!(result.services[0].service_id, "15900011821804");
        assert_eq!(result.services[0].service_status, "OFFERIERT");
        assert_eq!(
            result.services[0].tk_id,
            "949e2e6a-fdd1-4f07-8784-201e588ae834"
        );
    }

    #[test]
    fn purchased_service_is_sold() {
        let body = format!(
            "<ns2:kaufeLeistungenResponse><ns2:kaufResponse>{}</ns2:kaufResponse></ns2:kaufeLeistungenResponse>",
            leistung_xml("VERKAUFT")
        );
        let doc = XmlDocument::parse(&sales_envelope(&body)).unwrap();

        let result = purchase_service_result(&doc).unwrap();
        assert_eq!(result.services.len(), 1);
        assert_eq!(result.services[0].service_status, "VERKAUFT");
        assert_eq!(result.services[0].price, "105.00");
        assert_eq!(result.services[0].vat_percent, "7.70");
    }

    #[test]
    fn response_without_services_is_empty() {
        let doc = XmlDocument::parse(&sales_envelope(
            "<ns2:offeriereLeistungenResponse><ns2:offertenResponse/></ns2:offeriereLeistungenResponse>",
        ))
        .unwrap();

        let result = create_service_result(&doc).unwrap();
        assert!(result.services.is_empty());
    }
}
