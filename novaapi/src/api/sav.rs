//! After-sales (SAV) refund offers.

use novaxml::XmlDocument;
use xmltree::{Element, XMLNode};

use super::{NovaApi, response_document};
use crate::error::{NovaError, Result};
use crate::models::{NovaSavOffer, SavCreateOffersResult};
use crate::params::SavCreateOffersParams;
use crate::soap::envelope::{client_identifier, correlation_context};

impl NovaApi {
    /// Requests refund offers for a sold service, the first step of the
    /// after-sales (SAV) flow.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/erstelleSAVAngebote>
    pub async fn create_sav_offers(
        &self,
        params: &SavCreateOffersParams,
    ) -> Result<SavCreateOffersResult> {
        params.identifier.validate()?;

        let path = self.action().sales_service_path();
        let soap_action = self.action().soap_action("vertrieb", "erstelleSAVAngebote");
        let method = self.create_sav_offers_request(params);

        let doc = self.call(path, soap_action, method).await?;

        create_sav_offers_result(&doc)
    }

    fn create_sav_offers_request(&self, params: &SavCreateOffersParams) -> Element {
        let mut method = Element::new("ns21:erstelleSAVAngebote");
        self.action().apply_sav_method_namespaces(&mut method);

        let mut request = Element::new("ns21:savRequest");
        request.attributes.insert(
            "xmlns:xsi".to_string(),
            "http://www.w3.org/2001/XMLSchema-instance".to_string(),
        );
        request.attributes.insert(
            "xsi:type".to_string(),
            "ns21:ErstattungsAngebotsRequest".to_string(),
        );
        request
            .attributes
            .insert("ns21:fachlogLevel".to_string(), "OFF".to_string());

        request.children.push(XMLNode::Element(client_identifier(
            "ns21:",
            &params.identifier,
        )));
        request.children.push(XMLNode::Element(correlation_context(
            "ns21:",
            &params.identifier,
        )));

        let mut refund = Element::new("ns21:zuErstattendeLeistung");
        refund
            .attributes
            .insert("ns21:leistungsId".to_string(), params.service_id.clone());
        // The refund reason is not part of the interface yet.
        request.children.push(XMLNode::Element(refund));

        method.children.push(XMLNode::Element(request));

        method
    }
}

fn create_sav_offers_result(doc: &XmlDocument) -> Result<SavCreateOffersResult> {
    let (doc, messages) = response_document(doc)?;
    let mut result = SavCreateOffersResult {
        messages,
        ..SavCreateOffersResult::default()
    };

    let response = doc.require_node("/Envelope/Body/erstelleSAVAngeboteResponse", None)?;
    for node in doc.query_nodes("angebotsResponse/angebote/angebot", Some(response))? {
        let offer_id = doc
            .find_attribute_value("@angebotsId", Some(node))?
            .unwrap_or_default();
        if offer_id.is_empty() {
            return Err(NovaError::missing_identifier(
                "SBB-NOVA SAV offer ID not found",
            ));
        }

        result.offers.push(NovaSavOffer {
            nova_offer_id: offer_id,
            tk_id: doc.find_node_text("//tkid", Some(node))?,
        });
    }

    Ok(result)
}
