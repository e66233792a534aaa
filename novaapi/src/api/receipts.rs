//! Receipt creation and print confirmation.

use novaxml::XmlDocument;
use xmltree::{Element, XMLNode};

use super::{NovaApi, response_document, service_item_from_node};
use crate::error::Result;
use crate::models::{ConfirmReceiptsResult, CreateReceiptsResult, NovaServiceItem};
use crate::params::{ConfirmReceiptsParams, CreateReceiptsParams, RequestIdentifier};
use crate::soap::envelope::{client_identifier, correlation_context, text_element};

impl NovaApi {
    /// Requests the print data (receipts) of a purchased service.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/erstelleBelege>
    pub async fn create_receipts(
        &self,
        params: &CreateReceiptsParams,
    ) -> Result<CreateReceiptsResult> {
        params.identifier.validate()?;

        let path = self.action().sales_service_path();
        let soap_action = self.action().soap_action("vertrieb", "erstelleBelege");
        let method = self.receipt_request(
            "erstelleBelege",
            &params.identifier,
            &params.nova_service_id,
        );

        let doc = self.call(path, soap_action, method).await?;

        let (doc, messages) = response_document(&doc)?;
        Ok(CreateReceiptsResult {
            services: receipt_services(&doc, "/Envelope/Body/erstelleBelegeResponse")?,
            messages,
        })
    }

    /// Confirms that the receipts of a service have been printed, which
    /// completes the production of the service.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/bestaetigeBelegErstellung>
    pub async fn confirm_receipts(
        &self,
        params: &ConfirmReceiptsParams,
    ) -> Result<ConfirmReceiptsResult> {
        params.identifier.validate()?;

        let path = self.action().sales_service_path();
        let soap_action = self
            .action()
            .soap_action("vertrieb", "bestaetigeBelegErstellung");
        let method = self.receipt_request(
            "bestaetigeBelegErstellung",
            &params.identifier,
            &params.nova_service_id,
        );

        let doc = self.call(path, soap_action, method).await?;

        let (doc, messages) = response_document(&doc)?;
        Ok(ConfirmReceiptsResult {
            services: receipt_services(&doc, "/Envelope/Body/bestaetigeBelegErstellungResponse")?,
            messages,
        })
    }

    /// Both receipt operations send the same `belegRequest` payload,
    /// they differ only in the method element.
    fn receipt_request(
        &self,
        method_name: &str,
        identifier: &RequestIdentifier,
        nova_service_id: &str,
    ) -> Element {
        let mut method = Element::new(method_name);
        self.action().apply_method_namespaces(&mut method);

        let mut request = Element::new("ns18:belegRequest");
        request.attributes.insert(
            "ns18:transaktionsVerhalten".to_string(),
            "ROLLBACK_ON_ERROR".to_string(),
        );
        request
            .attributes
            .insert("ns18:fachlogLevel".to_string(), "OFF".to_string());

        request.children.push(XMLNode::Element(client_identifier(
            "ns18:",
            identifier,
        )));
        request.children.push(XMLNode::Element(correlation_context(
            "ns18:",
            identifier,
        )));
        request.children.push(XMLNode::Element(text_element(
            "ns18:leistungsId",
            nova_service_id,
        )));

        method.children.push(XMLNode::Element(request));

        method
    }
}

fn receipt_services(doc: &XmlDocument, response_path: &str) -> Result<Vec<NovaServiceItem>> {
    let response = doc.require_node(response_path, None)?;
    let mut services = Vec::new();
    for node in doc.query_nodes("belegResponse/leistungsDruckDaten/leistung", Some(response))? {
        services.push(service_item_from_node(doc, node)?);
    }

    Ok(services)
}
