//! SwissPass card validity check.

use novaxml::XmlDocument;
use xmltree::{Element, XMLNode};

use super::{NovaApi, response_document};
use crate::error::Result;
use crate::models::CheckSwissPassValidityResult;
use crate::params::CheckSwissPassValidityParams;
use crate::soap::envelope::{client_identifier, correlation_context};

impl NovaApi {
    /// Checks whether the SwissPass card of a customer is valid, for
    /// example before loading a new service onto it.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/pruefeSwissPassGueltigkeit>
    pub async fn check_swisspass_validity(
        &self,
        params: &CheckSwissPassValidityParams,
    ) -> Result<CheckSwissPassValidityResult> {
        params.identifier.validate()?;

        let path = self.action().swisspass_service_path();
        let soap_action = self
            .action()
            .soap_action("swisspass", "pruefeSwissPassGueltigkeit");
        let method = self.check_validity_request(params);

        let doc = self.call(path, soap_action, method).await?;

        check_validity_result(&doc)
    }

    fn check_validity_request(&self, params: &CheckSwissPassValidityParams) -> Element {
        let mut method = Element::new("novasp-swisspass:pruefeSwissPassGueltigkeit");
        self.action().apply_method_namespaces(&mut method);

        method.attributes.insert(
            "novasp-swisspass:tkid".to_string(),
            params.tk_id.clone(),
        );

        method.children.push(XMLNode::Element(client_identifier(
            "novasp-swisspass:",
            &params.identifier,
        )));
        method.children.push(XMLNode::Element(correlation_context(
            "novasp-swisspass:",
            &params.identifier,
        )));

        method
    }
}

fn check_validity_result(doc: &XmlDocument) -> Result<CheckSwissPassValidityResult> {
    let (doc, messages) = response_document(doc)?;

    let response = doc.require_node("//pruefeSwissPassGueltigkeitResponse", None)?;

    Ok(CheckSwissPassValidityResult {
        result: doc
            .find_attribute_value("//@resultat", Some(response))?
            .unwrap_or_default(),
        status: doc
            .find_attribute_value("//@status", Some(response))?
            .unwrap_or_default(),
        messages,
    })
}
