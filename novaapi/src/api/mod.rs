//! SOAP method implementations for the NOVA services.
//!
//! Each submodule extends [`NovaApi`] with the calls of one service
//! area. The request builders mirror the element and attribute layout
//! the NOVA interface expects; the result mappers read the namespace
//! stripped response documents.

pub mod offers;
pub mod partner;
pub mod receipts;
pub mod sale;
pub mod sav;
pub mod services;
pub mod swisspass;

use novaxml::XmlDocument;
use tracing::debug;
use xmltree::Element;

use crate::config::ResolvedConfig;
use crate::error::{NovaError, Result};
use crate::models::{NovaMessage, NovaServiceItem};
use crate::parser::messages::find_nova_messages;
use crate::session::SessionManager;
use crate::soap::SoapAction;
use crate::soap::envelope::{serialize_document, soap_envelope};

/// Low-level SOAP transport shared by all method implementations.
#[derive(Debug)]
pub struct NovaApi {
    session: SessionManager,
    action: SoapAction,
}

impl NovaApi {
    pub fn new(config: ResolvedConfig) -> Self {
        let action = SoapAction::new(&config.version);

        Self {
            session: SessionManager::new(config),
            action,
        }
    }

    pub(crate) fn action(&self) -> &SoapAction {
        &self.action
    }

    /// Wraps a method element in a SOAP envelope, posts it to the given
    /// service path and parses the response document.
    pub(crate) async fn call(
        &self,
        path: String,
        soap_action: String,
        method: Element,
    ) -> Result<XmlDocument> {
        let envelope = serialize_document(&soap_envelope(method));
        let response = self.session.post_soap(&path, &soap_action, envelope).await?;

        debug!("SOAP response ({} bytes)", response.len());

        Ok(XmlDocument::parse(&response)?)
    }
}

/// Strips the response namespaces and collects the NOVA messages, the
/// common prologue of every result mapper.
pub(crate) fn response_document(doc: &XmlDocument) -> Result<(XmlDocument, Vec<NovaMessage>)> {
    let stripped = doc.without_namespaces();
    let messages = find_nova_messages(&stripped)?;

    Ok((stripped, messages))
}

/// Maps a `leistung` node to a service item. The offer, purchase and
/// receipt operations all answer with this structure.
pub(crate) fn service_item_from_node(doc: &XmlDocument, node: &Element) -> Result<NovaServiceItem> {
    let service_id = doc
        .find_attribute_value("@leistungsId", Some(node))?
        .unwrap_or_default();
    if service_id.is_empty() {
        return Err(NovaError::missing_identifier(
            "SBB-NOVA service ID not found",
        ));
    }

    Ok(NovaServiceItem {
        tk_id: doc.require_node_text("//tkid", Some(node))?,
        service_id,
        service_status: doc
            .find_attribute_value("@leistungsStatus", Some(node))?
            .unwrap_or_default(),
        service_reference: doc
            .find_attribute_value("@leistungsReferenz", Some(node))?
            .unwrap_or_default(),
        product_number: doc
            .find_attribute_value("@produktNummer", Some(node))?
            .unwrap_or_default(),
        price: doc.require_attribute("verkaufsPreis/geldBetrag/@betrag", Some(node))?,
        currency: doc.require_attribute("verkaufsPreis/geldBetrag/@waehrung", Some(node))?,
        vat_amount: doc.require_attribute("verkaufsPreis/mwstAnteil/@betrag", Some(node))?,
        vat_percent: doc.require_attribute("verkaufsPreis/mwstAnteil/@mwstSatz", Some(node))?,
    })
}
