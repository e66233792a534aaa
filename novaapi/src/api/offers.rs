//! Zone plan based offer creation.

use novaxml::XmlDocument;
use novaxml::datetime::{end_of_day, parse_xs_datetime_local_date, start_of_day};
use xmltree::{Element, XMLNode};

use super::{NovaApi, response_document};
use crate::error::{NovaError, Result};
use crate::models::{CreateOffersResult, NovaOffer};
use crate::params::CreateOffersParams;
use crate::soap::envelope::{client_identifier, correlation_context, text_element};

impl NovaApi {
    /// Requests zone plan based offers for a single traveller, either
    /// identified by TKID or described anonymously.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/erstelleAngebote>
    pub async fn create_offers(&self, params: &CreateOffersParams) -> Result<CreateOffersResult> {
        params.identifier.validate()?;

        let path = self.action().sales_service_path();
        let soap_action = self.action().soap_action("vertrieb", "erstelleAngebote");
        let method = self.create_offers_request(params)?;

        let doc = self.call(path, soap_action, method).await?;

        create_offers_result(&doc)
    }

    fn create_offers_request(&self, params: &CreateOffersParams) -> Result<Element> {
        let mut method = Element::new("ns18:erstelleAngebote");
        self.action().apply_method_namespaces(&mut method);

        let mut request = Element::new("ns18:angebotsRequest");
        request.attributes.insert(
            "xmlns:xsi".to_string(),
            "http://www.w3.org/2001/XMLSchema-instance".to_string(),
        );
        request.attributes.insert(
            "xsi:type".to_string(),
            "ns18:ZonenplanBasierterAngebotsRequest".to_string(),
        );
        request.attributes.insert(
            "ns18:gueltigAbDatum".to_string(),
            params.valid_from.format("%Y-%m-%d").to_string(),
        );
        request.attributes.insert(
            "ns18:kundenSegmenteGruppieren".to_string(),
            "false".to_string(),
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
        request
            .children
            .push(XMLNode::Element(text_element("ns18:traegerMedium", "SWISSPASS")));
        request
            .children
            .push(XMLNode::Element(traveller_element(params)));
        request
            .children
            .push(XMLNode::Element(product_filter_element(params)));

        let travel_class = match params.travel_class {
            Some(1) => "KLASSE_1",
            Some(class) if class != 0 => "KLASSE_2",
            _ => return Err(NovaError::invalid_parameter("Travel class is required")),
        };
        request
            .children
            .push(XMLNode::Element(text_element("ns18:klasse", travel_class)));

        let mut zones = Element::new("ns18:zonenRequest");
        zones
            .attributes
            .insert("ns18:tarifOwner".to_string(), params.tariff_owner.clone());
        zones
            .children
            .push(XMLNode::Element(text_element("ns18:alleZonen", "true")));
        request.children.push(XMLNode::Element(zones));

        method.children.push(XMLNode::Element(request));

        Ok(method)
    }
}

fn traveller_element(params: &CreateOffersParams) -> Element {
    let mut traveller = Element::new("ns18:reisender");
    traveller.attributes.insert(
        "ns18:externeReisendenReferenzId".to_string(),
        "1".to_string(),
    );

    match params.tk_id.as_deref() {
        Some(tk_id) if !tk_id.is_empty() => {
            let mut with_tkid = Element::new("ns18:mitTkid");
            with_tkid
                .children
                .push(XMLNode::Element(text_element("ns18:tkid", tk_id)));
            with_tkid.children.push(XMLNode::Element(text_element(
                "ns18:ermaessigungsKarteCode",
                "KEINE_ERMAESSIGUNGSKARTE",
            )));
            traveller.children.push(XMLNode::Element(with_tkid));
        }
        _ => {
            let mut without_tkid = Element::new("ns18:ohneTkid");
            without_tkid
                .children
                .push(XMLNode::Element(text_element("ns18:reisendenTyp", "PERSON")));
            if let Some(gender) = params.gender {
                without_tkid.children.push(XMLNode::Element(text_element(
                    "ns18:geschlecht",
                    gender.as_vendor(),
                )));
            }
            if let Some(date) = params.date_of_birth {
                without_tkid.children.push(XMLNode::Element(text_element(
                    "ns18:geburtsTag",
                    &date.format("%Y-%m-%d").to_string(),
                )));
            }
            without_tkid.children.push(XMLNode::Element(text_element(
                "ns18:ermaessigungsKarteCode",
                "KEINE_ERMAESSIGUNGSKARTE",
            )));
            traveller.children.push(XMLNode::Element(without_tkid));
        }
    }

    traveller
}

fn product_filter_element(params: &CreateOffersParams) -> Element {
    let mut filter = Element::new("ns18:angebotsFilter");
    filter.attributes.insert(
        "xsi:type".to_string(),
        "vertriebsbase:ProduktNummerFilter".to_string(),
    );

    let product = params
        .nova_product_number
        .map(|number| number.to_string())
        .unwrap_or_default();
    filter
        .children
        .push(XMLNode::Element(text_element("vertriebsbase:produktNummer", &product)));

    filter
}

fn create_offers_result(doc: &XmlDocument) -> Result<CreateOffersResult> {
    let (doc, messages) = response_document(doc)?;
    let mut result = CreateOffersResult {
        messages,
        ..CreateOffersResult::default()
    };

    let response = doc.require_node("/Envelope/Body/erstelleAngeboteResponse", None)?;
    for node in doc.query_nodes("angebotsResponse/angebote/angebot", Some(response))? {
        result.offers.push(offer_from_node(&doc, node)?);
    }

    Ok(result)
}

fn offer_from_node(doc: &XmlDocument, node: &Element) -> Result<NovaOffer> {
    let offer_id = doc
        .find_attribute_value("@angebotsId", Some(node))?
        .unwrap_or_default();
    if offer_id.is_empty() {
        return Err(NovaError::missing_identifier("SBB-NOVA offer ID not found"));
    }

    // Tariff level, customer segment and validity unit combine into a
    // human readable title, e.g. "Alle Zonen, Erwachsene, Monate".
    let title_parts = [
        doc.require_attribute("nutzungsInfo/tarifStufe/tarifStufenText/@defaultWert", Some(node))?,
        doc.require_attribute(
            "produktEinflussFaktoren/kundenSegment/bezeichnung/@defaultWert",
            Some(node),
        )?,
        doc.require_attribute(
            "produktEinflussFaktoren/geltungsDauer/nutzungsGeltungsDauer/einheit/bezeichnung/@defaultWert",
            Some(node),
        )?,
    ];
    let title = title_parts
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
        .trim()
        .to_string();

    // The validity attributes carry the sender's local timezone; the
    // offer spans whole days of that calendar.
    let valid_from = doc.require_attribute(
        "nutzungsInfo/nutzungsZeitraum/ausweisbarerZeitraum/@von",
        Some(node),
    )?;
    let valid_to = doc.require_attribute(
        "nutzungsInfo/nutzungsZeitraum/ausweisbarerZeitraum/@bis",
        Some(node),
    )?;

    Ok(NovaOffer {
        nova_offer_id: offer_id,
        price: doc.require_attribute("verkaufsPreis/geldBetrag/@betrag", Some(node))?,
        currency: doc.require_attribute("verkaufsPreis/geldBetrag/@waehrung", Some(node))?,
        product_number: doc
            .find_attribute_value("@produktNummer", Some(node))?
            .unwrap_or_default(),
        title,
        valid_from: start_of_day(parse_xs_datetime_local_date(&valid_from)?),
        valid_to: end_of_day(parse_xs_datetime_local_date(&valid_to)?),
        carrier_medium: doc.require_attribute("produktEinflussFaktoren/@traegerMedium", Some(node))?,
        travel_class: doc.require_attribute("produktEinflussFaktoren/@klasse", Some(node))?,
    })
}
