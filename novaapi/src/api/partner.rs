//! Business partner (customer) search.

use novaxml::XmlDocument;
use novaxml::datetime::{parse_xs_date, parse_xs_datetime};
use xmltree::{Element, XMLNode};

use super::{NovaApi, response_document};
use crate::error::Result;
use crate::models::{NovaPartner, SearchPartnerResult};
use crate::params::SearchPartnerParams;
use crate::soap::envelope::{append_parameters, client_identifier, correlation_context};
use crate::types::GenderType;

impl NovaApi {
    /// Searches NOVA partners (customers) by TKID, SwissPass card or
    /// personal data.
    ///
    /// <https://confluence-ext.sbb.ch/display/NOVAUG/suchePartner>
    pub async fn search_partner(
        &self,
        params: &SearchPartnerParams,
    ) -> Result<SearchPartnerResult> {
        params.identifier.validate()?;

        let path = self.action().business_partner_service_path();
        let soap_action = self
            .action()
            .soap_action("geschaeftspartner", "suchePartner");
        let method = self.search_partner_request(params);

        let doc = self.call(path, soap_action, method).await?;

        search_partner_result(&doc)
    }

    fn search_partner_request(&self, params: &SearchPartnerParams) -> Element {
        let mut method = Element::new("novagp:suchePartner");
        self.action().apply_method_namespaces(&mut method);

        method.children.push(XMLNode::Element(client_identifier(
            "novagp:",
            &params.identifier,
        )));
        method.children.push(XMLNode::Element(correlation_context(
            "novagp:",
            &params.identifier,
        )));

        let mut search = Element::new("novagp:partnerSuchParameter");
        append_parameters(
            &mut search,
            "novagp:",
            &[
                ("tkid", params.tk_id.clone()),
                ("grundkartenNummer", params.card_number.clone()),
                ("ckm", params.ckm.clone()),
                ("name", params.last_name.clone()),
                ("vorname", params.first_name.clone()),
                ("mail", params.mail.clone()),
                ("land", params.country.clone()),
                ("ort", params.city.clone()),
                ("plz", params.postal_code.clone()),
                ("strasseHnr", params.street.clone()),
                (
                    "geburtsDatum",
                    params
                        .date_of_birth
                        .map(|date| date.format("%Y-%m-%d").to_string()),
                ),
            ],
        );
        search
            .children
            .push(XMLNode::Element(Element::new("novagp:pagingParameter")));
        method.children.push(XMLNode::Element(search));

        method
    }
}

fn search_partner_result(doc: &XmlDocument) -> Result<SearchPartnerResult> {
    let (doc, messages) = response_document(doc)?;
    let mut result = SearchPartnerResult {
        messages,
        ..SearchPartnerResult::default()
    };

    let response = doc.require_node("/Envelope/Body/suchePartnerResponse", None)?;
    for node in doc.query_nodes("partner", Some(response))? {
        result.partners.push(partner_from_node(&doc, node)?);
    }

    Ok(result)
}

fn partner_from_node(doc: &XmlDocument, node: &Element) -> Result<NovaPartner> {
    let mut partner = NovaPartner {
        tk_id: doc.require_attribute("@tkid", Some(node))?,
        ckm: doc.find_attribute_value("@ckm", Some(node))?,
        card_number: doc.find_attribute_value("@grundkartenNummer", Some(node))?,
        ..NovaPartner::default()
    };

    if let Some(changed) = doc.find_attribute_value("@mutDatum", Some(node))? {
        partner.changed_at = Some(parse_xs_datetime(&changed)?);
    }

    partner.last_name = doc.find_attribute_value("name/@name", Some(node))?;
    partner.first_name = doc.find_attribute_value("name/@vorname", Some(node))?;
    partner.title = doc.find_attribute_value("@titel", Some(node))?;

    if let Some(deceased) = doc.find_attribute_value("@verstorben", Some(node))? {
        partner.deceased = deceased != "false";
    }

    // Can be present but empty
    if let Some(date) = doc.find_attribute_value("@geburtsDatum", Some(node))? {
        if !date.is_empty() {
            partner.date_of_birth = Some(parse_xs_date(&date)?);
        }
    }

    let gender = doc.find_attribute_value("@geschlecht", Some(node))?;
    partner.gender = GenderType::from_vendor(gender.as_deref());

    // A partner may carry several addresses (postal, communication...),
    // only the first one is mapped.
    if let Some(address) = doc.find_node("sitz/adresse", Some(node))? {
        partner.country = doc.find_attribute_value("@land", Some(address))?;
        partner.city = doc.find_attribute_value("@ort", Some(address))?;
        partner.postal_code = doc.find_attribute_value("@plz", Some(address))?;
        partner.additional = doc.find_attribute_value("@adressZusatz", Some(address))?;
        partner.street = doc.find_attribute_value("@strasseHnr", Some(address))?;
        partner.po_box = doc.find_attribute_value("@postfach", Some(address))?;
    }

    if let Some(phone) = doc.find_attribute_value("festnetz/@formatiertE123", Some(node))? {
        partner.phone_number = Some(phone.replace(' ', ""));
    }
    if let Some(mobile) = doc.find_attribute_value("mobil/@formatiertE123", Some(node))? {
        partner.mobile_number = Some(mobile.replace(' ', ""));
    }

    if let Some(email) = doc.find_attribute_value("@email", Some(node))? {
        if plausible_email(&email) {
            partner.email = Some(email);
        }
    }

    Ok(partner)
}

/// Rough mailbox shape check for the `email` attribute.
fn plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::identifier;
    use crate::config::NovaConfig;
    use crate::soap::envelope::serialize_document;
    use chrono::NaiveDate;

    fn api() -> NovaApi {
        let mut config = NovaConfig::default();
        config.default.base_url = Some("https://nova-int.sbb.ch".to_string());
        config.sso.client_id = "client".to_string();
        config.sso.client_secret = "secret".to_string();
        NovaApi::new(config.resolve().unwrap())
    }

    fn parsed_request(params: &SearchPartnerParams) -> XmlDocument {
        let method = api().search_partner_request(params);
        XmlDocument::parse(&serialize_document(&method)).unwrap()
    }

    #[test]
    fn request_carries_identifier_and_search_values() {
        let params = SearchPartnerParams {
            identifier: identifier(),
            ckm: Some("164-937-314-5".to_string()),
            postal_code: Some("4133".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1982, 3, 28),
            ..SearchPartnerParams::default()
        };
        let doc = parsed_request(&params);

        assert_eq!(
            doc.require_attribute(
                "//novagp:clientIdentifier/@base:leistungsVermittler",
                None
            )
            .unwrap(),
            "00"
        );
        assert_eq!(
            doc.require_node_text("//novagp:correlationKontext/base:correlationId", None)
                .unwrap(),
            "101563d5-f3c4-4723-888b-6ea4bf321c32"
        );
        assert_eq!(
            doc.require_node_text("//novagp:partnerSuchParameter/novagp:ckm", None)
                .unwrap(),
            "164-937-314-5"
        );
        assert_eq!(
            doc.require_node_text("//novagp:geburtsDatum", None).unwrap(),
            "1982-03-28"
        );
        assert!(
            doc.find_node("//novagp:partnerSuchParameter/novagp:pagingParameter", None)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn unset_search_values_are_left_out() {
        let params = SearchPartnerParams {
            identifier: identifier(),
            tk_id: Some("949e2e6a-fdd1-4f07-8784-201e588ae834".to_string()),
            city: Some(String::new()),
            ..SearchPartnerParams::default()
        };
        let doc = parsed_request(&params);

        assert!(doc.find_node("//novagp:tkid", None).unwrap().is_some());
        assert!(doc.find_node("//novagp:ort", None).unwrap().is_none());
        assert!(doc.find_node("//novagp:name", None).unwrap().is_none());
    }

    const PARTNER_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <ns2:suchePartnerResponse xmlns:ns2="http://nova.voev.ch/services/v14/geschaeftspartner" xmlns:base="http://nova.voev.ch/services/v14/base">
      <ns2:partner base:tkid="949e2e6a-fdd1-4f07-8784-201e588ae834" base:ckm="164-937-314-5" base:grundkartenNummer="DAW856" base:mutDatum="2019-09-02T10:13:28.000+02:00" base:geburtsDatum="1982-03-28" base:geschlecht="MAENNLICH" base:email="max.mustermann@example.com" base:verstorben="false">
        <base:name base:name="Mustermann" base:vorname="Max"/>
        <base:sitz>
          <base:adresse base:land="CH" base:ort="Pratteln" base:plz="4133" base:strasseHnr="Bahnhofstrasse 1" base:postfach="1234"/>
        </base:sitz>
        <base:festnetz base:formatiertE123="+41 61 233 09 75"/>
        <base:mobil base:formatiertE123="+41 79 233 09 76"/>
      </ns2:partner>
    </ns2:suchePartnerResponse>
  </soap:Body>
</soap:Envelope>"#;

    #[test]
    fn maps_the_partner_fields() {
        let doc = XmlDocument::parse(PARTNER_RESPONSE).unwrap();
        let result = search_partner_result(&doc).unwrap();

        assert_eq!(result.partners.len(), 1);
        let partner = &result.partners[0];

        assert_eq!(partner.tk_id, "949e2e6a-fdd1-4f07-8784-201e588ae834");
        assert_eq!(partner.ckm.as_deref(), Some("164-937-314-5"));
        assert_eq!(partner.card_number.as_deref(), Some("DAW856"));
        assert_eq!(
            partner.changed_at,
            Some(
                NaiveDate::from_ymd_opt(2019, 9, 2)
                    .unwrap()
                    .and_hms_opt(8, 13, 28)
                    .unwrap()
            )
        );
        assert_eq!(partner.last_name.as_deref(), Some("Mustermann"));
        assert_eq!(partner.first_name.as_deref(), Some("Max"));
        assert_eq!(partner.date_of_birth, NaiveDate::from_ymd_opt(1982, 3, 28));
        assert_eq!(partner.gender, GenderType::Men);
        assert!(!partner.deceased);
        assert_eq!(partner.country.as_deref(), Some("CH"));
        assert_eq!(partner.city.as_deref(), Some("Pratteln"));
        assert_eq!(partner.postal_code.as_deref(), Some("4133"));
        assert_eq!(partner.street.as_deref(), Some("Bahnhofstrasse 1"));
        assert_eq!(partner.po_box.as_deref(), Some("1234"));
        assert_eq!(partner.phone_number.as_deref(), Some("+41612330975"));
        assert_eq!(partner.mobile_number.as_deref(), Some("+41792330976"));
        assert_eq!(partner.email.as_deref(), Some("max.mustermann@example.com"));
        assert!(result.messages.is_empty());
    }

    #[test]
    fn response_without_partners_is_empty() {
        let doc = XmlDocument::parse(
            r#"<Envelope><Body><suchePartnerResponse/></Body></Envelope>"#,
        )
        .unwrap();

        let result = search_partner_result(&doc).unwrap();
        assert!(result.partners.is_empty());
    }

    #[test]
    fn implausible_email_is_dropped() {
        assert!(plausible_email("max.mustermann@example.com"));
        assert!(!plausible_email("unknown"));
        assert!(!plausible_email("x@nodot"));
        assert!(!plausible_email("a b@example.com"));
    }
}
