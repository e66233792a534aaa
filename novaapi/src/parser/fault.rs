//! SOAP fault extraction for failed requests.

use indexmap::IndexMap;
use novaxml::{XmlDocument, text_content};

use crate::error::Result;
use crate::parser::ErrorList;

/// Extracts the fault records of an error response document.
///
/// Handles two body shapes: Spring validation reports, which replace
/// everything collected so far, and gateway faults carrying an
/// `errorInfo` detail block with an optional nested XML response.
pub fn collect_fault_records(doc: &XmlDocument, mut errors: ErrorList) -> Result<ErrorList> {
    let doc = doc.without_namespaces();
    let content = doc.to_xml();

    if content.contains("ValidationError") {
        return validation_errors(&doc);
    }

    let fault = doc.require_node("/Envelope/Body/Fault", None)?;
    let fault_code = doc.require_node_text("faultcode", Some(fault))?;
    let fault_string = doc.require_node_text("faultstring", Some(fault))?;
    errors.push(fault_code, fault_string);

    let error_info = doc.require_node("detail/errorInfo", Some(fault))?;
    let error_code = doc.require_node_text("error-code", Some(error_info))?;
    let error_headers = doc.require_node_text("error-headers", Some(error_info))?;
    let error_message = doc.require_node_text("error-message", Some(error_info))?;
    let error_protocol_reason_phrase =
        doc.require_node_text("error-protocol-reason-phrase", Some(error_info))?;
    let error_protocol_response =
        doc.require_node_text("error-protocol-response", Some(error_info))?;
    let error_subcode = doc.require_node_text("error-subcode", Some(error_info))?;
    let input_ext_error = doc.require_node_text("input-ext-error", Some(error_info))?;
    let error_x_protocol_response =
        doc.require_node_text("error-x-protocol-response", Some(error_info))?;
    let response_content = doc.require_node_text("response-content", Some(error_info))?;

    let mut response_content_xml = None;
    let mut detail_message = None;

    // The gateway sometimes wraps the backend fault as XML in XML.
    if response_content.starts_with("<?xml") {
        let nested = XmlDocument::parse(&response_content)?.without_namespaces();
        response_content_xml = Some(nested.to_xml());

        let nested_faults = nested.query_nodes("/Envelope/Body/Fault", None)?;
        if nested_faults.len() == 1 {
            let nested_fault = nested_faults[0];
            let code = nested.require_node_text("faultcode", Some(nested_fault))?;
            let string = nested.require_node_text("faultstring", Some(nested_fault))?;
            let detail = nested.require_node_text("detail", Some(nested_fault))?;
            detail_message = Some(format!("{code} {string} {detail}"));
        }
    }

    let mut details = IndexMap::new();
    details.insert("error_headers".to_string(), error_headers);
    details.insert("error_message".to_string(), error_message.clone());
    details.insert(
        "error_protocol_reason_phrase".to_string(),
        error_protocol_reason_phrase,
    );
    details.insert(
        "error_protocol_response".to_string(),
        error_protocol_response,
    );
    details.insert("error_subcode".to_string(), error_subcode);
    details.insert("input_ext_error".to_string(), input_ext_error);
    details.insert(
        "error_x_protocol_response".to_string(),
        error_x_protocol_response,
    );
    details.insert("response_content".to_string(), response_content);
    if let Some(xml) = response_content_xml {
        details.insert("response_content_xml".to_string(), xml);
    }

    errors.push_with_details(
        error_code,
        detail_message.unwrap_or(error_message),
        details,
    );

    Ok(errors)
}

/// Spring validation reports: one record for the fault itself, one per
/// `ValidationError` element.
fn validation_errors(doc: &XmlDocument) -> Result<ErrorList> {
    let mut errors = ErrorList::new();

    let faults = doc.query_nodes("//Fault", None)?;
    let fault = match faults.first() {
        Some(fault) => *fault,
        None => return Ok(errors),
    };

    errors.push(
        doc.require_node_text("faultcode", Some(fault))?,
        doc.require_node_text("faultstring", Some(fault))?,
    );

    for node in doc.query_nodes("//ValidationError", None)? {
        errors.push(node.name.clone(), text_content(node));
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NovaError;
    use novaxml::XmlError;

    fn gateway_fault(response_content: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <soap:Fault>
      <faultcode>soap:Server</faultcode>
      <faultstring>Policy Falsified</faultstring>
      <detail>
        <errorInfo>
          <error-code>500</error-code>
          <error-headers>X-Backside-Transport: FAIL</error-headers>
          <error-message>Backend service failed</error-message>
          <error-protocol-reason-phrase>Internal Server Error</error-protocol-reason-phrase>
          <error-protocol-response>500</error-protocol-response>
          <error-subcode>0x0</error-subcode>
          <input-ext-error/>
          <error-x-protocol-response>500</error-x-protocol-response>
          <response-content>{response_content}</response-content>
        </errorInfo>
      </detail>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#
        )
    }

    #[test]
    fn gateway_fault_records() {
        let doc = XmlDocument::parse(&gateway_fault("plain text")).unwrap();
        let mut errors = ErrorList::new();
        errors.push("0", "Server error [500] boom");

        let errors = collect_fault_records(&doc, errors).unwrap();
        let records = errors.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].code, "soap:Server");
        assert_eq!(records[1].message, "Policy Falsified");
        assert_eq!(records[2].code, "500");
        assert_eq!(records[2].message, "Backend service failed");

        let details = records[2].details.as_ref().unwrap();
        let keys: Vec<&str> = details.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "error_headers",
                "error_message",
                "error_protocol_reason_phrase",
                "error_protocol_response",
                "error_subcode",
                "input_ext_error",
                "error_x_protocol_response",
                "response_content",
            ]
        );
        assert_eq!(details["error_headers"], "X-Backside-Transport: FAIL");
        assert_eq!(details["input_ext_error"], "");
    }

    #[test]
    fn nested_response_content_composes_the_message() {
        let nested = "&lt;?xml version=\"1.0\"?&gt;&lt;Envelope&gt;&lt;Body&gt;&lt;Fault&gt;\
&lt;faultcode&gt;ns:Client&lt;/faultcode&gt;\
&lt;faultstring&gt;Validation failed&lt;/faultstring&gt;\
&lt;detail&gt;missing tkid&lt;/detail&gt;\
&lt;/Fault&gt;&lt;/Body&gt;&lt;/Envelope&gt;";
        let doc = XmlDocument::parse(&gateway_fault(nested)).unwrap();

        let errors = collect_fault_records(&doc, ErrorList::new()).unwrap();
        let record = &errors.records()[1];
        assert_eq!(record.message, "ns:Client Validation failed missing tkid");

        let details = record.details.as_ref().unwrap();
        assert!(details.contains_key("response_content_xml"));
        assert!(details["response_content"].starts_with("<?xml"));
    }

    #[test]
    fn validation_report_replaces_collected_records() {
        let doc = XmlDocument::parse(
            r#"<Envelope><Body><Fault>
                 <faultcode>soap:Client</faultcode>
                 <faultstring>Validation error</faultstring>
                 <detail>
                   <ValidationError>tkid must not be null</ValidationError>
                   <ValidationError>korrelationId invalid</ValidationError>
                 </detail>
               </Fault></Body></Envelope>"#,
        )
        .unwrap();

        let mut errors = ErrorList::new();
        errors.push("0", "Server error [500] boom");

        let errors = collect_fault_records(&doc, errors).unwrap();
        let records = errors.records();
        // The transport record is discarded on this path.
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].message, "Validation error");
        assert_eq!(records[1].code, "ValidationError");
        assert_eq!(records[1].message, "tkid must not be null");
        assert_eq!(records[2].message, "korrelationId invalid");
    }

    #[test]
    fn missing_fault_node_is_an_error() {
        let doc = XmlDocument::parse("<Envelope><Body/></Envelope>").unwrap();
        let err = collect_fault_records(&doc, ErrorList::new()).unwrap_err();
        assert!(matches!(
            err,
            NovaError::Xml(XmlError::NodeNotFound { .. })
        ));
    }
}
