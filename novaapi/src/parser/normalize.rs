//! Normalization of failed HTTP responses into error values.

use novaxml::XmlDocument;

use crate::error::{NovaError, Result};
use crate::parser::ErrorList;
use crate::parser::fault::collect_fault_records;

/// A non-success HTTP response captured for error reporting.
#[derive(Debug, Clone)]
pub struct HttpFailure {
    /// Numeric HTTP status code.
    pub status: u16,
    /// Transport-level description, e.g. `POST {url} resulted in a 500
    /// Internal Server Error response`.
    pub message: String,
    /// Raw response body.
    pub body: String,
}

/// Turns a failed response into the error the caller sees.
///
/// Collects a numbered record list: a class record for 4xx/5xx
/// statuses, the SOAP fault records when a 5xx body carries XML, and
/// the transport message itself. Status 401 maps to [`NovaError::Unauthorized`],
/// everything else to [`NovaError::RemoteOperation`].
pub fn failure_to_error(failure: &HttpFailure) -> NovaError {
    let errors = match error_list_for(failure) {
        Ok(errors) => errors,
        Err(err) => return err,
    };

    let message = errors.render();
    if failure.status == 401 {
        NovaError::Unauthorized { message }
    } else {
        NovaError::RemoteOperation {
            status: failure.status,
            message,
        }
    }
}

fn error_list_for(failure: &HttpFailure) -> Result<ErrorList> {
    let mut errors = ErrorList::new();

    if (400..500).contains(&failure.status) {
        errors.push(
            "0",
            format!("Client error [{}] {}", failure.status, failure.message),
        );
    }
    if (500..600).contains(&failure.status) {
        errors.push(
            "0",
            format!("Server error [{}] {}", failure.status, failure.message),
        );
        if failure.body.starts_with("<?xml") || failure.body.starts_with("<SOAP") {
            let doc = XmlDocument::parse(&failure.body)?;
            errors = collect_fault_records(&doc, errors)?;
        }
    }

    errors.push(failure.status.to_string(), failure.message.clone());
    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: u16, body: &str) -> HttpFailure {
        HttpFailure {
            status,
            message: format!(
                "POST https://nova-int.sbb.ch/x resulted in a {status} response"
            ),
            body: body.to_string(),
        }
    }

    #[test]
    fn client_errors_get_a_class_record() {
        let err = failure_to_error(&failure(404, ""));
        match err {
            NovaError::RemoteOperation { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(
                    message,
                    "1. Client error [404] POST https://nova-int.sbb.ch/x resulted in a 404 response\n\
                     2. POST https://nova-int.sbb.ch/x resulted in a 404 response"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_401_maps_to_unauthorized() {
        let err = failure_to_error(&failure(401, ""));
        assert!(matches!(err, NovaError::Unauthorized { .. }));
    }

    #[test]
    fn server_error_with_xml_body_collects_fault_records() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <soap:Fault>
      <faultcode>soap:Server</faultcode>
      <faultstring>Policy Falsified</faultstring>
      <detail>
        <errorInfo>
          <error-code>500</error-code>
          <error-headers>none</error-headers>
          <error-message>Backend service failed</error-message>
          <error-protocol-reason-phrase>Internal Server Error</error-protocol-reason-phrase>
          <error-protocol-response>500</error-protocol-response>
          <error-subcode>0x0</error-subcode>
          <input-ext-error/>
          <error-x-protocol-response>500</error-x-protocol-response>
          <response-content>backend down</response-content>
        </errorInfo>
      </detail>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#;

        let err = failure_to_error(&failure(500, body));
        match err {
            NovaError::RemoteOperation { status, message } => {
                assert_eq!(status, 500);
                let lines: Vec<&str> = message.lines().collect();
                assert_eq!(lines.len(), 4);
                assert!(lines[0].starts_with("1. Server error [500]"));
                assert_eq!(lines[1], "2. Policy Falsified");
                assert_eq!(lines[2], "3. Backend service failed");
                assert!(lines[3].starts_with("4. POST"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_xml_server_body_is_ignored() {
        let err = failure_to_error(&failure(503, "upstream connect error"));
        match err {
            NovaError::RemoteOperation { message, .. } => {
                assert!(message.starts_with("1. Server error [503]"));
                assert_eq!(message.lines().count(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unextractable_fault_surfaces_the_xml_error() {
        let err = failure_to_error(&failure(500, "<?xml version=\"1.0\"?><Envelope><Body/></Envelope>"));
        assert!(matches!(err, NovaError::Xml(_)));
    }
}
