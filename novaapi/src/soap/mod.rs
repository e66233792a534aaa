//! SOAP plumbing: endpoint paths, SOAPAction URIs and the namespace
//! tables NOVA expects on each method element.

pub mod envelope;

use xmltree::Element;

/// Placeholder substituted with the configured interface version.
pub const VERSION_PLACEHOLDER: &str = "{novaVersion}";

/// Path of the sales service (`VertriebsService`).
pub const SALES_SERVICE_PATH: &str = "/novaan/vertrieb/public/{novaVersion}/VertriebsService";

/// Path of the SwissPass service.
pub const SWISSPASS_SERVICE_PATH: &str = "/novasp/swisspass/public/{novaVersion}/SwissPassService";

/// Path of the business partner service (`GeschaeftspartnerService`),
/// e.g. `https://nova-test-ws.sbb.ch/novagp/geschaeftspartner/public/v13/GeschaeftspartnerService`.
pub const BUSINESS_PARTNER_SERVICE_PATH: &str =
    "/novagp/geschaeftspartner/public/{novaVersion}/GeschaeftspartnerService";

/// Base of every NOVA service namespace.
const SERVICE_NAMESPACE_BASE: &str = "http://nova.voev.ch/services/{novaVersion}";

/// Builds versioned endpoint paths, namespace URIs and SOAPAction values.
#[derive(Debug, Clone)]
pub struct SoapAction {
    version: String,
}

impl SoapAction {
    pub fn new(version: &str) -> Self {
        SoapAction {
            version: version.to_string(),
        }
    }

    /// Replaces the version placeholder in a path or URI template.
    pub fn fill(&self, template: &str) -> String {
        template.replace(VERSION_PLACEHOLDER, &self.version)
    }

    pub fn sales_service_path(&self) -> String {
        self.fill(SALES_SERVICE_PATH)
    }

    pub fn swisspass_service_path(&self) -> String {
        self.fill(SWISSPASS_SERVICE_PATH)
    }

    pub fn business_partner_service_path(&self) -> String {
        self.fill(BUSINESS_PARTNER_SERVICE_PATH)
    }

    /// Namespace URI of a NOVA service, e.g. `vertrieb` or
    /// `vertrieb/vertriebsstammdaten`.
    pub fn service_namespace(&self, uri_path: &str) -> String {
        format!("{}/{}", self.fill(SERVICE_NAMESPACE_BASE), uri_path)
    }

    /// SOAPAction header value for a NOVA system (`vertrieb`,
    /// `geschaeftspartner`, `swisspass`) and method.
    pub fn soap_action(&self, nova_system: &str, soap_method: &str) -> String {
        format!(
            "{}/{}/{}",
            self.fill(SERVICE_NAMESPACE_BASE),
            nova_system,
            soap_method
        )
    }

    /// Declares the default namespace set on a SOAP method element.
    pub fn apply_method_namespaces(&self, method: &mut Element) {
        declare(
            method,
            "ns20",
            "http://nova.voev.ch/services/internal/leistungnotification".to_string(),
        );
        declare(method, "ns19", self.service_namespace("inkasso"));
        declare(method, "ns18", self.service_namespace("vertrieb"));
        declare(
            method,
            "nova-leistungnotiz",
            self.service_namespace("leistungnotiz"),
        );
        declare(method, "ns16", self.service_namespace("vertrag"));
        declare(method, "vertriebsbase", self.service_namespace("vertriebsbase"));
        declare(
            method,
            "ns14",
            "http://nova.voev.ch/services/internal".to_string(),
        );
        declare(
            method,
            "vs",
            self.service_namespace("vertrieb/vertriebsstammdaten"),
        );
        declare(
            method,
            "nova-protokoll",
            self.service_namespace("vertrieb/protokoll"),
        );
        declare(
            method,
            "nova-erneuerungsinfo",
            self.service_namespace("vertrieb/erneuerungsinfo"),
        );
        declare(
            method,
            "offlinemanagement",
            self.service_namespace("vertrieb/offlinemanagement"),
        );
        declare(
            method,
            "nova-monitoring",
            self.service_namespace("internal/monitoring"),
        );
        declare(
            method,
            "nova-preisauskunft",
            self.service_namespace("preisauskunft"),
        );
        declare(method, "base", self.service_namespace("base"));
        declare(method, "ns6", self.service_namespace("fachlichervertrag"));
        declare(
            method,
            "novasp-swisspass",
            self.service_namespace("vertragskonto"),
        );
        declare(
            method,
            "nova-vertragskonto",
            self.service_namespace("swisspass"),
        );
        // Redeclared by the interface definition, the second value wins.
        declare(
            method,
            "novasp-swisspass",
            self.service_namespace("swisspass"),
        );
        declare(method, "novagp", self.service_namespace("geschaeftspartner"));
        declare_default(method, self.service_namespace("vertrieb"));
        declare(method, "novavt-vertrag", self.service_namespace("vertragbase"));
    }

    /// Declares the namespace set of the after-sales (SAV) method
    /// element, which numbers the technical prefixes differently.
    pub fn apply_sav_method_namespaces(&self, method: &mut Element) {
        declare(
            method,
            "ns22",
            "http://nova.voev.ch/services/internal/leistungnotification".to_string(),
        );
        declare(method, "ns21", self.service_namespace("vertrieb"));
        declare(
            method,
            "nova-leistungnotiz",
            self.service_namespace("leistungnotiz"),
        );
        declare(method, "ns19", self.service_namespace("vertrag"));
        declare(method, "vertriebsbase", self.service_namespace("vertriebsbase"));
        declare(method, "ns17", self.service_namespace("internal"));
        declare(
            method,
            "vs",
            self.service_namespace("vertrieb/vertriebsstammdaten"),
        );
        declare(
            method,
            "nova-protokoll",
            self.service_namespace("vertrieb/protokoll"),
        );
        declare(
            method,
            "nova-erneuerungsinfo",
            self.service_namespace("vertrieb/erneuerungsinfo"),
        );
        declare(method, "ns13", self.service_namespace("kuko"));
        declare(
            method,
            "offlinemanagement",
            self.service_namespace("vertrieb/offlinemanagement"),
        );
        declare(
            method,
            "nova-monitoring",
            self.service_namespace("internal/monitoring"),
        );
        declare(
            method,
            "nova-preisauskunft",
            self.service_namespace("preisauskunft"),
        );
        declare(method, "base", self.service_namespace("base"));
        declare(method, "ns8", self.service_namespace("fachlichervertrag"));
        declare(method, "inkasso", self.service_namespace("inkasso"));
        declare(
            method,
            "nova-vertragskonto",
            self.service_namespace("vertragskonto"),
        );
        declare(
            method,
            "novasp-swisspass",
            self.service_namespace("swisspass"),
        );
        declare(method, "novakuko", self.service_namespace("kundeninteraktion"));
        declare(method, "novagp", self.service_namespace("geschaeftspartner"));
        declare_default(method, self.service_namespace("vertrieb"));
        declare(method, "novavt-vertrag", self.service_namespace("vertragbase"));
    }
}

fn declare(method: &mut Element, prefix: &str, uri: String) {
    method.attributes.insert(format!("xmlns:{prefix}"), uri);
}

fn declare_default(method: &mut Element, uri: String) {
    method.attributes.insert("xmlns".to_string(), uri);
}
