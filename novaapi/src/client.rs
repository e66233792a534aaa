//! High level client for the NOVA remote sales system.
//!
//! Wraps the SOAP method implementations behind one typed facade with
//! shared authentication.

use tracing::info;

use crate::api::NovaApi;
use crate::config::NovaConfig;
use crate::error::Result;
use crate::models::*;
use crate::params::*;

/// Typed NOVA client.
///
/// One client holds one OAuth2 session which all operations share; the
/// session renews itself when it expires.
#[derive(Debug)]
pub struct NovaApiClient {
    api: NovaApi,
}

impl NovaApiClient {
    /// Creates a client from a configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use novaapi::{NovaApiClient, NovaConfig, SearchPartnerParams};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let config: NovaConfig = serde_json::from_str(
    ///         r#"{
    ///             "default": {"base_url": "https://nova-int-ws.sbb.ch"},
    ///             "sso": {
    ///                 "base_url": "https://sso-int.sbb.ch",
    ///                 "client_id": "my-client",
    ///                 "client_secret": "my-secret"
    ///             }
    ///         }"#,
    ///     )?;
    ///     let client = NovaApiClient::new(config)?;
    ///
    ///     let params = SearchPartnerParams {
    ///         last_name: Some("Mustermann".to_string()),
    ///         ..SearchPartnerParams::default()
    ///     };
    ///     let result = client.search_partner(&params).await?;
    ///     println!("found {} partners", result.partners.len());
    ///     Ok(())
    /// }
    /// ```
    pub fn new(config: NovaConfig) -> Result<Self> {
        let resolved = config.resolve()?;

        info!(
            "Creating NOVA client for {} (interface {})",
            resolved.webservice.base_url, resolved.version
        );

        Ok(Self {
            api: NovaApi::new(resolved),
        })
    }

    // ============ Partner ============

    /// Searches partners (customers) by TKID, SwissPass card or
    /// personal data.
    pub async fn search_partner(
        &self,
        params: &SearchPartnerParams,
    ) -> Result<SearchPartnerResult> {
        self.api.search_partner(params).await
    }

    /// Checks whether the SwissPass card of a customer is valid.
    pub async fn check_swisspass_validity(
        &self,
        params: &CheckSwissPassValidityParams,
    ) -> Result<CheckSwissPassValidityResult> {
        self.api.check_swisspass_validity(params).await
    }

    // ============ Sale flow ============

    /// Requests zone plan based offers for a traveller.
    pub async fn create_offers(&self, params: &CreateOffersParams) -> Result<CreateOffersResult> {
        self.api.create_offers(params).await
    }

    /// Accepts an offer, turning it into a guaranteed service.
    pub async fn create_service(
        &self,
        params: &CreateServicesParams,
    ) -> Result<CreateServicesResult> {
        self.api.create_service(params).await
    }

    /// Purchases a created service.
    pub async fn purchase_service(
        &self,
        params: &PurchaseServicesParams,
    ) -> Result<PurchaseServicesResult> {
        self.api.purchase_service(params).await
    }

    /// Requests the print data (receipts) of a purchased service.
    pub async fn create_receipts(
        &self,
        params: &CreateReceiptsParams,
    ) -> Result<CreateReceiptsResult> {
        self.api.create_receipts(params).await
    }

    /// Confirms the printing of the receipts, completing the sale.
    pub async fn confirm_receipts(
        &self,
        params: &ConfirmReceiptsParams,
    ) -> Result<ConfirmReceiptsResult> {
        self.api.confirm_receipts(params).await
    }

    // ============ Services ============

    /// Searches the services sold to a customer.
    pub async fn search_services(
        &self,
        params: &SearchServicesParams,
    ) -> Result<SearchServicesResult> {
        self.api.search_services(params).await
    }

    // ============ After-sales ============

    /// Requests refund offers for a sold service.
    pub async fn create_sav_offers(
        &self,
        params: &SavCreateOffersParams,
    ) -> Result<SavCreateOffersResult> {
        self.api.create_sav_offers(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_missing_credentials() {
        let err = NovaApiClient::new(NovaConfig::default()).unwrap_err();
        assert!(err.to_string().contains("client credentials"));
    }

    #[test]
    fn refuses_missing_base_url() {
        let mut config = NovaConfig::default();
        config.sso.client_id = "client".to_string();
        config.sso.client_secret = "secret".to_string();
        let err = NovaApiClient::new(config).unwrap_err();
        assert!(err.to_string().contains("No base URL configured"));
    }
}
