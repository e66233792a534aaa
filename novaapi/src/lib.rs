//! # novaapi - NOVA remote sales client for Rust
//!
//! `novaapi` is a typed client library for the SOAP/XML interface of the
//! NOVA remote sales system, the railway ticketing backend behind
//! SwissPass subscriptions. It builds the XML request envelopes of the
//! remote operations, sends them over HTTP with OAuth2 bearer
//! authentication and parses the responses into typed results.
//!
//! ## Features
//!
//! - **Partner search**: Find customers by TKID, SwissPass card number
//!   or personal data
//! - **Sale flow**: Create offers, turn them into services, purchase
//!   them and produce the receipts
//! - **Service search**: List the services already sold to a customer
//! - **After-sales**: Request refund offers for sold services
//! - **SwissPass checks**: Validate a customer's SwissPass card
//! - **Shared OAuth2 session**: One client-credentials login serves all
//!   operations until it expires
//! - **Faithful error reporting**: Gateway faults and validation reports
//!   of the backend are decoded into readable error messages
//!
//! ## Quick start
//!
//! ```no_run
//! use novaapi::{NovaApiClient, NovaConfig, SearchPartnerParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config: NovaConfig = serde_json::from_str(
//!         r#"{
//!             "default": {"base_url": "https://nova-int-ws.sbb.ch"},
//!             "sso": {
//!                 "base_url": "https://sso-int.sbb.ch",
//!                 "client_id": "my-client",
//!                 "client_secret": "my-secret"
//!             }
//!         }"#,
//!     )?;
//!     let client = NovaApiClient::new(config)?;
//!
//!     let params = SearchPartnerParams {
//!         last_name: Some("Mustermann".to_string()),
//!         first_name: Some("Max".to_string()),
//!         ..SearchPartnerParams::default()
//!     };
//!
//!     for partner in client.search_partner(&params).await?.partners {
//!         println!("{} ({})", partner.tk_id, partner.ckm.unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## The sale flow
//!
//! A complete sale walks through four operations. Each step answers with
//! the identifiers the next one needs:
//!
//! ```no_run
//! use chrono::Utc;
//! use novaapi::{
//!     CreateOffersParams, CreateReceiptsParams, CreateServicesParams, NovaApiClient,
//!     PurchaseServicesParams,
//! };
//!
//! # async fn sale(client: &NovaApiClient, tk_id: &str) -> anyhow::Result<()> {
//! let mut offer_params = CreateOffersParams::new(Utc::now().date_naive());
//! offer_params.tk_id = Some(tk_id.to_string());
//! offer_params.travel_class = Some(2);
//!
//! let mut offers = client.create_offers(&offer_params).await?;
//! let Some(offer) = offers.offers.pop() else {
//!     anyhow::bail!("no offer available");
//! };
//!
//! let mut service_params = CreateServicesParams::default();
//! service_params.nova_offer_id = offer.nova_offer_id;
//! service_params.tk_id = tk_id.to_string();
//! let mut services = client.create_service(&service_params).await?;
//! let Some(service) = services.services.pop() else {
//!     anyhow::bail!("service not created");
//! };
//!
//! let mut purchase_params = PurchaseServicesParams::default();
//! purchase_params.nova_service_id = service.service_id.clone();
//! purchase_params.price = service.price.clone();
//! purchase_params.currency = service.currency.clone();
//! client.purchase_service(&purchase_params).await?;
//!
//! let mut receipt_params = CreateReceiptsParams::default();
//! receipt_params.nova_service_id = service.service_id.clone();
//! client.create_receipts(&receipt_params).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module structure
//!
//! ```text
//! novaapi/
//! ├── src/
//! │   ├── lib.rs              # Crate root (this file)
//! │   ├── client.rs           # NovaApiClient facade
//! │   ├── config.rs           # Endpoint and credential configuration
//! │   ├── session.rs          # OAuth2 session and SOAP transport
//! │   ├── api/                # One module per NOVA service area
//! │   ├── soap/               # SOAPAction values, namespaces, envelopes
//! │   ├── parser/             # Messages, faults, error normalization
//! │   ├── models.rs           # Result objects
//! │   ├── params.rs           # Operation parameter objects
//! │   ├── types.rs            # Vendor enumerations
//! │   └── error.rs            # Error type
//! ```
//!
//! The XML plumbing (document queries, namespace stripping, xs:dateTime
//! parsing) lives in the companion crate [`novaxml`].

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod parser;
pub mod session;
pub mod soap;
pub mod types;

pub use client::NovaApiClient;
pub use config::{NovaConfig, ResolvedConfig};
pub use error::{NovaError, Result};
pub use models::{
    CheckSwissPassValidityResult, ConfirmReceiptsResult, CreateOffersResult, CreateReceiptsResult,
    CreateServicesResult, NovaMessage, NovaOffer, NovaPartner, NovaSavOffer, NovaService,
    NovaServiceItem, PurchaseServicesResult, SavCreateOffersResult, SearchPartnerResult,
    SearchServicesResult,
};
pub use params::{
    CheckSwissPassValidityParams, ConfirmReceiptsParams, CreateOffersParams, CreateReceiptsParams,
    CreateServicesParams, PurchaseServicesParams, RequestIdentifier, SavCreateOffersParams,
    SearchPartnerParams, SearchServicesParams,
};
pub use types::{GenderType, SavReasonType};
