//! Request parameter types for the SOAP operations.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{NovaError, Result};
use crate::types::{GenderType, SavReasonType};

/// Default service agent, the TU code of the collecting agency.
pub const DEFAULT_SERVICE_AGENT: &str = "37";

/// Caller identification attached to every request.
///
/// Serialized as the `clientIdentifier` and `correlationKontext` elements
/// of each SOAP method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentifier {
    /// Correlation id for request tracing. Must be a UUID.
    pub correlation_id: String,
    /// TU code of the service agent (`leistungsVermittler`).
    pub service_agent: String,
    /// Sales channel code (`kanalCode`).
    pub channel_code: String,
    /// DiDok code of the point of sale, 5 digits without checksum,
    /// must belong to the service agent (`verkaufsStelle`).
    pub point_of_sale: String,
    /// Distribution point (`vertriebsPunkt`), same value as the point
    /// of sale.
    pub distribution_point: String,
    /// Sale device id, fixed value for statistics (`verkaufsGeraeteId`).
    pub sale_device_id: String,
}

impl Default for RequestIdentifier {
    fn default() -> Self {
        RequestIdentifier {
            correlation_id: Uuid::new_v4().to_string(),
            service_agent: DEFAULT_SERVICE_AGENT.to_string(),
            channel_code: String::new(),
            point_of_sale: String::new(),
            distribution_point: String::new(),
            sale_device_id: String::new(),
        }
    }
}

impl RequestIdentifier {
    /// Checks the identifier before a request is built.
    ///
    /// The correlation id must parse as a UUID and the distribution
    /// point must equal the point of sale.
    pub fn validate(&self) -> Result<()> {
        if Uuid::parse_str(&self.correlation_id).is_err() {
            return Err(NovaError::invalid_parameter(format!(
                "Correlation id [{}] is not a UUID",
                self.correlation_id
            )));
        }

        if self.distribution_point != self.point_of_sale {
            return Err(NovaError::invalid_parameter(
                "Distribution point must match the point of sale",
            ));
        }

        Ok(())
    }
}

/// Search criteria for `search_partner`. Unset fields are left out of
/// the request.
#[derive(Debug, Clone, Default)]
pub struct SearchPartnerParams {
    pub identifier: RequestIdentifier,
    /// NOVA / SBB customer id (TKID, a UUID).
    pub tk_id: Option<String>,
    /// SBB base card number, e.g. `GAQ577`.
    pub card_number: Option<String>,
    /// NOVA customer number (CKM).
    pub ckm: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub mail: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Street and house number in one field.
    pub street: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Parameters for `create_offers`.
#[derive(Debug, Clone)]
pub struct CreateOffersParams {
    pub identifier: RequestIdentifier,
    /// NOVA / SBB customer id. When set the offer is requested for the
    /// registered traveller, otherwise an anonymous traveller is sent.
    pub tk_id: Option<String>,
    /// NOVA product number the offer filter selects.
    pub nova_product_number: Option<u32>,
    /// Date of birth of an anonymous traveller.
    pub date_of_birth: Option<NaiveDate>,
    /// Gender of an anonymous traveller.
    pub gender: Option<GenderType>,
    /// Travel class, `1` or `2`. Required.
    pub travel_class: Option<u8>,
    /// First day of validity of the requested offer.
    pub valid_from: NaiveDate,
    /// Tariff owner, fixed `460` for TNW.
    pub tariff_owner: String,
}

impl CreateOffersParams {
    /// Parameters for an offer valid from the given day, with the
    /// default tariff owner.
    pub fn new(valid_from: NaiveDate) -> Self {
        CreateOffersParams {
            identifier: RequestIdentifier::default(),
            tk_id: None,
            nova_product_number: None,
            date_of_birth: None,
            gender: None,
            travel_class: None,
            valid_from,
            tariff_owner: "460".to_string(),
        }
    }
}

/// Parameters for `create_services`.
#[derive(Debug, Clone, Default)]
pub struct CreateServicesParams {
    pub identifier: RequestIdentifier,
    /// Offer id returned by `create_offers`.
    pub nova_offer_id: String,
    /// NOVA / SBB customer id of the traveller.
    pub tk_id: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub postal_code: String,
}

/// Parameters for `purchase_services`.
#[derive(Debug, Clone)]
pub struct PurchaseServicesParams {
    pub identifier: RequestIdentifier,
    /// Service id returned by `create_services`.
    pub nova_service_id: String,
    /// The article price, serialized verbatim.
    pub price: String,
    pub currency: String,
    /// Payment type code.
    ///
    /// Codes: UNBEKANNT; BAR; BON; MAE; FAK; DOS; DIN; AMX; JCB; VEG;
    /// VIS; PCD; YWD; MC; EC; MIG; ONE; REK; UAP
    pub payment_type_code: String,
}

impl Default for PurchaseServicesParams {
    fn default() -> Self {
        PurchaseServicesParams {
            identifier: RequestIdentifier::default(),
            nova_service_id: String::new(),
            price: String::new(),
            currency: "CHF".to_string(),
            payment_type_code: "BAR".to_string(),
        }
    }
}

/// Parameters for `create_receipts`.
#[derive(Debug, Clone, Default)]
pub struct CreateReceiptsParams {
    pub identifier: RequestIdentifier,
    pub nova_service_id: String,
}

/// Parameters for `confirm_receipts`.
#[derive(Debug, Clone, Default)]
pub struct ConfirmReceiptsParams {
    pub identifier: RequestIdentifier,
    pub nova_service_id: String,
}

/// Parameters for `search_services`.
#[derive(Debug, Clone, Default)]
pub struct SearchServicesParams {
    pub identifier: RequestIdentifier,
    /// NOVA / SBB customer id whose services are listed.
    pub tk_id: String,
}

/// Parameters for `check_swisspass_validity`.
#[derive(Debug, Clone, Default)]
pub struct CheckSwissPassValidityParams {
    pub identifier: RequestIdentifier,
    /// NOVA / SBB customer id of the SwissPass holder.
    pub tk_id: String,
}

/// Parameters for `sav_create_offers`.
#[derive(Debug, Clone, Default)]
pub struct SavCreateOffersParams {
    pub identifier: RequestIdentifier,
    /// Service id of the purchased service to refund.
    pub service_id: String,
    /// Refund reason. Carried for the caller's bookkeeping, the
    /// interface derives the fee itself.
    pub reason: Option<SavReasonType>,
}
