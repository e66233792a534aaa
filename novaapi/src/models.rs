//! Typed result models mapped from the SOAP responses.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::GenderType;

/// A business message attached to a response (`meldung` element).
///
/// NOVA reports warnings and hints this way even on successful calls,
/// for example when a traveller already holds a valid SwissPass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NovaMessage {
    pub id: Option<String>,
    pub code: Option<String>,
    pub timestamp: Option<String>,
    pub message_type: Option<String>,
    pub customer_relevant: Option<String>,
    pub message: Option<String>,
}

/// A business partner (customer) returned by `search_partner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovaPartner {
    /// NOVA / SBB customer id (TKID).
    pub tk_id: String,
    /// NOVA customer number.
    pub ckm: Option<String>,
    /// SBB base card number.
    pub card_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Additional address line.
    pub additional: Option<String>,
    pub street: Option<String>,
    pub po_box: Option<String>,
    /// Landline number, E.123 formatted with the spaces removed.
    pub phone_number: Option<String>,
    /// Mobile number, E.123 formatted with the spaces removed.
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: GenderType,
    pub deceased: bool,
    /// Last partner mutation, normalized to UTC.
    pub changed_at: Option<NaiveDateTime>,
}

impl Default for NovaPartner {
    fn default() -> Self {
        NovaPartner {
            tk_id: String::new(),
            ckm: None,
            card_number: None,
            country: None,
            city: None,
            postal_code: None,
            additional: None,
            street: None,
            po_box: None,
            phone_number: None,
            mobile_number: None,
            email: None,
            first_name: None,
            last_name: None,
            title: None,
            date_of_birth: None,
            gender: GenderType::Unknown,
            deceased: false,
            changed_at: None,
        }
    }
}

/// An offer returned by `create_offers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovaOffer {
    /// Offer id (UUID), consumed by `create_service`.
    pub nova_offer_id: String,
    pub price: String,
    pub currency: String,
    pub product_number: String,
    /// Display title joined from tariff level, customer segment and
    /// validity unit.
    pub title: String,
    /// First moment of validity, local date at 00:00:00.
    pub valid_from: NaiveDateTime,
    /// Last moment of validity, local date at 23:59:59.
    pub valid_to: NaiveDateTime,
    /// Carrier medium, e.g. `SWISSPASS`.
    pub carrier_medium: String,
    /// `KLASSE_1` or `KLASSE_2`.
    pub travel_class: String,
}

/// A service line item returned by the sale operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NovaServiceItem {
    /// NOVA / SBB customer id of the traveller.
    pub tk_id: String,
    /// Unique service id (`leistungsId`).
    pub service_id: String,
    /// Current status, e.g. `OFFERIERT` or `VERKAUFT`.
    pub service_status: String,
    /// Service reference number.
    pub service_reference: String,
    pub product_number: String,
    pub price: String,
    pub currency: String,
    pub vat_amount: String,
    pub vat_percent: String,
}

/// A purchased service returned by `search_services`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovaService {
    pub tk_id: Option<String>,
    /// Start of the tariffed period, normalized to UTC.
    pub valid_from: NaiveDateTime,
    /// End of the tariffed period, normalized to UTC.
    pub valid_to: NaiveDateTime,
    pub product_number: Option<String>,
    /// Zone codes the service is restricted to. The single entry `all`
    /// means the whole zone plan.
    pub zones: Vec<String>,
}

/// A refund offer returned by `create_sav_offers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NovaSavOffer {
    /// Offer id (UUID), consumed by `create_service`.
    pub nova_offer_id: String,
    pub tk_id: Option<String>,
}

/// Result of `search_partner`.
#[derive(Debug, Clone, Default)]
pub struct SearchPartnerResult {
    pub partners: Vec<NovaPartner>,
    pub messages: Vec<NovaMessage>,
}

/// Result of `create_offers`.
#[derive(Debug, Clone, Default)]
pub struct CreateOffersResult {
    pub offers: Vec<NovaOffer>,
    pub messages: Vec<NovaMessage>,
}

/// Result of `create_service`.
#[derive(Debug, Clone, Default)]
pub struct CreateServicesResult {
    pub services: Vec<NovaServiceItem>,
    pub messages: Vec<NovaMessage>,
}

/// Result of `purchase_service`.
#[derive(Debug, Clone, Default)]
pub struct PurchaseServicesResult {
    pub services: Vec<NovaServiceItem>,
    pub messages: Vec<NovaMessage>,
}

/// Result of `create_receipts`.
#[derive(Debug, Clone, Default)]
pub struct CreateReceiptsResult {
    pub services: Vec<NovaServiceItem>,
    pub messages: Vec<NovaMessage>,
}

/// Result of `confirm_receipts`.
#[derive(Debug, Clone, Default)]
pub struct ConfirmReceiptsResult {
    pub services: Vec<NovaServiceItem>,
    pub messages: Vec<NovaMessage>,
}

/// Result of `search_services`.
#[derive(Debug, Clone, Default)]
pub struct SearchServicesResult {
    pub services: Vec<NovaService>,
    pub messages: Vec<NovaMessage>,
}

/// Result of `check_swisspass_validity`.
///
/// `result` is one of:
///
/// * `SP_OK`: no new SwissPass is needed, the customer already has one
///   or a card order is in process.
/// * `SP_NICHT_OK_FOTO_OK`: a new SwissPass is needed, a valid photo is
///   already available.
/// * `SP_NICHT_OK_FOTO_NICHT_OK`: a new SwissPass is needed and a new
///   photo has to be provided.
/// * the empty string when NOVA does not answer the question.
#[derive(Debug, Clone, Default)]
pub struct CheckSwissPassValidityResult {
    pub result: String,
    /// `OK` or `NOK`.
    pub status: String,
    pub messages: Vec<NovaMessage>,
}

/// Result of `create_sav_offers`.
#[derive(Debug, Clone, Default)]
pub struct SavCreateOffersResult {
    pub offers: Vec<NovaSavOffer>,
    pub messages: Vec<NovaMessage>,
}
