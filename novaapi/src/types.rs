//! Vendor code tables shared by requests and responses.

/// Gender of a business partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderType {
    Men = 1,
    Women = 2,
    /// Reserved by the interface for later use.
    Reserved = 3,
    Unknown = 4,
}

impl GenderType {
    /// The vendor code written into offer requests. Only men map to
    /// `MAENNLICH`; every other value is sent as `WEIBLICH`.
    pub fn as_vendor(self) -> &'static str {
        match self {
            GenderType::Men => "MAENNLICH",
            _ => "WEIBLICH",
        }
    }

    /// Maps the vendor code of a partner response. Anything other than
    /// `MAENNLICH` counts as women, absent values included.
    pub fn from_vendor(value: Option<&str>) -> GenderType {
        match value {
            Some("MAENNLICH") => GenderType::Men,
            _ => GenderType::Women,
        }
    }
}

/// Reason codes accepted by the after-sales refund offer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavReasonType {
    /// Return before the first day of validity (20 CHF fee).
    ReturnBeforeFirstValidity,
    /// Partly used (10 CHF fee).
    PartlyUsed,
}

impl SavReasonType {
    pub fn as_vendor(self) -> &'static str {
        match self {
            SavReasonType::ReturnBeforeFirstValidity => "RUECKGABE_VOR_1GELTUNGSTAG",
            SavReasonType::PartlyUsed => "TEILWEISE_BENUTZT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_vendor_codes() {
        assert_eq!(GenderType::Men.as_vendor(), "MAENNLICH");
        assert_eq!(GenderType::Women.as_vendor(), "WEIBLICH");
        assert_eq!(GenderType::Unknown.as_vendor(), "WEIBLICH");
    }

    #[test]
    fn gender_from_vendor_defaults_to_women() {
        assert_eq!(GenderType::from_vendor(Some("MAENNLICH")), GenderType::Men);
        assert_eq!(GenderType::from_vendor(Some("WEIBLICH")), GenderType::Women);
        assert_eq!(GenderType::from_vendor(None), GenderType::Women);
    }

    #[test]
    fn sav_reason_vendor_codes() {
        assert_eq!(
            SavReasonType::ReturnBeforeFirstValidity.as_vendor(),
            "RUECKGABE_VOR_1GELTUNGSTAG"
        );
        assert_eq!(SavReasonType::PartlyUsed.as_vendor(), "TEILWEISE_BENUTZT");
    }
}
