//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversion status stored on expenses and incomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "amounts_status")]
pub enum AmountsStatus {
    /// Converted amount not known yet.
    #[sea_orm(string_value = "PENDING_CONVERSION")]
    PendingConversion,
    /// Income taxable amount not known yet.
    #[sea_orm(string_value = "PENDING_CONVERSION_FOR_TAXATION_PURPOSES")]
    PendingConversionForTaxationPurposes,
    /// All amounts known.
    #[sea_orm(string_value = "FINALIZED")]
    Finalized,
}

impl From<tally_core::status::AmountsStatus> for AmountsStatus {
    fn from(status: tally_core::status::AmountsStatus) -> Self {
        use tally_core::status::AmountsStatus as Core;
        match status {
            Core::PendingConversion => Self::PendingConversion,
            Core::PendingConversionForTaxationPurposes => {
                Self::PendingConversionForTaxationPurposes
            }
            Core::Finalized => Self::Finalized,
        }
    }
}

impl From<AmountsStatus> for tally_core::status::AmountsStatus {
    fn from(status: AmountsStatus) -> Self {
        match status {
            AmountsStatus::PendingConversion => Self::PendingConversion,
            AmountsStatus::PendingConversionForTaxationPurposes => {
                Self::PendingConversionForTaxationPurposes
            }
            AmountsStatus::Finalized => Self::Finalized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tally_core::status::AmountsStatus as Core;

    #[rstest]
    #[case(Core::PendingConversion, "PENDING_CONVERSION")]
    #[case(
        Core::PendingConversionForTaxationPurposes,
        "PENDING_CONVERSION_FOR_TAXATION_PURPOSES"
    )]
    #[case(Core::Finalized, "FINALIZED")]
    fn test_status_maps_to_db_value(#[case] status: Core, #[case] value: &str) {
        let db_status = AmountsStatus::from(status);
        assert_eq!(db_status.to_value(), value);
        assert_eq!(Core::from(db_status), status);
        assert_eq!(status.as_str(), value);
    }
}
