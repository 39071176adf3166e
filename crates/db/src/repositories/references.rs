//! Checks for references between workspace records.
//!
//! Records may only point at categories, customers, general taxes, invoices
//! and documents of their own workspace, and must respect the workspace
//! currency and tax settings.

use std::collections::BTreeSet;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use tally_shared::types::CurrencyCode;

use crate::entities::{categories, customers, documents, general_taxes, invoices, workspaces};
use crate::error::RepositoryError;

/// Rejects record currencies other than the default one unless the
/// workspace has multi-currency enabled.
///
/// # Errors
///
/// Returns [`RepositoryError::Validation`] if the currency is not allowed.
pub fn ensure_currency_allowed(
    workspace: &workspaces::Model,
    currency: &CurrencyCode,
) -> Result<(), RepositoryError> {
    if !workspace.multi_currency_enabled && currency.as_str() != workspace.default_currency {
        return Err(RepositoryError::Validation(format!(
            "Multi-currency is disabled for workspace {}: currency must be {}, got {}",
            workspace.id, workspace.default_currency, currency
        )));
    }
    Ok(())
}

/// Rejects blank names and titles.
///
/// # Errors
///
/// Returns [`RepositoryError::Validation`] if the value is empty after trimming.
pub fn ensure_not_blank(field: &str, value: &str) -> Result<(), RepositoryError> {
    if value.trim().is_empty() {
        return Err(RepositoryError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Rejects negative amounts.
///
/// # Errors
///
/// Returns [`RepositoryError::Validation`] if `value` is negative.
pub fn ensure_not_negative(field: &str, value: i64) -> Result<(), RepositoryError> {
    if value < 0 {
        return Err(RepositoryError::Validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Resolves the rate of the referenced general tax.
///
/// # Errors
///
/// Returns an error if tax is disabled for the workspace or the tax is not
/// found in it.
pub async fn general_tax_rate(
    db: &DatabaseConnection,
    workspace: &workspaces::Model,
    general_tax_id: Option<i64>,
) -> Result<Option<i32>, RepositoryError> {
    let Some(tax_id) = general_tax_id else {
        return Ok(None);
    };

    if !workspace.tax_enabled {
        return Err(RepositoryError::Validation(format!(
            "General tax is disabled for workspace {}",
            workspace.id
        )));
    }

    let tax = general_taxes::Entity::find_by_id(tax_id)
        .filter(general_taxes::Column::WorkspaceId.eq(workspace.id))
        .one(db)
        .await?
        .ok_or(RepositoryError::not_found("General tax", tax_id))?;

    Ok(Some(tax.rate_in_bps))
}

/// Ensures the category exists in the workspace.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if it does not.
pub async fn ensure_category(
    db: &DatabaseConnection,
    workspace_id: i64,
    category_id: Option<i64>,
) -> Result<(), RepositoryError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    categories::Entity::find_by_id(category_id)
        .filter(categories::Column::WorkspaceId.eq(workspace_id))
        .one(db)
        .await?
        .ok_or(RepositoryError::not_found("Category", category_id))?;
    Ok(())
}

/// Ensures the customer exists in the workspace.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if it does not.
pub async fn ensure_customer(
    db: &DatabaseConnection,
    workspace_id: i64,
    customer_id: i64,
) -> Result<(), RepositoryError> {
    customers::Entity::find_by_id(customer_id)
        .filter(customers::Column::WorkspaceId.eq(workspace_id))
        .one(db)
        .await?
        .ok_or(RepositoryError::not_found("Customer", customer_id))?;
    Ok(())
}

/// Ensures the linked invoice exists in the workspace.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if it does not.
pub async fn ensure_invoice(
    db: &DatabaseConnection,
    workspace_id: i64,
    invoice_id: Option<i64>,
) -> Result<(), RepositoryError> {
    let Some(invoice_id) = invoice_id else {
        return Ok(());
    };

    invoices::Entity::find_by_id(invoice_id)
        .filter(invoices::Column::WorkspaceId.eq(workspace_id))
        .one(db)
        .await?
        .ok_or(RepositoryError::not_found("Invoice", invoice_id))?;
    Ok(())
}

/// Ensures every attachment is a document of the workspace.
///
/// # Errors
///
/// Returns [`RepositoryError::DocumentsNotFound`] listing the missing ids
/// in ascending order.
pub async fn ensure_documents(
    db: &DatabaseConnection,
    workspace_id: i64,
    attachments: &[i64],
) -> Result<(), RepositoryError> {
    if attachments.is_empty() {
        return Ok(());
    }

    let requested: BTreeSet<i64> = attachments.iter().copied().collect();
    let found: BTreeSet<i64> = documents::Entity::find()
        .select_only()
        .column(documents::Column::Id)
        .filter(documents::Column::WorkspaceId.eq(workspace_id))
        .filter(documents::Column::Id.is_in(requested.iter().copied()))
        .into_tuple::<i64>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let missing = missing_ids(&requested, &found);
    if !missing.is_empty() {
        return Err(RepositoryError::DocumentsNotFound(missing));
    }
    Ok(())
}

fn missing_ids(requested: &BTreeSet<i64>, found: &BTreeSet<i64>) -> Vec<i64> {
    requested.difference(found).copied().collect()
}

/// Removes duplicate attachment ids, keeping the first occurrence.
#[must_use]
pub fn dedup_attachments(attachments: Vec<i64>) -> Vec<i64> {
    let mut seen = BTreeSet::new();
    attachments.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn workspace(multi_currency_enabled: bool) -> workspaces::Model {
        let now = Utc::now().into();
        workspaces::Model {
            id: 1,
            owner_id: 10,
            name: "Freelance".to_string(),
            default_currency: "EUR".to_string(),
            tax_enabled: true,
            multi_currency_enabled,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_default_currency_always_allowed() {
        let eur = CurrencyCode::parse("EUR").unwrap();
        assert!(ensure_currency_allowed(&workspace(false), &eur).is_ok());
        assert!(ensure_currency_allowed(&workspace(true), &eur).is_ok());
    }

    #[test]
    fn test_foreign_currency_requires_multi_currency() {
        let usd = CurrencyCode::parse("USD").unwrap();
        assert!(ensure_currency_allowed(&workspace(true), &usd).is_ok());

        let err = ensure_currency_allowed(&workspace(false), &usd).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Multi-currency is disabled for workspace 1: currency must be EUR, got USD"
        );
    }

    #[test]
    fn test_blank_and_negative_checks() {
        assert!(ensure_not_blank("title", "Rent").is_ok());
        assert!(ensure_not_blank("title", "   ").is_err());
        assert!(ensure_not_negative("amount", 0).is_ok());
        assert_eq!(
            ensure_not_negative("amount", -1).unwrap_err().to_string(),
            "amount must not be negative, got -1"
        );
    }

    #[test]
    fn test_missing_ids_sorted() {
        let requested = BTreeSet::from([5, 1, 3, 2]);
        let found = BTreeSet::from([3]);
        assert_eq!(missing_ids(&requested, &found), vec![1, 2, 5]);
    }

    #[test]
    fn test_dedup_attachments_keeps_order() {
        assert_eq!(dedup_attachments(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
