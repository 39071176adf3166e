//! Initial database migration.
//!
//! Creates the workspace-scoped bookkeeping tables: workspaces, categories,
//! customers, general taxes, documents, expenses, incomes, invoices and
//! income tax payments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: WORKSPACES & REFERENCE DATA
        // ============================================================
        db.execute_unprepared(WORKSPACES_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(GENERAL_TAXES_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;

        // ============================================================
        // PART 3: FINANCIAL RECORDS
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INCOMES_SQL).await?;
        db.execute_unprepared(INCOME_TAX_PAYMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Conversion status of expenses and incomes
CREATE TYPE amounts_status AS ENUM (
    'PENDING_CONVERSION',
    'PENDING_CONVERSION_FOR_TAXATION_PURPOSES',
    'FINALIZED'
);
";

const WORKSPACES_SQL: &str = r"
CREATE TABLE workspaces (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL,
    name VARCHAR(255) NOT NULL,
    default_currency CHAR(3) NOT NULL,
    tax_enabled BOOLEAN NOT NULL DEFAULT false,
    multi_currency_enabled BOOLEAN NOT NULL DEFAULT false,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_default_currency_format CHECK (default_currency ~ '^[A-Z]{3}$')
);

CREATE INDEX idx_workspaces_owner ON workspaces(owner_id);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    income BOOLEAN NOT NULL DEFAULT true,
    expense BOOLEAN NOT NULL DEFAULT true,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_categories_workspace ON categories(workspace_id);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_customers_workspace ON customers(workspace_id);
";

const GENERAL_TAXES_SQL: &str = r"
CREATE TABLE general_taxes (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    rate_in_bps INTEGER NOT NULL,
    description TEXT,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_rate_in_bps CHECK (rate_in_bps BETWEEN 0 AND 10000)
);

CREATE INDEX idx_general_taxes_workspace ON general_taxes(workspace_id);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    mime_type VARCHAR(255) NOT NULL,
    size_in_bytes BIGINT NOT NULL,
    time_uploaded TIMESTAMPTZ NOT NULL DEFAULT now(),
    version BIGINT NOT NULL DEFAULT 0,
    CONSTRAINT chk_size_in_bytes CHECK (size_in_bytes >= 0)
);

CREATE INDEX idx_documents_workspace ON documents(workspace_id);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    category_id BIGINT REFERENCES categories(id),
    title VARCHAR(255) NOT NULL,
    date_paid DATE NOT NULL,
    time_recorded TIMESTAMPTZ NOT NULL DEFAULT now(),
    currency CHAR(3) NOT NULL,
    original_amount BIGINT NOT NULL,

    -- Amounts in workspace default currency
    converted_original_amount BIGINT,
    converted_adjusted_amount BIGINT,
    income_taxable_original_amount BIGINT,
    income_taxable_adjusted_amount BIGINT,
    use_different_exchange_rate_for_income_tax_purposes BOOLEAN NOT NULL DEFAULT false,
    percent_on_business INTEGER NOT NULL DEFAULT 100,

    -- General tax snapshot at calculation time
    general_tax_id BIGINT REFERENCES general_taxes(id),
    general_tax_rate_in_bps INTEGER,
    general_tax_amount BIGINT,

    status amounts_status NOT NULL,
    attachments BIGINT[] NOT NULL DEFAULT '{}',
    notes TEXT,
    version BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_expense_original_amount CHECK (original_amount >= 0),
    CONSTRAINT chk_expense_percent_on_business CHECK (percent_on_business BETWEEN 0 AND 100),
    CONSTRAINT chk_expense_converted_amounts CHECK (
        converted_adjusted_amount IS NULL OR converted_original_amount IS NOT NULL
    ),
    CONSTRAINT chk_expense_income_taxable_amounts CHECK (
        income_taxable_adjusted_amount IS NULL OR income_taxable_original_amount IS NOT NULL
    )
);

CREATE INDEX idx_expenses_workspace_date ON expenses(workspace_id, date_paid);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    customer_id BIGINT NOT NULL REFERENCES customers(id),
    title VARCHAR(255) NOT NULL,
    time_recorded TIMESTAMPTZ NOT NULL DEFAULT now(),
    date_issued DATE NOT NULL,
    date_sent DATE,
    date_paid DATE,
    date_cancelled DATE,
    due_date DATE NOT NULL,
    currency CHAR(3) NOT NULL,
    amount BIGINT NOT NULL,
    general_tax_id BIGINT REFERENCES general_taxes(id),
    attachments BIGINT[] NOT NULL DEFAULT '{}',
    notes TEXT,
    version BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoice_amount CHECK (amount >= 0)
);

CREATE INDEX idx_invoices_workspace_date ON invoices(workspace_id, date_issued);
";

const INCOMES_SQL: &str = r"
CREATE TABLE incomes (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    category_id BIGINT REFERENCES categories(id),
    title VARCHAR(255) NOT NULL,
    date_received DATE NOT NULL,
    time_recorded TIMESTAMPTZ NOT NULL DEFAULT now(),
    currency CHAR(3) NOT NULL,
    original_amount BIGINT NOT NULL,

    -- Amounts in workspace default currency
    converted_original_amount BIGINT,
    converted_adjusted_amount BIGINT,
    income_taxable_original_amount BIGINT,
    income_taxable_adjusted_amount BIGINT,
    use_different_exchange_rate_for_income_tax_purposes BOOLEAN NOT NULL DEFAULT false,

    -- General tax snapshot at calculation time
    general_tax_id BIGINT REFERENCES general_taxes(id),
    general_tax_rate_in_bps INTEGER,
    general_tax_amount BIGINT,

    linked_invoice_id BIGINT REFERENCES invoices(id),
    status amounts_status NOT NULL,
    attachments BIGINT[] NOT NULL DEFAULT '{}',
    notes TEXT,
    version BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_income_original_amount CHECK (original_amount >= 0),
    CONSTRAINT chk_income_converted_amounts CHECK (
        converted_adjusted_amount IS NULL OR converted_original_amount IS NOT NULL
    ),
    CONSTRAINT chk_income_income_taxable_amounts CHECK (
        income_taxable_adjusted_amount IS NULL OR income_taxable_original_amount IS NOT NULL
    )
);

CREATE INDEX idx_incomes_workspace_date ON incomes(workspace_id, date_received);
";

const INCOME_TAX_PAYMENTS_SQL: &str = r"
CREATE TABLE income_tax_payments (
    id BIGSERIAL PRIMARY KEY,
    workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    time_recorded TIMESTAMPTZ NOT NULL DEFAULT now(),
    date_paid DATE NOT NULL,
    reporting_date DATE NOT NULL,
    amount BIGINT NOT NULL,
    attachments BIGINT[] NOT NULL DEFAULT '{}',
    notes TEXT,
    version BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_income_tax_payment_amount CHECK (amount >= 0)
);

CREATE INDEX idx_income_tax_payments_reporting ON income_tax_payments(workspace_id, reporting_date);
";

const DROP_ALL_SQL: &str = r"
-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS income_tax_payments CASCADE;
DROP TABLE IF EXISTS incomes CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS general_taxes CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS workspaces CASCADE;

-- Drop enums
DROP TYPE IF EXISTS amounts_status CASCADE;
";
