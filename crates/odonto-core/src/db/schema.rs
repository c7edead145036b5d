//! SQLite schema definition.

/// Complete database schema for the clinic store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    document_id TEXT,                            -- CPF/RG
    contact_phone TEXT,
    contact_email TEXT,
    birth_date TEXT,                             -- YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(full_name);

-- ============================================================================
-- Clinical Records (anamnesis, certificates, exams)
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinical_records (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    type TEXT NOT NULL CHECK (type IN ('anamnesis', 'certificate', 'exam_upload')),
    title TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '{}',          -- JSON document
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_records_patient ON clinical_records(patient_id, created_at);

-- ============================================================================
-- Budgets
-- ============================================================================

CREATE TABLE IF NOT EXISTS budgets (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    number TEXT,
    status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'presented', 'approved', 'rejected')),
    total_value REAL NOT NULL DEFAULT 0,         -- computed client side, not authoritative
    items TEXT NOT NULL DEFAULT '[]',            -- JSON array of BudgetItem
    valid_until TEXT,
    conditions TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_budgets_patient ON budgets(patient_id, created_at);

-- ============================================================================
-- Text Presets (favorites)
-- ============================================================================

CREATE TABLE IF NOT EXISTS text_presets (
    id TEXT PRIMARY KEY,
    category TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_presets_category ON text_presets(category, created_at);
"#;
