//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `favorites` table (one (user_id, item_id, item_type) per row)
/// - `list_entries` table (one (user_id, item_id, item_type) per row)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Favorites
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS favorites (
    id INTEGER PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    item_id TEXT NOT NULL,
    item_type TEXT NOT NULL CHECK (item_type IN ('anime', 'manga')),
    added_at TEXT NOT NULL, -- RFC3339
    UNIQUE(user_id, item_id, item_type)
);

CREATE INDEX IF NOT EXISTS idx_favorites_user_added ON favorites(user_id, added_at);

-- ---------------------------------------------------------------------------
-- List entries (watching/reading progress)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS list_entries (
    id INTEGER PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    item_id TEXT NOT NULL,
    item_type TEXT NOT NULL CHECK (item_type IN ('anime', 'manga')),
    status TEXT NOT NULL,
    progress INTEGER NOT NULL DEFAULT 0 CHECK (progress >= 0),
    rating INTEGER NULL CHECK (rating BETWEEN 1 AND 10),
    notes TEXT NULL,
    added_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL, -- RFC3339
    UNIQUE(user_id, item_id, item_type)
);

CREATE INDEX IF NOT EXISTS idx_list_entries_user_updated ON list_entries(user_id, updated_at);
CREATE INDEX IF NOT EXISTS idx_list_entries_user_type_status ON list_entries(user_id, item_type, status);
"#;
