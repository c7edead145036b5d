//! Text preset database operations.

use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::Preset;
use crate::presets::{PresetBackend, PresetResult};

fn preset_from_row(row: &Row<'_>) -> rusqlite::Result<Preset> {
    Ok(Preset {
        id: row.get(0)?,
        category: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl Database {
    /// List presets of a category, oldest first.
    pub fn list_presets(&self, category: &str) -> DbResult<Vec<Preset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, content, created_at FROM text_presets \
             WHERE category = ? ORDER BY created_at ASC, rowid ASC",
        )?;

        let rows = stmt.query_map([category], preset_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a preset and return the stored row.
    pub fn insert_preset(&self, category: &str, content: &str) -> DbResult<Preset> {
        let preset = Preset::new(category.to_string(), content.to_string());

        self.conn.execute(
            "INSERT INTO text_presets (id, category, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![preset.id, preset.category, preset.content, preset.created_at],
        )?;
        tracing::debug!(preset_id = %preset.id, category, "Inserted preset");
        Ok(preset)
    }

    /// Delete a preset.
    pub fn delete_preset(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM text_presets WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

impl PresetBackend for Database {
    fn load_presets(&self, category: &str) -> PresetResult<Vec<Preset>> {
        Ok(self.list_presets(category)?)
    }

    fn create_preset(&self, category: &str, content: &str) -> PresetResult<Preset> {
        Ok(self.insert_preset(category, content)?)
    }

    fn remove_preset(&self, id: &str) -> PresetResult<()> {
        self.delete_preset(id)?;
        Ok(())
    }
}
