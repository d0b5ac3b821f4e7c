//! Zentrale Konfiguration der Tool-Engine.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Geometrie ───────────────────────────────────────────────────────

/// Standard-Linienbreite neuer Linien und Bögen in nm.
pub const DEFAULT_LINE_WIDTH: u64 = 150_000;
/// Toleranz (nm), innerhalb der neue Punkte auf bestehende Junctions einrasten.
/// 0 = nur exakt gleiche Koordinaten.
pub const JUNCTION_MERGE_TOLERANCE: u64 = 0;
/// Standard-Rasterabstand in nm (1.27 mm).
pub const GRID_SPACING: u64 = 1_270_000;

// ── Editor ──────────────────────────────────────────────────────────

/// Maximale Undo-Tiefe.
pub const HISTORY_DEPTH: usize = 200;
/// Layer, auf dem neue Geometrie ohne Host-Vorgabe landet.
pub const DEFAULT_WORK_LAYER: i32 = 0;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `eda_tool_engine.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorOptions {
    /// Linienbreite, die Zeichen-Tools beim Start übernehmen
    pub default_line_width: u64,
    /// Einrast-Toleranz für Junctions in nm
    #[serde(default = "default_junction_merge_tolerance")]
    pub junction_merge_tolerance: u64,
    /// Rasterabstand für Tastatur-Verschiebung und Spiegel-Zentren
    pub grid_spacing: u64,
    /// Maximale Anzahl Undo-Schritte
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Start-Layer des Interface-Adapters
    #[serde(default)]
    pub default_work_layer: i32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            default_line_width: DEFAULT_LINE_WIDTH,
            junction_merge_tolerance: JUNCTION_MERGE_TOLERANCE,
            grid_spacing: GRID_SPACING,
            history_depth: HISTORY_DEPTH,
            default_work_layer: DEFAULT_WORK_LAYER,
        }
    }
}

/// Serde-Default für `junction_merge_tolerance` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_junction_merge_tolerance() -> u64 {
    JUNCTION_MERGE_TOLERANCE
}

/// Serde-Default für `history_depth`.
fn default_history_depth() -> usize {
    HISTORY_DEPTH
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("eda_tool_engine"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("eda_tool_engine.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip_keeps_values() {
        let opts = EditorOptions {
            default_line_width: 200_000,
            junction_merge_tolerance: 10,
            ..EditorOptions::default()
        };
        let text = toml::to_string_pretty(&opts).expect("serialisierbar");
        let back: EditorOptions = toml::from_str(&text).expect("lesbar");
        assert_eq!(back, opts);
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let text = "default_line_width = 1000\ngrid_spacing = 500\n";
        let opts: EditorOptions = toml::from_str(text).expect("lesbar");
        assert_eq!(opts.junction_merge_tolerance, JUNCTION_MERGE_TOLERANCE);
        assert_eq!(opts.history_depth, HISTORY_DEPTH);
        assert_eq!(opts.default_work_layer, 0);
    }

    #[test]
    fn unreadable_file_yields_defaults() {
        let path = std::env::temp_dir().join("eda_tool_engine_does_not_exist.toml");
        assert_eq!(EditorOptions::load_from_file(&path), EditorOptions::default());
    }
}
