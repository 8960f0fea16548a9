//! Asset snapshot reader.
//!
//! Columns are matched by header name, so extra columns are ignored and the
//! order in the file does not matter. Blank cells are missing values. A row
//! whose id is blank, or whose numeric cells do not parse, is skipped and
//! reported with its line number; the rest of the file still loads. A
//! repeated id loads too, with a warning pointing at its first line.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use frag_core::{AssetRecord, ConditionCode, ConditionCodes, LoadDiagnostics, Material};
use tracing::{info, warn};

pub const ID_COLUMN: &str = "SAP_EQUIP_ID";
pub const MATERIAL_COLUMN: &str = "MATERIAL_FLAG";
pub const INSTALLED_YEAR_COLUMN: &str = "INSTALLED_YEAR";

/// Identity columns copied unchanged to the output.
pub const PASSTHROUGH_COLUMNS: [&str; 6] = [
    "ETGIS_ID",
    "STRUCTURE_NO",
    "SAP_FUNC_LOC_NO",
    "HOST_TLINE_NM",
    "WSIP_SCOPE_IND",
    "TLINE_MILES",
];

/// Assets read from a snapshot, with per-row diagnostics.
#[derive(Debug, Default)]
pub struct AssetSnapshot {
    pub assets: Vec<AssetRecord>,
    pub diagnostics: LoadDiagnostics,
}

/// Read the asset snapshot CSV.
pub fn read_assets(path: &Path) -> Result<AssetSnapshot> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening asset snapshot {}", path.display()))?;
    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .clone();
    let columns = ColumnIndex::new(&headers);
    if columns.get(ID_COLUMN).is_none() {
        anyhow::bail!("{} has no {ID_COLUMN} column", path.display());
    }

    let mut snapshot = AssetSnapshot::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for (row, result) in rdr.records().enumerate() {
        // header is line 1
        let fallback_line = row + 2;
        snapshot.diagnostics.stats.rows += 1;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line);
                snapshot
                    .diagnostics
                    .add_skipped_row("parse", &err.to_string(), line);
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        match parse_row(&columns, &record) {
            Ok(asset) => {
                if asset.installed_year.is_none() {
                    snapshot.diagnostics.issues.add_warning_at_line(
                        "parse",
                        &format!("{} has no {INSTALLED_YEAR_COLUMN}", asset.entity()),
                        line,
                    );
                }
                if let Some(first) = first_seen.get(&asset.id) {
                    warn!(line, asset = %asset.id, "duplicate {ID_COLUMN}");
                    snapshot.diagnostics.issues.add_warning_at_line(
                        "duplicate-id",
                        &format!("{} repeats the {ID_COLUMN} of line {first}", asset.entity()),
                        line,
                    );
                } else {
                    first_seen.insert(asset.id.clone(), line);
                }
                snapshot.assets.push(asset);
            }
            Err(message) => {
                warn!(line, "skipping row: {message}");
                snapshot
                    .diagnostics
                    .add_skipped_row("parse", &message, line);
            }
        }
    }
    snapshot.diagnostics.stats.assets = snapshot.assets.len();
    info!(
        path = %path.display(),
        "loaded asset snapshot: {}",
        snapshot.diagnostics.summary()
    );
    Ok(snapshot)
}

/// Header name to column position.
struct ColumnIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> ColumnIndex<'a> {
    fn new(headers: &'a StringRecord) -> Self {
        Self {
            positions: headers.iter().enumerate().map(|(i, h)| (h, i)).collect(),
        }
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Cell text, `None` when the column is absent or the cell is blank.
    fn text<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.get(name)
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
    }

    fn number(&self, record: &StringRecord, name: &str) -> Result<Option<f64>, String> {
        self.text(record, name)
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|_| format!("{name} is not a number: '{s}'"))
            })
            .transpose()
    }
}

fn parse_row(columns: &ColumnIndex<'_>, record: &StringRecord) -> Result<AssetRecord, String> {
    let id = columns
        .text(record, ID_COLUMN)
        .ok_or_else(|| format!("missing {ID_COLUMN}"))?
        .to_string();
    let material = Material::from_flag(columns.text(record, MATERIAL_COLUMN).unwrap_or(""));
    let installed_year = columns
        .number(record, INSTALLED_YEAR_COLUMN)?
        .map(|year| parse_year(year).ok_or_else(|| format!("invalid {INSTALLED_YEAR_COLUMN} {year}")))
        .transpose()?;

    let mut conditions = ConditionCodes::default();
    for code in ConditionCode::ALL {
        conditions.set(code, columns.number(record, code.label())?);
    }

    let attributes = PASSTHROUGH_COLUMNS
        .iter()
        .filter(|name| columns.get(name).is_some())
        .map(|name| {
            let value = columns.text(record, name).unwrap_or("");
            (name.to_string(), value.to_string())
        })
        .collect();

    Ok(AssetRecord {
        id,
        material,
        installed_year,
        conditions,
        agriculture: columns.text(record, "AGRICULTURE").map(str::to_string),
        wetland_type: columns.text(record, "WETLAND_TYPE").map(str::to_string),
        corrosion_zone: columns.text(record, "CORROSION_ZONE").map(str::to_string),
        splices: columns.number(record, "SPLICES")?,
        wear_fatigue: columns.number(record, "WEAR_FATIGUE_RED_FAC")?,
        outage_designlife_mod: columns.number(record, "OUTAGE_DESIGNLIFE_MOD")?,
        attributes,
    })
}

/// Years may arrive as `1975` or `1975.0`.
fn parse_year(value: f64) -> Option<i32> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 10_000.0 {
        Some(value as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_codes_and_environment() {
        let file = write_csv(
            "SAP_EQUIP_ID,MATERIAL_FLAG,INSTALLED_YEAR,ANCHOR_CD,STRUCTURE_CD,AGRICULTURE,SPLICES,HOST_TLINE_NM\n\
             1001,STEEL,1975,2,,Prime Farmland,3,Line A\n\
             1002,WOOD,1990.0,,4, ,,Line B\n",
        );
        let snapshot = read_assets(file.path()).unwrap();
        assert_eq!(snapshot.assets.len(), 2);
        assert_eq!(snapshot.diagnostics.stats.skipped_rows, 0);

        let tower = &snapshot.assets[0];
        assert_eq!(tower.material, Material::Steel);
        assert_eq!(tower.installed_year, Some(1975));
        assert_eq!(tower.conditions.get(ConditionCode::Anchor), Some(2.0));
        assert_eq!(tower.conditions.get(ConditionCode::Structure), None);
        assert_eq!(tower.agriculture.as_deref(), Some("Prime Farmland"));
        assert_eq!(tower.splices, Some(3.0));
        assert_eq!(
            tower.attributes,
            vec![("HOST_TLINE_NM".to_string(), "Line A".to_string())]
        );

        let pole = &snapshot.assets[1];
        assert_eq!(pole.installed_year, Some(1990));
        assert_eq!(pole.conditions.get(ConditionCode::Structure), Some(4.0));
        assert_eq!(pole.agriculture, None);
    }

    #[test]
    fn malformed_rows_are_skipped_with_line_numbers() {
        let file = write_csv(
            "SAP_EQUIP_ID,MATERIAL_FLAG,INSTALLED_YEAR,GUY_CD\n\
             1,STEEL,1980,1\n\
             2,STEEL,nineteen,1\n\
             ,WOOD,1980,1\n\
             4,WOOD,1980,x\n",
        );
        let snapshot = read_assets(file.path()).unwrap();
        assert_eq!(snapshot.assets.len(), 1);
        assert_eq!(snapshot.diagnostics.stats.rows, 4);
        assert_eq!(snapshot.diagnostics.stats.skipped_rows, 3);
        let lines: Vec<_> = snapshot
            .diagnostics
            .issues
            .errors()
            .filter_map(|i| i.line)
            .collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn blank_install_year_loads_with_warning() {
        let file = write_csv("SAP_EQUIP_ID,MATERIAL_FLAG,INSTALLED_YEAR\n9,UNKNOWN,\n");
        let snapshot = read_assets(file.path()).unwrap();
        assert_eq!(snapshot.assets[0].installed_year, None);
        assert_eq!(snapshot.assets[0].material, Material::Other);
        assert_eq!(snapshot.diagnostics.issues.warning_count(), 1);
    }

    #[test]
    fn repeated_id_is_reported() {
        let file = write_csv(
            "SAP_EQUIP_ID,MATERIAL_FLAG,INSTALLED_YEAR\n\
             7,STEEL,1980\n\
             8,WOOD,1985\n\
             7,WOOD,1990\n",
        );
        let snapshot = read_assets(file.path()).unwrap();
        assert_eq!(snapshot.assets.len(), 3);
        let duplicates: Vec<_> = snapshot
            .diagnostics
            .issues
            .issues
            .iter()
            .filter(|i| i.category == "duplicate-id")
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].line, Some(4));
        assert!(duplicates[0].message.contains("line 2"));
    }

    #[test]
    fn missing_id_column_is_an_error() {
        let file = write_csv("ID,MATERIAL_FLAG\n1,STEEL\n");
        assert!(read_assets(file.path()).is_err());
    }
}
