//! Wide result table: one row per assessed asset, curve flattened into
//! `_<v>_mph` columns, numbers rendered at the precision of the reporting
//! database.

use chrono::{DateTime, SecondsFormat, Utc};
use frag_algo::{AssetReliability, ReductionKind, SweepConfig};
use frag_core::{AssetRecord, ComponentFamily, Diagnostics};
use serde::Serialize;

use crate::assets::{ID_COLUMN, MATERIAL_COLUMN, PASSTHROUGH_COLUMNS};

/// Fixed-point column type, `DECIMAL(precision, scale)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    pub precision: u32,
    pub scale: u32,
}

impl Decimal {
    pub const fn new(precision: u32, scale: u32) -> Self {
        Self { precision, scale }
    }

    /// Render a value, or `None` if it is non-finite or does not fit.
    pub fn format(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        let text = format!("{:.*}", self.scale as usize, value);
        let integer_digits = text
            .trim_start_matches('-')
            .split('.')
            .next()
            .map(|int| int.trim_start_matches('0').len())
            .unwrap_or(0);
        if integer_digits as u32 > self.precision - self.scale {
            return None;
        }
        Some(text)
    }
}

pub const LIFE_DECIMAL: Decimal = Decimal::new(18, 15);
pub const RATIO_DECIMAL: Decimal = Decimal::new(8, 6);
pub const MEAN_DECIMAL: Decimal = Decimal::new(6, 3);
pub const STDDEV_DECIMAL: Decimal = Decimal::new(20, 15);
pub const PROBABILITY_DECIMAL: Decimal = Decimal::new(16, 15);

pub const AGE_COLUMN: &str = "AGE_YEARS";
pub const DATETIME_COLUMN: &str = "DATETIME";

/// Run timestamp as written by every sink, RFC 3339 to the second.
pub fn run_stamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Flattened results ready for a sink.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WideTable {
    pub headers: Vec<String>,
    /// Empty string marks a value that could not be represented
    pub rows: Vec<Vec<String>>,
    /// One warning per dropped value
    pub warnings: Diagnostics,
}

impl WideTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell for an asset row by column name.
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flatten assessed assets. Identity columns are those present on any asset.
    pub fn build<'a>(
        assessed: impl IntoIterator<Item = (&'a AssetRecord, &'a AssetReliability)>,
        sweep: &SweepConfig,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let assessed: Vec<_> = assessed.into_iter().collect();
        let identity: Vec<&str> = PASSTHROUGH_COLUMNS
            .iter()
            .copied()
            .filter(|name| {
                assessed
                    .iter()
                    .any(|(record, _)| record.attributes.iter().any(|(k, _)| k == name))
            })
            .collect();

        let mut table = WideTable {
            headers: headers(&identity, sweep),
            ..Default::default()
        };
        let stamp = run_stamp(timestamp);
        for (record, reliability) in assessed {
            let mut row = RowBuilder::new(record, &mut table.warnings);
            row.push_text(record.id.clone());
            for name in &identity {
                let value = record
                    .attributes
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default();
                row.push_text(value);
            }
            row.push_text(reliability.material.to_string());
            row.push_text(format!("{}", reliability.age.value()));
            for kind in ReductionKind::ALL {
                row.push_number(kind.column(), reliability.factors.get(kind), LIFE_DECIMAL);
            }
            for family in ComponentFamily::ALL {
                let prefix = family.column_prefix();
                match reliability.component(family) {
                    Some(c) => {
                        row.push_number(prefix, c.design_life.adjustment, LIFE_DECIMAL);
                        row.push_number(prefix, c.design_life.adjusted.value(), LIFE_DECIMAL);
                        row.push_number(prefix, c.strength_ratio, RATIO_DECIMAL);
                        row.push_number(prefix, c.design_ratio, RATIO_DECIMAL);
                        row.push_number(prefix, c.design_life.cov, LIFE_DECIMAL);
                    }
                    None => row.push_blanks(5),
                }
            }
            row.push_number("mu", reliability.mu, MEAN_DECIMAL);
            for family in ComponentFamily::ALL {
                match reliability.component(family) {
                    Some(c) => {
                        row.push_number(family.short_name(), c.capacity.mean, MEAN_DECIMAL);
                        row.push_number(family.short_name(), c.capacity.stddev, STDDEV_DECIMAL);
                    }
                    None => row.push_blanks(2),
                }
            }
            for speed in sweep.speeds() {
                match reliability.curve.at(speed) {
                    Some(p) => row.push_number("curve", p, PROBABILITY_DECIMAL),
                    None => row.push_blanks(1),
                }
            }
            row.push_text(stamp.clone());
            let cells = row.finish();
            table.rows.push(cells);
        }
        table
    }
}

fn headers(identity: &[&str], sweep: &SweepConfig) -> Vec<String> {
    let mut headers = vec![ID_COLUMN.to_string()];
    headers.extend(identity.iter().map(|s| s.to_string()));
    headers.push(MATERIAL_COLUMN.to_string());
    headers.push(AGE_COLUMN.to_string());
    headers.extend(ReductionKind::ALL.iter().map(|k| k.column().to_string()));
    for family in ComponentFamily::ALL {
        let prefix = family.column_prefix();
        for suffix in [
            "_des_life_adjustment",
            "_des_life_adjusted",
            "_strength_ratio",
            "_design_ratio",
            "_cov",
        ] {
            headers.push(format!("{prefix}{suffix}"));
        }
    }
    headers.push("mu".to_string());
    for family in ComponentFamily::ALL {
        headers.push(format!("mean_{}", family.short_name()));
        headers.push(format!("stddev_{}", family.short_name()));
    }
    headers.extend(sweep.speeds().map(|v| format!("_{}_mph", v.whole())));
    headers.push(DATETIME_COLUMN.to_string());
    headers
}

struct RowBuilder<'a> {
    entity: String,
    cells: Vec<String>,
    warnings: &'a mut Diagnostics,
}

impl<'a> RowBuilder<'a> {
    fn new(record: &AssetRecord, warnings: &'a mut Diagnostics) -> Self {
        Self {
            entity: record.entity(),
            cells: Vec::new(),
            warnings,
        }
    }

    fn push_text(&mut self, text: String) {
        self.cells.push(text);
    }

    fn push_blanks(&mut self, n: usize) {
        self.cells.extend(std::iter::repeat(String::new()).take(n));
    }

    fn push_number(&mut self, field: &str, value: f64, decimal: Decimal) {
        match decimal.format(value) {
            Some(text) => self.cells.push(text),
            None => {
                self.warnings.add_warning_with_entity(
                    "precision",
                    &format!(
                        "{field} value {value} does not fit DECIMAL({},{})",
                        decimal.precision, decimal.scale
                    ),
                    &self.entity,
                );
                self.cells.push(String::new());
            }
        }
    }

    fn finish(self) -> Vec<String> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use frag_algo::{FragilityModel, ModelConstants, ScoreTable};
    use frag_core::Material;

    #[test]
    fn decimal_formatting() {
        assert_eq!(MEAN_DECIMAL.format(110.0).as_deref(), Some("110.000"));
        assert_eq!(MEAN_DECIMAL.format(1000.0), None);
        assert_eq!(MEAN_DECIMAL.format(999.9996), None);
        assert_eq!(RATIO_DECIMAL.format(0.92).as_deref(), Some("0.920000"));
        assert_eq!(PROBABILITY_DECIMAL.format(1.0).as_deref(), Some("1.000000000000000"));
        assert_eq!(LIFE_DECIMAL.format(-0.5).as_deref(), Some("-0.500000000000000"));
        assert_eq!(LIFE_DECIMAL.format(f64::NAN), None);
        assert_eq!(LIFE_DECIMAL.format(f64::INFINITY), None);
    }

    #[test]
    fn builds_one_row_per_asset() {
        let model =
            FragilityModel::new(ModelConstants::default(), ScoreTable::reference(), 2020).unwrap();
        let mut tower = AssetRecord::new("1001", Material::Steel, 1980);
        tower
            .attributes
            .push(("HOST_TLINE_NM".to_string(), "Line A".to_string()));
        let pole = AssetRecord::new("1002", Material::Wood, 2000);
        let results = [model.assess(&tower).unwrap(), model.assess(&pole).unwrap()];
        let stamp = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();

        let table = WideTable::build(
            [(&tower, &results[0]), (&pole, &results[1])],
            &model.constants().sweep,
            stamp,
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.headers[0], "SAP_EQUIP_ID");
        assert_eq!(table.headers[1], "HOST_TLINE_NM");
        assert!(table.headers.iter().all(|h| h != "ETGIS_ID"));
        for row in &table.rows {
            assert_eq!(row.len(), table.headers.len());
        }
        assert_eq!(table.cell(0, "HOST_TLINE_NM"), Some("Line A"));
        assert_eq!(table.cell(1, "HOST_TLINE_NM"), Some(""));
        assert_eq!(table.cell(1, "MATERIAL_FLAG"), Some("WOOD"));
        assert_eq!(table.cell(0, "AGE_YEARS"), Some("40"));
        assert_eq!(table.cell(1, "mu"), Some("90.000"));
        assert_eq!(table.cell(1, "mean_FOUNDATION"), Some("90.000"));
        assert_eq!(
            table.cell(0, "ANCHOR_CD_strength_ratio"),
            Some("1.000000")
        );
        assert_eq!(table.cell(0, "_0_mph"), Some("0.000000000000000"));
        assert!(table.column("_120_mph").is_some());
        assert_eq!(table.cell(0, "DATETIME"), Some("2020-06-01T12:00:00Z"));
        assert!(!table.warnings.has_issues());
    }

    #[test]
    fn overflowing_value_leaves_empty_cell_and_warning() {
        let constants = ModelConstants {
            mu_steel: 1500.0,
            ..ModelConstants::default()
        };
        let model = FragilityModel::new(constants, ScoreTable::reference(), 2020).unwrap();
        let tower = AssetRecord::new("1001", Material::Steel, 1980);
        let result = model.assess(&tower).unwrap();

        let table = WideTable::build(
            [(&tower, &result)],
            &model.constants().sweep,
            Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap(),
        );

        assert_eq!(table.rows[0].len(), table.headers.len());
        assert_eq!(table.cell(0, "mu"), Some(""));
        assert_eq!(table.cell(0, "mean_ANCHOR"), Some(""));
        assert_eq!(table.cell(0, "SAP_EQUIP_ID"), Some("1001"));
        let precision: Vec<_> = table
            .warnings
            .issues
            .iter()
            .filter(|i| i.category == "precision")
            .collect();
        assert!(!precision.is_empty());
        assert!(precision.iter().all(|i| i.entity.as_deref() == Some("Asset 1001")));
        assert!(precision.iter().any(|i| i.message.contains("DECIMAL(6,3)")));
    }
}
