use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use frag_algo::ScoreDimension;
use tabwriter::TabWriter;

use crate::commands::util::load_scores;

fn render(score: Option<u8>) -> String {
    score.map_or_else(|| "N/A".to_string(), |s| s.to_string())
}

/// Handle `frag score`: resolve a label in one or all dimensions.
pub fn handle(label: &str, dimension: Option<&str>, scores: Option<&Path>) -> Result<()> {
    let table = load_scores(scores)?;
    match dimension {
        Some(name) => {
            let dimension: ScoreDimension = name.parse()?;
            println!("{dimension}: {}", render(table.resolve(label, dimension)));
        }
        None => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(writer, "DIMENSION\tSCORE")?;
            for dimension in ScoreDimension::ALL {
                writeln!(writer, "{dimension}\t{}", render(table.resolve(label, dimension)))?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
