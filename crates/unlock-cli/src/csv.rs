//! Controller CSV: `Interval,Start,End,<day names>,Holidays`, one row per slot.
//!
//! The column set is fixed and every field is a number or `HHMM`, so no
//! quoting is needed in either direction.

use anyhow::{bail, Context, Result};
use unlock_engine::{DayNames, DaySet, TemplateRow};

const COLUMNS: usize = 11;

pub fn header(names: &DayNames) -> String {
    let mut cols = vec!["Interval", "Start", "End"];
    cols.extend(names.iter().map(|(_, name)| name));
    cols.push("Holidays");
    cols.join(",")
}

pub fn write_rows(rows: &[TemplateRow], names: &DayNames) -> String {
    let mut out = header(names);
    out.push('\n');
    for row in rows {
        let flags: Vec<&str> = names
            .iter()
            .map(|(day, _)| if row.days.contains(day) { "1" } else { "0" })
            .collect();
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            row.index,
            row.start_hhmm(),
            row.end_hhmm(),
            flags.join(","),
            u8::from(row.holiday)
        ));
    }
    out
}

/// Parse a table written by [`write_rows`] with the same day names.
pub fn read_rows(text: &str, names: &DayNames) -> Result<Vec<TemplateRow>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((_, found)) = lines.next() else {
        bail!("CSV is empty");
    };
    let expected = header(names);
    if found != expected {
        bail!("unexpected CSV header '{}', expected '{}'", found, expected);
    }

    lines
        .map(|(number, line)| parse_row(line, names).with_context(|| format!("line {}", number)))
        .collect()
}

fn parse_row(line: &str, names: &DayNames) -> Result<TemplateRow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != COLUMNS {
        bail!("expected {} columns, found {}", COLUMNS, fields.len());
    }

    let index: usize = fields[0]
        .parse()
        .with_context(|| format!("bad Interval '{}'", fields[0]))?;
    let mut days = DaySet::EMPTY;
    for ((day, name), field) in names.iter().zip(&fields[3..10]) {
        if parse_flag(field, name)? {
            days.insert(day);
        }
    }
    let holiday = parse_flag(fields[10], "Holidays")?;

    Ok(TemplateRow::from_hhmm(
        index, fields[1], fields[2], days, holiday,
    )?)
}

fn parse_flag(field: &str, column: &str) -> Result<bool> {
    match field {
        "0" => Ok(false),
        "1" => Ok(true),
        other => bail!("column {} must be 0 or 1, found '{}'", column, other),
    }
}
