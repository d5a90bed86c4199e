//! Minimal XLSX cell-grid reader
//!
//! Reads just enough of the SpreadsheetML package to materialize the
//! requested sheets as header + row grids: `xl/workbook.xml` for the sheet
//! name to relationship-id mapping, the workbook rels part for the
//! worksheet paths, `xl/sharedStrings.xml`, and the worksheet parts
//! themselves. Styles, formulas and everything else are ignored.

use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::SchemaError;

/// A single parsed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// Numeric view; missing or non-numeric text coerces to 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            Cell::Number(n) => *n,
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Cell::Text(s) => s.trim().parse().unwrap_or(0.0),
            Cell::Empty => 0.0,
        }
    }

    pub fn as_u32(&self) -> u32 {
        let v = self.as_f64();
        if v <= 0.0 {
            0
        } else {
            v.round() as u32
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Number(n) => *n != 0.0,
            Cell::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            Cell::Empty => false,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// String view with empty cells mapped to `None`.
    pub fn as_opt_string(&self) -> Option<String> {
        let s = self.as_string();
        (!s.is_empty()).then_some(s)
    }
}

/// One worksheet projected to a header row plus data rows.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn from_grid(name: &str, mut grid: Vec<Vec<Cell>>) -> Result<Self, SchemaError> {
        if grid.is_empty() {
            return Err(SchemaError::EmptySheet(name.to_string()));
        }
        let header: Vec<String> = grid.remove(0).iter().map(Cell::as_string).collect();
        // Drop rows that carry no values at all (trailing formatting rows).
        grid.retain(|row| row.iter().any(|c| *c != Cell::Empty));
        Ok(Sheet {
            name: name.to_string(),
            header,
            rows: grid,
        })
    }

    /// Index of a column by its header label.
    pub fn column(&self, label: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == label)
    }

    /// Cell at (row, col); absent trailing cells read as empty.
    pub fn cell(row: &[Cell], col: usize) -> &Cell {
        row.get(col).unwrap_or(&Cell::Empty)
    }
}

/// Read the named sheets from an XLSX package.
///
/// Sheets present in the workbook but not in `wanted` are skipped; sheets
/// in `wanted` but absent from the workbook are simply missing from the
/// returned map (the schema layer turns that into a `MissingSheet` error).
pub fn read_sheets<R: Read + Seek>(
    reader: R,
    wanted: &[&str],
) -> Result<HashMap<String, Sheet>, SchemaError> {
    let mut archive = ZipArchive::new(reader)?;

    let workbook_xml = read_entry(&mut archive, "xl/workbook.xml")?
        .ok_or_else(|| SchemaError::Unparseable("missing xl/workbook.xml".to_string()))?;
    let rels_xml = read_entry(&mut archive, "xl/_rels/workbook.xml.rels")?
        .ok_or_else(|| SchemaError::Unparseable("missing workbook relationships".to_string()))?;
    let shared = match read_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_rels = parse_workbook_sheets(&workbook_xml)?;
    let targets = parse_relationships(&rels_xml)?;

    let mut sheets = HashMap::new();
    for (name, rel_id) in &sheet_rels {
        if !wanted.contains(&name.as_str()) {
            continue;
        }
        let target = targets
            .get(rel_id)
            .ok_or_else(|| SchemaError::MissingWorksheetPart(name.clone()))?;
        let part = normalize_target(target);
        let xml = read_entry(&mut archive, &part)?
            .ok_or_else(|| SchemaError::MissingWorksheetPart(name.clone()))?;
        let grid = parse_worksheet(&xml, &shared)?;
        sheets.insert(name.clone(), Sheet::from_grid(name, grid)?);
    }
    Ok(sheets)
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, SchemaError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut xml = String::new();
            file.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Worksheet part targets are relative to `xl/` unless package-absolute.
fn normalize_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Sheet name to relationship id, in workbook order.
fn parse_workbook_sheets(xml: &str) -> Result<Vec<(String, String)>, SchemaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                for attr in e.attributes().with_checks(false) {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"name" => name = Some(attr.unescape_value()?.into_owned()),
                        b"r:id" => rel_id = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(name), Some(rel_id)) = (name, rel_id) {
                    sheets.push((name, rel_id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Relationship id to target path.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, SchemaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes().with_checks(false) {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attr.unescape_value()?.into_owned()),
                        b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// Shared string items; rich-text runs are flattened to their visible text.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, SchemaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut items = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"si" => {
                items.push(parse_si(&mut reader)?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(items)
}

fn parse_si(reader: &mut Reader<&[u8]>) -> Result<String, SchemaError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => {
                text.push_str(&read_text(reader, QName(b"t"))?);
            }
            Event::Start(e) if e.local_name().as_ref() == b"rPh" => {
                // Phonetic runs are not part of the displayed string.
                reader.read_to_end_into(e.name(), &mut Vec::new())?;
            }
            Event::End(e) if e.local_name().as_ref() == b"si" => break,
            Event::Eof => {
                return Err(SchemaError::Unparseable(
                    "unexpected eof in shared strings".to_string(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

/// Worksheet `sheetData` as a dense grid; gaps become [`Cell::Empty`].
fn parse_worksheet(xml: &str, shared: &[String]) -> Result<Vec<Vec<Cell>>, SchemaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut row: Vec<Cell> = Vec::new();
    let mut in_row = false;
    let mut cursor = 0usize;
    let mut cell_col = 0usize;
    let mut cell_type = String::new();
    let mut cell_value: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"row" => {
                row = Vec::new();
                in_row = true;
                cursor = 0;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"row" => {
                rows.push(Vec::new());
            }
            Event::Start(e) | Event::Empty(e) if in_row && e.local_name().as_ref() == b"c" => {
                cell_col = cursor;
                cell_type.clear();
                cell_value = None;
                for attr in e.attributes().with_checks(false) {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"r" => {
                            if let Some(col) = column_index(&attr.unescape_value()?) {
                                cell_col = col;
                            }
                        }
                        b"t" => cell_type = attr.unescape_value()?.into_owned(),
                        _ => {}
                    }
                }
                cursor = cell_col + 1;
            }
            Event::Start(e) if in_row && e.local_name().as_ref() == b"v" => {
                cell_value = Some(read_text(&mut reader, QName(b"v"))?);
            }
            Event::Start(e) if in_row && e.local_name().as_ref() == b"is" => {
                cell_value = Some(read_inline_string(&mut reader)?);
            }
            Event::End(e) if e.local_name().as_ref() == b"c" => {
                let cell = decode_cell(&cell_type, cell_value.take(), shared);
                place_cell(&mut row, cell_col, cell);
            }
            Event::End(e) if e.local_name().as_ref() == b"row" => {
                rows.push(std::mem::take(&mut row));
                in_row = false;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}

fn place_cell(row: &mut Vec<Cell>, col: usize, cell: Cell) {
    if row.len() <= col {
        row.resize(col + 1, Cell::Empty);
    }
    row[col] = cell;
}

fn decode_cell(cell_type: &str, value: Option<String>, shared: &[String]) -> Cell {
    let Some(value) = value else {
        return Cell::Empty;
    };
    match cell_type {
        "s" => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared.get(idx))
            .map(|s| Cell::Text(s.clone()))
            .unwrap_or(Cell::Empty),
        "b" => Cell::Bool(value.trim() == "1" || value.trim().eq_ignore_ascii_case("true")),
        "str" | "inlineStr" => Cell::Text(value),
        "e" => Cell::Empty,
        _ => match value.trim().parse::<f64>() {
            Ok(n) => Cell::Number(n),
            Err(_) => Cell::Text(value),
        },
    }
}

/// Zero-based column index from an `A1`-style cell reference.
fn column_index(cell_ref: &str) -> Option<usize> {
    let letters: String = cell_ref
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for c in letters.chars() {
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

fn read_text(reader: &mut Reader<&[u8]>, end: QName<'_>) -> Result<String, SchemaError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::End(e) if e.name() == end => break,
            Event::Eof => {
                return Err(SchemaError::Unparseable(
                    "unexpected eof in worksheet xml".to_string(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

fn read_inline_string(reader: &mut Reader<&[u8]>) -> Result<String, SchemaError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => {
                text.push_str(&read_text(reader, QName(b"t"))?);
            }
            Event::End(e) if e.local_name().as_ref() == b"is" => break,
            Event::Eof => {
                return Err(SchemaError::Unparseable(
                    "unexpected eof in inline string".to_string(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}
