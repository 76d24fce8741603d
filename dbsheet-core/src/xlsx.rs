//! Minimal XLSX workbook writer.
//!
//! An XLSX file is a ZIP archive of XML parts: a content-types manifest,
//! package relationships, the workbook part listing its sheets, a style
//! sheet, and one XML part per worksheet. This module builds exactly the
//! parts the export needs: inline-string cells and a single bold cell
//! format for header rows.
//!
//! A new [`Workbook`] starts with an auto-created default sheet named
//! `Sheet1`. If nothing is ever written to it, it is dropped at
//! serialization time, so the saved file contains only sheets that were
//! actually requested.

use crate::error::{DbsheetError, Result};
use quick_xml::escape::escape;
use std::collections::BTreeMap;
use std::io::{Cursor, Seek, Write};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Hard ceiling on worksheet names in the XLSX format.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const DEFAULT_SHEET_NAME: &str = "Sheet1";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Style index of the bold cell format in the generated styles part.
const BOLD_STYLE_ID: u32 = 1;

/// Truncates a table name to a legal worksheet name.
///
/// Names longer than [`MAX_SHEET_NAME_LEN`] characters keep their first 31
/// characters; shorter names pass through unchanged. Truncation counts
/// characters, so a multi-byte name is never split mid-character.
pub fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// A single cell value with its formatting.
#[derive(Debug, Clone)]
struct CellValue {
    value: String,
    bold: bool,
}

/// One worksheet under construction.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    /// Sparse cell store keyed by (row, column), both 0-based. The map
    /// order is the row-major order the XML part is written in.
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl Worksheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: BTreeMap::new(),
        }
    }

    /// Returns the worksheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes a string cell at (row, col), overwriting any previous value.
    pub fn write_string(&mut self, row: u32, col: u32, value: &str) {
        self.cells.insert(
            (row, col),
            CellValue {
                value: value.to_owned(),
                bold: false,
            },
        );
    }

    /// Writes a bold string cell at (row, col).
    pub fn write_string_bold(&mut self, row: u32, col: u32, value: &str) {
        self.cells.insert(
            (row, col),
            CellValue {
                value: value.to_owned(),
                bold: true,
            },
        );
    }

    /// Returns the cell value at (row, col), if one was written.
    pub fn value(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&(row, col)).map(|cell| cell.value.as_str())
    }

    /// Returns true if the cell at (row, col) uses the bold format.
    pub fn is_bold(&self, row: u32, col: u32) -> bool {
        self.cells.get(&(row, col)).is_some_and(|cell| cell.bold)
    }

    /// Serializes this sheet as a `xl/worksheets/sheetN.xml` part.
    fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(&format!("<worksheet xmlns=\"{}\">", MAIN_NS));
        xml.push_str("<sheetData>");

        let mut open_row = None;
        for (&(row, col), cell) in &self.cells {
            if open_row != Some(row) {
                if open_row.is_some() {
                    xml.push_str("</row>");
                }
                xml.push_str(&format!("<row r=\"{}\">", row + 1));
                open_row = Some(row);
            }
            let style = if cell.bold {
                format!(" s=\"{}\"", BOLD_STYLE_ID)
            } else {
                String::new()
            };
            xml.push_str(&format!(
                "<c r=\"{}\" t=\"inlineStr\"{}><is><t>{}</t></is></c>",
                cell_reference(row, col),
                style,
                escape(cell.value.as_str()),
            ));
        }
        if open_row.is_some() {
            xml.push_str("</row>");
        }

        xml.push_str("</sheetData>");
        xml.push_str("</worksheet>");
        xml
    }
}

/// An in-memory spreadsheet document.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
    /// Whether anything was ever written to the auto-created default sheet.
    default_touched: bool,
}

impl Workbook {
    /// Creates a workbook holding only the untouched default sheet.
    pub fn new() -> Self {
        Self {
            sheets: vec![Worksheet::new(DEFAULT_SHEET_NAME)],
            default_touched: false,
        }
    }

    /// Returns the worksheet with the given name, creating it if needed.
    ///
    /// Requesting `Sheet1` reuses the default sheet instead of creating a
    /// second one; the default then survives serialization. Repeated
    /// requests for the same name return the same sheet, so a later caller
    /// silently overwrites an earlier one's cells.
    pub fn worksheet(&mut self, name: &str) -> &mut Worksheet {
        if name == DEFAULT_SHEET_NAME {
            self.default_touched = true;
        }
        let index = match self.sheets.iter().position(|sheet| sheet.name == name) {
            Some(index) => index,
            None => {
                self.sheets.push(Worksheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[index]
    }

    /// Returns a previously created worksheet by name.
    ///
    /// The untouched default sheet is not visible here, matching what
    /// serialization will produce.
    pub fn get_worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.output_sheets().find(|sheet| sheet.name == name)
    }

    /// Number of worksheets the saved file will contain.
    pub fn worksheet_count(&self) -> usize {
        self.output_sheets().count()
    }

    /// Sheets in serialization order, dropping the default sheet if it was
    /// never written to.
    fn output_sheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets
            .iter()
            .filter(|sheet| self.default_touched || sheet.name != DEFAULT_SHEET_NAME)
    }

    /// Serializes the workbook into XLSX bytes.
    ///
    /// # Errors
    /// Returns an error if assembling the ZIP archive fails.
    pub fn save_to_buffer(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let sheets: Vec<&Worksheet> = self.output_sheets().collect();

        write_part(&mut zip, "[Content_Types].xml", &content_types_xml(sheets.len()))?;
        write_part(&mut zip, "_rels/.rels", &package_relationships_xml())?;
        write_part(&mut zip, "xl/workbook.xml", &workbook_xml(&sheets))?;
        write_part(
            &mut zip,
            "xl/_rels/workbook.xml.rels",
            &workbook_relationships_xml(sheets.len()),
        )?;
        write_part(&mut zip, "xl/styles.xml", &styles_xml())?;
        for (index, sheet) in sheets.iter().enumerate() {
            write_part(
                &mut zip,
                &format!("xl/worksheets/sheet{}.xml", index + 1),
                &sheet.to_xml(),
            )?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| DbsheetError::workbook_failed("finalizing workbook archive", e))?;
        Ok(cursor.into_inner())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

/// A1-style reference for a (row, col) pair, both 0-based.
fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_letters(col), row + 1)
}

/// Spreadsheet column letters for a 0-based column index (A, B, .., Z, AA, ..).
fn column_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;
    loop {
        letters.insert(0, char::from(b'A' + (col % 26) as u8));
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters
}

fn write_part<W: Write + Seek>(zip: &mut ZipWriter<W>, path: &str, content: &str) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(path, options)
        .map_err(|e| DbsheetError::workbook_failed(format!("creating part {}", path), e))?;
    zip.write_all(content.as_bytes())
        .map_err(|e| DbsheetError::workbook_failed(format!("writing part {}", path), e))?;
    Ok(())
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<Types xmlns=\"{}\">", CONTENT_TYPES_NS));
    xml.push_str(
        "<Default Extension=\"rels\" \
         ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
    );
    xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
    xml.push_str(
        "<Override PartName=\"/xl/workbook.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
    );
    xml.push_str(
        "<Override PartName=\"/xl/styles.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>",
    );
    for index in 1..=sheet_count {
        xml.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
            index
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn package_relationships_xml() -> String {
    format!(
        "{}<Relationships xmlns=\"{}\">\
         <Relationship Id=\"rId1\" \
         Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
         Target=\"xl/workbook.xml\"/>\
         </Relationships>",
        XML_DECL, PACKAGE_RELATIONSHIPS_NS
    )
}

fn workbook_xml(sheets: &[&Worksheet]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(
        "<workbook xmlns=\"{}\" xmlns:r=\"{}\">",
        MAIN_NS, RELATIONSHIPS_NS
    ));
    xml.push_str("<sheets>");
    for (index, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            escape(sheet.name.as_str()),
            index + 1,
            index + 1
        ));
    }
    xml.push_str("</sheets>");
    xml.push_str("</workbook>");
    xml
}

fn workbook_relationships_xml(sheet_count: usize) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<Relationships xmlns=\"{}\">", PACKAGE_RELATIONSHIPS_NS));
    for index in 1..=sheet_count {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
             Target=\"worksheets/sheet{}.xml\"/>",
            index, index
        ));
    }
    xml.push_str(&format!(
        "<Relationship Id=\"rId{}\" \
         Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" \
         Target=\"styles.xml\"/>",
        sheet_count + 1
    ));
    xml.push_str("</Relationships>");
    xml
}

/// Styles part with two cell formats: 0 = default, 1 = bold.
///
/// The two fills are mandatory boilerplate; format readers expect the
/// `none` and `gray125` patterns at indexes 0 and 1.
fn styles_xml() -> String {
    format!(
        "{}<styleSheet xmlns=\"{}\">\
         <fonts count=\"2\">\
         <font><sz val=\"11\"/><name val=\"Calibri\"/></font>\
         <font><b/><sz val=\"11\"/><name val=\"Calibri\"/></font>\
         </fonts>\
         <fills count=\"2\">\
         <fill><patternFill patternType=\"none\"/></fill>\
         <fill><patternFill patternType=\"gray125\"/></fill>\
         </fills>\
         <borders count=\"1\">\
         <border><left/><right/><top/><bottom/><diagonal/></border>\
         </borders>\
         <cellStyleXfs count=\"1\">\
         <xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/>\
         </cellStyleXfs>\
         <cellXfs count=\"2\">\
         <xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>\
         <xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyFont=\"1\"/>\
         </cellXfs>\
         </styleSheet>",
        XML_DECL, MAIN_NS
    )
}
