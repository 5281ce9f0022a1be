//! WordprocessingML output as a Flat OPC package: a single XML file holding
//! every part of the document, which Word opens like a `.docx`.

use crate::calendar::DAYS_PER_WEEK;
use crate::error::{Error, ErrorKind, Result};
use crate::layout::{CalendarLayout, Cell, Row};

use super::{Renderer, Style};

const PKG_NS: &str = "http://schemas.microsoft.com/office/2006/xmlPackage";
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const RELS_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
const DOCUMENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

struct Border {
    style: &'static str,
    size: &'static str,
    color: &'static str,
}

const NIL_BORDER: Border = Border {
    style: "nil",
    size: "0",
    color: "FFFFFF",
};

const SINGLE_BORDER: Border = Border {
    style: "single",
    size: "4",
    color: "000000",
};

/// Top, left, bottom and right border of a cell.
type Borders = [&'static Border; 4];

const NO_BORDERS: Borders = [&NIL_BORDER, &NIL_BORDER, &NIL_BORDER, &NIL_BORDER];
const ALL_BORDERS: Borders = [&SINGLE_BORDER, &SINGLE_BORDER, &SINGLE_BORDER, &SINGLE_BORDER];
const TRAILING_BORDER: Borders = [&NIL_BORDER, &NIL_BORDER, &NIL_BORDER, &SINGLE_BORDER];

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

struct XmlWriter {
    output: String,
    open: Vec<&'static str>,
}

impl XmlWriter {
    fn new() -> Self {
        XmlWriter {
            output: String::from(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
                 <?mso-application progid=\"Word.Document\"?>\n",
            ),
            open: Vec::new(),
        }
    }

    fn tag(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.output.push('<');
        self.output.push_str(name);
        for (key, value) in attrs {
            self.output += &format!(" {}=\"{}\"", key, escape(value));
        }
    }

    fn begin(&mut self, name: &'static str, attrs: &[(&str, &str)]) {
        self.tag(name, attrs);
        self.output.push('>');
        self.open.push(name);
    }

    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.tag(name, attrs);
        self.output.push_str("/>");
    }

    fn text(&mut self, text: &str) {
        self.output += &escape(text);
    }

    fn end(&mut self, name: &'static str) -> Result<()> {
        match self.open.pop() {
            Some(open) if open == name => {
                self.output += &format!("</{}>", name);
                Ok(())
            }
            Some(open) => Err(Error::new(
                ErrorKind::SerializeError,
                &format!("Cannot close <{}>: <{}> is still open", name, open),
            )),
            None => Err(Error::new(
                ErrorKind::SerializeError,
                &format!("Cannot close <{}>: no element is open", name),
            )),
        }
    }

    fn finish(self) -> Result<String> {
        if let Some(open) = self.open.last() {
            log::warn!("{:?}", self.open);
            return Err(Error::new(
                ErrorKind::SerializeError,
                &format!("Document ended with <{}> still open", open),
            ));
        }
        Ok(self.output)
    }
}

/// Renders the calendar table into a WordprocessingML package.
pub struct WordXml {
    style: Style,
}

impl WordXml {
    pub fn new(style: Style) -> Self {
        WordXml { style }
    }

    fn begin_part(&self, w: &mut XmlWriter, name: &str, content_type: &str) {
        w.begin(
            "pkg:part",
            &[("pkg:name", name), ("pkg:contentType", content_type)],
        );
        w.begin("pkg:xmlData", &[]);
    }

    fn end_part(&self, w: &mut XmlWriter) -> Result<()> {
        w.end("pkg:xmlData")?;
        w.end("pkg:part")
    }

    fn relationships(&self, w: &mut XmlWriter, rels: &[(&str, &str)]) -> Result<()> {
        w.begin("Relationships", &[("xmlns", RELS_NS)]);
        for (i, (rel_type, target)) in rels.iter().enumerate() {
            let id = format!("rId{}", i + 1);
            w.leaf(
                "Relationship",
                &[("Id", id.as_str()), ("Type", *rel_type), ("Target", *target)],
            );
        }
        w.end("Relationships")
    }

    fn styles(&self, w: &mut XmlWriter) -> Result<()> {
        let size = self.style.font_size.to_string();
        let font = self.style.font.as_str();

        w.begin("w:styles", &[("xmlns:w", W_NS)]);
        w.begin("w:docDefaults", &[]);
        w.begin("w:rPrDefault", &[]);
        w.begin("w:rPr", &[]);
        w.leaf(
            "w:rFonts",
            &[
                ("w:ascii", font),
                ("w:hAnsi", font),
                ("w:eastAsia", font),
                ("w:cs", font),
            ],
        );
        w.leaf("w:noProof", &[]);
        w.leaf("w:sz", &[("w:val", size.as_str())]);
        w.leaf("w:szCs", &[("w:val", size.as_str())]);
        w.end("w:rPr")?;
        w.end("w:rPrDefault")?;
        w.leaf("w:pPrDefault", &[]);
        w.end("w:docDefaults")?;
        w.end("w:styles")
    }

    fn run(&self, w: &mut XmlWriter, text: &str, muted: bool) -> Result<()> {
        let size = self.style.font_size.to_string();

        w.begin("w:r", &[]);
        w.begin("w:rPr", &[]);
        if muted {
            w.leaf("w:color", &[("w:val", self.style.muted_color.as_str())]);
        }
        w.leaf("w:sz", &[("w:val", size.as_str())]);
        w.leaf("w:szCs", &[("w:val", size.as_str())]);
        w.end("w:rPr")?;
        if text.starts_with(' ') || text.ends_with(' ') {
            w.begin("w:t", &[("xml:space", "preserve")]);
        } else {
            w.begin("w:t", &[]);
        }
        w.text(text);
        w.end("w:t")?;
        w.end("w:r")
    }

    fn cell_properties(
        &self,
        w: &mut XmlWriter,
        borders: &Borders,
        fill: Option<&str>,
        rotated: bool,
        bottom: bool,
    ) -> Result<()> {
        let width = self.style.column_width.to_string();

        w.begin("w:tcPr", &[]);
        w.leaf("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")]);
        w.begin("w:tcBorders", &[]);
        for (side, border) in ["w:top", "w:left", "w:bottom", "w:right"]
            .iter()
            .zip(borders.iter())
        {
            w.leaf(
                side,
                &[
                    ("w:val", border.style),
                    ("w:sz", border.size),
                    ("w:space", "0"),
                    ("w:color", border.color),
                ],
            );
        }
        w.end("w:tcBorders")?;
        if let Some(fill) = fill {
            w.leaf(
                "w:shd",
                &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)],
            );
        }
        if rotated {
            w.leaf("w:textDirection", &[("w:val", "btLr")]);
        }
        if bottom {
            w.leaf("w:vAlign", &[("w:val", "bottom")]);
        }
        w.end("w:tcPr")
    }

    fn cell(&self, w: &mut XmlWriter, cell: &Cell) -> Result<()> {
        w.begin("w:tc", &[]);
        match *cell {
            Cell::Day { day, weekend, .. } => {
                let fill = if weekend {
                    Some(self.style.weekend_fill.as_str())
                } else {
                    None
                };
                self.cell_properties(w, &ALL_BORDERS, fill, false, false)?;

                // The trailing space is unstyled so that text typed after
                // the day number is not muted.
                w.begin("w:p", &[]);
                self.run(w, &day.to_string(), true)?;
                self.run(w, " ", false)?;
                w.end("w:p")?;
                w.leaf("w:p", &[]);
            }
            Cell::Label { name, rotated } => {
                let borders = if rotated { &TRAILING_BORDER } else { &NO_BORDERS };
                self.cell_properties(w, borders, None, rotated, true)?;

                w.begin("w:p", &[]);
                if rotated {
                    w.begin("w:pPr", &[]);
                    w.leaf("w:jc", &[("w:val", "center")]);
                    w.end("w:pPr")?;
                }
                self.run(w, name, true)?;
                w.end("w:p")?;
            }
            Cell::Empty => {
                self.cell_properties(w, &NO_BORDERS, None, false, false)?;
                w.leaf("w:p", &[]);
            }
        }
        w.end("w:tc")
    }

    fn row(&self, w: &mut XmlWriter, row: &Row) -> Result<()> {
        let height = self.style.row_height.to_string();

        w.begin("w:tr", &[]);
        w.begin("w:trPr", &[]);
        w.leaf("w:cantSplit", &[]);
        w.leaf("w:trHeight", &[("w:val", height.as_str()), ("w:hRule", "exact")]);
        w.end("w:trPr")?;
        for cell in row.iter() {
            self.cell(w, cell)?;
        }
        w.end("w:tr")
    }

    fn table(&self, w: &mut XmlWriter, layout: &CalendarLayout) -> Result<()> {
        let table_width = self.style.table_width().to_string();
        let column_width = self.style.column_width.to_string();

        w.begin("w:tbl", &[]);
        w.begin("w:tblPr", &[]);
        w.leaf("w:tblW", &[("w:w", table_width.as_str()), ("w:type", "dxa")]);
        w.leaf("w:tblLayout", &[("w:type", "fixed")]);
        w.end("w:tblPr")?;
        w.begin("w:tblGrid", &[]);
        for _ in 0..DAYS_PER_WEEK {
            w.leaf("w:gridCol", &[("w:w", column_width.as_str())]);
        }
        w.end("w:tblGrid")?;
        for row in layout.rows() {
            self.row(w, row)?;
        }
        w.end("w:tbl")
    }

    fn document(&self, w: &mut XmlWriter, layout: &CalendarLayout) -> Result<()> {
        w.begin("w:document", &[("xmlns:w", W_NS)]);
        w.begin("w:body", &[]);
        // A table without any row is not a valid table
        if !layout.is_empty() {
            self.table(w, layout)?;
        }
        w.leaf("w:p", &[]);
        w.end("w:body")?;
        w.end("w:document")
    }
}

impl Renderer for WordXml {
    fn render(&self, layout: &CalendarLayout) -> Result<String> {
        let mut w = XmlWriter::new();

        w.begin("pkg:package", &[("xmlns:pkg", PKG_NS)]);

        self.begin_part(&mut w, "/_rels/.rels", RELS_TYPE);
        self.relationships(&mut w, &[(OFFICE_DOCUMENT_REL, "word/document.xml")])?;
        self.end_part(&mut w)?;

        self.begin_part(&mut w, "/word/_rels/document.xml.rels", RELS_TYPE);
        self.relationships(&mut w, &[(STYLES_REL, "styles.xml")])?;
        self.end_part(&mut w)?;

        self.begin_part(&mut w, "/word/document.xml", DOCUMENT_TYPE);
        self.document(&mut w, layout)?;
        self.end_part(&mut w)?;

        self.begin_part(&mut w, "/word/styles.xml", STYLES_TYPE);
        self.styles(&mut w)?;
        self.end_part(&mut w)?;

        w.end("pkg:package")?;
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_layout;

    fn render(start_year: i32, start_month: u32, months: i64) -> String {
        let layout = generate_layout(start_year, start_month, months).unwrap();
        WordXml::new(Style::default()).render(&layout).unwrap()
    }

    fn cells(document: &str) -> Vec<&str> {
        document
            .split("<w:tc>")
            .skip(1)
            .map(|cell| cell.split("</w:tc>").next().unwrap())
            .collect()
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & \"c\">'d'"), "a&lt;b &amp; &quot;c&quot;&gt;&apos;d&apos;");
    }

    #[test]
    fn writer_rejects_mismatched_close() {
        let mut w = XmlWriter::new();
        w.begin("w:p", &[]);
        assert!(w.end("w:r").is_err());

        let mut w = XmlWriter::new();
        w.begin("w:p", &[]);
        assert!(w.finish().is_err());
    }

    #[test]
    fn package_structure() {
        let doc = render(2025, 2, 1);

        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<?mso-application progid=\"Word.Document\"?>"));
        assert!(doc.contains("pkg:name=\"/word/document.xml\""));
        assert!(doc.contains("pkg:name=\"/word/styles.xml\""));
        assert!(doc.contains("Target=\"word/document.xml\""));
        assert!(doc.ends_with("</pkg:package>"));
    }

    #[test]
    fn table_is_fixed_with_seven_columns() {
        let doc = render(2025, 2, 1);

        assert!(doc.contains("<w:tblW w:w=\"8064\" w:type=\"dxa\"/>"));
        assert!(doc.contains("<w:tblLayout w:type=\"fixed\"/>"));
        assert_eq!(doc.matches("<w:gridCol w:w=\"1152\"/>").count(), 7);
        assert_eq!(doc.matches("<w:tr>").count(), 5);
        assert_eq!(doc.matches("<w:cantSplit/>").count(), 5);
        assert_eq!(
            doc.matches("<w:trHeight w:val=\"576\" w:hRule=\"exact\"/>").count(),
            5
        );
        assert_eq!(cells(&doc).len(), 35);
    }

    #[test]
    fn default_run_properties() {
        let doc = render(2025, 2, 1);

        assert!(doc.contains("w:ascii=\"Calibri\""));
        assert!(doc.contains("<w:noProof/>"));
    }

    #[test]
    fn rotated_label_cell() {
        let doc = render(2025, 2, 1);
        let label = cells(&doc)[5];

        assert!(label.contains("<w:textDirection w:val=\"btLr\"/>"));
        assert!(label.contains("<w:vAlign w:val=\"bottom\"/>"));
        assert!(label.contains("<w:jc w:val=\"center\"/>"));
        assert!(label.contains("<w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>"));
        assert!(label.contains("<w:top w:val=\"nil\""));
        assert!(label.contains("<w:color w:val=\"A6A6A6\"/>"));
        assert!(label.contains(">Feb</w:t>"));
    }

    #[test]
    fn dedicated_label_cell() {
        let doc = render(2025, 6, 1);
        let label = cells(&doc)[0];

        assert!(!label.contains("w:textDirection"));
        assert!(!label.contains("w:val=\"single\""));
        assert!(label.contains("<w:vAlign w:val=\"bottom\"/>"));
        assert!(label.contains(">Jun</w:t>"));
    }

    #[test]
    fn day_cells() {
        let doc = render(2025, 2, 1);
        let cells = cells(&doc);

        // Feb 1 2025 is a Saturday, Feb 3 a Monday
        let saturday = cells[6];
        assert!(saturday.contains("w:fill=\"F2F2F2\""));
        assert!(saturday.contains(">1</w:t>"));
        assert!(saturday.contains("<w:t xml:space=\"preserve\"> </w:t>"));
        assert_eq!(saturday.matches("w:val=\"single\"").count(), 4);
        assert_eq!(saturday.matches("<w:p").count(), 2);

        let monday = cells[8];
        assert!(monday.contains(">3</w:t>"));
        assert!(!monday.contains("w:shd"));
    }

    #[test]
    fn empty_cells() {
        let doc = render(2025, 2, 1);
        let empty = cells(&doc)[0];

        assert!(!empty.contains("<w:r>"));
        assert!(!empty.contains("w:shd"));
        assert!(!empty.contains("w:val=\"single\""));
        assert_eq!(empty.matches("w:val=\"nil\"").count(), 4);
    }

    #[test]
    fn empty_layout_has_no_table() {
        let doc = render(2025, 2, 0);
        assert!(!doc.contains("<w:tbl>"));
        assert!(doc.contains("<w:body><w:p/></w:body>"));
    }

    #[test]
    fn custom_style() {
        let style = Style {
            font: "Futura & Co".to_owned(),
            weekend_fill: "FFEEDD".to_owned(),
            column_width: 1000,
            ..Style::default()
        };
        let layout = generate_layout(2025, 2, 1).unwrap();
        let doc = WordXml::new(style).render(&layout).unwrap();

        assert!(doc.contains("w:ascii=\"Futura &amp; Co\""));
        assert!(doc.contains("w:fill=\"FFEEDD\""));
        assert!(doc.contains("<w:tblW w:w=\"7000\" w:type=\"dxa\"/>"));
    }
}
