use derive_more::Display;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::layout::CalendarLayout;

mod text;
mod wordml;

pub use text::TextPreview;
pub use wordml::WordXml;

/// Turns a finished layout into the bytes of an output document.
pub trait Renderer {
    fn render(&self, layout: &CalendarLayout) -> Result<String>;
}

/// Concrete look of the rendered calendar. Colors are RGB hex strings,
/// widths and heights are in twentieths of a point (dxa), font sizes in
/// half-points.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Style {
    pub font: String,
    pub font_size: u32,
    pub muted_color: String,
    pub weekend_fill: String,
    pub column_width: u32,
    pub row_height: u32,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            font: "Calibri".to_owned(),
            font_size: 16,
            muted_color: "A6A6A6".to_owned(),
            weekend_fill: "F2F2F2".to_owned(),
            column_width: 1152,
            row_height: 576,
        }
    }
}

impl Style {
    pub fn table_width(&self) -> u32 {
        self.column_width * crate::calendar::DAYS_PER_WEEK as u32
    }
}

#[derive(Clone, Copy, Debug, Display, DeserializeFromStr, PartialEq, Eq)]
pub enum OutputFormat {
    #[display(fmt = "word-xml")]
    WordXml,
    #[display(fmt = "text")]
    Text,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::WordXml
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "word-xml" | "wordxml" | "xml" => Ok(OutputFormat::WordXml),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(Error::invalid_argument(&format!(
                "unknown output format '{}' (expected 'word-xml' or 'text')",
                s
            ))),
        }
    }
}

impl OutputFormat {
    pub fn renderer(&self, style: &Style) -> Box<dyn Renderer> {
        match self {
            OutputFormat::WordXml => Box::new(WordXml::new(style.clone())),
            OutputFormat::Text => Box::new(TextPreview::default()),
        }
    }
}

/// Writes `contents` to `path`, or to stdout if `path` is `-`.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if path == Path::new("-") {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(contents.as_bytes())?;
        handle.flush()?;
    } else {
        fs::write(path, contents)?;
        log::info!("Wrote {} bytes to {}", contents.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_output_format() {
        assert_eq!("word-xml".parse::<OutputFormat>().unwrap(), OutputFormat::WordXml);
        assert_eq!("XML".parse::<OutputFormat>().unwrap(), OutputFormat::WordXml);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("pdf".parse::<OutputFormat>().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn output_format_display_parses_back() {
        for format in &[OutputFormat::WordXml, OutputFormat::Text] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn default_table_width() {
        assert_eq!(Style::default().table_width(), 8064);
    }

    #[test]
    fn write_output_to_file() {
        let path = std::env::temp_dir().join(format!("wallcal-test-{}.txt", std::process::id()));
        write_output(&path, "hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        fs::remove_file(&path).unwrap();
    }
}
