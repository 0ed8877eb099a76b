//! Cell data structures.
//!
//! - [`CellValue`] - raw value stored in a cell
//! - [`DataFormat`] - display format kind and its arguments
//! - [`Cell`] - value, formula text, explicit style, borders and merge state
//! - [`CellInput`] - parsed user input (value with detected format, or formula)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::address::{CellPosition, RangePosition};
use crate::style::{CellBorders, RangeStyle};

static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<neg>-)?(?<symbol>[$€£¥])(?<digits>[0-9][0-9,]*(\.[0-9]+)?)$")
        .expect("currency pattern")
});
static PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<number>-?[0-9]+(\.[0-9]+)?)%$").expect("percent pattern")
});
static THOUSANDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]{1,3}(,[0-9]{3})+(\.[0-9]+)?$").expect("thousands pattern")
});

/// The raw value held by a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Error(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Display format kind plus arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataFormat {
    #[default]
    General,
    Number {
        decimals: u8,
        thousands_separator: bool,
    },
    Percent {
        decimals: u8,
    },
    Currency {
        symbol: String,
        decimals: u8,
    },
    Text,
}

/// Tag naming the body type (button, checkbox, ...) a cell is drawn with.
/// The widgets themselves live outside this crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBody {
    pub kind: String,
}

impl CellBody {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

/// Value, formula and format of a cell: the part data actions back up.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellContent {
    pub value: Option<CellValue>,
    pub formula: Option<String>,
    pub format: DataFormat,
}

impl CellContent {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.formula.is_none() && self.format == DataFormat::General
    }
}

/// A cell in the grid.
///
/// Ordinary cells have `rowspan == colspan == 1`. A merge anchor carries the
/// span of the merge; every other cell of the merge has zero spans and points
/// back to the anchor through `merge_anchor`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: Option<CellValue>,
    /// Formula text without the leading `=`. Evaluation happens elsewhere.
    pub formula: Option<String>,
    pub format: DataFormat,
    pub style: Option<RangeStyle>,
    pub borders: CellBorders,
    pub body: Option<CellBody>,
    pub readonly: bool,
    pub rowspan: usize,
    pub colspan: usize,
    pub merge_anchor: Option<CellPosition>,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            value: None,
            formula: None,
            format: DataFormat::General,
            style: None,
            borders: CellBorders::default(),
            body: None,
            readonly: false,
            rowspan: 1,
            colspan: 1,
            merge_anchor: None,
        }
    }
}

impl Cell {
    pub fn new_value(value: CellValue) -> Cell {
        Cell {
            value: Some(value),
            ..Cell::default()
        }
    }

    pub fn is_merge_anchor(&self) -> bool {
        self.merge_anchor.is_none() && (self.rowspan > 1 || self.colspan > 1)
    }

    pub fn is_merge_interior(&self) -> bool {
        self.merge_anchor.is_some()
    }

    pub fn is_merged(&self) -> bool {
        self.is_merge_anchor() || self.is_merge_interior()
    }

    /// The merge this cell anchors, given its own position.
    pub fn merge_range(&self, pos: CellPosition) -> Option<RangePosition> {
        self.is_merge_anchor()
            .then(|| RangePosition::new(pos.row, pos.col, self.rowspan, self.colspan))
    }

    pub fn content(&self) -> CellContent {
        CellContent {
            value: self.value.clone(),
            formula: self.formula.clone(),
            format: self.format.clone(),
        }
    }

    pub fn set_content(&mut self, content: CellContent) {
        self.value = content.value;
        self.formula = content.formula;
        self.format = content.format;
    }

    pub fn has_data(&self) -> bool {
        self.value.is_some() || self.formula.is_some()
    }

    pub fn clear_data(&mut self) {
        self.value = None;
        self.formula = None;
    }

    /// Reset span fields to an unmerged cell.
    pub fn clear_span(&mut self) {
        self.rowspan = 1;
        self.colspan = 1;
        self.merge_anchor = None;
    }

    /// Whether the slot holding this cell can be released.
    pub fn is_default(&self) -> bool {
        self == &Cell::default()
    }

    /// Apply parsed input: formulas keep the current format, values bring
    /// their detected format unless the cell already has a non-general one.
    pub fn apply_input(&mut self, input: CellInput) {
        match input {
            CellInput::Empty => self.clear_data(),
            CellInput::Formula(formula) => {
                self.value = None;
                self.formula = Some(formula);
            }
            CellInput::Value(value, format) => {
                self.value = Some(value);
                self.formula = None;
                if self.format == DataFormat::General {
                    self.format = format;
                }
            }
        }
    }

    /// Text shown for the cell.
    pub fn display_text(&self) -> String {
        match (&self.value, &self.formula) {
            (Some(value), _) => format_value(value, &self.format),
            (None, Some(formula)) => format!("={}", formula),
            (None, None) => String::new(),
        }
    }
}

/// Parsed user input.
#[derive(Clone, Debug, PartialEq)]
pub enum CellInput {
    Empty,
    Formula(String),
    Value(CellValue, DataFormat),
}

impl CellInput {
    /// Parse user input.
    /// - Empty string or whitespace -> Empty
    /// - Starts with '=' -> Formula (without the '=')
    /// - Quoted string -> Text (without quotes)
    /// - `12%` -> Number 0.12 with Percent format
    /// - `$1,234.50` -> Number with Currency format
    /// - `1,234` -> Number with thousands separator
    /// - Valid number -> Number
    /// - TRUE/FALSE -> Bool
    /// - Otherwise -> Text
    pub fn parse(input: &str) -> CellInput {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellInput::Empty;
        }

        if let Some(formula) = trimmed.strip_prefix('=') {
            return CellInput::Formula(formula.trim().to_string());
        }

        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            let text = &trimmed[1..trimmed.len() - 1];
            return CellInput::Value(CellValue::Text(text.to_string()), DataFormat::Text);
        }

        if let Some(caps) = PERCENT.captures(trimmed)
            && let Ok(n) = caps["number"].parse::<f64>()
        {
            let decimals = decimals_of(&caps["number"]);
            return CellInput::Value(CellValue::Number(n / 100.0), DataFormat::Percent { decimals });
        }

        if let Some(caps) = CURRENCY.captures(trimmed) {
            let digits = caps["digits"].replace(',', "");
            if let Ok(n) = digits.parse::<f64>() {
                let n = if caps.name("neg").is_some() { -n } else { n };
                return CellInput::Value(
                    CellValue::Number(n),
                    DataFormat::Currency {
                        symbol: caps["symbol"].to_string(),
                        decimals: decimals_of(&digits),
                    },
                );
            }
        }

        if THOUSANDS.is_match(trimmed)
            && let Ok(n) = trimmed.replace(',', "").parse::<f64>()
        {
            return CellInput::Value(
                CellValue::Number(n),
                DataFormat::Number {
                    decimals: decimals_of(trimmed),
                    thousands_separator: true,
                },
            );
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            return CellInput::Value(CellValue::Number(n), DataFormat::General);
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "TRUE" => CellInput::Value(CellValue::Bool(true), DataFormat::General),
            "FALSE" => CellInput::Value(CellValue::Bool(false), DataFormat::General),
            _ => CellInput::Value(CellValue::Text(trimmed.to_string()), DataFormat::General),
        }
    }
}

fn decimals_of(number: &str) -> u8 {
    number
        .split_once('.')
        .map(|(_, frac)| frac.len().min(u8::MAX as usize) as u8)
        .unwrap_or(0)
}

/// Format a value for display under a data format.
pub fn format_value(value: &CellValue, format: &DataFormat) -> String {
    match value {
        CellValue::Number(n) => match format {
            DataFormat::General | DataFormat::Text => format_number(*n),
            DataFormat::Number {
                decimals,
                thousands_separator,
            } => {
                let text = format!("{:.*}", *decimals as usize, n);
                if *thousands_separator {
                    group_thousands(&text)
                } else {
                    text
                }
            }
            DataFormat::Percent { decimals } => format!("{:.*}%", *decimals as usize, n * 100.0),
            DataFormat::Currency { symbol, decimals } => {
                let text = group_thousands(&format!("{:.*}", *decimals as usize, n.abs()));
                if *n < 0.0 {
                    format!("-{}{}", symbol, text)
                } else {
                    format!("{}{}", symbol, text)
                }
            }
        },
        CellValue::Text(s) => s.clone(),
        CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::Error(e) => e.clone(),
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_detects_formats() {
        assert_eq!(CellInput::parse("  "), CellInput::Empty);
        assert_eq!(CellInput::parse("=A1+B1"), CellInput::Formula("A1+B1".to_string()));
        assert_eq!(
            CellInput::parse("12.5%"),
            CellInput::Value(CellValue::Number(0.125), DataFormat::Percent { decimals: 1 })
        );
        assert_eq!(
            CellInput::parse("$1,234.50"),
            CellInput::Value(
                CellValue::Number(1234.5),
                DataFormat::Currency {
                    symbol: "$".to_string(),
                    decimals: 2
                }
            )
        );
        assert_eq!(
            CellInput::parse("1,000"),
            CellInput::Value(
                CellValue::Number(1000.0),
                DataFormat::Number {
                    decimals: 0,
                    thousands_separator: true
                }
            )
        );
        assert_eq!(
            CellInput::parse("true"),
            CellInput::Value(CellValue::Bool(true), DataFormat::General)
        );
        assert_eq!(
            CellInput::parse("\"007\""),
            CellInput::Value(CellValue::Text("007".to_string()), DataFormat::Text)
        );
    }

    #[test]
    fn display_uses_format() {
        let mut cell = Cell::default();
        cell.apply_input(CellInput::parse("$1,234.50"));
        assert_eq!(cell.display_text(), "$1,234.50");

        cell.apply_input(CellInput::parse("=SUM(A1:A3)"));
        assert_eq!(cell.display_text(), "=SUM(A1:A3)");
    }

    #[test]
    fn default_cell_is_releasable() {
        let mut cell = Cell::new_value(CellValue::Number(1.0));
        assert!(!cell.is_default());
        cell.clear_data();
        assert!(cell.is_default());
    }
}
