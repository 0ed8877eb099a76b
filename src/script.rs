//! Command scripts: one worksheet command per line.
//!
//! Addresses use A1 notation. Row and column bands accept `3`, `3:5`, `B` or
//! `B:D`. Lines starting with `#` and blank lines are ignored.
//!
//! ```text
//! set A1 =SUM(B1:B3)
//! style 2:2 bold fill=#FFFF00
//! border A1:C3 outline thick #000000
//! delete-rows 4 2
//! print A1:C5
//! ```

use std::io::Write;
use std::sync::LazyLock;

use gridstore_core::action::{
    AddHighlightRange, AddNamedRange, AddOutline, CopyRange, InsertAction, MergeAction, MoveRange,
    RemoveAction, RemoveNamedRange, RemoveRangeBorders, RemoveRangeData, RemoveRangeStyle,
    ResizeHeaders, SetCellData, SetHeadersVisible, SetRangeBorders, SetRangeStyle, UnmergeAction,
};
use gridstore_core::grid::{
    Axis, BorderLine, BorderPositions, BorderSide, CellPosition, Color, HighlightRange,
    HorizontalAlign, NamedRange, RangePosition, RangeStyle, StyleFlags, VerticalAlign,
};
use gridstore_core::{Action, ActionEngine};
use regex::Regex;

use crate::dump::write_markdown;
use crate::error::{Result, ScriptError};

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z-]+)(?:=(.+))?$").expect("valid style attribute regex"));

/// A parsed script line.
#[derive(Debug)]
pub enum Command {
    Do(Action),
    Undo,
    Redo,
    Print(RangePosition),
}

type ParseResult<T> = std::result::Result<T, String>;

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> ParseResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();
    let verb = verb.to_ascii_lowercase();

    let command = match verb.as_str() {
        "set" => {
            let (pos, text) = match rest.split_once(char::is_whitespace) {
                Some((pos, text)) => (pos, text.trim_start()),
                None => (rest, ""),
            };
            Command::Do(SetCellData::from_text(cell(pos)?, text).into())
        }
        "clear" => {
            expect_args(&args, 1, "clear RANGE")?;
            Command::Do(RemoveRangeData::new(range(args[0])?).into())
        }
        "style" => {
            if args.len() < 2 {
                return Err("usage: style RANGE ATTR[=VALUE]...".to_string());
            }
            Command::Do(SetRangeStyle::new(range(args[0])?, style(&args[1..])?).into())
        }
        "unstyle" => {
            if args.is_empty() {
                return Err("usage: unstyle RANGE [ATTR]...".to_string());
            }
            let flags = if args.len() == 1 {
                StyleFlags::all()
            } else {
                args[1..]
                    .iter()
                    .map(|name| style_flag(name))
                    .collect::<ParseResult<StyleFlags>>()?
            };
            Command::Do(RemoveRangeStyle::new(range(args[0])?, flags).into())
        }
        "border" => parse_border(&args)?,
        "insert-rows" | "insert-cols" | "delete-rows" | "delete-cols" => {
            expect_args(&args, 2, &format!("{verb} AT COUNT"))?;
            let axis = if verb.ends_with("rows") { Axis::Row } else { Axis::Column };
            let at = index(axis, args[0])?;
            let count = number::<usize>(args[1])?;
            if verb.starts_with("insert") {
                Command::Do(InsertAction::new(axis, at, count).into())
            } else {
                Command::Do(RemoveAction::new(axis, at, count).into())
            }
        }
        "merge" => {
            expect_args(&args, 1, "merge RANGE")?;
            Command::Do(MergeAction::new(range(args[0])?).into())
        }
        "unmerge" => {
            expect_args(&args, 1, "unmerge RANGE")?;
            Command::Do(UnmergeAction::new(range(args[0])?).into())
        }
        "move" => {
            expect_args(&args, 2, "move RANGE CELL")?;
            Command::Do(MoveRange::new(range(args[0])?, cell(args[1])?).into())
        }
        "copy" => {
            expect_args(&args, 2, "copy RANGE CELL")?;
            Command::Do(CopyRange::new(range(args[0])?, cell(args[1])?).into())
        }
        "name" => {
            expect_args(&args, 2, "name NAME RANGE")?;
            Command::Do(AddNamedRange::new(NamedRange::new(args[0], range(args[1])?)).into())
        }
        "unname" => {
            expect_args(&args, 1, "unname NAME")?;
            Command::Do(RemoveNamedRange::new(args[0]).into())
        }
        "highlight" => {
            expect_args(&args, 3, "highlight NAME RANGE COLOR")?;
            let highlight = HighlightRange::new(args[0], range(args[1])?, color(args[2])?);
            Command::Do(AddHighlightRange::new(highlight).into())
        }
        "resize-rows" | "resize-cols" => {
            expect_args(&args, 2, &format!("{verb} BAND SIZE"))?;
            let axis = if verb == "resize-rows" { Axis::Row } else { Axis::Column };
            let (start, count) = band(axis, args[0])?;
            Command::Do(ResizeHeaders::new(axis, start, count, number(args[1])?).into())
        }
        "hide-rows" | "show-rows" => {
            expect_args(&args, 1, &format!("{verb} BAND"))?;
            let (start, count) = band(Axis::Row, args[0])?;
            Command::Do(SetHeadersVisible::new(Axis::Row, start, count, verb == "show-rows").into())
        }
        "group-rows" => {
            expect_args(&args, 1, "group-rows BAND")?;
            let (start, count) = band(Axis::Row, args[0])?;
            Command::Do(AddOutline::new(Axis::Row, start, count).into())
        }
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "print" => {
            expect_args(&args, 1, "print RANGE")?;
            Command::Print(range(args[0])?)
        }
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(command))
}

fn expect_args(args: &[&str], count: usize, usage: &str) -> ParseResult<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(format!("usage: {}", usage))
    }
}

fn cell(text: &str) -> ParseResult<CellPosition> {
    CellPosition::parse_a1(text).ok_or_else(|| format!("invalid cell '{}'", text))
}

fn range(text: &str) -> ParseResult<RangePosition> {
    RangePosition::parse(text).ok_or_else(|| format!("invalid range '{}'", text))
}

fn number<T: std::str::FromStr>(text: &str) -> ParseResult<T> {
    text.parse().map_err(|_| format!("invalid number '{}'", text))
}

fn color(text: &str) -> ParseResult<Color> {
    Color::parse_hex(text).ok_or_else(|| format!("invalid color '{}'", text))
}

/// A band of rows (`3`, `3:5`) or columns (`B`, `B:D`) as `(start, count)`.
fn band(axis: Axis, text: &str) -> ParseResult<(usize, usize)> {
    let single = if text.contains(':') {
        text.to_string()
    } else {
        format!("{text}:{text}")
    };
    let parsed = range(&single)?;
    let expected = match axis {
        Axis::Row => RangePosition::full_rows(parsed.row, parsed.rows),
        Axis::Column => RangePosition::full_columns(parsed.col, parsed.cols),
    };
    if parsed != expected {
        return Err(format!("'{}' is not a {} band", text, axis.name()));
    }
    Ok(axis.span(parsed))
}

fn index(axis: Axis, text: &str) -> ParseResult<usize> {
    Ok(band(axis, text)?.0)
}

fn style(attrs: &[&str]) -> ParseResult<RangeStyle> {
    let mut style = RangeStyle::new();
    for attr in attrs {
        let caps = STYLE_ATTR
            .captures(attr)
            .ok_or_else(|| format!("invalid style attribute '{}'", attr))?;
        let name = &caps[1];
        let value = caps.get(2).map(|m| m.as_str());
        let flag = |value: Option<&str>| match value {
            None | Some("on") | Some("true") => Ok(true),
            Some("off") | Some("false") => Ok(false),
            Some(other) => Err(format!("invalid switch '{}' for {}", other, name)),
        };
        let required = || value.ok_or_else(|| format!("{} needs a value", name));
        style = match name {
            "bold" => style.with_bold(flag(value)?),
            "italic" => style.with_italic(flag(value)?),
            "underline" => style.with_underline(flag(value)?),
            "strike" => style.with_strikethrough(flag(value)?),
            "wrap" => style.with_text_wrap(flag(value)?),
            "font" => style.with_font_name(Some(required()?.to_string())),
            "size" => {
                let points: f64 = number(required()?)?;
                style.with_font_size(Some((points * 100.0).round() as u16))
            }
            "color" => style.with_text_color(Some(color(required()?)?)),
            "fill" => style.with_back_color(Some(color(required()?)?)),
            "align" => style.with_horizontal_align(match required()? {
                "general" => HorizontalAlign::General,
                "left" => HorizontalAlign::Left,
                "center" => HorizontalAlign::Center,
                "right" => HorizontalAlign::Right,
                other => return Err(format!("invalid alignment '{}'", other)),
            }),
            "valign" => style.with_vertical_align(match required()? {
                "top" => VerticalAlign::Top,
                "middle" => VerticalAlign::Middle,
                "bottom" => VerticalAlign::Bottom,
                other => return Err(format!("invalid vertical alignment '{}'", other)),
            }),
            "indent" => style.with_indent(number(required()?)?),
            "rotate" => style.with_rotation(number(required()?)?),
            other => return Err(format!("unknown style attribute '{}'", other)),
        };
    }
    Ok(style)
}

fn style_flag(name: &str) -> ParseResult<StyleFlags> {
    Ok(match name {
        "bold" => StyleFlags::BOLD,
        "italic" => StyleFlags::ITALIC,
        "underline" => StyleFlags::UNDERLINE,
        "strike" => StyleFlags::STRIKETHROUGH,
        "wrap" => StyleFlags::TEXT_WRAP,
        "font" => StyleFlags::FONT_NAME,
        "size" => StyleFlags::FONT_SIZE,
        "color" => StyleFlags::TEXT_COLOR,
        "fill" => StyleFlags::BACK_COLOR,
        "align" => StyleFlags::HORIZONTAL_ALIGN,
        "valign" => StyleFlags::VERTICAL_ALIGN,
        "indent" => StyleFlags::INDENT,
        "rotate" => StyleFlags::ROTATION,
        other => return Err(format!("unknown style attribute '{}'", other)),
    })
}

/// `border RANGE POSITIONS [LINE] [COLOR]`, or `border RANGE POSITIONS none`.
fn parse_border(args: &[&str]) -> ParseResult<Command> {
    if !(2..=4).contains(&args.len()) {
        return Err("usage: border RANGE POSITIONS [LINE|none] [COLOR]".to_string());
    }
    let target = range(args[0])?;
    let positions = args[1]
        .split(',')
        .map(|name| {
            Ok(match name {
                "all" => BorderPositions::all(),
                "outline" => BorderPositions::OUTLINE,
                "inside" => BorderPositions::INSIDE,
                "top" => BorderPositions::TOP,
                "bottom" => BorderPositions::BOTTOM,
                "left" => BorderPositions::LEFT,
                "right" => BorderPositions::RIGHT,
                "horizontal" => BorderPositions::INSIDE_HORIZONTAL,
                "vertical" => BorderPositions::INSIDE_VERTICAL,
                other => return Err(format!("unknown border position '{}'", other)),
            })
        })
        .collect::<ParseResult<BorderPositions>>()?;

    if args.get(2) == Some(&"none") {
        return Ok(Command::Do(RemoveRangeBorders::new(target, positions).into()));
    }
    let mut side = BorderSide::default();
    for arg in &args[2..] {
        if arg.starts_with('#') {
            side.color = color(arg)?;
        } else {
            side.line = match *arg {
                "solid" => BorderLine::Solid,
                "dashed" => BorderLine::Dashed,
                "dotted" => BorderLine::Dotted,
                "double" => BorderLine::Double,
                "thick" => BorderLine::Thick,
                other => return Err(format!("unknown border line '{}'", other)),
            };
        }
    }
    Ok(Command::Do(SetRangeBorders::new(target, positions, side).into()))
}

/// Runs commands against one engine, writing `print` output to `out`.
pub struct Runner<W: Write> {
    engine: ActionEngine,
    out: W,
}

impl<W: Write> Runner<W> {
    pub fn new(engine: ActionEngine, out: W) -> Self {
        Self { engine, out }
    }

    pub fn engine(&self) -> &ActionEngine {
        &self.engine
    }

    pub fn into_parts(self) -> (ActionEngine, W) {
        (self.engine, self.out)
    }

    /// Run one line; `line` is its 1-based number for error reports.
    pub fn run_line(&mut self, line: usize, text: &str) -> Result<()> {
        let command = parse_command(text).map_err(|message| ScriptError::Parse { line, message })?;
        let Some(command) = command else {
            return Ok(());
        };
        let outcome = match command {
            Command::Do(action) => self.engine.do_action(action),
            Command::Undo => self.engine.undo(),
            Command::Redo => self.engine.redo(),
            Command::Print(range) => {
                write_markdown(&mut self.out, self.engine.sheet(), range)?;
                Ok(())
            }
        };
        outcome.map_err(|source| ScriptError::Sheet { line, source })
    }

    /// Run every line of `script`, stopping at the first failure.
    pub fn run_script(&mut self, script: &str) -> Result<()> {
        for (index, text) in script.lines().enumerate() {
            self.run_line(index + 1, text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstore_core::EngineConfig;
    use gridstore_core::grid::CellValue;

    fn runner() -> Runner<Vec<u8>> {
        let engine = ActionEngine::with_config(EngineConfig::with_size(10, 10)).unwrap();
        Runner::new(engine, Vec::new())
    }

    #[test]
    fn test_band_parsing() {
        assert_eq!(band(Axis::Row, "3"), Ok((2, 1)));
        assert_eq!(band(Axis::Row, "3:5"), Ok((2, 3)));
        assert_eq!(band(Axis::Column, "B:D"), Ok((1, 3)));
        assert!(band(Axis::Row, "B").is_err());
        assert!(band(Axis::Column, "A1:B2").is_err());
    }

    #[test]
    fn test_style_attributes() {
        let parsed = style(&["bold", "italic=off", "size=11.5", "fill=#FF0000"]).unwrap();
        assert_eq!(
            parsed,
            RangeStyle::new()
                .with_bold(true)
                .with_italic(false)
                .with_font_size(Some(1150))
                .with_back_color(Some(Color::rgb(255, 0, 0)))
        );
        assert!(style(&["size"]).is_err());
        assert!(style(&["sparkle"]).is_err());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        assert!(parse_command("  # note").unwrap().is_none());
        assert!(parse_command("").unwrap().is_none());
    }

    #[test]
    fn test_set_keeps_spaces_in_text() {
        let mut runner = runner();
        runner.run_line(1, "set B2 hello   world").unwrap();
        let cell = runner.engine().sheet().cell(CellPosition::new(1, 1)).unwrap();
        assert_eq!(cell.value, Some(CellValue::Text("hello   world".into())));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let mut runner = runner();
        let err = runner.run_script("set A1 1\n\nfrobnicate A1").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err, ScriptError::Parse { .. }));

        let err = runner.run_script("set A1 1\ndelete-cols A 10").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err, ScriptError::Sheet { ref source, .. } if source.is_structural_limit()));
    }

    #[test]
    fn test_oversized_insert_is_a_sheet_error() {
        let mut runner = runner();
        let err = runner.run_line(1, "insert-rows 3 18446744073709551615").unwrap_err();
        assert!(matches!(err, ScriptError::Sheet { ref source, .. } if source.is_structural_limit()));
        assert_eq!(runner.engine().sheet().row_count(), 10);
        assert!(!runner.engine().can_undo());
    }

    #[test]
    fn test_print_after_undo() {
        let mut runner = runner();
        runner
            .run_script("set A1 1\nset A2 2\ninsert-rows 2 1\nundo\nprint A1:A2")
            .unwrap();
        let (_, out) = runner.into_parts();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "|   | A |\n|---|---|\n| 1 | 1 |\n| 2 | 2 |\n"
        );
    }
}
