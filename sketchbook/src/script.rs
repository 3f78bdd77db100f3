//! # Scripts
//!
//! A line-oriented feed of pointer and UI events, replayed against a fresh [`Canvas`]. One command
//! per line, arguments separated by whitespace, `# ` starts a comment:
//!
//! ```text
//! viewport 800 600
//! load photo.png        # relative to the script's directory
//! color #ff0000
//! size 4
//! down 10 10
//! move 10 10
//! move 50 40
//! up 50 40
//! preview threshold 128
//! accept
//! save out.png
//! ```

use std::path::{Path, PathBuf};

use sketchbook_core::{
    color::{Color, ColorParseError},
    filter::Filter,
    geom::Point,
    input::{PointerEvent, Tool},
    state::Canvas,
};

use crate::{flatten, preview::FilterPreview, settings::Settings};

#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
enum Verb {
    Viewport,
    Load,
    Pen,
    Eraser,
    Color,
    Size,
    Down,
    Move,
    Up,
    Hover,
    Erase,
    Undo,
    Clear,
    Negative,
    Threshold,
    Rgb,
    Restore,
    Preview,
    Accept,
    Cancel,
    Save,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    Viewport(u32, u32),
    Load(PathBuf),
    Tool(Tool),
    Color(Color),
    Size(u32),
    Pointer(PointerEvent),
    /// Erase at a point, with the tool size as radius if none is given.
    Erase(Point, Option<u32>),
    Undo,
    Clear,
    Filter(Filter),
    Restore,
    Preview(Filter),
    Accept,
    Cancel,
    Save(PathBuf),
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("unknown command {0:?}")]
    UnknownVerb(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("unexpected argument {0:?}")]
    TrailingArgument(String),
    #[error("bad number {text:?} for {name}: {source}")]
    BadNumber {
        name: &'static str,
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error(transparent)]
    BadColor(#[from] ColorParseError),
    #[error("cannot preview {0:?}, expected negative, threshold or rgb")]
    BadPreview(String),
}

#[derive(thiserror::Error, Debug)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: ParseError,
}

/// Whitespace separated arguments after the verb.
struct Args<'a> {
    args: smallvec::SmallVec<[&'a str; 4]>,
    next: usize,
}
impl<'a> Args<'a> {
    fn new(rest: &'a str) -> Self {
        Self {
            args: rest.split_whitespace().collect(),
            next: 0,
        }
    }
    fn optional(&mut self) -> Option<&'a str> {
        let arg = self.args.get(self.next).copied();
        self.next += 1;
        arg
    }
    fn required(&mut self, name: &'static str) -> Result<&'a str, ParseError> {
        self.optional().ok_or(ParseError::MissingArgument(name))
    }
    fn number<T>(&mut self, name: &'static str) -> Result<T, ParseError>
    where
        T: std::str::FromStr<Err = std::num::ParseIntError>,
    {
        let text = self.required(name)?;
        text.parse().map_err(|source| ParseError::BadNumber {
            name,
            text: text.to_owned(),
            source,
        })
    }
    fn point(&mut self) -> Result<Point, ParseError> {
        Ok(Point::new(self.number("x")?, self.number("y")?))
    }
    /// Fail if anything is left over.
    fn finish(&self) -> Result<(), ParseError> {
        match self.args.get(self.next) {
            Some(extra) => Err(ParseError::TrailingArgument((*extra).to_owned())),
            None => Ok(()),
        }
    }
}

fn parse_filter(args: &mut Args<'_>) -> Result<Filter, ParseError> {
    let name = args.required("filter")?;
    match name.parse::<Verb>() {
        Ok(Verb::Negative) => Ok(Filter::Negative),
        Ok(Verb::Threshold) => Ok(Filter::threshold(args.number("threshold")?)),
        Ok(Verb::Rgb) => Ok(Filter::rgb_offset(
            args.number("red offset")?,
            args.number("green offset")?,
            args.number("blue offset")?,
        )),
        _ => Err(ParseError::BadPreview(name.to_owned())),
    }
}

/// Comments start with a `#` at the beginning of the line or followed by whitespace, so that
/// `#RRGGBB` colors are left alone.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    line.match_indices('#')
        .find(|&(idx, _)| {
            line[idx + 1..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace)
        })
        .map_or(line, |(idx, _)| &line[..idx])
}

/// Parse one line. `None` for blank and comment-only lines.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = strip_comment(line).trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));
    if verb.is_empty() {
        return Ok(None);
    }
    let verb: Verb = verb
        .parse()
        .map_err(|_| ParseError::UnknownVerb(verb.to_owned()))?;

    let mut args = Args::new(rest);
    let command = match verb {
        // Paths take the rest of the line, spaces and all.
        Verb::Load | Verb::Save => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("path"));
            }
            let path = PathBuf::from(rest);
            return Ok(Some(if verb == Verb::Load {
                Command::Load(path)
            } else {
                Command::Save(path)
            }));
        }
        Verb::Viewport => Command::Viewport(args.number("width")?, args.number("height")?),
        Verb::Pen => Command::Tool(Tool::Pen),
        Verb::Eraser => Command::Tool(Tool::Eraser),
        Verb::Color => Command::Color(args.required("color")?.parse()?),
        Verb::Size => Command::Size(args.number("size")?),
        Verb::Down => Command::Pointer(PointerEvent::Down(args.point()?)),
        Verb::Move => Command::Pointer(PointerEvent::Move(args.point()?)),
        Verb::Up => Command::Pointer(PointerEvent::Up(args.point()?)),
        Verb::Hover => Command::Pointer(PointerEvent::Hover(args.point()?)),
        Verb::Erase => {
            let point = args.point()?;
            let radius = if args.args.len() > args.next {
                Some(args.number("radius")?)
            } else {
                None
            };
            Command::Erase(point, radius)
        }
        Verb::Undo => Command::Undo,
        Verb::Clear => Command::Clear,
        Verb::Negative => Command::Filter(Filter::Negative),
        Verb::Threshold => Command::Filter(Filter::threshold(args.number("threshold")?)),
        Verb::Rgb => Command::Filter(Filter::rgb_offset(
            args.number("red offset")?,
            args.number("green offset")?,
            args.number("blue offset")?,
        )),
        Verb::Restore => Command::Restore,
        Verb::Preview => Command::Preview(parse_filter(&mut args)?),
        Verb::Accept => Command::Accept,
        Verb::Cancel => Command::Cancel,
    };
    args.finish()?;
    Ok(Some(command))
}

/// Parse a whole script, with 1-based line numbers. Stops at the first bad line.
pub fn parse(text: &str) -> Result<Vec<(usize, Command)>, ScriptError> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line_number = idx + 1;
            match parse_line(line) {
                Ok(command) => command.map(|command| Ok((line_number, command))),
                Err(source) => Some(Err(ScriptError {
                    line: line_number,
                    source,
                })),
            }
        })
        .collect()
}

/// Replays commands against its own canvas.
pub struct Runner<'s> {
    canvas: Canvas,
    viewport: (u32, u32),
    base_dir: PathBuf,
    preview: Option<FilterPreview>,
    settings: &'s Settings,
}
impl<'s> Runner<'s> {
    /// Relative paths in commands resolve against `base_dir`.
    #[must_use]
    pub fn new(settings: &'s Settings, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            canvas: Canvas::with_brush(settings.brush()),
            viewport: settings.viewport(),
            base_dir: base_dir.into(),
            preview: None,
            settings,
        }
    }
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.base_dir.join(path)
        }
    }
    /// Run every command in order, stopping at the first hard failure.
    pub fn run(&mut self, commands: &[(usize, Command)]) -> anyhow::Result<()> {
        use anyhow::Context;
        for (line, command) in commands {
            self.execute(command)
                .with_context(|| format!("line {line}: {command:?}"))?;
        }
        Ok(())
    }
    pub fn execute(&mut self, command: &Command) -> anyhow::Result<()> {
        // Dialogs are modal, anything else implicitly closes one.
        if !matches!(
            command,
            Command::Preview(_) | Command::Accept | Command::Cancel
        ) {
            if let Some(preview) = self.preview.take() {
                preview.accept();
            }
        }
        match command {
            Command::Viewport(w, h) => self.viewport = (*w, *h),
            Command::Load(path) => {
                let path = self.resolve(path);
                // Not fatal, carry on with whatever was there.
                if let Err(e) = self.canvas.load_image_path(&path) {
                    log::error!("Failed to load image {path:?}: {e}");
                }
            }
            Command::Tool(tool) => self.canvas.set_tool(*tool),
            Command::Color(color) => self.canvas.set_color(*color),
            Command::Size(size) => self.canvas.set_tool_size(*size),
            Command::Pointer(event) => self.canvas.handle(*event),
            Command::Erase(point, radius) => {
                let radius = radius.unwrap_or(self.canvas.tool_size());
                if self.canvas.erase_at(*point, radius).is_none() {
                    log::trace!("Nothing to erase at {point:?}");
                }
            }
            Command::Undo => self.canvas.undo(),
            Command::Clear => self.canvas.clear(),
            Command::Filter(filter) => self.canvas.apply_filter(*filter),
            Command::Restore => {
                if self.canvas.has_original() {
                    self.canvas.restore_original();
                } else {
                    log::warn!("No image loaded, nothing to restore.");
                }
            }
            Command::Preview(filter) => self.preview(*filter),
            Command::Accept => match self.preview.take() {
                Some(preview) => {
                    preview.accept();
                }
                None => log::warn!("Accept without an open preview."),
            },
            Command::Cancel => match self.preview.take() {
                Some(preview) => preview.cancel(&mut self.canvas),
                None => log::warn!("Cancel without an open preview."),
            },
            Command::Save(path) => {
                let path = self.resolve(path);
                let frame = self.canvas.render_frame(self.viewport.0, self.viewport.1)?;
                flatten::save(&frame, &path, &self.settings.snapshot_extension)?;
            }
        }
        Ok(())
    }
    /// Previewing the same kind of filter again adjusts the open dialog. A different kind
    /// accepts it and opens a new one.
    fn preview(&mut self, filter: Filter) {
        let kind: &'static str = filter.into();
        let same_dialog = self
            .preview
            .as_ref()
            .and_then(FilterPreview::last)
            .is_some_and(|last| <&'static str>::from(last) == kind);
        if !same_dialog {
            if let Some(previous) = self.preview.take() {
                previous.accept();
            }
        }
        self.preview
            .get_or_insert_with(|| FilterPreview::open(&self.canvas))
            .preview(&mut self.canvas, filter);
    }
}
