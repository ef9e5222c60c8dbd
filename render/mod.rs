/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Display-list vocabulary and its text form.
//!
//! A display list is the ordered set of drawing commands for one frame. Its
//! serialization is line based: one command per line, a blank line after each
//! destination, wrapped in `Clip` / `UNClip`. All numbers are integers in
//! surface pixels except the text scale, so the text is byte-for-byte stable.
//! Labels are written with `\\`, `\"`, `\n` and `\r` escapes so each command
//! stays on its own line.

use std::fmt;
use std::str::FromStr;

use euclid::default::{Point2D, Rect, Size2D};

use crate::scene::{ActionStyle, EndStyle};

pub mod builder;
pub mod palette;

pub use builder::build_display_list;
pub use palette::{ColorSlot, Palette};

pub const DRAW_ACTION_LEVEL: i32 = 21;
pub const DRAW_SCREEN_LABEL_LEVEL: i32 = 22;
pub const DRAW_ICON_LEVEL: i32 = 23;
pub const DRAW_NAV_SCREEN_LEVEL: i32 = 24;
pub const DRAW_ACTION_HANDLE_LEVEL: i32 = 25;

pub type SurfaceRect = Rect<i32>;

/// ARGB color, printed as `aarrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const fn opaque(rgb: u32) -> Self {
        Color(0xff00_0000 | (rgb & 0x00ff_ffff))
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for Color {
    type Err = DisplayListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 {
            return Err(malformed(s));
        }
        u32::from_str_radix(s, 16).map(Color).map_err(|_| malformed(s))
    }
}

/// Font in the `java.awt.Font[...]` notation the display-list text uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub family: String,
    pub name: String,
    pub style: String,
    pub size: i32,
}

impl FontDescriptor {
    pub fn dialog(size: i32) -> Self {
        Self {
            family: "Dialog".to_string(),
            name: "Default".to_string(),
            style: "plain".to_string(),
            size,
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "java.awt.Font[family={},name={},style={},size={}]",
            self.family, self.name, self.style, self.size
        )
    }
}

impl FromStr for FontDescriptor {
    type Err = DisplayListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("java.awt.Font[")
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| malformed(s))?;
        let mut font = FontDescriptor::dialog(0);
        for pair in body.split(',') {
            let (key, value) = pair.split_once('=').ok_or_else(|| malformed(s))?;
            match key {
                "family" => font.family = value.to_string(),
                "name" => font.name = value.to_string(),
                "style" => font.style = value.to_string(),
                "size" => font.size = int(value)?,
                _ => return Err(malformed(s)),
            }
        }
        Ok(font)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    StartDestination,
    DeepLink,
}

impl IconKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IconKind::StartDestination => "START_DESTINATION",
            IconKind::DeepLink => "DEEPLINK",
        }
    }
}

/// View scale as printed in text regions: always with a fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(pub f64);

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clip {
        rect: SurfaceRect,
    },
    Unclip,
    ComponentBackground {
        rect: SurfaceRect,
        stroke: i32,
        compact: bool,
    },
    ComponentFrame {
        rect: SurfaceRect,
        stroke: i32,
        compact: bool,
    },
    NavScreen {
        level: i32,
        rect: SurfaceRect,
    },
    TextRegion {
        rect: SurfaceRect,
        padding: i32,
        text_height: i32,
        compact: bool,
        bold: bool,
        left_margin: i32,
        right_margin: i32,
        font_size: i32,
        scale: Scale,
        text: String,
    },
    Action {
        level: i32,
        style: ActionStyle,
        source: SurfaceRect,
        destination: SurfaceRect,
        end: EndStyle,
    },
    ActionHandle {
        level: i32,
        x: i32,
        y: i32,
        inner_radius: i32,
        outer_radius: i32,
        frame: Color,
        background: Color,
    },
    Icon {
        level: i32,
        rect: SurfaceRect,
        icon: IconKind,
    },
    ScreenLabel {
        level: i32,
        x: i32,
        y: i32,
        color: Color,
        font: FontDescriptor,
        text: String,
    },
}

struct Commas(SurfaceRect);

impl fmt::Display for Commas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rect { origin, size } = self.0;
        write!(f, "{},{},{},{}", origin.x, origin.y, size.width, size.height)
    }
}

/// Label text with backslash escapes for the characters that would break a line.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '\\' => f.write_str("\\\\")?,
                '"' => f.write_str("\\\"")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                _ => fmt::Write::write_char(f, ch)?,
            }
        }
        Ok(())
    }
}

fn unescape(text: &str) -> Result<String, DisplayListError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            _ => return Err(malformed(text)),
        }
    }
    Ok(out)
}

struct Crosses(SurfaceRect);

impl fmt::Display for Crosses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rect { origin, size } = self.0;
        write!(f, "{}x{}x{}x{}", origin.x, origin.y, size.width, size.height)
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::Clip { rect } => write!(f, "Clip,{}", Commas(*rect)),
            DrawCommand::Unclip => write!(f, "UNClip"),
            DrawCommand::ComponentBackground {
                rect,
                stroke,
                compact,
            } => write!(f, "DrawComponentBackground,{},{stroke},{compact}", Commas(*rect)),
            DrawCommand::ComponentFrame {
                rect,
                stroke,
                compact,
            } => write!(f, "DrawComponentFrame,{},{stroke},{compact}", Commas(*rect)),
            DrawCommand::NavScreen { level, rect } => {
                write!(f, "DrawNavScreen,{level},{}", Commas(*rect))
            }
            DrawCommand::TextRegion {
                rect,
                padding,
                text_height,
                compact,
                bold,
                left_margin,
                right_margin,
                font_size,
                scale,
                text,
            } => write!(
                f,
                "DrawTextRegion,{},{padding},{text_height},{compact},{bold},{left_margin},{right_margin},{font_size},{scale},\"{}\"",
                Commas(*rect),
                Escaped(text)
            ),
            DrawCommand::Action {
                level,
                style,
                source,
                destination,
                end,
            } => write!(
                f,
                "DrawAction,{level},{},{},{},{}",
                style.as_str(),
                Crosses(*source),
                Crosses(*destination),
                end.as_str()
            ),
            DrawCommand::ActionHandle {
                level,
                x,
                y,
                inner_radius,
                outer_radius,
                frame,
                background,
            } => write!(
                f,
                "DrawActionHandle,{level},{x},{y},{inner_radius},{outer_radius},{frame},{background}"
            ),
            DrawCommand::Icon { level, rect, icon } => {
                write!(f, "DrawIcon,{level},{},{}", Crosses(*rect), icon.as_str())
            }
            DrawCommand::ScreenLabel {
                level,
                x,
                y,
                color,
                font,
                text,
            } => write!(f, "DrawScreenLabel,{level},{x},{y},{color},{font},{}", Escaped(text)),
        }
    }
}

impl FromStr for DrawCommand {
    type Err = DisplayListError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, rest) = line.split_once(',').unwrap_or((line, ""));
        let command = match name {
            "UNClip" if rest.is_empty() => DrawCommand::Unclip,
            "Clip" => {
                let fields = fields(rest, 4)?;
                DrawCommand::Clip {
                    rect: comma_rect(&fields)?,
                }
            }
            "DrawComponentBackground" | "DrawComponentFrame" => {
                let fields = fields(rest, 6)?;
                let rect = comma_rect(&fields[..4])?;
                let stroke = int(fields[4])?;
                let compact = boolean(fields[5])?;
                if name == "DrawComponentBackground" {
                    DrawCommand::ComponentBackground {
                        rect,
                        stroke,
                        compact,
                    }
                } else {
                    DrawCommand::ComponentFrame {
                        rect,
                        stroke,
                        compact,
                    }
                }
            }
            "DrawNavScreen" => {
                let fields = fields(rest, 5)?;
                DrawCommand::NavScreen {
                    level: int(fields[0])?,
                    rect: comma_rect(&fields[1..])?,
                }
            }
            "DrawTextRegion" => {
                let fields: Vec<&str> = rest.splitn(13, ',').collect();
                if fields.len() != 13 {
                    return Err(malformed(line));
                }
                let text = fields[12]
                    .strip_prefix('"')
                    .and_then(|text| text.strip_suffix('"'))
                    .ok_or_else(|| malformed(line))?;
                DrawCommand::TextRegion {
                    rect: comma_rect(&fields[..4])?,
                    padding: int(fields[4])?,
                    text_height: int(fields[5])?,
                    compact: boolean(fields[6])?,
                    bold: boolean(fields[7])?,
                    left_margin: int(fields[8])?,
                    right_margin: int(fields[9])?,
                    font_size: int(fields[10])?,
                    scale: Scale(fields[11].parse().map_err(|_| malformed(line))?),
                    text: unescape(text)?,
                }
            }
            "DrawAction" => {
                let fields = fields(rest, 5)?;
                DrawCommand::Action {
                    level: int(fields[0])?,
                    style: match fields[1] {
                        "NORMAL" => ActionStyle::Normal,
                        "SELF" => ActionStyle::SelfAction,
                        _ => return Err(malformed(line)),
                    },
                    source: cross_rect(fields[2])?,
                    destination: cross_rect(fields[3])?,
                    end: match fields[4] {
                        "NORMAL" => EndStyle::Normal,
                        "POP" => EndStyle::Pop,
                        _ => return Err(malformed(line)),
                    },
                }
            }
            "DrawActionHandle" => {
                let fields = fields(rest, 7)?;
                DrawCommand::ActionHandle {
                    level: int(fields[0])?,
                    x: int(fields[1])?,
                    y: int(fields[2])?,
                    inner_radius: int(fields[3])?,
                    outer_radius: int(fields[4])?,
                    frame: fields[5].parse()?,
                    background: fields[6].parse()?,
                }
            }
            "DrawIcon" => {
                let fields = fields(rest, 3)?;
                DrawCommand::Icon {
                    level: int(fields[0])?,
                    rect: cross_rect(fields[1])?,
                    icon: match fields[2] {
                        "START_DESTINATION" => IconKind::StartDestination,
                        "DEEPLINK" => IconKind::DeepLink,
                        _ => return Err(malformed(line)),
                    },
                }
            }
            "DrawScreenLabel" => {
                let fields: Vec<&str> = rest.splitn(5, ',').collect();
                if fields.len() != 5 {
                    return Err(malformed(line));
                }
                let (font, text) = fields[4]
                    .split_once("],")
                    .ok_or_else(|| malformed(line))?;
                DrawCommand::ScreenLabel {
                    level: int(fields[0])?,
                    x: int(fields[1])?,
                    y: int(fields[2])?,
                    color: fields[3].parse()?,
                    font: format!("{font}]").parse()?,
                    text: unescape(text)?,
                }
            }
            _ => return Err(DisplayListError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    Command(DrawCommand),
    /// Blank line closing one destination's commands.
    Separator,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.items.push(DisplayItem::Command(command));
    }

    pub fn end_component(&mut self) {
        self.items.push(DisplayItem::Separator);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.items.iter().filter_map(|item| match item {
            DisplayItem::Command(command) => Some(command),
            DisplayItem::Separator => None,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn serialize(&self) -> String {
        self.to_string()
    }

    pub fn parse(text: &str) -> Result<Self, DisplayListError> {
        let mut list = DisplayList::new();
        for line in text.split_terminator('\n') {
            if line.is_empty() {
                list.end_component();
            } else {
                list.push(line.parse()?);
            }
        }
        Ok(list)
    }
}

impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                DisplayItem::Command(command) => writeln!(f, "{command}")?,
                DisplayItem::Separator => writeln!(f)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayListError {
    UnknownCommand(String),
    Malformed(String),
}

impl fmt::Display for DisplayListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayListError::UnknownCommand(name) => write!(f, "Unknown draw command: {name}"),
            DisplayListError::Malformed(text) => write!(f, "Malformed display list entry: {text}"),
        }
    }
}

impl std::error::Error for DisplayListError {}

fn malformed(text: &str) -> DisplayListError {
    DisplayListError::Malformed(text.to_string())
}

fn fields(rest: &str, count: usize) -> Result<Vec<&str>, DisplayListError> {
    let fields: Vec<&str> = rest.split(',').collect();
    if fields.len() == count {
        Ok(fields)
    } else {
        Err(malformed(rest))
    }
}

fn int(text: &str) -> Result<i32, DisplayListError> {
    text.parse().map_err(|_| malformed(text))
}

fn boolean(text: &str) -> Result<bool, DisplayListError> {
    text.parse().map_err(|_| malformed(text))
}

fn rect(values: &[i32]) -> SurfaceRect {
    Rect::new(Point2D::new(values[0], values[1]), Size2D::new(values[2], values[3]))
}

fn comma_rect(fields: &[&str]) -> Result<SurfaceRect, DisplayListError> {
    let values = fields.iter().map(|field| int(field)).collect::<Result<Vec<_>, _>>()?;
    if values.len() != 4 {
        return Err(malformed(&fields.join(",")));
    }
    Ok(rect(&values))
}

fn cross_rect(text: &str) -> Result<SurfaceRect, DisplayListError> {
    let values = text.split('x').map(int).collect::<Result<Vec<_>, _>>()?;
    if values.len() != 4 {
        return Err(malformed(text));
    }
    Ok(rect(&values))
}
