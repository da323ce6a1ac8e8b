use std::fmt;
use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Color as TermColor, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use log::info;

use crate::types::Color;

/// Character-cell drawing primitives the game is rendered through.
pub trait Renderer {
    fn clear_screen(&mut self) -> io::Result<()>;
    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()>;
    /// Writes `text` at the cursor, advancing it.
    fn print(&mut self, text: &str) -> io::Result<()>;
    fn set_color(&mut self, color: Color) -> io::Result<()>;
    fn show_cursor(&mut self) -> io::Result<()>;
    fn hide_cursor(&mut self) -> io::Result<()>;
    fn bell(&mut self) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;

    fn put_char(&mut self, c: char, x: u16, y: u16) -> io::Result<()> {
        self.move_to(x, y)?;
        let mut buf = [0u8; 4];
        self.print(c.encode_utf8(&mut buf))
    }

    fn printf(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.print(&args.to_string())
    }

    /// Outlines a `width` x `height` box with its top-left corner at (x, y).
    fn draw_rect(&mut self, x: u16, y: u16, width: u16, height: u16) -> io::Result<()> {
        if width < 2 || height < 2 {
            return Ok(());
        }
        let right = x + width - 1;
        let bottom = y + height - 1;
        let edge = "-".repeat(usize::from(width - 2));
        for row in [y, bottom] {
            self.put_char('+', x, row)?;
            self.print(&edge)?;
            self.put_char('+', right, row)?;
        }
        for row in y + 1..bottom {
            self.put_char('|', x, row)?;
            self.put_char('|', right, row)?;
        }
        Ok(())
    }
}

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
    pub foreground: Color,
    pub background: Color,
    pub cursor_visible: bool,
    pub bells: u32,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
            foreground: Color::ForegroundWhite,
            background: Color::BackgroundBlack,
            cursor_visible: true,
            bells: 0,
        }
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\r' => self.cursor_x = 0,
                '\n' => {
                    self.cursor_x = 0;
                    self.cursor_y = self.cursor_y.saturating_add(1);
                }
                _ => {
                    self.write_char(c);
                    self.cursor_x = self.cursor_x.saturating_add(1);
                }
            }
        }
    }

    pub fn char_at(&self, x: u16, y: u16) -> char {
        self.buffer
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(' ')
    }

    /// Text of row `y` with trailing blanks removed.
    pub fn row_text(&self, y: u16) -> String {
        self.buffer
            .get(y as usize)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.buffer = vec![vec![' '; self.width as usize]; self.height as usize];
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

impl Renderer for ScreenBuffer {
    fn clear_screen(&mut self) -> io::Result<()> {
        self.clear();
        Ok(())
    }

    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.cursor_x = x;
        self.cursor_y = y;
        Ok(())
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.write_str(text);
        Ok(())
    }

    fn set_color(&mut self, color: Color) -> io::Result<()> {
        if color.is_background() {
            self.background = color;
        } else {
            self.foreground = color;
        }
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.cursor_visible = true;
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.cursor_visible = false;
        Ok(())
    }

    fn bell(&mut self) -> io::Result<()> {
        self.bells += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::ForegroundWhite => TermColor::White,
        Color::ForegroundCyan => TermColor::Cyan,
        Color::ForegroundRed | Color::BackgroundRed => TermColor::Red,
        Color::ForegroundYellow | Color::BackgroundYellow => TermColor::Yellow,
        Color::ForegroundGreen => TermColor::Green,
        Color::BackgroundBlack => TermColor::Black,
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl Renderer for OutputTarget {
    fn clear_screen(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, Clear(ClearType::All), MoveTo(0, 0)),
            OutputTarget::ScreenBuffer(sb) => sb.clear_screen(),
        }
    }

    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, MoveTo(x, y)),
            OutputTarget::ScreenBuffer(sb) => sb.move_to(x, y),
        }
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        match self {
            // Raw mode does not translate "\n" into a carriage return.
            OutputTarget::Stdout(s) => queue!(s, Print(text.replace('\n', "\r\n"))),
            OutputTarget::ScreenBuffer(sb) => sb.print(text),
        }
    }

    fn set_color(&mut self, color: Color) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) if color.is_background() => {
                queue!(s, SetBackgroundColor(term_color(color)))
            }
            OutputTarget::Stdout(s) => queue!(s, SetForegroundColor(term_color(color))),
            OutputTarget::ScreenBuffer(sb) => sb.set_color(color),
        }
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, Show),
            OutputTarget::ScreenBuffer(sb) => sb.show_cursor(),
        }
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, Hide),
            OutputTarget::ScreenBuffer(sb) => sb.hide_cursor(),
        }
    }

    fn bell(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, Print('\u{7}')),
            OutputTarget::ScreenBuffer(sb) => sb.bell(),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => Renderer::flush(sb),
        }
    }
}
