//! Prompt and menu primitives over a terminal
//!
//! Every helper fails soft: bad input prints a diagnostic and yields `None`
//! (or a default), leaving retry-or-abort to the caller. Only operator
//! cancellation surfaces as [`UiError::Interrupted`], and only from helpers
//! whose callers need to unwind.

use crate::error::UiError;
use crate::ui::theme::ThemeColors;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{style, Color, Stylize},
    terminal::{Clear, ClearType},
};
use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Width of the `=` rule under application headers
const HEADER_RULE: usize = 70;
/// Width of the `=` rule around menus
const MENU_RULE: usize = 50;

/// Console bound to the process stdin/stdout
pub type StdConsole = Console<StdinLock<'static>, Stdout>;

/// Line-oriented terminal: reads answers from `R`, writes prompts to `W`
pub struct Console<R, W> {
    input: R,
    output: W,
    interrupt: Option<Arc<AtomicBool>>,
    theme: Option<ThemeColors>,
    closed: bool,
}

impl StdConsole {
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interrupt: None,
            theme: None,
            closed: false,
        }
    }

    /// Flag raised by a signal handler; checked after every read
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Color status lines with the given palette
    pub fn with_theme(mut self, theme: ThemeColors) -> Self {
        self.theme = Some(theme);
        self
    }

    /// True once the input stream has reached end of file
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line. Output failures are not actionable here and are dropped.
    pub fn line(&mut self, message: impl Display) {
        let _ = writeln!(self.output, "{}", message);
    }

    fn colored(&mut self, color: Option<Color>, message: impl Display) {
        match color {
            Some(color) => self.line(style(message.to_string()).with(color)),
            None => self.line(message),
        }
    }

    /// `❌ message`
    pub fn error(&mut self, message: impl Display) {
        let color = self.theme.map(|t| t.error);
        self.colored(color, format!("❌ {}", message));
    }

    /// `✅ message`
    pub fn success(&mut self, message: impl Display) {
        let color = self.theme.map(|t| t.success);
        self.colored(color, format!("✅ {}", message));
    }

    /// `⚠️  message`
    pub fn warning(&mut self, message: impl Display) {
        let color = self.theme.map(|t| t.warning);
        self.colored(color, format!("⚠️  {}", message));
    }

    /// `💡 message`
    pub fn hint(&mut self, message: impl Display) {
        let color = self.theme.map(|t| t.info);
        self.colored(color, format!("💡 {}", message));
    }

    /// Section heading in the theme's accent color
    pub fn heading(&mut self, message: impl Display) {
        let color = self.theme.map(|t| t.heading);
        self.colored(color, message);
    }

    pub fn display_success(&mut self, message: impl Display) {
        self.line("");
        self.success(message);
    }

    pub fn display_warning(&mut self, message: impl Display) {
        self.line("");
        self.warning(message);
    }

    pub fn display_info(&mut self, message: impl Display) {
        let color = self.theme.map(|t| t.info);
        self.colored(color, format!("\nℹ️  {}", message));
    }

    fn take_interrupt(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.swap(false, Ordering::SeqCst))
    }

    /// Show `prompt` and read one line without its line terminator.
    ///
    /// End of input and a raised interrupt flag both report
    /// [`UiError::Interrupted`].
    pub fn read_line(&mut self, prompt: &str) -> Result<String, UiError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        let read = self.input.read_line(&mut buf)?;
        if self.take_interrupt() {
            return Err(UiError::Interrupted);
        }
        if read == 0 {
            self.closed = true;
            let _ = writeln!(self.output);
            return Err(UiError::Interrupted);
        }
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Application header between two rules
    pub fn print_header(&mut self, title: &str, subtitle: &str) {
        self.line(format!("\n{}", "=".repeat(HEADER_RULE)));
        self.heading(title);
        if !subtitle.is_empty() {
            self.line(subtitle);
        }
        self.line("=".repeat(HEADER_RULE));
    }

    /// Yes/no question; anything but `y`/`yes` is a no
    pub fn confirm(&mut self, message: &str) -> Result<bool, UiError> {
        let answer = self.read_line(&format!("{} (y/n): ", message))?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn parse_int(&mut self, text: &str, min: Option<i64>, max: Option<i64>) -> Option<i64> {
        let value = match text.trim().parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                self.error("Invalid number");
                return None;
            }
        };
        if let Some(min) = min.filter(|min| value < *min) {
            self.error(format!("Value must be at least {}", min));
            return None;
        }
        if let Some(max) = max.filter(|max| value > *max) {
            self.error(format!("Value must be at most {}", max));
            return None;
        }
        Some(value)
    }

    /// Integer within inclusive bounds; `None` on bad input or cancellation
    pub fn get_int_input(&mut self, prompt: &str, min: Option<i64>, max: Option<i64>) -> Option<i64> {
        let text = self.read_line(prompt).ok()?;
        self.parse_int(&text, min, max)
    }

    /// Integer within bounds, falling back to `default` when the answer is
    /// empty or invalid. Cancellation is not an answer and is returned.
    pub fn get_int_or_default(
        &mut self,
        prompt: &str,
        min: Option<i64>,
        max: Option<i64>,
        default: i64,
    ) -> Result<i64, UiError> {
        let text = self.read_line(prompt)?;
        if text.trim().is_empty() {
            return Ok(default);
        }
        Ok(self.parse_int(&text, min, max).unwrap_or(default))
    }

    /// Pick one of `choices` by number or by exact label
    pub fn get_choice_input(
        &mut self,
        prompt: &str,
        choices: &[&str],
    ) -> Result<Option<String>, UiError> {
        for (i, choice) in choices.iter().enumerate() {
            self.line(format!("  {}. {}", i + 1, choice));
        }

        let answer = self.read_line(prompt)?;
        let answer = answer.trim();
        match answer.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(Some(choices[n - 1].to_string())),
            Ok(_) => {}
            Err(_) => {
                if let Some(choice) = choices.iter().find(|c| **c == answer) {
                    return Ok(Some(choice.to_string()));
                }
            }
        }

        self.error(format!("Invalid choice. Please select 1-{}", choices.len()));
        Ok(None)
    }

    /// Free text, optionally limited to `max_bytes` of UTF-8
    pub fn get_text_input(&mut self, prompt: &str, max_bytes: Option<usize>) -> Option<String> {
        let text = self.read_line(prompt).ok()?;
        if let Some(max) = max_bytes.filter(|max| text.len() > *max) {
            self.error(format!("Text too long (max {} UTF-8 bytes)", max));
            return None;
        }
        Some(text)
    }

    pub fn pause_for_user(&mut self) {
        let _ = self.read_line("\nPress Enter to continue...");
    }

    pub fn display_error(&mut self, error: impl Display) {
        self.line("");
        self.error(format!("Error: {}", error));
        self.pause_for_user();
    }

    pub fn clear_screen(&mut self) {
        let _ = execute!(self.output, Clear(ClearType::All), MoveTo(0, 0));
    }

    /// Numbered menu, with a trailing `0. Back` entry when `include_back`
    pub fn display_menu<S: AsRef<str>>(&mut self, title: &str, items: &[S], include_back: bool) {
        self.line("");
        self.heading(format!("📋 {}:", title));
        self.line("=".repeat(MENU_RULE));
        for (i, item) in items.iter().enumerate() {
            self.line(format!("  {}. {}", i + 1, item.as_ref()));
        }
        if include_back {
            self.line("  0. ❌ Back");
        }
        self.line("=".repeat(MENU_RULE));
    }

    /// Menu selection in `0..=max` (or `1..=max` without a back entry).
    ///
    /// Cancellation picks the back entry when there is one.
    pub fn get_menu_choice(&mut self, max_choice: usize, include_zero: bool) -> Option<usize> {
        let min = if include_zero { 0 } else { 1 };
        let prompt = format!("\nSelect option ({}-{}): ", min, max_choice);

        let answer = match self.read_line(&prompt) {
            Ok(answer) => answer,
            Err(_) => return include_zero.then_some(0),
        };
        match answer.trim().parse::<usize>() {
            Ok(choice) if (min..=max_choice).contains(&choice) => Some(choice),
            Ok(_) => {
                self.error(format!("Invalid choice. Please select {}-{}", min, max_choice));
                None
            }
            Err(_) => {
                self.error("Please enter a number");
                None
            }
        }
    }
}
