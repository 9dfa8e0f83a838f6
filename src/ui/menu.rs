//! Menu-loop driver shared by the interactive tools
//!
//! A loop shows a numbered menu, reads a choice and runs the mapped handler
//! inside an error boundary. Handler failures and operator cancellation are
//! reported and the loop keeps going; only `0` (back) or a handler returning
//! [`Flow::Exit`] ends it.

use crate::error::UiError;
use crate::ui::Console;
use futures::future::LocalBoxFuture;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{BufRead, Write};

/// What the menu loop does after a handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again
    Continue,
    /// Leave the menu loop
    Exit,
}

/// Synchronous menu handler
pub type Handler<'a, R, W> = Box<dyn FnMut(&mut Console<R, W>) -> anyhow::Result<Flow> + 'a>;

/// Asynchronous menu handler; the returned future may keep prompting
/// through the console it was given
pub type AsyncHandler<'a, R, W> = Box<
    dyn for<'c> FnMut(&'c mut Console<R, W>) -> LocalBoxFuture<'c, anyhow::Result<Flow>> + 'a,
>;

/// Handlers keyed by 1-based menu choice
pub struct HandlerMap<'a, R, W> {
    handlers: BTreeMap<usize, Handler<'a, R, W>>,
}

impl<'a, R, W> Default for HandlerMap<'a, R, W> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<'a, R: BufRead, W: Write> HandlerMap<'a, R, W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `choice` to `handler`, builder style
    pub fn on<F>(mut self, choice: usize, handler: F) -> Self
    where
        F: FnMut(&mut Console<R, W>) -> anyhow::Result<Flow> + 'a,
    {
        self.handlers.insert(choice, Box::new(handler));
        self
    }
}

/// Async handlers keyed by 1-based menu choice
pub struct AsyncHandlerMap<'a, R, W> {
    handlers: BTreeMap<usize, AsyncHandler<'a, R, W>>,
}

impl<'a, R, W> Default for AsyncHandlerMap<'a, R, W> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<'a, R: BufRead, W: Write> AsyncHandlerMap<'a, R, W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `choice` to `handler`, builder style. Handlers box their future
    /// with `FutureExt::boxed_local` so it can borrow the console.
    pub fn on<F>(mut self, choice: usize, handler: F) -> Self
    where
        F: for<'c> FnMut(&'c mut Console<R, W>) -> LocalBoxFuture<'c, anyhow::Result<Flow>> + 'a,
    {
        self.handlers.insert(choice, Box::new(handler));
        self
    }
}

/// Outcome of reading one menu choice
enum Selection {
    Back,
    Retry,
    Closed,
    Choice(usize),
}

/// Common state and menu loops for an interactive terminal application
#[derive(Debug, Clone)]
pub struct InteractiveBase {
    pub app_name: String,
    pub description: String,
}

impl InteractiveBase {
    pub fn new(app_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            description: description.into(),
        }
    }

    pub fn print_header<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) {
        console.print_header(&self.app_name, &self.description);
    }

    fn select<R, W, S>(
        console: &mut Console<R, W>,
        title: &str,
        items: &[S],
        include_back: bool,
    ) -> Selection
    where
        R: BufRead,
        W: Write,
        S: AsRef<str>,
    {
        console.display_menu(title, items, include_back);
        match console.get_menu_choice(items.len(), include_back) {
            Some(0) if include_back => Selection::Back,
            Some(choice) => Selection::Choice(choice),
            None if console.is_closed() => Selection::Closed,
            None => Selection::Retry,
        }
    }

    fn not_implemented<R: BufRead, W: Write>(console: &mut Console<R, W>, choice: usize) {
        console.error(format!("Option {} not implemented yet", choice));
        console.pause_for_user();
    }

    /// Run `handlers` from a numbered menu until back or [`Flow::Exit`]
    pub fn run_menu_loop<R, W, S>(
        &self,
        console: &mut Console<R, W>,
        menu_title: &str,
        menu_items: &[S],
        handlers: &mut HandlerMap<'_, R, W>,
        include_back: bool,
    ) where
        R: BufRead,
        W: Write,
        S: AsRef<str>,
    {
        loop {
            let choice = match Self::select(console, menu_title, menu_items, include_back) {
                Selection::Back | Selection::Closed => break,
                Selection::Retry => continue,
                Selection::Choice(choice) => choice,
            };

            log::debug!("{}: menu choice {}", self.app_name, choice);
            match handlers.handlers.get_mut(&choice) {
                Some(handler) => {
                    if self.safe_execute(console, |c| handler(c)) == Some(Flow::Exit) {
                        break;
                    }
                }
                None => Self::not_implemented(console, choice),
            }
        }
    }

    /// Run `func`, turning cancellation and errors into a message
    pub fn safe_execute<R, W, T, F>(&self, console: &mut Console<R, W>, func: F) -> Option<T>
    where
        R: BufRead,
        W: Write,
        F: FnOnce(&mut Console<R, W>) -> anyhow::Result<T>,
    {
        let result = func(console);
        self.settle(console, result)
    }

    /// Await the future `func` starts, turning cancellation and errors into
    /// a message once it has released the console
    pub async fn async_safe_execute<R, W, T, F>(&self, console: &mut Console<R, W>, func: F) -> Option<T>
    where
        R: BufRead,
        W: Write,
        F: for<'c> FnOnce(&'c mut Console<R, W>) -> LocalBoxFuture<'c, anyhow::Result<T>>,
    {
        let result = func(console).await;
        self.settle(console, result)
    }

    fn settle<R: BufRead, W: Write, T>(
        &self,
        console: &mut Console<R, W>,
        result: anyhow::Result<T>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if is_cancellation(&err) => {
                log::info!("{}: operation cancelled", self.app_name);
                console.line("");
                console.display_warning("Operation cancelled");
                console.pause_for_user();
                None
            }
            Err(err) => {
                log::warn!("{}: handler failed: {:#}", self.app_name, err);
                console.display_error(format!("{:#}", err));
                None
            }
        }
    }

    /// Async twin of [`run_menu_loop`](Self::run_menu_loop); each handler
    /// completes before the menu is shown again
    pub async fn async_run_menu_loop<R, W, S>(
        &self,
        console: &mut Console<R, W>,
        menu_title: &str,
        menu_items: &[S],
        handlers: &mut AsyncHandlerMap<'_, R, W>,
        include_back: bool,
    ) where
        R: BufRead,
        W: Write,
        S: AsRef<str>,
    {
        loop {
            let choice = match Self::select(console, menu_title, menu_items, include_back) {
                Selection::Back | Selection::Closed => break,
                Selection::Retry => continue,
                Selection::Choice(choice) => choice,
            };

            log::debug!("{}: async menu choice {}", self.app_name, choice);
            match handlers.handlers.get_mut(&choice) {
                Some(handler) => {
                    if self.async_safe_execute(console, |c| handler(c)).await == Some(Flow::Exit) {
                        break;
                    }
                }
                None => Self::not_implemented(console, choice),
            }
        }
    }

    pub fn display_success<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        message: impl Display,
    ) {
        console.display_success(message);
    }

    pub fn display_warning<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        message: impl Display,
    ) {
        console.display_warning(message);
    }

    pub fn display_info<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        message: impl Display,
    ) {
        console.display_info(message);
    }
}

fn is_cancellation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<UiError>()
            .is_some_and(UiError::is_interrupted)
    })
}
