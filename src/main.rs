//! Scanpad Examples - interactive keyboard configurator
//!
//! Builds keyboard configurations for scanpad devices and browses the JSON
//! example library.

use anyhow::{Context, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use scanpad_examples::{
    builder::{BuilderOptions, KeyboardConfigBuilder},
    config::Config,
    json_browser::{JsonBrowser, JsonCategory},
    keyboard::ConfigDocument,
    ui::{Console, Flow, HandlerMap, InteractiveBase, StdConsole, ThemeColors},
};

const MENU_ITEMS: [&str; 4] = [
    "🛠️  Build new keyboard configuration",
    "✏️  Edit existing keyboard configuration",
    "📂 Browse and preview JSON files",
    "ℹ️  Show JSON file info",
];

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with prompts
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {}", e);
        Config::default()
    });

    // Ctrl-C cancels the current prompt instead of killing the process
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        eprintln!("\n⚠️  Interrupted - press Enter to return to the menu");
    })
    .context("installing Ctrl-C handler")?;

    let mut console = StdConsole::stdio().with_interrupt_flag(interrupted);
    if config.ui.color {
        console = console.with_theme(ThemeColors::from_theme(config.ui.theme));
    }
    if config.ui.clear_screen {
        console.clear_screen();
    }

    let app = InteractiveBase::new(
        "⌨️  SCANPAD KEYBOARD CONFIGURATOR",
        "Build, edit and export keyboard configurations",
    );
    app.print_header(&mut console);

    let browser = JsonBrowser::new(&config.paths.json_dir);
    let builder = RefCell::new(KeyboardConfigBuilder::new(BuilderOptions::from(&config)));
    let preview_lines = config.ui.preview_max_lines;

    let mut handlers = HandlerMap::new()
        .on(1, |c: &mut StdConsole| build_new(c, &mut builder.borrow_mut()))
        .on(2, |c: &mut StdConsole| {
            edit_existing(c, &browser, &mut builder.borrow_mut())
        })
        .on(3, |c: &mut StdConsole| browse(c, &browser, preview_lines))
        .on(4, |c: &mut StdConsole| show_info(c, &browser));

    app.run_menu_loop(&mut console, "Main Menu", &MENU_ITEMS, &mut handlers, true);
    drop(handlers);

    console.line("\n👋 Goodbye!");
    Ok(())
}

fn report_result<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    result: Option<scanpad_examples::keyboard::KeyConfig>,
) {
    match result {
        Some(keys) => console.display_success(format!(
            "Keyboard configuration ready: {} keys, {} actions",
            keys.len(),
            keys.total_actions()
        )),
        None => console.display_info("Configuration discarded"),
    }
}

fn build_new<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    builder: &mut KeyboardConfigBuilder,
) -> Result<Flow> {
    let result = builder.run_complete_builder(console, None)?;
    report_result(console, result);
    Ok(Flow::Continue)
}

fn edit_existing<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    browser: &JsonBrowser,
    builder: &mut KeyboardConfigBuilder,
) -> Result<Flow> {
    let Some(path) = browser.display_json_menu(console, JsonCategory::Keyboard) else {
        return Ok(Flow::Continue);
    };
    let Some(value) = browser.load_json(console, &path) else {
        return Ok(Flow::Continue);
    };

    let document = ConfigDocument::from_value(value)
        .with_context(|| format!("{} is not a valid keyboard configuration", path.display()))?;
    console.display_info(format!(
        "Loaded '{}' ({} keys)",
        document.metadata.name,
        document.keys.len()
    ));

    let initial = document.into_keys();
    let result = builder.run_complete_builder(console, Some(&initial))?;
    report_result(console, result);
    Ok(Flow::Continue)
}

fn browse<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    browser: &JsonBrowser,
    max_lines: usize,
) -> Result<Flow> {
    console.line("\nCategories:");
    let choice = console.get_choice_input(
        "Select category: ",
        &["all", "templates", "keyboard", "device"],
    )?;
    let Some(category) = choice.and_then(|c| c.parse::<JsonCategory>().ok()) else {
        return Ok(Flow::Continue);
    };

    if let Some(path) = browser.display_json_menu(console, category) {
        browser.preview_json(console, &path, max_lines);
        console.pause_for_user();
    }
    Ok(Flow::Continue)
}

fn show_info<R: BufRead, W: Write>(console: &mut Console<R, W>, browser: &JsonBrowser) -> Result<Flow> {
    let Some(path) = browser.display_json_menu(console, JsonCategory::All) else {
        return Ok(Flow::Continue);
    };
    let Some(info) = browser.get_json_info(console, &path) else {
        return Ok(Flow::Continue);
    };

    console.line("");
    console.heading(format!("ℹ️  {}", info.name));
    console.line(format!("  Path: {}", info.path.display()));
    console.line(format!("  Type: {}", info.doc_type));
    if let Some(metadata) = &info.metadata {
        for field in ["name", "description", "version", "created"] {
            if let Some(text) = metadata.get(field).and_then(Value::as_str) {
                console.line(format!("  {}: {}", field, text));
            }
        }
    }
    if let Some(keys) = info.keys_count {
        console.line(format!("  Keys: {}", keys));
    }
    if let Some(commands) = info.commands_count {
        console.line(format!("  Commands: {}", commands));
    }
    console.pause_for_user();
    Ok(Flow::Continue)
}
