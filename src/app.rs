//! Application state machine
//!
//! Screens: start menu, dimension prompt, editor and the export prompt that
//! overlays the editor. Keys are routed to the active screen; the editor
//! forwards them to the [`EditSession`]. All terminal I/O lives in [`App::run`],
//! so everything else can be driven from tests with plain key bytes.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use qeike_core::{EditSession, Key, Outcome};
use qeike_map::{resolve_export_path, write_map, ExportFormat, MAX_DIMENSION};

use crate::config::Config;
use crate::error::AppError;
use crate::input::KeyDecoder;
use crate::prompt::{
    check_grid_size, parse_dimensions, parse_start_choice, LineEditor, LineEvent, PromptError,
    StartChoice,
};
use crate::render::{export_prompt_text, Renderer};
use crate::term::{self, TerminalGuard};

/// How long to wait for the rest of an escape sequence
const ESCAPE_TIMEOUT_MS: i32 = 25;

/// Notice shown after choosing "open" on the start screen
pub const OPEN_UNSUPPORTED: &str = "Opening existing maps is not supported yet.";

/// Active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Dimensions,
    Editing,
    ExportPrompt,
    Done,
}

/// The editor application
pub struct App {
    config: Config,
    screen: Screen,
    line: LineEditor,
    /// Prompt diagnostic or editor status line
    message: Option<String>,
    session: Option<EditSession>,
    decoder: KeyDecoder,
    exit_notice: Option<String>,
    last_export: Option<PathBuf>,
}

impl App {
    /// Create the app. A configured initial size opens the editor directly.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let mut app = Self {
            config,
            screen: Screen::Start,
            line: LineEditor::new(),
            message: None,
            session: None,
            decoder: KeyDecoder::new(),
            exit_notice: None,
            last_export: None,
        };

        if let Some(dims) = app.config.initial_size {
            check_grid_size(dims, app.config.editor.max_cells)?;
            let session = EditSession::with_dimensions(dims).map_err(PromptError::from)?;
            app.start_editing(session);
        }

        Ok(app)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_done(&self) -> bool {
        self.screen == Screen::Done
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Current diagnostic or status text
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Text to print once the terminal is restored
    pub fn exit_notice(&self) -> Option<&str> {
        self.exit_notice.as_deref()
    }

    /// Path of the last successful export
    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }

    /// Text typed into the active prompt
    pub fn input_line(&self) -> &str {
        self.line.text()
    }

    /// Decode raw input bytes and apply the keys
    pub fn handle_input(&mut self, data: &[u8]) {
        for key in self.decoder.feed(data) {
            self.handle_key(key);
        }
    }

    /// Resolve a buffered lone Escape
    pub fn flush_input(&mut self) {
        for key in self.decoder.flush() {
            self.handle_key(key);
        }
    }

    /// Apply one key to the active screen
    pub fn handle_key(&mut self, key: Key) {
        if self.is_done() {
            return;
        }
        if key == Key::Ctrl('c') && self.screen != Screen::Editing {
            debug!("Interrupted on {:?}", self.screen);
            self.screen = Screen::Done;
            return;
        }

        match self.screen {
            Screen::Start => self.handle_start_key(key),
            Screen::Dimensions => self.handle_dimension_key(key),
            Screen::Editing => self.handle_editing_key(key),
            Screen::ExportPrompt => self.handle_export_key(key),
            Screen::Done => {}
        }
    }

    fn handle_start_key(&mut self, key: Key) {
        let LineEvent::Submitted(input) = self.line.handle_key(key) else {
            return;
        };
        match parse_start_choice(&input) {
            Ok(StartChoice::NewMap) => {
                self.message = None;
                self.screen = Screen::Dimensions;
            }
            Ok(StartChoice::Open) => {
                info!("Open requested; not supported");
                self.exit_notice = Some(OPEN_UNSUPPORTED.to_string());
                self.screen = Screen::Done;
            }
            Ok(StartChoice::Exit) => self.screen = Screen::Done,
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn handle_dimension_key(&mut self, key: Key) {
        let LineEvent::Submitted(input) = self.line.handle_key(key) else {
            return;
        };
        let result = parse_dimensions(&input).and_then(|dims| {
            check_grid_size(dims, self.config.editor.max_cells)?;
            Ok(EditSession::with_dimensions(dims)?)
        });
        match result {
            Ok(session) => self.start_editing(session),
            Err(e) => {
                debug!("Rejected dimensions {:?}: {}", input, e);
                self.message = Some(e.to_string());
            }
        }
    }

    fn start_editing(&mut self, session: EditSession) {
        let dims = session.grid().dimensions();
        info!("Editing new {} map", dims);
        self.message = if self.config.export.format == ExportFormat::Qkm
            && dims.max_axis() > MAX_DIMENSION
        {
            Some(format!(
                "Note: axes above {} cannot be exported as .qkm",
                MAX_DIMENSION
            ))
        } else {
            None
        };
        self.session = Some(session);
        self.line.clear();
        self.screen = Screen::Editing;
    }

    fn handle_editing_key(&mut self, key: Key) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.handle_key(key) {
            Outcome::Continue => {}
            Outcome::ExportRequested => {
                self.line.clear();
                self.message = None;
                self.screen = Screen::ExportPrompt;
            }
            Outcome::Quit => self.screen = Screen::Done,
        }
    }

    fn handle_export_key(&mut self, key: Key) {
        match self.line.handle_key(key) {
            LineEvent::Pending => {}
            LineEvent::Cancelled => {
                self.message = Some("Export cancelled.".to_string());
                self.screen = Screen::Editing;
            }
            LineEvent::Submitted(input) => {
                self.export(&input);
                self.screen = Screen::Editing;
            }
        }
    }

    fn export(&mut self, input: &str) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let export = &self.config.export;
        let path = resolve_export_path(
            input,
            &export.default_name,
            export.format,
            export.directory.as_deref(),
        );

        match write_map(session.grid(), &path, export.format, export.atomic_write) {
            Ok(_) => {
                self.message = Some(format!("Save successful: {}", path.display()));
                self.last_export = Some(path);
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.message = Some(e.to_string());
            }
        }
    }

    fn default_file_name(&self) -> String {
        let export = &self.config.export;
        resolve_export_path("", &export.default_name, export.format, None)
            .display()
            .to_string()
    }

    /// Draw the active screen
    pub fn draw<W: Write>(&self, renderer: &Renderer, out: &mut W) -> io::Result<()> {
        let message = self.message.as_deref();
        match self.screen {
            Screen::Start => renderer.draw_start(out, self.line.text(), message),
            Screen::Dimensions => renderer.draw_dimension_prompt(out, self.line.text(), message),
            Screen::Editing | Screen::ExportPrompt => {
                let Some(session) = self.session.as_ref() else {
                    return Ok(());
                };
                let prompt = (self.screen == Screen::ExportPrompt).then(|| {
                    format!(
                        "{}{}",
                        export_prompt_text(&self.default_file_name()),
                        self.line.text()
                    )
                });
                renderer.draw_editor(out, &session.render_state(), prompt.as_deref(), message)
            }
            Screen::Done => Ok(()),
        }
    }

    /// Run the interactive loop until the user quits or stdin closes
    pub fn run(&mut self) -> Result<(), AppError> {
        let mut terminal = TerminalGuard::new()?;
        let mut stdout = io::stdout();
        let mut renderer = Renderer::new(self.config.editor.show_help);
        let mut buf = [0u8; 1024];

        while !self.is_done() {
            if let Some((cols, rows)) = term::window_size() {
                renderer.set_size(cols as usize, rows as usize);
            }
            self.draw(&renderer, &mut stdout)?;

            let n = terminal.read(&mut buf)?;
            if n == 0 {
                info!("Input closed");
                break;
            }
            self.handle_input(&buf[..n]);

            // A lone ESC only becomes a key once no sequence follows it
            if self.decoder.is_pending() && !terminal.poll_input(ESCAPE_TIMEOUT_MS)? {
                self.flush_input();
            }
        }

        Ok(())
    }
}
