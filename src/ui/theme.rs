use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for each kind of line the tracker prints.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Greeting banner and section titles
    pub heading: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    /// Left-hand side of `label: value` lines and dashboard metrics
    pub label: Style,
    /// Dashboard figures
    pub figure: Style,
    /// Earned badges
    pub badge: Style,
    pub icon: Style,
}

impl Theme {
    pub fn detect() -> Self {
        Self::new(color_enabled())
    }

    /// Coloured styles, or all-plain ones when `color` is false
    pub fn new(color: bool) -> Self {
        let paint = |style: Style| if color { style } else { Style::new() };
        Self {
            heading: paint(Style::new().magenta().bold()),
            success: paint(Style::new().green().bold()),
            error: paint(Style::new().red().bold()),
            warn: paint(Style::new().yellow().bold()),
            label: paint(Style::new().white().dimmed()),
            figure: paint(Style::new().bright_cyan().bold()),
            badge: paint(Style::new().yellow()),
            icon: paint(Style::new().cyan()),
        }
    }
}

/// Colour only on an interactive stdout, and never with `NO_COLOR` set
fn color_enabled() -> bool {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    !no_color && console::Term::stdout().is_term()
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
