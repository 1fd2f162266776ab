use crate::ui::overlay::Overlays;
use crate::ui::theme::Color;
use std::fmt;

/// Widget state of the main screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainDisplay {
    pub bound: bool,
    pub profile_name: Option<String>,
    pub clash_running: bool,
    pub forwarded: String,
    pub mode: String,
    pub has_providers: bool,
    pub color_clash_started: Option<Color>,
    pub color_clash_stopped: Option<Color>,
}

impl MainDisplay {
    pub fn status_color(&self) -> Option<Color> {
        if self.clash_running {
            self.color_clash_started
        } else {
            self.color_clash_stopped
        }
    }
}

impl fmt::Display for MainDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] profile={} mode={} forwarded={} providers={}",
            if self.clash_running { "running" } else { "stopped" },
            self.profile_name.as_deref().unwrap_or("-"),
            self.mode,
            self.forwarded,
            self.has_providers
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutDialog {
    pub version_name: String,
}

/// Everything the UI context owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub main: MainDisplay,
    pub about_dialogs: Vec<AboutDialog>,
    pub overlays: Overlays,
}
