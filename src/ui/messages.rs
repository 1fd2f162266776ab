/// User actions on the main screen, forwarded to the controller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Request {
    ToggleStatus,
    OpenProxy,
    OpenProfiles,
    OpenProviders,
    OpenLogs,
    OpenSettings,
    OpenHelp,
    OpenAbout,
}

impl Request {
    pub fn all() -> impl Iterator<Item = Self> {
        use strum::IntoEnumIterator;
        Self::iter()
    }
}
