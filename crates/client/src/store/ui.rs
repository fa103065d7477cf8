//! UI preferences slice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub theme: ThemePreference,
    pub language: String,
    pub has_completed_onboarding: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            language: DEFAULT_LANGUAGE.to_string(),
            has_completed_onboarding: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SetTheme(ThemePreference),
    SetLanguage(String),
    SetOnboardingCompleted(bool),
}

impl UiState {
    pub(crate) fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SetTheme(theme) => self.theme = theme,
            UiAction::SetLanguage(language) => self.language = language,
            UiAction::SetOnboardingCompleted(done) => self.has_completed_onboarding = done,
        }
    }

    pub(crate) fn to_persisted(&self) -> PersistedUi {
        PersistedUi {
            theme: self.theme,
            language: self.language.clone(),
        }
    }

    pub(crate) fn restore(&mut self, persisted: PersistedUi) {
        self.theme = persisted.theme;
        self.language = persisted.language;
    }
}

/// Persisted subset of [`UiState`]: theme and language only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PersistedUi {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
