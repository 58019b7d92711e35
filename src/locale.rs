use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::state::ChatRole;

/// Language of every user-facing string the widget produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fr" | "fr-fr" => Some(Locale::Fr),
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            _ => None,
        }
    }

    pub fn all() -> Vec<Locale> {
        vec![Locale::Fr, Locale::En]
    }

    /// Shown when no ticker could be resolved for a send.
    pub fn missing_ticker(&self) -> &'static str {
        match self {
            Locale::Fr => "Veuillez d'abord sélectionner un symbole boursier dans la sidebar et lancer l'analyse.",
            Locale::En => "Please select a ticker symbol in the sidebar and run the analysis first.",
        }
    }

    /// Fallback when the server flags an error without any text.
    pub fn generic_error(&self) -> &'static str {
        match self {
            Locale::Fr => "Une erreur est survenue",
            Locale::En => "Something went wrong",
        }
    }

    pub fn connection_error(&self, detail: &str) -> String {
        match self {
            Locale::Fr => format!(
                "Erreur de connexion: {}. Vérifiez votre connexion Internet.",
                detail
            ),
            Locale::En => format!(
                "Connection error: {}. Check your Internet connection.",
                detail
            ),
        }
    }

    pub fn welcome(&self) -> &'static str {
        match self {
            Locale::Fr => "Bonjour ! Posez une question sur l'entreprise analysée.",
            Locale::En => "Hello! Ask a question about the company under analysis.",
        }
    }

    pub fn typing(&self) -> &'static str {
        match self {
            Locale::Fr => "En train d'écrire",
            Locale::En => "Typing",
        }
    }

    pub fn ticker_saved(&self, ticker: &str) -> String {
        match self {
            Locale::Fr => format!("Symbole {} sélectionné", ticker),
            Locale::En => format!("Ticker {} selected", ticker),
        }
    }

    pub fn ticker_failed(&self, detail: &str) -> String {
        match self {
            Locale::Fr => format!("Échec de la sélection du symbole: {}", detail),
            Locale::En => format!("Could not select ticker: {}", detail),
        }
    }

    pub fn role_label(&self, role: ChatRole) -> &'static str {
        match (self, role) {
            (Locale::Fr, ChatRole::User) => "Vous",
            (Locale::En, ChatRole::User) => "You",
            (_, ChatRole::Assistant) => "Assistant",
            (Locale::Fr, ChatRole::Error) => "Erreur",
            (Locale::En, ChatRole::Error) => "Error",
        }
    }

    pub fn ticker_field(&self) -> &'static str {
        match self {
            Locale::Fr => "Symbole boursier",
            Locale::En => "Ticker",
        }
    }

    pub fn open_hint(&self) -> &'static str {
        match self {
            Locale::Fr => "Ctrl+T pour ouvrir l'assistant",
            Locale::En => "Ctrl+T to open the assistant",
        }
    }

    /// Two-digit hour and minute, the way each locale prints a clock time.
    pub fn format_time(&self, time: NaiveTime) -> String {
        match self {
            Locale::Fr => time.format("%H:%M").to_string(),
            Locale::En => time.format("%I:%M %p").to_string(),
        }
    }
}
