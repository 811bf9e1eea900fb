//! User-facing recommendation for each proximity tier.
//!
//! French wording is the reference; English mirrors it.

use crate::proximity::{ProximityResult, ProximityTier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CONTACT_URL: &str = "https://www.karno.energy/contact/";
pub const FOLLOW_URL: &str = "https://be.linkedin.com/company/karno-energy";

/// Message language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fr" | "french" | "francais" | "français" => Ok(Self::Fr),
            "en" | "english" => Ok(Self::En),
            _ => Err(format!("Unknown language '{}'. Use 'fr' or 'en'.", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fr => write!(f, "fr"),
            Self::En => write!(f, "en"),
        }
    }
}

/// How prominently the presentation layer should show the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub tier: ProximityTier,
    pub severity: Severity,
    /// Network named in the message; absent for `ProximityTier::None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub message: String,
    pub link: &'static str,
}

impl Recommendation {
    pub fn for_result(result: &ProximityResult, lang: Language) -> Self {
        let network = result.network_in_range().map(str::to_string);
        let name = network.as_deref().unwrap_or_else(|| no_network_label(lang));
        let tier = result.tier;

        let severity = match tier {
            ProximityTier::Connectable => Severity::Success,
            _ => Severity::Info,
        };
        let link = match tier {
            ProximityTier::None => FOLLOW_URL,
            _ => CONTACT_URL,
        };
        let message = message(tier, name, lang);

        Self {
            tier,
            severity,
            network,
            message,
            link,
        }
    }
}

/// Placeholder shown when no network is within range.
pub fn no_network_label(lang: Language) -> &'static str {
    match lang {
        Language::Fr => "Pas de réseau trouvé",
        Language::En => "No network found",
    }
}

fn message(tier: ProximityTier, name: &str, lang: Language) -> String {
    match (lang, tier) {
        (Language::Fr, ProximityTier::Connectable) => format!(
            "Le réseau d'énergie thermique {} passera à côté de chez vous. Il est très probable que vous \
             puissiez vous connecter. Contactez-nous pour entamer les démarches de connexion au réseau.",
            name
        ),
        (Language::Fr, ProximityTier::NearbyPlanned) => format!(
            "Le réseau d'énergie thermique {} est en cours de développement dans votre quartier. Vous n'êtes \
             pas situé le long du tracé prévu mais n'hésitez pas à nous contacter pour évaluer la possibilité \
             d'une extension de réseau.",
            name
        ),
        (Language::Fr, ProximityTier::Extendable) => format!(
            "Le réseau d'énergie thermique {} est en cours de développement à proximité de chez vous. Il ne \
             passe malheureusement pas encore dans votre quartier. Si vous êtes un grand consommateur ou \
             producteur d'énergie thermique, contactez-nous, on peut envisager une extension du réseau.",
            name
        ),
        (Language::Fr, ProximityTier::None) => "Aucun réseau d'énergie thermique n'est en cours de développement \
             à proximité de chez vous. Pour vous tenir au courant de nos prochains réseaux, suivez-nous sur \
             LinkedIn. Contactez-nous si vous pensez que votre quartier bénéficierait d'un réseau d'énergie \
             thermique."
            .to_string(),
        (Language::En, ProximityTier::Connectable) => format!(
            "The {} thermal energy network will pass right by your address. You can very likely connect to it. \
             Contact us to start the connection process.",
            name
        ),
        (Language::En, ProximityTier::NearbyPlanned) => format!(
            "The {} thermal energy network is being developed in your neighborhood. Your address is not on the \
             planned route, but contact us to assess whether the network could be extended.",
            name
        ),
        (Language::En, ProximityTier::Extendable) => format!(
            "The {} thermal energy network is being developed near you but does not reach your neighborhood yet. \
             If you are a large consumer or producer of thermal energy, contact us: an extension can be considered.",
            name
        ),
        (Language::En, ProximityTier::None) => "No thermal energy network is being developed near you. Follow us \
             on LinkedIn to hear about upcoming networks, and contact us if you think your neighborhood would \
             benefit from one."
            .to_string(),
    }
}
