use crate::record::{sort_records, ScoredWine, SortKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mood tags and the varietals that suit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mood {
    Chill,
    Sexy,
    Wild,
    Sad,
    Angry,
    #[serde(rename = "Low Energy")]
    LowEnergy,
}

impl Mood {
    pub const ALL: [Mood; 6] = [Mood::Chill, Mood::Sexy, Mood::Wild, Mood::Sad, Mood::Angry, Mood::LowEnergy];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Chill => "Chill",
            Mood::Sexy => "Sexy",
            Mood::Wild => "Wild",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::LowEnergy => "Low Energy",
        }
    }

    /// Substrings searched for in a wine's varietal.
    pub fn varietals(self) -> &'static [&'static str] {
        match self {
            Mood::Chill => &["Sauvignon Blanc", "Riesling", "Chardonnay", "Pinot Gris", "Pinot Grigio", "Beaujolais", "Pinot Noir", "Tempranillo"],
            Mood::Sexy => &["Cote du Rhone", "Chateauneuf-du-Pape", "Pinot Noir", "Chambolle-Musigny", "Barbaresco"],
            Mood::Wild => &["Syrah", "Zinfandel", "Greco di Tufo", "Nero d'Avola", "Aglianico"],
            Mood::Sad => &["Pinot Noir", "Rioja", "Valpolicella"],
            Mood::Angry => &["Sauvignon Blanc", "Albarino", "Verdelho", "Champagne", "Moscato", "Chassagne", "Puligny-Montrachet", "Meursault"],
            Mood::LowEnergy => &["Sauvignon Blanc", "Zinfandel", "Valpolicella", "Pinot Noir", "Vosne-Romanée", "New Zealand Pinot"],
        }
    }

    pub fn suits(self, varietal: &str) -> bool {
        self.varietals().iter().any(|v| varietal.contains(v))
    }

    /// Parse a button label. Only the first line counts, and the long display
    /// names are accepted.
    pub fn parse(label: &str) -> Option<Mood> {
        let head = label.lines().next().unwrap_or("").trim().to_lowercase();
        match head.as_str() {
            "chill" => Some(Mood::Chill),
            "sexy" | "sexy & playful" => Some(Mood::Sexy),
            "wild" | "go wild" | "restless" => Some(Mood::Wild),
            "sad" | "sad & melancholy" => Some(Mood::Sad),
            "angry" => Some(Mood::Angry),
            "low energy" => Some(Mood::LowEnergy),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::parse(s).ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// Parse labels, dropping unknown ones and duplicates.
pub fn parse_moods<S: AsRef<str>>(labels: &[S]) -> Vec<Mood> {
    let mut moods: Vec<Mood> = labels.iter().filter_map(|l| Mood::parse(l.as_ref())).collect();
    moods.sort();
    moods.dedup();
    moods
}

/// Keep the records whose varietal suits any of `moods`, tag each with the
/// moods it matched, and sort by `key`.
pub fn mood_filter(records: Vec<ScoredWine>, moods: &[Mood], key: SortKey) -> Vec<ScoredWine> {
    let mut wanted = moods.to_vec();
    wanted.sort();
    wanted.dedup();

    let mut out: Vec<ScoredWine> = records
        .into_iter()
        .filter_map(|mut rec| {
            let matched: Vec<Mood> = wanted.iter().copied().filter(|m| m.suits(&rec.record.varietal)).collect();
            if matched.is_empty() {
                return None;
            }
            rec.moods = matched;
            Some(rec)
        })
        .collect();
    tracing::debug!(moods = wanted.len(), kept = out.len(), "mood filter");
    sort_records(&mut out, key);
    out
}
