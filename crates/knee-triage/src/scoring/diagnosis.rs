use serde::{Deserialize, Serialize};
use std::fmt;

/// Candidate conditions scored by the engine, in the fixed evaluation order.
///
/// The declaration order doubles as the `Ord` used by every per-diagnosis map,
/// so iterating a `BTreeMap<Diagnosis, _>` always walks the tags in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diagnosis {
    /// Pes anserine bursitis.
    Pes,
    /// Patellofemoral pain syndrome.
    Pfps,
    /// Medial plica syndrome.
    Plica,
    /// Infrapatellar (Hoffa) fat pad syndrome.
    Hoffa,
    /// Meniscal injury.
    Meniscus,
    /// Saphenous neuropathy.
    Saphenous,
    Other,
}

impl Diagnosis {
    pub const ALL: [Diagnosis; 7] = [
        Diagnosis::Pes,
        Diagnosis::Pfps,
        Diagnosis::Plica,
        Diagnosis::Hoffa,
        Diagnosis::Meniscus,
        Diagnosis::Saphenous,
        Diagnosis::Other,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Diagnosis::Pes => "pes",
            Diagnosis::Pfps => "pfps",
            Diagnosis::Plica => "plica",
            Diagnosis::Hoffa => "hoffa",
            Diagnosis::Meniscus => "meniscus",
            Diagnosis::Saphenous => "saphenous",
            Diagnosis::Other => "other",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Diagnosis::Pes => "Pes anserine bursitis",
            Diagnosis::Pfps => "Patellofemoral pain syndrome",
            Diagnosis::Plica => "Plica syndrome",
            Diagnosis::Hoffa => "Hoffa fat pad syndrome",
            Diagnosis::Meniscus => "Meniscal injury",
            Diagnosis::Saphenous => "Saphenous neuropathy",
            Diagnosis::Other => "Other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|diagnosis| diagnosis.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
