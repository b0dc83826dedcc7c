//! Transformation rule catalogue.
//!
//! Each rule carries the Spanish description the model sees, the keywords
//! used to build its retrieval query, and a fixed set of worked examples for
//! the few-shot strategies. The catalogue is static: adding a rule means
//! adding an entry here, nothing else.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformRule {
    pub id: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub keywords: &'static str,
    pub examples: &'static [(&'static str, &'static str)],
}

pub const RULES: &[TransformRule] = &[
    TransformRule {
        id: "TYPE:AFF",
        description: "Convierte negativa a afirmativa",
        keywords: "negación afirmación prefijo nd- sufijo -i",
        examples: &[
            ("Che ndajapói", "Che ajapo"),
            ("Nde nderehói", "Nde rehó"),
            ("Ha'e ndohói", "Ha'e oho"),
            ("Ñande ndajakarúi", "Ñande jakaru"),
        ],
    },
    TransformRule {
        id: "TYPE:NEG",
        description: "Convierte afirmativa a negativa",
        keywords: "negación prefijo nd- sufijo -i verbo",
        examples: &[
            ("Che ajapo", "Che ndajapói"),
            ("Nde rehó", "Nde nderehói"),
            ("Ha'e oho", "Ha'e ndohói"),
            ("Ñande jakaru", "Ñande ndajakarúi"),
        ],
    },
    TransformRule {
        id: "TENSE:PAST",
        description: "Convierte la oración a tiempo pasado",
        keywords: "tiempo pasado kuri va'ekue",
        examples: &[
            ("Che ajapo", "Che ajapo kuri"),
            ("Ha'e oho", "Ha'e oho kuri"),
            ("Ore romba'apo", "Ore romba'apo kuri"),
        ],
    },
    TransformRule {
        id: "TENSE:FUT",
        description: "Convierte la oración a tiempo futuro",
        keywords: "tiempo futuro sufijo -ta",
        examples: &[
            ("Che ajapo", "Che ajapóta"),
            ("Ha'e oho", "Ha'e ohóta"),
            ("Ore romba'apo", "Ore romba'apóta"),
        ],
    },
];

/// Looks a rule up by id, ignoring ASCII case and surrounding whitespace.
pub fn find_rule(id: &str) -> Option<&'static TransformRule> {
    let id = id.trim();
    RULES.iter().find(|r| r.id.eq_ignore_ascii_case(id))
}
