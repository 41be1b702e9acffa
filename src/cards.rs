use crate::error::{AdvisorError, Result};
use crate::text_hints::TextHints;
use crate::types::{CardType, Domain};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Structured ability-cost tags derived from rules text at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTag {
    ExhaustLegend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: String,
    pub name: String,
    pub card_type: CardType,
    pub domain: Domain,
    #[serde(default)]
    pub energy_cost: u32,
    #[serde(default)]
    pub power_cost: BTreeMap<Domain, u32>,
    #[serde(default)]
    pub might: u32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub rules_text: String,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub cost_tags: Vec<CostTag>,
}

impl Card {
    #[inline]
    pub fn power_total(&self) -> u32 {
        self.power_cost.values().sum()
    }

    #[inline]
    pub fn has_cost_tag(&self, tag: CostTag) -> bool {
        self.cost_tags.contains(&tag)
    }

    #[inline]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Lookup collaborator consumed by the advisors. Only lookup by id is required.
pub trait CardCatalog: Sync {
    fn resolve_card(&self, card_id: &str) -> Option<&Card>;

    /// Lookup that turns a miss into `UnresolvedCardReference`.
    fn require_card(&self, card_id: &str) -> Result<&Card> {
        self.resolve_card(card_id)
            .ok_or_else(|| AdvisorError::UnresolvedCardReference {
                card_id: card_id.to_string(),
            })
    }

    /// Stable digest identifying the catalog contents, when the catalog has one.
    fn fingerprint(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Default)]
pub struct CardsDb {
    by_id: HashMap<String, Card>,
    order: Vec<String>,                  // load order, for deterministic iteration
    name_to_id: HashMap<String, String>, // case-sensitive names as in data
    fingerprint: String,
}

impl CardsDb {
    /// Build a catalog from already-constructed cards. Rejects duplicate or empty ids.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        let mut db = CardsDb {
            by_id: HashMap::with_capacity(cards.len()),
            order: Vec::with_capacity(cards.len()),
            name_to_id: HashMap::with_capacity(cards.len()),
            fingerprint: String::new(),
        };
        for c in cards {
            validate_card(&c)?;
            if let Some(existing) = db.by_id.get(&c.card_id) {
                return Err(AdvisorError::Catalog(format!(
                    "Duplicate card id '{}' ('{}' and '{}')",
                    c.card_id, existing.name, c.name
                )));
            }
            // Printings may share a name; the first one wins the name lookup.
            db.name_to_id
                .entry(c.name.clone())
                .or_insert_with(|| c.card_id.clone());
            db.order.push(c.card_id.clone());
            db.by_id.insert(c.card_id.clone(), c);
        }
        db.fingerprint = db.compute_fingerprint();
        Ok(db)
    }

    #[inline]
    pub fn get(&self, card_id: &str) -> Option<&Card> {
        self.by_id.get(card_id)
    }

    #[inline]
    pub fn id_by_name(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Stable hex digest of the catalog contents, independent of load order.
    #[inline]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn compute_fingerprint(&self) -> String {
        let mut ids: Vec<&String> = self.order.iter().collect();
        ids.sort();
        let mut hasher = Sha256::new();
        for id in ids {
            if let Some(card) = self.by_id.get(id) {
                // Card serialization cannot fail: all keys are strings or unit enums.
                if let Ok(bytes) = serde_json::to_vec(card) {
                    hasher.update(&bytes);
                }
                hasher.update(b"\n");
            }
        }
        hex::encode(hasher.finalize())
    }
}

impl CardCatalog for CardsDb {
    #[inline]
    fn resolve_card(&self, card_id: &str) -> Option<&Card> {
        self.get(card_id)
    }

    fn fingerprint(&self) -> Option<&str> {
        Some(&self.fingerprint)
    }
}

fn validate_card(card: &Card) -> Result<()> {
    if card.card_id.trim().is_empty() {
        return Err(AdvisorError::Catalog(format!(
            "Card '{}' has an empty card_id",
            card.name
        )));
    }
    if card.name.trim().is_empty() {
        return Err(AdvisorError::Catalog(format!(
            "Card id '{}' has an empty name",
            card.card_id
        )));
    }
    Ok(())
}

/// Power cost on the wire: either a per-domain map or a flat count paid in the card's own domain.
#[derive(Deserialize)]
#[serde(untagged)]
enum PowerCostRecord {
    Flat(u32),
    ByDomain(BTreeMap<Domain, u32>),
}

#[derive(Deserialize)]
struct CardRecord {
    card_id: String,
    name: String,
    card_type: CardType,
    domain: Domain,
    #[serde(default)]
    energy_cost: u32,
    #[serde(default)]
    power_cost: Option<PowerCostRecord>,
    #[serde(default)]
    might: Option<u32>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    keywords: BTreeSet<String>,
    #[serde(default)]
    rules_text: String,
    #[serde(default)]
    set_name: Option<String>,
}

impl CardRecord {
    fn into_card(self, hints: &TextHints) -> Card {
        let mut power_cost = match self.power_cost {
            None | Some(PowerCostRecord::Flat(0)) => BTreeMap::new(),
            Some(PowerCostRecord::Flat(n)) => BTreeMap::from([(self.domain, n)]),
            Some(PowerCostRecord::ByDomain(m)) => m,
        };
        power_cost.retain(|_, v| *v > 0);

        let might = if self.card_type.is_unit() {
            self.might.unwrap_or(0)
        } else {
            if self.might.is_some_and(|m| m > 0) {
                debug!(card_id = %self.card_id, "ignoring might on non-unit card");
            }
            0
        };

        let cost_tags = hints.card_cost_tags(&self.rules_text);
        Card {
            card_id: self.card_id,
            name: self.name,
            card_type: self.card_type,
            domain: self.domain,
            energy_cost: self.energy_cost,
            power_cost,
            might,
            tags: self.tags,
            keywords: self.keywords,
            rules_text: self.rules_text,
            set_name: self.set_name,
            cost_tags,
        }
    }
}

/// Parse a JSON array of card records into a catalog.
pub fn parse_cards_json(data: &str, hints: &TextHints) -> Result<CardsDb> {
    let raw: Vec<CardRecord> = serde_json::from_str(data)
        .map_err(|e| AdvisorError::Catalog(format!("Failed to parse JSON: {e}")))?;

    if raw.is_empty() {
        return Err(AdvisorError::Catalog("No cards in JSON".to_string()));
    }

    let cards: Vec<Card> = raw.into_iter().map(|r| r.into_card(hints)).collect();
    let db = CardsDb::from_cards(cards)?;
    info!(cards = db.len(), "catalog loaded");
    Ok(db)
}

/// Load cards from a JSON file using the default text hints.
pub fn load_cards_from_json<P: AsRef<Path>>(path: P) -> Result<CardsDb> {
    load_cards_from_json_with_hints(path, &TextHints::default())
}

/// Load cards from a JSON file, deriving cost tags with the given hints.
pub fn load_cards_from_json_with_hints<P: AsRef<Path>>(
    path: P,
    hints: &TextHints,
) -> Result<CardsDb> {
    let data = fs::read_to_string(path.as_ref())
        .map_err(|e| AdvisorError::Catalog(format!("Failed to read JSON: {e}")))?;
    parse_cards_json(&data, hints)
}
