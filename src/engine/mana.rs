use crate::cards::Card;
use crate::state::PlayerState;
use crate::types::Domain;
use std::collections::BTreeMap;
use std::fmt;

/// Mana available for a single-card lookahead: the full pool, split by origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManaPool {
    pub unaligned: u32,
    pub by_domain: BTreeMap<Domain, u32>,
}

impl ManaPool {
    #[inline]
    pub fn of(player: &PlayerState) -> Self {
        Self {
            unaligned: player.unaligned_mana(),
            by_domain: player.mana_by_rune.clone(),
        }
    }
}

/// How a card's cost would be paid. `energy_shortfall` is the energy left unpaid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentPlan {
    pub by_domain: BTreeMap<Domain, u32>,
    pub unaligned: u32,
    pub energy_shortfall: u32,
}

impl PaymentPlan {
    #[inline]
    pub fn paid(&self) -> u32 {
        self.unaligned + self.domain_paid()
    }

    #[inline]
    pub fn domain_paid(&self) -> u32 {
        self.by_domain.values().sum()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.energy_shortfall == 0
    }

    /// Fraction of paid mana drawn from domain pools.
    #[inline]
    pub fn scarce_fraction(&self) -> f64 {
        let paid = self.paid();
        if paid == 0 {
            0.0
        } else {
            f64::from(self.domain_paid()) / f64::from(paid)
        }
    }

    /// Fraction of `mana_total` this plan uses; 0 when there is no mana at all.
    #[inline]
    pub fn efficiency(&self, mana_total: u32) -> f64 {
        if mana_total == 0 {
            0.0
        } else {
            (f64::from(self.paid()) / f64::from(mana_total)).min(1.0)
        }
    }

    /// "2 unaligned, 1 fury" style breakdown.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.unaligned > 0 {
            parts.push(format!("{} unaligned", self.unaligned));
        }
        for (d, n) in &self.by_domain {
            parts.push(format!("{n} {}", d.as_str()));
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// A power requirement the domain pool cannot meet. Never waived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerShortfall {
    pub domain: Domain,
    pub needed: u32,
    pub available: u32,
}

impl fmt::Display for PowerShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "needs {} {} power, only {} available",
            self.needed,
            self.domain.as_str(),
            self.available
        )
    }
}

/// Plan payment of `energy` plus `power` against `pool`.
///
/// Power comes from its own domain. Energy comes from unaligned mana first,
/// then from whichever domain has the most left (ties go to the earlier domain).
/// Energy that cannot be covered is reported as `energy_shortfall`.
pub fn plan_payment(
    pool: &ManaPool,
    energy: u32,
    power: &BTreeMap<Domain, u32>,
) -> Result<PaymentPlan, PowerShortfall> {
    let mut remaining = pool.by_domain.clone();
    let mut plan = PaymentPlan::default();

    for (&domain, &needed) in power {
        if needed == 0 {
            continue;
        }
        let available = remaining.get(&domain).copied().unwrap_or(0);
        if available < needed {
            return Err(PowerShortfall {
                domain,
                needed,
                available,
            });
        }
        remaining.insert(domain, available - needed);
        *plan.by_domain.entry(domain).or_insert(0) += needed;
    }

    let from_unaligned = energy.min(pool.unaligned);
    plan.unaligned = from_unaligned;
    let mut owed = energy - from_unaligned;

    while owed > 0 {
        let richest = Domain::all()
            .into_iter()
            .filter_map(|d| remaining.get(&d).map(|&n| (d, n)))
            .filter(|&(_, n)| n > 0)
            .fold(None, |best: Option<(Domain, u32)>, (d, n)| match best {
                Some((_, bn)) if bn >= n => best,
                _ => Some((d, n)),
            });
        let Some((domain, _)) = richest else { break };
        if let Some(n) = remaining.get_mut(&domain) {
            *n -= 1;
        }
        *plan.by_domain.entry(domain).or_insert(0) += 1;
        owed -= 1;
    }
    plan.energy_shortfall = owed;
    Ok(plan)
}

/// Payment plan for a card's full cost.
#[inline]
pub fn plan_card(pool: &ManaPool, card: &Card) -> Result<PaymentPlan, PowerShortfall> {
    plan_payment(pool, card.energy_cost, &card.power_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(unaligned: u32, domains: &[(Domain, u32)]) -> ManaPool {
        ManaPool {
            unaligned,
            by_domain: domains.iter().copied().collect(),
        }
    }

    #[test]
    fn energy_prefers_unaligned_then_richest_domain() {
        let p = pool(1, &[(Domain::Fury, 1), (Domain::Calm, 3)]);
        let plan = plan_payment(&p, 3, &BTreeMap::new()).unwrap();
        assert_eq!(plan.unaligned, 1);
        assert_eq!(plan.by_domain.get(&Domain::Calm), Some(&2));
        assert_eq!(plan.by_domain.get(&Domain::Fury), None);
        assert!(plan.is_complete());
    }

    #[test]
    fn ties_use_domain_order() {
        let p = pool(0, &[(Domain::Mind, 2), (Domain::Body, 2)]);
        let plan = plan_payment(&p, 1, &BTreeMap::new()).unwrap();
        assert_eq!(plan.by_domain.get(&Domain::Body), Some(&1));
    }

    #[test]
    fn power_is_strict_energy_may_fall_short() {
        let p = pool(1, &[(Domain::Order, 1)]);
        let power = BTreeMap::from([(Domain::Order, 2)]);
        assert!(plan_payment(&p, 0, &power).is_err());

        let plan = plan_payment(&p, 4, &BTreeMap::new()).unwrap();
        assert_eq!(plan.energy_shortfall, 2);
        assert_eq!(plan.paid(), 2);
    }
}
