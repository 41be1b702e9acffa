use crate::cards::{Card, CostTag};
use crate::engine::mana::PaymentPlan;
use crate::legend::{AbilityDescriptor, AbilityTiming, EffectTag, Legend};
use crate::state::GameState;

/// Whether `ability` can be used now given the legend's state and `energy_available`.
#[inline]
pub fn ability_is_usable(legend: &Legend, ability: &AbilityDescriptor, energy_available: u32) -> bool {
    match ability.cost {
        Some(cost) => !(cost.exhaust && legend.exhausted) && cost.energy <= energy_available,
        None => true,
    }
}

/// Usable abilities in stable order (activated, triggered, passive).
pub fn usable_abilities(
    legend: &Legend,
    energy_available: u32,
) -> impl Iterator<Item = (AbilityTiming, usize, &AbilityDescriptor)> {
    legend
        .abilities()
        .filter(move |(_, _, a)| ability_is_usable(legend, a, energy_available))
}

fn first_usable_with<'a>(
    legend: &'a Legend,
    energy_available: u32,
    pred: impl Fn(EffectTag) -> bool,
) -> Option<&'a AbilityDescriptor> {
    usable_abilities(legend, energy_available)
        .find(|(_, _, a)| a.effect.is_some_and(&pred))
        .map(|(_, _, a)| a)
}

/// Legend facts that adjust every candidate in one evaluation.
#[derive(Debug, Clone, Default)]
pub struct LegendContext<'a> {
    /// Opponent ability that can remove or weaken a placed unit.
    pub unit_threat: Option<&'a AbilityDescriptor>,
    /// Opponent ability that can counter a spell.
    pub spell_counter: Option<&'a AbilityDescriptor>,
    /// My ability that can move or buff a placed unit.
    pub unit_support: Option<&'a AbilityDescriptor>,
    /// My ability that readies the legend again.
    pub ready_source: Option<&'a AbilityDescriptor>,
    /// My legend exists and is ready.
    pub my_legend_ready: bool,
    /// My legend exists and is exhausted.
    pub my_legend_exhausted: bool,
}

impl<'a> LegendContext<'a> {
    pub fn from_state(state: &'a GameState) -> Self {
        let mut ctx = LegendContext::default();
        if let Some(opp) = state.opponent.legend.as_ref() {
            let energy = state.opponent.mana_total;
            ctx.unit_threat = first_usable_with(opp, energy, EffectTag::threatens_units);
            ctx.spell_counter = first_usable_with(opp, energy, |e| e == EffectTag::CounterSpell);
        }
        if let Some(mine) = state.me.legend.as_ref() {
            let energy = state.me.mana_total;
            ctx.my_legend_ready = !mine.exhausted;
            ctx.my_legend_exhausted = mine.exhausted;
            ctx.unit_support = first_usable_with(mine, energy, EffectTag::supports_units);
            ctx.ready_source = mine
                .abilities()
                .find(|(timing, _, a)| {
                    *timing != AbilityTiming::Activated && a.effect == Some(EffectTag::ReadyLegend)
                })
                .map(|(_, _, a)| a);
        }
        ctx
    }
}

/// Alternate affordability through exhausting my legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternatePath {
    /// The card has no legend-exhaustion cost.
    NotApplicable,
    /// Affordable on mana; the legend may optionally be exhausted.
    Optional,
    /// Affordable only by exhausting the legend, covering `shortfall` energy.
    Required { shortfall: u32 },
    /// Legend path exists on the card but cannot be taken now.
    Unavailable(PathBlock),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathBlock {
    NoLegend,
    LegendExhausted,
    ShortfallTooLarge { shortfall: u32 },
}

/// Resolve the alternate path for `card` given its mana `plan`.
pub fn alternate_path(
    card: &Card,
    plan: &PaymentPlan,
    ctx: &LegendContext<'_>,
    allowance: u32,
) -> AlternatePath {
    if !card.has_cost_tag(CostTag::ExhaustLegend) {
        return AlternatePath::NotApplicable;
    }
    if plan.is_complete() {
        return if ctx.my_legend_ready {
            AlternatePath::Optional
        } else {
            AlternatePath::NotApplicable
        };
    }
    let shortfall = plan.energy_shortfall;
    if ctx.my_legend_exhausted {
        AlternatePath::Unavailable(PathBlock::LegendExhausted)
    } else if !ctx.my_legend_ready {
        AlternatePath::Unavailable(PathBlock::NoLegend)
    } else if shortfall > allowance {
        AlternatePath::Unavailable(PathBlock::ShortfallTooLarge { shortfall })
    } else {
        AlternatePath::Required { shortfall }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::AbilityCost;

    #[test]
    fn exhausted_legend_blocks_exhaust_costs_only() {
        let mut legend = Legend::new("l");
        legend.exhausted = true;
        let exhaust = AbilityDescriptor::new("x").with_cost(AbilityCost { exhaust: true, energy: 0 });
        let paid = AbilityDescriptor::new("y").with_cost(AbilityCost { exhaust: false, energy: 2 });
        assert!(!ability_is_usable(&legend, &exhaust, 5));
        assert!(ability_is_usable(&legend, &paid, 2));
        assert!(!ability_is_usable(&legend, &paid, 1));
        assert!(ability_is_usable(&legend, &AbilityDescriptor::new("passive"), 0));
    }
}
